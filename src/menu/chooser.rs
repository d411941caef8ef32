use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;
use tracing::warn;

use crate::error::{AppError, Result};

/// Picks one option out of a labelled list. Blocking.
pub trait Chooser {
    /// Index into `options`, or `None` when the user cancels.
    fn choose(&self, message: &str, options: &[String]) -> Result<Option<usize>>;
}

pub struct DialoguerChooser {
    theme: ColorfulTheme,
}

impl DialoguerChooser {
    pub fn new(theme: ColorfulTheme) -> Self {
        Self { theme }
    }
}

impl Default for DialoguerChooser {
    fn default() -> Self {
        Self::new(ColorfulTheme::default())
    }
}

impl Chooser for DialoguerChooser {
    fn choose(&self, message: &str, options: &[String]) -> Result<Option<usize>> {
        if options.is_empty() {
            warn!("Nothing to choose from: {}", message);
            return Ok(None);
        }

        Select::with_theme(&self.theme)
            .with_prompt(message)
            .items(options)
            .default(0)
            .interact_opt()
            .map_err(|e| AppError::Prompt(e.to_string()))
    }
}

#[cfg(test)]
pub mod testing {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;

    /// Answers prompts from a script of labels; `None` cancels.
    #[derive(Default)]
    pub struct ScriptedChooser {
        answers: RefCell<VecDeque<Option<String>>>,
        pub prompts: RefCell<Vec<(String, Vec<String>)>>,
    }

    impl ScriptedChooser {
        pub fn new(answers: &[Option<&str>]) -> Self {
            Self {
                answers: RefCell::new(answers.iter().map(|a| a.map(str::to_string)).collect()),
                prompts: RefCell::default(),
            }
        }

        pub fn remaining(&self) -> usize {
            self.answers.borrow().len()
        }
    }

    impl Chooser for ScriptedChooser {
        fn choose(&self, message: &str, options: &[String]) -> Result<Option<usize>> {
            self.prompts
                .borrow_mut()
                .push((message.to_string(), options.to_vec()));

            let answer = self
                .answers
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| AppError::Prompt(format!("no scripted answer for {:?}", message)))?;

            match answer {
                None => Ok(None),
                Some(label) => options
                    .iter()
                    .position(|o| *o == label)
                    .map(Some)
                    .ok_or_else(|| {
                        AppError::Prompt(format!("{:?} not offered, options were {:?}", label, options))
                    }),
            }
        }
    }

    /// Always answers with the same index, in range or not.
    pub struct FixedChooser(pub usize);

    impl Chooser for FixedChooser {
        fn choose(&self, _message: &str, _options: &[String]) -> Result<Option<usize>> {
            Ok(Some(self.0))
        }
    }
}
