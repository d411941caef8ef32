use tracing::error;

use crate::error::{AppError, Result};
use crate::menu::chooser::Chooser;
use crate::track::Platform;

const EXIT: &str = "EXIT";
const BACK: &str = "BACK";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Authenticate(Side),
    UserInfo(Side),
    PlaylistInfo(Side),
    MatchPlaylists,
    ShowMatches,
    LinkByHand,
}

#[derive(Debug, Clone)]
pub enum MenuEntry {
    Submenu(MenuItem),
    Action(Action),
}

#[derive(Debug, Clone)]
pub struct MenuItem {
    pub title: String,
    pub choices: Vec<(String, MenuEntry)>,
}

impl MenuItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            choices: Vec::new(),
        }
    }

    pub fn submenu(mut self, label: impl Into<String>, menu: MenuItem) -> Self {
        self.choices.push((label.into(), MenuEntry::Submenu(menu)));
        self
    }

    pub fn action(mut self, label: impl Into<String>, action: Action) -> Self {
        self.choices.push((label.into(), MenuEntry::Action(action)));
        self
    }
}

#[allow(async_fn_in_trait)]
pub trait MenuHandler {
    async fn handle(&mut self, action: Action) -> Result<()>;
}

fn platform_menu(platform: Platform, side: Side) -> MenuItem {
    MenuItem::new(format!("What to do with {}?", platform))
        .action("Authentication", Action::Authenticate(side))
        .action("User info", Action::UserInfo(side))
        .action("Playlist info", Action::PlaylistInfo(side))
}

pub fn build_menu(left: Platform, right: Platform) -> MenuItem {
    MenuItem::new("What to do?")
        .submenu(left.to_string(), platform_menu(left, Side::Left))
        .submenu(right.to_string(), platform_menu(right, Side::Right))
        .action("Match playlist tracks", Action::MatchPlaylists)
        .action("Show match results", Action::ShowMatches)
        .action("Link tracks by hand", Action::LinkByHand)
}

/// Drive the menu until the user exits or cancels.
///
/// A failing action is logged and the loop carries on. A failing prompt ends the
/// loop, since nothing more can be asked.
pub async fn run_menu_loop<C, H>(start: &MenuItem, chooser: &C, handler: &mut H) -> Result<()>
where
    C: Chooser,
    H: MenuHandler,
{
    let mut current = start;
    let mut history: Vec<&MenuItem> = Vec::new();

    loop {
        let mut labels: Vec<String> = current.choices.iter().map(|(l, _)| l.clone()).collect();
        if !history.is_empty() {
            labels.push(BACK.to_string());
        }
        labels.push(EXIT.to_string());

        let Some(idx) = chooser.choose(&current.title, &labels)? else {
            return Ok(());
        };
        let label = labels.get(idx).ok_or_else(|| {
            AppError::Prompt(format!("no option #{} in \"{}\"", idx, current.title))
        })?;

        match current.choices.get(idx) {
            Some((_, MenuEntry::Submenu(menu))) => {
                history.push(current);
                current = menu;
            }
            Some((label, MenuEntry::Action(action))) => {
                if let Err(e) = handler.handle(*action).await {
                    error!("{} failed, try again: {}", label, e);
                }
            }
            None if label == BACK => {
                if let Some(previous) = history.pop() {
                    current = previous;
                }
            }
            None => return Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::chooser::testing::{FixedChooser, ScriptedChooser};

    #[derive(Default)]
    struct Recorder {
        handled: Vec<Action>,
        fail: bool,
    }

    impl MenuHandler for Recorder {
        async fn handle(&mut self, action: Action) -> Result<()> {
            self.handled.push(action);
            if self.fail {
                return Err(AppError::NotFound("boom".into()));
            }
            Ok(())
        }
    }

    fn menu() -> MenuItem {
        build_menu(Platform::Deezer, Platform::Spotify)
    }

    #[tokio::test]
    async fn test_exit_from_top_level() {
        let chooser = ScriptedChooser::new(&[Some("EXIT")]);
        let mut handler = Recorder::default();

        run_menu_loop(&menu(), &chooser, &mut handler).await.unwrap();

        let prompts = chooser.prompts.borrow();
        assert_eq!(prompts[0].0, "What to do?");
        assert!(!prompts[0].1.contains(&"BACK".to_string()));
        assert!(handler.handled.is_empty());
    }

    #[tokio::test]
    async fn test_submenu_and_back() {
        let chooser = ScriptedChooser::new(&[
            Some("Spotify"),
            Some("User info"),
            Some("BACK"),
            Some("Match playlist tracks"),
            None,
        ]);
        let mut handler = Recorder::default();

        run_menu_loop(&menu(), &chooser, &mut handler).await.unwrap();

        assert_eq!(
            handler.handled,
            vec![Action::UserInfo(Side::Right), Action::MatchPlaylists]
        );

        let prompts = chooser.prompts.borrow();
        assert_eq!(prompts[1].0, "What to do with Spotify?");
        assert_eq!(prompts[1].1.last().map(String::as_str), Some("EXIT"));
        assert!(prompts[1].1.contains(&"BACK".to_string()));
        assert_eq!(prompts[3].0, "What to do?");
        assert_eq!(chooser.remaining(), 0);
    }

    #[tokio::test]
    async fn test_failing_action_keeps_loop_alive() {
        let chooser = ScriptedChooser::new(&[
            Some("Link tracks by hand"),
            Some("Link tracks by hand"),
            Some("EXIT"),
        ]);
        let mut handler = Recorder {
            fail: true,
            ..Default::default()
        };

        run_menu_loop(&menu(), &chooser, &mut handler).await.unwrap();

        assert_eq!(handler.handled.len(), 2);
    }

    #[tokio::test]
    async fn test_exit_inside_submenu_leaves_loop() {
        let chooser = ScriptedChooser::new(&[Some("Deezer"), Some("EXIT")]);
        let mut handler = Recorder::default();

        run_menu_loop(&menu(), &chooser, &mut handler).await.unwrap();

        assert_eq!(chooser.remaining(), 0);
        assert!(handler.handled.is_empty());
    }

    #[tokio::test]
    async fn test_out_of_range_choice_is_a_prompt_error() {
        let chooser = FixedChooser(99);
        let mut handler = Recorder::default();

        let err = run_menu_loop(&menu(), &chooser, &mut handler).await.unwrap_err();

        assert!(matches!(err, AppError::Prompt(_)));
        assert!(handler.handled.is_empty());
    }
}
