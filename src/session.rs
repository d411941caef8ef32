use crate::matcher::MatchResult;

/// Match results computed during this process, oldest first.
#[derive(Debug, Default)]
pub struct MatchSession {
    results: Vec<MatchResult>,
}

impl MatchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: MatchResult) -> usize {
        self.results.push(result);
        self.results.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn labels(&self) -> Vec<String> {
        self.results.iter().map(MatchResult::label).collect()
    }

    pub fn get(&self, index: usize) -> Option<&MatchResult> {
        self.results.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut MatchResult> {
        self.results.get_mut(index)
    }
}
