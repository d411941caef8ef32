use colored::Colorize;
use serde::Serialize;

use crate::matcher::MatchResult;

#[derive(Debug, Clone, Serialize)]
pub struct MatchSummary {
    pub left_name: String,
    pub right_name: String,
    pub matched: usize,
    pub only_left: usize,
    pub only_right: usize,
    pub match_rate: f64,
}

impl MatchSummary {
    pub fn from_result(result: &MatchResult) -> Self {
        let mut summary = Self {
            left_name: result.left_name.clone(),
            right_name: result.right_name.clone(),
            matched: result.found().len(),
            only_left: result.only_left().len(),
            only_right: result.only_right().len(),
            match_rate: 0.0,
        };
        summary.calculate_match_rate();
        summary
    }

    /// Share of distinct tracks, across both playlists, that ended up in a pair.
    pub fn calculate_match_rate(&mut self) {
        let total = self.matched + self.only_left + self.matched + self.only_right;
        if total > 0 {
            self.match_rate = (2 * self.matched) as f64 / total as f64 * 100.0;
        }
    }

    pub fn print(&self) {
        let rate = format!("{:.1}%", self.match_rate);
        let rate = if self.match_rate >= 90.0 {
            rate.green()
        } else if self.match_rate >= 70.0 {
            rate.yellow()
        } else {
            rate.red()
        };

        println!();
        println!("{}", "=".repeat(60));
        println!("{}", "MATCH SUMMARY".bold());
        println!("{}", "=".repeat(60));
        println!("Matched pairs: {}", self.matched.to_string().green());
        println!("Only in {}: {}", self.left_name, self.only_left.to_string().red());
        println!("Only in {}: {}", self.right_name, self.only_right.to_string().red());
        println!("Match rate: {}", rate);
        println!("{}", "=".repeat(60));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::TrackMatcher;
    use crate::track::{Platform, Track};

    #[test]
    fn test_summary_counts() {
        let left = [
            Track::mock("Lazy", Platform::Deezer, "1"),
            Track::mock("Fireball", Platform::Deezer, "2"),
        ];
        let right = [
            Track::mock("Lazy", Platform::Spotify, "a"),
            Track::mock("Black Night", Platform::Spotify, "b"),
            Track::mock("Speed King", Platform::Spotify, "c"),
        ];
        let result = TrackMatcher::new(0).match_named("Deezer", &left, "Spotify", &right);

        let summary = MatchSummary::from_result(&result);

        assert_eq!(summary.matched, 1);
        assert_eq!(summary.only_left, 1);
        assert_eq!(summary.only_right, 2);
        assert!((summary.match_rate - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_result_has_zero_rate() {
        let summary = MatchSummary::from_result(&MatchResult::new("a", "b"));
        assert_eq!(summary.match_rate, 0.0);
    }
}
