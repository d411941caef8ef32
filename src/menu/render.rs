use colored::Colorize;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::matcher::MatchResult;
use crate::report::MatchSummary;
use crate::track::Track;

/// Turns match results into ASCII tables. Pair cells get `width` characters,
/// single-column tables twice that.
#[derive(Debug, Clone, Copy)]
pub struct TableRenderer {
    width: usize,
}

impl TableRenderer {
    pub fn new(width: usize) -> Self {
        Self { width }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn pairs_table(&self, result: &MatchResult) -> String {
        let mut builder = Builder::default();
        builder.push_record([result.left_name.clone(), result.right_name.clone()]);
        for pair in result.found() {
            builder.push_record([
                pair.left.to_brief_str(self.width),
                pair.right.to_brief_str(self.width),
            ]);
        }

        builder.build().with(Style::ascii()).to_string()
    }

    pub fn single_table(&self, title: &str, tracks: &[Track]) -> String {
        let mut builder = Builder::default();
        builder.push_record([title.to_string()]);
        for track in tracks {
            builder.push_record([track.to_brief_str(self.width * 2)]);
        }

        builder.build().with(Style::ascii()).to_string()
    }

    pub fn render_matches(&self, result: &MatchResult) -> String {
        [
            self.pairs_table(result),
            self.single_table(&format!("{} only", result.left_name), result.only_left()),
            self.single_table(&format!("{} only", result.right_name), result.only_right()),
        ]
        .join("\n")
    }

    pub fn print_matches(&self, result: &MatchResult) {
        println!("{}", result.label().magenta().bold());
        println!("{}", self.render_matches(result));
        MatchSummary::from_result(result).print();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::TrackMatcher;
    use crate::track::Platform;

    fn result() -> MatchResult {
        let left = [
            Track::mock("Highway Star", Platform::Deezer, "1"),
            Track::mock("Never Before", Platform::Deezer, "2"),
        ];
        let right = [
            Track::mock("Highway Star (Remastered)", Platform::Spotify, "a"),
            Track::mock("Space Truckin'", Platform::Spotify, "b"),
        ];
        TrackMatcher::default().match_named("Deezer", &left, "Spotify", &right)
    }

    #[test]
    fn test_pairs_table_has_headers_and_rows() {
        let table = TableRenderer::new(93).pairs_table(&result());

        assert!(table.contains("Deezer"));
        assert!(table.contains("Spotify"));
        assert!(table.contains("Mock Artist - Highway Star (Mock Album)"));
        assert!(table.contains("Mock Artist - Highway Star (Remastered) (Mock Album)"));
        assert!(!table.contains("Never Before"));
    }

    #[test]
    fn test_single_tables_list_leftovers() {
        let rendered = TableRenderer::new(93).render_matches(&result());

        assert!(rendered.contains("Deezer only"));
        assert!(rendered.contains("Spotify only"));
        assert!(rendered.contains("Never Before"));
        assert!(rendered.contains("Space Truckin'"));
    }

    #[test]
    fn test_cells_respect_width() {
        let table = TableRenderer::new(12).pairs_table(&result());

        assert!(table.contains("Mock Arti..."));
        assert!(!table.contains("Highway Star"));
    }
}
