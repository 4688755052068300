// Filter/search pipeline.
// Pure functions from the record list and current selections to ordered results.

pub mod filter;
pub mod fuzzy;
pub mod suggest;

use std::collections::BTreeSet;

use crate::catalog::IconRecord;

pub use filter::{FileType, Filters};
pub use suggest::{Suggestion, suggest};

use fuzzy::{FuzzyEngine, FuzzyOptions};

/// Scores closer than this are treated as ties when preferring new icons.
pub const TIE_EPSILON: f64 = 0.1;

/// A record paired with optional match metadata for highlighting.
#[derive(Debug, Clone)]
pub struct SearchResult<'a> {
    pub icon: &'a IconRecord,
    /// Relevance on a 0-to-1 scale; `None` for the empty-query listing.
    pub score: Option<f64>,
    /// Matched character positions in the filename.
    pub positions: Vec<usize>,
}

impl SearchResult<'_> {
    fn relevance(&self) -> f64 {
        self.score.unwrap_or(0.0)
    }
}

/// Filter, match, and order records for display.
pub fn search<'a>(icons: &'a [IconRecord], query: &str, filters: &Filters) -> Vec<SearchResult<'a>> {
    let mut candidates: Vec<&IconRecord> = icons.iter().filter(|icon| filters.matches(icon)).collect();

    let query = query.trim();
    if query.is_empty() {
        candidates.sort_by(|a, b| filter::default_order(a, b));
        return candidates
            .into_iter()
            .map(|icon| SearchResult {
                icon,
                score: None,
                positions: Vec::new(),
            })
            .collect();
    }

    let query = query.to_lowercase();
    let engine = FuzzyEngine::new(FuzzyOptions::strict());
    let mut results: Vec<SearchResult<'a>> = candidates
        .into_iter()
        .filter_map(|icon| {
            let score = engine.score_icon(&query, icon)?;
            Some(SearchResult {
                icon,
                score: Some(score),
                positions: engine.positions(&query, &icon.filename),
            })
        })
        .collect();

    results.sort_by(|a, b| b.relevance().total_cmp(&a.relevance()));
    prefer_new_on_ties(&mut results);
    results
}

/// Single pass over adjacent pairs: a legacy result directly followed by a new
/// one within `TIE_EPSILON` swaps with it. Each result moves at most one place,
/// so new icons are not globally ordered first.
fn prefer_new_on_ties(results: &mut [SearchResult<'_>]) {
    let mut i = 0;
    while i + 1 < results.len() {
        let (a, b) = (&results[i], &results[i + 1]);
        if (a.relevance() - b.relevance()).abs() < TIE_EPSILON && !a.icon.is_new() && b.icon.is_new() {
            results.swap(i, i + 1);
            i += 2;
        } else {
            i += 1;
        }
    }
}

/// Distinct category names, sorted.
pub fn categories(icons: &[IconRecord]) -> Vec<String> {
    icons
        .iter()
        .map(|icon| icon.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn icon(path: &str) -> IconRecord {
        IconRecord::from_path(path, None, "https://raw.example/", 2026).unwrap()
    }

    fn names(results: &[SearchResult<'_>]) -> Vec<String> {
        results.iter().map(|r| r.icon.path.clone()).collect()
    }

    #[test]
    fn test_empty_query_orders_new_first() {
        let icons = vec![icon("X/2010-2012/A.png"), icon("X/B.png"), icon("X/C.png")];

        let results = search(&icons, "", &Filters::default());
        assert_eq!(names(&results), ["X/B.png", "X/C.png", "X/2010-2012/A.png"]);
        assert!(results.iter().all(|r| r.score.is_none() && r.positions.is_empty()));

        let blank = search(&icons, "  \t ", &Filters::default());
        assert_eq!(names(&blank), names(&results));
    }

    #[test]
    fn test_new_only_is_exact_subset() {
        let icons = vec![
            icon("Teams/Teams.png"),
            icon("Teams/2015-2019/OldTeams.png"),
            icon("Azure/Legacy/Azure.svg"),
            icon("Azure/Azure.svg"),
        ];
        let filters = Filters {
            new_only: true,
            ..Filters::default()
        };

        let results = search(&icons, "", &filters);
        let expected: Vec<_> = icons.iter().filter(|i| i.is_new()).collect();
        assert_eq!(results.len(), expected.len());
        assert!(results.iter().all(|r| r.icon.is_new()));
    }

    #[test]
    fn test_query_matches_and_ranks() {
        let icons = vec![
            icon("Azure/Azure.svg"),
            icon("Teams/Chat.png"),
            icon("Office/Teams.png"),
        ];

        let results = search(&icons, "Teams", &Filters::default());
        assert_eq!(names(&results), ["Office/Teams.png", "Teams/Chat.png"]);
        assert_eq!(results[0].positions, vec![0, 1, 2, 3, 4]);
        assert!(results[0].score.unwrap() > results[1].score.unwrap());
    }

    #[test]
    fn test_typo_tolerated() {
        let icons = vec![icon("Teams/Teams.png"), icon("Azure/Azure.svg")];
        let results = search(&icons, "temas", &Filters::default());
        assert_eq!(names(&results), ["Teams/Teams.png"]);
    }

    #[test]
    fn test_filters_apply_before_matching() {
        let icons = vec![icon("Teams/Teams.png"), icon("Teams/Teams.svg")];
        let filters = Filters {
            file_type: FileType::Svg,
            ..Filters::default()
        };
        let results = search(&icons, "teams", &filters);
        assert_eq!(names(&results), ["Teams/Teams.svg"]);
    }

    #[test]
    fn test_near_tie_prefers_new() {
        let icons = vec![icon("Teams/2015-2019/Teams.png"), icon("Teams/Teams.png")];
        let results = search(&icons, "teams", &Filters::default());
        assert_eq!(names(&results), ["Teams/Teams.png", "Teams/2015-2019/Teams.png"]);
    }

    #[test]
    fn test_clear_winner_not_reordered() {
        let icons = vec![icon("Teams/Chat.png"), icon("Office/Legacy/Teams.png")];
        let results = search(&icons, "teams", &Filters::default());
        assert_eq!(names(&results), ["Office/Legacy/Teams.png", "Teams/Chat.png"]);
    }

    #[test]
    fn test_tie_break_is_partial() {
        let icons = [
            icon("A/Legacy/Teams.png"),
            icon("B/Legacy/Teams.png"),
            icon("C/Teams.png"),
        ];
        let mut results: Vec<SearchResult<'_>> = icons
            .iter()
            .map(|icon| SearchResult {
                icon,
                score: Some(1.0),
                positions: Vec::new(),
            })
            .collect();

        prefer_new_on_ties(&mut results);
        // The new icon moves up one place only
        assert_eq!(
            names(&results),
            ["A/Legacy/Teams.png", "C/Teams.png", "B/Legacy/Teams.png"]
        );
    }

    #[test]
    fn test_categories() {
        let icons = vec![icon("Teams/a.png"), icon("Azure/b.svg"), icon("Teams/c.png"), icon("d.png")];
        assert_eq!(categories(&icons), ["Azure", "Other", "Teams"]);
    }
}
