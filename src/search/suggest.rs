// "Did you mean" suggestions for searches with no results.

use std::fmt;

use crate::catalog::IconRecord;

use super::categories;
use super::fuzzy::{FuzzyEngine, FuzzyOptions};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suggestion {
    /// A leniently matching icon. `category` is set when it lives outside
    /// the selected category.
    Icon {
        filename: String,
        category: Option<String>,
    },
    /// The closest category name.
    Category(String),
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suggestion::Icon {
                filename,
                category: Some(category),
            } => write!(f, "Did you mean \"{}\" in {}?", filename, category),
            Suggestion::Icon {
                filename,
                category: None,
            } => write!(f, "Did you mean \"{}\"?", filename),
            Suggestion::Category(category) => write!(f, "Did you mean the {} category?", category),
        }
    }
}

/// Suggest an alternative over the whole unfiltered catalog.
pub fn suggest(icons: &[IconRecord], query: &str, selected_category: Option<&str>) -> Option<Suggestion> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }
    let engine = FuzzyEngine::new(FuzzyOptions::lenient());

    let best_icon = icons
        .iter()
        .filter_map(|icon| engine.score_icon(&query, icon).map(|score| (score, icon)))
        .reduce(|best, next| if next.0 > best.0 { next } else { best });

    if let Some((_, icon)) = best_icon {
        let elsewhere = selected_category.is_none_or(|selected| selected != icon.category);
        return Some(Suggestion::Icon {
            filename: icon.filename.clone(),
            category: elsewhere.then(|| icon.category.clone()),
        });
    }

    closest_category(&engine, &categories(icons), &query).map(Suggestion::Category)
}

fn closest_category(engine: &FuzzyEngine, categories: &[String], query: &str) -> Option<String> {
    categories
        .iter()
        .filter_map(|name| engine.score_text(query, name).map(|score| (score, name)))
        .reduce(|best, next| if next.0 > best.0 { next } else { best })
        .map(|(_, name)| name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn icon(path: &str) -> IconRecord {
        IconRecord::from_path(path, None, "https://raw.example/", 2026).unwrap()
    }

    fn catalog() -> Vec<IconRecord> {
        vec![
            icon("Teams/Teams.png"),
            icon("SharePoint/SharePoint.png"),
            icon("Azure/Azure.svg"),
        ]
    }

    #[test]
    fn test_suggests_icon_in_other_category() {
        let suggestion = suggest(&catalog(), "sharepont", Some("Teams")).unwrap();
        assert_eq!(
            suggestion,
            Suggestion::Icon {
                filename: "SharePoint.png".to_string(),
                category: Some("SharePoint".to_string()),
            }
        );
        assert_eq!(
            suggestion.to_string(),
            "Did you mean \"SharePoint.png\" in SharePoint?"
        );
    }

    #[test]
    fn test_same_category_omits_category() {
        let suggestion = suggest(&catalog(), "sharepont", Some("SharePoint")).unwrap();
        assert_eq!(
            suggestion,
            Suggestion::Icon {
                filename: "SharePoint.png".to_string(),
                category: None,
            }
        );
    }

    #[test]
    fn test_closest_category() {
        let engine = FuzzyEngine::new(FuzzyOptions::lenient());
        let names = vec!["Azure".to_string(), "Dynamics".to_string()];
        assert_eq!(
            closest_category(&engine, &names, "dynamix"),
            Some("Dynamics".to_string())
        );
        assert_eq!(closest_category(&engine, &names, "qqqq"), None);
    }

    #[test]
    fn test_nothing_matches() {
        assert_eq!(suggest(&catalog(), "zzzzqqq", None), None);
        assert_eq!(suggest(&catalog(), "   ", None), None);
    }
}
