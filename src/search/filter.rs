// Record filters and default ordering.
// Category, file-type, and recency constraints compose by intersection.

use std::cmp::Ordering;

use crate::catalog::IconRecord;

/// File-type constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum FileType {
    #[default]
    All,
    Png,
    Svg,
}

impl FileType {
    /// Required extension, or `None` for no constraint.
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            FileType::All => None,
            FileType::Png => Some("png"),
            FileType::Svg => Some("svg"),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FileType::All => "All",
            FileType::Png => "PNG",
            FileType::Svg => "SVG",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            FileType::All => FileType::Png,
            FileType::Png => FileType::Svg,
            FileType::Svg => FileType::All,
        }
    }
}

/// Current filter selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    /// Exact category to keep, or every category when `None`.
    pub category: Option<String>,
    pub file_type: FileType,
    /// Keep only non-legacy icons.
    pub new_only: bool,
}

impl Filters {
    pub fn matches(&self, icon: &IconRecord) -> bool {
        if let Some(category) = &self.category {
            if icon.category != *category {
                return false;
            }
        }
        if let Some(ext) = self.file_type.extension() {
            if icon.extension != ext {
                return false;
            }
        }
        !self.new_only || icon.is_new()
    }
}

/// Ordering used when there is no query: new icons first, then by filename.
pub fn default_order(a: &IconRecord, b: &IconRecord) -> Ordering {
    b.is_new()
        .cmp(&a.is_new())
        .then_with(|| a.filename.cmp(&b.filename))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn icon(path: &str) -> IconRecord {
        IconRecord::from_path(path, None, "https://raw.example/", 2026).unwrap()
    }

    #[test]
    fn test_file_type_cycle() {
        assert_eq!(FileType::All.next(), FileType::Png);
        assert_eq!(FileType::Png.next(), FileType::Svg);
        assert_eq!(FileType::Svg.next(), FileType::All);
    }

    #[test]
    fn test_filters_intersect() {
        let icons = [
            icon("Teams/Teams.png"),
            icon("Teams/Teams.svg"),
            icon("Teams/2015-2019/Teams.svg"),
            icon("Azure/Azure.svg"),
        ];

        let filters = Filters {
            category: Some("Teams".to_string()),
            file_type: FileType::Svg,
            new_only: true,
        };
        let kept: Vec<_> = icons.iter().filter(|i| filters.matches(i)).collect();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].path, "Teams/Teams.svg");

        let everything = Filters::default();
        assert!(icons.iter().all(|i| everything.matches(i)));
    }

    #[test]
    fn test_default_order() {
        let mut icons = [
            icon("X/2010-2012/A.png"),
            icon("X/C.png"),
            icon("X/B.png"),
        ];
        icons.sort_by(default_order);
        let names: Vec<_> = icons.iter().map(|i| i.filename.as_str()).collect();
        assert_eq!(names, ["B.png", "C.png", "A.png"]);
    }
}
