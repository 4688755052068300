// Icon records and recent-change entries.
// Derives every record field from the repository path alone.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::github::{EntryKind, TreeResponse};

/// Category for files that sit at the repository root.
pub const DEFAULT_CATEGORY: &str = "Other";

/// File suffixes treated as icons.
pub const IMAGE_EXTENSIONS: [&str; 2] = ["png", "svg"];

/// One discovered image file and its derived metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconRecord {
    /// Repository-relative path; unique across a listing.
    pub path: String,
    pub filename: String,
    pub category: String,
    /// Lower-cased suffix, `png` or `svg`.
    pub extension: String,
    #[serde(default)]
    pub size: u64,
    pub raw_url: String,
    /// Filename without extension, separators as spaces, lower-cased.
    pub product_name: String,
    pub is_legacy: bool,
}

impl IconRecord {
    /// Build a record from a repository path. Returns `None` for non-image files.
    pub fn from_path(path: &str, size: Option<u64>, raw_base: &str, current_year: i32) -> Option<Self> {
        let filename = path.rsplit('/').next().unwrap_or(path);
        let (stem, extension) = filename.rsplit_once('.')?;
        let extension = extension.to_ascii_lowercase();
        if !IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            return None;
        }

        Some(Self {
            path: path.to_string(),
            filename: filename.to_string(),
            category: category_of(path),
            extension,
            size: size.unwrap_or(0),
            raw_url: raw_url(raw_base, path),
            product_name: product_name(stem),
            is_legacy: is_legacy(path, current_year),
        })
    }

    /// Current (non-legacy) icons.
    pub fn is_new(&self) -> bool {
        !self.is_legacy
    }
}

/// Direct content URL: the raw base followed by the path.
pub fn raw_url(raw_base: &str, path: &str) -> String {
    format!("{}{}", raw_base, path)
}

/// First path segment, or the catch-all category when there is none.
pub fn category_of(path: &str) -> String {
    match path.split_once('/') {
        Some((first, _)) if !first.is_empty() => first.to_string(),
        _ => DEFAULT_CATEGORY.to_string(),
    }
}

fn product_name(stem: &str) -> String {
    stem.chars()
        .map(|c| match c {
            '-' | '_' | '.' => ' ',
            _ => c,
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Legacy if the path carries a "legacy" marker or a year range that has ended.
pub fn is_legacy(path: &str, current_year: i32) -> bool {
    if path.to_lowercase().contains("legacy") {
        return true;
    }
    first_year_range(path).is_some_and(|(_, end)| end < current_year)
}

/// First `YYYY-YYYY` group in the string.
fn first_year_range(s: &str) -> Option<(i32, i32)> {
    let bytes = s.as_bytes();
    let year = |b: &[u8]| -> Option<i32> {
        if b.iter().all(u8::is_ascii_digit) {
            std::str::from_utf8(b).ok()?.parse().ok()
        } else {
            None
        }
    };

    bytes.windows(9).find_map(|w| {
        if w[4] != b'-' {
            return None;
        }
        Some((year(&w[..4])?, year(&w[5..])?))
    })
}

/// Map a tree listing to image records, skipping directories and non-images.
pub fn records_from_tree(tree: &TreeResponse, raw_base: &str, current_year: i32) -> Vec<IconRecord> {
    tree.tree
        .iter()
        .filter(|entry| entry.kind == EntryKind::Blob)
        .filter_map(|entry| IconRecord::from_path(&entry.path, entry.size, raw_base, current_year))
        .collect()
}

/// A recently modified icon file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentChange {
    pub path: String,
    /// Commit authorship timestamp.
    pub date: DateTime<Utc>,
    /// First line of the commit message.
    pub message: String,
}

/// Recent changes keyed by filename.
pub type RecentChanges = HashMap<String, RecentChange>;

/// Whether a changed path refers to an icon file.
pub fn is_image_path(path: &str) -> bool {
    path.rsplit_once('.')
        .is_some_and(|(_, ext)| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}
