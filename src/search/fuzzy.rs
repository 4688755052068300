// Fuzzy matching engine.
// Weighted per-field similarity via strsim, highlight positions via fuzzy-matcher.

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use strsim::jaro_winkler;

use crate::catalog::IconRecord;

/// Relative importance of each searchable field.
#[derive(Debug, Clone, Copy)]
pub struct FieldWeights {
    pub filename: f64,
    pub path: f64,
    pub product_name: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            filename: 1.0,
            path: 0.8,
            product_name: 0.7,
        }
    }
}

/// Matcher configuration. Scores are on a 0-to-1 scale, higher is better.
#[derive(Debug, Clone, Copy)]
pub struct FuzzyOptions {
    /// Minimum relevance for a record to match.
    pub threshold: f64,
    /// Queries shorter than this never match.
    pub min_match_chars: usize,
    pub weights: FieldWeights,
    /// Score lost by a substring hit at the very end of a field versus one at
    /// the start; scales linearly with the hit position.
    pub substring_penalty: f64,
    /// Multiplier on strsim's jaro-winkler score for non-substring matches.
    /// Below 1.0 so a typo never outranks a substring hit.
    pub approximate_ceiling: f64,
}

impl FuzzyOptions {
    /// Options for the primary search.
    pub fn strict() -> Self {
        Self {
            threshold: 0.65,
            min_match_chars: 2,
            weights: FieldWeights::default(),
            substring_penalty: 0.2,
            approximate_ceiling: 0.9,
        }
    }

    /// Options for "did you mean" suggestions.
    pub fn lenient() -> Self {
        Self {
            threshold: 0.45,
            ..Self::strict()
        }
    }

    /// Similarity of a lower-cased query to a field: a substring hit scores
    /// near 1.0, anything else is strsim's jaro-winkler over the field and its
    /// tokens, scaled by `approximate_ceiling`.
    pub fn similarity(&self, query: &str, field: &str) -> f64 {
        if query.is_empty() || field.is_empty() {
            return 0.0;
        }
        let field = field.to_lowercase();

        if let Some(pos) = field.find(query) {
            return 1.0 - self.substring_penalty * (pos as f64 / field.len() as f64);
        }

        let best_token = field
            .split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
            .map(|token| jaro_winkler(query, token))
            .fold(0.0, f64::max);

        jaro_winkler(query, &field).max(best_token) * self.approximate_ceiling
    }
}

pub struct FuzzyEngine {
    options: FuzzyOptions,
    matcher: SkimMatcherV2,
}

impl FuzzyEngine {
    pub fn new(options: FuzzyOptions) -> Self {
        Self {
            options,
            matcher: SkimMatcherV2::default().ignore_case(),
        }
    }

    fn accepts(&self, query: &str) -> bool {
        query.chars().count() >= self.options.min_match_chars
    }

    /// Weighted relevance of an icon, or `None` below the threshold.
    pub fn score_icon(&self, query: &str, icon: &IconRecord) -> Option<f64> {
        if !self.accepts(query) {
            return None;
        }
        let w = self.options.weights;
        let max_weight = w.filename.max(w.path).max(w.product_name);

        let score = [
            (self.options.similarity(query, &icon.filename), w.filename),
            (self.options.similarity(query, &icon.path), w.path),
            (self.options.similarity(query, &icon.product_name), w.product_name),
        ]
        .into_iter()
        .map(|(sim, weight)| sim * weight / max_weight)
        .fold(0.0, f64::max);

        (score >= self.options.threshold).then_some(score)
    }

    /// Relevance of a bare string, or `None` below the threshold.
    pub fn score_text(&self, query: &str, text: &str) -> Option<f64> {
        if !self.accepts(query) {
            return None;
        }
        let score = self.options.similarity(query, text);
        (score >= self.options.threshold).then_some(score)
    }

    /// Character positions in `text` to highlight for `query`.
    pub fn positions(&self, query: &str, text: &str) -> Vec<usize> {
        self.matcher
            .fuzzy_indices(text, query)
            .map(|(_, indices)| indices)
            .unwrap_or_default()
    }
}
