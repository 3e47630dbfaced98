//! User-story metadata derived from a scenario's category.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config;
use crate::model::Scenario;

/// The `userStory` object attached to each scenario report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStory {
    pub id: String,
    pub story_name: String,
    pub path: PathBuf,
    #[serde(rename = "type")]
    pub story_type: String,
}

impl UserStory {
    /// Derive the story for a scenario: slugged category as id, source
    /// path relative to the configured working directory.
    pub fn from_scenario(scenario: &Scenario) -> Self {
        Self {
            id: slugify(&scenario.category),
            story_name: scenario.category.clone(),
            path: relative_to_working_dir(&scenario.path),
            story_type: config::story_type(),
        }
    }
}

/// Make a path relative to the working directory when it lives under it
fn relative_to_working_dir(path: &Path) -> PathBuf {
    let base = config::working_dir();
    path.strip_prefix(&base)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Turn a category name into a URL-safe lowercase token.
///
/// Splits camelCase boundaries with a hyphen, collapses runs of
/// whitespace and non-word characters into a single hyphen, trims
/// leading/trailing hyphens and lowercases. Idempotent.
pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    let mut prev_lower = false;
    let mut pending_hyphen = false;

    for c in input.chars() {
        let is_word = c.is_ascii_alphanumeric() || c == '_';
        if !is_word {
            if !out.is_empty() {
                pending_hyphen = true;
            }
            prev_lower = false;
            continue;
        }
        if c.is_ascii_uppercase() && prev_lower {
            pending_hyphen = true;
        }
        if pending_hyphen {
            out.push('-');
            pending_hyphen = false;
        }
        out.push(c.to_ascii_lowercase());
        prev_lower = c.is_ascii_lowercase();
    }

    out
}
