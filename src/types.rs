//! City page entries discovered in the output tree

use serde::Serialize;

/// A discovered city page: display label plus the link used by the home page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityPage {
    /// Human-readable city name (e.g., "Chapel Hill, NC")
    pub label: String,
    /// POSIX-style path relative to the output directory's parent
    pub path: String,
}

impl CityPage {
    pub fn new(label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
        }
    }
}
