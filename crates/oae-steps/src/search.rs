//! General search queries and result parsing.

use oae_core::TagName;
use serde::Deserialize;
use serde_json::Value;

/// Path of the general search feed.
pub const GENERAL_SEARCH_PATH: &str = "/var/search/general.json";

/// Result field holding a pooled item's file name.
pub const FILE_NAME_FIELD: &str = "sakai:pooled-content-file-name";

/// Query pairs searching for content tagged `tag`, best match first.
#[must_use]
pub fn tag_query(tag: &TagName) -> [(&'static str, &str); 7] {
    [
        ("q", tag.as_str()),
        ("tags", ""),
        ("sortOn", "score"),
        ("sortOrder", "desc"),
        ("page", "0"),
        ("items", "18"),
        ("_charset_", "utf-8"),
    ]
}

/// Body of a search response.
///
/// Only `results` is required; any other top-level fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResults {
    /// One entry per hit, in server order
    pub results: Vec<SearchHit>,
}

/// One search hit.
///
/// Hits are not all pooled files; the file name may be absent.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "sakai:pooled-content-file-name", default)]
    file_name: Option<Value>,
}

impl SearchHit {
    /// Returns the pooled file name, if the hit has a textual one.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_ref().and_then(Value::as_str)
    }
}

impl SearchResults {
    /// Returns `true` if any hit has exactly `title` as its file name.
    #[must_use]
    pub fn contains_file(&self, title: &str) -> bool {
        self.results.iter().any(|hit| hit.file_name() == Some(title))
    }
}
