//! Post index: tag, title and date views over every post
//!
//! The index is rebuilt wholesale by [`builder::build`] and persisted as one
//! JSON artifact by [`store`]. Readers only ever load it.

pub mod builder;
pub mod store;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use builder::{build, BuildReport, DateCollision};
pub use store::{load, save, IndexCache};

/// The persisted index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    /// Format version of the artifact
    pub version: u32,

    /// Tag -> post ids carrying it, in scan order
    pub by_tag: IndexMap<String, Vec<String>>,

    /// Post id -> title
    pub by_title: IndexMap<String, String>,

    /// Date -> post id. Only one post per date survives a build.
    pub by_date: BTreeMap<NaiveDate, String>,

    /// Post id -> its own tags
    pub per_post_tags: IndexMap<String, Vec<String>>,

    /// Post id -> leading excerpt of its body
    pub summaries: IndexMap<String, String>,
}

impl Index {
    /// Current artifact format version
    pub const VERSION: u32 = 1;

    pub fn new() -> Self {
        Self {
            version: Self::VERSION,
            by_tag: IndexMap::new(),
            by_title: IndexMap::new(),
            by_date: BTreeMap::new(),
            per_post_tags: IndexMap::new(),
            summaries: IndexMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.by_title.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_title.is_empty()
    }

    pub fn title(&self, id: &str) -> Option<&str> {
        self.by_title.get(id).map(|s| s.as_str())
    }

    /// Post ids tagged with `tag`, in scan order
    pub fn posts_tagged(&self, tag: &str) -> &[String] {
        self.by_tag.get(tag).map(|v| v.as_slice()).unwrap_or(&[])
    }
}

impl Default for Index {
    fn default() -> Self {
        Self::new()
    }
}

/// One row of the home page listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostSummary {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    pub tags: Vec<String>,
    pub summary: String,
}

/// An index as handed to readers, with its newest-first ordering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedIndex {
    pub index: Index,
    /// `by_date` entries, newest first
    pub newest_first: Vec<(NaiveDate, String)>,
}

impl LoadedIndex {
    pub fn new(index: Index) -> Self {
        let newest_first = index
            .by_date
            .iter()
            .rev()
            .map(|(date, id)| (*date, id.clone()))
            .collect();
        Self {
            index,
            newest_first,
        }
    }

    /// Posts left out of the date ordering because another post took their date
    pub fn displaced_count(&self) -> usize {
        self.index.len().saturating_sub(self.newest_first.len())
    }

    /// Home page rows, newest first
    pub fn summaries(&self) -> Vec<PostSummary> {
        self.newest_first
            .iter()
            .map(|(date, id)| PostSummary {
                id: id.clone(),
                title: self.index.title(id).unwrap_or_default().to_string(),
                date: *date,
                tags: self
                    .index
                    .per_post_tags
                    .get(id)
                    .cloned()
                    .unwrap_or_default(),
                summary: self.index.summaries.get(id).cloned().unwrap_or_default(),
            })
            .collect()
    }
}
