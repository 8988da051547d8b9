//! Index regeneration from the posts directory

use chrono::NaiveDate;
use serde::Serialize;
use std::fs;
use std::path::Path;

use super::{store, Index};
use crate::config::SiteConfig;
use crate::content::loader;
use crate::content::{FrontMatter, PostMeta};
use crate::error::{Error, Result};

/// Two posts claimed the same date; only `kept` stays in `by_date`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateCollision {
    pub date: NaiveDate,
    pub kept: String,
    pub displaced: String,
}

/// Outcome of a successful build
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub index: Index,
    pub collisions: Vec<DateCollision>,
}

/// Incrementally fed index under construction
#[derive(Debug, Default)]
pub struct IndexBuilder {
    index: Index,
    collisions: Vec<DateCollision>,
    summary_size: usize,
}

impl IndexBuilder {
    pub fn new(summary_size: usize) -> Self {
        Self {
            index: Index::new(),
            collisions: Vec::new(),
            summary_size,
        }
    }

    /// Add one post's source text. Metadata errors name the post.
    pub fn add_post(&mut self, id: &str, text: &str) -> Result<()> {
        let (fm, body) = FrontMatter::parse(text);
        let meta = PostMeta::from_front_matter(&fm).map_err(|e| e.for_post(id))?;
        self.add(id, meta, body);
        Ok(())
    }

    fn add(&mut self, id: &str, meta: PostMeta, body: &str) {
        let index = &mut self.index;

        index.by_title.insert(id.to_string(), meta.title);

        for tag in &meta.tags {
            index
                .by_tag
                .entry(tag.clone())
                .or_default()
                .push(id.to_string());
        }
        index.per_post_tags.insert(id.to_string(), meta.tags);
        index
            .summaries
            .insert(id.to_string(), summarize(body, self.summary_size));

        if let Some(previous) = index.by_date.insert(meta.date, id.to_string()) {
            tracing::warn!(
                "Posts {} and {} share the date {}; only {} stays reachable by date",
                previous,
                id,
                meta.date,
                id
            );
            self.collisions.push(DateCollision {
                date: meta.date,
                kept: id.to_string(),
                displaced: previous,
            });
        }
    }

    pub fn finish(self) -> BuildReport {
        BuildReport {
            index: self.index,
            collisions: self.collisions,
        }
    }
}

/// Scan every post in `posts_dir` and build the index in memory.
///
/// Any post with missing or malformed metadata aborts the whole scan.
pub fn scan(posts_dir: &Path, config: &SiteConfig) -> Result<BuildReport> {
    let mut builder = IndexBuilder::new(config.index_summary_size);

    for (id, path) in loader::list_sources(posts_dir)? {
        let text = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        builder.add_post(&id, &text)?;
        tracing::debug!("Indexed {}", id);
    }

    Ok(builder.finish())
}

/// Regenerate the index from `posts_dir` and persist it to `index_path`
pub fn build(posts_dir: &Path, index_path: &Path, config: &SiteConfig) -> Result<BuildReport> {
    let start = std::time::Instant::now();

    let report = scan(posts_dir, config)?;
    tracing::debug!("Index contents: {:#?}", report.index);

    store::save(&report.index, index_path)?;

    tracing::info!(
        "Indexed {} posts ({} tags, {} date collisions) in {:.2}s",
        report.index.len(),
        report.index.by_tag.len(),
        report.collisions.len(),
        start.elapsed().as_secs_f64()
    );

    Ok(report)
}

/// First `size` characters of the body, on a char boundary
fn summarize(body: &str, size: usize) -> String {
    let body = body.trim();
    match body.char_indices().nth(size) {
        Some((end, _)) => body[..end].to_string(),
        None => body.to_string(),
    }
}
