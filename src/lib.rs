//! weblog: a minimal blog content engine
//!
//! This crate keeps a persisted index over a directory of markdown posts
//! (tags, titles, dates), renders single posts to HTML with their math left
//! intact, and finds related posts by shared tag.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod index;
pub mod related;

use serde::Serialize;
use std::path::{Path, PathBuf};

pub use error::{Error, Result};

use content::{loader, ContentRenderer, RenderedPage, RenderedPost};
use index::{BuildReport, IndexCache, LoadedIndex, PostSummary};
use related::{RelatedOptions, RelatedPosts};

/// A rendered post together with its related posts
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub id: String,
    pub post: RenderedPost,
    pub related: RelatedPosts,
}

/// A blog rooted at a directory
pub struct Weblog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Post sources
    pub posts_dir: PathBuf,
    /// Static markdown pages
    pub pages_dir: PathBuf,
    /// Persisted index artifact
    pub index_path: PathBuf,
    renderer: ContentRenderer,
    cache: IndexCache,
}

impl Weblog {
    /// Open a blog directory, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let config_path = base_dir.as_ref().join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Open a blog directory with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let posts_dir = base_dir.join(&config.posts_dir);
        let pages_dir = base_dir.join(&config.pages_dir);
        let index_path = base_dir.join(&config.meta_dir).join(&config.index_file);

        Self {
            renderer: ContentRenderer::new(&config),
            cache: IndexCache::new(&index_path),
            config,
            base_dir,
            posts_dir,
            pages_dir,
            index_path,
        }
    }

    /// Rebuild the index from the posts directory and persist it
    pub fn regenerate(&self) -> Result<BuildReport> {
        let report = index::build(&self.posts_dir, &self.index_path, &self.config)?;
        self.cache.invalidate();
        Ok(report)
    }

    /// The latest persisted index
    pub fn load_index(&self) -> Result<std::sync::Arc<LoadedIndex>> {
        self.cache.get()
    }

    /// Home page rows, newest first
    pub fn home(&self) -> Result<Vec<PostSummary>> {
        Ok(self.load_index()?.summaries())
    }

    /// Read and render one post
    pub fn render_post(&self, id: &str) -> Result<RenderedPost> {
        let text = loader::read_source(&self.posts_dir, id)?;
        self.renderer
            .render_post(&text)
            .map_err(|e| e.for_post(id))
    }

    /// Render a post and resolve its related posts against the index
    pub fn post_view(&self, id: &str) -> Result<PostView> {
        let post = self.render_post(id)?;
        let loaded = self.load_index()?;

        let options = RelatedOptions {
            limit: self.config.related_article_list_size,
            exclude: self.config.exclude_current_post.then_some(id),
        };
        let related = related::related_posts(&loaded.index, &post.meta.tags, &options);

        Ok(PostView {
            id: id.to_string(),
            post,
            related,
        })
    }

    /// Read and render a static page
    pub fn render_page(&self, name: &str) -> Result<RenderedPage> {
        let text = loader::read_source(&self.pages_dir, name)?;
        self.renderer
            .render_page(&text)
            .map_err(|e| e.for_post(name))
    }
}
