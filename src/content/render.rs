//! Post rendering: front-matter, math protection and markdown in one pass

use serde::Serialize;

use super::math::MathExtractor;
use super::{FrontMatter, MarkdownRenderer, PageMeta, PostMeta};
use crate::config::SiteConfig;
use crate::error::Result;

/// A rendered post and the metadata read from its own front-matter
#[derive(Debug, Clone, Serialize)]
pub struct RenderedPost {
    pub html: String,
    pub meta: PostMeta,
    /// Whether any math span was found, so the page knows to load MathJax
    pub has_math: bool,
}

/// A rendered static page
#[derive(Debug, Clone, Serialize)]
pub struct RenderedPage {
    pub html: String,
    pub meta: PageMeta,
    pub has_math: bool,
}

/// Turns raw post text into HTML. Pure: no filesystem access.
pub struct ContentRenderer {
    markdown: MarkdownRenderer,
    math: MathExtractor,
}

impl ContentRenderer {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            markdown: MarkdownRenderer::with_options(&config.highlight),
            math: MathExtractor::new(&config.math),
        }
    }

    /// Render a post. Missing or malformed front-matter is an error.
    pub fn render_post(&self, text: &str) -> Result<RenderedPost> {
        let (fm, body) = FrontMatter::parse(text);
        let meta = PostMeta::from_front_matter(&fm)?;
        let (html, has_math) = self.render_body(body);
        Ok(RenderedPost {
            html,
            meta,
            has_math,
        })
    }

    /// Render a static page, which only needs a title
    pub fn render_page(&self, text: &str) -> Result<RenderedPage> {
        let (fm, body) = FrontMatter::parse(text);
        let meta = PageMeta::from_front_matter(&fm)?;
        let (html, has_math) = self.render_body(body);
        Ok(RenderedPage {
            html,
            meta,
            has_math,
        })
    }

    fn render_body(&self, body: &str) -> (String, bool) {
        let protected = self.math.protect(body);
        let html = self.markdown.render(&protected.text);
        (protected.restore(&html), protected.span_count() > 0)
    }
}

impl Default for ContentRenderer {
    fn default() -> Self {
        Self::new(&SiteConfig::default())
    }
}
