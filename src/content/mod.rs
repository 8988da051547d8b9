//! Content module - front-matter, math protection and markdown rendering

mod frontmatter;
pub mod loader;
mod markdown;
pub mod math;
mod post;
mod render;

pub use frontmatter::FrontMatter;
pub use markdown::MarkdownRenderer;
pub use post::{parse_date, split_tags, PageMeta, PostMeta, DATE_FORMAT};
pub use render::{ContentRenderer, RenderedPage, RenderedPost};
