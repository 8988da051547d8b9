//! Related posts by shared tag

use indexmap::IndexMap;

use crate::index::Index;

/// Related post id -> title, in discovery order
pub type RelatedPosts = IndexMap<String, String>;

/// Options for [`related_posts`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelatedOptions<'a> {
    /// Maximum number of entries returned
    pub limit: usize,
    /// Post id to leave out, usually the post being viewed
    pub exclude: Option<&'a str>,
}

impl Default for RelatedOptions<'_> {
    fn default() -> Self {
        Self {
            limit: 5,
            exclude: None,
        }
    }
}

/// Collect up to `options.limit` posts sharing a tag with `tags`.
///
/// Tags are visited in the order given and each tag's posts in scan order.
/// Tags the index does not know yet are skipped. Without `exclude`, the
/// current post is returned like any other.
pub fn related_posts<S: AsRef<str>>(
    index: &Index,
    tags: &[S],
    options: &RelatedOptions<'_>,
) -> RelatedPosts {
    let mut related = RelatedPosts::new();

    for tag in tags {
        if related.len() >= options.limit {
            break;
        }

        let tag = tag.as_ref();
        let Some(ids) = index.by_tag.get(tag) else {
            tracing::debug!("Tag {:?} is not in the index", tag);
            continue;
        };

        for id in ids {
            if options.exclude == Some(id.as_str()) {
                continue;
            }
            match index.title(id) {
                Some(title) => {
                    related.insert(id.clone(), title.to_string());
                }
                None => tracing::debug!("Post {} is tagged {:?} but has no title", id, tag),
            }
            if related.len() >= options.limit {
                break;
            }
        }
    }

    related
}
