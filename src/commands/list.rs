//! List indexed content

use anyhow::Result;

use crate::Weblog;

/// List posts or tags from the persisted index
pub fn run(blog: &Weblog, content_type: &str) -> Result<()> {
    let loaded = blog.load_index()?;

    match content_type {
        "post" | "posts" => {
            let rows = loaded.summaries();
            println!("Posts ({}):", rows.len());
            for row in rows {
                println!(
                    "  {} - {} [{}] ({})",
                    row.date.format("%Y.%m.%d"),
                    row.title,
                    row.id,
                    row.tags.join(", ")
                );
            }
            let hidden = loaded.displaced_count();
            if hidden > 0 {
                println!("  ({} posts share a date with another post)", hidden);
            }
        }
        "tag" | "tags" => {
            let mut tags: Vec<_> = loaded
                .index
                .by_tag
                .iter()
                .map(|(tag, ids)| (tag.as_str(), ids.len()))
                .collect();
            tags.sort_by(|a, b| b.1.cmp(&a.1));
            println!("Tags ({}):", tags.len());
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, tag", content_type);
        }
    }

    Ok(())
}
