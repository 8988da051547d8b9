//! Render a single post

use anyhow::Result;

use crate::Weblog;

/// Render `id` and print its HTML and related posts
pub fn run(blog: &Weblog, id: &str, json: bool) -> Result<()> {
    let view = blog.post_view(id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    let meta = &view.post.meta;
    println!(
        "<!-- {} | {} | {} -->",
        meta.title,
        meta.date.format("%Y.%m.%d"),
        meta.tags.join(", ")
    );
    println!("{}", view.post.html);

    if !view.related.is_empty() {
        println!("<!-- related -->");
        for (related_id, title) in &view.related {
            println!("<!--   {}: {} -->", related_id, title);
        }
    }

    Ok(())
}
