//! Regenerate the post index

use anyhow::Result;
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use std::time::Duration;

use crate::Weblog;

/// Rebuild the index once
pub fn run(blog: &Weblog) -> Result<()> {
    let report = blog.regenerate()?;

    for collision in &report.collisions {
        println!(
            "warning: {} and {} share {}; {} is not reachable by date",
            collision.displaced,
            collision.kept,
            collision.date.format("%Y.%m.%d"),
            collision.displaced
        );
    }
    println!(
        "Indexed {} posts into {:?}",
        report.index.len(),
        blog.index_path
    );

    Ok(())
}

/// Rebuild the index whenever the posts directory changes
pub fn watch(blog: &Weblog) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();

    // Create debouncer to avoid multiple rapid rebuilds
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;
    debouncer
        .watcher()
        .watch(&blog.posts_dir, RecursiveMode::NonRecursive)?;

    tracing::info!(
        "Watching {:?} for changes. Press Ctrl+C to stop.",
        blog.posts_dir
    );

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                // Editors leave swap and backup files behind
                let relevant = events.iter().any(|e| {
                    let name = e
                        .path
                        .file_name()
                        .map(|n| n.to_string_lossy())
                        .unwrap_or_default();
                    !name.starts_with('.') && !name.ends_with('~')
                });
                if !relevant {
                    continue;
                }

                tracing::info!("Posts changed, regenerating index...");
                if let Err(e) = run(blog) {
                    tracing::error!("Regeneration failed: {}", e);
                }
            }
            Ok(Err(e)) => {
                tracing::warn!("Watch error: {:?}", e);
            }
            Err(_) => break,
        }
    }

    Ok(())
}
