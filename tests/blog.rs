use chrono::NaiveDate;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use weblog::config::SiteConfig;
use weblog::content::{split_tags, ContentRenderer};
use weblog::related::{related_posts, RelatedOptions};
use weblog::{Error, Weblog};

fn write_post(dir: &Path, id: &str, title: &str, tags: &str, date: &str, body: &str) {
    let posts = dir.join("posts");
    fs::create_dir_all(&posts).unwrap();
    fs::write(
        posts.join(id),
        format!("title: {title}\ntags: {tags}\ndate: {date}\n\n{body}\n"),
    )
    .unwrap();
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn build_then_load_matches_direct_parse() {
    let dir = TempDir::new().unwrap();
    let posts = [
        ("a.md", "Alpha", "go, infra", "2021.01.01"),
        ("b.md", "Beta", "infra", "2021.01.02"),
        ("c.md", "Gamma", " Rust ,go ", "2020.12.31"),
    ];
    for (id, title, tags, day) in posts {
        write_post(dir.path(), id, title, tags, day, "Some text.");
    }

    let blog = Weblog::new(dir.path()).unwrap();
    let report = blog.regenerate().unwrap();
    assert!(report.collisions.is_empty());

    let loaded = blog.load_index().unwrap();
    assert_eq!(loaded.index, report.index);

    for (id, title, tags, _) in posts {
        assert_eq!(loaded.index.title(id), Some(title));
        let own_tags = split_tags(tags);
        for (tag, ids) in &loaded.index.by_tag {
            assert_eq!(
                ids.contains(&id.to_string()),
                own_tags.contains(tag),
                "{} membership in {}",
                id,
                tag
            );
        }
    }

    let order: Vec<_> = loaded.newest_first.iter().map(|(_, id)| id.as_str()).collect();
    assert_eq!(order, vec!["b.md", "a.md", "c.md"]);
    assert_eq!(loaded.newest_first[0].0, date(2021, 1, 2));

    let home = blog.home().unwrap();
    assert_eq!(home[0].title, "Beta");
    assert_eq!(home[2].tags, vec!["Rust", "go"]);
    assert_eq!(home[2].summary, "Some text.");
}

#[test]
fn related_scenario_from_two_posts() {
    let dir = TempDir::new().unwrap();
    write_post(dir.path(), "A", "titleA", "go, infra", "2021.01.01", "a");
    write_post(dir.path(), "B", "titleB", "infra", "2021.01.02", "b");

    let blog = Weblog::new(dir.path()).unwrap();
    blog.regenerate().unwrap();
    let loaded = blog.load_index().unwrap();

    let five = RelatedOptions {
        limit: 5,
        exclude: None,
    };
    let related = related_posts(&loaded.index, &["infra"], &five);
    assert_eq!(related.len(), 2);
    assert_eq!(related["A"], "titleA");
    assert_eq!(related["B"], "titleB");

    let one = RelatedOptions {
        limit: 1,
        exclude: None,
    };
    let related = related_posts(&loaded.index, &["infra"], &one);
    assert_eq!(related.len(), 1);
    assert_eq!(related["A"], "titleA");
}

#[test]
fn same_date_keeps_last_scanned() {
    let dir = TempDir::new().unwrap();
    write_post(dir.path(), "first.md", "First", "x", "2021.05.01", "1");
    write_post(dir.path(), "second.md", "Second", "x", "2021.05.01", "2");

    let blog = Weblog::new(dir.path()).unwrap();
    let report = blog.regenerate().unwrap();

    assert_eq!(report.collisions.len(), 1);
    assert_eq!(report.collisions[0].kept, "second.md");
    assert_eq!(report.collisions[0].displaced, "first.md");

    let loaded = blog.load_index().unwrap();
    assert_eq!(loaded.index.by_date[&date(2021, 5, 1)], "second.md");
    assert_eq!(loaded.newest_first.len(), 1);
    assert_eq!(loaded.index.len(), 2);
}

#[test]
fn bad_post_aborts_build_and_keeps_previous_index() {
    let dir = TempDir::new().unwrap();
    write_post(dir.path(), "good.md", "Good", "x", "2021.01.01", "ok");

    let blog = Weblog::new(dir.path()).unwrap();
    blog.regenerate().unwrap();

    write_post(dir.path(), "later.md", "Later", "x", "2021-03-05", "bad date");
    match blog.regenerate() {
        Err(Error::InvalidDate { post, value }) => {
            assert_eq!(post, "later.md");
            assert_eq!(value, "2021-03-05");
        }
        other => panic!("unexpected result: {other:?}"),
    }

    // The last good artifact is untouched
    let loaded = blog.load_index().unwrap();
    assert_eq!(loaded.index.len(), 1);
    assert_eq!(loaded.index.title("good.md"), Some("Good"));
}

#[test]
fn load_without_build_is_unavailable() {
    let dir = TempDir::new().unwrap();
    let blog = Weblog::new(dir.path()).unwrap();

    let err = blog.load_index().unwrap_err();
    assert!(err.is_index_unavailable());
}

#[test]
fn post_view_renders_and_resolves() {
    let dir = TempDir::new().unwrap();
    write_post(dir.path(), "a.md", "Alpha", "math", "2021.01.01", "We have $x^2$.");
    write_post(dir.path(), "b.md", "Beta", "math", "2021.01.02", "And $y_1 * y_2$.");

    let blog = Weblog::new(dir.path()).unwrap();
    blog.regenerate().unwrap();

    let view = blog.post_view("a.md").unwrap();
    assert!(view.post.html.contains("$x^2$"));
    assert!(view.post.has_math);
    assert_eq!(view.post.meta.date, date(2021, 1, 1));
    assert_eq!(view.related.keys().collect::<Vec<_>>(), vec!["a.md", "b.md"]);

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["post"]["meta"]["title"], "Alpha");
}

#[test]
fn post_view_can_exclude_current_post() {
    let dir = TempDir::new().unwrap();
    write_post(dir.path(), "a.md", "Alpha", "t", "2021.01.01", "a");
    write_post(dir.path(), "b.md", "Beta", "t", "2021.01.02", "b");

    let config = SiteConfig {
        exclude_current_post: true,
        related_article_list_size: 1,
        ..Default::default()
    };
    let blog = Weblog::with_config(dir.path(), config);
    blog.regenerate().unwrap();

    let view = blog.post_view("a.md").unwrap();
    assert_eq!(view.related.keys().collect::<Vec<_>>(), vec!["b.md"]);
}

#[test]
fn missing_post_is_not_found() {
    let dir = TempDir::new().unwrap();
    write_post(dir.path(), "a.md", "Alpha", "t", "2021.01.01", "a");
    let blog = Weblog::new(dir.path()).unwrap();

    assert!(matches!(
        blog.render_post("nope.md"),
        Err(Error::SourceFileMissing { .. })
    ));
}

#[test]
fn config_file_is_honoured() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("_config.yml"),
        "posts_dir: articles\nmeta_dir: cache\nindex_file: meta.json\n",
    )
    .unwrap();
    let articles = dir.path().join("articles");
    fs::create_dir(&articles).unwrap();
    fs::write(
        articles.join("p.md"),
        "title: P\ntags: t\ndate: 2022.02.02\n\nbody",
    )
    .unwrap();

    let blog = Weblog::new(dir.path()).unwrap();
    blog.regenerate().unwrap();
    assert!(dir.path().join("cache").join("meta.json").is_file());
    assert_eq!(blog.load_index().unwrap().index.len(), 1);
}

#[test]
fn static_page_renders_with_title_only() {
    let dir = TempDir::new().unwrap();
    let pages = dir.path().join("static-md");
    fs::create_dir(&pages).unwrap();
    fs::write(pages.join("about.md"), "title: About\n\nHello *there*.\n").unwrap();

    let blog = Weblog::new(dir.path()).unwrap();
    let page = blog.render_page("about.md").unwrap();
    assert_eq!(page.meta.title, "About");
    assert!(page.html.contains("<em>there</em>"));
}

#[test]
fn math_survives_markdown_emphasis() {
    let renderer = ContentRenderer::default();
    let text = "title: M\ntags: m\ndate: 2021.01.01\n\nInline $x^2$ and $a_1 * b_1 * c_1$ here.\n";
    let rendered = renderer.render_post(text).unwrap();

    assert!(rendered.html.contains("$x^2$"));
    assert!(rendered.html.contains("$a_1 * b_1 * c_1$"));
    assert!(!rendered.html.contains("<em>"));
}
