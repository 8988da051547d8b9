//! Post and page metadata models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::FrontMatter;
use crate::error::{Error, Result};

/// Date format used by post front-matter
pub const DATE_FORMAT: &str = "%Y.%m.%d";

/// Placeholder post name for errors raised before the post id is known
pub(crate) const UNNAMED: &str = "<input>";

/// Validated metadata of a single post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMeta {
    /// Post title
    pub title: String,

    /// Tags in declaration order, trimmed, case preserved
    pub tags: Vec<String>,

    /// Publication date
    pub date: NaiveDate,
}

impl PostMeta {
    /// Validate front-matter into post metadata.
    ///
    /// `title`, `tags` and `date` are all required; `date` must be `YYYY.MM.DD`.
    pub fn from_front_matter(fm: &FrontMatter) -> Result<Self> {
        let title = required(fm, "title")?;
        let tags = split_tags(required(fm, "tags")?);
        let raw_date = required(fm, "date")?;
        let date = parse_date(raw_date).ok_or_else(|| Error::InvalidDate {
            post: UNNAMED.to_string(),
            value: raw_date.to_string(),
        })?;

        Ok(Self {
            title: title.to_string(),
            tags,
            date,
        })
    }
}

/// Metadata of a static page, which only needs a title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub title: String,
}

impl PageMeta {
    pub fn from_front_matter(fm: &FrontMatter) -> Result<Self> {
        Ok(Self {
            title: required(fm, "title")?.to_string(),
        })
    }
}

fn required<'a>(fm: &'a FrontMatter, field: &'static str) -> Result<&'a str> {
    fm.get(field).ok_or_else(|| Error::MetadataMissing {
        post: UNNAMED.to_string(),
        field,
    })
}

/// Split a comma-separated tag list, trimming each tag and dropping empties
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a `YYYY.MM.DD` date
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(content: &str) -> Result<PostMeta> {
        let (fm, _) = FrontMatter::parse(content);
        PostMeta::from_front_matter(&fm)
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2021.03.05"),
            NaiveDate::from_ymd_opt(2021, 3, 5)
        );
        assert_eq!(parse_date("2021-03-05"), None);
        assert_eq!(parse_date("2021.02.30"), None);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn test_split_tags() {
        assert_eq!(split_tags(" go,  infra ,Go"), vec!["go", "infra", "Go"]);
        assert_eq!(split_tags("solo"), vec!["solo"]);
        assert!(split_tags(" , ").is_empty());
    }

    #[test]
    fn test_post_meta() {
        let meta = meta("title: Hello\ntags: go, infra\ndate: 2021.01.01\n\nbody").unwrap();
        assert_eq!(meta.title, "Hello");
        assert_eq!(meta.tags, vec!["go", "infra"]);
        assert_eq!(meta.date, NaiveDate::from_ymd_opt(2021, 1, 1).unwrap());
    }

    #[test]
    fn test_missing_field() {
        let err = meta("title: Hello\ndate: 2021.01.01\n\nbody").unwrap_err();
        assert!(matches!(err, Error::MetadataMissing { field: "tags", .. }));

        let err = meta("no front matter here").unwrap_err();
        assert!(matches!(err, Error::MetadataMissing { field: "title", .. }));
    }

    #[test]
    fn test_malformed_date() {
        let err = meta("title: Hello\ntags: a\ndate: 2021-03-05\n\nbody").unwrap_err();
        match err {
            Error::InvalidDate { value, .. } => assert_eq!(value, "2021-03-05"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_page_meta_needs_only_title() {
        let (fm, _) = FrontMatter::parse("title: About\n\nHi.");
        assert_eq!(PageMeta::from_front_matter(&fm).unwrap().title, "About");
    }
}
