use std::fmt;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::{fs, io};
use std::io::ErrorKind;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::legacy::split_template_from_html;
use crate::template::normalizer::normalize;
use crate::template::PostTemplateData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
}

/// A post row as read from the database export.
///
/// Columns this crate does not use (styles, folders, owner) are kept untouched in `extra` so a
/// migrated record can be written back without losing them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub created_at: String,
    #[serde(default)]
    pub template_data: Option<Value>,
    #[serde(default = "default_status")]
    pub status: PostStatus,
    #[serde(default)]
    pub is_draft: bool,
    #[serde(default)]
    pub post_slug: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

fn default_status() -> PostStatus {
    PostStatus::Draft
}

impl Display for PostRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "id={}, slug={}, created_at={}, title={}",
               self.id,
               self.post_slug.as_deref().unwrap_or("-"),
               self.created_at,
               self.title,
        )
    }
}

/// Header and body ready for the page renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPost {
    pub template: PostTemplateData,
    pub body: String,
    /// True when the header came out of legacy HTML rather than `template_data`
    #[serde(skip)]
    pub from_legacy_html: bool,
}

impl PostRecord {
    pub fn from_file(path: &Path) -> io::Result<PostRecord> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw).map_err(|e| {
            io::Error::new(ErrorKind::InvalidData, format!("{} - file={}", e, path.display()))
        })
    }

    pub fn from_json(raw: &str) -> io::Result<PostRecord> {
        serde_json::from_str(raw)
            .map_err(|e| io::Error::new(ErrorKind::InvalidData, format!("Invalid post record: {}", e)))
    }

    /// Whether readers may see the post.
    pub fn is_public(&self) -> bool {
        self.status == PostStatus::Published && !self.is_draft
    }

    pub fn has_template_data(&self) -> bool {
        self.template_data.as_ref().map(|v| !v.is_null()).unwrap_or(false)
    }

    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|d| d.with_timezone(&Utc))
    }

    /// Path segment used in links: the slug when set, the id otherwise.
    pub fn link(&self) -> &str {
        match self.post_slug.as_deref() {
            Some(slug) if !slug.trim().is_empty() => slug,
            _ => self.id.as_str(),
        }
    }
}

/// Builds the header and body of a post.
///
/// Stored `template_data` always wins, even an empty object: the HTML is then used as the body
/// verbatim. Only posts without it have their HTML searched for a legacy header block.
pub fn resolve_post(post: &PostRecord) -> ResolvedPost {
    if post.has_template_data() {
        return ResolvedPost {
            template: normalize(post.template_data.as_ref(), &post.created_at),
            body: post.content.clone(),
            from_legacy_html: false,
        };
    }

    let split = split_template_from_html(&post.content, &post.created_at);
    let from_legacy_html = split.found;
    ResolvedPost {
        template: split.template,
        body: split.body,
        from_legacy_html,
    }
}

impl ResolvedPost {
    pub fn display_title<'a>(&'a self, post: &'a PostRecord) -> &'a str {
        self.template.title.as_deref().unwrap_or(post.title.as_str())
    }

    /// Header author, else the blog owner's name, else the username.
    pub fn byline_author<'a>(&'a self, owner_name: Option<&'a str>, username: &'a str) -> &'a str {
        self.template.author_name.as_deref()
            .or(owner_name.filter(|n| !n.trim().is_empty()))
            .unwrap_or(username)
    }
}
