//! Paper records and their lookup tables.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

/// Venue string that marks a paper as not yet accepted.
pub const UNDER_REVIEW: &str = "Under Review";

/// A publication in the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct Paper {
    pub id: String,
    pub title: String,
    /// May carry inline emphasis markup such as `<b>`.
    pub authors: RichText,
    pub venue: String,
    pub year: i32,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, alias = "detailPage")]
    pub detail_page: Option<String>,
    #[serde(default)]
    pub links: Links,
    #[serde(default)]
    pub highlight: bool,
    #[serde(default)]
    pub order: i64,
}

impl Paper {
    /// Whether the venue marks this paper as under review.
    pub fn is_under_review(&self) -> bool {
        self.venue == UNDER_REVIEW
    }

    pub fn has_category(&self, tag: &str) -> bool {
        self.categories.iter().any(|c| c.as_str() == tag)
    }

    /// BibTeX citation text, if the paper has a non-empty one.
    pub fn bibtex(&self) -> Option<&str> {
        self.links.get(&LinkKind::Bibtex)
    }
}

/// Markup-bearing text that must be sanitized before it reaches a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct RichText(String);

impl RichText {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The unsanitized source markup.
    pub fn raw(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

/// Paper category tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum Category {
    Multimodal,
    Speech,
    Reasoning,
    Realtime,
    Etc,
    Other(String),
}

impl Category {
    /// Categories with a dedicated label, in filter-bar order.
    pub const KNOWN: [Category; 5] = [
        Category::Multimodal,
        Category::Speech,
        Category::Reasoning,
        Category::Realtime,
        Category::Etc,
    ];

    /// Raw tag as written in the data file.
    pub fn as_str(&self) -> &str {
        match self {
            Category::Multimodal => "multimodal",
            Category::Speech => "speech",
            Category::Reasoning => "reasoning",
            Category::Realtime => "realtime",
            Category::Etc => "etc",
            Category::Other(tag) => tag,
        }
    }

    /// Display label for badges and filter buttons. Unknown tags show as-is.
    pub fn label(&self) -> &str {
        match self {
            Category::Multimodal => "Multimodal",
            Category::Speech => "Speech",
            Category::Reasoning => "Reasoning",
            Category::Realtime => "Real-Time",
            Category::Etc => "ETC",
            Category::Other(tag) => tag,
        }
    }
}

impl From<String> for Category {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "multimodal" => Category::Multimodal,
            "speech" => Category::Speech,
            "reasoning" => Category::Reasoning,
            "realtime" => Category::Realtime,
            "etc" => Category::Etc,
            _ => Category::Other(tag),
        }
    }
}

impl From<&str> for Category {
    fn from(tag: &str) -> Self {
        Category::from(tag.to_string())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Icon shown next to a link label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    /// Font Awesome solid icon (`fas fa-<name>`).
    Solid(&'static str),
    /// Font Awesome brand icon (`fab fa-<name>`).
    Brand(&'static str),
    /// Plain text glyph.
    Glyph(&'static str),
}

/// Kind of a paper link.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum LinkKind {
    Paper,
    Code,
    Data,
    Slides,
    Poster,
    Demo,
    Video,
    Project,
    Bibtex,
    Other(String),
}

impl LinkKind {
    pub fn key(&self) -> &str {
        match self {
            LinkKind::Paper => "paper",
            LinkKind::Code => "code",
            LinkKind::Data => "data",
            LinkKind::Slides => "slides",
            LinkKind::Poster => "poster",
            LinkKind::Demo => "demo",
            LinkKind::Video => "video",
            LinkKind::Project => "project",
            LinkKind::Bibtex => "bibtex",
            LinkKind::Other(key) => key,
        }
    }

    /// Button label: the key with its first character uppercased.
    pub fn label(&self) -> String {
        capitalize(self.key())
    }

    pub fn icon(&self) -> Icon {
        match self {
            LinkKind::Paper => Icon::Solid("file-pdf"),
            LinkKind::Code => Icon::Brand("github"),
            LinkKind::Data => Icon::Glyph("🤗"),
            LinkKind::Slides => Icon::Solid("presentation"),
            LinkKind::Poster => Icon::Solid("image"),
            LinkKind::Demo => Icon::Solid("play-circle"),
            LinkKind::Video => Icon::Solid("video"),
            LinkKind::Project => Icon::Solid("globe"),
            LinkKind::Bibtex => Icon::Solid("quote-right"),
            LinkKind::Other(_) => Icon::Solid("link"),
        }
    }
}

impl From<String> for LinkKind {
    fn from(key: String) -> Self {
        match key.as_str() {
            "paper" => LinkKind::Paper,
            "code" => LinkKind::Code,
            "data" => LinkKind::Data,
            "slides" => LinkKind::Slides,
            "poster" => LinkKind::Poster,
            "demo" => LinkKind::Demo,
            "video" => LinkKind::Video,
            "project" => LinkKind::Project,
            "bibtex" => LinkKind::Bibtex,
            _ => LinkKind::Other(key),
        }
    }
}

impl From<&str> for LinkKind {
    fn from(key: &str) -> Self {
        LinkKind::from(key.to_string())
    }
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Links of a paper, kept in the order they appear in the data file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Links(Vec<(LinkKind, String)>);

impl Links {
    pub fn new(entries: Vec<(LinkKind, String)>) -> Self {
        Self(entries)
    }

    /// Value for `kind`, ignoring empty entries.
    pub fn get(&self, kind: &LinkKind) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, v)| k == kind && !v.is_empty())
            .map(|(_, v)| v.as_str())
    }

    /// Non-empty links that render as ordinary buttons (everything but BibTeX).
    pub fn buttons(&self) -> impl Iterator<Item = (&LinkKind, &str)> {
        self.0
            .iter()
            .filter(|(k, v)| *k != LinkKind::Bibtex && !v.is_empty())
            .map(|(k, v)| (k, v.as_str()))
    }
}

impl<'de> Deserialize<'de> for Links {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LinksVisitor;

        impl<'de> Visitor<'de> for LinksVisitor {
            type Value = Links;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table of link kinds to URLs")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Links, A::Error> {
                let mut entries = Vec::new();
                while let Some((key, value)) = map.next_entry::<String, Option<String>>()? {
                    entries.push((LinkKind::from(key), value.unwrap_or_default()));
                }
                Ok(Links(entries))
            }
        }

        deserializer.deserialize_map(LinksVisitor)
    }
}
