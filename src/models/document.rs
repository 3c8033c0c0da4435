//! Downloadable document descriptors for the CV showcase page.

use serde::de::{self, Deserializer};
use serde::Deserialize;

/// How a document is previewed inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewType {
    Image,
    Pdf,
    #[serde(other)]
    Other,
}

/// A downloadable, previewable artifact such as a CV.
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(alias = "previewType", default = "default_preview_type")]
    pub preview_type: PreviewType,
    #[serde(alias = "previewSrc", default)]
    pub preview_src: String,
    #[serde(alias = "downloadHref", default)]
    pub download_href: String,
    /// Size in bytes; 0 means unknown until probed.
    #[serde(
        alias = "fileSizeBytes",
        default,
        deserialize_with = "lenient_size"
    )]
    pub file_size_bytes: i64,
    #[serde(alias = "updatedAt", default)]
    pub updated_at: String,
}

fn default_preview_type() -> PreviewType {
    PreviewType::Other
}

/// Accept a number or a numeric string; anything else counts as unknown (0).
fn lenient_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer) {
        Ok(Raw::Int(n)) => Ok(n),
        Ok(Raw::Float(f)) if f.is_finite() => Ok(f as i64),
        Ok(Raw::Float(_)) => Ok(0),
        Ok(Raw::Text(s)) => Ok(s.trim().parse().unwrap_or(0)),
        Err(e) => Err(de::Error::custom(e)),
    }
}

/// Documents shown on the showcase page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShowcaseData {
    #[serde(alias = "primaryDocument", default)]
    pub primary_document: Option<Document>,
    #[serde(alias = "portfolioDocument", default)]
    pub portfolio_document: Option<Document>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_type_fallback() {
        let doc: Document = serde_json::from_str(
            r#"{"id":"x","title":"X","previewType":"video","fileSizeBytes":"n/a"}"#,
        )
        .unwrap();
        assert_eq!(doc.preview_type, PreviewType::Other);
        assert_eq!(doc.file_size_bytes, 0);
    }

    #[test]
    fn test_numeric_string_size() {
        let doc: Document =
            serde_json::from_str(r#"{"id":"x","title":"X","fileSizeBytes":"2048"}"#).unwrap();
        assert_eq!(doc.file_size_bytes, 2048);
    }
}
