//! CV and portfolio showcase sections.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use futures::future::join_all;

use crate::models::{Document, PreviewType, ShowcaseData};
use crate::sizes::SizeResolver;

use super::html::Element;

/// Placeholder while a size is unknown.
pub const CALCULATING_SIZE: &str = "Calculating size…";

pub const UNKNOWN_DATE: &str = "Unknown date";

/// Human readable size: bytes below 1 KiB, one-decimal KB below 1 MiB,
/// two-decimal MB above. Zero or negative sizes are not yet known.
pub fn format_file_size(bytes: i64) -> String {
    if bytes <= 0 {
        return CALCULATING_SIZE.to_string();
    }
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let kb = bytes as f64 / 1024.0;
    if kb < 1024.0 {
        return format!("{:.1} KB", kb);
    }
    format!("{:.2} MB", kb / 1024.0)
}

/// Normalize an ISO date to `YYYY-MM-DD` (UTC). Any non-empty input that
/// does not parse, whitespace included, is shown as given.
pub fn format_date_label(iso: &str) -> String {
    if iso.is_empty() {
        return UNKNOWN_DATE.to_string();
    }
    parse_date(iso.trim())
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| iso.to_string())
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}

/// Inline preview for a document, chosen by its preview type.
pub fn preview_element(document: &Document, id: &str) -> Element {
    let media = match document.preview_type {
        PreviewType::Image => Element::new("img")
            .id(id)
            .attr("src", document.preview_src.clone())
            .attr("alt", format!("{} preview image", document.title))
            .attr("loading", "lazy"),
        PreviewType::Pdf => Element::new("iframe")
            .id(id)
            .attr("src", document.preview_src.clone())
            .attr("loading", "lazy")
            .attr("title", format!("{} inline PDF preview", document.title)),
        PreviewType::Other => Element::new("p")
            .id(id)
            .class("preview-fallback")
            .text("Preview unavailable for this artifact."),
    };
    Element::new("div").class("portfolio-preview").child(media)
}

/// A populated document section of the showcase page.
#[derive(Debug, Clone)]
pub struct DocumentSection {
    /// Id prefix of the section's elements (`primary`, `portfolio`).
    pub prefix: &'static str,
    pub title: String,
    pub download_label: &'static str,
    pub download_href: String,
    pub aria_label: String,
    pub description: Option<String>,
    pub updated: Option<String>,
    pub filesize_label: String,
    preview: Element,
}

impl DocumentSection {
    pub fn new(prefix: &'static str, document: &Document, download_label: &'static str) -> Self {
        let date = format_date_label(&document.updated_at);
        Self {
            prefix,
            title: document.title.clone(),
            download_label,
            download_href: document.download_href.clone(),
            aria_label: format!("{download_label} updated {date}"),
            description: Some(document.description.clone()).filter(|d| !d.is_empty()),
            updated: Some(format!("Updated {date}")).filter(|_| !document.updated_at.is_empty()),
            filesize_label: format_file_size(document.file_size_bytes),
            preview: preview_element(document, &format!("{prefix}-preview")),
        }
    }

    fn slot(&self, name: &str) -> String {
        format!("{}-{}", self.prefix, name)
    }

    pub fn render(&self) -> Element {
        let mut meta = Element::new("div")
            .class("document-meta")
            .child(Element::new("h2").text(self.title.clone()));
        if let Some(description) = &self.description {
            meta = meta.child(
                Element::new("p")
                    .id(self.slot("description"))
                    .text(description.clone()),
            );
        }
        if let Some(updated) = &self.updated {
            meta = meta.child(
                Element::new("span")
                    .id(self.slot("updated"))
                    .class("document-updated")
                    .text(updated.clone()),
            );
        }
        meta = meta
            .child(
                Element::new("span")
                    .id(self.slot("filesize"))
                    .class("document-filesize")
                    .text(self.filesize_label.clone()),
            )
            .child(
                Element::new("a")
                    .id(self.slot("download"))
                    .class("download-btn")
                    .attr("href", self.download_href.clone())
                    .attr("aria-label", self.aria_label.clone())
                    .attr("download", "")
                    .text(self.download_label),
            );

        Element::new("section")
            .id(self.slot("section"))
            .class("document-section")
            .child(meta)
            .child(self.preview.clone())
    }
}

/// Sections for every document present in the showcase data.
pub fn showcase_sections(data: &ShowcaseData) -> Vec<DocumentSection> {
    let mut sections = Vec::new();
    if let Some(cv) = &data.primary_document {
        sections.push(DocumentSection::new("primary", cv, "Download CV"));
    }
    if let Some(portfolio) = &data.portfolio_document {
        sections.push(DocumentSection::new(
            "portfolio",
            portfolio,
            "Download Portfolio",
        ));
    }
    sections
}

/// Replace each section's size label with the resolved size.
pub async fn refine_sizes(sections: &mut [DocumentSection], resolver: &SizeResolver) {
    let labels = join_all(
        sections
            .iter()
            .map(|section| resolver.resolve_label(&section.download_href)),
    )
    .await;
    for (section, label) in sections.iter_mut().zip(labels) {
        if let Some(label) = label {
            section.filesize_label = label;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(preview_type: PreviewType, updated_at: &str) -> Document {
        Document {
            id: "cv-current".to_string(),
            title: "Curriculum Vitae".to_string(),
            description: "Current CV.".to_string(),
            preview_type,
            preview_src: "assets/cv/cv.pdf".to_string(),
            download_href: "assets/cv/cv.pdf".to_string(),
            file_size_bytes: 0,
            updated_at: updated_at.to_string(),
        }
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), CALCULATING_SIZE);
        assert_eq!(format_file_size(-3), CALCULATING_SIZE);
        assert_eq!(format_file_size(500), "500 B");
        assert_eq!(format_file_size(1023), "1023 B");
        assert_eq!(format_file_size(2048), "2.0 KB");
        assert_eq!(format_file_size(1_572_864), "1.50 MB");
    }

    #[test]
    fn test_format_date_label() {
        assert_eq!(format_date_label("2025-10-18"), "2025-10-18");
        assert_eq!(format_date_label("2025-10-18T23:30:00-02:00"), "2025-10-19");
        assert_eq!(format_date_label("2025-10-18T08:15:00"), "2025-10-18");
        assert_eq!(format_date_label("last autumn"), "last autumn");
        assert_eq!(format_date_label(""), UNKNOWN_DATE);
        assert_eq!(format_date_label("   "), "   ");
        assert_eq!(format_date_label(" 2025-10-18 "), "2025-10-18");
    }

    #[test]
    fn test_section_labels() {
        let doc = document(PreviewType::Pdf, "2025-10-18");
        let section = DocumentSection::new("primary", &doc, "Download CV");
        assert_eq!(section.aria_label, "Download CV updated 2025-10-18");
        assert_eq!(section.updated.as_deref(), Some("Updated 2025-10-18"));
        assert_eq!(section.filesize_label, CALCULATING_SIZE);

        let html = section.render().render();
        assert!(html.contains(r#"<a id="primary-download" class="download-btn" href="assets/cv/cv.pdf" aria-label="Download CV updated 2025-10-18" download="">Download CV</a>"#));
        assert!(html.contains(r#"<iframe id="primary-preview" src="assets/cv/cv.pdf""#));
        assert!(html.contains(r#"<p id="primary-description">Current CV.</p>"#));
    }

    #[test]
    fn test_missing_date_omits_updated_label() {
        let doc = document(PreviewType::Pdf, "");
        let section = DocumentSection::new("primary", &doc, "Download CV");
        assert!(section.updated.is_none());
        assert_eq!(section.aria_label, "Download CV updated Unknown date");
    }

    #[test]
    fn test_preview_fallback() {
        let html = preview_element(&document(PreviewType::Other, ""), "x").render();
        assert!(html.contains("Preview unavailable for this artifact."));
        let html = preview_element(&document(PreviewType::Image, ""), "x").render();
        assert!(html.contains(r#"alt="Curriculum Vitae preview image""#));
    }
}
