//! Per-paper detail pages.
//!
//! A detail page starts with placeholder slots. The populator finds the
//! paper for the page (from its path, or a `data-paper-id` attribute in an
//! existing copy of the page) and fills the slots from the catalog.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, error};

use crate::catalog::Catalog;
use crate::models::{Icon, LinkKind, Paper};

use super::cards::link_buttons;
use super::html::{icon, Element, Node};

static PAPER_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"paper(\d+)\.html").expect("paper path pattern is valid"));

pub const CITATION_ANCHOR: &str = "citation";

/// Identify the paper a page belongs to.
///
/// Looks for a `paperN.html` segment in `path` first, then for a
/// `data-paper-id` attribute in the page's existing markup.
pub fn extract_paper_id(path: &str, existing_page: Option<&str>) -> Option<String> {
    if let Some(caps) = PAPER_PATH.captures(path) {
        return Some(format!("paper{}", &caps[1]));
    }
    let html = existing_page?;
    let selector = Selector::parse("[data-paper-id]").ok()?;
    let document = Html::parse_document(html);
    let id = document
        .select(&selector)
        .next()?
        .value()
        .attr("data-paper-id")?
        .trim()
        .to_string();
    Some(id).filter(|id| !id.is_empty())
}

/// Slots of a detail page.
#[derive(Debug, Clone)]
pub struct DetailPage {
    paper_id: Option<String>,
    title: Element,
    authors: Element,
    venue: Element,
    figure: Option<Element>,
    summary: Option<Element>,
    links: Element,
    citation: Element,
}

impl Default for DetailPage {
    fn default() -> Self {
        Self::placeholder()
    }
}

impl DetailPage {
    /// Page in its default state, before any paper is known.
    pub fn placeholder() -> Self {
        Self {
            paper_id: None,
            title: Element::new("h1").class("paper-title").text("Paper title"),
            authors: Element::new("p").class("paper-authors").text("Authors"),
            venue: Element::new("p").class("paper-venue").text("Venue"),
            figure: None,
            summary: None,
            links: Element::new("div").class("paper-links"),
            citation: citation_box("Citation unavailable."),
        }
    }

    pub fn paper_id(&self) -> Option<&str> {
        self.paper_id.as_deref()
    }

    pub fn is_populated(&self) -> bool {
        self.paper_id.is_some()
    }

    /// Page title for the document `<title>`.
    pub fn heading(&self) -> String {
        match self.title.child_nodes() {
            [Node::Text(text)] => text.clone(),
            _ => "Paper".to_string(),
        }
    }

    pub fn render(&self) -> Element {
        let mut article = Element::new("article").class("paper-detail");
        if let Some(id) = &self.paper_id {
            article = article.attr("data-paper-id", id.clone());
        }
        let header = Element::new("header")
            .class("paper-header")
            .child(self.title.clone())
            .child(self.authors.clone())
            .child(self.venue.clone())
            .child(self.links.clone());
        article = article.child(header);
        if let Some(figure) = &self.figure {
            article = article.child(figure.clone());
        }
        if let Some(summary) = &self.summary {
            article = article.child(summary.clone());
        }
        article.child(self.citation.clone())
    }
}

fn citation_box(text: &str) -> Element {
    Element::new("section")
        .id(CITATION_ANCHOR)
        .class("citation-box")
        .child(Element::new("h2").text("Citation"))
        .child(Element::new("pre").id("citation-text").text(text))
        .child(
            Element::new("button")
                .attr("type", "button")
                .class("copy-citation-btn")
                .attr("data-copy-target", "citation-text")
                .child(icon(Icon::Solid("copy")))
                .text(" Copy"),
        )
}

fn asset_url(root: &str, path: &str) -> String {
    if path.starts_with('/') || path.contains("://") {
        path.to_string()
    } else {
        format!("{root}{path}")
    }
}

/// Fills detail pages from the catalog.
pub struct DetailPopulator<'a> {
    catalog: &'a Catalog,
    asset_root: String,
}

impl<'a> DetailPopulator<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            asset_root: String::new(),
        }
    }

    /// Prefix for site-relative asset paths, e.g. `../` for pages one
    /// directory below the site root.
    pub fn with_asset_root(mut self, root: impl Into<String>) -> Self {
        self.asset_root = root.into();
        self
    }

    /// Populate `page` for the paper identified by its location.
    ///
    /// Returns the paper on success. When no id can be found, or the id is
    /// not in the catalog, the error is logged and the page is left as is.
    pub fn populate_from_location(
        &self,
        page: &mut DetailPage,
        path: &str,
        existing_page: Option<&str>,
    ) -> Option<&'a Paper> {
        let Some(id) = extract_paper_id(path, existing_page) else {
            error!("Could not determine paper ID for {}", path);
            return None;
        };
        self.populate(page, &id)
    }

    pub fn populate(&self, page: &mut DetailPage, id: &str) -> Option<&'a Paper> {
        let Some(paper) = self.catalog.get(id) else {
            error!("Paper data not found for ID: {}", id);
            return None;
        };
        debug!("Populating detail page for {}", id);

        page.paper_id = Some(paper.id.clone());
        if !paper.title.is_empty() {
            page.title.set_children(vec![Node::Text(paper.title.clone())]);
        }
        if !paper.authors.is_empty() {
            page.authors = Element::new("p").class("paper-authors").rich(&paper.authors);
        }
        if !paper.venue.is_empty() {
            page.venue.set_children(vec![Node::Text(paper.venue.clone())]);
        }
        if let Some(image) = &paper.image {
            page.figure = Some(
                Element::new("figure").class("paper-figure").child(
                    Element::new("img")
                        .attr("src", asset_url(&self.asset_root, image))
                        .attr("alt", format!("{} figure", paper.title)),
                ),
            );
        }
        if let Some(text) = paper.abstract_text.as_deref().filter(|t| !t.is_empty()) {
            page.summary = Some(
                Element::new("section")
                    .class("paper-abstract")
                    .child(Element::new("h2").text("Abstract"))
                    .child(Element::new("p").text(text)),
            );
        }

        let mut links = link_buttons(paper, "paper-link-btn");
        if paper.bibtex().is_some() {
            links.push(
                Element::new("a")
                    .attr("href", format!("#{CITATION_ANCHOR}"))
                    .class("paper-link-btn")
                    .child(icon(LinkKind::Bibtex.icon()))
                    .text(" BibTeX")
                    .into(),
            );
        }
        page.links.set_children(links);

        if let Some(bibtex) = paper.bibtex() {
            page.citation = citation_box(bibtex);
        }
        Some(paper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data;

    fn catalog() -> Catalog {
        Catalog::new(data::load_papers(None).unwrap()).unwrap()
    }

    #[test]
    fn test_extract_id_from_path() {
        assert_eq!(
            extract_paper_id("/site/papers/paper2.html", None).as_deref(),
            Some("paper2")
        );
        assert_eq!(extract_paper_id("papers/paper12.html", None).as_deref(), Some("paper12"));
    }

    #[test]
    fn test_extract_id_from_attribute() {
        let page = r#"<html><body><main data-paper-id="paper3"></main></body></html>"#;
        assert_eq!(
            extract_paper_id("papers/seal.html", Some(page)).as_deref(),
            Some("paper3")
        );
        assert_eq!(extract_paper_id("papers/seal.html", None), None);
        assert_eq!(extract_paper_id("papers/seal.html", Some("<p>no id</p>")), None);
    }

    #[test]
    fn test_populate_selects_matching_record() {
        let catalog = catalog();
        let populator = DetailPopulator::new(&catalog);
        let mut page = DetailPage::placeholder();

        let paper = populator
            .populate_from_location(&mut page, "papers/paper2.html", None)
            .unwrap();
        assert_eq!(paper.id, "paper2");
        assert_eq!(page.paper_id(), Some("paper2"));

        let html = page.render().render();
        assert!(html.contains("Revisiting Residual Connections"));
        assert!(html.contains(r#"<p class="paper-authors">Giyeong Oh, <b>Woohyun Cho</b>"#));
        assert!(html.contains(r#"<p class="paper-venue">Under Review</p>"#));
        assert!(html.contains(r#"class="paper-link-btn" target="_blank""#));
        assert!(html.contains(r##"<a href="#citation" class="paper-link-btn"><i class="fas fa-quote-right"></i> BibTeX</a>"##));
        assert!(html.contains("@article{oh2025revisitingresidualconnectionsorthogonal,"));
    }

    #[test]
    fn test_figure_uses_asset_root() {
        let catalog = catalog();
        let populator = DetailPopulator::new(&catalog).with_asset_root("../");
        let mut page = DetailPage::placeholder();
        populator.populate(&mut page, "paper1").unwrap();
        let html = page.render().render();
        assert!(html.contains(r#"<img src="../papers/images/mavl-figure.png""#));
        assert_eq!(asset_url("../", "https://cdn.test/a.png"), "https://cdn.test/a.png");
    }

    #[test]
    fn test_unknown_id_leaves_page_untouched() {
        let catalog = catalog();
        let populator = DetailPopulator::new(&catalog);
        let mut page = DetailPage::placeholder();
        let before = page.render().render();

        assert!(populator
            .populate_from_location(&mut page, "papers/paper99.html", None)
            .is_none());
        assert!(!page.is_populated());
        assert_eq!(page.render().render(), before);
    }
}
