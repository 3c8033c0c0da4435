//! Publication cards and the year-grouped grid.

use crate::catalog::{Filter, FilterPage};
use crate::models::{Icon, LinkKind, Paper};

use super::html::{icon, Element, Node};

/// Characters of the abstract shown on a card.
pub const ABSTRACT_TEASER_CHARS: usize = 150;

pub const NO_RESULTS_TEXT: &str = "No papers found in this category.";

/// First 150 characters of an abstract followed by `...`.
///
/// Counts characters, not bytes, and ignores word boundaries.
pub fn abstract_teaser(text: &str) -> String {
    let mut teaser: String = text.chars().take(ABSTRACT_TEASER_CHARS).collect();
    teaser.push_str("...");
    teaser
}

/// Id of the citation modal belonging to a paper.
pub fn bibtex_modal_id(paper: &Paper) -> String {
    format!("bibtex-{}", paper.id)
}

/// Grid children for an already sorted sequence of papers.
///
/// A year divider precedes each run of papers sharing a year, so the input
/// must be ordered such that equal years are contiguous.
pub fn grid_children(papers: &[&Paper], animation_step_ms: u64) -> Vec<Node> {
    if papers.is_empty() {
        return vec![Element::new("p").class("no-papers").text(NO_RESULTS_TEXT).into()];
    }

    let mut nodes = Vec::with_capacity(papers.len() * 2);
    let mut current_year = None;
    for (index, paper) in papers.iter().enumerate() {
        if current_year != Some(paper.year) {
            current_year = Some(paper.year);
            nodes.push(year_divider(paper.year).into());
        }
        nodes.push(paper_card(paper, index, animation_step_ms).into());
    }
    nodes
}

/// The `#publication-grid` container.
pub fn publication_grid(papers: &[&Paper], animation_step_ms: u64) -> Element {
    Element::new("div")
        .id("publication-grid")
        .class("publication-grid")
        .children(grid_children(papers, animation_step_ms))
}

fn year_divider(year: i32) -> Element {
    Element::new("div")
        .class("year-divider")
        .child(Element::new("div").class("year-line"))
        .child(Element::new("span").class("year-label").text(year.to_string()))
}

pub fn paper_card(paper: &Paper, index: usize, animation_step_ms: u64) -> Element {
    let class = if paper.highlight {
        "publication-card highlight"
    } else {
        "publication-card"
    };
    let delay_ms = index as u64 * animation_step_ms;

    let mut card = Element::new("div")
        .class(class)
        .attr("data-paper-id", paper.id.clone())
        .attr("style", format!("animation-delay: {delay_ms}ms"))
        .child(
            Element::new("div")
                .class("publication-year")
                .text(paper.year.to_string()),
        )
        .child(category_badges(paper));

    if let Some(image) = &paper.image {
        card = card.child(
            Element::new("div").class("publication-image").child(
                Element::new("img")
                    .attr("src", image.clone())
                    .attr("alt", format!("{} figure", paper.title))
                    .attr("loading", "lazy"),
            ),
        );
    }

    let title = Element::new("h3")
        .class("publication-title")
        .text(paper.title.clone());
    card = match &paper.detail_page {
        Some(href) => card.child(
            Element::new("a")
                .attr("href", href.clone())
                .class("publication-title-link")
                .child(title),
        ),
        None => card.child(title),
    };

    card = card
        .child(
            Element::new("p")
                .class("publication-authors")
                .rich(&paper.authors),
        )
        .child(
            Element::new("p")
                .class("publication-venue")
                .text(paper.venue.clone()),
        );

    if let Some(text) = paper.abstract_text.as_deref().filter(|t| !t.is_empty()) {
        card = card.child(
            Element::new("p")
                .class("publication-abstract")
                .text(abstract_teaser(text)),
        );
    }

    let mut links = Element::new("div")
        .class("publication-links")
        .children(link_buttons(paper, "pub-link"));
    if paper.bibtex().is_some() {
        links = links.child(
            Element::new("button")
                .attr("type", "button")
                .class("pub-link bibtex-btn")
                .attr("data-bibtex-target", bibtex_modal_id(paper))
                .child(icon(LinkKind::Bibtex.icon()))
                .text(" BibTeX"),
        );
    }
    card.child(links)
}

fn category_badges(paper: &Paper) -> Element {
    let badges = paper.categories.iter().map(|category| {
        Element::new("span")
            .class(format!("category-badge {}", category.as_str()))
            .text(category.label())
    });
    Element::new("div").class("category-badges").children(badges)
}

/// Anchor buttons for every non-empty, non-BibTeX link.
pub fn link_buttons(paper: &Paper, class: &'static str) -> Vec<Node> {
    paper
        .links
        .buttons()
        .map(|(kind, url)| {
            Element::new("a")
                .attr("href", url)
                .class(class)
                .attr("target", "_blank")
                .attr("rel", "noopener")
                .child(icon(kind.icon()))
                .text(format!(" {}", kind.label()))
                .into()
        })
        .collect()
}

/// Hidden overlay showing a paper's citation verbatim, with a copy button.
pub fn bibtex_modal(paper: &Paper) -> Option<Element> {
    let bibtex = paper.bibtex()?;
    let modal_id = bibtex_modal_id(paper);
    let content = Element::new("div")
        .class("bibtex-content")
        .child(Element::new("h3").text("BibTeX Citation"))
        .child(
            Element::new("pre")
                .id(format!("{modal_id}-text"))
                .text(bibtex),
        )
        .child(
            Element::new("button")
                .attr("type", "button")
                .class("copy-btn")
                .attr("data-copy-target", format!("{modal_id}-text"))
                .child(icon(Icon::Solid("copy")))
                .text(" Copy to Clipboard"),
        )
        .child(
            Element::new("button")
                .attr("type", "button")
                .class("close-btn")
                .attr("data-close-target", modal_id.clone())
                .text("Close"),
        );
    Some(
        Element::new("div")
            .class("bibtex-modal")
            .id(modal_id)
            .attr("hidden", "hidden")
            .child(content),
    )
}

/// Filter buttons linking to the per-filter pages.
pub fn filter_bar(pages: &[FilterPage], active: &Filter) -> Element {
    let buttons = pages.iter().map(|FilterPage { filter, page }| {
        let class = if filter == active {
            "filter-btn active"
        } else {
            "filter-btn"
        };
        Element::new("a")
            .class(class)
            .attr("href", page.clone())
            .attr("data-filter", filter.key())
            .text(filter.label())
    });
    Element::new("nav").class("publication-filters").children(buttons)
}
