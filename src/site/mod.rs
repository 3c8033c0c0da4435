//! Static site rendering.
//!
//! Produces the publications pages (one per filter), a detail page for
//! every paper that declares one, and the CV showcase page.

pub mod cards;
pub mod detail;
pub mod html;
pub mod showcase;
pub mod templates;

use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, warn};

use crate::catalog::{Filter, FilterPage};
use crate::context::SiteContext;
use crate::error::{Result, SiteError};
use crate::models::ShowcaseData;

use cards::{bibtex_modal, filter_bar, publication_grid};
use detail::{extract_paper_id, DetailPage, DetailPopulator};
use html::{render_nodes, Element, Node};
use showcase::{refine_sizes, showcase_sections};
use templates::{root_prefix, BasePage, CSS, SITE_JS};

pub const SHOWCASE_PAGE: &str = "cv.html";

/// Files written by a build, relative to the output directory.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub pages: Vec<PathBuf>,
}

/// Publications page for one filter selection.
pub fn render_publications_page(ctx: &SiteContext, filter: &Filter) -> Result<String> {
    let papers = ctx.catalog.filter(filter);
    debug!("Filter {} selects {} papers", filter.key(), papers.len());

    let mut body: Vec<Node> = vec![
        Element::new("h1").text("Publications").into(),
        filter_bar(&ctx.catalog.filter_pages(), filter).into(),
        publication_grid(&papers, ctx.settings.animation_step_ms).into(),
    ];
    body.extend(papers.iter().filter_map(|p| bibtex_modal(p)).map(Node::from));

    let content = render_nodes(&body);
    BasePage {
        title: "Publications",
        site_title: &ctx.settings.site_title,
        root: "",
        section: "publications",
        content: &content,
    }
    .to_html()
}

/// Detail page at `path` (relative to the site root).
///
/// An existing page in the source directory is consulted for a
/// `data-paper-id` attribute when the path alone does not identify the
/// paper; `fallback_id` is used after that.
pub async fn render_detail_page(
    ctx: &SiteContext,
    path: &str,
    fallback_id: Option<&str>,
) -> Result<(String, DetailPage)> {
    let root = root_prefix(path);
    let existing = tokio::fs::read_to_string(ctx.settings.source_dir.join(path))
        .await
        .ok();
    let populator = DetailPopulator::new(&ctx.catalog).with_asset_root(root.clone());
    let mut page = DetailPage::placeholder();

    match (extract_paper_id(path, existing.as_deref()), fallback_id) {
        (Some(id), _) => {
            populator.populate(&mut page, &id);
        }
        (None, Some(id)) => {
            populator.populate(&mut page, id);
        }
        (None, None) => {
            populator.populate_from_location(&mut page, path, existing.as_deref());
        }
    }

    let title = page.heading();
    let content = page.render().render();
    let html = BasePage {
        title: &title,
        site_title: &ctx.settings.site_title,
        root: &root,
        section: "publications",
        content: &content,
    }
    .to_html()?;
    Ok((html, page))
}

/// CV showcase page, with document sizes resolved.
pub async fn render_showcase_page(ctx: &SiteContext, data: &ShowcaseData) -> Result<String> {
    let mut sections = showcase_sections(data);
    refine_sizes(&mut sections, &ctx.sizes).await;

    let mut body = vec![Node::from(Element::new("h1").text("CV & Portfolio"))];
    body.extend(sections.iter().map(|s| Node::from(s.render())));
    let content = render_nodes(&body);
    BasePage {
        title: "CV & Portfolio",
        site_title: &ctx.settings.site_title,
        root: "",
        section: "cv",
        content: &content,
    }
    .to_html()
}

/// Render the whole site into the configured output directory.
pub async fn build_site(ctx: &SiteContext) -> Result<BuildReport> {
    let out = &ctx.settings.output_dir;
    let mut report = BuildReport::default();

    write_page(out, "static/style.css", CSS, &mut report).await?;
    write_page(out, "static/site.js", SITE_JS, &mut report).await?;

    for FilterPage { filter, page } in ctx.catalog.filter_pages() {
        let html = render_publications_page(ctx, &filter)?;
        write_page(out, &page, &html, &mut report).await?;
    }

    for paper in ctx.catalog.papers() {
        let Some(path) = paper.detail_page.as_deref() else {
            continue;
        };
        if !is_safe_relative(path) {
            warn!("Skipping detail page outside the site root: {}", path);
            continue;
        }
        let (html, _) = render_detail_page(ctx, path, Some(&paper.id)).await?;
        write_page(out, path, &html, &mut report).await?;
    }

    match &ctx.showcase {
        Some(data) if data.primary_document.is_some() || data.portfolio_document.is_some() => {
            let html = render_showcase_page(ctx, data).await?;
            write_page(out, SHOWCASE_PAGE, &html, &mut report).await?;
        }
        _ => warn!("No showcase documents; skipping {}", SHOWCASE_PAGE),
    }

    info!("Wrote {} files to {}", report.pages.len(), out.display());
    Ok(report)
}

fn is_safe_relative(path: &str) -> bool {
    let path = Path::new(path);
    !path.as_os_str().is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

async fn write_page(
    out: &Path,
    relative: &str,
    contents: &str,
    report: &mut BuildReport,
) -> Result<()> {
    let target = out.join(relative);
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| SiteError::io(parent, e))?;
    }
    tokio::fs::write(&target, contents)
        .await
        .map_err(|e| SiteError::io(&target, e))?;
    debug!("Wrote {}", target.display());
    report.pages.push(PathBuf::from(relative));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_safe_relative() {
        assert!(is_safe_relative("papers/paper1.html"));
        assert!(is_safe_relative("./cv.html"));
        assert!(!is_safe_relative("../escape.html"));
        assert!(!is_safe_relative("/etc/passwd"));
        assert!(!is_safe_relative(""));
    }
}
