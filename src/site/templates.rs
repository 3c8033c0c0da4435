//! Page shell and static assets.

use askama::Template;

use crate::error::Result;

/// Base HTML layout shared by every page.
#[derive(Template)]
#[template(path = "base.html")]
pub struct BasePage<'a> {
    pub title: &'a str,
    pub site_title: &'a str,
    /// Relative path from the page to the site root (`""` or `"../"`).
    pub root: &'a str,
    /// Navigation entry to mark active.
    pub section: &'a str,
    /// Pre-rendered, already escaped body markup.
    pub content: &'a str,
}

impl BasePage<'_> {
    pub fn to_html(&self) -> Result<String> {
        Ok(self.render()?)
    }
}

/// Relative prefix leading from `page_path` back to the site root.
pub fn root_prefix(page_path: &str) -> String {
    let depth = page_path.trim_start_matches('/').matches('/').count();
    "../".repeat(depth)
}

/// CSS styles for the generated site.
pub const CSS: &str = r#"
:root {
    --bg: #fff;
    --text: #222;
    --text-muted: #666;
    --link: #0066cc;
    --link-hover: #004499;
    --border: #ddd;
    --card-bg: #fafafa;
    --highlight: #fff8e1;
    --badge-bg: #eef3fb;
}

@media (prefers-color-scheme: dark) {
    :root {
        --bg: #1a1a1a;
        --text: #e0e0e0;
        --text-muted: #999;
        --link: #6cb6ff;
        --link-hover: #9ecbff;
        --border: #333;
        --card-bg: #222;
        --highlight: #2d2a1f;
        --badge-bg: #1f2a38;
    }
}

* { box-sizing: border-box; }

body {
    margin: 0;
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
    background: var(--bg);
    color: var(--text);
    line-height: 1.5;
}

a { color: var(--link); text-decoration: none; }
a:hover { color: var(--link-hover); }

#main-header nav {
    display: flex;
    gap: 1.5rem;
    padding: 1rem 2rem;
    border-bottom: 1px solid var(--border);
}
#main-header .logo { font-weight: 700; margin-right: auto; }
#main-header a.active { text-decoration: underline; }

main { max-width: 960px; margin: 0 auto; padding: 2rem; }

.publication-filters { display: flex; flex-wrap: wrap; gap: 0.5rem; margin-bottom: 1.5rem; }
.filter-btn {
    padding: 0.3rem 0.9rem;
    border: 1px solid var(--border);
    border-radius: 999px;
    color: var(--text);
}
.filter-btn.active { background: var(--link); border-color: var(--link); color: #fff; }

.year-divider { display: flex; align-items: center; gap: 1rem; margin: 2rem 0 1rem; }
.year-line { flex: 1; height: 1px; background: var(--border); }
.year-label { font-weight: 700; color: var(--text-muted); }

.publication-card {
    padding: 1.25rem;
    margin-bottom: 1rem;
    border: 1px solid var(--border);
    border-radius: 8px;
    background: var(--card-bg);
    opacity: 0;
    animation: fade-in 0.4s ease forwards;
}
.publication-card.highlight { background: var(--highlight); }
.publication-year { float: right; color: var(--text-muted); }
.category-badge {
    display: inline-block;
    padding: 0.1rem 0.6rem;
    margin-right: 0.3rem;
    border-radius: 4px;
    background: var(--badge-bg);
    font-size: 0.8rem;
}
.publication-image img { max-width: 100%; margin: 0.75rem 0; }
.publication-title { margin: 0.5rem 0; }
.publication-authors, .publication-venue { margin: 0.2rem 0; }
.publication-venue { font-style: italic; color: var(--text-muted); }
.publication-abstract { color: var(--text-muted); }
.publication-links, .paper-links { display: flex; flex-wrap: wrap; gap: 0.5rem; }
.pub-link, .paper-link-btn {
    padding: 0.25rem 0.7rem;
    border: 1px solid var(--border);
    border-radius: 4px;
    background: none;
    color: var(--text);
    font: inherit;
    cursor: pointer;
}
.no-papers { color: var(--text-muted); text-align: center; }

.bibtex-modal {
    position: fixed;
    inset: 0;
    display: flex;
    align-items: center;
    justify-content: center;
    background: rgba(0, 0, 0, 0.5);
}
.bibtex-modal[hidden] { display: none; }
.bibtex-content {
    max-width: 720px;
    width: 90%;
    padding: 1.5rem;
    border-radius: 8px;
    background: var(--bg);
}
pre { white-space: pre-wrap; overflow-x: auto; padding: 1rem; background: var(--card-bg); }

.paper-figure img { max-width: 100%; }
.citation-box { margin-top: 2rem; }

.document-section { display: grid; grid-template-columns: 1fr 2fr; gap: 2rem; margin-bottom: 3rem; }
.document-meta span { display: block; color: var(--text-muted); }
.download-btn {
    display: inline-block;
    margin-top: 1rem;
    padding: 0.5rem 1rem;
    border-radius: 4px;
    background: var(--link);
    color: #fff;
}
.portfolio-preview iframe, .portfolio-preview img { width: 100%; min-height: 480px; border: 1px solid var(--border); }
.preview-fallback { color: var(--text-muted); }

@keyframes fade-in { to { opacity: 1; } }
"#;

/// Browser behaviour for citation modals and clipboard buttons.
pub const SITE_JS: &str = r#"
(function () {
    function openModal(id) {
        var modal = document.getElementById(id);
        if (modal) modal.hidden = false;
    }

    function closeModal(modal) {
        if (modal) modal.hidden = true;
    }

    function copyFrom(button) {
        var target = document.getElementById(button.dataset.copyTarget);
        if (!target || !navigator.clipboard) return;
        var original = button.innerHTML;
        navigator.clipboard.writeText(target.textContent).then(function () {
            button.innerHTML = '<i class="fas fa-check"></i> Copied!';
            setTimeout(function () { button.innerHTML = original; }, 2000);
        }).catch(function (err) {
            console.error("Failed to copy citation:", err);
        });
    }

    document.addEventListener("click", function (e) {
        var el = e.target.closest ? e.target.closest("[data-bibtex-target],[data-copy-target],[data-close-target]") : null;
        if (el && el.dataset.bibtexTarget) {
            openModal(el.dataset.bibtexTarget);
        } else if (el && el.dataset.copyTarget) {
            copyFrom(el);
        } else if (el && el.dataset.closeTarget) {
            closeModal(document.getElementById(el.dataset.closeTarget));
        } else if (e.target.classList && e.target.classList.contains("bibtex-modal")) {
            closeModal(e.target);
        }
    });
})();
"#;
