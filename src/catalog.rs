//! The paper catalog: sorted once at load, filtered per page.

use std::cmp::{Ordering, Reverse};
use std::collections::HashSet;

use crate::error::{Result, SiteError};
use crate::models::{Category, Paper};

/// Key ordering papers: accepted before under review, then `order`
/// ascending, then `year` descending.
pub fn sort_key(paper: &Paper) -> (bool, i64, Reverse<i32>) {
    (paper.is_under_review(), paper.order, Reverse(paper.year))
}

pub fn compare_papers(a: &Paper, b: &Paper) -> Ordering {
    sort_key(a).cmp(&sort_key(b))
}

/// Sort papers in catalog order.
///
/// The sort must be stable: papers equal on every key keep their input order.
pub fn sort_papers(papers: &mut [Paper]) {
    papers.sort_by_key(sort_key);
}

/// Filter selection for the publications list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    All,
    Category(Category),
}

impl Filter {
    pub const ALL_KEY: &'static str = "all";

    pub fn parse(key: &str) -> Self {
        if key == Self::ALL_KEY {
            Filter::All
        } else {
            Filter::Category(Category::from(key))
        }
    }

    /// Value of the `data-filter` attribute.
    pub fn key(&self) -> &str {
        match self {
            Filter::All => Self::ALL_KEY,
            Filter::Category(c) => c.as_str(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Filter::All => "All",
            Filter::Category(c) => c.label(),
        }
    }

    pub fn matches(&self, paper: &Paper) -> bool {
        match self {
            Filter::All => true,
            Filter::Category(c) => paper.has_category(c.as_str()),
        }
    }

    /// Preferred file name of the static page showing this filter.
    ///
    /// Distinct tags can share a slug (`speech`, `Speech`); use
    /// [`Catalog::filter_pages`] for the names actually written.
    pub fn page_name(&self) -> String {
        format!("{}.html", self.page_stem())
    }

    fn page_stem(&self) -> String {
        match self {
            Filter::All => "publications".to_string(),
            Filter::Category(c) => format!("publications-{}", slugify(c.as_str())),
        }
    }
}

/// A filter together with the page it is rendered to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPage {
    pub filter: Filter,
    pub page: String,
}

fn slugify(tag: &str) -> String {
    let slug: String = tag
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "other".to_string()
    } else {
        slug.to_string()
    }
}

/// Read-only, pre-sorted collection of papers.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    papers: Vec<Paper>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids.
    pub fn new(mut papers: Vec<Paper>) -> Result<Self> {
        let mut seen = HashSet::new();
        for paper in &papers {
            if !seen.insert(paper.id.as_str()) {
                return Err(SiteError::DuplicatePaper(paper.id.clone()));
            }
        }
        sort_papers(&mut papers);
        Ok(Self { papers })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn papers(&self) -> &[Paper] {
        &self.papers
    }

    pub fn len(&self) -> usize {
        self.papers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Paper> {
        self.papers.iter().find(|p| p.id == id)
    }

    /// Papers matching `filter`, in catalog order.
    pub fn filter(&self, filter: &Filter) -> Vec<&Paper> {
        self.papers.iter().filter(|p| filter.matches(p)).collect()
    }

    /// Filter bar entries: all, the known categories, then any other tag
    /// in first-seen order.
    pub fn filters(&self) -> Vec<Filter> {
        let mut filters = vec![Filter::All];
        filters.extend(Category::KNOWN.iter().cloned().map(Filter::Category));
        for paper in &self.papers {
            for category in &paper.categories {
                let filter = Filter::Category(category.clone());
                if !filters.contains(&filter) {
                    filters.push(filter);
                }
            }
        }
        filters
    }

    /// Filter bar entries with unique page names. A filter whose slug is
    /// already taken by an earlier one gets a numeric suffix.
    pub fn filter_pages(&self) -> Vec<FilterPage> {
        let mut used = HashSet::new();
        self.filters()
            .into_iter()
            .map(|filter| {
                let stem = filter.page_stem();
                let mut page = format!("{stem}.html");
                let mut n = 2;
                while !used.insert(page.clone()) {
                    page = format!("{stem}-{n}.html");
                    n += 1;
                }
                FilterPage { filter, page }
            })
            .collect()
    }

    /// Page name assigned to `filter`, if it is one of the catalog's filters.
    pub fn page_for(&self, filter: &Filter) -> Option<String> {
        self.filter_pages()
            .into_iter()
            .find(|p| &p.filter == filter)
            .map(|p| p.page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Links, RichText};

    fn paper(id: &str, venue: &str, year: i32, order: i64, categories: &[&str]) -> Paper {
        Paper {
            id: id.to_string(),
            title: format!("Title {id}"),
            authors: RichText::new("A. Author"),
            venue: venue.to_string(),
            year,
            categories: categories.iter().map(|c| Category::from(*c)).collect(),
            abstract_text: None,
            image: None,
            detail_page: None,
            links: Links::default(),
            highlight: false,
            order,
        }
    }

    fn ids(papers: &[&Paper]) -> Vec<String> {
        papers.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn test_under_review_sorts_last() {
        let catalog = Catalog::new(vec![
            paper("paper1", "EMNLP 2025", 2025, 2, &["speech"]),
            paper("paper2", "ICML 2025", 2025, 1, &["speech"]),
            paper("paper3", "Under Review", 2025, 3, &["speech"]),
        ])
        .unwrap();
        let all = catalog.filter(&Filter::All);
        assert_eq!(ids(&all), vec!["paper2", "paper1", "paper3"]);
    }

    #[test]
    fn test_review_status_dominates_order_and_year() {
        let a = paper("a", "Under Review", 2030, -5, &[]);
        let b = paper("b", "ACL 2019", 2019, 100, &[]);
        assert_eq!(compare_papers(&b, &a), Ordering::Less);
    }

    #[test]
    fn test_equal_order_newer_year_first() {
        let catalog = Catalog::new(vec![
            paper("old", "ACL", 2022, 1, &[]),
            paper("new", "ACL", 2024, 1, &[]),
        ])
        .unwrap();
        assert_eq!(catalog.papers()[0].id, "new");
    }

    #[test]
    fn test_ties_keep_input_order() {
        let catalog = Catalog::new(vec![
            paper("first", "ACL", 2024, 1, &[]),
            paper("second", "ACL", 2024, 1, &[]),
            paper("third", "ACL", 2024, 1, &[]),
        ])
        .unwrap();
        let order: Vec<&str> = catalog.papers().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let mut papers = vec![
            paper("p1", "Under Review", 2023, 0, &[]),
            paper("p2", "NeurIPS", 2021, 4, &[]),
            paper("p3", "NeurIPS", 2024, 4, &[]),
            paper("p4", "ICLR", 2020, 2, &[]),
        ];
        sort_papers(&mut papers);
        let once: Vec<String> = papers.iter().map(|p| p.id.clone()).collect();
        sort_papers(&mut papers);
        let twice: Vec<String> = papers.iter().map(|p| p.id.clone()).collect();
        assert_eq!(once, twice);
        assert_eq!(once, vec!["p4", "p3", "p2", "p1"]);
    }

    #[test]
    fn test_filter_preserves_relative_order() {
        let catalog = Catalog::new(vec![
            paper("p1", "ACL", 2024, 1, &["speech", "multimodal"]),
            paper("p2", "ACL", 2024, 2, &["reasoning"]),
            paper("p3", "ACL", 2023, 3, &["speech"]),
        ])
        .unwrap();
        let speech = catalog.filter(&Filter::parse("speech"));
        assert_eq!(ids(&speech), vec!["p1", "p3"]);
        assert!(catalog.filter(&Filter::parse("realtime")).is_empty());
        assert_eq!(catalog.filter(&Filter::parse("all")).len(), 3);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = Catalog::new(vec![
            paper("dup", "ACL", 2024, 1, &[]),
            paper("dup", "ACL", 2023, 2, &[]),
        ])
        .unwrap_err();
        assert!(matches!(err, SiteError::DuplicatePaper(id) if id == "dup"));
    }

    #[test]
    fn test_filters_include_unknown_tags_once() {
        let catalog = Catalog::new(vec![
            paper("p1", "ACL", 2024, 1, &["Others", "speech"]),
            paper("p2", "ACL", 2024, 2, &["Others"]),
        ])
        .unwrap();
        let keys: Vec<String> = catalog.filters().iter().map(|f| f.key().to_string()).collect();
        assert_eq!(
            keys,
            vec!["all", "multimodal", "speech", "reasoning", "realtime", "etc", "Others"]
        );
    }

    #[test]
    fn test_page_names() {
        assert_eq!(Filter::All.page_name(), "publications.html");
        assert_eq!(Filter::parse("Others").page_name(), "publications-others.html");
        assert_eq!(
            Filter::parse("Real Time!").page_name(),
            "publications-real-time.html"
        );
        assert_eq!(Filter::parse("++").page_name(), "publications-other.html");
    }

    #[test]
    fn test_filter_pages_are_unique_when_slugs_collide() {
        let catalog = Catalog::new(vec![
            paper("p1", "ACL", 2024, 1, &["speech"]),
            paper("p2", "ACL", 2024, 2, &["Speech", "speech 2"]),
        ])
        .unwrap();
        let pages = catalog.filter_pages();
        let names: HashSet<&str> = pages.iter().map(|p| p.page.as_str()).collect();
        assert_eq!(names.len(), pages.len());

        assert_eq!(
            catalog.page_for(&Filter::parse("speech")).as_deref(),
            Some("publications-speech.html")
        );
        assert_eq!(
            catalog.page_for(&Filter::parse("Speech")).as_deref(),
            Some("publications-speech-2.html")
        );
        assert_eq!(
            catalog.page_for(&Filter::parse("speech 2")).as_deref(),
            Some("publications-speech-2-2.html")
        );
        assert_eq!(ids(&catalog.filter(&Filter::parse("speech"))), vec!["p1"]);
        assert_eq!(ids(&catalog.filter(&Filter::parse("Speech"))), vec!["p2"]);
    }
}
