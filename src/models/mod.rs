//! Data models for the portfolio.

mod document;
mod paper;

pub use document::{Document, PreviewType, ShowcaseData};
pub use paper::{capitalize, Category, Icon, LinkKind, Links, Paper, RichText, UNDER_REVIEW};
