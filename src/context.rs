//! Application context shared by every renderer.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::catalog::Catalog;
use crate::config::Settings;
use crate::data;
use crate::models::ShowcaseData;
use crate::sizes::{HttpSizeProbe, LocalSizeProbe, SizeProbe, SizeResolver};

/// Everything a render needs, built once at startup.
pub struct SiteContext {
    pub settings: Settings,
    pub catalog: Catalog,
    pub showcase: Option<ShowcaseData>,
    pub sizes: SizeResolver,
}

impl SiteContext {
    pub fn new(
        settings: Settings,
        catalog: Catalog,
        showcase: Option<ShowcaseData>,
        sizes: SizeResolver,
    ) -> Self {
        Self {
            settings,
            catalog,
            showcase,
            sizes,
        }
    }

    /// Load data according to `settings`.
    ///
    /// Missing or invalid data never fails the load: the affected page
    /// degrades (empty catalog, no showcase) and the problem is logged.
    pub fn load(settings: Settings, offline: bool) -> Self {
        let catalog = load_catalog(&settings);
        let showcase = load_showcase(&settings);
        let sizes = size_resolver(&settings, offline);
        Self::new(settings, catalog, showcase, sizes)
    }
}

fn load_catalog(settings: &Settings) -> Catalog {
    match data::load_papers(settings.papers_file.as_deref()).and_then(Catalog::new) {
        Ok(catalog) => {
            info!("Loaded {} papers", catalog.len());
            catalog
        }
        Err(e) => {
            error!("Paper catalog not loaded: {}", e);
            Catalog::empty()
        }
    }
}

fn load_showcase(settings: &Settings) -> Option<ShowcaseData> {
    match data::load_showcase(settings.showcase_file.as_deref()) {
        Ok(showcase) => Some(showcase),
        Err(e) => {
            warn!("Showcase data missing or invalid, skipping CV page: {}", e);
            None
        }
    }
}

/// HTTP probing against the site URL when one is configured, local file
/// sizes otherwise.
pub fn size_resolver(settings: &Settings, offline: bool) -> SizeResolver {
    let probe: Arc<dyn SizeProbe> = match settings.site_url.as_deref() {
        Some(url) if !offline => match HttpSizeProbe::new(
            url,
            Duration::from_secs(settings.request_timeout),
            settings.user_agent.as_deref(),
        ) {
            Ok(probe) => Arc::new(probe),
            Err(e) => {
                warn!("Cannot probe sizes at {}: {}; using local files", url, e);
                Arc::new(LocalSizeProbe::new(settings.source_dir.clone()))
            }
        },
        _ => Arc::new(LocalSizeProbe::new(settings.source_dir.clone())),
    };
    SizeResolver::new(probe)
}
