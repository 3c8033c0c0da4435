use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use paperfolio::site::{self, render_detail_page};
use paperfolio::{load_settings, Config, Filter, Settings, SiteContext};

#[derive(Parser)]
#[command(name = "folio", version, about = "Static academic portfolio generator")]
struct Cli {
    /// Config file applied on top of the discovered configuration
    #[arg(short, long, global = true, env = "PAPERFOLIO_CONFIG")]
    config: Option<PathBuf>,

    /// Paper catalog file (TOML or JSON) instead of the embedded one
    #[arg(long, global = true, env = "PAPERFOLIO_PAPERS")]
    papers: Option<PathBuf>,

    /// Showcase data file (TOML or JSON) instead of the embedded one
    #[arg(long, global = true, env = "PAPERFOLIO_SHOWCASE")]
    showcase: Option<PathBuf>,

    /// Site source directory
    #[arg(long, global = true, env = "PAPERFOLIO_SOURCE")]
    source: Option<PathBuf>,

    /// Public base URL used to probe document sizes
    #[arg(long, global = true, env = "PAPERFOLIO_SITE_URL")]
    site_url: Option<String>,

    /// Increase log verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the whole site
    Build {
        /// Output directory
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Read document sizes from local files even when a site URL is set
        #[arg(long)]
        offline: bool,
    },
    /// Print the sorted catalog
    List {
        /// Category tag, or "all"
        #[arg(short, long, default_value = "all")]
        filter: String,
    },
    /// Print a paper's BibTeX citation
    Cite { id: String },
    /// Resolve file sizes for site paths
    Size {
        paths: Vec<String>,
        #[arg(long)]
        offline: bool,
    },
    /// Render one detail page to stdout
    Detail {
        /// Page path relative to the site root, e.g. papers/paper2.html
        path: String,
    },
}

impl Cli {
    fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref source) = self.source {
            settings.output_dir = source.join("public");
            settings.source_dir = source.clone();
        }
        if let Some(ref papers) = self.papers {
            settings.papers_file = Some(papers.clone());
        }
        if let Some(ref showcase) = self.showcase {
            settings.showcase_file = Some(showcase.clone());
        }
        if let Some(ref url) = self.site_url {
            settings.site_url = Some(url.clone());
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("paperfolio={default_level},folio={default_level}"))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut settings = load_settings().await;
    if let Some(ref path) = cli.config {
        Config::from_toml_file(path)?.apply_to_settings(&mut settings);
    }
    cli.apply_to_settings(&mut settings);

    match cli.command {
        Command::Build { out, offline } => {
            if let Some(out) = out {
                settings.output_dir = out;
            }
            settings.ensure_directories()?;
            let ctx = SiteContext::load(settings, offline);
            let report = site::build_site(&ctx).await?;
            for page in &report.pages {
                println!("{}", page.display());
            }
        }
        Command::List { filter } => {
            let ctx = SiteContext::load(settings, true);
            let papers = ctx.catalog.filter(&Filter::parse(&filter));
            if papers.is_empty() {
                println!("{}", site::cards::NO_RESULTS_TEXT);
            }
            for paper in papers {
                println!("{}\t{}\t{}\t{}", paper.id, paper.year, paper.venue, paper.title);
            }
        }
        Command::Cite { id } => {
            let ctx = SiteContext::load(settings, true);
            let Some(paper) = ctx.catalog.get(&id) else {
                bail!("Paper data not found for ID: {}", id);
            };
            match paper.bibtex() {
                Some(bibtex) => println!("{}", bibtex),
                None => bail!("Paper {} has no BibTeX citation", id),
            }
        }
        Command::Size { paths, offline } => {
            let ctx = SiteContext::load(settings, offline);
            let labels = futures::future::join_all(
                paths.iter().map(|path| ctx.sizes.resolve_label(path)),
            )
            .await;
            for (path, label) in paths.iter().zip(labels) {
                if let Some(label) = label {
                    println!("{}\t{}", path, label);
                }
            }
        }
        Command::Detail { path } => {
            let ctx = SiteContext::load(settings, true);
            let (html, _) = render_detail_page(&ctx, &path, None).await?;
            println!("{}", html);
        }
    }

    Ok(())
}
