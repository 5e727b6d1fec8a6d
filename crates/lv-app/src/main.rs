//! Logbook viewer command line entry point

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use anyhow::{Context, Result};
use clap::Parser;
use parking_lot::Mutex;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use lv_core::events::events::{FiltersApplied, StatisticsUpdated};
use lv_core::{handler_for, EventBus, ViewerConfig, YearRange};
use lv_data::{DataStore, DirectorySource, SourceConfig};
use lv_views::{EntityKind, LogbookViewer, SearchBox, StatsTab};

mod render;

use render::{TextChart, TextTable};

/// Browse a rowing club logbook
#[derive(Debug, Parser)]
#[command(name = "logview", version)]
struct Cli {
    /// Directory holding logbooks.json, boats.json, persons.json and destinations.json
    data_dir: PathBuf,

    /// Viewer settings (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Document file names (JSON), if they differ from the defaults
    #[arg(long)]
    sources: Option<PathBuf>,

    /// Years to show, `2023` or `2020-2023` (inclusive)
    #[arg(long, value_parser = parse_years)]
    years: Option<(i32, i32)>,

    /// Distance range in km, `5-20`
    #[arg(long, value_parser = parse_distance)]
    distance: Option<(f64, f64)>,

    /// Search terms; quote a term to match a phrase
    #[arg(long)]
    search: Option<String>,

    /// Column header clicks, in order (repeat a column to sort descending)
    #[arg(long = "sort")]
    sort: Vec<String>,

    /// Page to show
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Write the filtered and sorted table to a CSV file
    #[arg(long)]
    export: Option<PathBuf>,

    /// Statistics tab: boats, rowers, timeline or monthly
    #[arg(long, value_parser = parse_tab)]
    stats: Option<StatsTab>,

    /// Years for the statistics tab, `2023` or `2020-2023` (inclusive)
    #[arg(long, value_parser = parse_years)]
    stats_years: Option<(i32, i32)>,

    /// Group the timeline by rower instead of boat
    #[arg(long)]
    by_rower: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_span<T: std::str::FromStr>(s: &str) -> Result<(T, T), String> {
    let (lo, hi) = s.split_once('-').unwrap_or((s, s));
    let parse = |part: &str| part.trim().parse::<T>().map_err(|_| format!("invalid value '{}'", part));
    Ok((parse(lo)?, parse(hi)?))
}

fn parse_years(s: &str) -> Result<(i32, i32), String> {
    parse_span(s)
}

fn parse_distance(s: &str) -> Result<(f64, f64), String> {
    parse_span(s)
}

fn parse_tab(s: &str) -> Result<StatsTab, String> {
    StatsTab::from_name(s).ok_or_else(|| format!("unknown statistics tab '{}'", s))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    info!("Starting logbook viewer");

    let config = match &cli.config {
        Some(path) => ViewerConfig::from_file(path)?,
        None => ViewerConfig::default(),
    };
    let sources = match &cli.sources {
        Some(path) => SourceConfig::from_file(path)?,
        None => SourceConfig::default(),
    };

    // Nothing is wired up until every document has loaded.
    let source = DirectorySource::with_config(&cli.data_dir, sources);
    let store = DataStore::load(&source)
        .await
        .with_context(|| format!("failed to load logbook data from {}", cli.data_dir.display()))?;

    let events = Arc::new(EventBus::new());
    events.subscribe::<FiltersApplied>(handler_for(|e: &FiltersApplied| {
        debug!("{} trips on {} pages", e.visible_rows, e.total_pages);
    }));
    events.subscribe::<StatisticsUpdated>(handler_for(|e: &StatisticsUpdated| {
        debug!("Statistics '{}' has {} series entries", e.tab, e.series_len);
    }));

    let viewer = Arc::new(Mutex::new(LogbookViewer::new(Arc::new(store), config, events)));

    {
        let mut viewer = viewer.lock();
        if let Some((from, to)) = cli.years {
            viewer.commit_years(from, to);
        }
        if let Some((min, max)) = cli.distance {
            viewer.commit_distance(min, max);
        }
        for column in &cli.sort {
            viewer.sort_by(column);
        }
    }

    if let Some(text) = &cli.search {
        // Replay the text keystroke by keystroke; only the final text is applied.
        let search = SearchBox::new(viewer.clone());
        let mut typed = String::new();
        for ch in text.chars() {
            typed.push(ch);
            search.input(&typed);
        }
        search.flush();
    }

    let mut viewer = viewer.lock();
    viewer.goto_page(cli.page);
    viewer.render_table(&mut TextTable::new(io::stdout()));

    if let Some(path) = &cli.export {
        let count = viewer
            .export_csv(path)
            .with_context(|| format!("failed to export {}", path.display()))?;
        println!("Exported {} trips to {}", count, path.display());
    }

    if let Some(tab) = cli.stats {
        if let Some((from, to)) = cli.stats_years {
            viewer.set_stats_years(tab, YearRange::new(from, to.saturating_add(1)));
        }
        if cli.by_rower {
            viewer.set_grouping(EntityKind::Rower);
        }

        let mut charts = TextChart::new(io::stdout());
        println!();
        viewer.select_tab(tab, &mut charts);
        if let Some(ranking) = viewer.ranking_table() {
            println!();
            ranking.render(&mut TextTable::new(io::stdout()));
        }
        viewer.clear_charts(&mut charts);
    }

    Ok(())
}
