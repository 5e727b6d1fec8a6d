//! The logbook viewer controller
//!
//! [`LogbookViewer`] is the single owner of all UI state: the loaded store,
//! the logbook table, filter and statistics settings, and the live charts.
//! Input handlers take `&mut self`; results are announced on the event bus.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use parking_lot::Mutex;
use tracing::{debug, info};

use lv_core::events::events::{DataLoaded, FiltersApplied, PageChanged, StatisticsUpdated};
use lv_core::{Debouncer, EventBus, RangeSelector, SliderScale, ViewerConfig, YearRange};
use lv_data::{DataStore, LogbookRow};

use crate::charts::{ChartHandle, ChartRenderer, ChartSlot, ChartSpec};
use crate::export::{self, ExportError};
use crate::search::{matches_terms, LogbookFilter};
use crate::stats::{
    by_boat, by_crew, group_and_rank, monthly_by_entity, monthly_totals, EntityKind, RankedEntity,
};
use crate::tables::{logbook_columns, Page, SortState, TableEngine, TableRenderer};

/// Statistics tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatsTab {
    /// Ranking of boats by total distance
    BoatKm,
    /// Ranking of rowers by total distance
    RowerKm,
    /// Monthly distance of the top boats or rowers
    KmOverTime,
    /// Monthly distance of all trips matching the search
    MonthlyKm,
}

impl StatsTab {
    pub const ALL: [StatsTab; 4] = [StatsTab::BoatKm, StatsTab::RowerKm, StatsTab::KmOverTime, StatsTab::MonthlyKm];

    pub fn name(&self) -> &'static str {
        match self {
            StatsTab::BoatKm => "boats",
            StatsTab::RowerKm => "rowers",
            StatsTab::KmOverTime => "timeline",
            StatsTab::MonthlyKm => "monthly",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tab| tab.name() == name)
    }

    fn index(&self) -> usize {
        match self {
            StatsTab::BoatKm => 0,
            StatsTab::RowerKm => 1,
            StatsTab::KmOverTime => 2,
            StatsTab::MonthlyKm => 3,
        }
    }
}

pub struct LogbookViewer {
    config: ViewerConfig,
    store: Arc<DataStore>,
    events: Arc<EventBus>,

    table: TableEngine<LogbookRow>,
    years: RangeSelector<i32>,
    distance: RangeSelector<f64>,
    slider: SliderScale,
    search_text: String,
    /// Filter behind the current table view
    filter: LogbookFilter,

    stats_tab: StatsTab,
    stats_years: [YearRange; 4],
    grouping: EntityKind,
    ranking_table: Option<TableEngine<RankedEntity>>,
    charts: [ChartSlot; 4],
}

impl LogbookViewer {
    /// Wire a loaded store into a viewer showing the most recent year
    pub fn new(store: Arc<DataStore>, config: ViewerConfig, events: Arc<EventBus>) -> Self {
        let (first, latest) = match (store.years().last(), store.latest_year()) {
            (Some(&first), Some(latest)) => (first, latest),
            _ => (0, 0),
        };
        let mut years = RangeSelector::new(first, latest);
        years.commit(latest, latest);

        let bounds = config.distance_bounds;
        let distance = RangeSelector::new(bounds.min, bounds.max);

        let sort = SortState::new(config.initial_sort.column.clone(), config.initial_sort.ascending);
        let table = TableEngine::new(store.rows().clone(), logbook_columns(), config.page_size, Some(sort));

        events.publish(DataLoaded {
            logbook_rows: store.rows().len(),
            boats: store.boat_count(),
            persons: store.person_count(),
            destinations: store.destination_count(),
        });

        let mut viewer = Self {
            filter: LogbookFilter::new(years.year_range(), distance.distance_range(), ""),
            config,
            store,
            events,
            table,
            years,
            distance,
            slider: SliderScale::distance_km(),
            search_text: String::new(),
            stats_tab: StatsTab::BoatKm,
            stats_years: [YearRange::single(latest); 4],
            grouping: EntityKind::Boat,
            ranking_table: None,
            charts: Default::default(),
        };
        viewer.apply_filters();
        viewer
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<DataStore> {
        &self.store
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    // Filters

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Record search input without refiltering; see [`SearchBox`]
    pub fn set_search_text(&mut self, text: &str) {
        self.search_text.clear();
        self.search_text.push_str(text);
    }

    /// Set the search text and refilter immediately
    pub fn search(&mut self, text: &str) {
        self.set_search_text(text);
        self.apply_filters();
    }

    pub fn year_selector(&self) -> &RangeSelector<i32> {
        &self.years
    }

    pub fn distance_selector(&self) -> &RangeSelector<f64> {
        &self.distance
    }

    /// Year slider change event; both handles are inclusive years
    pub fn commit_years(&mut self, from: i32, to: i32) -> bool {
        let changed = self.years.commit(from, to);
        if changed {
            self.apply_filters();
        }
        changed
    }

    /// Distance slider change event in km
    pub fn commit_distance(&mut self, min_km: f64, max_km: f64) -> bool {
        let changed = self.distance.commit(min_km, max_km);
        if changed {
            self.apply_filters();
        }
        changed
    }

    /// Distance slider change event as handle positions in percent
    pub fn commit_distance_positions(&mut self, low: f64, high: f64) -> bool {
        let (min_km, max_km) = (self.slider.value_at(low), self.slider.value_at(high));
        self.commit_distance(min_km, max_km)
    }

    /// Select all years and distances and clear the search
    pub fn reset_filters(&mut self) {
        self.years.reset();
        self.distance.reset();
        self.search_text.clear();
        self.apply_filters();
    }

    pub fn filter(&self) -> &LogbookFilter {
        &self.filter
    }

    /// Rebuild the logbook view from the committed selectors and search text
    pub fn apply_filters(&mut self) {
        self.filter = LogbookFilter::new(
            self.years.year_range(),
            self.distance.distance_range(),
            &self.search_text,
        );
        let filter = self.filter.clone();
        self.table.set_filter(move |row| filter.matches(row));

        info!(
            "Filters applied: {} of {} trips, {} pages",
            self.table.len(),
            self.store.rows().len(),
            self.table.total_pages()
        );
        self.events.publish(FiltersApplied {
            visible_rows: self.table.len(),
            total_pages: self.table.total_pages(),
        });
    }

    // Table

    pub fn table(&self) -> &TableEngine<LogbookRow> {
        &self.table
    }

    /// Header click
    pub fn sort_by(&mut self, column: &str) -> bool {
        let sorted = self.table.toggle_sort(column);
        if sorted {
            self.publish_page();
        }
        sorted
    }

    pub fn page(&self) -> Page<'_, LogbookRow> {
        self.table.current_page()
    }

    pub fn goto_page(&mut self, page: usize) -> usize {
        let before = self.table.pager().current();
        let page = self.table.set_page(page);
        if page != before {
            self.publish_page();
        }
        page
    }

    pub fn first_page(&mut self) -> bool {
        let moved = self.table.first_page();
        self.page_moved(moved)
    }

    pub fn previous_page(&mut self) -> bool {
        let moved = self.table.previous_page();
        self.page_moved(moved)
    }

    pub fn next_page(&mut self) -> bool {
        let moved = self.table.next_page();
        self.page_moved(moved)
    }

    pub fn last_page(&mut self) -> bool {
        let moved = self.table.last_page();
        self.page_moved(moved)
    }

    fn page_moved(&self, moved: bool) -> bool {
        if moved {
            self.publish_page();
        }
        moved
    }

    fn publish_page(&self) {
        self.events.publish(PageChanged {
            page: self.table.pager().current(),
            total_pages: self.table.total_pages(),
        });
    }

    pub fn render_table(&self, renderer: &mut dyn TableRenderer<LogbookRow>) {
        self.table.render(renderer);
    }

    /// Write the whole filtered and sorted logbook view as CSV
    pub fn export_csv(&self, path: impl AsRef<Path>) -> Result<usize, ExportError> {
        export::export_csv(&self.table, path)
    }

    // Statistics

    pub fn stats_tab(&self) -> StatsTab {
        self.stats_tab
    }

    pub fn stats_years(&self, tab: StatsTab) -> YearRange {
        self.stats_years[tab.index()]
    }

    pub fn grouping(&self) -> EntityKind {
        self.grouping
    }

    /// Switch tab and redraw its chart
    pub fn select_tab(&mut self, tab: StatsTab, renderer: &mut dyn ChartRenderer) -> ChartHandle {
        self.stats_tab = tab;
        self.update_statistics(renderer)
    }

    /// Change the year range of one tab, clamped to the years in the data.
    /// Takes effect on the next update.
    pub fn set_stats_years(&mut self, tab: StatsTab, years: YearRange) {
        let (first, last) = self.years.bounds();
        self.stats_years[tab.index()] = years.clamp_to(first, last);
    }

    /// Group the time-series tab by boat or rower. Takes effect on the next update.
    pub fn set_grouping(&mut self, grouping: EntityKind) {
        self.grouping = grouping;
    }

    /// Recompute the active tab and replace its chart
    pub fn update_statistics(&mut self, renderer: &mut dyn ChartRenderer) -> ChartHandle {
        let tab = self.stats_tab;
        let years = self.stats_years[tab.index()];
        let rows = self.store.rows().clone();

        let (spec, series_len) = match tab {
            StatsTab::BoatKm | StatsTab::RowerKm => {
                let entity = if tab == StatsTab::BoatKm { EntityKind::Boat } else { EntityKind::Rower };
                let ranking = match entity {
                    EntityKind::Boat => group_and_rank(rows.iter(), years, by_boat),
                    EntityKind::Rower => group_and_rank(rows.iter(), years, by_crew),
                };
                self.ranking_table = Some(ranking.to_table(entity, self.config.page_size));
                (ChartSpec::ranking(&ranking, entity, self.config.top_n), ranking.len())
            }
            StatsTab::KmOverTime => {
                let top_n = self.config.time_series_top_n;
                let timeline = match self.grouping {
                    EntityKind::Boat => monthly_by_entity(&rows, years, by_boat, top_n),
                    EntityKind::Rower => monthly_by_entity(&rows, years, by_crew, top_n),
                };
                self.ranking_table = None;
                (ChartSpec::timeline(&timeline, self.grouping), timeline.series.len())
            }
            StatsTab::MonthlyKm => {
                let terms = &self.filter.terms;
                let by_search = |row: &LogbookRow| matches_terms(terms, row);
                let predicate: Option<&dyn Fn(&LogbookRow) -> bool> =
                    if terms.is_empty() { None } else { Some(&by_search) };
                let series = monthly_totals(rows.iter(), years, predicate);
                self.ranking_table = None;
                (ChartSpec::monthly(&series), series.values.len())
            }
        };

        let handle = self.charts[tab.index()].replace(renderer, spec);
        debug!("Statistics '{}' updated for {}..{}", tab.name(), years.start, years.end);
        self.events.publish(StatisticsUpdated {
            tab: tab.name().to_string(),
            series_len,
        });
        handle
    }

    /// The full ranking of the active ranking tab
    pub fn ranking_table(&self) -> Option<&TableEngine<RankedEntity>> {
        self.ranking_table.as_ref()
    }

    /// Mutable access for sorting and paging the ranking independently
    pub fn ranking_table_mut(&mut self) -> Option<&mut TableEngine<RankedEntity>> {
        self.ranking_table.as_mut()
    }

    pub fn chart(&self, tab: StatsTab) -> &ChartSlot {
        &self.charts[tab.index()]
    }

    /// Destroy every live chart
    pub fn clear_charts(&mut self, renderer: &mut dyn ChartRenderer) {
        for slot in &mut self.charts {
            slot.clear(renderer);
        }
    }
}

/// Search input debounced in front of a shared viewer
pub struct SearchBox {
    viewer: Arc<Mutex<LogbookViewer>>,
    debouncer: Debouncer,
}

impl SearchBox {
    /// Debounce with the viewer's configured quiet window
    pub fn new(viewer: Arc<Mutex<LogbookViewer>>) -> Self {
        let delay = viewer.lock().config().debounce();
        Self::with_delay(viewer, delay)
    }

    pub fn with_delay(viewer: Arc<Mutex<LogbookViewer>>, delay: Duration) -> Self {
        let target = viewer.clone();
        let debouncer = Debouncer::new(delay, move || target.lock().apply_filters());
        Self { viewer, debouncer }
    }

    /// A keystroke: store the text now, refilter once input goes quiet.
    ///
    /// Must be called inside a tokio runtime.
    pub fn input(&self, text: &str) {
        self.viewer.lock().set_search_text(text);
        self.debouncer.call();
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Apply pending input now. The viewer lock must not be held.
    pub fn flush(&self) -> bool {
        self.debouncer.flush()
    }
}
