//! Views of the logbook: the table engine, search, statistics and charts
//!
//! Everything here is synchronous and renderer-agnostic. Drawing is left to
//! implementations of [`TableRenderer`] and [`ChartRenderer`].

pub mod charts;
pub mod export;
pub mod search;
pub mod stats;
pub mod tables;
pub mod viewer;

pub use charts::{ChartHandle, ChartKind, ChartRenderer, ChartSlot, ChartSpec, Dataset};
pub use export::{export_csv, write_csv, ExportError};
pub use search::{tokenize, LogbookFilter};
pub use stats::{
    by_boat, by_crew, group_and_rank, month_axis, monthly_by_entity, monthly_totals, EntityKind,
    EntitySeries, EntityTimeline, MonthKey, MonthlySeries, RankedEntity, Ranking,
};
pub use tables::{
    CellValue, ColumnDef, ColumnKind, Page, SortState, TableEngine, TableRenderer, TableRow,
};
pub use viewer::{LogbookViewer, SearchBox, StatsTab};
