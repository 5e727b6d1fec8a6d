//! Generic filter/sort/paginate table engine
//!
//! A [`TableEngine`] is a view over an immutable base row list. It never
//! reorders or mutates the base rows; the current view is a list of indices
//! into them, rebuilt from scratch on every filter change.

mod logbook;

pub use logbook::{keys, logbook_columns};

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use lv_core::pagination::{PageSummary, Pager, DEFAULT_PAGE_WINDOW};
use lv_data::LogDate;

/// Semantic type of a column, selecting its comparator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Case-insensitive text
    Text,
    /// Numeric
    Number,
    /// Chronological; invalid dates first
    Date,
}

/// A single cell, borrowed from its row
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue<'a> {
    Text(&'a str),
    Number(f64),
    Date(LogDate),
}

impl CellValue<'_> {
    /// Default display text
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Text(s) => (*s).to_string(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Date(d) => d.to_string(),
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse().ok(),
            CellValue::Date(_) => None,
        }
    }

    fn as_date(&self) -> LogDate {
        match self {
            CellValue::Date(d) => *d,
            CellValue::Text(s) => LogDate::parse(s),
            CellValue::Number(_) => LogDate::INVALID,
        }
    }
}

/// Integral values print without a fractional part
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        format!("{}", n)
    }
}

/// Compare two cells by the rules of `kind`
pub fn compare_cells(a: &CellValue<'_>, b: &CellValue<'_>, kind: ColumnKind) -> Ordering {
    match kind {
        ColumnKind::Text => match (a, b) {
            (CellValue::Text(a), CellValue::Text(b)) => compare_case_insensitive(a, b),
            _ => compare_case_insensitive(&a.to_text(), &b.to_text()),
        },
        // Missing numbers sort first, like invalid dates.
        ColumnKind::Number => match (a.as_number(), b.as_number()) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            (a, b) => a.is_some().cmp(&b.is_some()),
        },
        ColumnKind::Date => a.as_date().cmp(&b.as_date()),
    }
}

fn compare_case_insensitive(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Rows a [`TableEngine`] can display
pub trait TableRow {
    /// Value of the column `key`, or `None` if the row has no such column
    fn cell(&self, key: &str) -> Option<CellValue<'_>>;
}

/// Custom cell formatter
pub type Formatter = Arc<dyn Fn(&CellValue<'_>) -> String + Send + Sync>;

/// Column descriptor
#[derive(Clone)]
pub struct ColumnDef {
    pub key: String,
    pub title: String,
    pub kind: ColumnKind,
    pub formatter: Option<Formatter>,
    pub hidden: bool,
    /// Fixed width hint for renderers
    pub width: Option<f32>,
}

impl ColumnDef {
    pub fn new(key: impl Into<String>, title: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            kind,
            formatter: None,
            hidden: false,
            width: None,
        }
    }

    pub fn with_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&CellValue<'_>) -> String + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    /// Display text of this column's cell in `row`; empty when the row lacks it
    pub fn format<R: TableRow>(&self, row: &R) -> String {
        match row.cell(&self.key) {
            Some(cell) => match &self.formatter {
                Some(formatter) => formatter(&cell),
                None => cell.to_text(),
            },
            None => String::new(),
        }
    }
}

impl fmt::Debug for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("key", &self.key)
            .field("title", &self.title)
            .field("kind", &self.kind)
            .field("formatter", &self.formatter.is_some())
            .field("hidden", &self.hidden)
            .field("width", &self.width)
            .finish()
    }
}

/// Active sort of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub column: String,
    pub ascending: bool,
}

impl SortState {
    pub fn new(column: impl Into<String>, ascending: bool) -> Self {
        Self { column: column.into(), ascending }
    }
}

/// One page of the current view
#[derive(Debug)]
pub struct Page<'a, R> {
    /// 1-based page number after clamping
    pub number: usize,
    pub total_pages: usize,
    pub rows: Vec<&'a R>,
    pub summary: PageSummary,
}

/// Something that can draw a page of rows
pub trait TableRenderer<R> {
    fn render(&mut self, columns: &[&ColumnDef], page: &Page<'_, R>);
}

type Predicate<R> = Arc<dyn Fn(&R) -> bool + Send + Sync>;

/// Filter/sort/paginate view over a shared row list
pub struct TableEngine<R> {
    rows: Arc<[R]>,
    columns: Vec<ColumnDef>,
    filter: Option<Predicate<R>>,
    /// Indices into `rows`, filtered and sorted
    visible: Vec<usize>,
    sort: Option<SortState>,
    pager: Pager,
}

impl<R: TableRow> TableEngine<R> {
    /// Create an engine showing all rows, sorted by `initial_sort` if it names a column
    pub fn new(
        rows: impl Into<Arc<[R]>>,
        columns: Vec<ColumnDef>,
        page_size: usize,
        initial_sort: Option<SortState>,
    ) -> Self {
        let rows = rows.into();
        let mut engine = Self {
            visible: (0..rows.len()).collect(),
            rows,
            columns,
            filter: None,
            sort: None,
            pager: Pager::new(page_size),
        };
        if let Some(sort) = initial_sort {
            engine.set_sort(&sort.column, sort.ascending);
        }
        engine.pager.reset(engine.visible.len());
        engine
    }

    /// Replace the filter. The visible set is recomputed from the base rows,
    /// the active sort is reapplied and the page goes back to 1.
    ///
    /// A panic inside `predicate` propagates to the caller.
    pub fn set_filter<F>(&mut self, predicate: F)
    where
        F: Fn(&R) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(predicate));
        self.refresh();
    }

    /// Show all rows again
    pub fn clear_filter(&mut self) {
        self.filter = None;
        self.refresh();
    }

    fn refresh(&mut self) {
        self.visible = match &self.filter {
            Some(predicate) => self
                .rows
                .iter()
                .enumerate()
                .filter(|(_, row)| predicate(row))
                .map(|(idx, _)| idx)
                .collect(),
            None => (0..self.rows.len()).collect(),
        };
        self.apply_sort();
        self.pager.reset(self.visible.len());
        debug!("Table filter matched {} of {} rows", self.visible.len(), self.rows.len());
    }

    /// Sort the current view by `column`. Ties keep base-row order.
    ///
    /// Returns `false` (and leaves the view untouched) for an unknown column.
    pub fn set_sort(&mut self, column: &str, ascending: bool) -> bool {
        if self.column(column).is_none() {
            warn!("Ignoring sort on unknown column '{}'", column);
            return false;
        }
        self.sort = Some(SortState::new(column, ascending));
        self.apply_sort();
        self.pager.reset(self.visible.len());
        true
    }

    /// Header click: the active column flips direction, another column starts ascending
    pub fn toggle_sort(&mut self, column: &str) -> bool {
        let ascending = match &self.sort {
            Some(sort) if sort.column == column => !sort.ascending,
            _ => true,
        };
        self.set_sort(column, ascending)
    }

    pub fn sort_state(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    fn apply_sort(&mut self) {
        let Some(sort) = &self.sort else {
            return;
        };
        let Some(kind) = self.column(&sort.column).map(|c| c.kind) else {
            return;
        };
        let rows = &self.rows;
        let key = sort.column.as_str();
        let ascending = sort.ascending;

        self.visible.sort_by(|&a, &b| {
            let ord = match (rows[a].cell(key), rows[b].cell(key)) {
                (Some(x), Some(y)) => compare_cells(&x, &y, kind),
                (x, y) => x.is_some().cmp(&y.is_some()),
            };
            let ord = if ascending { ord } else { ord.reverse() };
            ord.then(a.cmp(&b))
        });
    }

    /// Page `n` of the current view, clamped into range
    pub fn page(&self, n: usize) -> Page<'_, R> {
        let number = self.pager.clamp(n);
        let range = self.pager.range_for(number);
        let mut pager = self.pager.clone();
        pager.seek_to(number);

        Page {
            number,
            total_pages: self.pager.total_pages(),
            rows: self.visible[range].iter().map(|&idx| &self.rows[idx]).collect(),
            summary: pager.summary(),
        }
    }

    /// The page the engine currently points at
    pub fn current_page(&self) -> Page<'_, R> {
        self.page(self.pager.current())
    }

    /// Move to page `n` (clamped). Returns the page selected.
    pub fn set_page(&mut self, n: usize) -> usize {
        self.pager.seek_to(n)
    }

    pub fn first_page(&mut self) -> bool {
        self.pager.first()
    }

    pub fn previous_page(&mut self) -> bool {
        self.pager.previous()
    }

    pub fn next_page(&mut self) -> bool {
        self.pager.next()
    }

    pub fn last_page(&mut self) -> bool {
        self.pager.last()
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    /// Page buttons to show around the current page
    pub fn page_window(&self) -> std::ops::RangeInclusive<usize> {
        self.pager.window(DEFAULT_PAGE_WINDOW)
    }

    pub fn total_pages(&self) -> usize {
        self.pager.total_pages()
    }

    /// Number of rows in the current view
    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// All rows of the current view, filtered and sorted
    pub fn rows(&self) -> impl Iterator<Item = &R> + '_ {
        self.visible.iter().map(move |&idx| &self.rows[idx])
    }

    /// The unfiltered base rows
    pub fn base_rows(&self) -> &Arc<[R]> {
        &self.rows
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Columns that are not hidden, in declaration order
    pub fn visible_columns(&self) -> Vec<&ColumnDef> {
        self.columns.iter().filter(|c| !c.hidden).collect()
    }

    pub fn column(&self, key: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Show or hide a column. Returns `false` for an unknown column.
    pub fn set_column_hidden(&mut self, key: &str, hidden: bool) -> bool {
        match self.columns.iter_mut().find(|c| c.key == key) {
            Some(column) => {
                column.hidden = hidden;
                true
            }
            None => false,
        }
    }

    /// Draw the current page
    pub fn render(&self, renderer: &mut dyn TableRenderer<R>) {
        let columns = self.visible_columns();
        renderer.render(&columns, &self.current_page());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: usize,
        name: &'static str,
        group: f64,
        day: LogDate,
    }

    impl TableRow for Item {
        fn cell(&self, key: &str) -> Option<CellValue<'_>> {
            match key {
                "id" => Some(CellValue::Number(self.id as f64)),
                "name" => Some(CellValue::Text(self.name)),
                "group" => Some(CellValue::Number(self.group)),
                "day" => Some(CellValue::Date(self.day)),
                _ => None,
            }
        }
    }

    fn columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef::new("id", "Id", ColumnKind::Number).hidden(),
            ColumnDef::new("name", "Name", ColumnKind::Text),
            ColumnDef::new("group", "Group", ColumnKind::Number),
            ColumnDef::new("day", "Day", ColumnKind::Date),
        ]
    }

    fn items() -> Vec<Item> {
        let names = ["delta", "Alpha", "charlie", "bravo", "alpha", "Echo", "foxtrot"];
        let groups = [2.0, 1.0, 2.0, 1.0, 3.0, 1.0, 2.0];
        let days = ["03.01.2022", "01.01.2022", "bad", "02.01.2022", "01.01.2021", "05.05.2020", "03.01.2022"];
        (0..names.len())
            .map(|i| Item { id: i, name: names[i], group: groups[i], day: LogDate::parse(days[i]) })
            .collect()
    }

    fn engine(page_size: usize) -> TableEngine<Item> {
        TableEngine::new(items(), columns(), page_size, None)
    }

    fn ids(engine: &TableEngine<Item>) -> Vec<usize> {
        engine.rows().map(|r| r.id).collect()
    }

    #[test]
    fn test_filter_is_subset_satisfying_predicate() {
        let mut engine = engine(3);
        engine.set_filter(|item: &Item| item.group >= 2.0);

        assert!(engine.len() <= engine.base_rows().len());
        assert!(engine.rows().all(|r| r.group >= 2.0));
        assert_eq!(ids(&engine), vec![0, 2, 4, 6]);
        // Base list untouched.
        assert_eq!(engine.base_rows()[1].name, "Alpha");
    }

    #[test]
    fn test_filter_resets_page_and_keeps_sort() {
        let mut engine = engine(2);
        engine.set_sort("name", false);
        engine.set_page(3);
        assert_eq!(engine.pager().current(), 3);

        engine.set_filter(|item: &Item| item.group < 3.0);
        assert_eq!(engine.pager().current(), 1);
        assert_eq!(engine.sort_state(), Some(&SortState::new("name", false)));
        let names: Vec<_> = engine.rows().map(|r| r.name).collect();
        assert_eq!(names, vec!["foxtrot", "Echo", "delta", "charlie", "bravo", "Alpha"]);
    }

    #[test]
    fn test_text_sort_is_case_insensitive_and_stable() {
        let mut engine = engine(10);
        engine.set_sort("name", true);
        // "Alpha" (1) precedes "alpha" (4): equal keys keep insertion order.
        assert_eq!(ids(&engine), vec![1, 4, 3, 2, 0, 5, 6]);
    }

    #[test]
    fn test_resort_is_idempotent() {
        let mut engine = engine(10);
        engine.set_sort("group", true);
        let once = ids(&engine);
        engine.set_sort("group", true);
        assert_eq!(ids(&engine), once);
    }

    #[test]
    fn test_sort_x_then_y_then_x_restores_order() {
        let mut engine = engine(10);
        engine.set_sort("group", true);
        let by_group = ids(&engine);
        assert_eq!(by_group, vec![1, 3, 5, 0, 2, 6, 4]);

        engine.set_sort("name", false);
        engine.set_sort("group", true);
        assert_eq!(ids(&engine), by_group);
    }

    #[test]
    fn test_descending_keeps_ties_in_insertion_order() {
        let mut engine = engine(10);
        engine.set_sort("group", false);
        assert_eq!(ids(&engine), vec![4, 0, 2, 6, 1, 3, 5]);
    }

    #[test]
    fn test_date_sort_puts_invalid_first() {
        let mut engine = engine(10);
        engine.set_sort("day", true);
        assert_eq!(ids(&engine), vec![2, 5, 4, 1, 3, 0, 6]);
    }

    #[test]
    fn test_unknown_sort_column_is_ignored() {
        let mut engine = engine(10);
        assert!(!engine.set_sort("nope", true));
        assert_eq!(engine.sort_state(), None);
        assert_eq!(ids(&engine), vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_toggle_sort_flips_direction() {
        let mut engine = engine(10);
        engine.toggle_sort("group");
        assert_eq!(engine.sort_state(), Some(&SortState::new("group", true)));
        engine.toggle_sort("group");
        assert_eq!(engine.sort_state(), Some(&SortState::new("group", false)));
        engine.toggle_sort("name");
        assert_eq!(engine.sort_state(), Some(&SortState::new("name", true)));
    }

    #[test]
    fn test_pages_concatenate_to_full_view() {
        for page_size in 1..=8 {
            let mut engine = engine(page_size);
            engine.set_sort("name", true);
            engine.set_filter(|item: &Item| item.id != 3);

            let mut seen = Vec::new();
            for n in 1..=engine.total_pages() {
                seen.extend(engine.page(n).rows.iter().map(|r| r.id));
            }
            assert_eq!(seen, ids(&engine), "page size {page_size}");
        }
    }

    #[test]
    fn test_page_clamping() {
        let engine = engine(3);
        assert_eq!(engine.total_pages(), 3);
        assert_eq!(engine.page(0).number, 1);
        let last = engine.page(42);
        assert_eq!(last.number, 3);
        assert_eq!(last.rows.len(), 1);
        assert_eq!(last.summary, PageSummary { start: 7, end: 7, total: 7 });
    }

    #[test]
    fn test_empty_view_is_valid() {
        let mut engine = engine(3);
        engine.set_filter(|_: &Item| false);

        assert!(engine.is_empty());
        assert_eq!(engine.total_pages(), 0);
        let page = engine.page(5);
        assert_eq!(page.number, 1);
        assert!(page.rows.is_empty());
        assert_eq!(page.summary.start, 0);

        engine.clear_filter();
        assert_eq!(engine.len(), 7);
    }

    #[test]
    fn test_page_navigation() {
        let mut engine = engine(3);
        assert!(!engine.previous_page());
        assert!(engine.next_page());
        assert!(engine.last_page());
        assert_eq!(engine.current_page().number, 3);
        assert!(!engine.next_page());
        assert!(engine.first_page());
        assert_eq!(engine.page_window(), 1..=3);
    }

    #[test]
    fn test_visible_columns_and_formatter() {
        let mut engine = engine(3);
        let keys: Vec<_> = engine.visible_columns().iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["name", "group", "day"]);

        assert!(engine.set_column_hidden("group", true));
        assert!(!engine.set_column_hidden("missing", true));
        assert_eq!(engine.visible_columns().len(), 2);

        let column = ColumnDef::new("group", "Group", ColumnKind::Number)
            .with_formatter(|cell| format!("{} pts", cell.to_text()));
        assert_eq!(column.format(&items()[4]), "3 pts");
        assert_eq!(ColumnDef::new("day", "Day", ColumnKind::Date).format(&items()[2]), "");
    }

    #[test]
    fn test_render_passes_visible_columns_and_current_page() {
        struct Recorder(Vec<String>, usize);
        impl TableRenderer<Item> for Recorder {
            fn render(&mut self, columns: &[&ColumnDef], page: &Page<'_, Item>) {
                self.0 = columns.iter().map(|c| c.title.clone()).collect();
                self.1 = page.rows.len();
            }
        }

        let mut engine = engine(4);
        engine.next_page();
        let mut recorder = Recorder(Vec::new(), 0);
        engine.render(&mut recorder);
        assert_eq!(recorder.0, vec!["Name", "Group", "Day"]);
        assert_eq!(recorder.1, 3);
    }

    #[test]
    #[should_panic(expected = "predicate failed")]
    fn test_predicate_panic_propagates() {
        let mut engine = engine(3);
        engine.set_filter(|_: &Item| panic!("predicate failed"));
    }
}
