//! Distance statistics: per-entity rankings and monthly time series
//!
//! Every aggregation is parameterized by an extractor that yields the entity
//! names a row belongs to. A row's full distance is credited to each name it
//! yields, so a 10 km trip with two rowers counts 10 km for both.

use chrono::NaiveDate;
use indexmap::IndexMap;
use tracing::debug;

use lv_core::range::YearRange;
use lv_data::LogbookRow;

use crate::tables::{format_number, CellValue, ColumnDef, ColumnKind, TableEngine, TableRow};

/// What a statistic groups by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Boat,
    Rower,
}

impl EntityKind {
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Boat => "Boat",
            EntityKind::Rower => "Rower",
        }
    }
}

/// Resolved boat of a row
pub fn by_boat(row: &LogbookRow) -> Option<&str> {
    row.boat.known_name()
}

/// Resolved crew members of a row
pub fn by_crew(row: &LogbookRow) -> impl Iterator<Item = &str> {
    row.known_crew()
}

/// One entity's position in a [`Ranking`]
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntity {
    /// 1-based
    pub rank: usize,
    pub name: String,
    pub distance_km: f64,
}

impl TableRow for RankedEntity {
    fn cell(&self, key: &str) -> Option<CellValue<'_>> {
        match key {
            "rank" => Some(CellValue::Number(self.rank as f64)),
            "name" => Some(CellValue::Text(&self.name)),
            "distance" => Some(CellValue::Number(self.distance_km)),
            _ => None,
        }
    }
}

/// Entities ordered by total distance, descending
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ranking {
    entries: Vec<RankedEntity>,
}

impl Ranking {
    pub fn entries(&self) -> &[RankedEntity] {
        &self.entries
    }

    /// The first `n` entities, used for charting
    pub fn top(&self, n: usize) -> &[RankedEntity] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum over all entities
    pub fn total_km(&self) -> f64 {
        self.entries.iter().map(|e| e.distance_km).sum()
    }

    /// The full ranking as an independently sortable table
    pub fn to_table(&self, entity: EntityKind, page_size: usize) -> TableEngine<RankedEntity> {
        let columns = vec![
            ColumnDef::new("rank", "#", ColumnKind::Number).with_width(40.0),
            ColumnDef::new("name", entity.label(), ColumnKind::Text),
            ColumnDef::new("distance", "Distance", ColumnKind::Number).with_formatter(|cell| match cell {
                CellValue::Number(km) => format!("{} km", format_number((km * 10.0).round() / 10.0)),
                other => other.to_text(),
            }),
        ];
        TableEngine::new(self.entries.clone(), columns, page_size, None)
    }
}

/// Total distance per entity over rows whose year lies in `years`.
///
/// Ties keep the order in which entities first appear in `rows`. Rows
/// without distance credit nothing.
pub fn group_and_rank<'a, R, F, I>(rows: R, years: YearRange, mut extractor: F) -> Ranking
where
    R: IntoIterator<Item = &'a LogbookRow>,
    F: FnMut(&'a LogbookRow) -> I,
    I: IntoIterator<Item = &'a str>,
{
    let mut totals: IndexMap<&'a str, f64> = IndexMap::new();

    for row in rows {
        if !years.contains(row.year) || row.distance_km <= 0.0 {
            continue;
        }
        for name in extractor(row) {
            *totals.entry(name).or_insert(0.0) += row.distance_km;
        }
    }

    let mut totals: Vec<(&str, f64)> = totals.into_iter().collect();
    // Stable: equal totals stay in first-appearance order.
    totals.sort_by(|a, b| b.1.total_cmp(&a.1));

    debug!("Ranked {} entities for {}..{}", totals.len(), years.start, years.end);

    Ranking {
        entries: totals
            .into_iter()
            .enumerate()
            .map(|(idx, (name, distance_km))| RankedEntity {
                rank: idx + 1,
                name: name.to_string(),
                distance_km,
            })
            .collect(),
    }
}

/// A calendar month on a time axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    pub year: i32,
    /// 1-12
    pub month: u32,
}

impl MonthKey {
    /// `"Jun 2023"`
    pub fn label(&self) -> String {
        match NaiveDate::from_ymd_opt(self.year, self.month, 1) {
            Some(date) => date.format("%b %Y").to_string(),
            None => format!("{:02}/{}", self.month, self.year),
        }
    }
}

/// Twelve months for every year in `years`, in order
pub fn month_axis(years: YearRange) -> Vec<MonthKey> {
    years
        .years()
        .flat_map(|year| (1..=12).map(move |month| MonthKey { year, month }))
        .collect()
}

/// Bucket of `row` on the axis of `years`; `None` when out of range or undated
fn bucket_of(years: YearRange, row: &LogbookRow) -> Option<usize> {
    if !years.contains(row.year) {
        return None;
    }
    let month = row.date.month()?;
    Some((row.year - years.start) as usize * 12 + (month as usize - 1))
}

/// Dense monthly distance totals
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySeries {
    pub months: Vec<MonthKey>,
    pub values: Vec<f64>,
}

impl MonthlySeries {
    pub fn labels(&self) -> Vec<String> {
        self.months.iter().map(MonthKey::label).collect()
    }

    pub fn total_km(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// Monthly distance of rows in `years` that pass `predicate`.
///
/// Every month of every year in range gets a bucket, zero when empty. Rows
/// with an invalid date have no month and are left out.
pub fn monthly_totals<'a, R>(
    rows: R,
    years: YearRange,
    predicate: Option<&dyn Fn(&LogbookRow) -> bool>,
) -> MonthlySeries
where
    R: IntoIterator<Item = &'a LogbookRow>,
{
    let months = month_axis(years);
    let mut values = vec![0.0; months.len()];

    for row in rows {
        if predicate.is_some_and(|p| !p(row)) {
            continue;
        }
        if let Some(idx) = bucket_of(years, row) {
            values[idx] += row.distance_km;
        }
    }

    MonthlySeries { months, values }
}

/// One entity's monthly series
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySeries {
    pub name: String,
    pub values: Vec<f64>,
}

/// Monthly series of the top entities, sharing one axis
#[derive(Debug, Clone, PartialEq)]
pub struct EntityTimeline {
    pub months: Vec<MonthKey>,
    /// Ordered by total distance, descending
    pub series: Vec<EntitySeries>,
}

impl EntityTimeline {
    pub fn labels(&self) -> Vec<String> {
        self.months.iter().map(MonthKey::label).collect()
    }
}

/// Monthly distance of the `top_n` entities with the greatest total in `years`
pub fn monthly_by_entity<'a, F, I>(
    rows: &'a [LogbookRow],
    years: YearRange,
    mut extractor: F,
    top_n: usize,
) -> EntityTimeline
where
    F: FnMut(&'a LogbookRow) -> I,
    I: IntoIterator<Item = &'a str>,
{
    let ranking = group_and_rank(rows, years, &mut extractor);
    let months = month_axis(years);

    let index: IndexMap<&str, usize> = ranking
        .top(top_n)
        .iter()
        .enumerate()
        .map(|(idx, entity)| (entity.name.as_str(), idx))
        .collect();
    let mut values = vec![vec![0.0; months.len()]; index.len()];

    for row in rows {
        let Some(bucket) = bucket_of(years, row) else {
            continue;
        };
        for name in extractor(row) {
            if let Some(&idx) = index.get(name) {
                values[idx][bucket] += row.distance_km;
            }
        }
    }

    let series = index
        .keys()
        .zip(values)
        .map(|(name, values)| EntitySeries { name: name.to_string(), values })
        .collect();

    EntityTimeline { months, series }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lv_data::{DisplayName, LogDate};

    fn row(date: &str, km: f64, boat: &str, crew: &[&str]) -> LogbookRow {
        let date = LogDate::parse(date);
        LogbookRow::new(
            date.year().unwrap_or(2023),
            date,
            DisplayName::known(boat),
            crew.iter().map(|c| DisplayName::known(*c)).collect(),
            km,
            DisplayName::unknown(),
        )
    }

    fn rows() -> Vec<LogbookRow> {
        vec![
            row("01.06.2023", 10.0, "Wave", &["Ada", "Alan"]),
            row("15.06.2023", 4.0, "Gull", &["Alan"]),
            row("03.01.2023", 6.0, "Gull", &["Grace"]),
            row("20.12.2022", 8.0, "Wave", &["Ada"]),
            row("21.12.2022", 0.0, "Heron", &["Edsger"]),
            row("02.02.2024", 12.0, "Heron", &["Ada", "Grace", "Alan"]),
        ]
    }

    fn names(ranking: &Ranking) -> Vec<(&str, f64)> {
        ranking.entries().iter().map(|e| (e.name.as_str(), e.distance_km)).collect()
    }

    #[test]
    fn test_crew_credit_is_not_split() {
        let rows = vec![row("01.06.2023", 10.0, "B1", &["P1", "P2"])];
        let ranking = group_and_rank(&rows, YearRange::new(2023, 2024), by_crew);
        assert_eq!(names(&ranking), vec![("P1", 10.0), ("P2", 10.0)]);
    }

    #[test]
    fn test_single_valued_extractor_conserves_distance() {
        let rows = rows();
        let years = YearRange::new(2022, 2025);
        let ranking = group_and_rank(&rows, years, by_boat);

        let expected: f64 = rows.iter().filter(|r| years.contains(r.year)).map(|r| r.distance_km).sum();
        assert_eq!(ranking.total_km(), expected);
        assert_eq!(names(&ranking), vec![("Wave", 18.0), ("Heron", 12.0), ("Gull", 10.0)]);
    }

    #[test]
    fn test_multi_valued_extractor_counts_each_member() {
        let rows = rows();
        let years = YearRange::new(2022, 2025);
        let ranking = group_and_rank(&rows, years, by_crew);

        let expected: f64 = rows.iter().map(|r| r.distance_km * r.crew.len() as f64).sum();
        assert_eq!(ranking.total_km(), expected);
        assert_eq!(names(&ranking), vec![("Ada", 30.0), ("Alan", 26.0), ("Grace", 18.0)]);
        assert_eq!(ranking.entries()[2].rank, 3);
    }

    #[test]
    fn test_ties_keep_first_appearance() {
        let rows = vec![
            row("01.03.2023", 5.0, "Late", &[]),
            row("01.01.2023", 5.0, "Early", &[]),
            row("01.02.2023", 7.0, "Top", &[]),
        ];
        let ranking = group_and_rank(&rows, YearRange::single(2023), by_boat);
        assert_eq!(names(&ranking), vec![("Top", 7.0), ("Late", 5.0), ("Early", 5.0)]);
    }

    #[test]
    fn test_zero_distance_and_unknown_entities_credit_nothing() {
        let mut rows = rows();
        rows.push(LogbookRow::new(
            2022,
            LogDate::from_ymd(2022, 5, 5),
            DisplayName::unknown(),
            vec![DisplayName::unknown()],
            3.0,
            DisplayName::unknown(),
        ));
        let ranking = group_and_rank(&rows, YearRange::single(2022), by_crew);
        assert_eq!(names(&ranking), vec![("Ada", 8.0)]);

        let boats = group_and_rank(&rows, YearRange::single(2022), by_boat);
        assert_eq!(names(&boats), vec![("Wave", 8.0)]);
    }

    #[test]
    fn test_top_and_table_views() {
        let rows = rows();
        let ranking = group_and_rank(&rows, YearRange::new(2022, 2025), by_crew);
        assert_eq!(ranking.top(2).len(), 2);
        assert_eq!(ranking.top(20).len(), 3);

        let mut table = ranking.to_table(EntityKind::Rower, 25);
        assert_eq!(table.len(), 3);
        table.set_sort("name", true);
        let sorted: Vec<_> = table.rows().map(|e| e.name.as_str()).collect();
        assert_eq!(sorted, vec!["Ada", "Alan", "Grace"]);
        // Sorting the table leaves the ranking alone.
        assert_eq!(ranking.entries()[1].name, "Alan");
        assert_eq!(table.columns()[1].title, "Rower");
        assert_eq!(table.columns()[2].format(&ranking.entries()[0]), "30 km");
    }

    #[test]
    fn test_empty_range_ranks_nothing() {
        let rows = rows();
        assert!(group_and_rank(&rows, YearRange::single(1999), by_boat).is_empty());
        assert!(group_and_rank(&rows, YearRange::new(2023, 2023), by_boat).is_empty());
    }

    #[test]
    fn test_monthly_totals_are_dense() {
        let rows = rows();
        let years = YearRange::new(2022, 2024);
        let series = monthly_totals(&rows, years, None);

        assert_eq!(series.values.len(), 12 * 2);
        assert!(series.values.iter().all(|v| *v >= 0.0));
        assert_eq!(series.values[11], 8.0);
        assert_eq!(series.values[12], 6.0);
        assert_eq!(series.values[12 + 5], 14.0);
        assert_eq!(series.values[12 + 6], 0.0);

        let expected: f64 = rows.iter().filter(|r| years.contains(r.year)).map(|r| r.distance_km).sum();
        assert_eq!(series.total_km(), expected);
    }

    #[test]
    fn test_monthly_totals_with_predicate() {
        let rows = rows();
        let only_gull = |row: &LogbookRow| row.boat.as_str() == "Gull";
        let series = monthly_totals(&rows, YearRange::single(2023), Some(&only_gull));

        assert_eq!(series.values.len(), 12);
        assert_eq!(series.values[0], 6.0);
        assert_eq!(series.values[5], 4.0);
        assert_eq!(series.total_km(), 10.0);
    }

    #[test]
    fn test_monthly_totals_skip_invalid_dates() {
        let mut rows = rows();
        rows.push(LogbookRow::new(
            2023,
            LogDate::INVALID,
            DisplayName::known("Wave"),
            Vec::new(),
            99.0,
            DisplayName::unknown(),
        ));
        let series = monthly_totals(&rows, YearRange::single(2023), None);
        assert_eq!(series.total_km(), 20.0);
    }

    #[test]
    fn test_month_labels() {
        let axis = month_axis(YearRange::single(2023));
        assert_eq!(axis.len(), 12);
        assert_eq!(axis[5].label(), "Jun 2023");
        assert_eq!(axis[0], MonthKey { year: 2023, month: 1 });
        assert!(month_axis(YearRange::new(2023, 2023)).is_empty());
    }

    #[test]
    fn test_monthly_by_entity_keeps_top_n() {
        let rows = rows();
        let timeline = monthly_by_entity(&rows, YearRange::new(2022, 2025), by_crew, 2);

        assert_eq!(timeline.months.len(), 36);
        let names: Vec<_> = timeline.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Ada", "Alan"]);

        let ada = &timeline.series[0].values;
        assert_eq!(ada.len(), 36);
        assert_eq!(ada[11], 8.0);
        assert_eq!(ada[12 + 5], 10.0);
        assert_eq!(ada[24 + 1], 12.0);
        assert_eq!(ada.iter().sum::<f64>(), 30.0);
        assert_eq!(timeline.labels()[0], "Jan 2022");
    }
}
