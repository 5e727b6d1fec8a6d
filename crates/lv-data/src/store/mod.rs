//! Lookup tables and the denormalized row list
//!
//! A [`DataStore`] is built once per run. After that it is read-only: the row
//! list is shared as `Arc<[LogbookRow]>` and every view derives from it.

use std::sync::Arc;
use ahash::AHashMap;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::date::LogDate;
use crate::model::{Boat, Destination, DisplayName, LogbookEntry, LogbookRow, Person};
use crate::sources::{DataSource, Document};
use crate::LoadError;

/// Loaded logbook data
#[derive(Debug, Clone)]
pub struct DataStore {
    boats: AHashMap<String, Boat>,
    persons: AHashMap<String, Person>,
    destinations: AHashMap<String, Destination>,
    rows: Arc<[LogbookRow]>,
    /// Distinct row years, most recent first
    years: Vec<i32>,
}

impl DataStore {
    /// Fetch all four documents concurrently and build the store.
    ///
    /// Any fetch or parse failure aborts the whole load.
    pub async fn load(source: &dyn DataSource) -> Result<Self, LoadError> {
        info!("Loading logbook data from {}", source.source_name());

        let (logbooks, boats, persons, destinations) = tokio::try_join!(
            source.fetch(Document::Logbooks),
            source.fetch(Document::Boats),
            source.fetch(Document::Persons),
            source.fetch(Document::Destinations),
        )?;

        Ok(Self::build(
            parse(Document::Logbooks, &logbooks)?,
            parse(Document::Boats, &boats)?,
            parse(Document::Persons, &persons)?,
            parse(Document::Destinations, &destinations)?,
        ))
    }

    /// Build lookup maps and denormalize every entry into a display row
    pub fn build(
        entries: Vec<LogbookEntry>,
        boats: Vec<Boat>,
        persons: Vec<Person>,
        destinations: Vec<Destination>,
    ) -> Self {
        let boats: AHashMap<_, _> = boats.into_iter().map(|b| (b.id.clone(), b)).collect();
        let persons: AHashMap<_, _> = persons.into_iter().map(|p| (p.id.clone(), p)).collect();
        let destinations: AHashMap<_, _> =
            destinations.into_iter().map(|d| (d.id.clone(), d)).collect();

        let mut rows = Vec::with_capacity(entries.len());
        let mut skipped = 0usize;

        for (idx, entry) in entries.iter().enumerate() {
            let date = LogDate::parse(&entry.date);
            let Some(year) = entry.year.or_else(|| date.year()) else {
                warn!("Logbook entry {} has no year and an unparsable date {:?}, skipping", idx, entry.date);
                skipped += 1;
                continue;
            };

            let boat = DisplayName::from_lookup(
                entry.boat.as_deref().and_then(|id| boats.get(id)).and_then(Boat::display_name),
            );
            let crew = entry
                .crew
                .iter()
                .map(|id| DisplayName::from_lookup(persons.get(id).and_then(Person::display_name)))
                .collect();
            let destination = DisplayName::from_lookup(
                entry
                    .dest
                    .as_deref()
                    .and_then(|id| destinations.get(id))
                    .and_then(Destination::display_name),
            );

            rows.push(LogbookRow::new(year, date, boat, crew, entry.distance_km(), destination));
        }

        let mut years: Vec<i32> = rows.iter().map(|r| r.year).collect();
        years.sort_unstable_by(|a, b| b.cmp(a));
        years.dedup();

        info!(
            "Built {} logbook rows ({} skipped) with {} boats, {} persons, {} destinations",
            rows.len(),
            skipped,
            boats.len(),
            persons.len(),
            destinations.len()
        );

        Self {
            boats,
            persons,
            destinations,
            rows: rows.into(),
            years,
        }
    }

    /// The immutable base row list
    pub fn rows(&self) -> &Arc<[LogbookRow]> {
        &self.rows
    }

    pub fn boat(&self, id: &str) -> Option<&Boat> {
        self.boats.get(id)
    }

    pub fn person(&self, id: &str) -> Option<&Person> {
        self.persons.get(id)
    }

    pub fn destination(&self, id: &str) -> Option<&Destination> {
        self.destinations.get(id)
    }

    pub fn boat_count(&self) -> usize {
        self.boats.len()
    }

    pub fn person_count(&self) -> usize {
        self.persons.len()
    }

    pub fn destination_count(&self) -> usize {
        self.destinations.len()
    }

    /// Distinct years present in the rows, most recent first
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Most recent year, the default selection of every year picker
    pub fn latest_year(&self) -> Option<i32> {
        self.years.first().copied()
    }

    /// Largest positive distance, if any row has one
    pub fn max_distance(&self) -> Option<f64> {
        self.rows
            .iter()
            .map(|r| r.distance_km)
            .filter(|d| *d > 0.0)
            .max_by(f64::total_cmp)
    }
}

fn parse<T: DeserializeOwned>(document: Document, text: &str) -> Result<T, LoadError> {
    serde_json::from_str(text).map_err(|source| LoadError::Parse { document, source })
}
