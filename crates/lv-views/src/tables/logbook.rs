//! Logbook table columns

use lv_data::LogbookRow;

use super::{format_number, CellValue, ColumnDef, ColumnKind, TableRow};

/// Column keys of the logbook table
pub mod keys {
    pub const DATE: &str = "date";
    pub const YEAR: &str = "year";
    pub const BOAT: &str = "boat";
    pub const CREW: &str = "crew";
    pub const DIST: &str = "dist";
    pub const DEST: &str = "dest";
}

impl TableRow for LogbookRow {
    fn cell(&self, key: &str) -> Option<CellValue<'_>> {
        let cell = match key {
            keys::DATE => CellValue::Date(self.date),
            keys::YEAR => CellValue::Number(f64::from(self.year)),
            keys::BOAT => CellValue::Text(self.boat.as_str()),
            keys::CREW => CellValue::Text(&self.crew_display),
            keys::DIST => CellValue::Number(self.distance_km),
            keys::DEST => CellValue::Text(self.destination.as_str()),
            _ => return None,
        };
        Some(cell)
    }
}

/// Date, boat, crew, distance and destination. Year is hidden but sortable.
pub fn logbook_columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new(keys::DATE, "Date", ColumnKind::Date).with_width(100.0),
        ColumnDef::new(keys::YEAR, "Year", ColumnKind::Number).hidden(),
        ColumnDef::new(keys::BOAT, "Boat", ColumnKind::Text),
        ColumnDef::new(keys::CREW, "Crew", ColumnKind::Text),
        ColumnDef::new(keys::DIST, "Distance", ColumnKind::Number)
            .with_width(90.0)
            .with_formatter(|cell| match cell {
                CellValue::Number(km) => format!("{} km", format_number(*km)),
                other => other.to_text(),
            }),
        ColumnDef::new(keys::DEST, "Destination", ColumnKind::Text),
    ]
}
