//! Plain-text table and chart renderers

use std::io::{self, Write};
use tracing::{debug, warn};

use lv_views::tables::format_number;
use lv_views::{ChartHandle, ChartKind, ChartRenderer, ChartSpec, ColumnDef, Page, TableRenderer, TableRow};

/// Width of the longest chart bar in characters
const BAR_WIDTH: usize = 40;

/// Renders table pages as aligned text columns
pub struct TextTable<W: Write> {
    out: W,
}

impl<W: Write> TextTable<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn write_page<R: TableRow>(&mut self, columns: &[&ColumnDef], page: &Page<'_, R>) -> io::Result<()> {
        let cells: Vec<Vec<String>> = page
            .rows
            .iter()
            .map(|row| columns.iter().map(|c| c.format(*row)).collect())
            .collect();

        let widths: Vec<usize> = columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let hint = column.width.map(|w| (w / 8.0) as usize).unwrap_or(0);
                cells
                    .iter()
                    .map(|row| row[idx].chars().count())
                    .chain([column.title.chars().count(), hint])
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let header: Vec<&str> = columns.iter().map(|c| c.title.as_str()).collect();
        write_line(&mut self.out, &header, &widths)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        write_line(&mut self.out, &rule, &widths)?;
        for row in &cells {
            write_line(&mut self.out, row, &widths)?;
        }

        let summary = page.summary;
        writeln!(
            self.out,
            "Showing {} to {} of {} entries (page {} of {})",
            summary.start,
            summary.end,
            summary.total,
            page.number,
            page.total_pages.max(1)
        )?;
        self.out.flush()
    }
}

fn write_line<W: Write, S: AsRef<str>>(out: &mut W, cells: &[S], widths: &[usize]) -> io::Result<()> {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell.as_ref(), width = *width))
        .collect();
    writeln!(out, "{}", line.join("  ").trim_end())
}

impl<W: Write, R: TableRow> TableRenderer<R> for TextTable<W> {
    fn render(&mut self, columns: &[&ColumnDef], page: &Page<'_, R>) {
        if let Err(err) = self.write_page(columns, page) {
            warn!("Failed to write table: {}", err);
        }
    }
}

/// Renders charts as horizontal text bars
pub struct TextChart<W: Write> {
    out: W,
    live: usize,
}

impl<W: Write> TextChart<W> {
    pub fn new(out: W) -> Self {
        Self { out, live: 0 }
    }

    /// Charts created and not yet destroyed
    pub fn live(&self) -> usize {
        self.live
    }

    fn write_chart(&mut self, spec: &ChartSpec) -> io::Result<()> {
        writeln!(self.out, "{}", spec.title)?;
        writeln!(self.out, "{} by {}", spec.y_axis_title, spec.x_axis_title)?;
        if spec.is_empty() {
            writeln!(self.out, "(no data)")?;
            return self.out.flush();
        }

        let totals: Vec<f64> = (0..spec.labels.len())
            .map(|idx| spec.datasets.iter().filter_map(|d| d.values.get(idx)).sum())
            .collect();
        let max = totals.iter().copied().fold(0.0, f64::max);
        let label_width = spec.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

        for (idx, label) in spec.labels.iter().enumerate() {
            let total = totals[idx];
            let bar = if max > 0.0 { ((total / max) * BAR_WIDTH as f64).round() as usize } else { 0 };
            write!(
                self.out,
                "{:<label_width$} | {:<bar_width$} {}",
                label,
                "#".repeat(bar),
                format_number((total * 10.0).round() / 10.0),
                label_width = label_width,
                bar_width = BAR_WIDTH
            )?;

            if spec.kind == ChartKind::StackedBar && total > 0.0 {
                let parts: Vec<String> = spec
                    .datasets
                    .iter()
                    .filter_map(|d| {
                        let value = d.values.get(idx).copied().unwrap_or(0.0);
                        (value > 0.0).then(|| format!("{}: {}", d.label, format_number(value)))
                    })
                    .collect();
                write!(self.out, "  ({})", parts.join(", "))?;
            }
            writeln!(self.out)?;
        }
        self.out.flush()
    }
}

impl<W: Write> ChartRenderer for TextChart<W> {
    fn create(&mut self, spec: &ChartSpec) -> ChartHandle {
        if let Err(err) = self.write_chart(spec) {
            warn!("Failed to write chart '{}': {}", spec.title, err);
        }
        self.live += 1;
        ChartHandle::new()
    }

    fn destroy(&mut self, handle: ChartHandle) {
        self.live = self.live.saturating_sub(1);
        debug!("Destroyed chart {:?}", handle);
    }
}
