//! Chart descriptions and renderer handles
//!
//! Charts are never updated in place. A [`ChartSlot`] owns at most one live
//! chart and replaces it wholesale: the old handle is destroyed before the
//! new chart is created.

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::stats::{EntityKind, EntityTimeline, MonthlySeries, Ranking};

/// Identifier of a chart instance owned by a renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChartHandle(Uuid);

impl ChartHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ChartHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// One labelled value series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartKind {
    Bar,
    StackedBar,
}

/// Everything a renderer needs to draw one chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

const DISTANCE_AXIS: &str = "Distance (km)";

impl ChartSpec {
    /// Single-series bar chart
    pub fn bar(
        title: impl Into<String>,
        x_axis_title: impl Into<String>,
        y_axis_title: impl Into<String>,
        labels: Vec<String>,
        values: Vec<f64>,
    ) -> Self {
        Self {
            kind: ChartKind::Bar,
            title: title.into(),
            x_axis_title: x_axis_title.into(),
            y_axis_title: y_axis_title.into(),
            labels,
            datasets: vec![Dataset { label: "Total km".to_string(), values }],
        }
    }

    /// Top `top_n` entities of a ranking
    pub fn ranking(ranking: &Ranking, entity: EntityKind, top_n: usize) -> Self {
        let top = ranking.top(top_n);
        Self::bar(
            format!("Total Kilometers by {}", entity.label()),
            entity.label(),
            DISTANCE_AXIS,
            top.iter().map(|e| e.name.clone()).collect(),
            top.iter().map(|e| e.distance_km).collect(),
        )
    }

    /// Monthly totals on a dense month axis
    pub fn monthly(series: &MonthlySeries) -> Self {
        Self::bar(
            "Kilometers per Month",
            "Month",
            DISTANCE_AXIS,
            series.labels(),
            series.values.clone(),
        )
    }

    /// Stacked monthly series, one dataset per entity
    pub fn timeline(timeline: &EntityTimeline, entity: EntityKind) -> Self {
        Self {
            kind: ChartKind::StackedBar,
            title: format!("Kilometers Over Time by {}", entity.label()),
            x_axis_title: "Month".to_string(),
            y_axis_title: DISTANCE_AXIS.to_string(),
            labels: timeline.labels(),
            datasets: timeline
                .series
                .iter()
                .map(|s| Dataset { label: s.name.clone(), values: s.values.clone() })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() || self.datasets.iter().all(|d| d.values.is_empty())
    }
}

/// A chart drawing backend
pub trait ChartRenderer {
    /// Draw a new chart and return its handle
    fn create(&mut self, spec: &ChartSpec) -> ChartHandle;

    /// Dispose of a chart created earlier
    fn destroy(&mut self, handle: ChartHandle);
}

/// Owner of at most one live chart
#[derive(Debug, Default)]
pub struct ChartSlot {
    current: Option<(ChartHandle, ChartSpec)>,
}

impl ChartSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Destroy the live chart, if any, then create one from `spec`
    pub fn replace(&mut self, renderer: &mut dyn ChartRenderer, spec: ChartSpec) -> ChartHandle {
        self.clear(renderer);
        let handle = renderer.create(&spec);
        debug!("Created chart '{}' ({:?})", spec.title, handle);
        self.current = Some((handle, spec));
        handle
    }

    /// Destroy the live chart. Returns whether there was one.
    pub fn clear(&mut self, renderer: &mut dyn ChartRenderer) -> bool {
        match self.current.take() {
            Some((handle, _)) => {
                renderer.destroy(handle);
                true
            }
            None => false,
        }
    }

    pub fn handle(&self) -> Option<ChartHandle> {
        self.current.as_ref().map(|(handle, _)| *handle)
    }

    pub fn spec(&self) -> Option<&ChartSpec> {
        self.current.as_ref().map(|(_, spec)| spec)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::stats::{group_and_rank, by_boat};
    use lv_core::range::YearRange;
    use lv_data::{DisplayName, LogDate, LogbookRow};

    /// Records create/destroy calls in order
    #[derive(Debug, Default)]
    pub(crate) struct RecordingRenderer {
        pub calls: Vec<String>,
        pub live: Vec<ChartHandle>,
        pub last: Option<ChartSpec>,
    }

    impl ChartRenderer for RecordingRenderer {
        fn create(&mut self, spec: &ChartSpec) -> ChartHandle {
            let handle = ChartHandle::new();
            self.calls.push(format!("create {}", spec.title));
            self.live.push(handle);
            self.last = Some(spec.clone());
            handle
        }

        fn destroy(&mut self, handle: ChartHandle) {
            self.calls.push("destroy".to_string());
            self.live.retain(|h| *h != handle);
        }
    }

    #[test]
    fn test_slot_destroys_before_create() {
        let mut renderer = RecordingRenderer::default();
        let mut slot = ChartSlot::new();

        let first = slot.replace(&mut renderer, ChartSpec::bar("A", "x", "y", vec![], vec![]));
        let second = slot.replace(&mut renderer, ChartSpec::bar("B", "x", "y", vec![], vec![]));

        assert_ne!(first, second);
        assert_eq!(renderer.calls, vec!["create A", "destroy", "create B"]);
        assert_eq!(renderer.live, vec![second]);
        assert_eq!(slot.handle(), Some(second));
        assert_eq!(slot.spec().map(|s| s.title.as_str()), Some("B"));

        assert!(slot.clear(&mut renderer));
        assert!(!slot.clear(&mut renderer));
        assert!(renderer.live.is_empty());
    }

    #[test]
    fn test_ranking_chart() {
        let rows = vec![
            LogbookRow::new(2023, LogDate::from_ymd(2023, 6, 1), DisplayName::known("Wave"), vec![], 10.0, DisplayName::unknown()),
            LogbookRow::new(2023, LogDate::from_ymd(2023, 6, 2), DisplayName::known("Gull"), vec![], 12.0, DisplayName::unknown()),
        ];
        let ranking = group_and_rank(&rows, YearRange::single(2023), by_boat);
        let spec = ChartSpec::ranking(&ranking, EntityKind::Boat, 1);

        assert_eq!(spec.title, "Total Kilometers by Boat");
        assert_eq!(spec.y_axis_title, "Distance (km)");
        assert_eq!(spec.labels, vec!["Gull"]);
        assert_eq!(spec.datasets[0].values, vec![12.0]);
        assert!(!spec.is_empty());
    }
}
