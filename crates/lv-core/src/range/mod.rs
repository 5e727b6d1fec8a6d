//! Year and distance range state consumed by filters
//!
//! The slider widget itself lives outside the core. It reports a committed
//! `(min, max)` pair on its discrete change event; intermediate drag positions
//! never reach a [`RangeSelector`].

use serde::{Serialize, Deserialize};

/// Half-open range of years, `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    /// Range `[start, end)`; a reversed pair is swapped
    pub fn new(start: i32, end: i32) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self { start: end, end: start }
        }
    }

    /// Range covering exactly one year
    pub fn single(year: i32) -> Self {
        Self { start: year, end: year.saturating_add(1) }
    }

    /// Whether `year` lies in `[start, end)`
    pub fn contains(&self, year: i32) -> bool {
        year >= self.start && year < self.end
    }

    /// Number of years covered
    pub fn len(&self) -> usize {
        (i64::from(self.end) - i64::from(self.start)).max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The part of this range inside the inclusive years `first..=last`; empty if they don't overlap
    pub fn clamp_to(&self, first: i32, last: i32) -> Self {
        let start = self.start.max(first);
        let end = self.end.min(last.saturating_add(1));
        Self { start, end: end.max(start) }
    }

    /// Years in ascending order
    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.start..self.end
    }
}

/// Inclusive range of distances in km, `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceRange {
    pub min: f64,
    pub max: f64,
}

impl DistanceRange {
    /// Range `[min, max]`; a reversed pair is swapped
    pub fn new(min: f64, max: f64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Whether `km` lies in `[min, max]`
    pub fn contains(&self, km: f64) -> bool {
        km >= self.min && km <= self.max
    }
}

impl Default for DistanceRange {
    fn default() -> Self {
        Self { min: 0.0, max: 100.0 }
    }
}

/// Committed state of a two-handle range slider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeSelector<T> {
    bounds: (T, T),
    committed: (T, T),
}

impl<T: PartialOrd + Copy> RangeSelector<T> {
    /// Selector spanning `bounds`, initially committed to the full span
    pub fn new(lower: T, upper: T) -> Self {
        let bounds = if lower <= upper { (lower, upper) } else { (upper, lower) };
        Self { bounds, committed: bounds }
    }

    /// Outer bounds of the slider
    pub fn bounds(&self) -> (T, T) {
        self.bounds
    }

    /// Last committed `(min, max)`
    pub fn committed(&self) -> (T, T) {
        self.committed
    }

    /// Apply the widget's change event. Values are ordered and clamped into bounds.
    ///
    /// Returns whether the committed value changed.
    pub fn commit(&mut self, a: T, b: T) -> bool {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let next = (self.clamp(lo), self.clamp(hi));
        let changed = next != self.committed;
        self.committed = next;
        changed
    }

    /// Commit the full span again
    pub fn reset(&mut self) {
        self.committed = self.bounds;
    }

    fn clamp(&self, value: T) -> T {
        if value < self.bounds.0 {
            self.bounds.0
        } else if value > self.bounds.1 {
            self.bounds.1
        } else {
            value
        }
    }
}

impl RangeSelector<f64> {
    /// Committed value as an inclusive distance range
    pub fn distance_range(&self) -> DistanceRange {
        DistanceRange::new(self.committed.0, self.committed.1)
    }
}

impl RangeSelector<i32> {
    /// Committed value as a half-open year range; the upper handle is the last included year
    pub fn year_range(&self) -> YearRange {
        YearRange::new(self.committed.0, self.committed.1.saturating_add(1))
    }
}

/// Piecewise-linear mapping between slider position (percent) and value.
///
/// Gives fine resolution for short trips and coarse steps for long ones.
#[derive(Debug, Clone, PartialEq)]
pub struct SliderScale {
    /// `(position percent, value)` anchors, strictly increasing in both
    anchors: Vec<(f64, f64)>,
    step: f64,
}

impl SliderScale {
    /// Build a scale from anchors; they are sorted by position
    pub fn new(mut anchors: Vec<(f64, f64)>, step: f64) -> Self {
        anchors.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { anchors, step }
    }

    /// The distance slider: 0, 5, 10, 20, 50 and 100 km at 20 % intervals, 1 km steps
    pub fn distance_km() -> Self {
        Self::new(
            vec![(0.0, 0.0), (20.0, 5.0), (40.0, 10.0), (60.0, 20.0), (80.0, 50.0), (100.0, 100.0)],
            1.0,
        )
    }

    /// Value at `position` percent, snapped to the step
    pub fn value_at(&self, position: f64) -> f64 {
        let raw = Self::interpolate(&self.anchors, position, |a| a.0, |a| a.1);
        self.snap(raw)
    }

    /// Slider position in percent for `value`
    pub fn position_of(&self, value: f64) -> f64 {
        Self::interpolate(&self.anchors, value, |a| a.1, |a| a.0)
    }

    fn snap(&self, value: f64) -> f64 {
        if self.step > 0.0 {
            (value / self.step).round() * self.step
        } else {
            value
        }
    }

    fn interpolate(
        anchors: &[(f64, f64)],
        x: f64,
        from: impl Fn(&(f64, f64)) -> f64,
        to: impl Fn(&(f64, f64)) -> f64,
    ) -> f64 {
        let (Some(first), Some(last)) = (anchors.first(), anchors.last()) else {
            return x;
        };
        if x <= from(first) {
            return to(first);
        }
        if x >= from(last) {
            return to(last);
        }
        for pair in anchors.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if x <= from(b) {
                let span = from(b) - from(a);
                if span <= 0.0 {
                    return to(b);
                }
                let t = (x - from(a)) / span;
                return to(a) + t * (to(b) - to(a));
            }
        }
        to(last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_range_is_half_open() {
        let range = YearRange::new(2020, 2021);
        assert!(range.contains(2020));
        assert!(!range.contains(2021));
        assert!(!range.contains(2019));
        assert_eq!(range.len(), 1);
        assert_eq!(YearRange::new(2023, 2021), YearRange::new(2021, 2023));
    }

    #[test]
    fn test_year_range_at_integer_limits() {
        let last = YearRange::single(i32::MAX);
        assert_eq!(last.end, i32::MAX);
        assert!(last.is_empty());
        assert_eq!(YearRange::new(i32::MIN, i32::MAX).len(), u32::MAX as usize);

        let selector = RangeSelector::new(2020, i32::MAX);
        assert_eq!(selector.year_range(), YearRange::new(2020, i32::MAX));
    }

    #[test]
    fn test_year_range_clamp_to() {
        let range = YearRange::new(1, 9_999_999);
        assert_eq!(range.clamp_to(2020, 2023), YearRange::new(2020, 2024));
        assert_eq!(YearRange::new(2021, 2022).clamp_to(2020, 2023), YearRange::new(2021, 2022));
        assert!(YearRange::new(1990, 2000).clamp_to(2020, 2023).is_empty());
        assert!(YearRange::new(2030, 2040).clamp_to(2020, 2023).is_empty());
        assert_eq!(YearRange::new(2020, i32::MAX).clamp_to(2020, i32::MAX).end, i32::MAX);
    }

    #[test]
    fn test_distance_range_is_inclusive() {
        let range = DistanceRange::new(0.0, 100.0);
        assert!(range.contains(100.0));
        assert!(range.contains(0.0));
        assert!(!range.contains(150.0));
    }

    #[test]
    fn test_selector_orders_and_clamps_commits() {
        let mut selector = RangeSelector::new(0.0, 100.0);
        assert!(selector.commit(120.0, 10.0));
        assert_eq!(selector.committed(), (10.0, 100.0));
        assert!(!selector.commit(10.0, 100.0));

        selector.reset();
        assert_eq!(selector.distance_range(), DistanceRange::new(0.0, 100.0));
    }

    #[test]
    fn test_year_selector_includes_upper_handle() {
        let mut selector = RangeSelector::new(2015, 2024);
        selector.commit(2020, 2022);
        assert_eq!(selector.year_range(), YearRange::new(2020, 2023));
    }

    #[test]
    fn test_distance_scale_anchors() {
        let scale = SliderScale::distance_km();
        assert_eq!(scale.value_at(0.0), 0.0);
        assert_eq!(scale.value_at(20.0), 5.0);
        assert_eq!(scale.value_at(70.0), 35.0);
        assert_eq!(scale.value_at(100.0), 100.0);
        assert_eq!(scale.value_at(150.0), 100.0);
        assert_eq!(scale.position_of(10.0), 40.0);
        assert_eq!(scale.position_of(75.0), 90.0);
    }

    #[test]
    fn test_distance_scale_snaps_to_step() {
        let scale = SliderScale::distance_km();
        // 10 % sits halfway between 0 and 5 km.
        assert_eq!(scale.value_at(10.0), 3.0);
    }
}
