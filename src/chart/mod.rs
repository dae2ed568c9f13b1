//! Chart data shared by the SVG writer, the terminal view and the viewer.

mod svg;
pub mod terminal;

use serde::Serialize;

use crate::core::{ChartPoint, Inputs, ProjectionReport, sample_trajectory};

pub use svg::{render_svg, write_svg};

/// Fraction of the value range added above and below the data.
const Y_PADDING: f64 = 0.08;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub points: Vec<ChartPoint>,
    pub retirement_age: f64,
    pub break_even_worth: Option<f64>,
    pub target_worth: Option<f64>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl ChartData {
    pub fn build(inputs: &Inputs, report: &ProjectionReport) -> Self {
        Self::from_points(
            sample_trajectory(inputs, report),
            report.retirement_age,
            report.break_even_worth.worth(),
            report.target_worth.map(|t| t.worth),
        )
    }

    pub fn from_points(
        points: Vec<ChartPoint>,
        retirement_age: f64,
        break_even_worth: Option<f64>,
        target_worth: Option<f64>,
    ) -> Self {
        let x_min = points.first().map_or(0.0, |p| p.age);
        let x_max = points.last().map_or(x_min + 1.0, |p| p.age).max(x_min + 1.0);

        // Zero and the reference levels stay in view alongside the data.
        let levels = points
            .iter()
            .map(|p| p.worth)
            .chain([0.0])
            .chain(break_even_worth)
            .chain(target_worth);
        let (lo, hi) = levels.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        let pad = ((hi - lo) * Y_PADDING).max(1.0);
        let y_min = if lo < 0.0 { lo - pad } else { 0.0 };

        Self {
            points,
            retirement_age,
            break_even_worth,
            target_worth,
            x_bounds: [x_min, x_max],
            y_bounds: [y_min, hi + pad],
        }
    }

    /// Whether the retirement marker falls inside the plotted range.
    pub fn shows_retirement(&self) -> bool {
        self.retirement_age > self.x_bounds[0] && self.retirement_age < self.x_bounds[1]
    }

    /// Evenly spaced tick values across `[min, max]`.
    pub fn ticks(bounds: [f64; 2], count: usize) -> Vec<f64> {
        let count = count.max(2);
        let step = (bounds[1] - bounds[0]) / (count - 1) as f64;
        (0..count).map(|i| bounds[0] + step * i as f64).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(age: f64, worth: f64) -> ChartPoint {
        ChartPoint { age, worth }
    }

    #[test]
    fn bounds_include_zero_and_reference_levels() {
        let data = ChartData::from_points(
            vec![point(30.0, 50_000.0), point(60.0, 400_000.0)],
            65.0,
            Some(500_000.0),
            None,
        );
        assert_eq!(data.x_bounds, [30.0, 60.0]);
        assert_eq!(data.y_bounds[0], 0.0);
        assert!(data.y_bounds[1] > 500_000.0);
        assert!(!data.shows_retirement());
    }

    #[test]
    fn negative_worth_extends_below_zero() {
        let data = ChartData::from_points(
            vec![point(30.0, 10_000.0), point(40.0, -80_000.0)],
            35.0,
            None,
            None,
        );
        assert!(data.y_bounds[0] < -80_000.0);
        assert!(data.shows_retirement());
    }

    #[test]
    fn empty_points_still_have_usable_bounds() {
        let data = ChartData::from_points(Vec::new(), 65.0, None, None);
        assert!(data.x_bounds[1] > data.x_bounds[0]);
        assert!(data.y_bounds[1] > data.y_bounds[0]);
    }

    #[test]
    fn ticks_cover_both_ends() {
        assert_eq!(ChartData::ticks([0.0, 100.0], 5), vec![0.0, 25.0, 50.0, 75.0, 100.0]);
    }
}
