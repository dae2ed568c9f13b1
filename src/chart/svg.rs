use std::fmt::Write;
use std::fs;
use std::path::Path;

use tracing::info;

use super::ChartData;
use crate::error::RetireError;
use crate::report::format_compact_currency;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 480.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 56.0;
const TICKS: usize = 6;

struct Frame {
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

impl Frame {
    fn x(&self, age: f64) -> f64 {
        let [lo, hi] = self.x_bounds;
        MARGIN_LEFT + (age - lo) / (hi - lo) * (WIDTH - MARGIN_LEFT - MARGIN_RIGHT)
    }

    fn y(&self, worth: f64) -> f64 {
        let [lo, hi] = self.y_bounds;
        HEIGHT - MARGIN_BOTTOM - (worth - lo) / (hi - lo) * (HEIGHT - MARGIN_TOP - MARGIN_BOTTOM)
    }

    fn contains_worth(&self, worth: f64) -> bool {
        worth >= self.y_bounds[0] && worth <= self.y_bounds[1]
    }
}

pub fn render_svg(data: &ChartData) -> String {
    let frame = Frame {
        x_bounds: data.x_bounds,
        y_bounds: data.y_bounds,
    };
    let left = MARGIN_LEFT;
    let right = WIDTH - MARGIN_RIGHT;
    let top = MARGIN_TOP;
    let bottom = HEIGHT - MARGIN_BOTTOM;

    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif" font-size="12">"#
    );
    let _ = writeln!(
        out,
        r##"<rect width="{WIDTH}" height="{HEIGHT}" fill="#ffffff"/>"##
    );
    let _ = writeln!(
        out,
        r#"<text x="{:.1}" y="24" text-anchor="middle" font-size="16">Projected net worth</text>"#,
        WIDTH / 2.0
    );

    for age in ChartData::ticks(data.x_bounds, TICKS) {
        let x = frame.x(age);
        let _ = writeln!(
            out,
            r##"<line x1="{x:.1}" y1="{top:.1}" x2="{x:.1}" y2="{bottom:.1}" stroke="#eeeeee"/>"##
        );
        let _ = writeln!(
            out,
            r#"<text x="{x:.1}" y="{:.1}" text-anchor="middle">{age:.0}</text>"#,
            bottom + 18.0
        );
    }
    for worth in ChartData::ticks(data.y_bounds, TICKS) {
        let y = frame.y(worth);
        let _ = writeln!(
            out,
            r##"<line x1="{left:.1}" y1="{y:.1}" x2="{right:.1}" y2="{y:.1}" stroke="#eeeeee"/>"##
        );
        let _ = writeln!(
            out,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end">{}</text>"#,
            left - 8.0,
            y + 4.0,
            format_compact_currency(worth)
        );
    }

    let _ = writeln!(
        out,
        r##"<rect x="{left:.1}" y="{top:.1}" width="{:.1}" height="{:.1}" fill="none" stroke="#999999"/>"##,
        right - left,
        bottom - top
    );
    let _ = writeln!(
        out,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">Age (years)</text>"#,
        (left + right) / 2.0,
        HEIGHT - 12.0
    );
    let _ = writeln!(
        out,
        r#"<text x="16" y="{:.1}" text-anchor="middle" transform="rotate(-90 16 {:.1})">Net worth</text>"#,
        (top + bottom) / 2.0,
        (top + bottom) / 2.0
    );

    if frame.contains_worth(0.0) {
        let y = frame.y(0.0);
        let _ = writeln!(
            out,
            r##"<line x1="{left:.1}" y1="{y:.1}" x2="{right:.1}" y2="{y:.1}" stroke="#555555"/>"##
        );
    }

    if data.shows_retirement() {
        let x = frame.x(data.retirement_age);
        let _ = writeln!(
            out,
            r##"<line class="retirement" x1="{x:.1}" y1="{top:.1}" x2="{x:.1}" y2="{bottom:.1}" stroke="#d62728" stroke-dasharray="6 4"/>"##
        );
    }

    for (class, level, color) in [
        ("break-even", data.break_even_worth, "#ff7f0e"),
        ("target", data.target_worth, "#1f77b4"),
    ] {
        let Some(level) = level.filter(|&l| frame.contains_worth(l)) else {
            continue;
        };
        let y = frame.y(level);
        let _ = writeln!(
            out,
            r#"<line class="{class}" x1="{left:.1}" y1="{y:.1}" x2="{right:.1}" y2="{y:.1}" stroke="{color}" stroke-dasharray="4 4"/>"#
        );
    }

    let path = data
        .points
        .iter()
        .map(|p| format!("{:.1},{:.1}", frame.x(p.age), frame.y(p.worth)))
        .collect::<Vec<_>>()
        .join(" ");
    let _ = writeln!(
        out,
        r##"<polyline class="worth" points="{path}" fill="none" stroke="#2ca02c" stroke-width="2"/>"##
    );

    out.push_str("</svg>\n");
    out
}

pub fn write_svg(path: &Path, data: &ChartData) -> Result<(), RetireError> {
    fs::write(path, render_svg(data))?;
    info!(path = %path.display(), points = data.points.len(), "wrote chart");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ChartPoint;

    fn sample_data() -> ChartData {
        ChartData::from_points(
            vec![
                ChartPoint {
                    age: 30.0,
                    worth: 50_000.0,
                },
                ChartPoint {
                    age: 65.0,
                    worth: 900_000.0,
                },
                ChartPoint {
                    age: 100.0,
                    worth: 400_000.0,
                },
            ],
            65.0,
            Some(314_285.71),
            Some(2_000_000.0),
        )
    }

    #[test]
    fn svg_draws_trajectory_and_markers() {
        let svg = render_svg(&sample_data());
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains(r#"class="worth""#));
        assert!(svg.contains(r#"class="retirement""#));
        assert!(svg.contains(r#"class="break-even""#));
        assert!(svg.contains(r#"class="target""#));
        assert!(svg.contains("Age (years)"));
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn first_point_sits_on_left_edge() {
        let svg = render_svg(&sample_data());
        assert!(svg.contains(&format!(r#"points="{MARGIN_LEFT:.1},"#)));
    }

    #[test]
    fn write_svg_creates_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("chart.svg");
        write_svg(&path, &sample_data()).expect("written");
        let contents = fs::read_to_string(&path).expect("readable");
        assert!(contents.contains("Projected net worth"));
    }
}
