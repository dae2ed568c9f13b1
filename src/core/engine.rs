use tracing::{debug, warn};

use super::dates::age_on;
use super::growth::GrowthSegment;
use super::solver::{age_at_worth, break_even_age, break_even_worth, outcome};
use super::types::{
    BreakEven, ChartPoint, Inputs, Outcome, ProjectionReport, TargetDateWorth, TargetWorthAge,
};

/// Samples per chart trajectory, not counting the retirement knot.
pub const CHART_SAMPLES: usize = 400;

/// Charts never extend further than this past the current age.
pub const MAX_CHART_YEARS: f64 = 150.0;

/// Cash flow and return for one life phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Phase {
    pub net_cash_flow: f64,
    pub rate: f64,
}

/// Piecewise trajectory: the working segment runs from now to retirement
/// and the retired segment picks up from whatever worth that leaves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    current_age: f64,
    retirement_age: f64,
    working: Option<GrowthSegment>,
    retired: GrowthSegment,
}

impl Projection {
    pub fn new(
        current_age: f64,
        current_worth: f64,
        retirement_age: f64,
        working: Phase,
        retired: Phase,
    ) -> Self {
        if retirement_age <= current_age {
            return Self {
                current_age,
                retirement_age,
                working: None,
                retired: GrowthSegment::new(
                    current_age,
                    current_worth,
                    retired.net_cash_flow,
                    retired.rate,
                ),
            };
        }

        let working = GrowthSegment::new(
            current_age,
            current_worth,
            working.net_cash_flow,
            working.rate,
        );
        let worth_at_retirement = working.worth_at_age(retirement_age);
        Self {
            current_age,
            retirement_age,
            working: Some(working),
            retired: GrowthSegment::new(
                retirement_age,
                worth_at_retirement,
                retired.net_cash_flow,
                retired.rate,
            ),
        }
    }

    pub fn from_inputs(inputs: &Inputs) -> Self {
        let current_age = age_on(inputs.birthdate, inputs.net_worth_date);
        Self::new(
            current_age,
            inputs.net_worth,
            inputs.retirement_age,
            Phase {
                net_cash_flow: inputs.working_cash_flow(),
                rate: inputs.working_return,
            },
            Phase {
                net_cash_flow: inputs.retired_cash_flow(),
                rate: inputs.retired_return,
            },
        )
    }

    pub fn current_age(&self) -> f64 {
        self.current_age
    }

    pub fn retirement_age(&self) -> f64 {
        self.retirement_age
    }

    pub fn current_worth(&self) -> f64 {
        self.working.unwrap_or(self.retired).start_worth
    }

    pub fn working(&self) -> Option<&GrowthSegment> {
        self.working.as_ref()
    }

    pub fn retired(&self) -> &GrowthSegment {
        &self.retired
    }

    /// Worth on the day of retirement, or today's worth if that day has passed.
    pub fn worth_at_retirement(&self) -> f64 {
        self.retired.start_worth
    }

    pub fn worth_at_age(&self, age: f64) -> f64 {
        match self.working {
            Some(working) if age <= self.retirement_age => working.worth_at_age(age),
            _ => self.retired.worth_at_age(age),
        }
    }

    /// Evenly spaced points on `[start, end]` plus the retirement knot.
    pub fn sample(&self, start: f64, end: f64, samples: usize) -> Vec<ChartPoint> {
        let samples = samples.max(2);
        let step = (end - start) / (samples - 1) as f64;
        let mut ages: Vec<f64> = (0..samples).map(|i| start + step * i as f64).collect();
        if self.working.is_some() && self.retirement_age > start && self.retirement_age < end {
            ages.push(self.retirement_age);
            ages.sort_by(f64::total_cmp);
        }

        ages.into_iter()
            .map(|age| ChartPoint {
                age,
                worth: self.worth_at_age(age),
            })
            .filter(|point| point.worth.is_finite())
            .collect()
    }
}

pub fn run_projection(inputs: &Inputs) -> ProjectionReport {
    let projection = Projection::from_inputs(inputs);
    debug!(
        current_age = projection.current_age(),
        working = ?projection.working(),
        retired = ?projection.retired(),
        "built projection"
    );

    let break_even = break_even_worth(
        inputs.retired_spending,
        inputs.retired_income,
        inputs.retired_return,
    );
    let break_even_reached = match break_even {
        BreakEven::Defined { worth } => outcome(
            inputs.birthdate,
            break_even_age(&projection, worth),
        ),
        BreakEven::Undefined => Outcome::Never,
    };

    let target_date = inputs.target_date.map(|date| {
        let age = age_on(inputs.birthdate, date);
        TargetDateWorth {
            date,
            age,
            worth: projection.worth_at_age(age),
        }
    });

    let target_worth = inputs.target_worth.map(|worth| {
        let reached = age_at_worth(&projection, worth);
        if reached.is_none() {
            debug!(
                target = worth,
                levels_off_at = ?projection.retired().asymptote(),
                "target worth never reached"
            );
        }
        TargetWorthAge {
            worth,
            reached: outcome(inputs.birthdate, reached),
        }
    });

    ProjectionReport {
        current_age: projection.current_age(),
        retirement_age: inputs.retirement_age,
        worth_at_retirement: projection.worth_at_retirement(),
        target_date,
        break_even_worth: break_even,
        break_even_age: break_even_reached,
        target_worth,
    }
}

/// Age range a chart of `report` should cover.
pub fn chart_span(inputs: &Inputs, report: &ProjectionReport) -> (f64, f64) {
    let start = report.current_age;
    let wanted = [
        Some(inputs.chart_end_age),
        report.break_even_age.age(),
        report.target_date.map(|t| t.age),
        report.target_worth.and_then(|t| t.reached.age()),
    ]
    .into_iter()
    .flatten()
    .fold(f64::NEG_INFINITY, f64::max);

    let limit = start + MAX_CHART_YEARS;
    if wanted > limit {
        warn!(wanted, limit, "chart end age clamped");
    }
    (start, wanted.min(limit).max(start + 1.0))
}

pub fn sample_trajectory(inputs: &Inputs, report: &ProjectionReport) -> Vec<ChartPoint> {
    let (start, end) = chart_span(inputs, report);
    Projection::from_inputs(inputs).sample(start, end, CHART_SAMPLES)
}
