mod dates;
mod engine;
mod growth;
mod solver;
mod types;

pub use dates::{DATE_FORMAT, age_on, date_at_age, parse_date};
pub use engine::{
    CHART_SAMPLES, MAX_CHART_YEARS, Phase, Projection, chart_span, run_projection,
    sample_trajectory,
};
pub use growth::GrowthSegment;
pub use solver::{age_at_worth, break_even_age, break_even_worth};
pub use types::{
    AgeEstimate, BreakEven, ChartPoint, Inputs, Outcome, ProjectionReport, TargetDateWorth,
    TargetWorthAge,
};
