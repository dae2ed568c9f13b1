use chrono::NaiveDate;
use serde::Serialize;

/// Validated parameters for one projection run. Rates are fractions.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub birthdate: NaiveDate,
    pub net_worth_date: NaiveDate,
    pub net_worth: f64,
    pub working_income: f64,
    pub working_spending: f64,
    pub working_return: f64,
    pub retirement_age: f64,
    pub retired_income: f64,
    pub retired_spending: f64,
    pub retired_return: f64,
    pub target_date: Option<NaiveDate>,
    pub target_worth: Option<f64>,
    pub chart_end_age: f64,
}

impl Inputs {
    pub fn working_cash_flow(&self) -> f64 {
        self.working_income - self.working_spending
    }

    pub fn retired_cash_flow(&self) -> f64 {
        self.retired_income - self.retired_spending
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeEstimate {
    pub age: f64,
    /// `None` when the age falls outside the representable calendar.
    pub date: Option<NaiveDate>,
}

/// Whether a trajectory ever reaches a given worth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Outcome {
    Reached(AgeEstimate),
    Never,
}

impl Outcome {
    pub fn age(&self) -> Option<f64> {
        match self {
            Outcome::Reached(estimate) => Some(estimate.age),
            Outcome::Never => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum BreakEven {
    Defined { worth: f64 },
    /// Returns cannot cover a positive shortfall at a zero or negative rate.
    Undefined,
}

impl BreakEven {
    pub fn worth(&self) -> Option<f64> {
        match self {
            BreakEven::Defined { worth } => Some(*worth),
            BreakEven::Undefined => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetDateWorth {
    pub date: NaiveDate,
    pub age: f64,
    pub worth: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetWorthAge {
    pub worth: f64,
    pub reached: Outcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionReport {
    pub current_age: f64,
    pub retirement_age: f64,
    pub worth_at_retirement: f64,
    pub target_date: Option<TargetDateWorth>,
    pub break_even_worth: BreakEven,
    pub break_even_age: Outcome,
    pub target_worth: Option<TargetWorthAge>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub age: f64,
    pub worth: f64,
}
