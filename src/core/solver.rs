use chrono::NaiveDate;

use super::dates::date_at_age;
use super::engine::Projection;
use super::types::{AgeEstimate, BreakEven, Outcome};

/// Worth whose returns alone cover `spending - income` each year.
///
/// No shortfall means nothing needs funding, so the answer is zero at any
/// rate. A positive shortfall at a zero or negative rate can never be
/// covered by returns.
pub fn break_even_worth(spending: f64, income: f64, rate: f64) -> BreakEven {
    let shortfall = spending - income;
    if shortfall <= 0.0 {
        return BreakEven::Defined { worth: 0.0 };
    }
    if rate <= 0.0 {
        return BreakEven::Undefined;
    }
    BreakEven::Defined {
        worth: shortfall / rate,
    }
}

/// Crossings this close past retirement, in years, belong to the working
/// segment; so do targets within this relative distance of the worth at
/// retirement.
const KNOT_TOLERANCE: f64 = 1e-9;

/// First age at which the projected trajectory reaches `target`.
pub fn age_at_worth(projection: &Projection, target: f64) -> Option<f64> {
    let retirement_age = projection.retirement_age();
    if let Some(working) = projection.working() {
        if let Some(elapsed) = working.time_to_reach(target) {
            let age = working.start_age + elapsed;
            if age <= retirement_age + KNOT_TOLERANCE {
                return Some(age.min(retirement_age));
            }
        }
    }

    let retired = projection.retired();
    if (retired.start_worth - target).abs() <= KNOT_TOLERANCE * target.abs().max(1.0) {
        return Some(retired.start_age);
    }
    retired
        .time_to_reach(target)
        .map(|elapsed| retired.start_age + elapsed)
}

/// Age at which the trajectory first holds at least `break_even`.
///
/// A break-even of zero means retirement needs no funding, which holds
/// today even when the current worth is negative.
pub fn break_even_age(projection: &Projection, break_even: f64) -> Option<f64> {
    if break_even <= 0.0 || projection.current_worth() >= break_even {
        return Some(projection.current_age());
    }
    age_at_worth(projection, break_even)
}

pub fn outcome(birthdate: NaiveDate, age: Option<f64>) -> Outcome {
    match age {
        Some(age) => Outcome::Reached(AgeEstimate {
            age,
            date: date_at_age(birthdate, age),
        }),
        None => Outcome::Never,
    }
}
