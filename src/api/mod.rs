mod server;

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::chart::{self, ChartData};
use crate::core::{Inputs, ProjectionReport, age_on, parse_date, run_projection};
use crate::error::RetireError;
use crate::report::format_report;

pub use server::run_http_server;

const DEFAULT_WORKING_RETURN: f64 = 6.0;
const DEFAULT_RETIRED_RETURN: f64 = 4.0;
const DEFAULT_CHART_END_AGE: f64 = 100.0;
const MAX_RETIREMENT_AGE: f64 = 150.0;
const MAX_RETURN: f64 = 100.0;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "retire",
    about = "Projects net worth under continuous compounding and estimates the break-even age",
    long_about = "Projects net worth under continuous compounding and estimates the break-even age.\n\n\
        Reports the estimated worth at retirement (and on a target date), the break-even net \
        worth whose returns alone cover retired spending, and the ages at which the break-even \
        and target worths are reached. Returns are constant; account for inflation in the \
        rates you choose. All unspent money is assumed to be invested.\n\n\
        Run `retire serve [port]` to browse projections over HTTP."
)]
pub struct Cli {
    #[arg(short = 'b', long, help = "Birthdate, YYYY-MM-DD")]
    birthdate: String,
    #[arg(short = 'w', long, allow_negative_numbers = true, help = "Current net worth")]
    net_worth: f64,
    #[arg(long, help = "Date of the net worth figure, YYYY-MM-DD; defaults to today")]
    net_worth_date: Option<String>,
    #[arg(long, visible_alias = "working-salary", help = "Annual income while working")]
    working_income: f64,
    #[arg(long, help = "Annual spending while working")]
    working_spending: f64,
    #[arg(short = 'r', long, help = "Retirement age in years")]
    retirement_age: f64,
    #[arg(
        long,
        visible_alias = "retired-salary",
        default_value_t = 0.0,
        help = "Annual income while retired"
    )]
    retired_income: f64,
    #[arg(long, help = "Annual spending while retired")]
    retired_spending: f64,
    #[arg(
        long,
        allow_negative_numbers = true,
        help = "Annual return in percent for both phases; overrides the per-phase defaults"
    )]
    return_rate: Option<f64>,
    #[arg(
        long,
        allow_negative_numbers = true,
        help = "Annual return while working in percent [default: 6]"
    )]
    working_return: Option<f64>,
    #[arg(
        long,
        allow_negative_numbers = true,
        help = "Annual return while retired in percent [default: 4]"
    )]
    retired_return: Option<f64>,
    #[arg(long, help = "Print the estimated worth on this date, YYYY-MM-DD")]
    target_date: Option<String>,
    #[arg(
        long,
        allow_negative_numbers = true,
        help = "Print the age at which this worth is reached"
    )]
    target_worth: Option<f64>,
    #[arg(long, default_value = "net_worth.svg", help = "Where to write the SVG chart")]
    chart: PathBuf,
    #[arg(long, help = "Do not write the SVG chart")]
    no_chart: bool,
    #[arg(long, help = "Show the chart in the terminal after the report")]
    interactive: bool,
    #[arg(long, default_value_t = DEFAULT_CHART_END_AGE, help = "Last age shown on the chart")]
    chart_end_age: f64,
    #[arg(long, help = "Print the report as JSON")]
    json: bool,
}

fn resolve_rate(specific: Option<f64>, shared: Option<f64>, default: f64) -> f64 {
    specific.or(shared).unwrap_or(default)
}

fn optional_date(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<NaiveDate>, RetireError> {
    value.map(|v| parse_date(field, v)).transpose()
}

fn build_inputs(cli: &Cli, today: NaiveDate) -> Result<Inputs, RetireError> {
    let birthdate = parse_date("--birthdate", &cli.birthdate)?;
    let net_worth_date =
        optional_date("--net-worth-date", cli.net_worth_date.as_deref())?.unwrap_or(today);
    let target_date = optional_date("--target-date", cli.target_date.as_deref())?;

    if birthdate >= net_worth_date {
        return Err(RetireError::invalid(
            "--birthdate must be before --net-worth-date",
        ));
    }

    if let Some(target) = target_date {
        if target < net_worth_date {
            return Err(RetireError::invalid(
                "--target-date must not be before --net-worth-date",
            ));
        }
    }

    for (name, amount) in [
        ("--net-worth", cli.net_worth),
        ("--working-income", cli.working_income),
        ("--working-spending", cli.working_spending),
        ("--retired-income", cli.retired_income),
        ("--retired-spending", cli.retired_spending),
        ("--retirement-age", cli.retirement_age),
        ("--chart-end-age", cli.chart_end_age),
    ] {
        if !amount.is_finite() {
            return Err(RetireError::invalid(format!("{name} must be a finite number")));
        }
    }

    for (name, amount) in [
        ("--working-income", cli.working_income),
        ("--working-spending", cli.working_spending),
        ("--retired-income", cli.retired_income),
        ("--retired-spending", cli.retired_spending),
    ] {
        if amount < 0.0 {
            return Err(RetireError::invalid(format!("{name} must be >= 0")));
        }
    }

    if cli.target_worth.is_some_and(|w| !w.is_finite()) {
        return Err(RetireError::invalid("--target-worth must be a finite number"));
    }

    let working_return =
        resolve_rate(cli.working_return, cli.return_rate, DEFAULT_WORKING_RETURN);
    let retired_return =
        resolve_rate(cli.retired_return, cli.return_rate, DEFAULT_RETIRED_RETURN);
    for (name, rate) in [
        ("--working-return", working_return),
        ("--retired-return", retired_return),
    ] {
        if !rate.is_finite() || rate <= -100.0 || rate > MAX_RETURN {
            return Err(RetireError::invalid(format!(
                "{name} must be > -100 and <= {MAX_RETURN}"
            )));
        }
    }

    if cli.retirement_age <= 0.0 || cli.retirement_age > MAX_RETIREMENT_AGE {
        return Err(RetireError::invalid(format!(
            "--retirement-age must be > 0 and <= {MAX_RETIREMENT_AGE}"
        )));
    }

    let current_age = age_on(birthdate, net_worth_date);
    if cli.chart_end_age <= current_age {
        return Err(RetireError::invalid(format!(
            "--chart-end-age must be > current age ({current_age:.2})"
        )));
    }

    Ok(Inputs {
        birthdate,
        net_worth_date,
        net_worth: cli.net_worth,
        working_income: cli.working_income,
        working_spending: cli.working_spending,
        working_return: working_return / 100.0,
        retirement_age: cli.retirement_age,
        retired_income: cli.retired_income,
        retired_spending: cli.retired_spending,
        retired_return: retired_return / 100.0,
        target_date,
        target_worth: cli.target_worth,
        chart_end_age: cli.chart_end_age,
    })
}

/// Run one projection from the command line: print the report, then
/// write and optionally show the chart.
pub fn run_cli(cli: Cli) -> Result<(), RetireError> {
    let today = Local::now().date_naive();
    let inputs = build_inputs(&cli, today)?;
    debug!(?inputs, "validated inputs");

    let report = run_projection(&inputs);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_report(&report));
    }

    let chart_data = ChartData::build(&inputs, &report);
    if cli.no_chart {
        info!("chart output disabled");
    } else {
        chart::write_svg(&cli.chart, &chart_data)?;
    }
    if cli.interactive {
        chart::terminal::show(&chart_data)?;
    }
    Ok(())
}

/// Query or JSON body accepted by the viewer; absent fields keep the
/// defaults from [`default_cli_for_api`].
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    birthdate: Option<String>,
    net_worth: Option<f64>,
    net_worth_date: Option<String>,
    #[serde(alias = "workingSalary")]
    working_income: Option<f64>,
    working_spending: Option<f64>,
    retirement_age: Option<f64>,
    #[serde(alias = "retiredSalary")]
    retired_income: Option<f64>,
    retired_spending: Option<f64>,
    return_rate: Option<f64>,
    working_return: Option<f64>,
    retired_return: Option<f64>,
    target_date: Option<String>,
    target_worth: Option<f64>,
    chart_end_age: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    report: ProjectionReport,
    chart: ChartData,
}

#[cfg(test)]
fn inputs_from_json(json: &str, today: NaiveDate) -> Result<Inputs, RetireError> {
    let payload = serde_json::from_str::<ProjectPayload>(json)
        .map_err(|e| RetireError::invalid(format!("Invalid API JSON payload: {e}")))?;
    inputs_from_payload(payload, today)
}

fn inputs_from_payload(payload: ProjectPayload, today: NaiveDate) -> Result<Inputs, RetireError> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.birthdate {
        cli.birthdate = v;
    }
    if let Some(v) = payload.net_worth {
        cli.net_worth = v;
    }
    if payload.net_worth_date.is_some() {
        cli.net_worth_date = payload.net_worth_date;
    }
    if let Some(v) = payload.working_income {
        cli.working_income = v;
    }
    if let Some(v) = payload.working_spending {
        cli.working_spending = v;
    }
    if let Some(v) = payload.retirement_age {
        cli.retirement_age = v;
    }
    if let Some(v) = payload.retired_income {
        cli.retired_income = v;
    }
    if let Some(v) = payload.retired_spending {
        cli.retired_spending = v;
    }
    if payload.return_rate.is_some() {
        cli.return_rate = payload.return_rate;
    }
    if payload.working_return.is_some() {
        cli.working_return = payload.working_return;
    }
    if payload.retired_return.is_some() {
        cli.retired_return = payload.retired_return;
    }
    if payload.target_date.is_some() {
        cli.target_date = payload.target_date;
    }
    if payload.target_worth.is_some() {
        cli.target_worth = payload.target_worth;
    }
    if let Some(v) = payload.chart_end_age {
        cli.chart_end_age = v;
    }

    build_inputs(&cli, today)
}

fn default_cli_for_api() -> Cli {
    Cli {
        birthdate: "1990-01-01".to_string(),
        net_worth: 50_000.0,
        net_worth_date: None,
        working_income: 70_000.0,
        working_spending: 30_000.0,
        retirement_age: 65.0,
        retired_income: 0.0,
        retired_spending: 22_000.0,
        return_rate: None,
        working_return: None,
        retired_return: None,
        target_date: None,
        target_worth: None,
        chart: PathBuf::from("net_worth.svg"),
        no_chart: true,
        interactive: false,
        chart_end_age: DEFAULT_CHART_END_AGE,
        json: false,
    }
}

fn build_project_response(inputs: &Inputs) -> ProjectResponse {
    let report = run_projection(inputs);
    let chart = ChartData::build(inputs, &report);
    ProjectResponse { report, chart }
}
