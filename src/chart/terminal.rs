//! Full-screen terminal chart, closed with `q` or `Esc`.

use std::io::{self, Stdout};
use std::panic;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    style::{Color, Style, Stylize},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
};

use super::ChartData;
use crate::error::RetireError;
use crate::report::format_compact_currency;

type Tui = Terminal<CrosstermBackend<Stdout>>;

fn init_terminal() -> io::Result<Tui> {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

pub fn show(data: &ChartData) -> Result<(), RetireError> {
    let mut terminal = init_terminal()?;
    let result = event_loop(&mut terminal, data);
    restore_terminal()?;
    result
}

fn event_loop(terminal: &mut Tui, data: &ChartData) -> Result<(), RetireError> {
    loop {
        terminal.draw(|frame| render(frame, data))?;
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press
                && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
            {
                return Ok(());
            }
        }
    }
}

fn horizontal(data: &ChartData, level: Option<f64>) -> Vec<(f64, f64)> {
    level
        .map(|l| vec![(data.x_bounds[0], l), (data.x_bounds[1], l)])
        .unwrap_or_default()
}

fn render(frame: &mut Frame, data: &ChartData) {
    let worth: Vec<(f64, f64)> = data.points.iter().map(|p| (p.age, p.worth)).collect();
    let retirement = if data.shows_retirement() {
        vec![
            (data.retirement_age, data.y_bounds[0]),
            (data.retirement_age, data.y_bounds[1]),
        ]
    } else {
        Vec::new()
    };
    let break_even = horizontal(data, data.break_even_worth);
    let target = horizontal(data, data.target_worth);

    let mut datasets = vec![
        Dataset::default()
            .name("Net worth")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Green))
            .data(&worth),
    ];
    for (name, points, color) in [
        ("Retirement", &retirement, Color::Red),
        ("Break-even", &break_even, Color::Yellow),
        ("Target", &target, Color::Cyan),
    ] {
        if points.is_empty() {
            continue;
        }
        datasets.push(
            Dataset::default()
                .name(name)
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(color))
                .data(points),
        );
    }

    let x_labels: Vec<Span> = ChartData::ticks(data.x_bounds, 5)
        .into_iter()
        .map(|age| Span::raw(format!("{age:.0}")))
        .collect();
    let y_labels: Vec<Span> = ChartData::ticks(data.y_bounds, 5)
        .into_iter()
        .map(|worth| Span::raw(format_compact_currency(worth)))
        .collect();

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Projected net worth (q to quit) "),
        )
        .x_axis(
            Axis::default()
                .title("Age (years)".dark_gray())
                .bounds(data.x_bounds)
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title("Net worth".dark_gray())
                .bounds(data.y_bounds)
                .labels(y_labels),
        );

    frame.render_widget(chart, frame.area());
}
