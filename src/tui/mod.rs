//! Ratatui-based terminal dashboard.
//!
//! Three tabs (sales, costs, AI insights) under a row of headline stat
//! cards. All state lives in [`state::DashboardState`]; this module owns the
//! terminal, runs queued network tasks, and draws.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
};

use crate::app::pipeline::{SalesSource, load_sales};
use crate::data::DashboardClient;
use crate::data::mock::{self, CURRENCY, EXAMPLE_QUESTIONS, OVERVIEW};
use crate::domain::{CostView, StatCard, TimeRange};
use crate::error::AppError;
use crate::report::format_grouped;

mod pie;
mod plotters_chart;
pub mod state;

use pie::{CostPieChart, slice_color};
use plotters_chart::{RETURNS_RGB, SALES_RGB, SalesBarChart};
use state::{Connection, DashboardState, NoticeKind, Tab, Task};

/// Start the TUI.
pub fn run(client: DashboardClient, source: SalesSource, range: TimeRange) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    tracing::info!(api = client.api_base(), demo = source.is_demo(), "dashboard started");
    let mut app = App::new(client, source, range);
    let result = app.event_loop(&mut terminal);
    tracing::info!("dashboard closed");
    result
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    state: DashboardState,
    client: DashboardClient,
    source: SalesSource,
}

impl App {
    fn new(client: DashboardClient, source: SalesSource, range: TimeRange) -> Self {
        Self {
            state: DashboardState::new(source.is_demo(), range),
            client,
            source,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if let Some(task) = self.state.next_task() {
                // Show the loading state before blocking on the request.
                self.redraw(terminal)?;
                self.run_task(task);
                needs_redraw = true;
                continue;
            }

            if needs_redraw {
                self.redraw(terminal)?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.state.handle_key(key) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn redraw<B: ratatui::backend::Backend>(&self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let origin = self.origin_label();
        terminal
            .draw(|f| draw(f, &self.state, &origin))
            .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
        Ok(())
    }

    fn run_task(&mut self, task: Task) {
        tracing::debug!(?task, "running task");
        match task {
            Task::CheckStatus => {
                let result = self.client.status();
                self.state.finish_status(result);
            }
            Task::LoadSales => {
                let result = load_sales(&self.source, &self.client);
                self.state.finish_sales(result);
            }
            Task::Refresh => {
                if self.source.is_demo() {
                    self.source = self.source.reseeded();
                    self.state.finish_refresh(Ok::<(), AppError>(()));
                } else {
                    let result = self.client.trigger_refresh();
                    self.state.finish_refresh(result);
                }
            }
            Task::Ask(question) => {
                let result = self.client.ask(&question);
                self.state.finish_answer(result);
            }
        }
    }

    fn origin_label(&self) -> String {
        match &self.source {
            SalesSource::Backend => self.client.api_base().to_string(),
            SalesSource::Demo(cfg) => format!("demo data (seed {})", cfg.seed),
        }
    }
}

fn draw(frame: &mut Frame<'_>, state: &DashboardState, origin: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
        .split(frame.area());

    draw_header(frame, chunks[0], state, origin);
    if state.connection.is_ready() {
        draw_dashboard(frame, chunks[1], state);
    } else {
        draw_connection_banner(frame, chunks[1], state, origin);
    }
    draw_footer(frame, chunks[2], state);
}

fn draw_header(frame: &mut Frame<'_>, area: Rect, state: &DashboardState, origin: &str) {
    let (indicator, color) = match &state.connection {
        Connection::Checking => ("● Connecting...", Color::Yellow),
        Connection::Connected => ("● Connected", Color::Green),
        Connection::Disconnected(_) => ("● Disconnected", Color::Red),
        Connection::Demo => ("● Demo", Color::Magenta),
    };

    let mut spans = vec![
        Span::styled("Sales Dashboard", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::styled(format!("  {origin}  "), Style::default().fg(Color::Gray)),
        Span::styled(indicator, Style::default().fg(color)),
    ];
    if state.is_refreshing() {
        spans.push(Span::styled("  Refreshing...", Style::default().fg(Color::Yellow)));
    }

    let p = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(p, area);
}

fn draw_connection_banner(frame: &mut Frame<'_>, area: Rect, state: &DashboardState, origin: &str) {
    let text = match &state.connection {
        Connection::Disconnected(detail) => Text::from(vec![
            Line::from(Span::styled(
                "Backend unavailable",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(detail.as_str()),
            Line::from(""),
            Line::from(Span::styled(
                format!("Make sure the backend server is running at {origin}. Press c to retry."),
                Style::default().fg(Color::Gray),
            )),
        ]),
        _ => Text::from(Line::from(Span::styled(
            "Connecting to the data source...",
            Style::default().fg(Color::Yellow),
        ))),
    };

    let p = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(p, area);
}

fn draw_dashboard(frame: &mut Frame<'_>, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    draw_stat_cards(frame, chunks[0], &mock::stat_cards(&OVERVIEW));

    let tabs = Tabs::new(Tab::ALL.iter().map(|t| t.title()))
        .select(state.tab.index())
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::Gray))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, chunks[1]);

    match state.tab {
        Tab::Sales => draw_sales_tab(frame, chunks[2], state),
        Tab::Costs => draw_costs_tab(frame, chunks[2], state.cost_view),
        Tab::Insights => draw_insights_tab(frame, chunks[2], state),
    }
}

fn draw_stat_cards(frame: &mut Frame<'_>, area: Rect, cards: &[StatCard]) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Length(4)])
        .split(area);

    for (row, chunk) in rows.iter().zip(cards.chunks(4)) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 4); 4])
            .split(*row);
        for (rect, card) in cols.iter().zip(chunk) {
            frame.render_widget(card_widget(card.title, &card.value, card.caption), *rect);
        }
    }
}

fn card_widget<'a>(title: &'a str, value: &'a str, caption: &'a str) -> Paragraph<'a> {
    Paragraph::new(vec![
        Line::from(Span::styled(value, Style::default().add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(caption, Style::default().fg(Color::Gray))),
    ])
    .block(Block::default().title(title).borders(Borders::ALL))
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

fn draw_sales_tab(frame: &mut Frame<'_>, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(4)])
        .split(area);

    let legend = Line::from(vec![
        Span::styled(state.range.display_name(), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled("  (t to change)   ", Style::default().fg(Color::Gray)),
        Span::styled("■ ", Style::default().fg(rgb(SALES_RGB))),
        Span::raw("Sales  "),
        Span::styled("■ ", Style::default().fg(rgb(RETURNS_RGB))),
        Span::raw("Returns"),
    ]);
    frame.render_widget(Paragraph::new(legend), chunks[0]);

    let title = if state.is_loading_sales() {
        "Monthly Sales vs Returns (loading...)"
    } else {
        "Monthly Sales vs Returns"
    };
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(chunks[1]);
    frame.render_widget(block, chunks[1]);
    frame.render_widget(Clear, inner);

    let window = state.window();
    match &window {
        Some(w) if !w.buckets.is_empty() => frame.render_widget(SalesBarChart::new(w.buckets), inner),
        Some(_) => frame.render_widget(placeholder("No sales data available."), inner),
        None if state.is_loading_sales() => frame.render_widget(placeholder("Loading sales data..."), inner),
        None => frame.render_widget(placeholder("No sales data loaded. Press r to refresh."), inner),
    }

    let summary = window.map(|w| w.summary).unwrap_or_default();
    let values = [
        ("Total Sales", format!("{CURRENCY}{}", format_grouped(summary.total_sales, 2))),
        ("Total Returns", format!("{CURRENCY}{}", format_grouped(summary.total_returns, 2))),
        ("Return Rate", format!("{:.1}%", summary.return_rate_pct)),
    ];
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(chunks[2]);
    for (rect, (title, value)) in cols.iter().zip(values.iter()) {
        frame.render_widget(card_widget(title, value, state.range.display_name()), *rect);
    }
}

fn draw_costs_tab(frame: &mut Frame<'_>, area: Rect, view: CostView) {
    let panel = mock::cost_panel(view);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let mut switcher = Vec::new();
    for v in [CostView::Breakdown, CostView::Category] {
        let style = if v == view {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };
        switcher.push(Span::styled(format!(" {} ", v.display_name()), style));
        switcher.push(Span::raw(" "));
    }
    switcher.push(Span::styled(" (v to switch)", Style::default().fg(Color::Gray)));
    frame.render_widget(Paragraph::new(Line::from(switcher)), chunks[0]);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[1]);

    let block = Block::default().title(view.display_name()).borders(Borders::ALL);
    let inner = block.inner(cols[0]);
    frame.render_widget(block, cols[0]);
    frame.render_widget(Clear, inner);
    frame.render_widget(CostPieChart { slices: panel.slices }, inner);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines: Vec<Line> = panel
        .slices
        .iter()
        .enumerate()
        .map(|(i, s)| {
            Line::from(vec![
                Span::styled("■ ", Style::default().fg(slice_color(i))),
                Span::raw(format!("{:<18}", s.label)),
                Span::styled(format!("{:>5.1}%", s.percentage), bold),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(panel.heading, bold)));
    lines.push(Line::from(panel.summary));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(panel.insights_title, bold)));
    lines.extend(panel.insights.iter().map(|s| Line::from(format!("• {s}"))));

    let details = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Analysis").borders(Borders::ALL));
    frame.render_widget(details, cols[1]);
}

fn draw_insights_tab(frame: &mut Frame<'_>, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(EXAMPLE_QUESTIONS.len() as u16 + 2),
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(Span::styled(
            "Ask a question about your sales data.",
            Style::default().fg(Color::Gray),
        )),
        chunks[0],
    );

    let input_style = if state.editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let input = if state.editing {
        Line::from(format!("{}_", state.question))
    } else if state.question.is_empty() {
        Line::from(Span::styled("Press i to type a question", Style::default().fg(Color::DarkGray)))
    } else {
        Line::from(state.question.as_str())
    };
    frame.render_widget(
        Paragraph::new(input).block(Block::default().title("Question").borders(Borders::ALL).border_style(input_style)),
        chunks[1],
    );

    let action = if state.is_asking() {
        Span::styled("Analyzing...", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    } else {
        Span::styled("Enter: Get AI Insights", Style::default().fg(Color::Cyan))
    };
    frame.render_widget(Paragraph::new(Line::from(action)), chunks[2]);

    let answer = match &state.answer {
        Some(a) => Paragraph::new(a.as_str()),
        None => placeholder("No answer yet."),
    };
    frame.render_widget(
        answer
            .wrap(Wrap { trim: false })
            .block(Block::default().title("AI Response").borders(Borders::ALL)),
        chunks[3],
    );

    let examples: Vec<Line> = EXAMPLE_QUESTIONS
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let marker = if state.example == Some(i) { "» " } else { "  " };
            Line::from(format!("{marker}{q}"))
        })
        .collect();
    frame.render_widget(
        Paragraph::new(examples).block(Block::default().title("Example questions (e to load)").borders(Borders::ALL)),
        chunks[4],
    );
}

fn draw_footer(frame: &mut Frame<'_>, area: Rect, state: &DashboardState) {
    let help = if state.editing {
        "Enter submit  Esc stop editing  Ctrl-C quit"
    } else {
        "Tab/1-3 switch  t range  v cost view  r refresh  c reconnect  q quit"
    };
    let mut spans = vec![Span::styled(help, Style::default().fg(Color::Gray))];
    if let Some(notice) = &state.notice {
        let color = match notice.kind {
            NoticeKind::Info => Color::Green,
            NoticeKind::Error => Color::Red,
        };
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            format!("{}: {}", notice.title, notice.detail),
            Style::default().fg(color),
        ));
    }
    let p = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(p, area);
}

fn placeholder(msg: &str) -> Paragraph<'_> {
    Paragraph::new(Span::styled(msg, Style::default().fg(Color::Yellow)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::SalesSeries;
    use crate::domain::SalesRecord;
    use ratatui::backend::TestBackend;

    fn render(state: &DashboardState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 48)).unwrap();
        terminal.draw(|f| draw(f, state, "demo data (seed 1)")).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn loaded_state() -> DashboardState {
        let mut s = DashboardState::new(true, TimeRange::TwelveMonths);
        s.next_task();
        let records = vec![
            SalesRecord::new("2024-01-05", 1000.0, "Delivered"),
            SalesRecord::new("2024-01-06", 250.0, "Cancelled"),
            SalesRecord::new("2024-02-01", 2000.0, "Delivered"),
        ];
        s.finish_sales(Ok::<_, String>(SalesSeries::from_records(&records)));
        s
    }

    #[test]
    fn sales_tab_shows_cards_and_summary() {
        let screen = render(&loaded_state());
        assert!(screen.contains("Sales Analytics"));
        assert!(screen.contains("Total Products"));
        assert!(screen.contains("Total Returns"));
        assert!(screen.contains("₹3,250.00"));
        assert!(screen.contains("7.7%"));
    }

    #[test]
    fn costs_tab_lists_slices_with_percentages() {
        let mut s = loaded_state();
        s.tab = Tab::Costs;
        let screen = render(&s);
        let first = &mock::COST_BREAKDOWN[0];
        assert!(screen.contains(first.label));
        assert!(screen.contains(&format!("{:.1}%", first.percentage)));
    }

    #[test]
    fn insights_tab_shows_busy_label_while_asking() {
        let mut s = loaded_state();
        s.tab = Tab::Insights;
        assert!(render(&s).contains("Get AI Insights"));
        s.busy = Some(Task::Ask("why?".to_string()));
        assert!(render(&s).contains("Analyzing..."));
    }

    #[test]
    fn disconnected_state_shows_banner_instead_of_tabs() {
        let mut s = DashboardState::new(false, TimeRange::TwelveMonths);
        s.next_task();
        s.finish_status(Err("connection refused"));
        let screen = render(&s);
        assert!(screen.contains("Backend unavailable"));
        assert!(screen.contains("connection refused"));
        assert!(!screen.contains("Sales Analytics"));
    }
}
