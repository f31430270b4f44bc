//! Dashboard state and key handling, kept free of terminal I/O.
//!
//! Network work is never done here: key handlers queue a `Task`, the event
//! loop runs it, and hands the outcome back through one of the `finish_*`
//! methods.

use std::collections::VecDeque;
use std::fmt::Display;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::pipeline::{SalesSeries, SalesWindow, validate_question};
use crate::data::mock::EXAMPLE_QUESTIONS;
use crate::domain::{ConnectionStatus, CostView, TimeRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Sales,
    Costs,
    Insights,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Sales, Tab::Costs, Tab::Insights];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Sales => "Sales Analytics",
            Tab::Costs => "Cost Analysis",
            Tab::Insights => "AI Insights",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Sales => 0,
            Tab::Costs => 1,
            Tab::Insights => 2,
        }
    }

    pub fn next(self) -> Self {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Connection {
    Checking,
    Connected,
    Disconnected(String),
    /// Running on generated data; the backend is never probed.
    Demo,
}

impl Connection {
    /// Whether the dashboard body (stats, tabs) should be shown.
    pub fn is_ready(&self) -> bool {
        matches!(self, Connection::Connected | Connection::Demo)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// Transient notification shown in the footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub detail: String,
}

impl Notice {
    fn info(title: &str, detail: &str) -> Self {
        Self {
            kind: NoticeKind::Info,
            title: title.to_string(),
            detail: detail.to_string(),
        }
    }

    fn error(title: &str, detail: &str) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: title.to_string(),
            detail: detail.to_string(),
        }
    }
}

/// Blocking work requested by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    CheckStatus,
    LoadSales,
    Refresh,
    Ask(String),
}

#[derive(Debug)]
pub struct DashboardState {
    pub tab: Tab,
    pub range: TimeRange,
    pub cost_view: CostView,
    pub connection: Connection,
    pub sales: Option<SalesSeries>,
    pub question: String,
    pub editing: bool,
    pub answer: Option<String>,
    /// Index of the example question last loaded into the input.
    pub example: Option<usize>,
    pub notice: Option<Notice>,
    /// Task currently running, if any (drives the loading indicators).
    pub busy: Option<Task>,
    demo: bool,
    queue: VecDeque<Task>,
}

impl DashboardState {
    pub fn new(demo: bool, range: TimeRange) -> Self {
        let (connection, first) = if demo {
            (Connection::Demo, Task::LoadSales)
        } else {
            (Connection::Checking, Task::CheckStatus)
        };
        Self {
            tab: Tab::Sales,
            range,
            cost_view: CostView::Breakdown,
            connection,
            sales: None,
            question: String::new(),
            editing: false,
            answer: None,
            example: None,
            notice: None,
            busy: None,
            demo,
            queue: VecDeque::from([first]),
        }
    }

    pub fn is_demo(&self) -> bool {
        self.demo
    }

    /// Pop the next queued task and mark it as running.
    pub fn next_task(&mut self) -> Option<Task> {
        let task = self.queue.pop_front()?;
        self.busy = Some(task.clone());
        Some(task)
    }

    pub fn has_pending(&self) -> bool {
        !self.queue.is_empty()
    }

    fn enqueue(&mut self, task: Task) {
        if !self.queue.contains(&task) && self.busy.as_ref() != Some(&task) {
            self.queue.push_back(task);
        }
    }

    pub fn is_asking(&self) -> bool {
        matches!(self.busy, Some(Task::Ask(_)))
    }

    pub fn is_loading_sales(&self) -> bool {
        self.busy == Some(Task::LoadSales)
    }

    pub fn is_refreshing(&self) -> bool {
        self.busy == Some(Task::Refresh)
    }

    /// Sales for the selected range, once loaded.
    pub fn window(&self) -> Option<SalesWindow<'_>> {
        self.sales.as_ref().map(|s| s.window(self.range))
    }

    /// Handle one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }
        if self.editing {
            self.handle_edit_key(key.code);
            return false;
        }

        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Tab => self.tab = self.tab.next(),
            KeyCode::BackTab => self.tab = self.tab.prev(),
            KeyCode::Char('1') => self.tab = Tab::Sales,
            KeyCode::Char('2') => self.tab = Tab::Costs,
            KeyCode::Char('3') => self.tab = Tab::Insights,
            KeyCode::Char('t') => self.range = self.range.next(),
            KeyCode::Char('v') => self.cost_view = self.cost_view.toggle(),
            KeyCode::Char('r') => self.enqueue(Task::Refresh),
            KeyCode::Char('c') if !self.demo => {
                self.connection = Connection::Checking;
                self.enqueue(Task::CheckStatus);
            }
            KeyCode::Char('i') | KeyCode::Enter if self.tab == Tab::Insights => {
                self.editing = true;
            }
            KeyCode::Char('e') if self.tab == Tab::Insights => self.load_next_example(),
            _ => {}
        }
        false
    }

    fn handle_edit_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.editing = false,
            KeyCode::Enter => self.submit_question(),
            KeyCode::Backspace => {
                self.question.pop();
            }
            KeyCode::Char(c) => self.question.push(c),
            _ => {}
        }
    }

    fn load_next_example(&mut self) {
        let next = self.example.map(|i| (i + 1) % EXAMPLE_QUESTIONS.len()).unwrap_or(0);
        self.example = Some(next);
        self.question = EXAMPLE_QUESTIONS[next].to_string();
    }

    /// Validate the input and queue it; blank input only raises a notice.
    pub fn submit_question(&mut self) {
        if self.is_asking() {
            return;
        }
        match validate_question(&self.question) {
            Ok(question) => {
                let task = Task::Ask(question.to_string());
                self.answer = None;
                self.editing = false;
                self.enqueue(task);
            }
            Err(_) => {
                self.notice = Some(Notice::error("Empty question", "Please enter a question to analyze."));
            }
        }
    }

    pub fn finish_status<E: Display>(&mut self, result: Result<ConnectionStatus, E>) {
        self.busy = None;
        match result {
            Ok(status) if status.is_connected() => {
                self.connection = Connection::Connected;
                self.notice = Some(Notice::info(
                    "Connection established",
                    "Successfully connected to the data source",
                ));
                self.enqueue(Task::LoadSales);
            }
            Ok(status) => {
                let detail = status.message.unwrap_or_else(|| format!("status '{}'", status.status));
                tracing::warn!(%detail, "backend reports disconnected");
                self.connection = Connection::Disconnected(detail);
                self.notice = Some(connection_failed());
            }
            Err(e) => {
                tracing::warn!(error = %e, "status check failed");
                self.connection = Connection::Disconnected(e.to_string());
                self.notice = Some(connection_failed());
            }
        }
    }

    pub fn finish_sales<E: Display>(&mut self, result: Result<SalesSeries, E>) {
        self.busy = None;
        match result {
            Ok(series) => {
                tracing::info!(buckets = series.buckets.len(), records = series.record_count, "sales loaded");
                self.sales = Some(series);
            }
            Err(e) => {
                // Keep whatever was shown before.
                tracing::error!(error = %e, "failed to load sales");
                self.notice = Some(Notice::error(
                    "Sales data unavailable",
                    "Could not load sales data. Please try again.",
                ));
            }
        }
    }

    pub fn finish_refresh<E: Display>(&mut self, result: Result<(), E>) {
        self.busy = None;
        match result {
            Ok(()) => {
                self.notice = Some(Notice::info(
                    "Data refreshed",
                    "The dashboard has been updated with the latest data",
                ));
                self.enqueue(Task::LoadSales);
            }
            Err(e) => {
                tracing::error!(error = %e, "refresh failed");
                self.notice = Some(Notice::error(
                    "Refresh failed",
                    "Could not refresh the data. Please try again.",
                ));
            }
        }
    }

    pub fn finish_answer<E: Display>(&mut self, result: Result<String, E>) {
        self.busy = None;
        match result {
            Ok(answer) => self.answer = Some(answer),
            Err(e) => {
                tracing::error!(error = %e, "question failed");
                self.notice = Some(Notice::error(
                    "AI analysis failed",
                    "Could not get a response from the AI model. Please try again.",
                ));
            }
        }
    }
}

fn connection_failed() -> Notice {
    Notice::error(
        "Connection failed",
        "Could not connect to the data source. Please check your backend server.",
    )
}
