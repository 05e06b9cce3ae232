mod fitting_flow;
mod keymap;
mod theme;
mod ui;

use std::io::{Stdout, stdout};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use crossterm::cursor::{Hide, Show};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use fitting_flow::FittingScreen;
use petfit_app::App;
use petfit_core::page::PageContext;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::ui::modal::render_error_modal;

const TICK_RATE: Duration = Duration::from_millis(120);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiExit {
    Completed,
    Canceled,
    /// The server demanded a login; the caller should send the user here.
    LoginRedirect { url: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SetupStage {
    RawMode,
    AltScreen,
    MouseCapture,
}

const SETUP_ORDER: [SetupStage; 3] = [
    SetupStage::RawMode,
    SetupStage::AltScreen,
    SetupStage::MouseCapture,
];

impl SetupStage {
    fn undo_label(self) -> &'static str {
        match self {
            Self::RawMode => "disable raw mode",
            Self::AltScreen => "restore alternate screen",
            Self::MouseCapture => "disable mouse capture",
        }
    }
}

trait TerminalOps {
    type Terminal;

    fn enable(&mut self, stage: SetupStage) -> Result<()>;
    fn disable(&mut self, stage: SetupStage) -> Result<()>;
    fn create_terminal(&mut self) -> Result<Self::Terminal>;
}

struct CrosstermOps;

impl TerminalOps for CrosstermOps {
    type Terminal = Terminal<CrosstermBackend<Stdout>>;

    fn enable(&mut self, stage: SetupStage) -> Result<()> {
        let mut out = stdout();
        match stage {
            SetupStage::RawMode => enable_raw_mode().context("failed to enable raw mode"),
            SetupStage::AltScreen => execute!(out, EnterAlternateScreen, Hide)
                .context("failed to enter alternate screen"),
            SetupStage::MouseCapture => {
                execute!(out, EnableMouseCapture).context("failed to enable mouse capture")
            }
        }
    }

    fn disable(&mut self, stage: SetupStage) -> Result<()> {
        let mut out = stdout();
        match stage {
            SetupStage::RawMode => disable_raw_mode().context("failed to disable raw mode"),
            SetupStage::AltScreen => execute!(out, Show, LeaveAlternateScreen)
                .context("failed to leave alternate screen"),
            SetupStage::MouseCapture => {
                execute!(out, DisableMouseCapture).context("failed to disable mouse capture")
            }
        }
    }

    fn create_terminal(&mut self) -> Result<Terminal<CrosstermBackend<Stdout>>> {
        Terminal::new(CrosstermBackend::new(stdout())).context("failed to create terminal backend")
    }
}

pub(crate) struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    pub(crate) fn enter() -> Result<Self> {
        let terminal = enter_with_ops(&mut CrosstermOps)?;
        Ok(Self { terminal })
    }

    pub(crate) fn draw<F>(&mut self, draw_fn: F) -> Result<()>
    where
        F: FnOnce(&mut ratatui::Frame<'_>),
    {
        self.terminal
            .draw(draw_fn)
            .context("failed to render terminal")?;
        Ok(())
    }

    pub(crate) fn autoresize(&mut self) -> Result<()> {
        self.terminal
            .autoresize()
            .context("failed to autoresize terminal")?;
        Ok(())
    }

    pub(crate) fn area(&self) -> Result<Rect> {
        let size = self
            .terminal
            .size()
            .context("failed to read terminal size")?;
        Ok(Rect::new(0, 0, size.width, size.height))
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        leave_with_ops(&mut CrosstermOps);
    }
}

/// Runs the setup stages in order. A failing stage rolls back every stage
/// that already succeeded, newest first.
fn enter_with_ops<O: TerminalOps>(ops: &mut O) -> Result<O::Terminal> {
    let mut entered = Vec::with_capacity(SETUP_ORDER.len());
    for stage in SETUP_ORDER {
        if let Err(error) = ops.enable(stage) {
            return Err(failure_with_rollback(ops, &entered, error));
        }
        entered.push(stage);
    }

    ops.create_terminal()
        .map_err(|error| failure_with_rollback(ops, &entered, error))
}

fn failure_with_rollback(
    ops: &mut impl TerminalOps,
    entered: &[SetupStage],
    setup_error: anyhow::Error,
) -> anyhow::Error {
    let cleanup_failures: Vec<String> = entered
        .iter()
        .rev()
        .filter_map(|stage| {
            ops.disable(*stage).err().map(|error| {
                format!("failed to {} during rollback: {error:#}", stage.undo_label())
            })
        })
        .collect();

    if cleanup_failures.is_empty() {
        setup_error
    } else {
        anyhow!(
            "{setup_error:#}\nterminal rollback cleanup failed: {}",
            cleanup_failures.join("\n")
        )
    }
}

fn leave_with_ops(ops: &mut impl TerminalOps) {
    for stage in SETUP_ORDER.iter().rev() {
        let _ = ops.disable(*stage);
    }
}

pub(crate) fn is_ctrl_c(key: KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

/// Drives the product page and fitting dialog until the user leaves or the
/// server redirects to login.
pub fn run_fitting(app: &App, page: PageContext) -> Result<UiExit> {
    let mut session = TerminalSession::enter()?;
    let mut screen = FittingScreen::new(app, page);
    let mut global_error: Option<String> = None;
    tracing::info!("fitting ui started");

    loop {
        session.draw(|frame| {
            screen.render(frame);
            if let Some(message) = global_error.as_deref() {
                render_global_error(frame, message);
            }
        })?;

        if let Some(exit) = screen.pending_exit() {
            tracing::info!(?exit, "fitting ui finished");
            return Ok(exit);
        }

        let has_event = event::poll(TICK_RATE).context("failed to poll terminal event")?;
        if !has_event {
            screen.on_tick(Instant::now());
            continue;
        }

        let event = event::read().context("failed to read terminal event")?;
        let key = match event {
            Event::Resize(_, _) => {
                session.autoresize()?;
                continue;
            }
            Event::Mouse(mouse) => {
                if global_error.is_none() {
                    screen.on_mouse(mouse, session.area()?);
                }
                continue;
            }
            Event::Key(key) if matches!(key.kind, KeyEventKind::Press) => key,
            _ => continue,
        };

        if is_ctrl_c(key) {
            return Ok(UiExit::Canceled);
        }

        if global_error.is_some() {
            if keymap::is_confirm(key) || keymap::is_back(key) {
                global_error = None;
            }
            continue;
        }

        match screen.on_key(key, app) {
            Ok(Some(exit)) => {
                tracing::info!(?exit, "fitting ui finished");
                return Ok(exit);
            }
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(error = %format!("{error:#}"), "fitting ui action failed");
                global_error = Some(format!("{error:#}"));
            }
        }

        screen.on_tick(Instant::now());
    }
}

fn render_global_error(frame: &mut ratatui::Frame<'_>, message: &str) {
    let text = format!("Operation failed.\n\n{message}");
    render_error_modal(frame, &text, 80, 50, "Enter/Esc: continue");
}

pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let pct_x = percent_x.min(100);
    let pct_y = percent_y.min(100);

    let [_, vertical, _] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - pct_y) / 2),
            Constraint::Percentage(pct_y),
            Constraint::Percentage((100 - pct_y) / 2),
        ])
        .areas(area);
    let [_, horizontal, _] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - pct_x) / 2),
            Constraint::Percentage(pct_x),
            Constraint::Percentage((100 - pct_x) / 2),
        ])
        .areas(vertical);
    horizontal
}
