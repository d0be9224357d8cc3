//! Ratatui-based terminal form.
//!
//! The form shows the five closed-choice selectors and two score sliders,
//! plus a predict action. The artifacts are loaded once before the terminal
//! is put into raw mode, so startup failures print normally and halt.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph},
    Terminal,
};

use crate::app::pipeline::Pipeline;
use crate::domain::{
    ArtifactPaths, Gender, Lunch, ParentalEducation, Prediction, RaceEthnicity, StudentRecord,
    TestPrep, SCORE_MAX,
};
use crate::error::AppError;

/// Number of selectable form fields (five selectors + two sliders).
const FIELD_COUNT: usize = 7;

/// Start the form.
pub fn run(paths: &ArtifactPaths) -> Result<(), AppError> {
    // Load before entering the alternate screen: a missing artifact must be
    // a clean fatal message, not a garbled raw-mode print.
    let pipeline = Pipeline::load(paths)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(pipeline);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
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
    pipeline: Pipeline,
    record: StudentRecord,
    selected_field: usize,
    prediction: Option<Prediction>,
    error: Option<String>,
    status: String,
}

impl App {
    fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            record: StudentRecord::default(),
            selected_field: 0,
            prediction: None,
            error: None,
            status: "Fill in the form, then press Enter to predict.".to_string(),
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
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

    /// Returns true when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_field < FIELD_COUNT - 1 {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::PageUp => self.adjust_field(10),
            KeyCode::PageDown => self.adjust_field(-10),
            KeyCode::Enter | KeyCode::Char('p') => self.predict(),
            KeyCode::Char('r') => {
                self.record = StudentRecord::default();
                self.prediction = None;
                self.error = None;
                self.status = "Form reset to defaults.".to_string();
            }
            KeyCode::Char('d') => self.write_debug_bundle(),
            _ => {}
        }

        false
    }

    fn adjust_field(&mut self, delta: i32) {
        let r = &mut self.record;
        match self.selected_field {
            0 => r.gender = cycle(&Gender::ALL, r.gender, delta),
            1 => r.race_ethnicity = cycle(&RaceEthnicity::ALL, r.race_ethnicity, delta),
            2 => {
                r.parental_level_of_education =
                    cycle(&ParentalEducation::ALL, r.parental_level_of_education, delta)
            }
            3 => r.lunch = cycle(&Lunch::ALL, r.lunch, delta),
            4 => {
                r.test_preparation_course =
                    cycle(&TestPrep::ALL, r.test_preparation_course, delta)
            }
            5 => r.reading_score = bump_score(r.reading_score, delta),
            6 => r.writing_score = bump_score(r.writing_score, delta),
            _ => {}
        }

        let (_, value) = self.record.fields()[self.selected_field];
        self.status = format!("{}: {value}", FIELD_TITLES[self.selected_field]);
    }

    fn predict(&mut self) {
        match self.pipeline.predict(&self.record) {
            Ok(prediction) => {
                self.status = format!("Predicted math score: {}", prediction.display_score());
                self.prediction = Some(prediction);
                self.error = None;
            }
            Err(err) => {
                // The request fails; the form stays live for the next one.
                self.prediction = None;
                self.error = Some(err.to_string());
                self.status = "Prediction failed. Check your inputs and try again.".to_string();
            }
        }
    }

    fn write_debug_bundle(&mut self) {
        let Some(prediction) = &self.prediction else {
            self.status = "No prediction yet. Press Enter first.".to_string();
            return;
        };
        match crate::debug::write_debug_bundle(&self.record, prediction, self.pipeline.meta()) {
            Ok(path) => {
                self.status = format!("Wrote debug bundle: {}", path.display());
            }
            Err(err) => {
                self.status = format!("Debug write failed: {err}");
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let meta = self.pipeline.meta();
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("sperf", Style::default().fg(Color::Cyan)),
            Span::raw(" — Student Math-Score Predictor"),
        ]));
        lines.push(Line::from(Span::styled(
            format!(
                "model: {} | trained: {} | features: {}",
                meta.model_name, meta.model_trained_at, meta.feature_count
            ),
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);

        self.draw_form(frame, chunks[0]);
        self.draw_result(frame, chunks[1]);
    }

    fn draw_form(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let fields = self.record.fields();
        let items: Vec<ListItem> = FIELD_TITLES
            .iter()
            .zip(fields.iter())
            .map(|(title, (_, value))| ListItem::new(format!("{title}: {value}")))
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Student Information").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_result(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        self.draw_gauge(frame, chunks[0]);
        self.draw_detail(frame, chunks[1]);
    }

    fn draw_gauge(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Predicted Math Score").borders(Borders::ALL);

        let Some(prediction) = &self.prediction else {
            frame.render_widget(block, area);
            return;
        };

        let ratio = (prediction.score / f64::from(SCORE_MAX)).clamp(0.0, 1.0);
        let gauge = Gauge::default()
            .block(block)
            .gauge_style(Style::default().fg(Color::Cyan))
            .ratio(ratio)
            .label(prediction.display_score());
        frame.render_widget(gauge, area);
    }

    fn draw_detail(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Result").borders(Borders::ALL);

        if let Some(message) = &self.error {
            let banner = Paragraph::new(Text::from(vec![
                Line::from(Span::styled(
                    "Prediction failed",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::raw(""),
                Line::from(Span::styled(message.clone(), Style::default().fg(Color::Red))),
            ]))
            .wrap(ratatui::widgets::Wrap { trim: true })
            .block(block);
            frame.render_widget(banner, area);
            return;
        }

        let Some(prediction) = &self.prediction else {
            let hint = Paragraph::new("Press Enter to predict.")
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(hint, area);
            return;
        };

        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::raw("Predicted math score: "),
            Span::styled(
                prediction.display_score(),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::from(Span::styled(
            "Based on the trained model and the inputs above.",
            Style::default().fg(Color::Gray),
        )));
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "Top factors:",
            Style::default().fg(Color::Gray),
        )));

        let mut top: Vec<_> = prediction
            .contributions
            .iter()
            .filter(|c| c.value != 0.0)
            .collect();
        top.sort_by(|a, b| {
            b.contribution
                .abs()
                .partial_cmp(&a.contribution.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        for c in top.iter().take(4) {
            lines.push(Line::from(Span::raw(format!(
                "  {} {:+.2}",
                c.feature, c.contribution
            ))));
        }

        let p = Paragraph::new(Text::from(lines)).block(block);
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  PgUp/PgDn ±10  Enter predict  d debug  r reset  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Display titles for the form fields, in `FIELD_NAMES` order.
const FIELD_TITLES: [&str; FIELD_COUNT] = [
    "Gender",
    "Race/Ethnicity Group",
    "Parental Level of Education",
    "Lunch Type",
    "Test Preparation Course",
    "Reading Score (0-100)",
    "Writing Score (0-100)",
];

/// Step through a closed option list, wrapping at both ends.
fn cycle<T: Copy + PartialEq>(all: &[T], current: T, delta: i32) -> T {
    let len = all.len() as i32;
    let pos = all
        .iter()
        .position(|v| *v == current)
        .unwrap_or(0) as i32;
    let next = (pos + delta).rem_euclid(len);
    all[next as usize]
}

/// Move a slider, clamping to the score domain.
fn bump_score(current: u8, delta: i32) -> u8 {
    (i32::from(current) + delta).clamp(0, i32::from(SCORE_MAX)) as u8
}
