//! Ratatui-based terminal form.
//!
//! The left panel lists every input with its current value plus the
//! "Predict Now" button; the right panel shows the last prediction. Changing
//! any input clears the result, so what is shown always belongs to the values
//! on screen.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Wrap},
};
use tracing::debug;

use crate::app::pipeline::{PredictionRun, run_prediction};
use crate::domain::{FIELDS, FieldValue};
use crate::error::{AppError, EXIT_RUNTIME};
use crate::form::FormState;
use crate::model::{Classifier, Outcome};
use crate::report::{CREDIT, RESULT_HEADING, SUBTITLE, TITLE, format_confidence, outcome_text};

mod theme;

/// Index of the "Predict Now" row, just after the last input.
const PREDICT_ROW: usize = FIELDS.len();
/// Step used by PgUp/PgDn on integer inputs.
const BIG_STEP: i64 = 10;

/// Start the TUI with an already loaded model.
pub fn run(model: &dyn Classifier) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(model);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(
                EXIT_RUNTIME,
                format!("Failed to enter alternate screen: {e}"),
            ));
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

enum ResultView {
    Scored(PredictionRun),
    Failed(String),
}

struct App<'m> {
    model: &'m dyn Classifier,
    form: FormState,
    selected: usize,
    edit_buffer: Option<String>,
    status: String,
    result: Option<ResultView>,
}

impl<'m> App<'m> {
    fn new(model: &'m dyn Classifier) -> Self {
        Self {
            model,
            form: FormState::new(),
            selected: 0,
            edit_buffer: None,
            status: format!("Model: {}", model.name()),
            result: None,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(EXIT_RUNTIME, format!("Event read error: {e}")))? {
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

    /// Apply one key press; returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.edit_buffer.is_some() {
            self.handle_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up | KeyCode::BackTab => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Tab => self.selected = (self.selected + 1).min(PREDICT_ROW),
            KeyCode::Left => self.adjust(-1),
            KeyCode::Right => self.adjust(1),
            KeyCode::PageUp => self.adjust(BIG_STEP),
            KeyCode::PageDown => self.adjust(-BIG_STEP),
            KeyCode::Enter => {
                if self.selected == PREDICT_ROW {
                    self.predict();
                } else if FIELDS[self.selected].is_categorical() {
                    self.adjust(1);
                } else {
                    self.begin_edit(None);
                }
            }
            KeyCode::Char('p') => self.predict(),
            KeyCode::Char('r') => {
                self.form.reset();
                self.result = None;
                self.status = "Form reset to defaults.".to_string();
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '-' => {
                if self.selected < PREDICT_ROW && !FIELDS[self.selected].is_categorical() {
                    self.begin_edit(Some(c));
                }
            }
            _ => {}
        }
        false
    }

    fn handle_edit(&mut self, code: KeyCode) {
        let Some(buffer) = self.edit_buffer.as_mut() else {
            return;
        };
        match code {
            KeyCode::Esc => {
                self.edit_buffer = None;
                self.status = "Edit canceled.".to_string();
            }
            KeyCode::Enter => {
                let raw = std::mem::take(buffer);
                self.edit_buffer = None;
                self.commit_edit(&raw);
            }
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '-' => buffer.push(c),
            _ => {}
        }
    }

    fn begin_edit(&mut self, first: Option<char>) {
        let buffer = match first {
            Some(c) => c.to_string(),
            None => self.current_value().map(|v| v.to_string()).unwrap_or_default(),
        };
        self.edit_buffer = Some(buffer);
        self.status = format!(
            "Editing {} ({}). Enter to apply, Esc to cancel.",
            FIELDS[self.selected].label,
            FIELDS[self.selected].describe_domain()
        );
    }

    fn commit_edit(&mut self, raw: &str) {
        let spec = &FIELDS[self.selected];
        match self.form.set_from_text(self.selected, raw) {
            Ok(changed) => {
                if changed {
                    self.result = None;
                }
                self.status = format!("{}: {}", spec.label, raw.trim());
            }
            Err(e) => {
                debug!(field = spec.name, input = raw, "rejected input: {e}");
                self.status = format!("Rejected: {e}");
            }
        }
    }

    fn adjust(&mut self, delta: i64) {
        if self.selected >= PREDICT_ROW {
            return;
        }
        if self.form.adjust(self.selected, delta) {
            self.result = None;
            let value = self.current_value().map(|v| v.to_string()).unwrap_or_default();
            self.status = format!("{}: {value}", FIELDS[self.selected].label);
        }
    }

    fn predict(&mut self) {
        match run_prediction(self.model, &self.form) {
            Ok(run) => {
                self.status = format!("Scored with {}.", self.model.name());
                self.result = Some(ResultView::Scored(run));
            }
            Err(e) => {
                self.status = "Prediction failed.".to_string();
                self.result = Some(ResultView::Failed(e.to_string()));
            }
        }
    }

    fn current_value(&self) -> Option<&FieldValue> {
        self.form.value(self.selected)
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        frame.render_widget(Block::default().style(theme::base()), size);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(4)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let lines = vec![
            Line::from(Span::styled(TITLE, theme::title())),
            Line::from(Span::styled(SUBTITLE, theme::muted())),
        ];
        let p = Paragraph::new(Text::from(lines))
            .style(theme::base())
            .block(Block::default().borders(Borders::ALL).border_style(theme::muted()));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
            .split(area);

        self.draw_form(frame, chunks[0]);
        self.draw_result(frame, chunks[1]);
    }

    fn draw_form(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let label_w = FIELDS.iter().map(|f| f.label.chars().count()).max().unwrap_or(0);

        let mut items: Vec<ListItem> = self
            .form
            .entries()
            .enumerate()
            .map(|(i, (spec, value))| {
                let pad = " ".repeat(label_w.saturating_sub(spec.label.chars().count()));
                let mut spans = vec![Span::raw(format!("{}{pad}  ", spec.label))];
                match (&self.edit_buffer, spec.is_categorical()) {
                    (Some(buffer), false) if i == self.selected => {
                        spans.push(Span::styled(format!("{buffer}▏"), theme::base().fg(theme::WARNING)));
                    }
                    (_, true) => spans.push(Span::raw(format!("‹ {value} ›"))),
                    (_, false) => {
                        spans.push(Span::raw(value.to_string()));
                        spans.push(Span::styled(format!("  ({})", spec.describe_domain()), theme::muted()));
                    }
                }
                ListItem::new(Line::from(spans))
            })
            .collect();
        items.push(ListItem::new(Line::from(Span::styled("  Predict Now  ", theme::button()))));

        let list = List::new(items)
            .style(theme::base())
            .block(
                Block::default()
                    .title("Client")
                    .borders(Borders::ALL)
                    .border_style(theme::muted()),
            )
            .highlight_style(theme::highlight())
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_result(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title(RESULT_HEADING)
            .borders(Borders::ALL)
            .border_style(theme::muted())
            .style(theme::base());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let run = match &self.result {
            None => {
                let msg = Paragraph::new("Press p, or select Predict Now, to score this client.")
                    .style(theme::muted())
                    .wrap(Wrap { trim: true });
                frame.render_widget(msg, inner);
                return;
            }
            Some(ResultView::Failed(message)) => {
                let text = Text::from(vec![
                    Line::from(Span::styled(
                        "Prediction failed",
                        theme::base().fg(theme::FAILURE).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::raw(message.as_str())),
                ]);
                frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }), inner);
                return;
            }
            Some(ResultView::Scored(run)) => run,
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(0)])
            .split(inner);

        let color = match run.prediction.outcome {
            Outcome::Yes => theme::SUCCESS,
            Outcome::No => theme::FAILURE,
        };
        let confidence = format_confidence(run.prediction.probability);
        let headline = Text::from(vec![
            Line::from(Span::styled(
                outcome_text(run.prediction.outcome),
                theme::base().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled("Confidence Score: ", theme::base().add_modifier(Modifier::BOLD)),
                Span::raw(confidence.clone()),
            ]),
        ]);
        frame.render_widget(Paragraph::new(headline), chunks[0]);

        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).border_style(theme::muted()))
            .gauge_style(theme::base().fg(theme::ACCENT).bg(theme::BUTTON))
            .ratio(run.prediction.probability.clamp(0.0, 1.0))
            .label(confidence);
        frame.render_widget(gauge, chunks[1]);

        let meta = Text::from(vec![
            Line::from(Span::styled(format!("model: {}", self.model.name()), theme::muted())),
            Line::from(Span::styled(
                format!("scored at {}", run.scored_at.format("%H:%M:%S")),
                theme::muted(),
            )),
        ]);
        frame.render_widget(Paragraph::new(meta), chunks[2]);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ change  PgUp/PgDn ±10  Enter edit  p predict  r reset  q quit";
        let lines = vec![
            Line::from(vec![
                Span::styled(help, theme::muted()),
                Span::raw(" | "),
                Span::styled(&self.status, theme::base().fg(theme::ACCENT)),
            ]),
            Line::from(Span::styled(CREDIT, theme::muted())),
        ];
        let p = Paragraph::new(Text::from(lines))
            .style(theme::base())
            .block(Block::default().borders(Borders::ALL).border_style(theme::muted()));
        frame.render_widget(p, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClientRecord, schema};
    use crate::model::{DepositModel, ModelError};
    use ratatui::backend::TestBackend;
    use std::path::PathBuf;

    struct Fixed(f64);

    impl Classifier for Fixed {
        fn predict_proba(&self, _record: &ClientRecord) -> Result<f64, ModelError> {
            Ok(self.0)
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct Broken;

    impl Classifier for Broken {
        fn predict_proba(&self, _record: &ClientRecord) -> Result<f64, ModelError> {
            Err(ModelError::Incompatible("weights missing".to_string()))
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    fn select(app: &mut App<'_>, name: &str) {
        app.selected = schema::field_index(name).unwrap();
    }

    fn press(app: &mut App<'_>, keys: &[KeyCode]) {
        for key in keys {
            assert!(!app.handle_key(*key));
        }
    }

    fn render(app: &App<'_>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn navigation_stops_at_both_ends() {
        let model = Fixed(0.2);
        let mut app = App::new(&model);
        press(&mut app, &[KeyCode::Up]);
        assert_eq!(app.selected, 0);
        for _ in 0..40 {
            press(&mut app, &[KeyCode::Down]);
        }
        assert_eq!(app.selected, PREDICT_ROW);
    }

    #[test]
    fn enter_on_button_predicts() {
        let model = Fixed(0.8);
        let mut app = App::new(&model);
        app.selected = PREDICT_ROW;
        press(&mut app, &[KeyCode::Enter]);
        match &app.result {
            Some(ResultView::Scored(run)) => {
                assert_eq!(run.prediction.outcome, Outcome::Yes);
                assert_eq!(run.prediction.probability, 0.8);
            }
            _ => panic!("expected a prediction"),
        }
    }

    #[test]
    fn changing_an_input_clears_the_result() {
        let model = Fixed(0.3);
        let mut app = App::new(&model);
        press(&mut app, &[KeyCode::Char('p')]);
        assert!(app.result.is_some());

        select(&mut app, "housing");
        press(&mut app, &[KeyCode::Right]);
        assert!(app.result.is_none());
        assert_eq!(app.form.assemble().unwrap().housing, "no");
    }

    #[test]
    fn out_of_range_edit_is_rejected() {
        let model = Fixed(0.3);
        let mut app = App::new(&model);
        select(&mut app, "age");

        press(&mut app, &[KeyCode::Char('1'), KeyCode::Char('0'), KeyCode::Char('1'), KeyCode::Enter]);
        assert!(app.status.starts_with("Rejected"));
        assert_eq!(app.form.assemble().unwrap().age, 35);

        press(
            &mut app,
            &[KeyCode::Enter, KeyCode::Backspace, KeyCode::Backspace, KeyCode::Char('1'), KeyCode::Char('8'), KeyCode::Enter],
        );
        assert_eq!(app.form.assemble().unwrap().age, 18);
        assert!(app.edit_buffer.is_none());
    }

    #[test]
    fn escape_cancels_edit_without_quitting() {
        let model = Fixed(0.3);
        let mut app = App::new(&model);
        select(&mut app, "balance");
        press(&mut app, &[KeyCode::Enter, KeyCode::Char('7'), KeyCode::Esc]);
        assert!(app.edit_buffer.is_none());
        assert_eq!(app.form.assemble().unwrap().balance, 1000);
        assert!(app.handle_key(KeyCode::Esc));
    }

    #[test]
    fn page_keys_step_by_ten_within_bounds() {
        let model = Fixed(0.3);
        let mut app = App::new(&model);
        select(&mut app, "campaign");
        press(&mut app, &[KeyCode::PageUp]);
        assert_eq!(app.form.assemble().unwrap().campaign, 12);
        press(&mut app, &[KeyCode::PageDown, KeyCode::PageDown]);
        assert_eq!(app.form.assemble().unwrap().campaign, 1);
    }

    #[test]
    fn model_failure_surfaces_in_result_panel() {
        let model = Broken;
        let mut app = App::new(&model);
        press(&mut app, &[KeyCode::Char('p')]);
        match &app.result {
            Some(ResultView::Failed(message)) => assert!(message.contains("weights missing")),
            _ => panic!("expected a failure"),
        }
        assert!(render(&app).contains("Prediction failed"));
    }

    #[test]
    fn renders_form_and_scored_result() {
        let model =
            DepositModel::load(&PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("saved_model")).unwrap();
        let mut app = App::new(&model);

        let screen = render(&app);
        assert!(screen.contains(TITLE));
        assert!(screen.contains("Predict Now"));
        assert!(screen.contains("Call Duration (sec)"));
        assert!(screen.contains("github.com/Olukem"));

        press(&mut app, &[KeyCode::Char('p')]);
        let screen = render(&app);
        assert!(screen.contains("Confidence Score: 35.97%"));
        assert!(screen.contains("bank-marketing-logreg"));
    }
}
