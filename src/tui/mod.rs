//! Terminal prompter - each interactive step owns the terminal while it runs

pub mod form;
pub mod keys;
pub mod picker;

use std::io::{self, Stdout};
use std::path::{Path, PathBuf};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use crate::presets::StoredParams;
use crate::render::{highlight_json, method_color};
use crate::request::FormValues;
use crate::session::{EndpointChoice, FormOutcome, PresetChoice, Prompter};
use crate::spec::Endpoint;

use form::{FormExit, ParamForm};
use keys::{form_action, picker_action};
use picker::{ListPicker, PickerItem, PickerOutcome};

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

fn with_terminal<T>(step: impl FnOnce(&mut Term) -> Result<T>) -> Result<T> {
    enable_raw_mode()?;
    // restores raw mode even when entering the alternate screen fails
    let _guard = TerminalGuard;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    step(&mut terminal)
}

/// Block until the next key press
fn next_key() -> Result<KeyEvent> {
    loop {
        if let Event::Key(key) = event::read()? {
            return Ok(key);
        }
    }
}

fn run_picker(
    picker: &mut ListPicker,
    hint: &str,
    detail: Option<&dyn Fn(usize) -> Vec<Line<'static>>>,
) -> Result<PickerOutcome> {
    with_terminal(|terminal| loop {
        let pane = detail.map(|render| picker.current().map(render).unwrap_or_default());
        terminal.draw(|f| picker.draw(f, pane, hint))?;

        if let Some(action) = picker_action(next_key()?, picker.filtering()) {
            if let Some(outcome) = picker.apply(action) {
                return Ok(outcome);
            }
        }
    })
}

fn endpoint_detail(endpoint: &Endpoint) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                endpoint.method_upper(),
                Style::default().fg(method_color(&endpoint.method)).bold(),
            ),
            Span::raw(" "),
            Span::raw(endpoint.path.clone()),
        ]),
        Line::raw(""),
    ];
    match serde_json::to_string_pretty(&endpoint.operation) {
        Ok(json) => lines.extend(highlight_json(&json)),
        Err(e) => lines.push(Line::raw(format!("cannot show operation: {}", e))),
    }
    lines
}

/// `Prompter` backed by ratatui screens
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        TerminalPrompter
    }
}

impl Prompter for TerminalPrompter {
    fn select_spec(&mut self, candidates: &[PathBuf]) -> Result<Option<PathBuf>> {
        let items = candidates
            .iter()
            .map(|p| PickerItem::new(p.display().to_string()))
            .collect();
        let mut picker = ListPicker::new("Select spec", items);

        let outcome = run_picker(&mut picker, " Enter:select | /:filter | Esc:quit ", None)?;
        Ok(match outcome {
            PickerOutcome::Selected(i) => candidates.get(i).cloned(),
            PickerOutcome::Canceled | PickerOutcome::Back | PickerOutcome::Quit => None,
        })
    }

    fn select_endpoint(&mut self, spec_path: &Path, endpoints: &[Endpoint]) -> Result<EndpointChoice> {
        let items = endpoints
            .iter()
            .map(|e| {
                PickerItem::new(e.path.clone())
                    .tagged(e.method_upper(), method_color(&e.method))
                    .described(e.operation.summary.clone())
            })
            .collect();
        let title = format!("Endpoints in {}", spec_path.display());
        let mut picker = ListPicker::new(title, items);

        let detail: &dyn Fn(usize) -> Vec<Line<'static>> =
            &|i: usize| endpoints.get(i).map(endpoint_detail).unwrap_or_default();
        let outcome = run_picker(
            &mut picker,
            " Enter:select | /:filter | Ctrl+B:switch spec | Esc:quit ",
            Some(detail),
        )?;
        Ok(match outcome {
            PickerOutcome::Selected(i) => EndpointChoice::Selected(i),
            PickerOutcome::Back => EndpointChoice::SwitchSpec,
            PickerOutcome::Canceled | PickerOutcome::Quit => EndpointChoice::Quit,
        })
    }

    fn select_preset(&mut self, endpoint: &Endpoint, presets: &[StoredParams]) -> Result<PresetChoice> {
        let mut items = vec![PickerItem::new("New values").described("Start with empty fields")];
        items.extend(
            presets
                .iter()
                .map(|p| PickerItem::new(p.title()).described(p.summary())),
        );
        let mut picker = ListPicker::new(format!("Presets for {}", endpoint.title()), items);

        let outcome = run_picker(
            &mut picker,
            " Enter:select | Ctrl+B:back | Esc:cancel | Ctrl+C:quit ",
            None,
        )?;
        Ok(match outcome {
            PickerOutcome::Selected(0) => PresetChoice::Fresh,
            PickerOutcome::Selected(i) => PresetChoice::Preset(i - 1),
            PickerOutcome::Back => PresetChoice::Back,
            PickerOutcome::Canceled => PresetChoice::Cancel,
            PickerOutcome::Quit => PresetChoice::Quit,
        })
    }

    fn collect_params(&mut self, endpoint: &Endpoint, seed: &FormValues) -> Result<FormOutcome> {
        let mut form = ParamForm::new(endpoint, seed);

        let exit = with_terminal(|terminal| loop {
            terminal.draw(|f| form.draw(f))?;
            if let Some(action) = form_action(next_key()?, form.in_body()) {
                if let Some(exit) = form.apply(action) {
                    return Ok(exit);
                }
            }
        })?;

        tracing::debug!(?exit, endpoint = %endpoint.title(), "Form closed");
        Ok(match exit {
            FormExit::Submit => FormOutcome::Submitted(form.values()),
            FormExit::Cancel => FormOutcome::Canceled,
            FormExit::Quit => FormOutcome::Quit,
        })
    }
}
