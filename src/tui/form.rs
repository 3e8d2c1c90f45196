//! Parameter form - path and query fields plus an optional JSON body

use std::collections::BTreeMap;

use ratatui::{prelude::*, widgets::*};

use super::keys::FormAction;
use crate::request::FormValues;
use crate::spec::{Endpoint, ParameterLocation};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Path,
    Query,
    Body,
}

#[derive(Clone, Debug)]
pub struct FormField {
    pub kind: FieldKind,
    pub name: String,
    pub label: String,
    pub value: String,
    /// Cursor position in chars
    cursor: usize,
}

impl FormField {
    fn new(kind: FieldKind, name: impl Into<String>, label: impl Into<String>, value: String) -> Self {
        let cursor = value.chars().count();
        FormField {
            kind,
            name: name.into(),
            label: label.into(),
            value,
            cursor,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let at = self.byte_index(self.cursor - 1);
        self.value.remove(at);
        self.cursor -= 1;
    }

    fn delete(&mut self) {
        if self.cursor < self.len() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    /// (line, column) of the cursor, in chars
    fn line_col(&self) -> (usize, usize) {
        let before: Vec<char> = self.value.chars().take(self.cursor).collect();
        let line = before.iter().filter(|&&c| c == '\n').count();
        let col = before.iter().rev().take_while(|&&c| c != '\n').count();
        (line, col)
    }

    fn move_line(&mut self, down: bool) {
        let (line, col) = self.line_col();
        let lines: Vec<&str> = self.value.split('\n').collect();
        let target = if down {
            if line + 1 >= lines.len() {
                return;
            }
            line + 1
        } else if line == 0 {
            return;
        } else {
            line - 1
        };

        let start: usize = lines[..target].iter().map(|l| l.chars().count() + 1).sum();
        self.cursor = start + col.min(lines[target].chars().count());
    }
}

/// How the operator left the form
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormExit {
    Submit,
    Cancel,
    Quit,
}

#[derive(Debug)]
pub struct ParamForm {
    title: String,
    fields: Vec<FormField>,
    focus: usize,
    recording: bool,
}

impl ParamForm {
    /// Build the fields for `endpoint`, pre-filled from `seed`
    pub fn new(endpoint: &Endpoint, seed: &FormValues) -> Self {
        let mut fields = Vec::new();

        for param in endpoint.parameters_in(ParameterLocation::Path) {
            let value = seed.path.get(&param.name).cloned().unwrap_or_default();
            fields.push(FormField::new(FieldKind::Path, &param.name, format!("path {}", param.label()), value));
        }
        for param in endpoint.parameters_in(ParameterLocation::Query) {
            let value = seed.query.get(&param.name).cloned().unwrap_or_default();
            fields.push(FormField::new(FieldKind::Query, &param.name, format!("query {}", param.label()), value));
        }
        if endpoint.operation.has_body() {
            fields.push(FormField::new(FieldKind::Body, "body", "body (JSON)", seed.body.clone()));
        }

        ParamForm {
            title: endpoint.title(),
            fields,
            focus: 0,
            recording: seed.recording,
        }
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn recording(&self) -> bool {
        self.recording
    }

    pub fn in_body(&self) -> bool {
        self.fields
            .get(self.focus)
            .is_some_and(|f| f.kind == FieldKind::Body)
    }

    /// Values as entered so far
    pub fn values(&self) -> FormValues {
        let by_kind = |kind: FieldKind| -> BTreeMap<String, String> {
            self.fields
                .iter()
                .filter(|f| f.kind == kind)
                .map(|f| (f.name.clone(), f.value.clone()))
                .collect()
        };

        FormValues {
            path: by_kind(FieldKind::Path),
            query: by_kind(FieldKind::Query),
            body: self
                .fields
                .iter()
                .find(|f| f.kind == FieldKind::Body)
                .map(|f| f.value.clone())
                .unwrap_or_default(),
            recording: self.recording,
        }
    }

    /// Apply an action; `Some` once the form is done
    pub fn apply(&mut self, action: FormAction) -> Option<FormExit> {
        let count = self.fields.len();
        match action {
            FormAction::Submit => return Some(FormExit::Submit),
            FormAction::Cancel => return Some(FormExit::Cancel),
            FormAction::Quit => return Some(FormExit::Quit),
            FormAction::ToggleRecording => self.recording = !self.recording,
            FormAction::NextField if count > 0 => self.focus = (self.focus + 1) % count,
            FormAction::PrevField if count > 0 => self.focus = (self.focus + count - 1) % count,
            _ => {
                let in_body = self.in_body();
                let Some(field) = self.fields.get_mut(self.focus) else {
                    return None;
                };
                match action {
                    FormAction::CursorLeft => field.cursor = field.cursor.saturating_sub(1),
                    FormAction::CursorRight => field.cursor = (field.cursor + 1).min(field.len()),
                    FormAction::CursorUp => field.move_line(false),
                    FormAction::CursorDown => field.move_line(true),
                    FormAction::Home => field.cursor = 0,
                    FormAction::End => field.cursor = field.len(),
                    FormAction::Char(c) => field.insert(c),
                    FormAction::Backspace => field.backspace(),
                    FormAction::Delete => field.delete(),
                    FormAction::Newline if in_body => field.insert('\n'),
                    _ => {}
                }
            }
        }
        None
    }

    pub fn draw(&self, f: &mut Frame) {
        let area = f.area();
        let mut constraints = vec![Constraint::Length(1)];
        for field in &self.fields {
            constraints.push(match field.kind {
                FieldKind::Body => Constraint::Min(5),
                _ => Constraint::Length(3),
            });
        }
        if !self.fields.iter().any(|f| f.kind == FieldKind::Body) {
            constraints.push(Constraint::Min(0));
        }
        constraints.push(Constraint::Length(1));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let recording = if self.recording {
            Span::styled(" Recording ON ", Style::default().fg(Color::Black).bg(Color::Red).bold())
        } else {
            Span::styled(" Recording OFF ", Style::default().fg(Color::DarkGray))
        };
        f.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(format!(" {} ", self.title), Style::default().fg(Color::Cyan).bold()),
                recording,
            ])),
            chunks[0],
        );

        if self.fields.is_empty() {
            f.render_widget(
                Paragraph::new("No parameters. Press Enter to send.").style(Style::default().fg(Color::DarkGray)),
                chunks[1],
            );
        }

        for (i, field) in self.fields.iter().enumerate() {
            let focused = i == self.focus;
            let area = chunks[i + 1];
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(if focused {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                })
                .title(format!(" {} ", field.label));
            f.render_widget(
                Paragraph::new(field.value.as_str()).block(block),
                area,
            );

            if focused {
                let (line, col) = field.line_col();
                let max_x = area.x + area.width.saturating_sub(2);
                let max_y = area.y + area.height.saturating_sub(2);
                let cursor_x = (area.x + col as u16 + 1).min(max_x);
                let cursor_y = (area.y + line as u16 + 1).min(max_y);
                f.set_cursor_position(Position::new(cursor_x, cursor_y));
            }
        }

        let hint = if self.in_body() {
            " Tab:next field | Enter:newline | Ctrl+S:send | Ctrl+R:record | Esc:back "
        } else {
            " Tab:next field | Enter:send | Ctrl+R:record | Esc:back | Ctrl+C:quit "
        };
        if let Some(status) = chunks.last() {
            f.render_widget(
                Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
                *status,
            );
        }
    }
}
