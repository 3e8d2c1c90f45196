//! Filterable list picker used for specs, endpoints and presets

use ratatui::{prelude::*, widgets::*};

use super::keys::PickerAction;

/// One row of a picker
#[derive(Clone, Debug, PartialEq)]
pub struct PickerItem {
    /// Optional coloured prefix, e.g. the HTTP method
    pub tag: Option<(String, Color)>,
    pub title: String,
    pub description: String,
}

impl PickerItem {
    pub fn new(title: impl Into<String>) -> Self {
        PickerItem {
            tag: None,
            title: title.into(),
            description: String::new(),
        }
    }

    pub fn tagged(mut self, tag: impl Into<String>, color: Color) -> Self {
        self.tag = Some((tag.into(), color));
        self
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    fn filter_text(&self) -> String {
        let tag = self.tag.as_ref().map(|(t, _)| t.as_str()).unwrap_or_default();
        format!("{} {} {}", tag, self.title, self.description).to_lowercase()
    }
}

/// How the operator left the picker
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickerOutcome {
    /// Index into the unfiltered item list
    Selected(usize),
    Canceled,
    Back,
    Quit,
}

#[derive(Debug)]
pub struct ListPicker {
    title: String,
    items: Vec<PickerItem>,
    filter: String,
    filtering: bool,
    /// Position within the visible (filtered) rows
    cursor: usize,
}

impl ListPicker {
    pub fn new(title: impl Into<String>, items: Vec<PickerItem>) -> Self {
        ListPicker {
            title: title.into(),
            items,
            filter: String::new(),
            filtering: false,
            cursor: 0,
        }
    }

    pub fn filtering(&self) -> bool {
        self.filtering
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Indices of the items matching the filter, in list order
    pub fn visible(&self) -> Vec<usize> {
        let needle = self.filter.to_lowercase();
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| needle.is_empty() || item.filter_text().contains(&needle))
            .map(|(i, _)| i)
            .collect()
    }

    /// Unfiltered index of the highlighted row
    pub fn current(&self) -> Option<usize> {
        self.visible().get(self.cursor).copied()
    }

    fn clamp_cursor(&mut self) {
        let count = self.visible().len();
        self.cursor = self.cursor.min(count.saturating_sub(1));
    }

    /// Apply an action; `Some` once the picker is done
    pub fn apply(&mut self, action: PickerAction) -> Option<PickerOutcome> {
        match action {
            PickerAction::Up => self.cursor = self.cursor.saturating_sub(1),
            PickerAction::Down => {
                self.cursor += 1;
                self.clamp_cursor();
            }
            PickerAction::Select => {
                if let Some(index) = self.current() {
                    return Some(PickerOutcome::Selected(index));
                }
                self.filtering = false;
            }
            PickerAction::StartFilter => self.filtering = true,
            PickerAction::FilterChar(c) => {
                self.filter.push(c);
                self.cursor = 0;
            }
            PickerAction::FilterBackspace => {
                self.filter.pop();
                self.clamp_cursor();
            }
            PickerAction::ClearFilter => {
                self.filter.clear();
                self.filtering = false;
                self.cursor = 0;
            }
            PickerAction::Cancel => return Some(PickerOutcome::Canceled),
            PickerAction::Back => return Some(PickerOutcome::Back),
            PickerAction::Quit => return Some(PickerOutcome::Quit),
        }
        None
    }

    /// Draw the list, with an optional detail pane on the right
    pub fn draw(&self, f: &mut Frame, detail: Option<Vec<Line<'static>>>, hint: &str) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(f.area());

        let (list_area, detail_area) = match detail {
            Some(_) => {
                let cols = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
                    .split(rows[0]);
                (cols[0], Some(cols[1]))
            }
            None => (rows[0], None),
        };

        let visible = self.visible();
        let items: Vec<ListItem> = visible
            .iter()
            .map(|&i| {
                let item = &self.items[i];
                let mut spans = Vec::new();
                if let Some((tag, color)) = &item.tag {
                    spans.push(Span::styled(format!("{:7}", tag), Style::default().fg(*color).bold()));
                }
                spans.push(Span::raw(item.title.clone()));

                let mut lines = vec![Line::from(spans)];
                if !item.description.is_empty() {
                    lines.push(Line::styled(
                        format!("  {}", item.description),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
                ListItem::new(lines)
            })
            .collect();

        let title = if self.filtering || !self.filter.is_empty() {
            format!(" {} (filter: {}) ", self.title, self.filter)
        } else {
            format!(" {} ({}) ", self.title, visible.len())
        };

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan))
                    .title(title),
            )
            .highlight_style(Style::default().fg(Color::Yellow).bold())
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select((!visible.is_empty()).then_some(self.cursor));
        f.render_stateful_widget(list, list_area, &mut state);

        if let (Some(area), Some(lines)) = (detail_area, detail) {
            let pane = Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL).title(" Details "))
                .wrap(Wrap { trim: false });
            f.render_widget(pane, area);
        }

        let status = if self.filtering {
            " type to filter | Esc:clear | Enter:select "
        } else {
            hint
        };
        f.render_widget(
            Paragraph::new(status).style(Style::default().fg(Color::DarkGray)),
            rows[1],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picker() -> ListPicker {
        ListPicker::new(
            "Endpoints",
            vec![
                PickerItem::new("/users").tagged("GET", Color::Green),
                PickerItem::new("/users").tagged("POST", Color::Yellow).described("Create user"),
                PickerItem::new("/health").tagged("GET", Color::Green),
            ],
        )
    }

    #[test]
    fn test_move_and_select() {
        let mut p = picker();
        assert_eq!(p.apply(PickerAction::Up), None);
        assert_eq!(p.current(), Some(0));
        p.apply(PickerAction::Down);
        p.apply(PickerAction::Down);
        p.apply(PickerAction::Down);
        assert_eq!(p.current(), Some(2));
        assert_eq!(p.apply(PickerAction::Select), Some(PickerOutcome::Selected(2)));
    }

    #[test]
    fn test_filter_maps_back_to_original_index() {
        let mut p = picker();
        p.apply(PickerAction::StartFilter);
        assert!(p.filtering());
        for c in "CREATE".chars() {
            p.apply(PickerAction::FilterChar(c));
        }
        assert_eq!(p.visible(), vec![1]);
        assert_eq!(p.apply(PickerAction::Select), Some(PickerOutcome::Selected(1)));
    }

    #[test]
    fn test_filter_by_tag_and_clear() {
        let mut p = picker();
        p.apply(PickerAction::StartFilter);
        for c in "get".chars() {
            p.apply(PickerAction::FilterChar(c));
        }
        assert_eq!(p.visible(), vec![0, 2]);

        p.apply(PickerAction::ClearFilter);
        assert!(!p.filtering());
        assert_eq!(p.filter(), "");
        assert_eq!(p.visible().len(), 3);
    }

    #[test]
    fn test_no_match_select_does_nothing() {
        let mut p = picker();
        p.apply(PickerAction::StartFilter);
        p.apply(PickerAction::FilterChar('z'));
        assert_eq!(p.current(), None);
        assert_eq!(p.apply(PickerAction::Select), None);
        assert!(!p.filtering());
    }

    #[test]
    fn test_exits() {
        let mut p = picker();
        assert_eq!(p.apply(PickerAction::Cancel), Some(PickerOutcome::Canceled));
        assert_eq!(p.apply(PickerAction::Back), Some(PickerOutcome::Back));
        assert_eq!(p.apply(PickerAction::Quit), Some(PickerOutcome::Quit));
    }
}
