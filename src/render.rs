//! Result rendering - the finished exchange as styled lines

use std::io::{self, Stdout, Write};

use anyhow::Result;
use crossterm::{
    queue,
    style::{Attribute, Color as TermColor, Print, ResetColor, SetAttribute, SetForegroundColor},
};
use ratatui::prelude::*;

use crate::request::{Exchange, TransportResponse};
use crate::session::Renderer;

/// Response headers worth showing, in display order
pub const SHOWN_HEADERS: &[&str] = &[
    "Content-Type",
    "Content-Length",
    "Content-Encoding",
    "Content-Language",
    "Cache-Control",
    "ETag",
    "Expires",
    "Last-Modified",
    "Location",
    "Date",
    "Server",
];

/// Status code color
pub fn status_color(code: u16) -> Color {
    match code {
        200..=299 => Color::Green,
        300..=399 => Color::Cyan,
        400..=499 => Color::Red,
        500..=599 => Color::Magenta,
        _ => Color::Yellow,
    }
}

/// Method color
pub fn method_color(method: &str) -> Color {
    match method.to_ascii_uppercase().as_str() {
        "GET" => Color::Green,
        "POST" => Color::Yellow,
        "PUT" => Color::Blue,
        "PATCH" => Color::Cyan,
        "DELETE" => Color::Red,
        _ => Color::White,
    }
}

/// Simple JSON syntax highlighting, line by line
pub fn highlight_json(text: &str) -> Vec<Line<'static>> {
    text.lines().map(highlight_json_line).collect()
}

fn highlight_json_line(line: &str) -> Line<'static> {
    let chars: Vec<char> = line.chars().collect();
    let mut spans = Vec::new();
    let mut plain = String::new();
    let mut i = 0;

    let flush = |plain: &mut String, spans: &mut Vec<Span<'static>>| {
        if !plain.is_empty() {
            spans.push(Span::raw(std::mem::take(plain)));
        }
    };

    while i < chars.len() {
        let c = chars[i];
        match c {
            '"' => {
                flush(&mut plain, &mut spans);
                let start = i;
                i += 1;
                while i < chars.len() && chars[i] != '"' {
                    if chars[i] == '\\' {
                        i += 1;
                    }
                    i += 1;
                }
                i = (i + 1).min(chars.len());
                let token: String = chars[start..i].iter().collect();

                let is_key = chars[i..].iter().find(|c| !c.is_whitespace()) == Some(&':');
                let color = if is_key { Color::Cyan } else { Color::Green };
                spans.push(Span::styled(token, Style::default().fg(color)));
                continue;
            }
            '{' | '}' | '[' | ']' => {
                flush(&mut plain, &mut spans);
                spans.push(Span::styled(c.to_string(), Style::default().fg(Color::Yellow)));
            }
            ':' => {
                flush(&mut plain, &mut spans);
                spans.push(Span::styled(":", Style::default().fg(Color::White)));
            }
            '-' | '0'..='9' => {
                flush(&mut plain, &mut spans);
                let start = i;
                while i < chars.len() && matches!(chars[i], '-' | '+' | '.' | 'e' | 'E' | '0'..='9') {
                    i += 1;
                }
                let token: String = chars[start..i].iter().collect();
                spans.push(Span::styled(token, Style::default().fg(Color::Yellow)));
                continue;
            }
            c if c.is_ascii_alphabetic() => {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_alphabetic() {
                    i += 1;
                }
                let token: String = chars[start..i].iter().collect();
                if matches!(token.as_str(), "true" | "false" | "null") {
                    flush(&mut plain, &mut spans);
                    spans.push(Span::styled(token, Style::default().fg(Color::Magenta)));
                } else {
                    plain.push_str(&token);
                }
                continue;
            }
            _ => plain.push(c),
        }
        i += 1;
    }
    flush(&mut plain, &mut spans);

    Line::from(spans)
}

/// Pretty-printed JSON if `raw` parses as JSON
fn pretty_json(raw: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(raw).ok()?;
    serde_json::to_string_pretty(&value).ok()
}

fn body_lines(raw: &[u8]) -> Vec<Line<'static>> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return vec![Line::from(Span::styled("(empty)", Style::default().fg(Color::DarkGray)))];
    }
    match pretty_json(raw) {
        Some(pretty) => highlight_json(&pretty),
        None => String::from_utf8_lossy(raw)
            .lines()
            .map(|l| Line::raw(l.to_string()))
            .collect(),
    }
}

fn heading(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("── {} ──", title),
        Style::default().fg(Color::Cyan).bold(),
    ))
}

fn field(label: &str, value: Span<'static>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<8}", label), Style::default().fg(Color::DarkGray)),
        value,
    ])
}

fn shown_headers(response: &TransportResponse) -> Vec<Line<'static>> {
    SHOWN_HEADERS
        .iter()
        .flat_map(|name| {
            response.header_values(name).into_iter().map(move |value| {
                Line::from(vec![
                    Span::styled(format!("  {}: ", name), Style::default().fg(Color::Cyan)),
                    Span::raw(value.to_string()),
                ])
            })
        })
        .collect()
}

/// Request and response sections for a finished exchange
pub fn exchange_lines(exchange: &Exchange) -> Vec<Line<'static>> {
    let request = &exchange.request;
    let response = &exchange.response;
    let mut lines = vec![heading("Request")];

    lines.push(Line::from(vec![
        Span::styled(
            request.method.clone(),
            Style::default().fg(method_color(&request.method)).bold(),
        ),
        Span::raw(" "),
        Span::raw(request.url.clone()),
    ]));
    if !request.body.trim().is_empty() {
        lines.push(Line::raw(""));
        lines.extend(body_lines(request.body.as_bytes()));
    }

    lines.push(Line::raw(""));
    lines.push(heading("Response"));

    let status = if response.status_text.is_empty() {
        response.status_code.to_string()
    } else {
        format!("{} {}", response.status_code, response.status_text)
    };
    lines.push(field(
        "Status",
        Span::styled(status, Style::default().fg(status_color(response.status_code)).bold()),
    ));
    lines.push(field("Time", Span::raw(format!("{}ms", response.elapsed.as_millis()))));
    if let Some(content_type) = response.content_type() {
        lines.push(field("Type", Span::raw(content_type.to_string())));
    }

    let headers = shown_headers(response);
    if !headers.is_empty() {
        lines.push(Line::styled("Headers", Style::default().fg(Color::DarkGray)));
        lines.extend(headers);
    }

    lines.push(Line::raw(""));
    lines.extend(body_lines(&response.raw_body));
    lines
}

fn term_color(color: Color) -> TermColor {
    match color {
        Color::Reset => TermColor::Reset,
        Color::Black => TermColor::Black,
        Color::Red => TermColor::DarkRed,
        Color::Green => TermColor::DarkGreen,
        Color::Yellow => TermColor::DarkYellow,
        Color::Blue => TermColor::DarkBlue,
        Color::Magenta => TermColor::DarkMagenta,
        Color::Cyan => TermColor::DarkCyan,
        Color::Gray => TermColor::Grey,
        Color::DarkGray => TermColor::DarkGrey,
        Color::LightRed => TermColor::Red,
        Color::LightGreen => TermColor::Green,
        Color::LightYellow => TermColor::Yellow,
        Color::LightBlue => TermColor::Blue,
        Color::LightMagenta => TermColor::Magenta,
        Color::LightCyan => TermColor::Cyan,
        Color::White => TermColor::White,
        Color::Rgb(r, g, b) => TermColor::Rgb { r, g, b },
        Color::Indexed(i) => TermColor::AnsiValue(i),
    }
}

/// Writes the exchange as ANSI-styled text once the terminal is back to normal
pub struct StdoutRenderer<W: Write = Stdout> {
    out: W,
}

impl StdoutRenderer {
    pub fn new() -> Self {
        StdoutRenderer { out: io::stdout() }
    }
}

impl Default for StdoutRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> StdoutRenderer<W> {
    pub fn with_writer(out: W) -> Self {
        StdoutRenderer { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &Line<'_>) -> io::Result<()> {
        for span in &line.spans {
            let bold = span.style.add_modifier.contains(Modifier::BOLD);
            if let Some(fg) = span.style.fg {
                queue!(self.out, SetForegroundColor(term_color(fg)))?;
            }
            if bold {
                queue!(self.out, SetAttribute(Attribute::Bold))?;
            }
            queue!(self.out, Print(span.content.as_ref()))?;
            if bold {
                queue!(self.out, SetAttribute(Attribute::Reset))?;
            }
            if span.style.fg.is_some() {
                queue!(self.out, ResetColor)?;
            }
        }
        queue!(self.out, Print("\n"))
    }
}

impl<W: Write> Renderer for StdoutRenderer<W> {
    fn render(&mut self, exchange: &Exchange) -> Result<()> {
        for line in exchange_lines(exchange) {
            self.write_line(&line)?;
        }
        self.out.flush()?;
        Ok(())
    }
}
