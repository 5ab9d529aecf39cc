//! Terminal UI components
//!
//! Built with ratatui. Layout, top to bottom: logo and filter box, torrent
//! table, status line, buttons with key hints. Notices float on top.

pub mod table;
pub mod theme;

pub use theme::Theme;

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, Focus, Notice};
use crate::selection::SelectionStatus;

const CONFIRM_LABEL: &str = " Confirm ";
const CANCEL_LABEL: &str = " Cancel ";

/// Render the whole picker and record clickable regions in `app.layout`
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(Theme::text()), area);

    let [header, body, status, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header, app);
    table::render_table(frame, body, app);
    render_status_bar(frame, status, app.engine.status());
    render_footer(frame, footer, app);

    if let Some(notice) = &app.notice {
        render_notice(frame, area, notice);
    }
}

/// Status line text
///
/// `Showing 2/10 torrents | 1 selected` while a filter is active,
/// `10 torrents | 1 selected` otherwise.
pub fn status_text(status: SelectionStatus) -> String {
    if status.is_filtered() {
        format!(
            "Showing {}/{} torrents | {} selected",
            status.visible, status.total, status.selected
        )
    } else {
        format!("{} torrents | {} selected", status.total, status.selected)
    }
}

/// Logo and filter box
fn render_header(frame: &mut Frame, area: Rect, app: &mut App) {
    let [logo_area, filter_area] =
        Layout::horizontal([Constraint::Length(14), Constraint::Min(1)]).areas(area);
    app.layout.filter = filter_area;

    let logo = Paragraph::new(Line::from(vec![
        Span::styled("xseed", Theme::title()),
        Span::styled("tui", Theme::dimmed()),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border()),
    );
    frame.render_widget(logo, logo_area);

    let focused = app.focus == Focus::Filter;
    let query = &app.filter.query;

    let line = if focused {
        let split = query
            .char_indices()
            .nth(app.filter.cursor)
            .map(|(i, _)| i)
            .unwrap_or(query.len());
        let (before, after) = query.split_at(split);
        let mut rest = after.chars();
        let at_cursor = rest.next().map(String::from).unwrap_or_else(|| " ".into());
        Line::from(vec![
            Span::styled("⌕ ", Theme::keybind()),
            Span::styled(before.to_string(), Theme::input()),
            Span::styled(at_cursor, Theme::input_cursor()),
            Span::styled(rest.as_str().to_string(), Theme::input()),
        ])
    } else if query.is_empty() {
        Line::from(vec![
            Span::styled("⌕ ", Theme::dimmed()),
            Span::styled("Press / to filter by name...", Theme::input_placeholder()),
        ])
    } else {
        Line::from(vec![
            Span::styled("⌕ ", Theme::dimmed()),
            Span::styled(query.clone(), Theme::input()),
        ])
    };

    let border = if focused {
        Theme::border_focused()
    } else {
        Theme::border()
    };
    let filter_box = Paragraph::new(line).style(Theme::input()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border)
            .title(Span::styled(" Filter ", Theme::title())),
    );
    frame.render_widget(filter_box, filter_area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, status: SelectionStatus) {
    let line = Line::from(Span::raw(format!(" {}", status_text(status))));
    frame.render_widget(Paragraph::new(line).style(Theme::status_bar()), area);
}

/// Confirm/Cancel buttons followed by key hints
fn render_footer(frame: &mut Frame, area: Rect, app: &mut App) {
    let confirm_width = CONFIRM_LABEL.chars().count() as u16;
    let cancel_width = CANCEL_LABEL.chars().count() as u16;
    let [confirm, cancel, hints] = Layout::horizontal([
        Constraint::Length(confirm_width),
        Constraint::Length(cancel_width),
        Constraint::Min(0),
    ])
    .spacing(1)
    .areas(area);

    app.layout.confirm = confirm;
    app.layout.cancel = cancel;

    frame.render_widget(
        Paragraph::new(CONFIRM_LABEL).style(Theme::button_primary()),
        confirm,
    );
    frame.render_widget(Paragraph::new(CANCEL_LABEL).style(Theme::button()), cancel);

    let keys: &[(&str, &str)] = match app.focus {
        Focus::Table => &[
            ("space", "toggle"),
            ("a", "all"),
            ("n", "none"),
            ("1-4", "sort"),
            ("/", "filter"),
            ("enter", "confirm"),
            ("q", "cancel"),
        ],
        Focus::Filter => &[("enter", "done"), ("esc", "clear")],
    };
    let mut spans = Vec::with_capacity(keys.len() * 2);
    for (key, desc) in keys {
        spans.push(Span::styled(format!(" {}", key), Theme::keybind()));
        spans.push(Span::styled(format!(":{}", desc), Theme::keybind_desc()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), hints);
}

/// Centered overlay for warnings and errors
fn render_notice(frame: &mut Frame, area: Rect, notice: &Notice) {
    let popup_width = 50.min(area.width.saturating_sub(4));
    let popup_height = 5.min(area.height);

    let popup_area = Rect {
        x: area.x + (area.width.saturating_sub(popup_width)) / 2,
        y: area.y + (area.height.saturating_sub(popup_height)) / 2,
        width: popup_width,
        height: popup_height,
    };

    frame.render_widget(Clear, popup_area);

    let (style, title) = match notice {
        Notice::Warning(_) => (Theme::warning(), " ! Warning "),
        Notice::Error(_) => (Theme::error(), " ✗ Error "),
    };

    let popup = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(notice.message(), style)),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(style)
            .title(Span::styled(title, style))
            .style(Theme::text()),
    );

    frame.render_widget(popup, popup_area);
}
