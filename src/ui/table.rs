//! Torrent table
//!
//! One row per visible torrent: selection mark, name, size, tracker host.
//! Column geometry is computed here once and shared with mouse hit-testing.

use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, HighlightSpacing, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, Focus};
use crate::models::{SortKey, TorrentRecord};
use crate::ui::Theme;

/// Gap between columns
const COLUMN_SPACING: u16 = 1;

/// Column widths, same order as [`SortKey::ALL`]
pub const COLUMN_WIDTHS: [Constraint; 4] = [
    Constraint::Length(3),
    Constraint::Fill(1),
    Constraint::Length(10),
    Constraint::Length(24),
];

/// Split a table row area into per-column cells
///
/// Mirrors how `Table` lays out its columns so header clicks land on the
/// column that was drawn there.
pub fn column_areas(area: Rect) -> Vec<Rect> {
    Layout::horizontal(COLUMN_WIDTHS)
        .flex(Flex::Legacy)
        .spacing(COLUMN_SPACING)
        .split(area)
        .to_vec()
}

/// Header label with the active sort arrow
pub fn header_label(key: SortKey, sort: Option<(SortKey, bool)>) -> String {
    match sort {
        Some((active, reverse)) if active == key => {
            format!("{} {}", key.label(), if reverse { "▼" } else { "▲" })
        }
        _ => key.label().to_string(),
    }
}

fn torrent_row(record: &TorrentRecord, selected: bool, index: usize) -> Row<'static> {
    let marker = if selected {
        Cell::from(Span::styled("[x]", Theme::marker()))
    } else {
        Cell::from(Span::styled("[ ]", Theme::dimmed()))
    };

    Row::new(vec![
        marker,
        Cell::from(record.name.clone()),
        Cell::from(record.format_size()),
        Cell::from(record.tracker_display()),
    ])
    .style(Theme::table_row(index))
}

/// Render the table and record its header, column and row regions in `app.layout`
pub fn render_table(frame: &mut Frame, area: Rect, app: &mut App) {
    let border_style = if app.focus == Focus::Table {
        Theme::border_focused()
    } else {
        Theme::border()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style)
        .title(Span::styled(" Torrents ", Theme::title()));

    let inner = block.inner(area);
    let header_area = Rect { height: inner.height.min(1), ..inner };
    let rows_area = Rect {
        y: inner.y + header_area.height,
        height: inner.height.saturating_sub(header_area.height),
        ..inner
    };

    let page = usize::from(rows_area.height);
    app.cursor.scroll_into_view(page);
    app.page_size = page.max(1);
    app.layout.header = header_area;
    app.layout.columns = column_areas(header_area);
    app.layout.rows = rows_area;

    let sort = app.engine.sort();
    let header = Row::new(
        SortKey::ALL
            .iter()
            .map(|key| Cell::from(header_label(*key, sort)))
            .collect::<Vec<_>>(),
    )
    .style(Theme::table_header());

    let rows: Vec<Row> = app
        .engine
        .visible()
        .enumerate()
        .map(|(i, record)| torrent_row(record, app.engine.is_selected(&record.hash), i))
        .collect();
    let is_empty = rows.is_empty();

    let table = Table::new(rows, COLUMN_WIDTHS)
        .header(header)
        .block(block)
        .flex(Flex::Legacy)
        .column_spacing(COLUMN_SPACING)
        .highlight_spacing(HighlightSpacing::Never)
        .row_highlight_style(Theme::table_cursor());

    let mut state = TableState::default().with_offset(app.cursor.offset);
    if !is_empty {
        state = state.with_selected(Some(app.cursor.selected));
    }
    frame.render_stateful_widget(table, area, &mut state);

    if is_empty && rows_area.height > 0 {
        let message = if app.engine.filter_text().is_empty() {
            "No torrents".to_string()
        } else {
            format!("No torrents match \"{}\"", app.engine.filter_text())
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(message, Theme::dimmed()))),
            rows_area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_label_arrow() {
        assert_eq!(header_label(SortKey::Name, None), "Name");
        assert_eq!(
            header_label(SortKey::Name, Some((SortKey::Name, false))),
            "Name ▲"
        );
        assert_eq!(
            header_label(SortKey::Name, Some((SortKey::Name, true))),
            "Name ▼"
        );
        assert_eq!(header_label(SortKey::Size, Some((SortKey::Name, true))), "Size");
    }

    #[test]
    fn test_column_areas_fill_width() {
        let columns = column_areas(Rect::new(1, 5, 80, 1));
        assert_eq!(columns.len(), 4);
        assert_eq!(columns[0], Rect::new(1, 5, 3, 1));
        assert_eq!(columns[2].width, 10);
        assert_eq!(columns[3].width, 24);
        // name takes what's left after fixed columns and three gaps
        assert_eq!(columns[1].width, 80 - 3 - 10 - 24 - 3);
        assert_eq!(columns[3].right(), 81);
    }
}
