//! App state and input handling
//!
//! Turns key and mouse events into selection-engine calls. The engine owns
//! every piece of selection state; this module only adds what the screen
//! needs on top of it (focus, the row cursor, the filter text box, notices).

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

use crate::models::{SessionOutcome, SortKey};
use crate::selection::{SelectionEngine, SelectionError};

/// Warning shown when confirming with nothing selected
pub const EMPTY_SELECTION_WARNING: &str = "No torrents selected!";

// =============================================================================
// Focus
// =============================================================================

/// Which widget receives keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// Row navigation and hotkeys
    #[default]
    Table,
    /// Text goes into the filter box
    Filter,
}

// =============================================================================
// Table Cursor
// =============================================================================

/// Highlighted row and scroll offset over the visible rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableCursor {
    /// Highlighted row index
    pub selected: usize,
    /// First row shown in the viewport
    pub offset: usize,
    /// Number of visible rows
    pub len: usize,
}

impl TableCursor {
    pub fn new(len: usize) -> Self {
        Self {
            selected: 0,
            offset: 0,
            len,
        }
    }

    pub fn up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            if self.selected < self.offset {
                self.offset = self.selected;
            }
        }
    }

    pub fn down(&mut self) {
        if self.len > 0 && self.selected < self.len - 1 {
            self.selected += 1;
        }
    }

    pub fn page_up(&mut self, page_size: usize) {
        self.selected = self.selected.saturating_sub(page_size);
        if self.selected < self.offset {
            self.offset = self.selected;
        }
    }

    pub fn page_down(&mut self, page_size: usize) {
        if self.len > 0 {
            self.selected = (self.selected + page_size).min(self.len - 1);
        }
    }

    pub fn first(&mut self) {
        self.selected = 0;
        self.offset = 0;
    }

    pub fn last(&mut self) {
        if self.len > 0 {
            self.selected = self.len - 1;
        }
    }

    /// Jump to `row` if it exists
    pub fn select(&mut self, row: usize) {
        if row < self.len {
            self.selected = row;
        }
    }

    /// Update offset to keep the highlighted row on screen
    pub fn scroll_into_view(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + visible_height {
            self.offset = self.selected + 1 - visible_height;
        }
        // Don't leave blank rows at the bottom after the list shrank
        let max_offset = self.len.saturating_sub(visible_height);
        self.offset = self.offset.min(max_offset);
    }

    /// Update length after the visible set changed, clamping the cursor
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if len == 0 {
            self.selected = 0;
            self.offset = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

// =============================================================================
// Filter Input
// =============================================================================

/// Single-line text box; `cursor` counts chars, not bytes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterInput {
    pub query: String,
    pub cursor: usize,
}

impl FilterInput {
    fn byte_index(&self, char_idx: usize) -> usize {
        self.query
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.query.len())
    }

    fn char_len(&self) -> usize {
        self.query.chars().count()
    }

    /// Insert character at cursor
    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.query.insert(at, c);
        self.cursor += 1;
    }

    /// Delete character before cursor
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.query.remove(at);
        true
    }

    /// Delete character at cursor
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.char_len() {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.query.remove(at);
        true
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_len());
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.char_len();
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.cursor = 0;
    }
}

// =============================================================================
// Notices
// =============================================================================

/// Message overlay, dismissed by the next key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Warning(String),
    Error(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Warning(msg) | Notice::Error(msg) => msg,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

// =============================================================================
// Screen Layout
// =============================================================================

/// Where the last frame drew each clickable region
///
/// Written by the renderer, read by mouse handling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenLayout {
    pub filter: Rect,
    pub header: Rect,
    /// Header cell per column, same order as [`SortKey::ALL`]
    pub columns: Vec<Rect>,
    pub rows: Rect,
    pub confirm: Rect,
    pub cancel: Rect,
}

fn hit(rect: Rect, x: u16, y: u16) -> bool {
    rect.contains(Position::new(x, y))
}

// =============================================================================
// Main Application State
// =============================================================================

/// Picker state for one selection session
#[derive(Debug)]
pub struct App {
    pub engine: SelectionEngine,
    pub focus: Focus,
    pub filter: FilterInput,
    pub cursor: TableCursor,
    pub notice: Option<Notice>,
    pub layout: ScreenLayout,
    /// Rows per page for PageUp/PageDown, set by the renderer
    pub page_size: usize,
    outcome: Option<SessionOutcome>,
}

impl App {
    pub fn new(engine: SelectionEngine) -> Self {
        let cursor = TableCursor::new(engine.visible_len());
        Self {
            engine,
            focus: Focus::Table,
            filter: FilterInput::default(),
            cursor,
            notice: None,
            layout: ScreenLayout::default(),
            page_size: 10,
            outcome: None,
        }
    }

    /// Whether the session is still open
    pub fn running(&self) -> bool {
        self.outcome.is_none()
    }

    pub fn outcome(&self) -> Option<&SessionOutcome> {
        self.outcome.as_ref()
    }

    /// End the app, yielding how the session finished
    pub fn into_outcome(self) -> SessionOutcome {
        self.outcome.unwrap_or(SessionOutcome::Cancelled)
    }

    /// Hash under the row cursor
    pub fn current_hash(&self) -> Option<&str> {
        self.engine
            .visible_at(self.cursor.selected)
            .map(|r| r.hash.as_str())
    }

    // -------------------------------------------------------------------------
    // Actions
    // -------------------------------------------------------------------------

    /// Re-sync the cursor after the visible set changed, following `anchor`
    fn refresh_view(&mut self, anchor: Option<String>) {
        self.cursor.set_len(self.engine.visible_len());
        if let Some(pos) = anchor.and_then(|hash| self.engine.position_of(&hash)) {
            self.cursor.selected = pos;
        }
    }

    /// Push the filter box text into the engine
    pub fn apply_filter(&mut self) {
        let anchor = self.current_hash().map(str::to_string);
        self.engine.set_filter(&self.filter.query);
        self.refresh_view(anchor);
    }

    pub fn sort_by(&mut self, key: SortKey) {
        let anchor = self.current_hash().map(str::to_string);
        self.engine.set_sort(key);
        self.refresh_view(anchor);
    }

    /// Toggle a torrent by hash
    ///
    /// Rows never move on toggle; under the Sel sort the order catches up on
    /// the next sort or filter.
    pub fn toggle(&mut self, hash: &str) {
        if let Err(e) = self.engine.toggle(hash) {
            tracing::error!(%hash, error = %e, "Toggle on unknown torrent");
            self.notice = Some(Notice::Error(e.to_string()));
        }
    }

    /// Toggle the torrent shown at visible `row`
    pub fn toggle_row(&mut self, row: usize) {
        if let Some(hash) = self.engine.visible_at(row).map(|r| r.hash.clone()) {
            self.cursor.select(row);
            self.toggle(&hash);
        }
    }

    pub fn toggle_current(&mut self) {
        self.toggle_row(self.cursor.selected);
    }

    pub fn select_all(&mut self) {
        self.engine.select_all_visible();
    }

    pub fn select_none(&mut self) {
        self.engine.select_none();
    }

    /// Finish with the current selection, or warn and stay if it's empty
    pub fn confirm(&mut self) {
        match self.engine.confirm() {
            Ok(hashes) => {
                tracing::info!(count = hashes.len(), "Selection confirmed");
                self.outcome = Some(SessionOutcome::Confirmed(hashes));
            }
            Err(SelectionError::EmptySelection) => {
                self.notice = Some(Notice::Warning(EMPTY_SELECTION_WARNING.into()));
            }
            Err(e) => {
                tracing::error!(error = %e, "Confirm failed");
                self.notice = Some(Notice::Error(e.to_string()));
            }
        }
    }

    pub fn cancel(&mut self) {
        tracing::info!("Selection cancelled");
        self.outcome = Some(self.engine.cancel());
    }

    pub fn focus_filter(&mut self) {
        self.focus = Focus::Filter;
        self.filter.cursor_end();
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle keyboard event, returns true if event was consumed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        // Any key dismisses the overlay
        if self.notice.take().is_some() {
            return true;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.cancel();
            return true;
        }

        match self.focus {
            Focus::Filter => self.handle_filter_key(key),
            Focus::Table => self.handle_table_key(key),
        }
    }

    fn handle_filter_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => {
                self.filter.clear();
                self.apply_filter();
                self.focus = Focus::Table;
            }
            KeyCode::Enter | KeyCode::Down | KeyCode::Tab => {
                self.focus = Focus::Table;
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.filter.insert(c);
                self.apply_filter();
            }
            KeyCode::Backspace => {
                if self.filter.backspace() {
                    self.apply_filter();
                }
            }
            KeyCode::Delete => {
                if self.filter.delete() {
                    self.apply_filter();
                }
            }
            KeyCode::Left => self.filter.cursor_left(),
            KeyCode::Right => self.filter.cursor_right(),
            KeyCode::Home => self.filter.cursor_home(),
            KeyCode::End => self.filter.cursor_end(),
            _ => return false,
        }
        true
    }

    fn handle_table_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.cancel(),
            KeyCode::Char(' ') => self.toggle_current(),
            KeyCode::Enter | KeyCode::Char('c') => self.confirm(),
            KeyCode::Char('a') => self.select_all(),
            KeyCode::Char('n') => self.select_none(),
            KeyCode::Char('/') => self.focus_filter(),
            KeyCode::Char(c @ '1'..='4') => {
                if let Some(key) = SortKey::from_hotkey(c) {
                    self.sort_by(key);
                }
            }
            KeyCode::Up | KeyCode::Char('k') => self.cursor.up(),
            KeyCode::Down | KeyCode::Char('j') => self.cursor.down(),
            KeyCode::PageUp => self.cursor.page_up(self.page_size),
            KeyCode::PageDown => self.cursor.page_down(self.page_size),
            KeyCode::Home | KeyCode::Char('g') => self.cursor.first(),
            KeyCode::End | KeyCode::Char('G') => self.cursor.last(),
            _ => return false,
        }
        true
    }

    // -------------------------------------------------------------------------
    // Mouse Event Handling
    // -------------------------------------------------------------------------

    /// Handle mouse event, returns true if event was consumed
    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        let (x, y) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.notice.take().is_some() {
                    return true;
                }
                self.click(x, y)
            }
            MouseEventKind::ScrollUp if hit(self.layout.rows, x, y) => {
                self.cursor.up();
                true
            }
            MouseEventKind::ScrollDown if hit(self.layout.rows, x, y) => {
                self.cursor.down();
                true
            }
            _ => false,
        }
    }

    fn click(&mut self, x: u16, y: u16) -> bool {
        let layout = self.layout.clone();

        if hit(layout.filter, x, y) {
            self.focus_filter();
            return true;
        }
        if hit(layout.confirm, x, y) {
            self.confirm();
            return true;
        }
        if hit(layout.cancel, x, y) {
            self.cancel();
            return true;
        }
        if hit(layout.header, x, y) {
            let column = layout.columns.iter().position(|r| hit(*r, x, y));
            if let Some(key) = column.and_then(|i| SortKey::ALL.get(i).copied()) {
                self.sort_by(key);
            }
            return true;
        }
        if hit(layout.rows, x, y) {
            let row = self.cursor.offset + usize::from(y - layout.rows.y);
            self.focus = Focus::Table;
            self.toggle_row(row);
            return true;
        }
        false
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
