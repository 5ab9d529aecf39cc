//! Muted dark theme for xseedtui
//!
//! Charcoal panels with a single teal accent.

use ratatui::style::{Color, Modifier, Style};

/// Color palette and style helpers
pub struct Theme;

impl Theme {
    // ═══════════════════════════════════════════════════════════════════════
    // CORE PALETTE
    // ═══════════════════════════════════════════════════════════════════════

    /// Background: #1a1a1a
    pub const BACKGROUND: Color = Color::Rgb(0x1a, 0x1a, 0x1a);

    /// Panels, inputs, header row: #2d2d2d
    pub const PANEL: Color = Color::Rgb(0x2d, 0x2d, 0x2d);

    /// Accent: #4eb5ab (teal)
    pub const ACCENT: Color = Color::Rgb(0x4e, 0xb5, 0xab);

    /// Text: #e0e0e0
    pub const TEXT: Color = Color::Rgb(0xe0, 0xe0, 0xe0);

    /// Dim: #808080
    pub const DIM: Color = Color::Rgb(0x80, 0x80, 0x80);

    /// Placeholder text: #606060
    pub const PLACEHOLDER: Color = Color::Rgb(0x60, 0x60, 0x60);

    /// Warning: #e5c07b (amber)
    pub const WARNING: Color = Color::Rgb(0xe5, 0xc0, 0x7b);

    /// Error: #e06c75 (soft red)
    pub const ERROR: Color = Color::Rgb(0xe0, 0x6c, 0x75);

    // ═══════════════════════════════════════════════════════════════════════
    // DERIVED COLORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Zebra stripe for odd rows: #222222
    pub const ROW_ALT: Color = Color::Rgb(0x22, 0x22, 0x22);

    /// Cursor row: #333333
    pub const ROW_CURSOR: Color = Color::Rgb(0x33, 0x33, 0x33);

    /// Secondary button: #404040
    pub const BUTTON: Color = Color::Rgb(0x40, 0x40, 0x40);

    // ═══════════════════════════════════════════════════════════════════════
    // STYLE HELPERS
    // ═══════════════════════════════════════════════════════════════════════

    /// Default text style
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND)
    }

    pub fn dimmed() -> Style {
        Style::default().fg(Self::DIM)
    }

    /// Logo and panel titles
    pub fn title() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::BUTTON)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    pub fn warning() -> Style {
        Style::default()
            .fg(Self::WARNING)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error() -> Style {
        Style::default()
            .fg(Self::ERROR)
            .add_modifier(Modifier::BOLD)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // COMPONENT STYLES
    // ═══════════════════════════════════════════════════════════════════════

    /// Column header row
    pub fn table_header() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .bg(Self::PANEL)
            .add_modifier(Modifier::BOLD)
    }

    /// Body row, striped by index
    pub fn table_row(index: usize) -> Style {
        let bg = if index % 2 == 1 {
            Self::ROW_ALT
        } else {
            Self::BACKGROUND
        };
        Style::default().fg(Self::TEXT).bg(bg)
    }

    /// Row under the cursor
    pub fn table_cursor() -> Style {
        Style::default()
            .bg(Self::ROW_CURSOR)
            .add_modifier(Modifier::BOLD)
    }

    /// Check mark of a selected torrent
    pub fn marker() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn input() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::PANEL)
    }

    pub fn input_placeholder() -> Style {
        Style::default().fg(Self::PLACEHOLDER).bg(Self::PANEL)
    }

    pub fn input_cursor() -> Style {
        Style::default().fg(Self::BACKGROUND).bg(Self::ACCENT)
    }

    /// Primary action button (Confirm)
    pub fn button_primary() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Secondary action button (Cancel)
    pub fn button() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BUTTON)
    }

    pub fn keybind() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    pub fn keybind_desc() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Self::DIM).bg(Self::PANEL)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// COLOR UTILITIES
// ═══════════════════════════════════════════════════════════════════════════

/// Relative luminance of an sRGB color
/// Formula: https://www.w3.org/TR/WCAG20/#relativeluminancedef
pub fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    fn channel(c: u8) -> f64 {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }

    0.2126 * channel(r) + 0.7152 * channel(g) + 0.0722 * channel(b)
}

/// Contrast ratio between two colors, 1 (same) to 21 (black/white)
pub fn contrast_ratio(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> f64 {
    let l1 = relative_luminance(fg.0, fg.1, fg.2);
    let l2 = relative_luminance(bg.0, bg.1, bg.2);
    let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Extract RGB tuple from ratatui Color (only works for Rgb variant)
pub fn color_to_rgb(color: Color) -> Option<(u8, u8, u8)> {
    match color {
        Color::Rgb(r, g, b) => Some((r, g, b)),
        _ => None,
    }
}
