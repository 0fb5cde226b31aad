pub mod generation_header;
pub mod predicted_panel;
pub mod team_panel;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use generation_header::{GenerationHeader, GenerationHeaderProps};
pub use predicted_panel::{PredictedPanel, PredictedPanelProps};
pub use team_panel::{TeamPanel, TeamPanelProps};

use ratatui::style::{Color, Modifier, Style};

pub const BG_BASE: Color = Color::Rgb(14, 16, 22);
pub const BG_PANEL: Color = Color::Rgb(24, 28, 38);
pub const BG_CURSOR: Color = Color::Rgb(46, 66, 94);
pub const TEXT_MAIN: Color = Color::Rgb(226, 230, 235);
pub const TEXT_DIM: Color = Color::Rgb(140, 152, 165);
pub const ACCENT: Color = Color::Rgb(250, 204, 80);
pub const ACCENT_ALT: Color = Color::Rgb(108, 196, 160);

pub fn focus_border(is_focused: bool) -> Style {
    if is_focused {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT_DIM)
    }
}
