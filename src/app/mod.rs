pub mod cli;
pub mod state;

use ratatui::layout::Rect;

pub fn point_in_rect(x: u16, y: u16, rect: &Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}
