use crossterm::event::{KeyEvent, MouseEvent};

#[derive(Debug, Clone)]
pub enum AppEvent {
    // From input thread
    Input(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),

    // From engine thread
    EngineReady,
    EngineState(i32),
    PlayerError(String),
}
