use std::path::PathBuf;
use std::time::Duration;

/// Numeric state codes reported by the engine thread.
pub mod codes {
    pub const UNSTARTED: i32 = -1;
    pub const ENDED: i32 = 0;
    pub const PLAYING: i32 = 1;
    pub const PAUSED: i32 = 2;
    pub const BUFFERING: i32 = 3;
    pub const CUED: i32 = 5;
}

#[derive(Debug, Clone)]
pub enum PlayerCommand {
    Load { path: PathBuf },
    Play,
    Pause,
    Stop,
    Seek { position: Duration, allow_seek_ahead: bool },
    Shutdown,
}
