use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::app::point_in_rect;
use crate::player::adapter::{EngineState, PlayerEngine};
use crate::ui::loading::LoadingAnimation;
use crate::ui::notifications::NotificationManager;
use crate::widget::PlayerWidget;
use crate::widget::controls::{Intent, volume_at};
use crate::widget::error::ControlError;

/// Hit areas from the most recent frame.
#[derive(Default, Clone)]
pub struct LayoutRegions {
    pub embed: Option<Rect>,
    pub buttons: Vec<(Rect, Intent)>,
    pub track: Option<Rect>,
    pub volume: Option<Rect>,
}

pub struct App<E: PlayerEngine> {
    pub widget: PlayerWidget<E>,
    /// Engine handle waiting for the engine's ready signal.
    pending_engine: Option<E>,
    pub last_engine_state: Option<EngineState>,

    pub notifications: NotificationManager,
    pub loading: LoadingAnimation,
    pub error_message: Option<String>,

    pub should_quit: bool,
    pub layout_regions: LayoutRegions,
}

impl<E: PlayerEngine> App<E> {
    pub fn new(widget: PlayerWidget<E>, engine: E) -> Self {
        Self {
            widget,
            pending_engine: Some(engine),
            last_engine_state: None,

            notifications: NotificationManager::new(),
            loading: LoadingAnimation::new(),
            error_message: None,

            should_quit: false,
            layout_regions: LayoutRegions::default(),
        }
    }

    pub fn on_engine_ready(&mut self, now: Instant) {
        match self.pending_engine.take() {
            Some(engine) => {
                self.widget.on_ready(engine, now);
                self.notifications
                    .info(format!("Ready: {}", self.widget.video_id()));
            }
            None => tracing::debug!("duplicate ready signal ignored"),
        }
    }

    pub fn on_engine_state(&mut self, code: i32, now: Instant) {
        if let Some(state) = self.widget.on_state_changed(code, now) {
            self.last_engine_state = Some(state);
        }
    }

    pub fn on_player_error(&mut self, error: String) {
        self.notifications.error(format!("Player: {}", error));
        self.error_message = Some(error);
    }

    /// Services timers between events.
    pub fn tick(&mut self, now: Instant) {
        self.widget.tick(now);
        self.notifications.tick();
    }

    pub fn dispatch(&mut self, intent: Intent, now: Instant) {
        let result = self.widget.dispatch(intent, now);
        log_degraded(result, "control ignored");
    }

    pub fn handle_input(&mut self, key: KeyEvent, now: Instant) {
        let volume = self.widget.state().volume_percent;
        let intent = match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char(' ') => Intent::TogglePlay,
            KeyCode::Char('s') => Intent::Stop,
            KeyCode::Char('h') | KeyCode::Left => Intent::SkipBackward,
            KeyCode::Char('l') | KeyCode::Right => Intent::SkipForward,
            KeyCode::Char('+') | KeyCode::Char('=') => Intent::volume_up(volume),
            KeyCode::Char('-') => Intent::volume_down(volume),
            _ => return,
        };
        self.dispatch(intent, now);
    }

    pub fn handle_mouse(&mut self, event: MouseEvent, now: Instant) {
        let (x, y) = (event.column, event.row);

        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(track) = self.track_at(x, y) {
                    let result = self.widget.pointer_down(
                        x.saturating_sub(track.x) as f64,
                        track.width as f64,
                        now,
                    );
                    log_degraded(result, "scrub ignored");
                    return;
                }

                let button = self
                    .layout_regions
                    .buttons
                    .iter()
                    .find(|(rect, _)| point_in_rect(x, y, rect))
                    .map(|(_, intent)| *intent);
                if let Some(intent) = button {
                    self.dispatch(intent, now);
                    return;
                }

                // A click on the picture toggles playback.
                if let Some(embed) = self.layout_regions.embed {
                    if point_in_rect(x, y, &embed) {
                        self.dispatch(Intent::TogglePlay, now);
                        return;
                    }
                }

                if let Some(slider) = self.layout_regions.volume {
                    if point_in_rect(x, y, &slider) {
                        let percent = volume_at(x.saturating_sub(slider.x) as f64, slider.width as f64);
                        self.dispatch(Intent::SetVolume(percent), now);
                    }
                }
            }

            MouseEventKind::Drag(MouseButton::Left) => {
                if !self.widget.state().is_scrubbing {
                    return;
                }
                match self.track_at(x, y) {
                    Some(track) => {
                        self.widget.pointer_move(
                            x as f64 - track.x as f64,
                            track.width as f64,
                            now,
                        );
                    }
                    None => self.widget.pointer_leave(),
                }
            }

            MouseEventKind::Moved => {
                if self.widget.state().is_scrubbing && self.track_at(x, y).is_none() {
                    self.widget.pointer_leave();
                }
            }

            MouseEventKind::Up(MouseButton::Left) => self.widget.pointer_up(),

            MouseEventKind::ScrollUp => {
                let volume = self.widget.state().volume_percent;
                self.dispatch(Intent::volume_up(volume), now);
            }

            MouseEventKind::ScrollDown => {
                let volume = self.widget.state().volume_percent;
                self.dispatch(Intent::volume_down(volume), now);
            }

            _ => {}
        }
    }

    /// The track as last rendered, if the point is on it.
    fn track_at(&self, x: u16, y: u16) -> Option<Rect> {
        self.layout_regions
            .track
            .filter(|track| point_in_rect(x, y, track))
    }
}

fn log_degraded<T>(result: Result<T, ControlError>, what: &str) {
    if let Err(err) = result {
        tracing::debug!(%err, "{}", what);
    }
}
