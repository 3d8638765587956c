use crate::events::types::AppEvent;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::execute;
use std::io::stdout;
use std::{sync::mpsc, thread::JoinHandle};

pub fn spawn(event_tx: mpsc::Sender<AppEvent>) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let _ = execute!(stdout(), EnableMouseCapture);

        loop {
            let forwarded = match event::read() {
                Ok(Event::Key(key_event)) if key_event.kind == KeyEventKind::Press => {
                    event_tx.send(AppEvent::Input(key_event))
                }
                Ok(Event::Mouse(mouse_event)) => event_tx.send(AppEvent::Mouse(mouse_event)),
                Ok(Event::Resize(width, height)) => event_tx.send(AppEvent::Resize(width, height)),
                Ok(_) => Ok(()),
                Err(err) => {
                    tracing::error!(%err, "terminal input failed");
                    break;
                }
            };
            if forwarded.is_err() {
                break;
            }
        }

        let _ = execute!(stdout(), DisableMouseCapture);
    })
}
