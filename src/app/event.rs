//! Terminal event abstraction.
//!
//! Wraps crossterm events into a simpler enum and runs a background task that
//! forwards them over a channel so the main loop stays non-blocking.  When
//! the terminal is quiet a `Tick` is sent every `frame_interval`, which is
//! what drives settle animations and throttled drag flushes.

use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind, MouseEvent};
use tokio::sync::mpsc;

/// High-level events consumed by the application.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    Tick,
}

/// Spawns a background task that polls the terminal for events and sends them
/// through the returned channel.
pub fn spawn_event_reader(frame_interval: Duration) -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            let has_event = event::poll(frame_interval).unwrap_or(false);
            let app_event = if has_event {
                match event::read() {
                    // Key repeat / release reports would double every press.
                    Ok(CtEvent::Key(k)) if k.kind == KeyEventKind::Press => AppEvent::Key(k),
                    Ok(CtEvent::Mouse(m)) => AppEvent::Mouse(m),
                    Ok(CtEvent::Resize(w, h)) => AppEvent::Resize(w, h),
                    _ => continue,
                }
            } else {
                AppEvent::Tick
            };
            if tx.send(app_event).is_err() {
                break; // receiver dropped
            }
        }
    });

    rx
}
