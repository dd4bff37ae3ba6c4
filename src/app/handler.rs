//! Input handling: maps key/mouse events to scroll gestures and state
//! mutations.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::config::Action;

use super::state::AppState;

/// Process a key event.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Ctrl+c always quits.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };

    match action {
        Action::PrevItem => state.scroll.prev(),
        Action::NextItem => state.scroll.next(),
        Action::FirstItem => state.scroll.first(),
        Action::LastItem => state.scroll.last(),
        Action::Reload => {
            state.needs_reload = true;
            state.status_message = Some("Reloading…".to_string());
        }
        Action::Quit => state.should_quit = true,
    }
}

/// Process a mouse event.  Dragging anywhere scrolls the strip: moving the
/// pointer left advances, like pushing the posters with a finger.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent, now: Instant) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            state.drag_column = Some(mouse.column);
            state.scroll.begin_drag(now);
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            let Some(prev) = state.drag_column else {
                return;
            };
            let columns = prev as f64 - mouse.column as f64;
            state.drag_column = Some(mouse.column);
            state.scroll.drag_by(columns * state.px_per_column(), now);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if state.drag_column.take().is_some() || state.scroll.is_dragging() {
                state.scroll.end_drag();
            }
        }
        MouseEventKind::ScrollDown | MouseEventKind::ScrollRight => state.scroll.nudge(1.0),
        MouseEventKind::ScrollUp | MouseEventKind::ScrollLeft => state.scroll.nudge(-1.0),
        _ => {}
    }
}
