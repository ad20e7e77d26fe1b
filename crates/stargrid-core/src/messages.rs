//! Input events: [`Msg`], [`Key`], [`MouseAction`].
//!
//! Mouse positions are screen coordinates `(x, y)`.

use std::time::Instant;

/// A keyboard key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Escape,
    Enter,
    Space,
    Backspace,
    Delete,
    /// A printable character.
    Char(char),
}

/// A mouse action.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MouseAction {
    /// Primary (left) button pressed or dragged.
    Main,
    /// Secondary (right) button pressed or dragged.
    Secondary,
    /// Button released.
    Release,
    /// Mouse moved with no button held.
    Move,
}

/// An input message delivered to the application.
#[derive(Clone, Debug)]
pub enum Msg {
    /// A key was pressed.
    KeyDown { key: Key, time: Instant },
    /// A mouse event.
    Mouse {
        action: MouseAction,
        x: i32,
        y: i32,
        time: Instant,
    },
    /// The terminal was resized.
    Screen {
        width: i32,
        height: i32,
        time: Instant,
    },
    /// Sent once when the application starts.
    Init,
    /// Request to quit (window close, Ctrl-C).
    Quit,
}

impl Msg {
    /// Convenience: create a `KeyDown` stamped now.
    pub fn key(key: Key) -> Self {
        Self::KeyDown {
            key,
            time: Instant::now(),
        }
    }

    /// Convenience: create a mouse event stamped now.
    pub fn mouse(action: MouseAction, x: i32, y: i32) -> Self {
        Self::Mouse {
            action,
            x,
            y,
            time: Instant::now(),
        }
    }
}
