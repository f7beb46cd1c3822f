//! Keyboard mapping for two players sharing one terminal
//!
//! A terminal only reports key presses. [`KeyLatch`] turns them into held
//! controls by keeping each pressed control down for `hold_ms`; key repeat
//! refreshes the window while the key stays pressed.

use console::Key;

use crate::session::{InputState, PlayerId};

pub const DEFAULT_KEY_HOLD_MS: u64 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Left,
    Right,
    Down,
    Rotate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Press(PlayerId, Control),
    Quit,
}

/// Player 1 plays on W/A/S/D, player 2 on the arrows
pub fn map_key(key: &Key) -> Option<KeyCommand> {
    let command = match key {
        Key::Char(c) => match c.to_ascii_lowercase() {
            'a' => KeyCommand::Press(PlayerId::One, Control::Left),
            'd' => KeyCommand::Press(PlayerId::One, Control::Right),
            's' => KeyCommand::Press(PlayerId::One, Control::Down),
            'w' => KeyCommand::Press(PlayerId::One, Control::Rotate),
            'q' => KeyCommand::Quit,
            _ => return None,
        },
        Key::ArrowLeft => KeyCommand::Press(PlayerId::Two, Control::Left),
        Key::ArrowRight => KeyCommand::Press(PlayerId::Two, Control::Right),
        Key::ArrowDown => KeyCommand::Press(PlayerId::Two, Control::Down),
        Key::ArrowUp => KeyCommand::Press(PlayerId::Two, Control::Rotate),
        Key::Escape | Key::CtrlC => KeyCommand::Quit,
        _ => return None,
    };
    Some(command)
}

#[derive(Debug, Default, Clone, Copy)]
struct HeldControls {
    left_until: Option<u64>,
    right_until: Option<u64>,
    down_until: Option<u64>,
    rotate_until: Option<u64>,
}

impl HeldControls {
    fn poll(&self, now: u64) -> InputState {
        let held = |until: Option<u64>| until.is_some_and(|t| now < t);
        InputState {
            left: held(self.left_until),
            right: held(self.right_until),
            down: held(self.down_until),
            rotate: held(self.rotate_until),
        }
    }
}

/// Held state of both players' controls
#[derive(Debug, Clone)]
pub struct KeyLatch {
    hold_ms: u64,
    players: [HeldControls; 2],
}

impl KeyLatch {
    pub fn new(hold_ms: u64) -> Self {
        KeyLatch {
            hold_ms,
            players: [HeldControls::default(); 2],
        }
    }

    pub fn press(&mut self, player: PlayerId, control: Control, now: u64) {
        let until = Some(now + self.hold_ms);
        let held = &mut self.players[player.index()];
        match control {
            Control::Left => {
                held.left_until = until;
                held.right_until = None;
            }
            Control::Right => {
                held.right_until = until;
                held.left_until = None;
            }
            Control::Down => held.down_until = until,
            // Held like the others; the session rotates on the press edge only
            Control::Rotate => held.rotate_until = until,
        }
    }

    /// Controls as seen at `now`, one entry per player
    pub fn poll(&self, now: u64) -> [InputState; 2] {
        let [one, two] = &self.players;
        [one.poll(now), two.poll(now)]
    }
}

impl Default for KeyLatch {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_HOLD_MS)
    }
}
