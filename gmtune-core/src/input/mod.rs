//! Input handling for gmtune-core.
//!
//! Responsibilities:
//! - Snapshot the 16 joypad buttons into a bitset once per frame.
//! - Turn consecutive snapshots into a rising-edge set.
//! - Map edge bits to playback commands.
//!
//! Buttons act on the not-held -> held transition only; holding a button
//! does not repeat its command.

use libretro_backend::{JoypadButton, RuntimeHandle};

/// Buttons in libretro device id order; bit N of a snapshot is `BUTTONS[N]`.
const BUTTONS: [JoypadButton; 16] = [
    JoypadButton::B,
    JoypadButton::Y,
    JoypadButton::Select,
    JoypadButton::Start,
    JoypadButton::Up,
    JoypadButton::Down,
    JoypadButton::Left,
    JoypadButton::Right,
    JoypadButton::A,
    JoypadButton::X,
    JoypadButton::L1,
    JoypadButton::R1,
    JoypadButton::L2,
    JoypadButton::R2,
    JoypadButton::L3,
    JoypadButton::R3,
];

const START_BIT: u16 = 1 << 3;
const L1_BIT: u16 = 1 << 10;
const R1_BIT: u16 = 1 << 11;

/// Poll all joypad buttons on port 0 into a held-state bitset.
pub fn poll_joypad(handle: &mut RuntimeHandle) -> u16 {
    let mut held = 0u16;
    for (bit, &button) in BUTTONS.iter().enumerate() {
        if handle.is_joypad_button_pressed(0, button) {
            held |= 1 << bit;
        }
    }
    held
}

/// Buttons newly pressed this frame.
#[inline]
pub fn edges(previous: u16, current: u16) -> u16 {
    current & !previous
}

/// Playback commands triggered by input edges.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Command {
    PrevTrack,
    NextTrack,
    TogglePause,
}

/// Commands for an edge set, in dispatch order. Simultaneous edges all
/// apply; previous-track always dispatches before next-track.
pub fn commands(edge_bits: u16) -> Vec<Command> {
    let mut out = Vec::new();
    if edge_bits & L1_BIT != 0 {
        out.push(Command::PrevTrack);
    }
    if edge_bits & R1_BIT != 0 {
        out.push(Command::NextTrack);
    }
    if edge_bits & START_BIT != 0 {
        out.push(Command::TogglePause);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_match_definition_over_a_sequence() {
        let snapshots = [0u16, 0b0001, 0b0011, 0b0010, 0b0000, 0b1111];
        for pair in snapshots.windows(2) {
            let (prev, cur) = (pair[0], pair[1]);
            assert_eq!(edges(prev, cur), cur & !prev);
        }
    }

    #[test]
    fn held_button_fires_only_on_first_frame() {
        let first = edges(0, L1_BIT);
        assert_eq!(first, L1_BIT);
        let second = edges(L1_BIT, L1_BIT);
        assert_eq!(second, 0);
        assert!(commands(second).is_empty());
    }

    #[test]
    fn release_produces_no_edge() {
        assert_eq!(edges(START_BIT, 0), 0);
    }

    #[test]
    fn simultaneous_edges_all_dispatch_in_order() {
        let cmds = commands(L1_BIT | R1_BIT | START_BIT);
        assert_eq!(
            cmds,
            vec![Command::PrevTrack, Command::NextTrack, Command::TogglePause]
        );
    }

    #[test]
    fn unmapped_buttons_produce_no_commands() {
        // Everything except L1/R1/Start.
        let others = !(L1_BIT | R1_BIT | START_BIT);
        assert!(commands(others).is_empty());
    }
}
