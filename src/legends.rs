//! Keycap legends for preview renders.
//!
//! Tables are indexed by layout position before mirroring, so the left-hand
//! tables read as if the left half were a right half.

use serde::{Deserialize, Serialize};

use crate::assembly::Hand;
use crate::layout::Position;

/// What to print on the keycaps of the combined preview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Legends {
    None,
    /// Layout coordinates, as used by the generator.
    Coordinates,
    /// Wiring matrix coordinates.
    Matrix,
    /// The author's own key map.
    #[default]
    Lynx,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cluster {
    Finger,
    Thumb,
}

const COMMAND: &str = "⌘";
const DELETE: &str = "⌦";
const BACKSPACE: &str = "⌫";
const SHIFT: &str = "⇧";
const ENTER: &str = "⏎";
const TAB: &str = "⇥";
const ESC: &str = "␛";

// [column][row]; column 0 has no bottom-row key.
type FingerTable = [&'static [&'static str]; 6];
// (column, row, legend)
type ThumbTable = [(f64, f64, &'static str); 8];

const MATRIX_RIGHT_FINGER: FingerTable = [
    &["0,0", "0,1", "0,2", "0,3"],
    &["1,0", "1,1", "1,2", "1,3", "1,4"],
    &["2,0", "2,1", "2,2", "2,3", "2,4"],
    &["3,0", "3,1", "3,2", "3,3", "3,4"],
    &["4,0", "4,1", "4,2", "4,3", "4,4"],
    &["5,0", "5,1", "5,2", "5,3", "5,4"],
];

const MATRIX_LEFT_FINGER: FingerTable = [
    &["5,0", "5,1", "5,2", "5,3"],
    &["4,0", "4,1", "4,2", "4,3", "5,4"],
    &["3,0", "3,1", "3,2", "3,3", "4,4"],
    &["2,0", "2,1", "2,2", "2,3", "3,4"],
    &["1,0", "1,1", "1,2", "1,3", "2,4"],
    &["0,0", "0,1", "0,2", "0,3", "1,4"],
];

const MATRIX_RIGHT_THUMB: ThumbTable = [
    (2., -1., "0,5"),
    (2., 0., "1,5"),
    (2., 1., "2,5"),
    (1., -1., "3,5"),
    (1., 0., "4,5"),
    (1., 1., "5,5"),
    (0., -1., "0,6"),
    (0., 0.5, "1,6"),
];

const MATRIX_LEFT_THUMB: ThumbTable = [
    (2., 1., "0,5"),
    (2., 0., "1,5"),
    (2., -1., "2,5"),
    (1., 1., "3,5"),
    (1., 0., "4,5"),
    (1., -1., "5,5"),
    (0., 0.5, "0,6"),
    (0., -1., "1,6"),
];

const LYNX_RIGHT_FINGER: FingerTable = [
    &["6", "F", "D", "B"],
    &["7", "G", "H", "M", "←"],
    &["8", "C", "T", "W", "↓"],
    &["9", "R", "N", "V", "↑"],
    &["0", "L", "S", "Z", "→"],
    &["\\", "/", "-", SHIFT, COMMAND],
];

const LYNX_LEFT_FINGER: FingerTable = [
    &["5", "Y", "I", "X"],
    &["4", "P", "U", "K", "]"],
    &["3", ".", "E", "J", "["],
    &["2", ",", "O", "Q", "="],
    &["1", "'", "A", ";", "`"],
    &["Menu", TAB, ESC, SHIFT, "Ctrl"],
];

const LYNX_RIGHT_THUMB: ThumbTable = [
    (2., -1., COMMAND),
    (2., 0., "Alt"),
    (2., 1., "Ctrl"),
    (1., -1., "Fn"),
    (1., 0., ENTER),
    (1., 1., SHIFT),
    (0., -1., "NOP"),
    (0., 0.5, ""),
];

const LYNX_LEFT_THUMB: ThumbTable = [
    (2., 1., "Ctrl"),
    (2., 0., "Alt"),
    (2., -1., COMMAND),
    (1., 1., SHIFT),
    (1., 0., DELETE),
    (1., -1., "Fn"),
    (0., 0.5, BACKSPACE),
    (0., -1., "NOP"),
];

fn finger_lookup(table: &FingerTable, position: Position) -> Option<&'static str> {
    let whole = position.is_whole_column() && position.is_whole_row();
    if !whole || position.column < 0. || position.row < 0. {
        return None;
    }
    table
        .get(position.column as usize)?
        .get(position.row as usize)
        .copied()
}

fn thumb_lookup(table: &ThumbTable, position: Position) -> Option<&'static str> {
    table
        .iter()
        .find(|(column, row, _)| Position::new(*column, *row) == position)
        .map(|(_, _, legend)| *legend)
}

impl Legends {
    /// The legend for the key at `position`, or `None` for a blank cap.
    pub fn legend(self, hand: Hand, cluster: Cluster, position: Position) -> Option<String> {
        let legend = match (self, hand, cluster) {
            (Legends::None, ..) => return None,
            (Legends::Coordinates, ..) => {
                return Some(format!("{},{}", position.column, position.row))
            }
            (Legends::Matrix, Hand::Right, Cluster::Finger) => {
                finger_lookup(&MATRIX_RIGHT_FINGER, position)
            }
            (Legends::Matrix, Hand::Left, Cluster::Finger) => {
                finger_lookup(&MATRIX_LEFT_FINGER, position)
            }
            (Legends::Matrix, Hand::Right, Cluster::Thumb) => {
                thumb_lookup(&MATRIX_RIGHT_THUMB, position)
            }
            (Legends::Matrix, Hand::Left, Cluster::Thumb) => {
                thumb_lookup(&MATRIX_LEFT_THUMB, position)
            }
            (Legends::Lynx, Hand::Right, Cluster::Finger) => {
                finger_lookup(&LYNX_RIGHT_FINGER, position)
            }
            (Legends::Lynx, Hand::Left, Cluster::Finger) => {
                finger_lookup(&LYNX_LEFT_FINGER, position)
            }
            (Legends::Lynx, Hand::Right, Cluster::Thumb) => {
                thumb_lookup(&LYNX_RIGHT_THUMB, position)
            }
            (Legends::Lynx, Hand::Left, Cluster::Thumb) => {
                thumb_lookup(&LYNX_LEFT_THUMB, position)
            }
        };
        legend.filter(|l| !l.is_empty()).map(str::to_owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Layout;

    #[test]
    fn every_finger_key_has_a_legend() {
        let layout = Layout::finger_well(6, 5, false);
        for hand in [Hand::Right, Hand::Left] {
            for legends in [Legends::Matrix, Legends::Lynx] {
                for position in layout.generate_positions() {
                    assert!(
                        legends.legend(hand, Cluster::Finger, position).is_some(),
                        "{legends:?} {hand:?} {position:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn thumb_tables_cover_the_thumb_well() {
        let layout = Layout::thumb_well();
        for position in layout.generate_positions() {
            assert!(Legends::Matrix
                .legend(Hand::Left, Cluster::Thumb, position)
                .is_some());
        }
    }

    #[test]
    fn blank_and_missing_keys() {
        let double = Position::new(0., 0.5);
        assert_eq!(Legends::Lynx.legend(Hand::Right, Cluster::Thumb, double), None);
        assert_eq!(
            Legends::Lynx.legend(Hand::Left, Cluster::Thumb, double).as_deref(),
            Some(BACKSPACE)
        );
        assert_eq!(
            Legends::Lynx.legend(Hand::Right, Cluster::Finger, Position::new(6., 0.)),
            None
        );
        assert_eq!(
            Legends::None.legend(Hand::Right, Cluster::Finger, Position::new(1., 1.)),
            None
        );
    }

    #[test]
    fn coordinates_print_half_keys() {
        assert_eq!(
            Legends::Coordinates
                .legend(Hand::Right, Cluster::Thumb, Position::new(0., 0.5))
                .as_deref(),
            Some("0,0.5")
        );
    }
}
