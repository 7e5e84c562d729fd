//! Naming, building and writing the generated OpenSCAD files.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::assembly::{Hand, KeyboardAssembly};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::scad::Shape;

const FILE_PREFIX: &str = "dactyl-lynx";
// Distance of each half from the middle of the combined preview.
const HALF_SPACING: f64 = 100.;
// Keeps the bottom cover from z-fighting with the shell in previews.
const BOTTOM_PREVIEW_DROP: f64 = 0.01;

mod colors {
    pub const COMBINED: (f64, f64, f64) = (0.03, 0.03, 0.03);
    pub const FINGER_PART: (f64, f64, f64) = (0.1, 0.1, 0.9);
    pub const THUMB_PART: (f64, f64, f64) = (0.1, 0.1, 0.1);
    pub const CONNECTOR: (f64, f64, f64) = (0.4, 0.1, 0.1);
    pub const KEYSWITCHES: (f64, f64, f64) = (0.02, 0.02, 0.02);
    pub const PCBS: (f64, f64, f64) = (0.02, 0.02, 0.02);
    pub const BOTTOM: (f64, f64, f64) = (0.027, 0.027, 0.027);
    pub const LCD_MOUNT: (f64, f64, f64) = (0.1, 0.3, 0.1);
}

/// A file the generator can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    Finger,
    Thumb,
    Connector,
    SinglePiece,
    Bottom,
    BottomWithFeet,
    BottomWithNuts,
    BottomWithTripodMount,
    BottomWithFeetTripod,
    /// Only exists for the left half.
    LcdMount,
    /// Both halves side by side, with the preview extras.
    Combined,
}

impl Part {
    pub const ALL: [Part; 11] = [
        Part::Finger,
        Part::Thumb,
        Part::Connector,
        Part::SinglePiece,
        Part::Bottom,
        Part::BottomWithFeet,
        Part::BottomWithNuts,
        Part::BottomWithTripodMount,
        Part::BottomWithFeetTripod,
        Part::LcdMount,
        Part::Combined,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Part::Finger => "finger",
            Part::Thumb => "thumb",
            Part::Connector => "connector",
            Part::SinglePiece => "single-piece",
            Part::Bottom => "bottom",
            Part::BottomWithFeet => "bottom-with-feet",
            Part::BottomWithNuts => "bottom-with-nuts",
            Part::BottomWithTripodMount => "bottom-with-tripod-mount",
            Part::BottomWithFeetTripod => "bottom-with-feet-tripod",
            Part::LcdMount => "lcd-mount",
            Part::Combined => "combined",
        }
    }

    /// The hands this part is written for; empty for the combined preview.
    pub fn hands(self) -> &'static [Hand] {
        match self {
            Part::LcdMount => &[Hand::Left],
            Part::Combined => &[],
            _ => &Hand::BOTH,
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Part {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Part::ALL
            .into_iter()
            .find(|part| part.name() == s)
            .ok_or_else(|| Error::UnknownPart(s.to_owned()))
    }
}

/// Extras shown in the combined preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preview {
    Trackpoint,
    Keycaps,
    Keyswitches,
    Pcbs,
    Bottom,
    BottomWithFeet,
    BottomWithNuts,
    BottomWithTripodMount,
    BottomWithFeetTripod,
    LcdMount,
}

impl Preview {
    pub const DEFAULT: [Preview; 5] = [
        Preview::Trackpoint,
        Preview::Keycaps,
        Preview::Keyswitches,
        Preview::Pcbs,
        Preview::BottomWithFeetTripod,
    ];

    // In order of preference when several are listed.
    const BOTTOMS: [(Preview, Part); 5] = [
        (Preview::Bottom, Part::Bottom),
        (Preview::BottomWithFeet, Part::BottomWithFeet),
        (Preview::BottomWithNuts, Part::BottomWithNuts),
        (Preview::BottomWithTripodMount, Part::BottomWithTripodMount),
        (Preview::BottomWithFeetTripod, Part::BottomWithFeetTripod),
    ];
}

/// Which bottom cover, if any, the preview shows.
fn preview_bottom(preview: &[Preview]) -> Option<Part> {
    Preview::BOTTOMS
        .into_iter()
        .find(|(extra, _)| preview.contains(extra))
        .map(|(_, part)| part)
}

pub fn file_name(columns: usize, rows: usize, part: Part, hand: Option<Hand>) -> String {
    let prefix = format!("{FILE_PREFIX}-{columns}x{rows}");
    match (part, hand) {
        (Part::Combined, _) | (_, None) => format!("{prefix}.scad"),
        (part, Some(hand)) => format!("{prefix}-{hand}-{part}.scad"),
    }
}

pub struct Output {
    assembly: KeyboardAssembly,
    columns: usize,
    rows: usize,
    separate_pieces: bool,
    preview: Vec<Preview>,
    output_dir: PathBuf,
}

impl Output {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            assembly: KeyboardAssembly::new(config)?,
            columns: config.columns,
            rows: config.rows,
            separate_pieces: config.separate_pieces,
            preview: config.preview.clone(),
            output_dir: config.output_dir.clone(),
        })
    }

    pub fn path(&self, part: Part, hand: Option<Hand>) -> PathBuf {
        self.output_dir
            .join(file_name(self.columns, self.rows, part, hand))
    }

    fn bottom(&self, part: Part) -> Shape {
        let assembly = &self.assembly;
        match part {
            Part::BottomWithFeet => {
                assembly.finger_bottom_cover() + assembly.finger_bottom_cover_feet()
            }
            Part::BottomWithNuts => {
                assembly.finger_bottom_cover() + assembly.finger_bottom_cover_nuts()
            }
            Part::BottomWithTripodMount => assembly.finger_bottom_cover_with_tripod_mount(),
            Part::BottomWithFeetTripod => {
                assembly.finger_bottom_cover_with_tripod_mount()
                    + assembly.finger_bottom_cover_feet()
            }
            _ => assembly.finger_bottom_cover(),
        }
    }

    /// One half's part, mirrored into place for `hand`.
    pub fn hand_part(&self, part: Part, hand: Hand) -> Result<Shape> {
        let assembly = &self.assembly;
        let shape = match part {
            Part::Finger => assembly.finger_part(hand),
            Part::Thumb => assembly.thumb_part(hand),
            Part::Connector => assembly.connector(),
            Part::SinglePiece => assembly.single_piece(hand),
            Part::Bottom
            | Part::BottomWithFeet
            | Part::BottomWithNuts
            | Part::BottomWithTripodMount
            | Part::BottomWithFeetTripod => self.bottom(part),
            // Already in place next to the left half.
            Part::LcdMount => return Ok(assembly.lcd_mount()),
            Part::Combined => return self.combined(),
        };
        Ok(hand.orient(shape))
    }

    fn preview_half(&self, hand: Hand) -> Result<Shape> {
        let assembly = &self.assembly;
        let mut half = if self.separate_pieces {
            assembly.finger_part(hand).color(colors::FINGER_PART)
                + assembly.thumb_part(hand).color(colors::THUMB_PART)
                + assembly.connector().color(colors::CONNECTOR)
        } else {
            assembly.single_piece(hand).color(colors::COMBINED)
        };

        if hand == Hand::Right && self.preview.contains(&Preview::Trackpoint) {
            half += assembly.trackpoint_stick();
        }
        if self.preview.contains(&Preview::Keycaps) {
            half += assembly.keycaps(hand)?;
        }
        if self.preview.contains(&Preview::Keyswitches) {
            half += assembly.keyswitches().color(colors::KEYSWITCHES);
        }
        if self.preview.contains(&Preview::Pcbs) {
            half += assembly.pcbs().color(colors::PCBS);
        }
        if let Some(bottom) = preview_bottom(&self.preview) {
            half += self
                .bottom(bottom)
                .color(colors::BOTTOM)
                .down(BOTTOM_PREVIEW_DROP);
        }
        Ok(hand.orient(half))
    }

    /// Both halves side by side, with the configured preview extras.
    pub fn combined(&self) -> Result<Shape> {
        let mut combined = self.preview_half(Hand::Right)?.right(HALF_SPACING)
            + self.preview_half(Hand::Left)?.left(HALF_SPACING);
        if self.preview.contains(&Preview::LcdMount) {
            combined += self.assembly.lcd_mount().color(colors::LCD_MOUNT);
        }
        Ok(combined)
    }

    fn write_shape(&self, name: &str, shape: &Shape, path: &Path) -> Result<()> {
        debug!(
            "{name}: {} nodes, bounds {:?}",
            shape.node_count(),
            shape.bounds().map(|b| b.size())
        );
        shape.write_scad(path)?;
        info!("Wrote {name} to {}", path.display());
        Ok(())
    }

    /// Writes every requested part for every hand it exists for, returning
    /// the paths written.
    pub fn write(&self, parts: &[Part]) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for &part in parts {
            if part == Part::Combined {
                let path = self.path(part, None);
                self.write_shape("combined preview", &self.combined()?, &path)?;
                written.push(path);
                continue;
            }
            for &hand in part.hands() {
                let path = self.path(part, Some(hand));
                let shape = self.hand_part(part, hand)?;
                self.write_shape(&format!("{hand} {part}"), &shape, &path)?;
                written.push(path);
            }
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn output_in(dir: &Path, preview: Vec<Preview>) -> Output {
        let config = Config {
            output_dir: dir.to_path_buf(),
            preview,
            ..Config::default()
        };
        Output::new(&config).unwrap()
    }

    #[test]
    fn test_file_names() {
        assert_eq!(
            file_name(6, 5, Part::Finger, Some(Hand::Right)),
            "dactyl-lynx-6x5-right-finger.scad"
        );
        assert_eq!(
            file_name(6, 5, Part::BottomWithFeetTripod, Some(Hand::Left)),
            "dactyl-lynx-6x5-left-bottom-with-feet-tripod.scad"
        );
        assert_eq!(
            file_name(6, 5, Part::LcdMount, Some(Hand::Left)),
            "dactyl-lynx-6x5-left-lcd-mount.scad"
        );
        assert_eq!(file_name(7, 5, Part::Combined, None), "dactyl-lynx-7x5.scad");
    }

    #[test]
    fn test_part_names_parse() {
        for part in Part::ALL {
            assert_eq!(part.name().parse::<Part>().unwrap(), part);
        }
        assert!(matches!(
            "keyboard".parse::<Part>(),
            Err(Error::UnknownPart(name)) if name == "keyboard"
        ));
    }

    #[test]
    fn test_hands_per_part() {
        assert_eq!(Part::Finger.hands(), &[Hand::Right, Hand::Left]);
        assert_eq!(Part::LcdMount.hands(), &[Hand::Left]);
        assert!(Part::Combined.hands().is_empty());
    }

    #[test]
    fn test_preview_prefers_the_plain_bottom() {
        assert_eq!(preview_bottom(&Preview::DEFAULT), Some(Part::BottomWithFeetTripod));
        assert_eq!(
            preview_bottom(&[Preview::BottomWithNuts, Preview::Bottom]),
            Some(Part::Bottom)
        );
        assert_eq!(preview_bottom(&[Preview::Keycaps]), None);
    }

    #[test]
    fn test_write_parts() {
        let dir = TempDir::new().unwrap();
        let output = output_in(dir.path(), Vec::new());
        let written = output.write(&[Part::Connector, Part::LcdMount]).unwrap();

        let names: Vec<_> = written
            .iter()
            .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            [
                "dactyl-lynx-6x5-right-connector.scad",
                "dactyl-lynx-6x5-left-connector.scad",
                "dactyl-lynx-6x5-left-lcd-mount.scad",
            ]
        );

        let connector = fs::read_to_string(&written[0]).unwrap();
        assert!(connector.starts_with(crate::scad::SCAD_HEADER));
        assert!(connector.contains("include <BOSL2/screws.scad>"));
        let left = fs::read_to_string(&written[1]).unwrap();
        assert!(left.contains("mirror(v=[1, 0, 0])"));
    }

    #[test]
    fn test_halves_sit_apart() {
        let dir = TempDir::new().unwrap();
        let output = output_in(dir.path(), Vec::new());
        let combined = output.combined().unwrap();
        let single = output.hand_part(Part::SinglePiece, Hand::Right).unwrap();

        let left = output.hand_part(Part::SinglePiece, Hand::Left).unwrap();

        let bounds = combined.bounds().unwrap();
        let right = single.bounds().unwrap();
        let left = left.bounds().unwrap();
        assert!((bounds.max.x - (right.max.x + HALF_SPACING)).abs() < 1e-6);
        assert!((bounds.min.x - (left.min.x - HALF_SPACING)).abs() < 1e-6);
    }

    #[test]
    fn test_preview_extras() {
        let dir = TempDir::new().unwrap();
        let bare = output_in(dir.path(), Vec::new()).combined().unwrap();
        let extras = output_in(dir.path(), vec![Preview::LcdMount, Preview::Keycaps])
            .combined()
            .unwrap();
        let script = extras.to_scad();
        assert!(script.contains("color(c=[0.1, 0.3, 0.1, 1])"));
        assert!(script.contains("text("));
        assert!(!bare.to_scad().contains("text("));
    }
}
