//! Model parameters, loaded from an optional TOML file.
//!
//! Every key is optional; anything missing takes the value from
//! [`Config::default`]. Command-line flags are applied on top by the binary.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::legends::Legends;
use crate::output::Preview;
use crate::params::{DEFAULT_WALL_THICKNESS, FINGER_COLUMNS, FINGER_ROWS, KEYSWITCH_LENGTH};
use crate::switch::SocketKind;

// The assembly hangs connector, nuts and cover edges off keys up to here.
const MIN_COLUMNS: usize = 6;
const MIN_ROWS: usize = 5;

/// Dimensions of the bottom cover and the magnets that hold it on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BottomCover {
    /// Gap between the top of the sockets and the top of the cover.
    pub offset: f64,
    /// How far the cover edges reach out from the key centers.
    pub edge_protrusion: f64,
    pub thickness: f64,
    pub post_size: f64,
    /// Wall around each magnet.
    pub magnet_mount_thickness: f64,
    pub magnet_radius: f64,
    pub magnet_thickness: f64,
}

impl Default for BottomCover {
    fn default() -> Self {
        Self {
            offset: 11.,
            edge_protrusion: KEYSWITCH_LENGTH - 1.,
            thickness: 3.,
            post_size: 0.2,
            magnet_mount_thickness: 1.5,
            magnet_radius: 2.5,
            magnet_thickness: 3.,
        }
    }
}

/// Everything that shapes the generated model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub columns: usize,
    pub rows: usize,
    /// Widen the two outer finger columns to 1.5u.
    pub use_1_5u_keys: bool,
    /// Color the parts for previewing.
    pub use_color: bool,
    pub socket: SocketKind,
    pub legends: Legends,
    pub wall_thickness: f64,
    /// Mount a TrackPoint between the keys of the right half.
    pub enable_trackpoint: bool,
    /// Add threaded inserts for tenting legs.
    pub enable_nuts: bool,
    /// Also add a tenting nut to the thumb well. Needs `enable_nuts`.
    pub bottom_thumb_nuts: bool,
    /// Show finger, thumb and connector as separate pieces in the combined
    /// preview instead of the single-piece shell.
    pub separate_pieces: bool,
    /// Extras shown around the halves in the combined preview.
    pub preview: Vec<Preview>,
    pub output_dir: PathBuf,
    pub bottom_cover: BottomCover,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            columns: FINGER_COLUMNS,
            rows: FINGER_ROWS,
            use_1_5u_keys: false,
            use_color: false,
            socket: SocketKind::default(),
            legends: Legends::default(),
            wall_thickness: DEFAULT_WALL_THICKNESS,
            enable_trackpoint: true,
            enable_nuts: false,
            bottom_thumb_nuts: false,
            separate_pieces: false,
            preview: Preview::DEFAULT.to_vec(),
            output_dir: PathBuf::from("things"),
            bottom_cover: BottomCover::default(),
        }
    }
}

impl Config {
    /// Reads and validates a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.columns < MIN_COLUMNS || self.rows < MIN_ROWS {
            return Err(Error::InvalidLayout(format!(
                "a {}x{} finger well is too small; at least {MIN_COLUMNS}x{MIN_ROWS} is needed",
                self.columns, self.rows
            )));
        }
        if !(self.wall_thickness > 0.) {
            return Err(Error::InvalidLayout(format!(
                "wall thickness must be positive, got {}",
                self.wall_thickness
            )));
        }
        let cover = &self.bottom_cover;
        if !(cover.thickness > 0. && cover.post_size > 0. && cover.magnet_radius > 0.) {
            return Err(Error::InvalidLayout(
                "bottom cover dimensions must be positive".to_owned(),
            ));
        }
        Ok(())
    }
}
