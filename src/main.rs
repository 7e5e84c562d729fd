//! Generates OpenSCAD models of the Dactyl Lynx split keyboard.
//!
//! ```bash
//! # Every part for both halves, into ./things
//! dactyl-lynx
//!
//! # Just the right and left finger shells, with 1.5u outer columns
//! dactyl-lynx --use-1-5u-keys --part finger
//! ```

mod angle;
mod assembly;
mod config;
mod error;
mod geometry;
mod keycaps;
mod layout;
mod legends;
mod mounts;
mod output;
mod params;
mod scad;
mod switch;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use legends::Legends;
use output::{Output, Part};
use switch::SocketKind;

/// Dactyl Lynx case generator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Finger well columns [default: 6]
    #[arg(value_name = "COLS")]
    columns: Option<usize>,

    /// Finger well rows [default: 5]
    #[arg(value_name = "ROWS")]
    rows: Option<usize>,

    /// Use 1.5u keys in the two outer finger columns
    #[arg(long)]
    use_1_5u_keys: bool,

    /// Color the parts for previewing
    #[arg(long)]
    color: bool,

    /// Switch plate under each key
    #[arg(long, value_enum)]
    socket: Option<SocketKind>,

    /// Keycap legends in the combined preview
    #[arg(long, value_enum)]
    legends: Option<Legends>,

    /// Directory to write the .scad files to [default: things]
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// TOML file with model parameters; flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Part to generate; repeat for several [default: all]
    #[arg(long = "part", value_name = "NAME")]
    parts: Vec<Part>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if let Some(columns) = self.columns {
            config.columns = columns;
        }
        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        config.use_1_5u_keys |= self.use_1_5u_keys;
        config.use_color |= self.color;
        if let Some(socket) = self.socket {
            config.socket = socket;
        }
        if let Some(legends) = self.legends {
            config.legends = legends;
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir.clone_from(output_dir);
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    args.apply(&mut config);

    let output = Output::new(&config).context("Invalid keyboard configuration")?;
    let parts = if args.parts.is_empty() {
        Part::ALL.to_vec()
    } else {
        args.parts
    };

    info!(
        "Generating {}x{} keyboard into {}",
        config.columns,
        config.rows,
        config.output_dir.display()
    );
    let written = output.write(&parts).context("Failed to write models")?;
    info!("Wrote {} files", written.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_the_config() {
        let args = Args::try_parse_from([
            "dactyl-lynx",
            "7",
            "--socket",
            "tagged",
            "--part",
            "finger",
            "--part",
            "bottom-with-feet",
        ])
        .unwrap();
        let mut config = Config::default();
        args.apply(&mut config);

        assert_eq!((config.columns, config.rows), (7, 5));
        assert_eq!(config.socket, SocketKind::Tagged);
        assert_eq!(args.parts, [Part::Finger, Part::BottomWithFeet]);
    }

    #[test]
    fn unknown_parts_are_rejected() {
        assert!(Args::try_parse_from(["dactyl-lynx", "--part", "keyboard"]).is_err());
    }
}
