// CLI definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "macropad_driver")]
#[command(author, version, about = "Configurator for 12-key + 2-knob CH552 macro pads")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Append every sent frame as a hex line to this file
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        num_args = 0..=1,
        default_missing_value = "macropad_sent_packets.hex"
    )]
    pub dump: Option<PathBuf>,

    /// Settling delay after each commit, in milliseconds
    #[arg(long, global = true, default_value_t = 200, value_name = "MS")]
    pub settle_ms: u64,

    /// Skip post-save verification
    #[arg(long, global = true)]
    pub no_verify: bool,

    /// Layer to verify after programming
    #[arg(
        long,
        global = true,
        default_value_t = 1,
        value_name = "LAYER",
        value_parser = clap::value_parser!(u8).range(1..=3)
    )]
    pub verify_layer: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Program the pad from a JSON config file (the default command)
    #[command(visible_alias = "prog")]
    Program {
        /// Config file path
        #[arg(short, long, default_value = "macropad.json")]
        config: PathBuf,
    },

    /// Read the current configuration back from the pad
    #[command(visible_alias = "r")]
    Read,

    /// Set all layers' LEDs without touching bindings
    Led {
        /// LED color (off, red, orange, yellow, green, cyan, blue, purple, or 0-7)
        color: String,
        /// LED effect (off, static, ripple, wave, reactive, white, or 0-7)
        #[arg(default_value = "static")]
        effect: String,
    },

    /// Write a starter config file to edit
    #[command(visible_alias = "gen")]
    GenerateConfig {
        /// Output path
        #[arg(default_value = "macropad.json")]
        path: PathBuf,
    },
}
