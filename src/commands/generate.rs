//! Starter config generation.

use std::path::Path;

use super::CommandResult;
use macropad_driver::config;

pub fn run(path: &Path) -> CommandResult {
    config::generate(path)?;
    println!("  starter config written to {}", path.display());
    println!("  edit it, then run: macropad_driver program -c {}", path.display());
    Ok(())
}
