pub mod pairs;
pub mod render;

use anyhow::{Context, Result};
use std::path::Path;

fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read source file: {}", path.display()))
}
