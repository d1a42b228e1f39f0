use super::read_source;
use crate::{config::Config, listing::TextSurface};
use anyhow::{Context, Result};
use gcf_fold::{Activation, Folding};
use std::{io::Write, path::Path};

/// Render `path` after applying `actions` in order.
pub fn run(
    path: &Path,
    actions: &[Activation],
    config: &Config,
    out: &mut impl Write,
) -> Result<()> {
    let source = read_source(path)?;
    let mut folds = Folding::new(TextSurface::new(&source, config), config.pairing_options());

    for &activation in actions {
        folds
            .activate(activation)
            .with_context(|| format!("Failed to apply {}", describe(activation)))?;
    }

    tracing::debug!(
        actions = actions.len(),
        collapsed = ?folds.controller().collapsed(),
        "rendering listing"
    );

    out.write_all(folds.surface().render().as_bytes())?;
    Ok(())
}

fn describe(activation: Activation) -> String {
    match activation {
        Activation::Icon(line) => format!("icon:{}", line + 1),
        Activation::Ellipsis(line) => format!("ellipsis:{}", line + 1),
    }
}
