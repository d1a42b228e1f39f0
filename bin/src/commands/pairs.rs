use super::read_source;
use crate::{cli::Format, config::Config};
use anyhow::Result;
use gcf_fold::{compute_pairing_with, BlockPairing};
use std::{io::Write, path::Path};

/// Print the block pairing for `path`.
///
/// Text output uses 1-based line numbers: `<opener>: <first>-<last>` per block, where
/// `<first>-<last>` is the body hidden when the block is collapsed.
pub fn run(path: &Path, format: Format, config: &Config, out: &mut impl Write) -> Result<()> {
    let source = read_source(path)?;
    let pairing = compute_pairing_with(source.lines(), config.pairing_options());

    match format {
        Format::Text => write_text(&pairing, out)?,
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, &pairing)?;
            writeln!(out)?;
        },
    }
    Ok(())
}

fn write_text(pairing: &BlockPairing, out: &mut impl Write) -> Result<()> {
    for (opener, closer) in pairing.iter() {
        writeln!(out, "{}: {}-{}", opener + 1, opener + 2, closer + 1)?;
    }

    if !pairing.dangling().is_empty() {
        let lines: Vec<String> = pairing
            .dangling()
            .iter()
            .map(|line| (line + 1).to_string())
            .collect();
        writeln!(out, "unclosed: {}", lines.join(", "))?;
    }
    Ok(())
}
