use clap::{Parser, Subcommand, ValueEnum};
use gcf_fold::Activation;
use std::path::PathBuf;

/// Indentation-based code folding for source listings
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to load instead of the built-in defaults
    #[arg(long, global = true, env = "GCF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log file path, or a directory to place the log file in
    #[arg(long, global = true, env = "GCF_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the block pairing computed for a file
    Pairs {
        file: PathBuf,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Print a file with folds applied
    Render {
        file: PathBuf,

        /// Activation to apply, in order: `icon:<line>` toggles the block opened on
        /// that 1-based line, `ellipsis:<line>` expands it
        #[arg(long = "action", value_parser = parse_activation)]
        actions: Vec<Activation>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    /// Zero-based line indices
    Json,
}

/// Parse `icon:<line>` or `ellipsis:<line>` with a 1-based line number.
pub fn parse_activation(value: &str) -> Result<Activation, String> {
    let (kind, line) = value
        .split_once(':')
        .ok_or_else(|| format!("expected `icon:<line>` or `ellipsis:<line>`, got `{value}`"))?;

    let line: usize = line
        .trim()
        .parse()
        .map_err(|err| format!("invalid line number `{line}`: {err}"))?;
    let index = line
        .checked_sub(1)
        .ok_or_else(|| "line numbers start at 1".to_string())?;

    match kind.trim() {
        "icon" => Ok(Activation::Icon(index)),
        "ellipsis" => Ok(Activation::Ellipsis(index)),
        other => Err(format!("unknown activation `{other}`")),
    }
}
