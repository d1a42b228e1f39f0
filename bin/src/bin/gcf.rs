use clap::Parser;
use gcf_bin::{
    cli::{Cli, Command},
    commands,
    config::Config,
};
use gcf_log::LogConfig;

fn main() {
    let cli = Cli::parse();

    let _log_guard = match gcf_log::init(LogConfig {
        log_file_path: cli.log_file.clone(),
    }) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {}", e);
            None
        },
    };

    let config = Config::load_or_default(cli.config.as_deref()).unwrap_or_else(|e| {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    });

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let result = match cli.command {
        Command::Pairs { file, format } => commands::pairs::run(&file, format, &config, &mut out),
        Command::Render { file, actions } => {
            commands::render::run(&file, &actions, &config, &mut out)
        },
    };

    if let Err(e) = result {
        tracing::error!("{:#}", e);
        eprintln!("Command failed: {:#}", e);
        std::process::exit(1);
    }
}
