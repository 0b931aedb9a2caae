mod cli;
mod extract_cmd;
mod generate_cmd;
mod page_range;
mod shared;
mod text_cmd;
mod validate_cmd;
mod winner_cmd;
mod words_cmd;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Generate {
            count,
            ref output,
            ref title,
            start,
            seed,
            ref existing,
            ref json,
        } => generate_cmd::run(&generate_cmd::GenerateArgs {
            count,
            output,
            title,
            start,
            seed,
            existing,
            json: json.as_deref(),
        }),
        Commands::Extract {
            ref file,
            ref pages,
            ref format,
            ref read,
        } => extract_cmd::run(file, pages.as_deref(), format, read),
        Commands::Validate {
            ref files,
            ref format,
            strict,
            ref read,
        } => validate_cmd::run(files, format, strict, read),
        Commands::Winner {
            ref file,
            ref called,
            winners_only,
            ref pdf,
            ref title,
            ref format,
            ref read,
        } => winner_cmd::run(&winner_cmd::WinnerArgs {
            file,
            called,
            winners_only,
            pdf: pdf.as_deref(),
            title,
            format,
            read,
        }),
        Commands::Words {
            ref file,
            ref pages,
            ref format,
            x_tolerance,
            y_tolerance,
        } => words_cmd::run(file, pages.as_deref(), format, x_tolerance, y_tolerance),
        Commands::Text {
            ref file,
            ref pages,
            ref format,
        } => text_cmd::run(file, pages.as_deref(), format),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}

/// Log to stderr. `RUST_LOG` applies unless `-v` is given.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    };
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
