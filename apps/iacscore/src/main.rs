//! iacscore CLI binary entry point.
//! Resolves configuration, runs the analysis, and renders the report.

use chrono::Utc;
use clap::Parser;
use iacscore::cli::{Cli, Commands};
use iacscore::models::policy::LineHints;
use iacscore::output::OutputMode;
use iacscore::{analyze, config, output, utils};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Analyze {
            root,
            output,
            report,
            line_hints,
        } => {
            let code = run_analyze(root.as_deref(), output, report.as_deref(), line_hints);
            std::process::exit(code);
        }
    }
}

fn run_analyze(
    root: Option<&str>,
    output: Option<OutputMode>,
    report: Option<&str>,
    line_hints: Option<LineHints>,
) -> i32 {
    let eff = match config::resolve_effective(root, output, report, line_hints) {
        Ok(eff) => eff,
        Err(e) => {
            eprintln!("{} {}", utils::error_prefix(), e);
            return 2;
        }
    };
    if eff.config_file.is_none() && eff.output == OutputMode::Text {
        eprintln!("{} No iacscore.toml found; using defaults.", utils::note_prefix());
    }

    let result = match analyze::analyze_project(&eff.root, &eff.options, Utc::now()) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{} {}", utils::error_prefix(), e);
            return 2;
        }
    };

    let color = eff.report.is_none() && output::use_colors(eff.output);
    let rendered = match output::render(&result, eff.output, color) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{} {}", utils::error_prefix(), e);
            return 2;
        }
    };
    match eff.report.as_deref() {
        Some(path) => {
            if let Err(e) = output::write_report(path, &rendered) {
                eprintln!("{} {}", utils::error_prefix(), e);
                return 2;
            }
            eprintln!("{} Report written to {}", utils::info_prefix(), path.display());
        }
        None if rendered.ends_with('\n') => print!("{rendered}"),
        None => println!("{rendered}"),
    }

    if result.passed() {
        0
    } else {
        1
    }
}
