use anyhow::{Context, Result};
use std::process::ExitCode;

use busprobe::cli::{self, Cli};
use busprobe::{config, Analyzer};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli: Cli = cli::parse_or_usage(cli::USAGE);

    match run(&cli) {
        Ok(()) => {
            println!("[OK] Analysis written to {}", cli.output.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            println!("[ERROR] Analysis failed: {:#}", err);
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = config::resolve(cli.config.as_deref());
    let analyzer = Analyzer::new(config)?;

    log::info!("Input: {}", cli.input.display());
    let analysis = analyzer.analyze_file(&cli.input)?;

    // Serialize before touching the output path so a failure leaves no file.
    let json = analysis.report.to_json().context("Failed to serialize report")?;
    std::fs::write(&cli.output, json)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    log::info!("Done! Output: {}", cli.output.display());
    Ok(())
}
