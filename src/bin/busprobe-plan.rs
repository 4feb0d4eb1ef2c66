use anyhow::{Context, Result};
use std::process::ExitCode;

use busprobe::cli::{self, PlanCli};
use busprobe::plan;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli: PlanCli = cli::parse_or_usage(cli::PLAN_USAGE);

    match run(&cli) {
        Ok(()) => {
            println!("[OK] Plan written to {}", cli.output.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            println!("[ERROR] Planning failed: {:#}", err);
            ExitCode::from(2)
        }
    }
}

fn run(cli: &PlanCli) -> Result<()> {
    let content = std::fs::read_to_string(&cli.issues)
        .with_context(|| format!("Failed to read {}", cli.issues.display()))?;
    let doc: serde_json::Value =
        serde_json::from_str(&content).context("Issues file is not valid JSON")?;

    let issues = plan::issues_from_document(doc)?;
    let plan = plan::build_plan(&issues)?;

    let json = serde_json::to_string_pretty(&plan).context("Failed to serialize plan")?;
    std::fs::write(&cli.output, json)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;
    Ok(())
}
