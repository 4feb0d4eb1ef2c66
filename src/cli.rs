use clap::Parser;
use std::path::PathBuf;

pub const USAGE: &str = "Usage: busprobe <input-audio> <output.json>";
pub const PLAN_USAGE: &str = "Usage: busprobe-plan <issues.json> <plan.json>";

#[derive(Parser, Debug)]
#[command(name = "busprobe", about = "Extract mixing features from a rendered audio bus")]
pub struct Cli {
    /// Input audio file (WAV, MP3, FLAC, OGG, AAC)
    pub input: PathBuf,

    /// Output JSON report
    pub output: PathBuf,

    /// Analysis config (TOML). Defaults to busprobe.toml or the user config.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
#[command(name = "busprobe-plan", about = "Attach fix templates to detected mix issues")]
pub struct PlanCli {
    /// JSON array of issues, each with a numeric "severity"
    pub issues: PathBuf,

    /// Output JSON plan
    pub output: PathBuf,
}

/// Parse arguments, exiting with status 1 and the usage line on stdout when
/// the arguments don't fit. Help and version requests keep clap's behaviour.
pub fn parse_or_usage<P: Parser>(usage: &str) -> P {
    match P::try_parse() {
        Ok(parsed) => parsed,
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => err.exit(),
            _ => {
                println!("{}", usage);
                std::process::exit(1);
            }
        },
    }
}
