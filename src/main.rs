use anyhow::Result;
use camino::Utf8PathBuf;
use clap::Parser;
use dashprop::scenario::Scenario;

#[derive(Parser, Debug)]
#[command(author, version, about = "Run a dashboard editing scenario and print the resulting surfaces as JSON", long_about = None)]
struct Cli {
    /// Scenario JSON file (nodes, config, operations)
    #[arg(value_name = "SCENARIO_FILE")]
    scenario: Utf8PathBuf,

    /// Exit with an error if any operation was rejected
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let scenario = Scenario::load(&cli.scenario)?;
    let report = scenario.run()?;

    let json = serde_json::to_string_pretty(&report)?;
    println!("{}", json);

    if cli.strict && !report.failures.is_empty() {
        anyhow::bail!("{} operation(s) rejected", report.failures.len());
    }
    Ok(())
}
