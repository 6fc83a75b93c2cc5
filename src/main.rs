use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

use vetmed_e2e::Args;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    vetmed_e2e::init_logging();

    let args = Args::parse();
    let results = vetmed_e2e::run(args).await?;

    Ok(ExitCode::from(results.exit_status()))
}
