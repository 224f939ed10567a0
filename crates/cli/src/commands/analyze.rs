//! `legm analyze`: Analyze one take and print the result.

use std::path::PathBuf;

use super::CmdResult;

pub async fn run(take: String, stats_fixture: Option<PathBuf>) -> CmdResult {
    let config = super::load_config()?;
    let stats = super::build_stats(&config, stats_fixture.as_deref())?;
    let analyzer = super::build_analyzer(&config, stats)?;

    eprint!("  Pulling receipts...");
    let analysis = analyzer.analyze(&take).await?;
    eprint!("\r                    \r");

    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}
