use std::io::{self, Write};

use winupdates::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    winupdates::init_logger();

    let config = Config::from_env();
    log::info!(
        "starting update scrape: {} sources, OS names from {:?}",
        config.sources.len(),
        config.os_names
    );

    let records = winupdates::run(&config).await?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &records)?;
    writeln!(out)?;

    log::info!("wrote {} update records", records.len());
    Ok(())
}
