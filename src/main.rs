use clap::Parser;
use meteo_archive::cli::{run, Cli};
use meteo_archive::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
