use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    refscout::cli::run_cli().await
}
