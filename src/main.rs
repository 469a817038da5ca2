use clap::Parser;

use tap_proxy::config::Cli;
use tap_proxy::observability::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // An insecure or unparsable --upstream exits here, before anything binds.
    let cli = Cli::parse();
    logging::init(cli.verbose);

    tap_proxy::lifecycle::run(cli.into_config()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
