//! Lead distribution server daemon.

use anyhow::Result;
use clap::Parser;

use lead_engine::prelude::*;

#[derive(Parser, Debug)]
#[command(
    name = "lead-engine-server",
    about = "Lead distribution engine server",
    version
)]
struct Args {
    /// HTTP listen address
    #[arg(long, default_value = "0.0.0.0:8080")]
    bind: std::net::SocketAddr,

    /// SQLite database path (":memory:" for a non-persistent store)
    #[arg(long, default_value = "leads.db")]
    database: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit JSON-formatted logs
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = parse_log_level(&args.log_level)?;
    let mut logging = LoggingConfig::new(level);
    if args.json_logs {
        logging = logging.with_json();
    }
    setup_logging(logging)?;

    let mut config = DistributorConfig::default();
    config.general.bind_addr = args.bind;
    config.database.database_path = if args.database == ":memory:" {
        String::new()
    } else {
        args.database
    };

    let server = DistributionServerBuilder::new()
        .with_config(config)
        .build()
        .await?;

    server.run().await?;
    Ok(())
}
