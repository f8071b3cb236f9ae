use anyhow::Result;
use clap::Parser;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use taskrelay::{build_container, AppConfig, Commands, Router};

#[derive(Parser)]
#[command(name = "taskrelay")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if let Err(e) = dotenv::dotenv() {
        debug!(".env file not loaded ({}), using environment variables", e);
    }

    let config = AppConfig::from_env();
    let container = build_container(&config);
    let router = Router::new(&container, &config);

    let output = router.route(cli.command).await?;
    println!("{}", output);

    Ok(())
}
