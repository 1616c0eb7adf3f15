use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use nikki::build::build_feed;
use nikki::config::Config;
use nikki::serve;

#[derive(Parser)]
#[command(name = "nikki")]
#[command(about = "Builds an RSS feed and SVG thumbnails from a diary source", long_about = None)]
struct Cli {
    /// Path to the project file. Defaults to searching for `nikki.yaml`
    /// upward from the current directory.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the diary source and write the RSS feed
    Build,
    /// Serve entry thumbnails over HTTP
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = serve::DEFAULT_PORT)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::from_project_file(path)?,
        None => Config::from_directory(&std::env::current_dir()?)?,
    };

    match cli.command {
        Commands::Build => build_feed(&config).await?,
        Commands::Serve { port } => serve::serve(config, port).await?,
    }

    Ok(())
}
