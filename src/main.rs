//! Fireworks Bitmap CLI
//!
//! Runs the firework HTTP service, or converts a single image offline
//! to preview the bitmap it would be stored as.

use clap::{Parser, Subcommand, ValueEnum};
use fireworks_bitmap::{
    config::FileConfig, AppState, Converter, FireworkServer, FireworkService, MemoryStore,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "fireworks-bitmap", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP service.
    Serve {
        /// TOML configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Address to listen on, overriding the configuration file.
        #[arg(short, long)]
        bind: Option<SocketAddr>,
    },
    /// Convert an image and print the resulting bitmap.
    Convert {
        /// JPEG or PNG file.
        image: PathBuf,
        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Ascii)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// `#` for light pixels, `.` for dark.
    Ascii,
    /// Comma-separated `1`/`0` rows.
    Csv,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { config, bind } => serve(config, bind),
        Command::Convert { image, format } => convert(image, format),
    }
}

fn serve(config_path: Option<PathBuf>, bind: Option<SocketAddr>) {
    info!("Fireworks Bitmap v{}", fireworks_bitmap::VERSION);

    let mut config = match config_path {
        Some(path) => match FileConfig::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load config {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => FileConfig::default(),
    };
    if let Some(bind) = bind {
        config.server.bind_addr = bind;
    }

    let service = FireworkService::new(Arc::new(MemoryStore::new()));
    let state = match AppState::new(service, &config.metrics) {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialise server state: {}", e);
            std::process::exit(1);
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to start async runtime: {}", e);
            std::process::exit(1);
        }
    };

    let server = FireworkServer::new(config.server, state);
    if let Err(e) = runtime.block_on(server.run()) {
        error!("Server failed: {}", e);
        std::process::exit(1);
    }
}

fn convert(path: PathBuf, format: OutputFormat) {
    let bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Failed to read {}: {}", path.display(), e);
            std::process::exit(1);
        }
    };

    let matrix = match Converter::new().convert(&bytes) {
        Ok(matrix) => matrix,
        Err(e) => {
            eprintln!("Failed to convert {}: {}", path.display(), e);
            std::process::exit(1);
        }
    };

    info!(
        lit = matrix.count_lit(),
        total = matrix.len(),
        "Converted {}",
        path.display()
    );

    match format {
        OutputFormat::Ascii => print!("{}", matrix.render_ascii()),
        OutputFormat::Csv => print!("{}", matrix.render_csv()),
    }
}
