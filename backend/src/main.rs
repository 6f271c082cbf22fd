//! AttendMe CLI - reference backend for the AttendMe frontend
//!
//! ```bash
//! attendme serve                       # http://127.0.0.1:5000
//! attendme serve --port 8080 --seed    # with two demo people
//! ```
//!
//! Every flag can also come from an `ATTENDME_*` environment variable or a
//! `.env` file.

use std::net::IpAddr;

use attendme::server::{start_server, ServerConfig};
use attendme::DEFAULT_MAX_IMAGES;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "attendme")]
#[command(about = "Reference backend for the AttendMe attendance console", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server
    Serve {
        /// Address to bind
        #[arg(long, env = "ATTENDME_HOST", default_value = "127.0.0.1")]
        host: IpAddr,

        /// Port to listen on
        #[arg(short, long, env = "ATTENDME_PORT", default_value = "5000")]
        port: u16,

        /// Images a person may hold
        #[arg(long, env = "ATTENDME_MAX_IMAGES", default_value_t = DEFAULT_MAX_IMAGES)]
        max_images: usize,

        /// Preload demo people
        #[arg(long, env = "ATTENDME_SEED")]
        seed: bool,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "attendme=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve {
            host,
            port,
            max_images,
            seed,
        } => {
            start_server(ServerConfig {
                host,
                port,
                max_images,
                seed,
            })
            .await
        }
    };

    if let Err(e) = result {
        tracing::error!("❌ Error: {}", e);
        std::process::exit(1);
    }
}
