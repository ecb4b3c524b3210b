//! Entry point for `adx`.
//!
//! Parses CLI arguments and dispatches into either **send** or **recv**
//! mode. All protocol work is delegated to library modules; `main.rs` owns
//! only process setup (logging, argument parsing) and the exit code.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use adx::constants::{DEFAULT_PORT, INITIAL_RATE};
use adx::error::Result;
use adx::{Receiver, ReceiverConfig, Sender, SenderConfig};

/// Loss-adaptive, best-effort datagram streaming over UDP.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    role: Role,
}

#[derive(Subcommand)]
enum Role {
    /// Stream a payload file to a receiver.
    Send {
        /// Path to the payload file to stream (e.g. an H.264 elementary stream).
        file: PathBuf,
        /// Receiver address.
        #[arg(long, default_value_t = SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)))]
        to: SocketAddr,
        /// CSV file recording each feedback-driven rate adjustment.
        #[arg(long, default_value = "aimd_log.csv")]
        log: PathBuf,
        /// Probability of discarding an outgoing packet before the wire
        /// (simulated link loss; 0 disables).
        #[arg(long, default_value_t = 0.0)]
        drop: f64,
        /// Initial transmission rate, packets/second.
        #[arg(long, default_value_t = INITIAL_RATE)]
        rate: u32,
    },
    /// Receive a stream and forward payload bytes to stdout.
    Recv {
        /// Local address to bind.
        #[arg(long, default_value_t = SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)))]
        bind: SocketAddr,
    },
}

async fn run(role: Role) -> Result<()> {
    match role {
        Role::Send {
            file,
            to,
            log,
            drop,
            rate,
        } => {
            let config = SenderConfig {
                target: to,
                log_path: log,
                drop_rate: drop,
                initial_rate: rate,
            };
            log::info!("streaming {} to {to}", file.display());
            let stats = Sender::open(&config, &file).await?.run().await?;
            log::info!(
                "adjustment log written ({} feedback messages applied)",
                stats.adjustments
            );
            Ok(())
        }
        Role::Recv { bind } => {
            // Payload bytes only on stdout; everything else goes through
            // the logger (stderr). Pipe stdout into a decoder, e.g. ffplay.
            let config = ReceiverConfig::new(bind);
            Receiver::bind(&config, std::io::stdout()).await?.run().await
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli.role).await {
        log::error!("{e}");
        std::process::exit(1);
    }
}
