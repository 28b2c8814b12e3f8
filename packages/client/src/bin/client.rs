//! Terminal chat client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin whisper-client -- --username alice --room general
//! ```

use clap::Parser;
use whisper_client::config::{Args, ClientConfig};
use whisper_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let config = match ClientConfig::try_from(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid arguments: {e}");
            std::process::exit(2);
        }
    };

    // Run the client
    if let Err(e) = whisper_client::run_client(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
