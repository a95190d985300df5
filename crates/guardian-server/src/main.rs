//! Contract Guardian Server
//!
//! Starts the HTTP server for contract upload and risk analysis.

use guardian_server::{config::ServerConfig, start_server, ServerError};
use std::env;
use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        ServerConfig::from_file(&args[2])?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        eprintln!("Warning: No config file specified, using default configuration");
        eprintln!("Usage: guardian-server --config <path-to-config.toml>");
        eprintln!();
        let mut config = ServerConfig::default_test_config();
        config.apply_env()?;
        config
    };

    start_server(config).await?;

    Ok(())
}

fn print_help() {
    println!("Contract Guardian Server - Contract clause risk analysis");
    println!();
    println!("USAGE:");
    println!("    guardian-server --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file may contain:");
    println!("    - bind_address / bind_port: where to listen (default 127.0.0.1:8000)");
    println!("    - storage_path: upload directory (default data/documents)");
    println!("    - database_path: SQLite file; omit to keep documents in memory");
    println!("    - ocr_language: extraction language hint (default kor+eng)");
    println!("    - [llm]: provider = dummy | ollama | openai, model settings");
    println!("    - [analysis]: concurrency, timeouts, heading pattern");
    println!();
    println!("ENVIRONMENT:");
    println!("    GUARDIAN_LLM_PROVIDER    Override [llm].provider");
    println!("    OPENAI_API_KEY           API key for the openai provider");
    println!("    RUST_LOG                 Log filter (default info)");
    println!();
}
