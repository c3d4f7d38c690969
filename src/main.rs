use clap::Parser;
use log::{info, warn};

use eth_tx_watcher::config::AppConfig;
use eth_tx_watcher::logging::init_logging;
use eth_tx_watcher::EthParser;

#[derive(Parser, Debug)]
#[command(name = "eth-tx-watcher")]
#[command(about = "Fetch transactions for watched Ethereum addresses over JSON-RPC")]
struct Cli {
    /// Configuration file (defaults to $CONFIG_FILE or ./config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<String>,

    /// Address to watch; repeat to watch several. Overrides the configured list
    #[arg(long = "address", value_name = "ADDRESS")]
    addresses: Vec<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => AppConfig::load_with_path(path),
        None => AppConfig::load(),
    };
    let (config, config_error) = match loaded {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("Failed to initialize logging: {}", e);
    }
    if let Some(e) = config_error {
        warn!("Invalid configuration, falling back to defaults: {}", e);
    }

    info!("Starting transaction watcher against {}", config.rpc.endpoint);

    // Errors are reported, never turned into a failing exit status
    let mut parser = match EthParser::new(&config.rpc) {
        Ok(parser) => parser,
        Err(e) => {
            println!("Error: {}", e);
            return;
        }
    };

    let watch_list = if cli.addresses.is_empty() {
        config.watch.addresses
    } else {
        cli.addresses
    };
    for address in &watch_list {
        parser.subscribe(address);
    }

    println!("Current block: {}", parser.get_current_block());

    for address in parser.subscriptions().addresses() {
        match parser.get_transactions(&address).await {
            Ok(transactions) => {
                println!("Transactions for address {}:", address);
                for tx in transactions {
                    println!("{}", tx);
                }
            }
            Err(e) => println!("Error: {}", e),
        }
    }

    info!("Done, current block: {}", parser.get_current_block());
}
