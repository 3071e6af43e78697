// Transaction wire codec - CLI

use txwire::{Cli, CliHandler};
use clap::Parser;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = CliHandler::handle(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
