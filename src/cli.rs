// CLI commands

use clap::{Parser, Subcommand};
use crate::core::{SigHashType, Transaction, signature_digest};

#[derive(Parser)]
#[command(name = "txwire")]
#[command(about = "Bitcoin-style transaction wire codec", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode a hex-encoded transaction and print its JSON record
    Decode {
        /// Transaction wire bytes as hex
        hex: String,
    },

    /// Print the canonical identifier of a hex-encoded transaction
    Id {
        /// Transaction wire bytes as hex
        hex: String,
    },

    /// Compute the digest an input's signature commits to
    Sighash {
        /// Transaction wire bytes as hex
        hex: String,
        /// Index of the input being signed
        input_index: usize,
        /// Substitute script as hex (the referenced output's locking script)
        script: String,
    },
}

/// CLI handler
pub struct CliHandler;

impl CliHandler {
    pub fn handle(cli: Cli) -> Result<(), String> {
        match cli.command {
            Commands::Decode { hex } => {
                let tx = Self::decode_tx(&hex)?;
                println!("{}", tx.to_json());
            }
            Commands::Id { hex } => {
                let tx = Self::decode_tx(&hex)?;
                println!("{}", tx.id());
            }
            Commands::Sighash { hex, input_index, script } => {
                let tx = Self::decode_tx(&hex)?;
                let script = hex::decode(&script)
                    .map_err(|e| format!("Invalid script hex: {}", e))?;
                let digest = signature_digest(&tx, input_index, &script, SigHashType::All)
                    .map_err(|e| e.to_string())?;
                println!("{}", hex::encode(digest.as_bytes()));
            }
        }
        Ok(())
    }

    fn decode_tx(hex_str: &str) -> Result<Transaction, String> {
        let bytes = hex::decode(hex_str.trim())
            .map_err(|e| format!("Invalid transaction hex: {}", e))?;
        let (tx, rest) = Transaction::decode(&bytes).map_err(|e| e.to_string())?;
        log::debug!("decoded transaction {} ({} bytes)", tx.id(), tx.size());
        if !rest.is_empty() {
            log::debug!("{} trailing bytes after transaction", rest.len());
        }
        Ok(tx)
    }
}
