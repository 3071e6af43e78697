// Bitcoin-style transaction wire codec
// Decode/encode, canonical identifiers, and signing digests

pub mod core;
pub mod cli;

// Re-exports for convenience
pub use core::{
    Transaction, TransactionBuilder, TxInput, TxOutput, TxError, Hash256,
    SigHashType, signature_digest, verify_input,
};
pub use cli::{Cli, CliHandler};
