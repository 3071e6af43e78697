// Core transaction data structures

mod types;
mod transaction;
mod serialize;
mod hash;
mod sighash;
mod record;
pub mod verify;

pub use types::*;
pub use transaction::*;
pub use serialize::*;
pub use hash::*;
pub use sighash::*;
pub use record::*;
pub use verify::{ScriptEngine, SignatureChecker, SignatureVerifier, Secp256k1Verifier, verify_input};
