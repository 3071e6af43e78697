// Signature digest computation (legacy signing rules)

use crate::core::{Hash256, Transaction, TxError, TxInput, hash256};
use std::io::Write;
use super::serialize::write_varint;

/// Which parts of the transaction a signature commits to
///
/// Only the "sign all outputs" mode exists; the enum keeps the digest
/// contract stable if none/single modes are ever added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum SigHashType {
    /// Commit to every input and output
    All = 1,
}

impl SigHashType {
    /// Wire value appended to the digest preimage
    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

/// Compute the 32-byte digest an input's signature authenticates
///
/// A transient copy of the transaction is serialized in which the input at
/// `input_index` carries `substitute_script` (normally the referenced
/// output's locking script), every other input carries an empty script, and
/// all sequences are forced to 0xffffffff. The 4-byte hash type is appended
/// before the final double SHA256.
pub fn signature_digest(
    tx: &Transaction,
    input_index: usize,
    substitute_script: &[u8],
    hash_type: SigHashType,
) -> Result<Hash256, TxError> {
    if input_index >= tx.inputs().len() {
        return Err(TxError::InputIndexOutOfRange(input_index));
    }

    let mut buf = Vec::new();

    buf.write_all(&tx.version().to_le_bytes()).unwrap();

    write_varint(&mut buf, tx.inputs().len() as u64).unwrap();
    for (i, input) in tx.inputs().iter().enumerate() {
        let script = if i == input_index {
            substitute_script.to_vec()
        } else {
            Vec::new()
        };
        let mut masked = TxInput::new(input.prev_tx_hash, input.prev_index, script);
        masked.sequence = 0xffffffff;
        buf.write_all(&masked.serialize()).unwrap();
    }

    write_varint(&mut buf, tx.outputs().len() as u64).unwrap();
    for output in tx.outputs() {
        buf.write_all(&output.serialize()).unwrap();
    }

    buf.write_all(&tx.lock_time().to_le_bytes()).unwrap();
    buf.write_all(&hash_type.as_u32().to_le_bytes()).unwrap();

    Ok(hash256(&buf))
}
