// Transaction data structures and wire codec

use crate::core::{Hash256, TxError, hash256};
use std::io::{Write, Read, Cursor};
use super::serialize::{write_varint, read_varint, write_var_bytes, read_var_bytes};

/// Sentinel previous-output index marking a coinbase input
pub const COINBASE_INDEX: u32 = 0xffffffff;

/// The only wire format version the codec accepts
pub const TX_VERSION: u32 = 1;

/// Transaction input - references a previous transaction output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxInput {
    /// Hash of the previous transaction
    pub prev_tx_hash: Hash256,
    /// Index of the output in the previous transaction
    pub prev_index: u32,
    /// Signature script (scriptSig) - proves ownership
    pub script_sig: Vec<u8>,
    /// Sequence number (usually 0xffffffff)
    pub sequence: u32,
}

impl TxInput {
    /// Create a new transaction input
    pub fn new(prev_tx_hash: Hash256, prev_index: u32, script_sig: Vec<u8>) -> Self {
        Self {
            prev_tx_hash,
            prev_index,
            script_sig,
            sequence: 0xffffffff,
        }
    }

    /// Create a coinbase input carrying arbitrary data instead of a signature
    pub fn coinbase(script_sig: Vec<u8>) -> Self {
        Self {
            prev_tx_hash: Hash256::zero(),
            prev_index: COINBASE_INDEX,
            script_sig,
            sequence: 0xffffffff,
        }
    }

    /// Check if this is a coinbase input
    ///
    /// Classification is by the sentinel index alone; the previous-output
    /// hash is conventionally zero but carries no meaning here.
    pub fn is_coinbase(&self) -> bool {
        self.prev_index == COINBASE_INDEX
    }

    /// Serialize the input
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.write_all(self.prev_tx_hash.as_bytes()).unwrap();
        buf.write_all(&self.prev_index.to_le_bytes()).unwrap();
        write_var_bytes(&mut buf, &self.script_sig).unwrap();
        buf.write_all(&self.sequence.to_le_bytes()).unwrap();
        buf
    }

    /// Deserialize the input
    pub fn deserialize(reader: &mut dyn Read) -> Result<Self, TxError> {
        let mut hash_bytes = [0u8; 32];
        reader.read_exact(&mut hash_bytes).map_err(|_| TxError::TruncatedBuffer)?;
        let prev_tx_hash = Hash256::new(hash_bytes);

        let mut index_bytes = [0u8; 4];
        reader.read_exact(&mut index_bytes).map_err(|_| TxError::TruncatedBuffer)?;
        let prev_index = u32::from_le_bytes(index_bytes);

        let script_sig = read_var_bytes(reader)?;

        let mut sequence_bytes = [0u8; 4];
        reader.read_exact(&mut sequence_bytes).map_err(|_| TxError::TruncatedBuffer)?;
        let sequence = u32::from_le_bytes(sequence_bytes);

        Ok(Self {
            prev_tx_hash,
            prev_index,
            script_sig,
            sequence,
        })
    }
}

/// Transaction output - specifies amount and spending conditions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutput {
    /// Amount in the smallest currency unit
    pub value: u64,
    /// Public key script (scriptPubKey) - specifies conditions for spending
    pub script_pubkey: Vec<u8>,
}

impl TxOutput {
    /// Create a new transaction output
    pub fn new(value: u64, script_pubkey: Vec<u8>) -> Self {
        Self {
            value,
            script_pubkey,
        }
    }

    /// Serialize the output
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.write_all(&self.value.to_le_bytes()).unwrap();
        write_var_bytes(&mut buf, &self.script_pubkey).unwrap();
        buf
    }

    /// Deserialize the output
    pub fn deserialize(reader: &mut dyn Read) -> Result<Self, TxError> {
        let mut value_bytes = [0u8; 8];
        reader.read_exact(&mut value_bytes).map_err(|_| TxError::TruncatedBuffer)?;
        let value = u64::from_le_bytes(value_bytes);

        let script_pubkey = read_var_bytes(reader)?;

        Ok(Self {
            value,
            script_pubkey,
        })
    }
}

/// Transaction
///
/// Immutable once constructed: the identifier is derived from the exact wire
/// bytes at decode or finalize time, and no field can change afterwards
/// without going back through a builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    version: u32,
    inputs: Vec<TxInput>,
    outputs: Vec<TxOutput>,
    lock_time: u32,
    /// Exact wire bytes, from the first version byte through lock_time
    raw: Vec<u8>,
    /// Double SHA256 of `raw`
    id: Hash256,
}

impl Transaction {
    /// Create a transaction from inputs and outputs with default version and
    /// lock time
    pub fn new(inputs: Vec<TxInput>, outputs: Vec<TxOutput>) -> Self {
        let mut builder = TransactionBuilder::new();
        for input in inputs {
            builder = builder.input(input);
        }
        for output in outputs {
            builder = builder.output(output);
        }
        builder.finalize()
    }

    /// Create a coinbase transaction
    pub fn coinbase(script_sig: Vec<u8>, output: TxOutput) -> Self {
        Self::new(vec![TxInput::coinbase(script_sig)], vec![output])
    }

    /// Decode one transaction from the front of `data`
    ///
    /// Returns the transaction and the unconsumed remainder, so a
    /// concatenated stream of transactions (e.g. a block body) can be decoded
    /// by calling this repeatedly. Decoding either fully succeeds or yields
    /// an error without publishing a partial transaction.
    pub fn decode(data: &[u8]) -> Result<(Self, &[u8]), TxError> {
        let mut cursor = Cursor::new(data);

        // Version
        let mut version_bytes = [0u8; 4];
        cursor.read_exact(&mut version_bytes).map_err(|_| TxError::TruncatedBuffer)?;
        let version = u32::from_le_bytes(version_bytes);
        if version != TX_VERSION {
            return Err(TxError::UnsupportedVersion(version));
        }

        // Inputs
        let input_count = read_varint(&mut cursor)? as usize;
        let mut inputs = Vec::with_capacity(input_count.min(1024));
        for _ in 0..input_count {
            inputs.push(TxInput::deserialize(&mut cursor)?);
        }

        // Outputs
        let output_count = read_varint(&mut cursor)? as usize;
        let mut outputs = Vec::with_capacity(output_count.min(1024));
        for _ in 0..output_count {
            outputs.push(TxOutput::deserialize(&mut cursor)?);
        }

        // Lock time
        let mut lock_time_bytes = [0u8; 4];
        cursor.read_exact(&mut lock_time_bytes).map_err(|_| TxError::TruncatedBuffer)?;
        let lock_time = u32::from_le_bytes(lock_time_bytes);

        let consumed = cursor.position() as usize;
        let raw = data[..consumed].to_vec();
        let id = hash256(&raw);

        let tx = Self {
            version,
            inputs,
            outputs,
            lock_time,
            raw,
            id,
        };
        Ok((tx, &data[consumed..]))
    }

    /// Serialize the transaction fields into wire bytes
    ///
    /// For a transaction produced by decode this reproduces `raw_bytes`
    /// byte for byte.
    pub fn encode(&self) -> Vec<u8> {
        serialize_fields(self.version, &self.inputs, &self.outputs, self.lock_time)
    }

    /// Transaction version
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Ordered inputs
    pub fn inputs(&self) -> &[TxInput] {
        &self.inputs
    }

    /// Ordered outputs
    pub fn outputs(&self) -> &[TxOutput] {
        &self.outputs
    }

    /// Lock time, carried through unchanged
    pub fn lock_time(&self) -> u32 {
        self.lock_time
    }

    /// Exact wire bytes this transaction was decoded from or finalized to
    pub fn raw_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// Wire size in bytes
    pub fn size(&self) -> usize {
        self.raw.len()
    }

    /// Canonical identifier: double SHA256 of the wire bytes
    pub fn id(&self) -> Hash256 {
        self.id
    }

    /// Check if this is a coinbase transaction
    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].is_coinbase()
    }

    /// Total output value
    pub fn total_output_value(&self) -> u64 {
        self.outputs.iter().map(|out| out.value).sum()
    }
}

fn serialize_fields(
    version: u32,
    inputs: &[TxInput],
    outputs: &[TxOutput],
    lock_time: u32,
) -> Vec<u8> {
    let mut buf = Vec::new();

    buf.write_all(&version.to_le_bytes()).unwrap();

    write_varint(&mut buf, inputs.len() as u64).unwrap();
    for input in inputs {
        buf.write_all(&input.serialize()).unwrap();
    }

    write_varint(&mut buf, outputs.len() as u64).unwrap();
    for output in outputs {
        buf.write_all(&output.serialize()).unwrap();
    }

    buf.write_all(&lock_time.to_le_bytes()).unwrap();

    buf
}

/// Incremental transaction assembly
///
/// Fields are collected mutably, then `finalize` serializes them once and
/// derives the identifier, yielding the immutable Transaction. There is no
/// way to obtain a transaction whose identifier has not been derived.
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    version: u32,
    inputs: Vec<TxInput>,
    outputs: Vec<TxOutput>,
    lock_time: u32,
}

impl TransactionBuilder {
    /// Start a builder with default version and zero lock time
    pub fn new() -> Self {
        Self {
            version: TX_VERSION,
            inputs: Vec::new(),
            outputs: Vec::new(),
            lock_time: 0,
        }
    }

    /// Set the transaction version
    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Set the lock time
    pub fn lock_time(mut self, lock_time: u32) -> Self {
        self.lock_time = lock_time;
        self
    }

    /// Append an input
    pub fn input(mut self, input: TxInput) -> Self {
        self.inputs.push(input);
        self
    }

    /// Append an output
    pub fn output(mut self, output: TxOutput) -> Self {
        self.outputs.push(output);
        self
    }

    /// Serialize the assembled fields and derive the identifier
    pub fn finalize(self) -> Transaction {
        let raw = serialize_fields(self.version, &self.inputs, &self.outputs, self.lock_time);
        let id = hash256(&raw);
        Transaction {
            version: self.version,
            inputs: self.inputs,
            outputs: self.outputs,
            lock_time: self.lock_time,
            raw,
            id,
        }
    }
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hand-built wire bytes: 1 coinbase input, 1 output, lock_time 0
    fn coinbase_wire(script_sig: &[u8], value: u64, script_pubkey: &[u8]) -> Vec<u8> {
        let mut wire = Vec::new();
        wire.extend_from_slice(&1u32.to_le_bytes()); // version
        wire.push(1); // input count
        wire.extend_from_slice(&[0u8; 32]); // prev hash
        wire.extend_from_slice(&0xffffffffu32.to_le_bytes()); // prev index
        wire.push(script_sig.len() as u8);
        wire.extend_from_slice(script_sig);
        wire.extend_from_slice(&0xffffffffu32.to_le_bytes()); // sequence
        wire.push(1); // output count
        wire.extend_from_slice(&value.to_le_bytes());
        wire.push(script_pubkey.len() as u8);
        wire.extend_from_slice(script_pubkey);
        wire.extend_from_slice(&0u32.to_le_bytes()); // lock time
        wire
    }

    #[test]
    fn test_coinbase_input() {
        let input = TxInput::coinbase(vec![1, 2, 3]);
        assert!(input.is_coinbase());
        assert_eq!(input.prev_tx_hash, Hash256::zero());
        assert_eq!(input.prev_index, COINBASE_INDEX);
    }

    #[test]
    fn test_coinbase_classified_by_index_only() {
        // A non-zero previous hash with the sentinel index is still coinbase
        let input = TxInput::new(Hash256::new([7; 32]), COINBASE_INDEX, vec![]);
        assert!(input.is_coinbase());

        let input = TxInput::new(Hash256::zero(), 0, vec![]);
        assert!(!input.is_coinbase());
    }

    #[test]
    fn test_decode_coinbase_transaction() {
        let wire = coinbase_wire(&[0xaa, 0xbb], 5_000_000_000, &[4, 5, 6]);
        let (tx, rest) = Transaction::decode(&wire).unwrap();

        assert!(rest.is_empty());
        assert_eq!(tx.version(), 1);
        assert_eq!(tx.inputs().len(), 1);
        assert_eq!(tx.outputs().len(), 1);
        assert_eq!(tx.lock_time(), 0);
        assert!(tx.is_coinbase());
        assert_eq!(tx.inputs()[0].script_sig, vec![0xaa, 0xbb]);
        assert_eq!(tx.outputs()[0].value, 5_000_000_000);
        assert_eq!(tx.raw_bytes(), &wire[..]);
        assert_eq!(tx.size(), wire.len());
    }

    #[test]
    fn test_roundtrip_matches_raw_bytes() {
        let wire = coinbase_wire(&[1, 2, 3], 42, &[9; 30]);
        let (tx, _) = Transaction::decode(&wire).unwrap();
        assert_eq!(tx.encode(), tx.raw_bytes());
    }

    #[test]
    fn test_roundtrip_long_script() {
        // Script over 252 bytes forces a 3-byte varint length prefix
        let script = vec![0x51u8; 300];
        let tx = Transaction::new(
            vec![TxInput::new(Hash256::new([1; 32]), 0, script.clone())],
            vec![TxOutput::new(1000, vec![4, 5, 6])],
        );

        let (decoded, rest) = Transaction::decode(tx.raw_bytes()).unwrap();
        assert!(rest.is_empty());
        assert_eq!(decoded, tx);
        assert_eq!(decoded.inputs()[0].script_sig, script);
        assert_eq!(decoded.encode(), tx.raw_bytes());
    }

    #[test]
    fn test_decode_concatenated_stream() {
        let first = coinbase_wire(&[1], 10, &[2]);
        let second = coinbase_wire(&[3], 20, &[4]);
        let mut stream = first.clone();
        stream.extend_from_slice(&second);

        let (tx1, rest) = Transaction::decode(&stream).unwrap();
        assert_eq!(tx1.raw_bytes(), &first[..]);
        assert_eq!(rest, &second[..]);

        let (tx2, rest) = Transaction::decode(rest).unwrap();
        assert_eq!(tx2.raw_bytes(), &second[..]);
        assert!(rest.is_empty());
        assert_ne!(tx1.id(), tx2.id());
    }

    #[test]
    fn test_decode_rejects_unsupported_version() {
        let mut wire = coinbase_wire(&[], 1, &[]);
        wire[0] = 2;
        assert_eq!(
            Transaction::decode(&wire),
            Err(TxError::UnsupportedVersion(2))
        );
    }

    #[test]
    fn test_decode_truncated() {
        let wire = coinbase_wire(&[1, 2, 3], 42, &[7, 8]);

        // Every proper prefix must fail, never panic or succeed
        for cut in 0..wire.len() {
            let result = Transaction::decode(&wire[..cut]);
            assert!(result.is_err(), "prefix of {} bytes decoded", cut);
        }
    }

    #[test]
    fn test_id_is_reversed_double_sha256_of_raw() {
        let wire = coinbase_wire(&[1], 7, &[2]);
        let (tx, _) = Transaction::decode(&wire).unwrap();

        let expected = crate::core::hash256(&wire);
        assert_eq!(tx.id(), expected);

        // Display form is the reversed-hex convention
        let mut reversed = *expected.as_bytes();
        reversed.reverse();
        assert_eq!(tx.id().to_hex(), hex::encode(reversed));
    }

    #[test]
    fn test_id_stability() {
        let wire = coinbase_wire(&[1], 7, &[2]);
        let (tx, _) = Transaction::decode(&wire).unwrap();
        let id = tx.id();

        // Identifier is a pure function of the wire bytes
        let (again, _) = Transaction::decode(&wire).unwrap();
        assert_eq!(again.id(), id);
    }

    #[test]
    fn test_builder_matches_decode() {
        let tx = TransactionBuilder::new()
            .input(TxInput::coinbase(vec![0xaa, 0xbb]))
            .output(TxOutput::new(5_000_000_000, vec![4, 5, 6]))
            .finalize();

        let wire = coinbase_wire(&[0xaa, 0xbb], 5_000_000_000, &[4, 5, 6]);
        assert_eq!(tx.raw_bytes(), &wire[..]);

        let (decoded, _) = Transaction::decode(&wire).unwrap();
        assert_eq!(decoded.id(), tx.id());
    }

    #[test]
    fn test_builder_lock_time_and_version() {
        let tx = TransactionBuilder::new()
            .lock_time(500_000)
            .input(TxInput::coinbase(vec![]))
            .output(TxOutput::new(1, vec![]))
            .finalize();

        assert_eq!(tx.lock_time(), 500_000);
        assert_eq!(tx.version(), TX_VERSION);

        let (decoded, _) = Transaction::decode(tx.raw_bytes()).unwrap();
        assert_eq!(decoded.lock_time(), 500_000);
    }

    #[test]
    fn test_total_output_value() {
        let tx = Transaction::new(
            vec![TxInput::coinbase(vec![])],
            vec![TxOutput::new(30, vec![]), TxOutput::new(12, vec![])],
        );
        assert_eq!(tx.total_output_value(), 42);
    }
}
