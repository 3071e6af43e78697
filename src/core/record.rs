// Dictionary/JSON adapter over the transaction core
//
// The record shape mirrors the classic block-explorer form: scripts as hex
// strings, hashes in reversed display order, values as fixed 8-decimal
// strings. The adapter is a thin boundary layer; all identity derivation
// stays in the core.

use serde::{Serialize, Deserialize};
use crate::core::{Hash256, Transaction, TransactionBuilder, TxError, TxInput, TxOutput};

/// Smallest currency units per displayed whole coin
const UNITS_PER_COIN: u64 = 100_000_000;

/// Previous-output reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrevOutRecord {
    pub hash: String,
    pub n: u32,
}

/// One transaction input
///
/// Carries `coinbase` instead of `scriptSig` when the previous-output index
/// is the coinbase sentinel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputRecord {
    pub prev_out: PrevOutRecord,
    #[serde(rename = "scriptSig", skip_serializing_if = "Option::is_none")]
    pub script_sig: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coinbase: Option<String>,
}

/// One transaction output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputRecord {
    /// Whole-coin amount formatted with 8 decimals, e.g. "50.00000000"
    pub value: String,
    #[serde(rename = "scriptPubKey")]
    pub script_pubkey: String,
}

/// Dictionary form of a transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxRecord {
    pub hash: String,
    pub ver: u32,
    pub vin_sz: u64,
    pub vout_sz: u64,
    pub lock_time: u32,
    pub size: u64,
    #[serde(rename = "in")]
    pub inputs: Vec<InputRecord>,
    pub out: Vec<OutputRecord>,
}

impl Transaction {
    /// Map to the dictionary record form
    pub fn to_record(&self) -> TxRecord {
        let inputs = self
            .inputs()
            .iter()
            .map(|input| {
                let script_hex = hex::encode(&input.script_sig);
                let (script_sig, coinbase) = if input.is_coinbase() {
                    (None, Some(script_hex))
                } else {
                    (Some(script_hex), None)
                };
                InputRecord {
                    prev_out: PrevOutRecord {
                        hash: input.prev_tx_hash.to_hex(),
                        n: input.prev_index,
                    },
                    script_sig,
                    coinbase,
                }
            })
            .collect();

        let out = self
            .outputs()
            .iter()
            .map(|output| OutputRecord {
                value: format_value(output.value),
                script_pubkey: hex::encode(&output.script_pubkey),
            })
            .collect();

        TxRecord {
            hash: self.id().to_hex(),
            ver: self.version(),
            vin_sz: self.inputs().len() as u64,
            vout_sz: self.outputs().len() as u64,
            lock_time: self.lock_time(),
            size: self.size() as u64,
            inputs,
            out,
        }
    }

    /// Serialize the record form to a pretty JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.to_record())
            .expect("record serialization cannot fail")
    }

    /// Rebuild a transaction from its dictionary record
    ///
    /// The wire bytes and identifier are re-derived by finalize; the
    /// record's own `hash`/`size` fields are not trusted.
    pub fn from_record(record: &TxRecord) -> Result<Self, TxError> {
        if record.ver != crate::core::transaction::TX_VERSION {
            return Err(TxError::UnsupportedVersion(record.ver));
        }

        let mut builder = TransactionBuilder::new()
            .version(record.ver)
            .lock_time(record.lock_time);

        for input in &record.inputs {
            let prev_tx_hash = Hash256::from_hex(&input.prev_out.hash)?;
            let script_hex = match (&input.script_sig, &input.coinbase) {
                (Some(hex), None) => hex,
                (None, Some(hex)) => hex,
                _ => {
                    return Err(TxError::MalformedDictionary(
                        "input needs exactly one of scriptSig or coinbase".to_string(),
                    ));
                }
            };
            let script_sig = decode_hex_field(script_hex, "input script")?;
            builder = builder.input(TxInput::new(prev_tx_hash, input.prev_out.n, script_sig));
        }

        for output in &record.out {
            let value = parse_value(&output.value)?;
            let script_pubkey = decode_hex_field(&output.script_pubkey, "output script")?;
            builder = builder.output(TxOutput::new(value, script_pubkey));
        }

        Ok(builder.finalize())
    }

    /// Parse a JSON string into a transaction via the record form
    pub fn from_json(json: &str) -> Result<Self, TxError> {
        let record: TxRecord = serde_json::from_str(json)
            .map_err(|e| TxError::MalformedDictionary(e.to_string()))?;
        Self::from_record(&record)
    }
}

/// Integer units to "%.8f" whole-coin string
fn format_value(value: u64) -> String {
    format!("{}.{:08}", value / UNITS_PER_COIN, value % UNITS_PER_COIN)
}

/// "%.8f" whole-coin string back to integer units
fn parse_value(value: &str) -> Result<u64, TxError> {
    let malformed = || TxError::MalformedDictionary(format!("bad value string: {}", value));

    let (whole, frac) = match value.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (value, ""),
    };
    let whole: u64 = whole.parse().map_err(|_| malformed())?;
    if frac.len() > 8 || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(malformed());
    }
    // Right-pad the fraction to 8 digits
    let frac: u64 = if frac.is_empty() {
        0
    } else {
        frac.parse::<u64>().map_err(|_| malformed())? * 10u64.pow(8 - frac.len() as u32)
    };
    whole
        .checked_mul(UNITS_PER_COIN)
        .and_then(|units| units.checked_add(frac))
        .ok_or_else(malformed)
}

fn decode_hex_field(hex_str: &str, what: &str) -> Result<Vec<u8>, TxError> {
    hex::decode(hex_str)
        .map_err(|e| TxError::MalformedDictionary(format!("bad {} hex: {}", what, e)))
}
