// Basic types for the transaction codec

use std::fmt;

/// 256-bit hash type (32 bytes)
/// Used for transaction identifiers, previous-output hashes, and signature digests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    /// Create a new Hash256 from a byte array
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the hash as a byte slice
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Create zero hash (used as the previous-output hash of coinbase inputs)
    pub fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Convert to hex string (reversed, network display convention)
    pub fn to_hex(&self) -> String {
        let mut reversed = self.0;
        reversed.reverse();
        hex::encode(reversed)
    }

    /// Create from hex string (expects reversed byte order)
    pub fn from_hex(hex_str: &str) -> Result<Self, TxError> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| TxError::MalformedDictionary(format!("invalid hex string: {}", e)))?;
        if bytes.len() != 32 {
            return Err(TxError::MalformedDictionary(format!(
                "invalid hash length: expected 32, got {}",
                bytes.len()
            )));
        }
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&bytes);
        hash.reverse();
        Ok(Self(hash))
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Transaction codec error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxError {
    /// Transaction version other than 1
    UnsupportedVersion(u32),
    /// A fixed-width or length-prefixed read exceeds the remaining bytes
    TruncatedBuffer,
    /// A varint prefix promises more value bytes than the buffer holds
    InvalidVarint,
    /// Dictionary record missing required fields or carrying unparsable strings
    MalformedDictionary(String),
    /// Input index addresses no input of the transaction
    InputIndexOutOfRange(usize),
}

impl fmt::Display for TxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TxError::UnsupportedVersion(v) => write!(f, "unsupported transaction version {}", v),
            TxError::TruncatedBuffer => write!(f, "buffer too short"),
            TxError::InvalidVarint => write!(f, "malformed varint"),
            TxError::MalformedDictionary(msg) => write!(f, "malformed dictionary: {}", msg),
            TxError::InputIndexOutOfRange(i) => write!(f, "input index {} out of range", i),
        }
    }
}

impl std::error::Error for TxError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash256_creation() {
        let hash = Hash256::new([1u8; 32]);
        assert_eq!(hash.as_bytes(), &[1u8; 32]);
    }

    #[test]
    fn test_hash256_zero() {
        let zero = Hash256::zero();
        assert_eq!(zero.as_bytes(), &[0u8; 32]);
    }

    #[test]
    fn test_hash256_hex_roundtrip() {
        let hash = Hash256::new([0x12, 0x34, 0x56, 0x78, 0x9a, 0xbc, 0xde, 0xf0,
                                 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88,
                                 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff, 0x00,
                                 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08]);
        let hex = hash.to_hex();
        let decoded = Hash256::from_hex(&hex).unwrap();
        assert_eq!(hash, decoded);
    }

    #[test]
    fn test_hash256_hex_is_reversed() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0xab;
        let hash = Hash256::new(bytes);
        // First byte of the value is the last byte of the display form
        assert!(hash.to_hex().ends_with("ab"));
    }

    #[test]
    fn test_from_hex_rejects_bad_length() {
        assert!(Hash256::from_hex("abcd").is_err());
        assert!(Hash256::from_hex("zz").is_err());
    }
}
