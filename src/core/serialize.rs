// Wire serialization utilities

use std::io::{self, Read, Write};
use crate::core::TxError;

/// Write a variable-length integer (VarInt)
/// The smallest width that represents the value is always chosen
pub fn write_varint<W: Write>(writer: &mut W, value: u64) -> io::Result<()> {
    match value {
        0..=0xfc => {
            writer.write_all(&[value as u8])?;
        }
        0xfd..=0xffff => {
            writer.write_all(&[0xfd])?;
            writer.write_all(&(value as u16).to_le_bytes())?;
        }
        0x10000..=0xffffffff => {
            writer.write_all(&[0xfe])?;
            writer.write_all(&(value as u32).to_le_bytes())?;
        }
        _ => {
            writer.write_all(&[0xff])?;
            writer.write_all(&value.to_le_bytes())?;
        }
    }
    Ok(())
}

/// Read a variable-length integer (VarInt)
///
/// A missing first byte is a truncation; a prefix whose promised value bytes
/// are missing is a malformed varint. Non-canonical encodings are accepted.
pub fn read_varint<R: Read + ?Sized>(reader: &mut R) -> Result<u64, TxError> {
    let mut first_byte = [0u8; 1];
    reader
        .read_exact(&mut first_byte)
        .map_err(|_| TxError::TruncatedBuffer)?;

    match first_byte[0] {
        0..=0xfc => Ok(first_byte[0] as u64),
        0xfd => {
            let mut bytes = [0u8; 2];
            reader.read_exact(&mut bytes).map_err(|_| TxError::InvalidVarint)?;
            Ok(u16::from_le_bytes(bytes) as u64)
        }
        0xfe => {
            let mut bytes = [0u8; 4];
            reader.read_exact(&mut bytes).map_err(|_| TxError::InvalidVarint)?;
            Ok(u32::from_le_bytes(bytes) as u64)
        }
        0xff => {
            let mut bytes = [0u8; 8];
            reader.read_exact(&mut bytes).map_err(|_| TxError::InvalidVarint)?;
            Ok(u64::from_le_bytes(bytes))
        }
    }
}

/// Write bytes with length prefix (VarInt length + data)
pub fn write_var_bytes<W: Write>(writer: &mut W, data: &[u8]) -> io::Result<()> {
    write_varint(writer, data.len() as u64)?;
    writer.write_all(data)?;
    Ok(())
}

/// Read bytes with length prefix
///
/// The read is bounded by the declared length, so an oversized prefix fails
/// without a matching allocation.
pub fn read_var_bytes<R: Read + ?Sized>(reader: &mut R) -> Result<Vec<u8>, TxError> {
    let len = read_varint(reader)?;
    let mut data = Vec::new();
    (&mut *reader)
        .take(len)
        .read_to_end(&mut data)
        .map_err(|_| TxError::TruncatedBuffer)?;
    if data.len() as u64 != len {
        return Err(TxError::TruncatedBuffer);
    }
    Ok(data)
}
