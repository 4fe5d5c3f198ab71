use crate::error::NtsfError;
use std::io::{self, Read, Write};

/// Reads a single byte, distinguishing a clean end-of-stream (`Ok(None)`,
/// zero bytes available) from a stream that still has data but not enough
/// to satisfy a later fixed-size read.
pub fn try_read_u8(r: &mut impl Read) -> Result<Option<u8>, NtsfError> {
    let mut buf = [0u8; 1];
    loop {
        match r.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(NtsfError::Io(e)),
        }
    }
}

/// Reads a single byte, treating end-of-stream as [`NtsfError::Truncated`].
pub fn read_u8(r: &mut impl Read) -> Result<u8, NtsfError> {
    try_read_u8(r)?.ok_or(NtsfError::Truncated)
}

/// Reads exactly `len` bytes, treating a short read as
/// [`NtsfError::Truncated`].
pub fn read_exact_vec(r: &mut impl Read, len: usize) -> Result<Vec<u8>, NtsfError> {
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => NtsfError::Truncated,
        _ => NtsfError::Io(e),
    })?;
    Ok(buf)
}

/// Reads a `width`-byte big-endian integer. `width == 0` means the value is
/// `0` and occupies no bytes.
pub fn read_be(r: &mut impl Read, width: u8) -> Result<u64, NtsfError> {
    if width == 0 {
        return Ok(0);
    }
    let bytes = read_exact_vec(r, width as usize)?;
    Ok(bytes.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b)))
}

/// Writes `value` as a `width`-byte big-endian integer. `width == 0` writes
/// nothing (the value must be `0`).
pub fn write_be(w: &mut impl Write, value: u64, width: u8) -> Result<(), NtsfError> {
    if width == 0 {
        return Ok(());
    }
    let full = value.to_be_bytes();
    let start = full.len() - width as usize;
    w.write_all(&full[start..])?;
    Ok(())
}
