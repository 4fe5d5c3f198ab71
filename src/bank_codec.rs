use crate::bank::{WordBank, MAX_LABEL_LEN};
use crate::error::NtsfError;
use crate::io_util::{read_exact_vec, read_u8};
use std::io::{Read, Write};

/// Writes the bank preamble: each entry as `[len: u8][ascii bytes]`,
/// followed by a single `0x00` terminator.
pub fn encode_bank(bank: &WordBank, w: &mut impl Write) -> Result<(), NtsfError> {
    for entry in bank.entries() {
        if entry.len() > MAX_LABEL_LEN {
            return Err(NtsfError::LabelTooLong);
        }
        if !entry.is_ascii() {
            return Err(NtsfError::NonAscii);
        }
        w.write_all(&[entry.len() as u8])?;
        w.write_all(entry.as_bytes())?;
    }
    w.write_all(&[0u8])?;
    Ok(())
}

/// Reads the bank preamble, stopping at the `0x00` terminator.
///
/// Fails with [`NtsfError::Truncated`] if the stream ends mid-entry.
pub fn decode_bank(r: &mut impl Read) -> Result<WordBank, NtsfError> {
    let mut entries = Vec::new();
    loop {
        let len = read_u8(r)?;
        if len == 0 {
            return Ok(WordBank::from_entries(entries));
        }
        let bytes = read_exact_vec(r, len as usize)?;
        if bytes.iter().any(|&b| b >= 0x80) {
            return Err(NtsfError::NonAscii);
        }
        // Safe: just verified every byte is < 0x80.
        entries.push(String::from_utf8(bytes).expect("validated ASCII"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_single_entry() {
        let bank = WordBank::from_entries(vec!["word".to_owned()]);
        let mut buf = Vec::new();
        encode_bank(&bank, &mut buf).unwrap();
        assert_eq!(buf, [0x04, 0x77, 0x6F, 0x72, 0x64, 0x00]);
    }

    #[test]
    fn empty_bank_is_just_the_terminator() {
        let bank = WordBank::default();
        let mut buf = Vec::new();
        encode_bank(&bank, &mut buf).unwrap();
        assert_eq!(buf, [0x00]);
    }

    #[test]
    fn round_trip_several_entries() {
        let bank = WordBank::from_entries(vec!["con".to_owned(), "continuation".to_owned()]);
        let mut buf = Vec::new();
        encode_bank(&bank, &mut buf).unwrap();

        let mut cursor = std::io::Cursor::new(buf);
        let decoded = decode_bank(&mut cursor).unwrap();
        assert_eq!(decoded.entries(), bank.entries());
    }

    #[test]
    fn truncated_entry_is_an_error() {
        // len byte says 4 but only 2 bytes follow, no terminator.
        let mut cursor = std::io::Cursor::new(vec![0x04, b'w', b'o']);
        assert!(matches!(decode_bank(&mut cursor), Err(NtsfError::Truncated)));
    }

    #[test]
    fn no_terminator_is_truncated() {
        let mut cursor = std::io::Cursor::new(vec![0x01, b'w']);
        assert!(matches!(decode_bank(&mut cursor), Err(NtsfError::Truncated)));
    }
}
