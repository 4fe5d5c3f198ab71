use crate::bank::{AddressMap, WordBank, MAX_LABEL_LEN};
use crate::byte_width::byte_width;
use crate::error::NtsfError;
use crate::io_util::{read_be, read_u8, try_read_u8, write_be};
use std::io::{Read, Write};

/// The top two bits of a node block's first byte distinguish inline label
/// bytes (`0x`, both `00` and `01`) from the two marker kinds.
const END_OF_LABEL_TAG: u8 = 0b1000_0000;
const REFERENCE_TAG: u8 = 0b1100_0000;
const TAG_MASK: u8 = 0b1100_0000;
const WIDTH_MASK: u8 = 0b0011_1111;

/// A node block, fully decoded: its resolved label (inline or looked up in
/// the bank) and its declared child count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBlock {
    pub label: String,
    pub n_children: u64,
}

/// Writes a node as a reference or standard block, depending on whether its
/// label is present in `address_map`.
pub fn encode_node(
    label: &str,
    n_children: u64,
    address_map: &AddressMap<'_>,
    w: &mut impl Write,
) -> Result<(), NtsfError> {
    match address_map.get(label) {
        Some(&address) => write_reference_block(address, n_children, w),
        None => write_standard_block(label, n_children, w),
    }
}

/// Writes an inline (standard) block: the label's ASCII bytes followed by
/// the end-of-label marker and child count.
pub fn write_standard_block(label: &str, n_children: u64, w: &mut impl Write) -> Result<(), NtsfError> {
    if label.len() > MAX_LABEL_LEN {
        return Err(NtsfError::LabelTooLong);
    }
    if label.as_bytes().iter().any(|&b| b >= 0x80) {
        return Err(NtsfError::NonAscii);
    }
    w.write_all(label.as_bytes())?;
    write_end_of_label(n_children, w)
}

/// Writes a bank-reference block: the reference marker and address,
/// followed by the end-of-label marker and child count.
pub fn write_reference_block(address: u64, n_children: u64, w: &mut impl Write) -> Result<(), NtsfError> {
    let width_addr = byte_width(address);
    if width_addr > 63 {
        return Err(NtsfError::OverflowChildren);
    }
    w.write_all(&[REFERENCE_TAG | width_addr])?;
    write_be(w, address, width_addr)?;
    write_end_of_label(n_children, w)
}

fn write_end_of_label(n_children: u64, w: &mut impl Write) -> Result<(), NtsfError> {
    let width_nc = byte_width(n_children);
    if width_nc > 63 {
        return Err(NtsfError::OverflowChildren);
    }
    w.write_all(&[END_OF_LABEL_TAG | width_nc])?;
    write_be(w, n_children, width_nc)
}

/// Reads the next node block from `r`, resolving bank references against
/// `bank`.
///
/// Returns `Ok(None)` when the stream is cleanly exhausted at a block
/// boundary (no bytes were consumed for this call). Any error, or a byte
/// consumed without a complete block following it, surfaces as the
/// appropriate [`NtsfError`].
pub fn decode_node_block(r: &mut impl Read, bank: &WordBank) -> Result<Option<DecodedBlock>, NtsfError> {
    let first = match try_read_u8(r)? {
        Some(b) => b,
        None => return Ok(None),
    };

    if first & TAG_MASK == REFERENCE_TAG {
        let width_addr = first & WIDTH_MASK;
        let address = read_be(r, width_addr)?;
        let label = bank
            .get(address)
            .ok_or(NtsfError::BadAddress(address))?
            .to_owned();
        let n_children = read_end_of_label(r)?;
        return Ok(Some(DecodedBlock { label, n_children }));
    }

    if first & TAG_MASK == END_OF_LABEL_TAG {
        // An end-of-label marker with no preceding label bytes: there is no
        // block grammar production that starts this way.
        return Err(NtsfError::Malformed);
    }

    let mut label_bytes = vec![first];
    loop {
        let b = read_u8(r)?;
        if b < 0x80 {
            label_bytes.push(b);
            if label_bytes.len() > MAX_LABEL_LEN {
                return Err(NtsfError::LabelTooLong);
            }
            continue;
        }
        if b & TAG_MASK == END_OF_LABEL_TAG {
            let width_nc = b & WIDTH_MASK;
            let n_children = read_be(r, width_nc)?;
            let label = String::from_utf8(label_bytes).expect("validated ASCII above");
            return Ok(Some(DecodedBlock { label, n_children }));
        }
        // A reference marker can only begin a block, never interrupt an
        // inline label.
        return Err(NtsfError::Malformed);
    }
}

fn read_end_of_label(r: &mut impl Read) -> Result<u64, NtsfError> {
    let marker = read_u8(r)?;
    if marker & TAG_MASK != END_OF_LABEL_TAG {
        return Err(NtsfError::Malformed);
    }
    read_be(r, marker & WIDTH_MASK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::WordBank;
    use std::collections::HashMap;
    use std::io::Cursor;

    #[test]
    fn standard_block_matches_wire_form() {
        let mut buf = Vec::new();
        write_standard_block("root", 2, &mut buf).unwrap();
        assert_eq!(buf, [0x72, 0x6F, 0x6F, 0x74, 0x81, 0x02]);
    }

    #[test]
    fn reference_block_small_address() {
        let mut buf = Vec::new();
        write_reference_block(8, 2, &mut buf).unwrap();
        assert_eq!(buf, [0xC1, 0x08, 0x81, 0x02]);
    }

    #[test]
    fn reference_block_big_address() {
        let mut buf = Vec::new();
        write_reference_block(13000, 2, &mut buf).unwrap();
        assert_eq!(buf, [0xC2, 0x32, 0xC8, 0x81, 0x02]);
    }

    #[test]
    fn reference_block_zero_address_has_no_address_bytes() {
        let mut buf = Vec::new();
        write_reference_block(0, 2, &mut buf).unwrap();
        assert_eq!(buf, [0xC0, 0x81, 0x02]);
    }

    #[test]
    fn standard_block_round_trips() {
        let mut buf = Vec::new();
        write_standard_block("continuation", 3, &mut buf).unwrap();

        let bank = WordBank::default();
        let mut cursor = Cursor::new(buf);
        let decoded = decode_node_block(&mut cursor, &bank).unwrap().unwrap();
        assert_eq!(decoded.label, "continuation");
        assert_eq!(decoded.n_children, 3);
    }

    #[test]
    fn reference_block_resolves_against_bank() {
        let bank = WordBank::from_entries(vec!["con".to_owned(), "continuation".to_owned()]);
        let mut buf = Vec::new();
        write_reference_block(1, 0, &mut buf).unwrap();

        let mut cursor = Cursor::new(buf);
        let decoded = decode_node_block(&mut cursor, &bank).unwrap().unwrap();
        assert_eq!(decoded.label, "continuation");
        assert_eq!(decoded.n_children, 0);
    }

    #[test]
    fn out_of_range_address_is_bad_address() {
        let bank = WordBank::default();
        let mut buf = Vec::new();
        write_reference_block(0, 0, &mut buf).unwrap();

        let mut cursor = Cursor::new(buf);
        assert!(matches!(
            decode_node_block(&mut cursor, &bank),
            Err(NtsfError::BadAddress(0))
        ));
    }

    #[test]
    fn clean_eof_at_boundary_is_none() {
        let bank = WordBank::default();
        let mut cursor = Cursor::new(Vec::<u8>::new());
        assert_eq!(decode_node_block(&mut cursor, &bank).unwrap(), None);
    }

    #[test]
    fn flipped_marker_bits_never_silently_misparse() {
        // A reference marker whose end-of-label byte has been corrupted to
        // a plain ASCII byte: the block now looks truncated, never a
        // different valid block.
        let bank = WordBank::from_entries(vec!["x".to_owned()]);
        let mut cursor = Cursor::new(vec![0xC0u8, 0x41]);
        assert!(matches!(
            decode_node_block(&mut cursor, &bank),
            Err(NtsfError::Malformed)
        ));
    }

    #[test]
    fn encode_node_prefers_bank_reference() {
        let mut map: AddressMap<'_> = HashMap::new();
        map.insert("continuation", 0);

        let mut buf = Vec::new();
        encode_node("continuation", 1, &map, &mut buf).unwrap();
        assert_eq!(buf, [0xC0, 0x81, 0x01]);
    }
}
