use crate::analyzer::repeated_labels;
use crate::byte_width::byte_width;
use crate::Node;
use std::collections::HashMap;
use std::convert::TryFrom;

/// The largest label length the wire format can represent: the bank's
/// per-entry length field is a single `u8`, so 255 is the true ceiling
/// (the cost-filter text in the format talks about 256, but the length
/// field itself caps entries at 255, see `DESIGN.md`).
pub const MAX_LABEL_LEN: usize = 255;

/// An ordered sequence of unique ASCII strings, factored out of a tree
/// because they repeat often enough to be worth a shared table entry.
///
/// Position in the sequence is the entry's stable address within a given
/// file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordBank(Vec<String>);

/// A label's address within a [`WordBank`], materialized once per serialize.
pub type AddressMap<'a> = HashMap<&'a str, u64>;

impl WordBank {
    /// The bank entries, in address order.
    pub fn entries(&self) -> &[String] {
        &self.0
    }

    /// Number of entries in the bank.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the bank holds no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The label stored at `address`, if any.
    pub fn get(&self, address: u64) -> Option<&str> {
        usize::try_from(address)
            .ok()
            .and_then(|i| self.0.get(i))
            .map(String::as_str)
    }

    pub(crate) fn from_entries(entries: Vec<String>) -> Self {
        Self(entries)
    }
}

/// Builds the word bank for `root`.
///
/// A pure function of the tree: repeated calls over structurally equal
/// trees produce identical ordered banks (the *bank determinism*
/// property).
///
/// Entries are sorted ascending by length so that short, highly
/// compressible strings get small addresses, with ties broken by label
/// content (plain lexical order), not by the order `repeated_labels` happens
/// to emit them in: that order comes out of a `HashMap` and is randomized
/// per run, so breaking ties on it would make the bank, and thus the whole
/// serialized file, nondeterministic across calls on the same tree.
///
/// After sorting, the cost filter is applied left to right: a label
/// considered at the *current* bank length (its prospective address were
/// it admitted) is kept only if `bytewidth(address) + 2 < length(label)`.
/// Because skipping a label can only shrink the prospective address of
/// everything after it, and `bytewidth` is non-decreasing in its argument,
/// a single left-to-right pass already re-evaluates every later label
/// against its true post-removal position.
pub fn build_bank(root: &Node) -> WordBank {
    let mut candidates = repeated_labels(root);
    candidates.sort_by(|a, b| a.0.len().cmp(&b.0.len()).then_with(|| a.0.cmp(&b.0)));

    let mut kept: Vec<String> = Vec::new();
    for (label, _count) in candidates {
        if label.len() > MAX_LABEL_LEN {
            continue;
        }
        let address = kept.len() as u64;
        let overhead = byte_width(address) as usize + 2;
        if overhead < label.len() {
            kept.push(label);
        }
    }

    WordBank(kept)
}

/// Materializes the address of every entry in `bank`.
pub fn address_map(bank: &WordBank) -> AddressMap<'_> {
    bank.0
        .iter()
        .enumerate()
        .map(|(address, label)| (label.as_str(), address as u64))
        .collect()
}
