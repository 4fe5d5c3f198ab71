use std::fmt;
use std::io;

/// The error type used when encoding or decoding an NTSF stream fails.
#[derive(Debug)]
pub enum NtsfError {
    /// The underlying stream failed to read or write.
    Io(io::Error),

    /// The stream ended mid-entry, mid-block, or with a non-empty frame
    /// stack.
    Truncated,

    /// A reference marker was not followed by an end-of-label marker, label
    /// bytes were found where a marker was required, or a block arrived
    /// with nowhere left to attach it.
    Malformed,

    /// A bank address was not in `0..bankSize`.
    BadAddress(u64),

    /// A label byte `>= 0x80` was found in a label position.
    NonAscii,

    /// A child count required a width field wider than 63 bytes.
    OverflowChildren,

    /// A label was longer than 255 bytes.
    LabelTooLong,

    /// The stream contained no node blocks after the bank.
    Empty,
}

impl fmt::Display for NtsfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use NtsfError::*;

        match self {
            Io(e) => write!(f, "i/o error: {}", e),
            Truncated => write!(f, "stream ended before the tree was fully decoded"),
            Malformed => write!(f, "stream contained an ill-formed node block"),
            BadAddress(addr) => write!(f, "bank address {} is out of range", addr),
            NonAscii => write!(f, "label contained a non-ASCII byte"),
            OverflowChildren => write!(f, "child count requires a width field over 63 bytes"),
            LabelTooLong => write!(f, "label is longer than 255 bytes"),
            Empty => write!(f, "stream contained no node blocks"),
        }
    }
}

impl std::error::Error for NtsfError {}

impl From<io::Error> for NtsfError {
    fn from(e: io::Error) -> Self {
        NtsfError::Io(e)
    }
}
