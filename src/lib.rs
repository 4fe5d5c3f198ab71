//! This crate implements NTSF, a compact binary format for persisting an
//! N-gram prediction tree: a rooted tree whose edges are labeled with
//! words, where a root-to-node path spells out an n-gram and that node's
//! children are its known continuations.
//!
//! Such trees contain massive word repetition (the same vocabulary appears
//! as node labels throughout), so the format factors frequently repeated
//! labels into a shared *word bank* and encodes each node as a
//! self-delimiting, variable-width block that either inlines its label or
//! references the bank.
//!
//! The N-gram tree structure itself, the prediction algorithm on it, and
//! training are outside this crate's scope: [`Node`] is a minimal concrete
//! stand-in for that "external" type, enough to exercise and test the
//! codec.
//!
//! ```
//! use ntsf::Node;
//!
//! let mut root = Node::new("the");
//! root.attach_child(Node::new("quick"));
//! root.attach_child(Node::new("lazy"));
//!
//! let mut buf = Vec::new();
//! ntsf::serialize(&root, &mut buf).unwrap();
//!
//! let mut cursor = std::io::Cursor::new(buf);
//! let decoded = ntsf::deserialize(&mut cursor).unwrap();
//! assert_eq!(decoded, root);
//! ```

mod analyzer;
mod bank;
mod bank_codec;
mod block;
mod byte_width;
mod emitter;
mod error;
mod io_util;
mod node;
mod reconstructor;

pub use bank::{build_bank, WordBank};
pub use error::NtsfError;
pub use node::Node;

use std::io::{Read, Write};

/// Serializes `root` to `w`: builds the word bank, writes its preamble,
/// then walks the tree depth-first writing one node block per node.
///
/// See [`bank::build_bank`] for the bank-selection cost model and
/// [`emitter::serialize_tree`] for the traversal.
pub fn serialize(root: &Node, w: &mut impl Write) -> Result<(), NtsfError> {
    let bank = bank::build_bank(root);
    bank_codec::encode_bank(&bank, w)?;

    let address_map = bank::address_map(&bank);
    emitter::serialize_tree(root, &address_map, w)
}

/// Deserializes a tree from `r`: reads the bank preamble, then reconstructs
/// the tree from the node block stream in a single pass with an O(depth)
/// auxiliary stack.
///
/// See [`reconstructor::deserialize_tree`] for the *deflate-stack*
/// rebuilder.
pub fn deserialize(r: &mut impl Read) -> Result<Node, NtsfError> {
    let bank = bank_codec::decode_bank(r)?;
    reconstructor::deserialize_tree(r, &bank)
}
