use crate::bank::AddressMap;
use crate::block::encode_node;
use crate::error::NtsfError;
use crate::Node;
use std::io::Write;

/// Writes the pre-order sequence of node blocks for the tree rooted at
/// `root`.
///
/// Traversal uses an explicit stack rather than host-language recursion, so
/// peak memory is O(depth) and independent of the call-stack limit: N-gram
/// trees can get deep enough for that to matter.
///
/// Children are pushed in reverse, so that the first child popped (and
/// thus the first one written) is the first child in the node's own
/// ordering. The reconstructor attaches blocks to their parent strictly in
/// arrival order, so this is the only push order that round-trips.
pub fn serialize_tree(root: &Node, address_map: &AddressMap<'_>, w: &mut impl Write) -> Result<(), NtsfError> {
    let mut stack: Vec<&Node> = vec![root];

    while let Some(node) = stack.pop() {
        encode_node(node.label(), node.child_count() as u64, address_map, w)?;
        for child in node.children().iter().rev() {
            stack.push(child);
        }
    }

    Ok(())
}
