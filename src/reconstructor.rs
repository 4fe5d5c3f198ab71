use crate::bank::WordBank;
use crate::block::decode_node_block;
use crate::error::NtsfError;
use crate::Node;
use std::io::Read;

/// A node that has been created (its label and declared child count are
/// known) but is not yet complete: it is still waiting for `remaining` of
/// its own children to arrive and be attached.
struct PendingNode {
    label: String,
    children: Vec<Node>,
    remaining: u64,
}

/// Rebuilds an arbitrary-shape tree from the node block stream that
/// follows the bank, in a single pass over `r` using only an O(depth)
/// stack of pending frames.
///
/// This is the *deflate-stack* rule (§4.7): each incoming block is attached
/// under the innermost still-incomplete frame, decrementing that frame's
/// remaining-child count; a frame that reaches zero remaining children is
/// itself complete and collapses into its own parent, cascading upward as
/// far as completed frames go.
///
/// Frames here buffer their own completed children directly (`children:
/// Vec<Node>`) rather than being spliced into an already-moved parent
/// value; the same attachment order results, since a node's children can
/// only finish, one at a time, while it sits below them on the stack, but
/// it sidesteps holding a mutable reference into a value that might move.
/// See `DESIGN.md` for why this differs cosmetically, not observably, from
/// the "attach immediately" framing.
pub fn deserialize_tree(r: &mut impl Read, bank: &WordBank) -> Result<Node, NtsfError> {
    let mut stack: Vec<PendingNode> = Vec::new();
    let mut root: Option<Node> = None;

    while let Some(block) = decode_node_block(r, bank)? {
        if let Some(parent) = stack.last_mut() {
            parent.remaining = parent
                .remaining
                .checked_sub(1)
                .ok_or(NtsfError::Malformed)?;
        } else if root.is_some() {
            // The tree is already complete; there is nowhere left to
            // attach a further top-level block.
            return Err(NtsfError::Malformed);
        }

        stack.push(PendingNode {
            label: block.label,
            children: Vec::new(),
            remaining: block.n_children,
        });

        while let Some(top) = stack.last() {
            if top.remaining != 0 {
                break;
            }
            let finished = stack.pop().expect("just checked Some above");
            let node = Node::from_parts(finished.label, finished.children);
            match stack.last_mut() {
                Some(parent) => parent.children.push(node),
                None => {
                    root = Some(node);
                    break;
                }
            }
        }
    }

    if !stack.is_empty() {
        return Err(NtsfError::Truncated);
    }

    root.ok_or(NtsfError::Empty)
}
