use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument, trace};

use crate::frequency::FrequencyTable;
use crate::tree::{CodeNode, CodeTree};
use crate::Count;

/// Priority queue slot. Ordered by weight, then by insertion sequence, so
/// equal weights pop in the order they were pushed.
#[derive(Debug, Clone, Copy)]
struct Pending {
    weight: Count,
    seq: u64,
    idx: Index,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight
            .cmp(&other.weight)
            .then(self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Greedy pairwise merging of the lightest nodes.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    arena: Arena<CodeNode>,
    queue: BinaryHeap<Reverse<Pending>>,
    next_seq: u64,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, node: CodeNode, weight: Count) -> Pending {
        let idx = self.arena.insert(node);
        let entry = Pending {
            weight,
            seq: self.next_seq,
            idx,
        };
        self.next_seq += 1;
        self.queue.push(Reverse(entry));
        entry
    }

    /// Builds the tree for `frequencies`, adding the end-of-data leaf with
    /// weight 1.
    ///
    /// An all-zero table yields a tree whose root is the end-of-data leaf.
    #[instrument(level = "debug", skip_all)]
    pub fn build(mut self, frequencies: &FrequencyTable) -> CodeTree {
        for (symbol, count) in frequencies.nonzero() {
            self.push(CodeNode::leaf(symbol, Some(count)), count);
        }
        let sentinel = frequencies.alphabet().sentinel();
        let sentinel = self.push(CodeNode::leaf(sentinel, Some(1)), 1);
        let leaves = self.queue.len();

        while self.queue.len() > 1 {
            let (Some(Reverse(first)), Some(Reverse(second))) =
                (self.queue.pop(), self.queue.pop())
            else {
                break;
            };
            let weight = first.weight + second.weight;
            trace!(
                left = first.weight,
                right = second.weight,
                weight,
                "merging nodes"
            );
            self.push(CodeNode::internal(weight, first.idx, second.idx), weight);
        }

        let Reverse(root) = self.queue.pop().unwrap_or(Reverse(sentinel));
        debug!(leaves, root_weight = root.weight, "built code tree");
        CodeTree::from_parts(self.arena, root.idx)
    }
}

pub fn build_tree(frequencies: &FrequencyTable) -> CodeTree {
    TreeBuilder::new().build(frequencies)
}
