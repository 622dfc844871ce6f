use std::io::BufRead;

use tracing::{debug, instrument, trace};

use crate::code::Code;
use crate::error::{Error, Result};
use crate::table::{parse_table, TableRow};
use crate::tree::{CodeNode, CodeTree, Step};
use crate::Symbol;

/// Rebuilds a code tree by replaying table paths onto a growing partial tree.
///
/// Rows may arrive in any order. Between rows the tree may have internal
/// nodes with a single child; [`TreeReconstructor::finish`] checks that every
/// branch got filled in.
#[derive(Debug, Clone)]
pub struct TreeReconstructor {
    tree: CodeTree,
    rows: usize,
}

impl Default for TreeReconstructor {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeReconstructor {
    pub fn new() -> Self {
        TreeReconstructor {
            tree: CodeTree::with_branch_root(),
            rows: 0,
        }
    }

    /// Replays a row; an empty path is reported at the row's table line,
    /// if it has one.
    pub fn add_row(&mut self, row: &TableRow) -> Result<()> {
        self.replay(row.symbol, &row.code, row.line)
    }

    /// Follows `code` as far as the tree already reaches, then hangs the rest
    /// of the path off that frontier, ending in a leaf for `symbol`.
    pub fn add(&mut self, symbol: Symbol, code: &Code) -> Result<()> {
        self.replay(symbol, code, None)
    }

    fn replay(&mut self, symbol: Symbol, code: &Code, line: Option<usize>) -> Result<()> {
        let steps: Vec<Step> = code.steps().collect();
        if steps.is_empty() {
            return Err(Error::EmptyPath { symbol, line });
        }

        let mut frontier = self.tree.root();
        let mut reached = 0;
        for &step in &steps {
            let node = self.tree.node(frontier).ok_or(Error::IncompleteTree)?;
            if node.is_leaf() {
                return Err(Error::ConflictingPath { symbol });
            }
            match node.child(step) {
                Some(next) => {
                    frontier = next;
                    reached += 1;
                }
                None => break,
            }
        }

        let (last, between) = match steps[reached..].split_last() {
            Some(split) => split,
            None => return Err(Error::ConflictingPath { symbol }),
        };
        for &step in between {
            frontier = self.tree.attach(frontier, step, CodeNode::branch());
        }
        self.tree.attach(frontier, *last, CodeNode::leaf(symbol, None));

        trace!(symbol, %code, reused = reached, "replayed table row");
        self.rows += 1;
        Ok(())
    }

    /// Hands out the tree once every internal node has both branches.
    pub fn finish(self) -> Result<CodeTree> {
        let complete = self.tree.nodes().all(|(_, node)| {
            node.is_leaf() || (node.left().is_some() && node.right().is_some())
        });
        if !complete {
            return Err(Error::IncompleteTree);
        }
        debug!(rows = self.rows, nodes = self.tree.len(), "reconstructed code tree");
        Ok(self.tree)
    }
}

pub fn reconstruct_rows<'a, I>(rows: I) -> Result<CodeTree>
where
    I: IntoIterator<Item = &'a TableRow>,
{
    let mut reconstructor = TreeReconstructor::new();
    for row in rows {
        reconstructor.add_row(row)?;
    }
    reconstructor.finish()
}

#[instrument(level = "debug", skip_all)]
pub fn reconstruct<R: BufRead>(r: R) -> Result<CodeTree> {
    let rows = parse_table(r)?;
    reconstruct_rows(&rows)
}
