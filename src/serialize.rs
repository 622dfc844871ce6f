use std::io::Write;

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::bits::BitSink;
use crate::code::Code;
use crate::error::{Error, Result};
use crate::table::TableRow;
use crate::tree::{CodeTree, Step};
use crate::Symbol;

enum Frame {
    Enter(Index, Option<Step>),
    Leave,
}

/// Emits one table row per leaf, left subtree before right subtree.
pub struct TreeSerializer<'a> {
    tree: &'a CodeTree,
}

impl<'a> TreeSerializer<'a> {
    pub fn new(tree: &'a CodeTree) -> Self {
        TreeSerializer { tree }
    }

    /// Depth-first walk with an explicit stack; `path` grows by one step on
    /// the way down and shrinks by one on the way back up.
    fn visit_leaves<F>(&self, mut on_leaf: F) -> Result<()>
    where
        F: FnMut(Symbol, &Code) -> Result<()>,
    {
        let mut path = Code::new();
        let mut stack = vec![Frame::Enter(self.tree.root(), None)];
        while let Some(frame) = stack.pop() {
            let (idx, step) = match frame {
                Frame::Leave => {
                    path.pop();
                    continue;
                }
                Frame::Enter(idx, step) => (idx, step),
            };
            if let Some(step) = step {
                path.push(step);
                stack.push(Frame::Leave);
            }

            let node = self.tree.node(idx).ok_or(Error::IncompleteTree)?;
            match (node.symbol(), node.left(), node.right()) {
                (Some(symbol), None, None) => on_leaf(symbol, &path)?,
                (None, Some(left), Some(right)) => {
                    stack.push(Frame::Enter(right, Some(Step::Right)));
                    stack.push(Frame::Enter(left, Some(Step::Left)));
                }
                _ => return Err(Error::IncompleteTree),
            }
        }
        Ok(())
    }

    /// The rows the tree serializes to, without writing anything.
    pub fn rows(&self) -> Result<Vec<TableRow>> {
        let mut rows = Vec::new();
        self.visit_leaves(|symbol, code| {
            rows.push(TableRow::new(symbol, code.clone()));
            Ok(())
        })?;
        Ok(rows)
    }

    /// Writes the table text to `out` and every row's path bits to `sink`,
    /// in the same order. Returns the rows written.
    ///
    /// A tree that is a single leaf produces one row with an empty path.
    #[instrument(level = "debug", skip_all)]
    pub fn write<W, S>(&self, out: &mut W, sink: &mut S) -> Result<Vec<TableRow>>
    where
        W: Write,
        S: BitSink,
    {
        let mut rows = Vec::new();
        let mut bits = 0;
        self.visit_leaves(|symbol, code| {
            let row = TableRow::new(symbol, code.clone());
            row.write_to(&mut *out)?;
            code.write_to(&mut *sink)?;
            bits += code.len();
            rows.push(row);
            Ok(())
        })?;
        debug!(rows = rows.len(), bits, "serialized code tree");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::build_tree;
    use crate::frequency::{Alphabet, FrequencyTable};

    fn table(counts: &[(Symbol, u64)]) -> FrequencyTable {
        FrequencyTable::from_counts(Alphabet::default(), counts.iter().copied()).unwrap()
    }

    #[test]
    fn writes_rows_and_bits_in_traversal_order() {
        // sentinel (1) and 'a' (2) merge first, then 'b' (5) goes right
        let tree = build_tree(&table(&[(97, 2), (98, 5)]));
        let mut out: Vec<u8> = Vec::new();
        let mut sink: Vec<bool> = Vec::new();
        let rows = TreeSerializer::new(&tree).write(&mut out, &mut sink).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "257\n00\n97\n01\n98\n1\n");
        assert_eq!(sink, vec![false, false, false, true, true]);
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn one_row_per_leaf() {
        let counts: Vec<(Symbol, u64)> = (0..40).map(|s| (s * 3, u64::from(s) + 1)).collect();
        let tree = build_tree(&table(&counts));
        let rows = TreeSerializer::new(&tree).rows().unwrap();
        assert_eq!(rows.len(), counts.len() + 1);
        assert_eq!(rows.iter().filter(|row| row.symbol == 257).count(), 1);
    }

    #[test]
    fn bit_count_matches_path_lengths() {
        let tree = build_tree(&table(&[(1, 4), (2, 4), (3, 1), (4, 9)]));
        let mut sink: Vec<bool> = Vec::new();
        let rows = TreeSerializer::new(&tree)
            .write(&mut std::io::sink(), &mut sink)
            .unwrap();
        let expected: usize = rows.iter().map(|row| row.code.len()).sum();
        assert_eq!(sink.len(), expected);
    }

    #[test]
    fn repeated_serialization_is_identical() {
        let tree = build_tree(&table(&[(10, 3), (11, 3), (12, 3), (13, 7)]));
        let serializer = TreeSerializer::new(&tree);
        let (mut first, mut second): (Vec<u8>, Vec<u8>) = (Vec::new(), Vec::new());
        let (mut first_bits, mut second_bits): (Vec<bool>, Vec<bool>) = (Vec::new(), Vec::new());
        serializer.write(&mut first, &mut first_bits).unwrap();
        serializer.write(&mut second, &mut second_bits).unwrap();
        assert_eq!(first, second);
        assert_eq!(first_bits, second_bits);
    }

    #[test]
    fn lone_sentinel_has_an_empty_path() {
        let tree = build_tree(&FrequencyTable::new(Alphabet::default()));
        let mut out: Vec<u8> = Vec::new();
        let mut sink: Vec<bool> = Vec::new();
        let rows = TreeSerializer::new(&tree).write(&mut out, &mut sink).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].code.is_empty());
        assert_eq!(String::from_utf8(out).unwrap(), "257\n\n");
        assert!(sink.is_empty());
    }
}
