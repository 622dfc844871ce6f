use tracing::{debug, instrument};

use crate::bits::BitSource;
use crate::error::{Error, Result};
use crate::tree::{CodeTree, Step};
use crate::Symbol;

/// Walks a code tree one bit at a time.
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'a> {
    tree: &'a CodeTree,
    sentinel: Symbol,
}

impl<'a> Decoder<'a> {
    pub fn new(tree: &'a CodeTree, sentinel: Symbol) -> Self {
        Decoder { tree, sentinel }
    }

    /// Descends from the root until a leaf, reading one bit per internal node.
    ///
    /// A root that is itself a leaf is returned without reading anything.
    pub fn next_symbol<S: BitSource>(&self, source: &mut S) -> Result<Symbol> {
        let mut idx = self.tree.root();
        loop {
            let node = self.tree.node(idx).ok_or(Error::IncompleteTree)?;
            if node.is_leaf() {
                if let Some(symbol) = node.symbol() {
                    return Ok(symbol);
                }
            }
            let step = Step::from(source.read_bit()?);
            idx = node.child(step).ok_or(Error::IncompleteTree)?;
        }
    }

    /// A tree that is a single leaf other than the end-of-data symbol would
    /// yield that leaf forever without reading a bit.
    fn check_root(&self) -> Result<()> {
        match self.tree.root_node() {
            Some(root) if root.is_leaf() && root.symbol() != Some(self.sentinel) => {
                Err(Error::MissingSentinel {
                    sentinel: self.sentinel,
                })
            }
            _ => Ok(()),
        }
    }

    /// Decoded symbols up to, not including, the end-of-data symbol.
    pub fn symbols<'s, S: BitSource>(&self, source: &'s mut S) -> Symbols<'a, 's, S> {
        Symbols {
            decoder: *self,
            source,
            started: false,
            done: false,
        }
    }

    #[instrument(level = "debug", skip_all)]
    pub fn decode<S: BitSource>(&self, source: &mut S) -> Result<Vec<Symbol>> {
        let symbols = self.symbols(source).collect::<Result<Vec<_>>>()?;
        debug!(symbols = symbols.len(), "decoded message");
        Ok(symbols)
    }
}

/// Iterator over decoded symbols; stops after the end-of-data symbol or the
/// first error.
pub struct Symbols<'a, 's, S> {
    decoder: Decoder<'a>,
    source: &'s mut S,
    started: bool,
    done: bool,
}

impl<'a, 's, S: BitSource> Iterator for Symbols<'a, 's, S> {
    type Item = Result<Symbol>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            if let Err(e) = self.decoder.check_root() {
                self.done = true;
                return Some(Err(e));
            }
        }
        match self.decoder.next_symbol(&mut *self.source) {
            Ok(symbol) if symbol == self.decoder.sentinel => {
                self.done = true;
                None
            }
            Ok(symbol) => Some(Ok(symbol)),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

pub fn decode<S: BitSource>(
    tree: &CodeTree,
    source: &mut S,
    sentinel: Symbol,
) -> Result<Vec<Symbol>> {
    Decoder::new(tree, sentinel).decode(source)
}
