use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::bits::BitSink;
use crate::code::Code;
use crate::error::{Error, Result};
use crate::serialize::TreeSerializer;
use crate::table::TableRow;
use crate::tree::CodeTree;
use crate::Symbol;

/// Symbol to path lookup, the encoding side of a code table.
#[derive(Debug, Clone, Default)]
pub struct CodeBook {
    codes: HashMap<Symbol, Code>,
}

impl CodeBook {
    pub fn from_rows<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a TableRow>,
    {
        let codes = rows
            .into_iter()
            .map(|row| (row.symbol, row.code.clone()))
            .collect();
        CodeBook { codes }
    }

    pub fn from_tree(tree: &CodeTree) -> Result<Self> {
        let rows = TreeSerializer::new(tree).rows()?;
        Ok(Self::from_rows(&rows))
    }

    pub fn get(&self, symbol: Symbol) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    fn code(&self, symbol: Symbol) -> Result<&Code> {
        self.get(symbol).ok_or(Error::UnknownSymbol(symbol))
    }

    /// Writes the code of every symbol, then the code of `sentinel`.
    /// Returns the number of bits written.
    #[instrument(level = "debug", skip(self, symbols, sink))]
    pub fn encode<I, S>(&self, symbols: I, sentinel: Symbol, sink: &mut S) -> Result<usize>
    where
        I: IntoIterator<Item = Symbol>,
        S: BitSink,
    {
        let mut bits = 0;
        let mut count = 0;
        for symbol in symbols {
            let code = self.code(symbol)?;
            code.write_to(sink)?;
            bits += code.len();
            count += 1;
        }
        let end = self.code(sentinel)?;
        end.write_to(sink)?;
        bits += end.len();
        debug!(symbols = count, bits, "encoded message");
        Ok(bits)
    }
}
