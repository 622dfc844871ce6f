use std::io::Read;

use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::{Count, Symbol};

/// Alphabet size used when the symbols are bytes.
pub const BYTE_ALPHABET_SIZE: u32 = 256;

/// Bounded symbol space `[0, size)` plus one end-of-data sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Alphabet {
    size: u32,
}

impl Alphabet {
    pub fn new(size: u32) -> Result<Self> {
        if size == 0 {
            return Err(Error::Config("alphabet size must be positive".into()));
        }
        Ok(Alphabet { size })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// The end-of-data symbol. It sits one slot past `size`, so it can
    /// never collide with a real symbol.
    pub fn sentinel(&self) -> Symbol {
        self.size + 1
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        symbol < self.size
    }

    fn check(&self, symbol: Symbol) -> Result<usize> {
        if self.contains(symbol) {
            Ok(symbol as usize)
        } else {
            Err(Error::SymbolOutOfRange {
                symbol,
                alphabet_size: self.size,
            })
        }
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Alphabet {
            size: BYTE_ALPHABET_SIZE,
        }
    }
}

/// Occurrence counts for every symbol of an alphabet.
///
/// The total, plus the weight of the end-of-data leaf, always fits in a
/// [`Count`], so no merge of the tree built from it can overflow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrequencyTable {
    alphabet: Alphabet,
    counts: Vec<Count>,
    total: Count,
}

impl FrequencyTable {
    pub fn new(alphabet: Alphabet) -> Self {
        FrequencyTable {
            alphabet,
            counts: vec![0; alphabet.size() as usize],
            total: 0,
        }
    }

    pub fn from_counts<I>(alphabet: Alphabet, counts: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Symbol, Count)>,
    {
        counts
            .into_iter()
            .try_fold(Self::new(alphabet), |mut table, (symbol, count)| {
                table.set(symbol, count)?;
                Ok(table)
            })
    }

    pub fn from_bytes(alphabet: Alphabet, bytes: &[u8]) -> Result<Self> {
        let mut table = Self::new(alphabet);
        for &byte in bytes {
            table.record(Symbol::from(byte))?;
        }
        Ok(table)
    }

    #[instrument(level = "debug", skip(reader))]
    pub fn from_reader<R: Read>(alphabet: Alphabet, reader: R) -> Result<Self> {
        let mut table = Self::new(alphabet);
        for byte in reader.bytes() {
            table.record(Symbol::from(byte?))?;
        }
        debug!(
            total = table.total(),
            distinct = table.nonzero().count(),
            "counted input bytes"
        );
        Ok(table)
    }

    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    pub fn record(&mut self, symbol: Symbol) -> Result<()> {
        let slot = self.alphabet.check(symbol)?;
        self.total = self.grown_total(symbol, 0, 1)?;
        self.counts[slot] += 1;
        Ok(())
    }

    pub fn set(&mut self, symbol: Symbol, count: Count) -> Result<()> {
        let slot = self.alphabet.check(symbol)?;
        self.total = self.grown_total(symbol, self.counts[slot], count)?;
        self.counts[slot] = count;
        Ok(())
    }

    /// Total after swapping `old` for `new` in one slot. One unit stays
    /// reserved for the end-of-data leaf.
    fn grown_total(&self, symbol: Symbol, old: Count, new: Count) -> Result<Count> {
        (self.total - old)
            .checked_add(new)
            .filter(|total| *total < Count::MAX)
            .ok_or(Error::CountOverflow { symbol })
    }

    pub fn get(&self, symbol: Symbol) -> Count {
        self.counts.get(symbol as usize).copied().unwrap_or(0)
    }

    /// Symbols with a nonzero count, in ascending symbol order.
    pub fn nonzero(&self) -> impl Iterator<Item = (Symbol, Count)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(symbol, &count)| (symbol as Symbol, count))
    }

    pub fn total(&self) -> Count {
        self.total
    }
}
