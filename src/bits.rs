//! Single-bit channels.
//!
//! The tree code only ever needs to push one bit at a time into a sink or
//! pull one bit at a time out of a source. Packed payloads are MSB-first with
//! the final byte zero padded; readers never look at the padding because
//! decoding stops at the end-of-data symbol.

use bitvec::prelude::Msb0;

use crate::error::{Error, Result};

/// In-memory bit buffer used throughout this crate.
pub type Bits = bitvec::prelude::BitVec<u8, Msb0>;

/// Accepts bits in stream order.
pub trait BitSink {
    fn write_bit(&mut self, bit: bool) -> Result<()>;
}

/// Yields bits in the order they were written.
pub trait BitSource {
    /// Fails with [`Error::PrematureEndOfBits`] once the source is drained.
    fn read_bit(&mut self) -> Result<bool>;
}

impl BitSink for Bits {
    fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.push(bit);
        Ok(())
    }
}

impl BitSink for Vec<bool> {
    fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.push(bit);
        Ok(())
    }
}

/// Adapts any stream of bits into a [`BitSource`] that knows how far it got.
#[derive(Debug, Clone)]
pub struct BitReader<I> {
    bits: I,
    position: usize,
}

impl<I> BitReader<I>
where
    I: Iterator<Item = bool>,
{
    pub fn new<B>(bits: B) -> Self
    where
        B: IntoIterator<IntoIter = I, Item = bool>,
    {
        BitReader {
            bits: bits.into_iter(),
            position: 0,
        }
    }

    /// Number of bits handed out so far.
    pub fn position(&self) -> usize {
        self.position
    }
}

impl<I> BitSource for BitReader<I>
where
    I: Iterator<Item = bool>,
{
    fn read_bit(&mut self) -> Result<bool> {
        let bit = self.bits.next().ok_or(Error::PrematureEndOfBits {
            position: self.position,
        })?;
        self.position += 1;
        Ok(bit)
    }
}

pub fn pack(bits: Bits) -> Vec<u8> {
    bits.into()
}

pub fn unpack(bytes: &[u8]) -> Bits {
    bytes.iter().fold(Bits::new(), |mut acc, &byte| {
        let mut tmp = Bits::from_element(byte);
        acc.append(&mut tmp);
        acc
    })
}
