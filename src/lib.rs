//! Huffman code trees with a plain-text code table.
//!
//! The encode side counts symbols, builds a tree and writes the table; the
//! decode side replays the table into an equivalent tree and walks it bit by
//! bit until the end-of-data symbol.
//!
//! ```
//! use huffcode::{compress, decompress, Alphabet};
//!
//! let mut table: Vec<u8> = Vec::new();
//! let payload = compress(b"abracadabra", Alphabet::default(), &mut table)?;
//! let restored = decompress(&table[..], &payload, Alphabet::default())?;
//! assert_eq!(restored, b"abracadabra");
//! # Ok::<(), huffcode::Error>(())
//! ```

use std::io::{BufRead, Write};

use tracing::{debug, instrument};

pub mod bits;
pub mod build;
pub mod code;
pub mod codebook;
pub mod decode;
pub mod error;
pub mod frequency;
pub mod reconstruct;
pub mod serialize;
pub mod table;
pub mod tree;

pub use bits::{BitReader, BitSink, BitSource, Bits};
pub use build::{build_tree, TreeBuilder};
pub use code::Code;
pub use codebook::CodeBook;
pub use decode::{decode, Decoder};
pub use error::{Error, Result};
pub use frequency::{Alphabet, FrequencyTable};
pub use reconstruct::{reconstruct, reconstruct_rows, TreeReconstructor};
pub use serialize::TreeSerializer;
pub use table::{parse_table, TableRow};
pub use tree::{CodeNode, CodeTree, Step};

/// A decodable unit; bytes use `0..256`.
pub type Symbol = u32;

/// type used to store occurrence counts and subtree weights
/// u64 leaves room for the sum over every symbol of a large input
pub type Count = u64;

/// Builds a code for `input`, writes its table to `table_out` and returns the
/// packed, end-of-data terminated payload.
#[instrument(level = "debug", skip(input, table_out), fields(len = input.len()))]
pub fn compress<W: Write>(
    input: &[u8],
    alphabet: Alphabet,
    table_out: &mut W,
) -> Result<Vec<u8>> {
    let frequencies = FrequencyTable::from_bytes(alphabet, input)?;
    let tree = build_tree(&frequencies);

    let mut table_bits = Bits::new();
    let rows = TreeSerializer::new(&tree).write(table_out, &mut table_bits)?;
    let book = CodeBook::from_rows(&rows);

    let mut payload = Bits::new();
    book.encode(
        input.iter().map(|&b| Symbol::from(b)),
        alphabet.sentinel(),
        &mut payload,
    )?;
    let packed = bits::pack(payload);
    debug!(
        rows = rows.len(),
        table_bits = table_bits.len(),
        packed = packed.len(),
        "compressed input"
    );
    Ok(packed)
}

/// Rebuilds the tree from `table` and decodes `payload` back into bytes.
///
/// A table whose only row is the end-of-data symbol with an empty path
/// belongs to an empty input and decodes to nothing.
#[instrument(level = "debug", skip(table, payload), fields(len = payload.len()))]
pub fn decompress<R: BufRead>(
    table: R,
    payload: &[u8],
    alphabet: Alphabet,
) -> Result<Vec<u8>> {
    let rows = parse_table(table)?;
    if let [row] = rows.as_slice() {
        if row.code.is_empty() && row.symbol == alphabet.sentinel() {
            debug!("table holds only the end-of-data symbol");
            return Ok(Vec::new());
        }
    }
    let tree = reconstruct_rows(&rows)?;
    let mut source = BitReader::new(bits::unpack(payload));
    let symbols = decode(&tree, &mut source, alphabet.sentinel())?;
    symbols
        .into_iter()
        .map(|symbol| {
            u8::try_from(symbol).map_err(|_| Error::SymbolOutOfRange {
                symbol,
                alphabet_size: frequency::BYTE_ALPHABET_SIZE,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compress_round_trip() {
        let text = b"it was the best of times, it was the worst of times";
        let mut table: Vec<u8> = Vec::new();
        let payload = compress(text, Alphabet::default(), &mut table).unwrap();
        assert!(payload.len() < text.len());
        let restored = decompress(&table[..], &payload, Alphabet::default()).unwrap();
        assert_eq!(restored, text.to_vec());
    }

    #[test]
    fn empty_input_round_trip() {
        let mut table: Vec<u8> = Vec::new();
        let payload = compress(b"", Alphabet::default(), &mut table).unwrap();
        assert_eq!(table, b"257\n\n".to_vec());
        assert_eq!(bits::unpack(&payload).len() % 8, 0);
        let restored = decompress(&table[..], &payload, Alphabet::default()).unwrap();
        assert!(restored.is_empty());
    }

    #[test]
    fn wide_symbols_do_not_fit_in_bytes() {
        let alphabet = Alphabet::new(1024).unwrap();
        let table = "700\n0\n1025\n1\n";
        // '0' decodes symbol 700, then '1' is the sentinel
        let err = decompress(table.as_bytes(), &[0b0100_0000], alphabet).unwrap_err();
        assert!(matches!(
            err,
            Error::SymbolOutOfRange {
                symbol: 700,
                alphabet_size: 256
            }
        ));
    }
}
