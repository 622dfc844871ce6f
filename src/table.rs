//! The textual code table: one line with a decimal symbol, then one line
//! with its path, repeated until end of input.

use std::io::{BufRead, Write};

use tracing::{debug, trace};

use crate::code::Code;
use crate::error::{Error, Result};
use crate::Symbol;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableRow {
    pub symbol: Symbol,
    pub code: Code,
    /// Line of the symbol in the table text, for rows that were parsed.
    pub line: Option<usize>,
}

impl TableRow {
    pub fn new(symbol: Symbol, code: Code) -> Self {
        TableRow {
            symbol,
            code,
            line: None,
        }
    }

    fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "{}", self.symbol)?;
        writeln!(out, "{}", self.code)?;
        Ok(())
    }
}

fn strip_line_ending(line: &mut String) {
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
}

fn parse_symbol(text: &str, line: usize) -> Result<Symbol> {
    text.trim()
        .parse::<Symbol>()
        .map_err(|e| Error::MalformedTableRow {
            line,
            reason: format!("symbol {:?} is not an integer: {}", text, e),
        })
}

/// Reads table rows until end of input.
///
/// Line numbers in errors point at the symbol line of the offending row.
pub fn parse_table<R: BufRead>(mut r: R) -> Result<Vec<TableRow>> {
    let mut rows = Vec::new();
    let mut line = String::new();
    let mut line_no = 0;
    loop {
        line.clear();
        if r.read_line(&mut line)? == 0 {
            break;
        }
        line_no += 1;
        let row_line = line_no;
        strip_line_ending(&mut line);
        let symbol = parse_symbol(&line, row_line)?;

        line.clear();
        if r.read_line(&mut line)? == 0 {
            return Err(Error::MalformedTableRow {
                line: row_line,
                reason: "symbol line without a path line".into(),
            });
        }
        line_no += 1;
        strip_line_ending(&mut line);
        let code = Code::parse(&line, row_line)?;

        trace!(symbol, %code, "parsed table row");
        rows.push(TableRow::new(symbol, code).at_line(row_line));
    }
    debug!(rows = rows.len(), "parsed code table");
    Ok(rows)
}
