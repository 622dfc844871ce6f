use std::fmt::{self, Display};

use crate::bits::{BitSink, Bits};
use crate::error::{Error, Result};
use crate::tree::Step;

/// A root-to-leaf path, one bit per branch: `false` is left, `true` is right.
///
/// In table text a code is written as a line of `'0'` and `'1'` characters.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct Code {
    inner: Bits,
}

impl Code {
    pub fn new() -> Code {
        Code { inner: Bits::new() }
    }

    /// Parses the path line of a table row. `line` is only used for errors.
    ///
    /// An empty line parses to an empty code; whether that is acceptable is
    /// up to the caller.
    pub fn parse(text: &str, line: usize) -> Result<Code> {
        let mut code = Code::new();
        for ch in text.chars() {
            match ch {
                '0' => code.push(Step::Left),
                '1' => code.push(Step::Right),
                other => {
                    return Err(Error::MalformedTableRow {
                        line,
                        reason: format!("unexpected path character {:?}", other),
                    })
                }
            }
        }
        Ok(code)
    }

    pub fn push(&mut self, step: Step) {
        self.inner.push(step == Step::Right);
    }

    pub fn pop(&mut self) -> Option<Step> {
        self.inner.pop().map(Step::from)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.len() == 0
    }

    /// Steps from the root downwards.
    pub fn steps(&self) -> impl Iterator<Item = Step> {
        self.inner.clone().into_iter().map(Step::from)
    }

    pub fn write_to(&self, sink: &mut impl BitSink) -> Result<()> {
        for bit in self.inner.clone() {
            sink.write_bit(bit)?;
        }
        Ok(())
    }
}

impl Default for Code {
    fn default() -> Code {
        Code::new()
    }
}

impl Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for bit in self.inner.clone() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}
