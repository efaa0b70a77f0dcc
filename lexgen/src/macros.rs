//! The macro table built from the header zone of the grammar file. A macro
//! definition is a single line of the form `NAME<whitespace>TEXT`; the
//! replacement text is substituted wherever `{NAME}` appears in a rule.

use crate::error::{Context, Error, Result};
use nom::bytes::complete::take_till1;
use nom::character::complete::multispace0;
use nom::combinator::rest;
use nom::sequence::{pair, preceded};
use nom::IResult;
use std::collections::HashMap;

/// Longest accepted macro name.
pub const NAME_MAX: usize = 33;
/// Longest accepted replacement text.
pub const TEXT_MAX: usize = 80;

#[derive(Debug, Default)]
pub struct MacroTable {
    map: HashMap<String, String>,
}

fn definition(input: &str) -> IResult<&str, (&str, &str)> {
    pair(
        take_till1(char::is_whitespace),
        preceded(multispace0, rest),
    )(input)
}

impl MacroTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses one definition line and inserts it. Trailing whitespace in the
    /// replacement text is discarded. If two macros have the same name, the
    /// later one takes precedence.
    pub fn define(&mut self, line: &str, line_no: usize) -> Result<()> {
        let ctx = || Context {
            line_no,
            line: line.to_string(),
            column: 0,
        };
        let (_, (name, text)) = definition(line)
            .map_err(|_| Error::BadMacro("empty macro definition", ctx()))?;
        let text = text.trim_end();
        if name.len() > NAME_MAX {
            return Err(Error::BadMacro("macro name too long", ctx()));
        }
        if text.len() > TEXT_MAX {
            return Err(Error::BadMacro("macro replacement text too long", ctx()));
        }
        self.map.insert(name.to_string(), text.to_string());
        Ok(())
    }

    /// The replacement text for `name`, if defined. The lexer turns a miss
    /// into an `UnknownMacro` error with the position of the reference.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.map.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
