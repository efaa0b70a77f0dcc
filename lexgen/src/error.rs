//! Error reporting for the generator. Every error is fatal: the grammar is
//! rejected, nothing is emitted, and the caller is expected to print the
//! diagnostic and exit non-zero.
//!
//! Parse-time errors carry a [Context] describing where in the grammar file
//! the problem was found, and render it as the offending line with a caret
//! under the column:
//!
//! ```text
//! + ? or * must follow an expression or subexpression, line 7:
//! *abc    return STAR;
//! ^
//! ```

use std::fmt;
use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Position of a failure within the grammar file: the line number, the text
/// of the (logical) line being lexed, and the column the cursor had reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    pub line_no: usize,
    pub line: String,
    pub column: usize,
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "line {}:", self.line_no)?;
        writeln!(f, "{}", self.line)?;
        write!(f, "{}^", "_".repeat(self.column.min(self.line.len())))
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("too many NFA states (limit {0}), the grammar is too large")]
    TooManyNfaStates(usize),
    #[error("too many DFA states (limit {0}), the grammar is too large")]
    TooManyDfaStates(usize),
    #[error("malformed regular expression, {0}")]
    MalformedRegex(Context),
    #[error("missing close parenthesis, {0}")]
    BadParen(Context),
    #[error("unmatched bracket in character class, {0}")]
    BadBracket(Context),
    #[error("+ ? or * must follow an expression or subexpression, {0}")]
    BadClosure(Context),
    #[error("^ must be at the start of an expression or character class, {0}")]
    BadAnchor(Context),
    #[error("newline in quoted string, use \\n to get a newline into an expression, {0}")]
    NewlineInString(Context),
    #[error("bad macro: {0}, {1}")]
    BadMacro(&'static str, Context),
    #[error("macro {{{0}}} doesn't exist, {1}")]
    UnknownMacro(String, Context),
    #[error("macro expansions nested too deeply, {0}")]
    MacroDepth(Context),
    #[error("illegal directive %{0}, {1}")]
    BadDirective(char, Context),
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}
