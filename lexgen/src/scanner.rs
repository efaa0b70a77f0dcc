//! Zone scanner for the grammar file. The file has three zones separated by
//! lines beginning with `%%`:
//!
//! 1. The *header*: macro definitions, `%{ ... %}` passthrough blocks and
//!    whitespace-led passthrough lines. Everything passed through lands in
//!    the output ahead of the generated tables; macro definitions are
//!    replaced by blank lines so line numbers in diagnostics keep matching
//!    the source file.
//! 2. The *rules*: handed to the lexer one logical rule at a time. Blank
//!    lines are skipped and a line beginning with whitespace continues the
//!    rule before it.
//! 3. The *trailer*: copied verbatim after the generated scanner.
//!
//! Outside passthrough blocks, C-style `/* ... */` comments (multi-line
//! included) are overwritten with spaces before any further processing.

use crate::error::{Context, Error, Result};
use crate::macros::MacroTable;
use std::io::{BufRead, Write};
use std::mem;

#[derive(Debug)]
pub struct Scanner<R> {
    reader: R,
    line_no: usize,
    pending: Option<(usize, String)>,
    in_comment: bool,
    rules_done: bool,
}

impl<R: BufRead> Scanner<R> {
    pub fn new(reader: R) -> Self {
        Scanner {
            reader,
            line_no: 0,
            pending: None,
            in_comment: false,
            rules_done: false,
        }
    }

    /// Number of the last physical line handed out, 1-based.
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    fn next_line(&mut self) -> Result<Option<String>> {
        if let Some((no, line)) = self.pending.take() {
            self.line_no = no;
            return Ok(Some(line));
        }
        let mut buf = String::new();
        if self.reader.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        while buf.ends_with('\n') || buf.ends_with('\r') {
            buf.pop();
        }
        self.line_no += 1;
        Ok(Some(buf))
    }

    fn push_back(&mut self, line: String) {
        self.pending = Some((self.line_no, line));
        self.line_no -= 1;
    }

    /// Processes the header zone up to and including the first `%%`.
    /// Macro definitions go into `macros`; everything else that the zone
    /// rules pass through is written to `out`.
    pub fn scan_header<W: Write>(&mut self, macros: &mut MacroTable, out: &mut W) -> Result<()> {
        let mut passthrough = false;
        while let Some(mut line) = self.next_line()? {
            if !passthrough {
                self.strip_comments(&mut line);
            }
            if let Some(rest) = line.strip_prefix('%') {
                match rest.chars().next() {
                    Some('%') => {
                        writeln!(out)?;
                        return Ok(());
                    }
                    Some('{') => passthrough = true,
                    Some('}') => passthrough = false,
                    other => {
                        return Err(Error::BadDirective(
                            other.unwrap_or(' '),
                            Context {
                                line_no: self.line_no,
                                line,
                                column: 0,
                            },
                        ))
                    }
                }
            } else if passthrough || line.chars().next().map_or(true, char::is_whitespace) {
                writeln!(out, "{line}")?;
            } else {
                macros.define(&line, self.line_no)?;
                writeln!(out)?;
            }
        }
        Ok(())
    }

    /// The next logical rule, or `None` once the second `%%` (or the end of
    /// the file) has been reached. Blank lines are skipped; a following line
    /// that begins with whitespace is appended as a continuation.
    pub fn read_rule(&mut self) -> Result<Option<String>> {
        if self.rules_done {
            return Ok(None);
        }
        let mut rule = loop {
            match self.next_line()? {
                None => return Ok(None),
                Some(line) if line.starts_with("%%") => {
                    self.rules_done = true;
                    return Ok(None);
                }
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => break line,
            }
        };
        loop {
            match self.next_line()? {
                None => break,
                Some(line) if line.starts_with("%%") => {
                    self.rules_done = true;
                    break;
                }
                Some(line) if line.trim().is_empty() => continue,
                Some(line) if line.starts_with(|c: char| c.is_whitespace()) => {
                    rule.push('\n');
                    rule.push_str(&line);
                }
                Some(line) => {
                    self.push_back(line);
                    break;
                }
            }
        }
        Ok(Some(rule))
    }

    /// Copies the trailer zone to `out` verbatim.
    pub fn copy_trailer<W: Write>(&mut self, out: &mut W) -> Result<()> {
        while let Some(line) = self.next_line()? {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }

    /// Overwrites `/* ... */` comments with spaces, carrying the in-comment
    /// state across lines.
    fn strip_comments(&mut self, line: &mut String) {
        let mut bytes = mem::take(line).into_bytes();
        let mut i = 0;
        while i < bytes.len() {
            if self.in_comment {
                if bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/') {
                    self.in_comment = false;
                    bytes[i] = b' ';
                    i += 1;
                    bytes[i] = b' ';
                } else if !bytes[i].is_ascii_whitespace() {
                    bytes[i] = b' ';
                }
            } else if bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'*') {
                self.in_comment = true;
                bytes[i] = b' ';
                i += 1;
                bytes[i] = b' ';
            }
            i += 1;
        }
        // Only whole characters are ever blanked out, so this cannot fail.
        *line = String::from_utf8(bytes).expect("comment stripping preserves utf-8");
    }
}
