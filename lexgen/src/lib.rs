//!# lexgen
//!
//! `lexgen` is a Rust library implementing the core of a lexical-analyzer
//! generator: it reads a grammar file of regular-expression rules with
//! associated actions and emits C source for a table-driven scanner that
//! recognizes the specified language.
//!
//! ## Usage
//!
//! ```rust
//! use lexgen::gen::generate;
//! use lexgen::parser::Config;
//!
//! fn main() {
//!     let grammar = "\
//! %%
//! a    return TOK_A;
//! %%
//! ";
//!     let mut out = Vec::new();
//!     generate(grammar.as_bytes(), &mut out, &Config::default()).unwrap();
//!     let source = String::from_utf8(out).unwrap();
//!
//!     // A single-byte rule compiles to a two-state DFA...
//!     assert!(source.contains("YYPRIVATE YY_TTYPE Yy_nxt[2][128] ="));
//!     // ...and the rule's action ends up in the accept switch.
//!     assert!(source.contains("return TOK_A;"));
//! }
//! ```
//!
//! ## Grammar file format
//!
//! The grammar file has three zones, separated by lines beginning with
//! `%%`:
//!
//! ```text
//! header zone: macro definitions and passthrough
//! %%
//! rule zone: one rule per logical line
//! %%
//! trailer zone: copied verbatim
//! ```
//!
//! The *header* holds macro definitions of the form `NAME<ws>TEXT` plus
//! passthrough material: lines beginning with whitespace, and blocks
//! bracketed by `%{` and `%}`, are copied to the output untouched (C
//! comments are stripped outside those blocks). The *rule zone* contains
//! one rule per logical line, `REGEX<ws>ACTION`, where a line beginning
//! with whitespace continues the previous rule. The *trailer* is copied
//! verbatim after the generated tables.
//!
//! Regular expressions support, in decreasing precedence: escape
//! sequences (`\n`, `\t`, `\xNN`, `\NNN`, `\^X`, ...), `[...]` and
//! negated `[^...]` character classes with `-` ranges, `.` (any byte but
//! newline), the `*`/`+`/`?` postfix closures, concatenation, `|`
//! alternation, `(...)` grouping, `{NAME}` macro expansion, and `"..."`
//! quoted literals. A leading `^` anchors the rule at line start and a
//! trailing `$` at line end. A rule whose action is `|` reuses the
//! previous rule's action.
//!
//! ## Pipeline
//!
//! The library is organised along its data flow:
//!
//! * [scanner] splits the grammar file into zones and hands the lexer one
//!   logical rule at a time,
//! * [lexer] turns rule text into tokens, expanding `{NAME}` macros from
//!   the [macros] table as it goes,
//! * [parser] is a recursive-descent parser driving Thompson's
//!   construction into an [nfa] arena,
//! * [dfa] interns sets of NFA states into DFA states by the subset
//!   construction ([dfa::subset]),
//! * [gen] prints the transition and accept tables spliced into a C
//!   driver skeleton.
//!
//! Given the same grammar and configuration the emitted scanner is
//! byte-identical across runs.

pub mod bitset;
pub mod dfa;
pub mod error;
pub mod gen;
pub mod lexer;
pub mod macros;
pub mod nfa;
pub mod parser;
pub mod scanner;

pub use error::{Error, Result};
