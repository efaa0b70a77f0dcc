//! # Rule parser
//! A recursive-descent parser over the lexer's tokens that assembles the
//! NFA with Thompson's construction. Because recursive descent cannot
//! handle left recursion, productions such as
//!
//! ```text
//! expr -> expr '|' cat_expr
//!       | cat_expr
//! ```
//!
//! are implemented as a `cat_expr` followed by a loop. The parser descends
//! through
//!
//! ```text
//! machine -> rule machine'
//! rule    -> [^] expr [$] <whitespace> <action-text>
//! expr    -> cat_expr ('|' cat_expr)*
//! cat_expr-> factor+
//! factor  -> term ('*' | '+' | '?')?
//! term    -> '(' expr ')' | '.' | '[' [^] dash-list ']' | literal-byte
//! ```
//!
//! Every routine below `machine` returns a Thompson fragment: a
//! `(start, end)` pair of node ids such that each path from `start` to
//! `end` recognizes exactly the language of the sub-expression.

use crate::bitset::BitSet;
use crate::dfa::MAX_CHARS;
use crate::error::{Error, Result};
use crate::lexer::{Lexer, Token};
use crate::macros::MacroTable;
use crate::nfa::{Accept, Anchor, Edge, Nfa};
use crate::scanner::Scanner;
use log::warn;
use std::io::BufRead;

/// Options influencing the constructed machine.
#[derive(Debug, Clone)]
pub struct Config {
    /// With Unix line endings (the default), `\n` is the only newline byte:
    /// `.` and negated character classes exclude just `\n`. When false they
    /// exclude `\r` as well.
    pub unix: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config { unix: true }
    }
}

pub struct Parser<'a, R> {
    lexer: Lexer<'a, R>,
    nfa: Nfa,
    unix: bool,
    /// Action of the rule before the current one, for `|` inheritance.
    prev_action: Option<String>,
}

type Fragment = (usize, usize);

impl<'a, R: BufRead> Parser<'a, R> {
    pub fn new(scanner: &'a mut Scanner<R>, macros: &'a MacroTable, config: &Config) -> Self {
        Parser {
            lexer: Lexer::new(scanner, macros),
            nfa: Nfa::new(),
            unix: config.unix,
            prev_action: None,
        }
    }

    /// Parses every rule in the rule zone and returns the finished NFA.
    /// The rules are strung together on a chain of epsilon "or" nodes whose
    /// head is the machine's start state.
    pub fn machine(mut self) -> Result<Nfa> {
        self.lexer.advance()?;

        let start = self.nfa.new_node()?;
        let first = self.rule()?;
        self.nfa.node_mut(start).next = Some(first);

        let mut p = start;
        while self.lexer.token() != Token::EndOfInput {
            let link = self.nfa.new_node()?;
            self.nfa.node_mut(p).next2 = Some(link);
            p = link;
            let next = self.rule()?;
            self.nfa.node_mut(p).next = Some(next);
        }

        self.nfa.set_start(start);
        Ok(self.nfa)
    }

    /// One rule: an optionally anchored expression followed by its action
    /// text. Returns the fragment's start node; the end node is marked
    /// accepting.
    fn rule(&mut self) -> Result<usize> {
        let mut anchor = Anchor::None;
        let start;
        let mut end;

        if self.lexer.token() == Token::AtBeginLine {
            // The rule matches only at line start: a machine-added '\n'
            // edge precedes the expression proper.
            let bol = self.nfa.new_node()?;
            self.nfa.node_mut(bol).edge = Edge::Char(b'\n');
            anchor = anchor.with_start();
            self.lexer.advance()?;
            let (s, e) = self.expr()?;
            self.nfa.node_mut(bol).next = Some(s);
            start = bol;
            end = e;
        } else {
            let (s, e) = self.expr()?;
            start = s;
            end = e;
        }

        if self.lexer.token() == Token::AtEndLine {
            self.lexer.advance()?;
            let tail = self.nfa.new_node()?;
            let mut newline = BitSet::new(MAX_CHARS);
            newline.add(b'\n' as usize);
            let node = self.nfa.node_mut(end);
            node.edge = Edge::CharClass(newline);
            node.next = Some(tail);
            end = tail;
            anchor = anchor.with_end();
        }

        // Anything left over that expr() could not consume (a stray close
        // parenthesis, say) makes the whole rule malformed.
        if self.lexer.token() != Token::EndOfString {
            return Err(Error::MalformedRegex(self.lexer.context()));
        }

        let text = self.lexer.action_text();
        let action = if text == "|" {
            self.prev_action.clone().unwrap_or_default()
        } else {
            text
        };
        let line_no = self.lexer.line_no();
        self.prev_action = Some(action.clone());

        let node = self.nfa.node_mut(end);
        node.accept = Some(Accept { action, line_no });
        node.anchor = anchor;

        self.nfa.clear_free_list();
        self.lexer.advance()?; // past the end of the rule line
        Ok(start)
    }

    fn expr(&mut self) -> Result<Fragment> {
        let (mut start, mut end) = self.cat_expr()?;

        while self.lexer.token() == Token::Or {
            self.lexer.advance()?;
            let (s2, e2) = self.cat_expr()?;

            let fork = self.nfa.new_node()?;
            let node = self.nfa.node_mut(fork);
            node.next = Some(start);
            node.next2 = Some(s2);
            start = fork;

            let join = self.nfa.new_node()?;
            self.nfa.node_mut(end).next = Some(join);
            self.nfa.node_mut(e2).next = Some(join);
            end = join;
        }
        Ok((start, end))
    }

    fn cat_expr(&mut self) -> Result<Fragment> {
        if !self.first_in_cat()? {
            return Err(Error::MalformedRegex(self.lexer.context()));
        }
        let (start, mut end) = self.factor()?;

        while self.first_in_cat()? {
            let (s2, e2) = self.factor()?;
            // Concatenate by overwriting our end node with the outgoing
            // structure of the second fragment's start node, then reclaim
            // that node. This is the one place nodes are freed.
            let src = self.nfa.node(s2).clone();
            let dst = self.nfa.node_mut(end);
            dst.edge = src.edge;
            dst.next = src.next;
            dst.next2 = src.next2;
            self.nfa.free_node(s2);
            end = e2;
        }
        Ok((start, end))
    }

    /// Whether the current token can begin a concatenation operand. Tokens
    /// that are outright illegal in that position are reported here.
    fn first_in_cat(&mut self) -> Result<bool> {
        match self.lexer.token() {
            Token::CloseParen
            | Token::AtEndLine
            | Token::Or
            | Token::EndOfString
            | Token::EndOfInput => Ok(false),

            Token::Closure | Token::PlusClose | Token::Optional => {
                Err(Error::BadClosure(self.lexer.context()))
            }
            Token::ClassEnd => Err(Error::BadBracket(self.lexer.context())),
            Token::AtBeginLine => Err(Error::BadAnchor(self.lexer.context())),

            _ => Ok(true),
        }
    }

    /// `factor -> term '*' | term '+' | term '?' | term`
    fn factor(&mut self) -> Result<Fragment> {
        let (mut start, mut end) = self.term()?;

        let closure = self.lexer.token();
        if matches!(
            closure,
            Token::Closure | Token::PlusClose | Token::Optional
        ) {
            let s = self.nfa.new_node()?;
            let e = self.nfa.new_node()?;
            self.nfa.node_mut(s).next = Some(start);
            self.nfa.node_mut(end).next = Some(e);

            // * and ? may skip the operand entirely
            if matches!(closure, Token::Closure | Token::Optional) {
                self.nfa.node_mut(s).next2 = Some(e);
            }
            // * and + may loop back for another round
            if matches!(closure, Token::Closure | Token::PlusClose) {
                self.nfa.node_mut(end).next2 = Some(start);
            }

            start = s;
            end = e;
            self.lexer.advance()?;
        }
        Ok((start, end))
    }

    /// `term -> '(' expr ')' | '.' | '[' ... ']' | '[^' ... ']' | byte`
    ///
    /// The empty classes `[]` and `[^]` are nonstandard: `[]` matches every
    /// byte up through space (0x00..=0x20).
    fn term(&mut self) -> Result<Fragment> {
        if self.lexer.token() == Token::OpenParen {
            self.lexer.advance()?;
            let fragment = self.expr()?;
            if self.lexer.token() != Token::CloseParen {
                return Err(Error::BadParen(self.lexer.context()));
            }
            self.lexer.advance()?;
            return Ok(fragment);
        }

        let start = self.nfa.new_node()?;
        let end = self.nfa.new_node()?;
        self.nfa.node_mut(start).next = Some(end);

        if !matches!(self.lexer.token(), Token::Any | Token::ClassStart) {
            self.nfa.node_mut(start).edge = Edge::Char(self.lexer.lexeme());
            self.lexer.advance()?;
            return Ok((start, end));
        }

        let mut set = BitSet::new(MAX_CHARS);
        if self.lexer.token() == Token::Any {
            // Dot: everything but a newline.
            set.add(b'\n' as usize);
            if !self.unix {
                set.add(b'\r' as usize);
            }
            set.complement();
        } else {
            self.lexer.advance()?; // past '['
            let negate = self.lexer.token() == Token::AtBeginLine;
            if negate {
                self.lexer.advance()?;
                // A negated class never matches a newline.
                set.add(b'\n' as usize);
                if !self.unix {
                    set.add(b'\r' as usize);
                }
            }
            if self.lexer.token() != Token::ClassEnd {
                self.dodash(&mut set)?;
            } else {
                for c in 0..=b' ' as usize {
                    set.add(c);
                }
            }
            if self.lexer.token() != Token::ClassEnd {
                return Err(Error::BadBracket(self.lexer.context()));
            }
            if negate {
                set.complement();
            }
        }
        self.nfa.node_mut(start).edge = Edge::CharClass(set);
        self.lexer.advance()?; // past '.' or ']'
        Ok((start, end))
    }

    /// Fills `set` from the inside of a character class, expanding `x-y`
    /// ranges. A dash at either end of the class is a literal dash, with a
    /// warning.
    fn dodash(&mut self, set: &mut BitSet) -> Result<()> {
        let mut first: u8 = 0;

        if self.lexer.token() == Token::Dash {
            warn!(
                "line {}: treating dash in [-...] as a literal dash",
                self.lexer.line_no()
            );
            set.add(self.lexer.lexeme() as usize);
            self.lexer.advance()?;
        }

        while !matches!(self.lexer.token(), Token::EndOfString | Token::ClassEnd) {
            if self.lexer.token() != Token::Dash {
                first = self.lexer.lexeme();
                set.add(first as usize);
                self.lexer.advance()?;
            } else {
                self.lexer.advance()?;
                if self.lexer.token() == Token::ClassEnd {
                    warn!(
                        "line {}: treating dash in [...-] as a literal dash",
                        self.lexer.line_no()
                    );
                    set.add(b'-' as usize);
                } else {
                    for c in first..=self.lexer.lexeme() {
                        set.add(c as usize);
                    }
                    self.lexer.advance()?;
                }
            }
        }
        Ok(())
    }
}
