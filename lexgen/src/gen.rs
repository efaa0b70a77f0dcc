//! # Output generation
//! [generate] runs the whole pipeline for one grammar: header zone out,
//! rules to NFA, NFA to DFA, then the emitted scanner source. The emitted
//! file is the embedded C driver skeleton with three things spliced in at
//! its marker comments:
//!
//! * the transition matrix `Yy_nxt[nstates][128]` and the `yy_next`
//!   accessor macro,
//! * the `Yyaccept` array encoding, per state, whether it accepts and how
//!   the match is anchored (0 none, 1 start, 2 end, 3 both, 4 unanchored),
//! * one `case` block per accepting state holding the rule's action text.
//!
//! A human-readable description of the DFA is printed first inside an
//! `#ifdef __NEVER__` block, which is handy when debugging a grammar.

use crate::dfa::{subset, AcceptEntry, Dfa, FAIL, MAX_CHARS};
use crate::error::Result;
use crate::macros::MacroTable;
use crate::parser::{Config, Parser};
use crate::scanner::Scanner;
use log::info;
use std::io::{BufRead, Write};

/// Name of the emitted transition table.
const DTRAN_NAME: &str = "Yy_nxt";

const DRIVER_TEMPLATE: &str = include_str!("gen/driver.c");
const INSERT_TABLES: &str = "---- TRANSITION MATRICES INSERTED HERE ----";
const INSERT_CASES: &str = "---- CASE STATEMENTS INSERTED HERE ----";

/// Reads a grammar from `input` and writes the generated scanner source to
/// `output`.
pub fn generate<R: BufRead, W: Write>(input: R, output: &mut W, config: &Config) -> Result<()> {
    let mut scanner = Scanner::new(input);
    let mut macros = MacroTable::new();
    scanner.scan_header(&mut macros, output)?;

    let nfa = Parser::new(&mut scanner, &macros, config).machine()?;
    info!("NFA built: {} live states", nfa.live_nodes());

    let dfa = subset(&nfa)?;
    let accept = dfa.accept_states();
    info!("DFA built: {} states", dfa.nstates());

    print_dfa_comment(output, &dfa, &accept)?;

    let (head, tail) = split_template(DRIVER_TEMPLATE, INSERT_TABLES);
    output.write_all(head.as_bytes())?;
    print_table(output, &dfa)?;
    print_defnext(output, DTRAN_NAME)?;
    print_accept_array(output, &accept)?;

    let (middle, foot) = split_template(tail, INSERT_CASES);
    output.write_all(middle.as_bytes())?;
    print_cases(output, &accept)?;
    output.write_all(foot.as_bytes())?;

    scanner.copy_trailer(output)?;
    Ok(())
}

/// Splits the driver template at the line carrying `marker`; the marker
/// line itself is dropped.
fn split_template<'a>(template: &'a str, marker: &str) -> (&'a str, &'a str) {
    let at = template
        .find(marker)
        .expect("driver template is missing a splice marker");
    let head_end = template[..at].rfind('\n').map_or(0, |i| i + 1);
    let tail_start = template[at..]
        .find('\n')
        .map_or(template.len(), |i| at + i + 1);
    (&template[..head_end], &template[tail_start..])
}

/// A commented description of the DFA: each state, its action, and its
/// outgoing transitions grouped by target state.
fn print_dfa_comment<W: Write>(out: &mut W, dfa: &Dfa, accept: &[AcceptEntry]) -> Result<()> {
    writeln!(out, "#ifdef __NEVER__")?;
    writeln!(out, "/*---------------------------------------------------")?;
    writeln!(out, " * DFA (start state is 0) is:")?;
    writeln!(out, " *")?;

    for (i, entry) in accept.iter().enumerate() {
        match &entry.accept {
            None => write!(out, " * State {i} [nonaccepting]")?,
            Some(acc) => {
                let mut action: String = acc.action.chars().take(20).collect();
                if acc.action.chars().count() > 20 {
                    action.push_str("...");
                }
                write!(out, " * State {i} [accepting, line {} <{action}>]", acc.line_no)?;
                if entry.anchor.has_start() || entry.anchor.has_end() {
                    write!(
                        out,
                        " Anchor: {}{}",
                        if entry.anchor.has_start() { "start " } else { "" },
                        if entry.anchor.has_end() { "end" } else { "" },
                    )?;
                }
            }
        }

        let row = &dfa.trans()[i];
        let mut last_target = FAIL;
        let mut width = 0;
        for (c, &target) in row.iter().enumerate() {
            if target == FAIL {
                continue;
            }
            if target != last_target {
                write!(out, "\n *    goto {target:2} on ")?;
                width = 0;
            }
            let text = escape_byte(c as u8);
            width += text.len();
            write!(out, "{text}")?;
            if width > 56 {
                write!(out, "\n *               ")?;
                width = 0;
            }
            last_target = target;
        }
        writeln!(out)?;
    }
    writeln!(out, " */")?;
    writeln!(out, "#endif")?;
    Ok(())
}

fn print_table<W: Write>(out: &mut W, dfa: &Dfa) -> Result<()> {
    // Entries per printed row.
    const NCOLS: usize = 10;

    writeln!(
        out,
        "YYPRIVATE YY_TTYPE {DTRAN_NAME}[{}][{MAX_CHARS}] =",
        dfa.nstates()
    )?;
    writeln!(out, "{{")?;
    for (i, row) in dfa.trans().iter().enumerate() {
        write!(out, "/* {i:02} */  {{ ")?;
        for (j, &entry) in row.iter().enumerate() {
            write!(out, "{entry:3}")?;
            if j < row.len() - 1 {
                write!(out, ", ")?;
            }
            if j % NCOLS == NCOLS - 1 && j != row.len() - 1 {
                write!(out, "\n            ")?;
            }
        }
        writeln!(out, " }}{}", if i < dfa.nstates() - 1 { "," } else { "" })?;
    }
    writeln!(out, "}};")?;
    writeln!(out)?;
    Ok(())
}

fn print_defnext<W: Write>(out: &mut W, name: &str) -> Result<()> {
    writeln!(
        out,
        "/*\n\
         \x20* yy_next(state, c) is given the current state and input\n\
         \x20* character and evaluates to the next state.\n\
         \x20*/\n\
         #define yy_next(state, c) {name}[state][c]\n"
    )?;
    Ok(())
}

fn print_accept_array<W: Write>(out: &mut W, accept: &[AcceptEntry]) -> Result<()> {
    writeln!(
        out,
        "/*\n\
         \x20* The Yyaccept array has two purposes. If Yyaccept[i] is 0,\n\
         \x20* then state i is nonaccepting. If it is non-zero, then the\n\
         \x20* number determines whether the string is anchored.\n\
         \x20*\t 1 = anchored at start of line\n\
         \x20*\t 2 = anchored at end of line\n\
         \x20*\t 3 = both\n\
         \x20*\t 4 = neither\n\
         \x20*/\n\
         YYPRIVATE YY_TTYPE Yyaccept[] =\n\
         {{"
    )?;
    for (i, entry) in accept.iter().enumerate() {
        writeln!(
            out,
            "\t{:<3}{}  /* State {i:<3} */",
            entry.code(),
            if i == accept.len() - 1 { ' ' } else { ',' },
        )?;
    }
    writeln!(out, "}};")?;
    writeln!(out)?;
    Ok(())
}

fn print_cases<W: Write>(out: &mut W, accept: &[AcceptEntry]) -> Result<()> {
    for (i, entry) in accept.iter().enumerate() {
        if let Some(acc) = &entry.accept {
            writeln!(out, "\t\t\t\t\tcase {i}: /* State {i:<3} */")?;
            writeln!(out, "\t\t\t\t\t\t{}", acc.action)?;
            writeln!(out, "\t\t\t\t\t\tbreak;")?;
        }
    }
    Ok(())
}

/// A printable rendition of a table column for the DFA comment.
fn escape_byte(c: u8) -> String {
    match c {
        b'\\' => "\\\\".to_string(),
        b'\n' => "\\n".to_string(),
        b'\t' => "\\t".to_string(),
        b'\r' => "\\r".to_string(),
        0x08 => "\\b".to_string(),
        0x0c => "\\f".to_string(),
        0x1b => "\\e".to_string(),
        b' ' => "' '".to_string(),
        0x20..=0x7e => (c as char).to_string(),
        _ => format!("\\x{c:02x}"),
    }
}
