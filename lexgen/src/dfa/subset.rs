//! The subset construction: turns the NFA into a DFA accepting the same
//! language by treating sets of NFA states as single DFA states.
//!
//! Two primitives drive it. [epsilon_closure] expands a set in place with
//! everything reachable on epsilon edges alone and reports the lowest-id
//! accepting node it saw. [move_on] collects the states reachable from a
//! set by consuming one byte. The main loop repeatedly picks an unmarked
//! DFA state, marks it, and fills in its whole transition row; a `move`
//! result that matches an existing state's set is discarded in favour of
//! that state's id, so no two DFA states ever share a set. Termination
//! follows from the interning: the state universe is finite and nothing is
//! added twice.
//!
//! States are expanded in the order they are interned and columns in
//! ascending byte order, so the table built for a given grammar is
//! identical from run to run.

use crate::bitset::BitSet;
use crate::dfa::{Dfa, FAIL, MAX_CHARS};
use crate::error::Result;
use crate::nfa::{Edge, Nfa};
use log::debug;

/// Converts `nfa` into a DFA.
pub fn subset(nfa: &Nfa) -> Result<Dfa> {
    let mut dfa = Dfa::new();

    let mut start = BitSet::new(nfa.len());
    start.add(nfa.start());
    let witness = epsilon_closure(nfa, &mut start);
    dfa.add_state(start, witness.map(|id| nfa.node(id)))?;

    while let Some(current) = dfa.get_unmarked() {
        dfa.states[current].mark = true;

        for c in 0..MAX_CHARS {
            let entry = match move_on(nfa, &dfa.states[current].set, c as u8) {
                None => FAIL,
                Some(mut moved) => {
                    let witness = epsilon_closure(nfa, &mut moved);
                    match dfa.find(&moved) {
                        Some(existing) => existing as i32,
                        None => dfa.add_state(moved, witness.map(|id| nfa.node(id)))? as i32,
                    }
                }
            };
            dfa.trans[current][c] = entry;
        }
        debug!(
            "expanded DFA state {current}, {} states so far",
            dfa.nstates()
        );
    }

    debug!("subset construction finished with {} states", dfa.nstates());
    Ok(dfa)
}

/// Expands `set` in place to its epsilon closure: every NFA state reachable
/// from a member by zero or more epsilon transitions. Returns the accepting
/// member with the smallest id, if any, as the accept witness for the DFA
/// state this set becomes.
pub(crate) fn epsilon_closure(nfa: &Nfa, set: &mut BitSet) -> Option<usize> {
    let mut stack: Vec<usize> = set.iter().collect();
    let mut witness: Option<usize> = None;

    while let Some(i) = stack.pop() {
        let node = nfa.node(i);
        if node.is_accepting() && witness.map_or(true, |w| i < w) {
            witness = Some(i);
        }
        if *node.edge() == Edge::Epsilon {
            for succ in [node.next(), node.next2()].into_iter().flatten() {
                if !set.contains(succ) {
                    set.add(succ);
                    stack.push(succ);
                }
            }
        }
    }
    witness
}

/// The set of NFA states reachable from a member of `set` by consuming the
/// byte `c`, or `None` when there are none.
pub(crate) fn move_on(nfa: &Nfa, set: &BitSet, c: u8) -> Option<BitSet> {
    let mut out: Option<BitSet> = None;

    for i in set.iter() {
        let node = nfa.node(i);
        let takes = match node.edge() {
            Edge::Char(b) => *b == c,
            Edge::CharClass(class) => class.contains(c as usize),
            Edge::Epsilon | Edge::Empty => false,
        };
        if takes {
            if let Some(next) = node.next() {
                out.get_or_insert_with(|| BitSet::new(nfa.len())).add(next);
            }
        }
    }
    out
}
