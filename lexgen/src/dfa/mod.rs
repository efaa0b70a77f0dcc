//! # Deterministic finite automaton
//! The DFA produced by the subset construction. Every DFA state stands for
//! a set of NFA states (its [BitSet]); the transition table is a dense
//! two-dimensional array `trans[state][byte]` holding either the id of the
//! next state or [FAIL].
//!
//! State 0 is always the start state and corresponds to the epsilon
//! closure of the NFA's start node. No two states share the same NFA set.
//! A state is accepting iff its set contains an accepting NFA node; when
//! several qualify, the one with the smallest id wins, which makes rules
//! appearing earlier in the grammar take priority for ambiguous matches.

use crate::bitset::BitSet;
use crate::error::{Error, Result};
use crate::nfa::{Accept, Anchor, NfaNode};

pub mod subset;

pub use subset::subset;

/// Most DFA states a single grammar may produce. Keeping this under 255
/// lets the emitted table use an unsigned char entry type.
pub const DFA_MAX: usize = 254;

/// Width of the transition table: the input alphabet is 7-bit.
pub const MAX_CHARS: usize = 128;

/// Transition-table entry for "no move on this byte".
pub const FAIL: i32 = -1;

#[derive(Debug, Clone)]
pub struct DfaState {
    pub(crate) id: usize,
    pub(crate) mark: bool,
    pub(crate) set: BitSet,
    pub(crate) accept: Option<Accept>,
    pub(crate) anchor: Anchor,
}

impl DfaState {
    pub fn id(&self) -> usize {
        self.id
    }

    /// The NFA states this DFA state represents.
    pub fn set(&self) -> &BitSet {
        &self.set
    }

    pub fn accept(&self) -> Option<&Accept> {
        self.accept.as_ref()
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn is_accepting(&self) -> bool {
        self.accept.is_some()
    }
}

#[derive(Debug, Default)]
pub struct Dfa {
    pub(crate) states: Vec<DfaState>,
    pub(crate) trans: Vec<[i32; MAX_CHARS]>,
}

impl Dfa {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Interns `set` as a new state, inheriting accept metadata from the
    /// given witness node (the lowest-id accepting NFA node of the set).
    pub(crate) fn add_state(&mut self, set: BitSet, witness: Option<&NfaNode>) -> Result<usize> {
        if self.states.len() >= DFA_MAX {
            return Err(Error::TooManyDfaStates(DFA_MAX));
        }
        let id = self.states.len();
        self.states.push(DfaState {
            id,
            mark: false,
            set,
            accept: witness.and_then(|node| node.accept().cloned()),
            anchor: witness.map_or(Anchor::None, NfaNode::anchor),
        });
        self.trans.push([FAIL; MAX_CHARS]);
        Ok(id)
    }

    /// The id of the state whose NFA set equals `set`, if one exists.
    pub(crate) fn find(&self, set: &BitSet) -> Option<usize> {
        self.states.iter().find(|d| d.set == *set).map(|d| d.id)
    }

    /// The lowest-id state not yet expanded by the subset loop.
    pub(crate) fn get_unmarked(&self) -> Option<usize> {
        self.states.iter().find(|d| !d.mark).map(|d| d.id)
    }

    pub fn states(&self) -> &[DfaState] {
        &self.states
    }

    pub fn nstates(&self) -> usize {
        self.states.len()
    }

    /// The transition table, one row of [MAX_CHARS] entries per state.
    pub fn trans(&self) -> &[[i32; MAX_CHARS]] {
        &self.trans
    }

    /// One accept entry per state, in state order, for the emitter.
    pub fn accept_states(&self) -> Vec<AcceptEntry> {
        self.states
            .iter()
            .map(|d| AcceptEntry {
                accept: d.accept.clone(),
                anchor: d.anchor,
            })
            .collect()
    }
}

/// What the emitter needs to know about one DFA state: the action to run
/// when it accepts, and how the match is anchored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptEntry {
    pub accept: Option<Accept>,
    pub anchor: Anchor,
}

impl AcceptEntry {
    /// The anchor encoding used in the emitted `Yyaccept` array:
    /// 0 non-accepting, 1 anchored at line start, 2 at line end, 3 both,
    /// 4 accepting but unanchored.
    pub fn code(&self) -> u8 {
        if self.accept.is_none() {
            return 0;
        }
        match self.anchor {
            Anchor::Start => 1,
            Anchor::End => 2,
            Anchor::Both => 3,
            Anchor::None => 4,
        }
    }
}
