//! Sequential candidate probing.
//!
//! A card's preview is found by trying candidates strictly in priority order:
//! the next candidate is attempted only after the current one has definitively
//! failed, and the first success ends the sequence. [`ProbeSequence`] is the
//! state machine behind that rule; drivers (the browser's element loader, the
//! filesystem checker, test fakes) perform the actual loads and report back.
//!
//! ```text
//! start ──► Probe(#1 jpg) ──Failed──► Discard #1, Probe(#2 png) ──Loaded──► Attach #2
//!                                                          └──Failed──► Discard #2, Exhausted
//! ```
//!
//! Each attempt is settled at most once. Browser loads can report more than
//! one signal for the same attempt (an `error` and the document timeout, or a
//! late `load` after the timeout already failed it); every signal after the
//! first, and every signal for a superseded attempt, settles as
//! [`Settlement::Ignored`].

use crate::naming::{AssetKind, Candidate};

/// Identifies one attempt within a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttemptId(u32);

/// A candidate handed to a driver to load.
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    pub id: AttemptId,
    pub candidate: Candidate,
}

/// How a driver saw an attempt end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Loaded,
    Failed,
    /// No signal within the document timeout. Treated as a failure.
    TimedOut,
}

/// What the driver should do next.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Probe(Attempt),
    /// Nothing left to try: clear the surface markers and stop.
    Exhausted,
}

/// Result of reporting an outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum Settlement {
    /// Duplicate, late, or stale signal. Do nothing.
    Ignored,
    /// Attach this attempt's element and mark the surface for `kind`.
    Attach { attempt: AttemptId, kind: AssetKind },
    /// Remove this attempt's element, then carry on with `then`.
    Discard { attempt: AttemptId, then: Step },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Probing(AttemptId),
    Resolved(usize),
    Exhausted,
}

#[derive(Debug)]
pub struct ProbeSequence {
    candidates: Vec<Candidate>,
    index: usize,
    next_id: u32,
    failures: usize,
    state: State,
}

impl ProbeSequence {
    /// Begin probing `candidates` in order, returning the first step.
    pub fn start(candidates: Vec<Candidate>) -> (Self, Step) {
        let mut sequence = Self {
            candidates,
            index: 0,
            next_id: 0,
            failures: 0,
            state: State::Exhausted,
        };
        let step = sequence.step_at(0);
        (sequence, step)
    }

    /// Report the outcome of an attempt.
    pub fn settle(&mut self, attempt: AttemptId, outcome: ProbeOutcome) -> Settlement {
        if self.state != State::Probing(attempt) {
            return Settlement::Ignored;
        }
        match outcome {
            ProbeOutcome::Loaded => {
                self.state = State::Resolved(self.index);
                Settlement::Attach {
                    attempt,
                    kind: self.candidates[self.index].kind(),
                }
            }
            ProbeOutcome::Failed | ProbeOutcome::TimedOut => {
                self.failures += 1;
                let then = self.step_at(self.index + 1);
                Settlement::Discard { attempt, then }
            }
        }
    }

    fn step_at(&mut self, index: usize) -> Step {
        self.index = index;
        match self.candidates.get(index) {
            Some(candidate) => {
                let id = AttemptId(self.next_id);
                self.next_id += 1;
                self.state = State::Probing(id);
                Step::Probe(Attempt {
                    id,
                    candidate: candidate.clone(),
                })
            }
            None => {
                self.state = State::Exhausted;
                Step::Exhausted
            }
        }
    }

    /// The candidate that loaded, once the sequence has resolved.
    pub fn resolved(&self) -> Option<&Candidate> {
        match self.state {
            State::Resolved(index) => self.candidates.get(index),
            _ => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == State::Exhausted
    }

    /// Number of attempts that settled as failed or timed out.
    pub fn failures(&self) -> usize {
        self.failures
    }
}
