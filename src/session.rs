use std::time::{Duration, Instant};

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::sentences::SentenceSet;

/// Per-character classification of the target against the input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharState {
    Correct,
    Incorrect,
    /// next character to type
    Current,
    Pending,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    InProgress {
        started_at: Option<Instant>,
    },
    /// `started_at` can be unset when the input jumped straight past one char
    Completed {
        started_at: Option<Instant>,
        finished_at: Instant,
    },
}

/// What a call to `submit_input` did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Submit {
    /// session already completed, input rejected
    Ignored,
    Updated,
    Completed,
}

/// One attempt at one sentence
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    target: String,
    input: String,
    phase: Phase,
}

impl Session {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            input: String::new(),
            phase: Phase::InProgress { started_at: None },
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn started_at(&self) -> Option<Instant> {
        match self.phase {
            Phase::InProgress { started_at } | Phase::Completed { started_at, .. } => started_at,
        }
    }

    pub fn finished_at(&self) -> Option<Instant> {
        match self.phase {
            Phase::InProgress { .. } => None,
            Phase::Completed { finished_at, .. } => Some(finished_at),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.phase, Phase::Completed { .. })
    }

    pub fn submit_input(&mut self, value: &str, now: Instant) -> Submit {
        let Phase::InProgress { mut started_at } = self.phase else {
            return Submit::Ignored;
        };

        self.input.clear();
        self.input.push_str(value);

        // only the empty -> one char transition starts the timer
        if started_at.is_none() && value.chars().count() == 1 {
            started_at = Some(now);
        }

        if self.input == self.target {
            self.phase = Phase::Completed {
                started_at,
                finished_at: now,
            };
            Submit::Completed
        } else {
            self.phase = Phase::InProgress { started_at };
            Submit::Updated
        }
    }

    /// Time between the first keystroke and completion, truncated to whole millis
    pub fn elapsed(&self) -> Option<Duration> {
        let (start, end) = (self.started_at()?, self.finished_at()?);
        let millis = end.saturating_duration_since(start).as_millis();
        Some(Duration::from_millis(millis as u64))
    }

    /// Characters per minute of the target sentence; 0 until both timestamps exist
    pub fn speed(&self) -> u64 {
        match self.elapsed() {
            Some(elapsed) => chars_per_minute(self.target.chars().count(), elapsed),
            None => 0,
        }
    }

    pub fn diff(&self) -> Vec<CharState> {
        diff(&self.target, &self.input)
    }
}

/// Round-half-up chars/min. A zero duration scores 0.
pub fn chars_per_minute(chars: usize, elapsed: Duration) -> u64 {
    let secs = elapsed.as_millis() as f64 / 1000.0;
    if secs <= 0.0 {
        return 0;
    }
    (chars as f64 / secs * 60.0 + 0.5).floor() as u64
}

pub fn diff(target: &str, input: &str) -> Vec<CharState> {
    let typed: Vec<char> = input.chars().collect();

    target
        .chars()
        .enumerate()
        .map(|(i, expected)| match typed.get(i) {
            Some(&c) if c == expected => CharState::Correct,
            Some(_) => CharState::Incorrect,
            None if i == typed.len() => CharState::Current,
            None => CharState::Pending,
        })
        .collect()
}

/// Owns the candidate sentences and the live session
#[derive(Debug)]
pub struct Controller<C: Clock = SystemClock, R: Rng = StdRng> {
    sentences: SentenceSet,
    clock: C,
    rng: R,
    session: Session,
}

impl Controller {
    pub fn new(sentences: SentenceSet) -> Self {
        Self::with_parts(sentences, SystemClock, StdRng::from_entropy())
    }
}

impl<C: Clock, R: Rng> Controller<C, R> {
    pub fn with_parts(sentences: SentenceSet, clock: C, mut rng: R) -> Self {
        let session = Session::new(sentences.pick(&mut rng));
        info!(set = sentences.name(), sentence = session.target(), "session started");
        Self {
            sentences,
            clock,
            rng,
            session,
        }
    }

    pub fn restart(&mut self) {
        self.session = Session::new(self.sentences.pick(&mut self.rng));
        info!(sentence = self.session.target(), "session restarted");
    }

    pub fn submit_input(&mut self, value: &str) -> Submit {
        let now = self.clock.now();
        let result = self.session.submit_input(value, now);
        debug!(?result, chars = value.chars().count(), "input submitted");

        if result == Submit::Completed {
            if self.session.started_at().is_none() {
                warn!("completed without a start time, input skipped the first keystroke");
            }
            info!(speed = self.session.speed(), "session completed");
        }
        result
    }

    pub fn compute_speed(&self) -> u64 {
        self.session.speed()
    }

    pub fn diff(&self) -> Vec<CharState> {
        self.session.diff()
    }

    /// Time since the first keystroke, frozen once completed
    pub fn live_elapsed(&self) -> Option<Duration> {
        let start = self.session.started_at()?;
        let end = self.session.finished_at().unwrap_or_else(|| self.clock.now());
        Some(end.saturating_duration_since(start))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn sentences(&self) -> &SentenceSet {
        &self.sentences
    }

    pub fn target(&self) -> &str {
        self.session.target()
    }

    pub fn input(&self) -> &str {
        self.session.input()
    }

    pub fn is_completed(&self) -> bool {
        self.session.is_completed()
    }
}
