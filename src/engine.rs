//! Byte-at-a-time fuzzy hash engine.
//!
//! The engine is fed the whole input once per attempt. When an attempt ends
//! with a first half shorter than [`SPAMSUM_LENGTH`] / 2 characters, the block
//! size is halved and the caller must replay the input from the first byte.

use crate::digest::DigestAccumulator;
use crate::error::{CtphError, Result};
use crate::rolling::RollingChecksum;
use crate::signature::Signature;
use std::fmt;
use tracing::debug;

/// Smallest block size; every block size is `MIN_BLOCK_SIZE * 2^n`.
pub const MIN_BLOCK_SIZE: u64 = 3;

/// Conventional maximum length of the first signature half.
pub const SPAMSUM_LENGTH: usize = 64;

#[allow(clippy::cast_possible_truncation)]
const SPAMSUM_LENGTH_U64: u64 = SPAMSUM_LENGTH as u64;

/// Smallest `3 * 2^n` whose 64 characters can cover `declared_len` bytes.
#[must_use]
pub const fn initial_block_size(declared_len: u64) -> u64 {
    let mut block_size = MIN_BLOCK_SIZE;
    while block_size.saturating_mul(SPAMSUM_LENGTH_U64) < declared_len {
        block_size <<= 1;
    }
    block_size
}

/// Upper bound on the number of attempts for an input of `declared_len` bytes.
#[must_use]
pub const fn max_attempts(declared_len: u64) -> u32 {
    (initial_block_size(declared_len) / MIN_BLOCK_SIZE).ilog2() + 1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Finalized,
}

/// What [`FuzzyHash::step`] did with a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The byte was folded into the current attempt.
    Consumed,
    /// The attempt ended at a halved block size; replay the input from the start.
    Retry,
    /// The signature is final. Further bytes are ignored.
    Finalized,
}

/// Trigger points hit by the most recent byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Triggers {
    /// Checksum hit `block_size - 1` modulo the block size.
    pub first: bool,
    /// Checksum hit `2 * block_size - 1` modulo twice the block size.
    pub second: bool,
}

/// Incremental CTPH state for one input.
///
/// Every field is owned so the whole state can be cloned, or persisted with
/// the `serde` feature, between two calls to [`step`](Self::step).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FuzzyHash {
    block_size: u64,
    declared_len: u64,
    position: u64,
    attempt: u32,
    retry: bool,
    first: DigestAccumulator,
    second: DigestAccumulator,
    rolling: RollingChecksum,
    sig1: String,
    sig2: String,
    triggers: Triggers,
}

impl FuzzyHash {
    /// Starts hashing an input of exactly `declared_len` bytes.
    ///
    /// # Errors
    /// Returns [`CtphError::InvalidInput`] if `declared_len` is zero.
    pub fn new(declared_len: u64) -> Result<Self> {
        if declared_len < 1 {
            return Err(CtphError::InvalidInput);
        }

        Ok(Self {
            block_size: initial_block_size(declared_len),
            declared_len,
            position: 0,
            attempt: 1,
            retry: true,
            first: DigestAccumulator::new(),
            second: DigestAccumulator::new(),
            rolling: RollingChecksum::new(),
            sig1: String::with_capacity(SPAMSUM_LENGTH),
            sig2: String::with_capacity(SPAMSUM_LENGTH / 2),
            triggers: Triggers::default(),
        })
    }

    /// Consumes the next input byte.
    ///
    /// Call this exactly `declared_len` times per attempt, in input order. The
    /// last call of an attempt folds its byte like any other, then closes the
    /// attempt.
    pub fn step(&mut self, byte: u8) -> StepOutcome {
        if !self.retry {
            return StepOutcome::Finalized;
        }

        self.position += 1;
        self.triggers = Triggers::default();

        let checksum = u64::from(self.rolling.advance(byte));
        self.first.update(byte);
        self.second.update(byte);

        if checksum % self.block_size == self.block_size - 1 {
            self.sig1.push(self.first.encode());
            self.first.reset();
            self.triggers.first = true;
        }

        let double = self.block_size * 2;
        if checksum % double == double - 1 {
            self.sig2.push(self.second.encode());
            self.second.reset();
            self.triggers.second = true;
        }

        if self.position >= self.declared_len {
            return self.end_attempt();
        }

        StepOutcome::Consumed
    }

    fn end_attempt(&mut self) -> StepOutcome {
        self.sig1.push(self.first.encode());
        self.sig2.push(self.second.encode());

        // Only the first half decides whether another attempt is needed.
        if self.sig1.len() >= SPAMSUM_LENGTH / 2 || self.block_size == MIN_BLOCK_SIZE {
            self.retry = false;
            debug!(
                block_size = self.block_size,
                attempt = self.attempt,
                "fuzzy hash finalized"
            );
            return StepOutcome::Finalized;
        }

        debug!(
            block_size = self.block_size,
            sig1_len = self.sig1.len(),
            attempt = self.attempt,
            "first half too short, halving block size"
        );
        self.reset_attempt();
        self.block_size /= 2;
        self.attempt += 1;
        StepOutcome::Retry
    }

    fn reset_attempt(&mut self) {
        self.first.reset();
        self.second.reset();
        self.rolling.reset();
        self.sig1.clear();
        self.sig2.clear();
        self.position = 0;
        self.triggers = Triggers::default();
    }

    #[must_use]
    pub fn state(&self) -> State {
        if self.retry {
            State::Running
        } else {
            State::Finalized
        }
    }

    /// `true` while the caller still has to (re)feed the input.
    #[must_use]
    pub fn needs_retry(&self) -> bool {
        self.retry
    }

    #[must_use]
    pub fn block_size(&self) -> u64 {
        self.block_size
    }

    #[must_use]
    pub fn declared_len(&self) -> u64 {
        self.declared_len
    }

    /// Bytes stepped in the current attempt.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// 1-based attempt number.
    #[must_use]
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    #[must_use]
    pub fn first_half(&self) -> &str {
        &self.sig1
    }

    #[must_use]
    pub fn second_half(&self) -> &str {
        &self.sig2
    }

    #[must_use]
    pub fn last_triggers(&self) -> Triggers {
        self.triggers
    }

    /// Signature of the engine as it stands.
    ///
    /// Only canonical once [`state`](Self::state) is [`State::Finalized`];
    /// before that it is a snapshot of the running attempt and either
    /// half may still be empty.
    #[must_use]
    pub fn signature(&self) -> Signature {
        Signature::new(self.block_size, self.sig1.clone(), self.sig2.clone())
    }
}

impl fmt::Display for FuzzyHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.block_size, self.sig1, self.sig2)
    }
}
