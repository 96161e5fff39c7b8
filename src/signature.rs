//! Signature text and the edit-distance comparator.

use crate::error::{CtphError, Operand, ParseSignatureError, Result};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::trace;

static SIGNATURE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+):([A-Za-z0-9+/]+):([A-Za-z0-9+/]+)$")
        .expect("signature pattern is a valid regex")
});

/// A `blocksize:sig1:sig2` fuzzy hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Signature {
    /// Decimal block size without leading zeros. Kept as text so any digit
    /// run the grammar accepts stays comparable.
    block_size: String,
    first: String,
    second: String,
}

/// Strips leading zeros, keeping a single `0` for an all-zero run.
fn normalize_digits(digits: &str) -> &str {
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() { "0" } else { trimmed }
}

impl Signature {
    pub(crate) fn new(block_size: u64, first: String, second: String) -> Self {
        Self {
            block_size: block_size.to_string(),
            first,
            second,
        }
    }

    /// Block size, or `None` if the field does not fit in a `u64`.
    #[must_use]
    pub fn block_size(&self) -> Option<u64> {
        self.block_size.parse().ok()
    }

    /// Half emitted at the block size.
    #[must_use]
    pub fn first_half(&self) -> &str {
        &self.first
    }

    /// Half emitted at twice the block size.
    #[must_use]
    pub fn second_half(&self) -> &str {
        &self.second
    }

    /// Edit distance to `other`: the smaller of the Levenshtein distances
    /// between the first halves and between the second halves. Zero means one
    /// half is identical.
    ///
    /// # Errors
    /// Returns [`CtphError::BlockSizeMismatch`] if the block sizes differ.
    pub fn distance(&self, other: &Signature) -> Result<usize> {
        if self.block_size != other.block_size {
            return Err(CtphError::BlockSizeMismatch {
                first: self.block_size.clone(),
                second: other.block_size.clone(),
            });
        }

        let first = strsim::levenshtein(&self.first, &other.first);
        let second = strsim::levenshtein(&self.second, &other.second);
        Ok(first.min(second))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.block_size, self.first, self.second)
    }
}

impl FromStr for Signature {
    type Err = ParseSignatureError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let error = || ParseSignatureError {
            input: s.to_owned(),
        };

        let captures = SIGNATURE_PATTERN.captures(s).ok_or_else(error)?;

        Ok(Self {
            block_size: normalize_digits(&captures[1]).to_owned(),
            first: captures[2].to_owned(),
            second: captures[3].to_owned(),
        })
    }
}

impl TryFrom<String> for Signature {
    type Error = ParseSignatureError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Signature> for String {
    fn from(signature: Signature) -> Self {
        signature.to_string()
    }
}

/// Compares two signature strings and returns their edit distance.
///
/// # Errors
/// Returns [`CtphError::Format`] naming the first malformed operand, or
/// [`CtphError::BlockSizeMismatch`] if both parse but use different block
/// sizes.
pub fn compare(a: &str, b: &str) -> Result<usize> {
    let first = a.parse::<Signature>().map_err(|_| CtphError::Format {
        operand: Operand::First,
    })?;
    let second = b.parse::<Signature>().map_err(|_| CtphError::Format {
        operand: Operand::Second,
    })?;

    let distance = first.distance(&second)?;
    trace!(a, b, distance, "compared signatures");
    Ok(distance)
}
