//! Review scores and the derived title rating.

use serde::{Deserialize, Serialize};

use crate::validation::{FieldError, ValidationReason};

pub const MIN_SCORE: i16 = 1;
pub const MAX_SCORE: i16 = 10;

/// A review score, guaranteed to lie in `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Score(i16);

impl Score {
    pub fn new(value: i64) -> Result<Self, FieldError> {
        if (MIN_SCORE as i64..=MAX_SCORE as i64).contains(&value) {
            Ok(Self(value as i16))
        } else {
            Err(FieldError::new("score", ValidationReason::ScoreRange))
        }
    }

    pub fn get(self) -> i16 {
        self.0
    }
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        Score::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Running sum and count of the scores of one title.
///
/// The rating is never stored; it is derived from a tally taken over the
/// current review rows at read time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreTally {
    pub sum: i64,
    pub count: i64,
}

impl ScoreTally {
    /// Arithmetic mean of the scores; `None` when there are no reviews.
    pub fn mean(self) -> Option<f64> {
        (self.count > 0).then(|| self.sum as f64 / self.count as f64)
    }
}
