use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::fingerprint::Fingerprint;

/// Value of a time-related query field.
///
/// Either a literal number of seconds (a unix timestamp for `time`/`start`/`end`,
/// a duration for `step`) or a token the load-testing engine evaluates at run time.
/// Whole-valued JSON floats (`15.0`) load as integers; fractional seconds are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum TimeParam {
    Int(i64),
    Token(String),
}

impl TimeParam {
    pub fn token(value: impl Into<String>) -> Self {
        Self::Token(value.into())
    }
}

impl From<i64> for TimeParam {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl<'de> Deserialize<'de> for TimeParam {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TimeParamVisitor)
    }
}

struct TimeParamVisitor;

impl<'de> Visitor<'de> for TimeParamVisitor {
    type Value = TimeParam;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a whole number of seconds or a token string")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<TimeParam, E> {
        Ok(TimeParam::Int(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<TimeParam, E> {
        i64::try_from(value)
            .map(TimeParam::Int)
            .map_err(|_| E::invalid_value(Unexpected::Unsigned(value), &self))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<TimeParam, E> {
        // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound
        if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 {
            Ok(TimeParam::Int(value as i64))
        } else {
            Err(E::invalid_value(Unexpected::Float(value), &self))
        }
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<TimeParam, E> {
        Ok(TimeParam::token(value))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<TimeParam, E> {
        Ok(TimeParam::Token(value))
    }
}

impl fmt::Display for TimeParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Token(token) => f.write_str(token),
        }
    }
}

/// Query evaluated at a single point in time (gauge/singlestat panels).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstantQuery {
    pub query: String,

    /// Evaluation time; `None` until the plan generator resolves it
    #[serde(default)]
    pub time: Option<TimeParam>,
}

impl InstantQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            time: None,
        }
    }

    /// Content fingerprint used as the collection key.
    ///
    /// Covers `query` and `time`, so equal queries always share a key. The key is the
    /// first 64 bits of a SHA-256 digest in hex: collisions between different queries
    /// are improbable but not ruled out.
    pub fn hash_key(&self) -> String {
        let mut fp = Fingerprint::new(b'I');
        fp.text(&self.query);
        fp.time(self.time.as_ref());
        fp.finish()
    }
}

/// Query evaluated over `[start, end]` every `step` seconds (graph panels).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RangeQuery {
    pub query: String,
    #[serde(default)]
    pub start: Option<TimeParam>,
    #[serde(default)]
    pub end: Option<TimeParam>,
    #[serde(default)]
    pub step: Option<TimeParam>,
}

impl RangeQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            start: None,
            end: None,
            step: None,
        }
    }

    /// Content fingerprint over all four fields; see [`InstantQuery::hash_key`].
    pub fn hash_key(&self) -> String {
        let mut fp = Fingerprint::new(b'R');
        fp.text(&self.query);
        fp.time(self.start.as_ref());
        fp.time(self.end.as_ref());
        fp.time(self.step.as_ref());
        fp.finish()
    }
}
