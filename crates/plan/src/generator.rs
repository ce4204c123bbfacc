use dashload_queries::{InstantQuery, QueryCollection, RangeQuery, TimeParam};
use log::{debug, info};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{PlanError, Result};
use crate::parameters::Parameters;
use crate::substitute::convert_query;

/// JMeter function evaluating to the current unix time in seconds.
pub const LIVE_NOW_TOKEN: &str = "${__time(/1000)}";

/// Parameter supplying the range window (seconds) when a query has no `start`.
pub const INTERVAL_PARAMETER: &str = "interval_s";

/// Parameter supplying the range step (seconds) when a query has no `step`.
pub const STEP_PARAMETER: &str = "step_s";

pub fn live_now() -> TimeParam {
    TimeParam::token(LIVE_NOW_TOKEN)
}

/// JMeter expression for "current time minus `seconds`".
pub fn live_now_minus(seconds: i64) -> TimeParam {
    TimeParam::Token(format!("${{__jexl2({LIVE_NOW_TOKEN} - {seconds})}}"))
}

/// Command-line values that win over anything stored with the queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overrides {
    /// Evaluation/end time; `0` means live now
    pub now: Option<i64>,
    /// Range window in seconds
    pub interval: Option<i64>,
    /// Range step in seconds
    pub step: Option<i64>,
}

/// What to do when an instant `time` or range `end` has no value from either the
/// overrides or the query file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingTimePolicy {
    /// Fall back to the live-now token
    #[default]
    LiveNow,
    /// Fail with [`PlanError::MissingTimeParameter`]
    Strict,
}

/// Queries with every time field resolved and every variable substituted,
/// ready to hand to the template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreparedPlan {
    pub instant_queries: BTreeMap<String, InstantQuery>,
    pub range_queries: BTreeMap<String, RangeQuery>,
}

#[derive(Debug, Clone, Default)]
pub struct PlanGenerator {
    parameters: Parameters,
    overrides: Overrides,
    policy: MissingTimePolicy,
}

impl PlanGenerator {
    pub fn new(parameters: Parameters, overrides: Overrides) -> Self {
        Self {
            parameters,
            overrides,
            policy: MissingTimePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: MissingTimePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Resolve working copies of every query; `queries` itself is left untouched.
    pub fn prepare(&self, queries: &QueryCollection) -> Result<PreparedPlan> {
        let mut plan = PreparedPlan::default();
        for (name, query) in &queries.instant_queries {
            let resolved = self.resolve_instant(name, query)?;
            debug!("Instant query {name}: time={:?}", resolved.time);
            plan.instant_queries.insert(name.clone(), resolved);
        }
        for (name, query) in &queries.range_queries {
            let resolved = self.resolve_range(name, query)?;
            debug!(
                "Range query {name}: start={:?} end={:?} step={:?}",
                resolved.start, resolved.end, resolved.step
            );
            plan.range_queries.insert(name.clone(), resolved);
        }
        info!(
            "Prepared {} instant and {} range queries",
            plan.instant_queries.len(),
            plan.range_queries.len()
        );
        Ok(plan)
    }

    fn resolve_instant(&self, name: &str, query: &InstantQuery) -> Result<InstantQuery> {
        let time = match self.now_override().or_else(|| query.time.clone()) {
            Some(time) => time,
            None => self.missing_now(name, "time")?,
        };
        Ok(InstantQuery {
            query: convert_query(name, &query.query, &self.parameters)?,
            time: Some(time),
        })
    }

    fn resolve_range(&self, name: &str, query: &RangeQuery) -> Result<RangeQuery> {
        let end = match self.now_override().or_else(|| query.end.clone()) {
            Some(end) => end,
            None => self.missing_now(name, "end")?,
        };

        let start = match (self.overrides.interval, &query.start) {
            (Some(interval), _) => {
                start_before(&end, positive_seconds("--interval", interval)?)?
            }
            (None, Some(start)) => start.clone(),
            (None, None) => start_before(&end, self.interval_parameter(name)?)?,
        };

        let step = match (self.overrides.step, &query.step) {
            (Some(step), _) => TimeParam::Int(positive_seconds("--step", step)?),
            (None, Some(step)) => step.clone(),
            (None, None) => self.step_parameter(name)?,
        };

        Ok(RangeQuery {
            query: convert_query(name, &query.query, &self.parameters)?,
            start: Some(start),
            end: Some(end),
            step: Some(step),
        })
    }

    fn now_override(&self) -> Option<TimeParam> {
        self.overrides.now.map(|now| match now {
            0 => live_now(),
            timestamp => TimeParam::Int(timestamp),
        })
    }

    fn missing_now(&self, name: &str, field: &'static str) -> Result<TimeParam> {
        match self.policy {
            MissingTimePolicy::LiveNow => Ok(live_now()),
            MissingTimePolicy::Strict => Err(PlanError::MissingTimeParameter {
                query: name.to_string(),
                field,
                hint: "--now",
            }),
        }
    }

    fn interval_parameter(&self, name: &str) -> Result<i64> {
        let raw = self
            .parameters
            .get(INTERVAL_PARAMETER)
            .ok_or_else(|| PlanError::MissingTimeParameter {
                query: name.to_string(),
                field: "start",
                hint: "--interval or an interval_s parameter",
            })?;
        let interval = raw
            .trim()
            .parse()
            .map_err(|_| PlanError::InvalidTimeParameter {
                name: INTERVAL_PARAMETER.to_string(),
                value: raw.to_string(),
            })?;
        positive_seconds(INTERVAL_PARAMETER, interval)
    }

    fn step_parameter(&self, name: &str) -> Result<TimeParam> {
        let raw = self
            .parameters
            .get(STEP_PARAMETER)
            .ok_or_else(|| PlanError::MissingTimeParameter {
                query: name.to_string(),
                field: "step",
                hint: "--step or a step_s parameter",
            })?;
        match raw.trim().parse() {
            Ok(step) => Ok(TimeParam::Int(positive_seconds(STEP_PARAMETER, step)?)),
            Err(_) => Ok(TimeParam::token(raw)),
        }
    }
}

fn positive_seconds(name: &str, seconds: i64) -> Result<i64> {
    if seconds > 0 {
        Ok(seconds)
    } else {
        Err(PlanError::InvalidTimeParameter {
            name: name.to_string(),
            value: seconds.to_string(),
        })
    }
}

/// `end - interval`: a literal when `end` is a literal timestamp, otherwise
/// relative to live now.
fn start_before(end: &TimeParam, interval: i64) -> Result<TimeParam> {
    match end {
        TimeParam::Int(end) => end
            .checked_sub(interval)
            .map(TimeParam::Int)
            .ok_or_else(|| PlanError::InvalidTimeParameter {
                name: "interval".to_string(),
                value: format!("{interval} (before {end})"),
            }),
        TimeParam::Token(_) => Ok(live_now_minus(interval)),
    }
}
