use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

use crate::error::{PlanError, Result};
use crate::parameters::Parameters;

/// `${name}` (anything up to a quote, `]` or `}`) or bare `$name` (word characters).
static VARIABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\$\{([^"\]}]+)\}|\$(\w+)"#).expect("valid variable pattern"));

/// Replace every `$name` / `${name}` in `query` with its value from `parameters`.
///
/// All referenced names are checked before anything is replaced, so a missing one
/// fails the query without partial output. Replacement is plain substring
/// replacement: when one variable name is a prefix of another (`$range` and
/// `$range_s`), the shorter one also matches inside the longer reference.
pub fn convert_query(name: &str, query: &str, parameters: &Parameters) -> Result<String> {
    let variables: BTreeSet<&str> = VARIABLE
        .captures_iter(query)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str())
        .collect();

    let replacements = variables
        .into_iter()
        .map(|variable| {
            parameters
                .get(variable)
                .map(|value| (variable, value))
                .ok_or_else(|| PlanError::MissingParameter {
                    query: name.to_string(),
                    variable: variable.to_string(),
                })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut converted = query.to_string();
    for (variable, value) in replacements {
        converted = converted
            .replace(&format!("${{{variable}}}"), value)
            .replace(&format!("${variable}"), value);
    }
    Ok(converted)
}
