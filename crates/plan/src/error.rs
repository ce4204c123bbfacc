use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlanError>;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Query {query} contains a ${variable} variable but no parameter with that name was provided")]
    MissingParameter { query: String, variable: String },

    #[error("Query {query} has no {field} value; provide {hint}")]
    MissingTimeParameter {
        query: String,
        field: &'static str,
        hint: &'static str,
    },

    #[error("{name} must be a positive whole number of seconds that fits the time window, got {value}")]
    InvalidTimeParameter { name: String, value: String },

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Malformed JSON: {0}")]
    Format(#[from] serde_json::Error),

    #[error("Cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
