use anyhow::{Context, Result};
use clap::Parser;
use dashload_plan::{generate, MissingTimePolicy, Overrides, Parameters, PlanGenerator};
use dashload_queries::QueryCollection;
use std::path::PathBuf;

use crate::logging::LogArgs;
use crate::output::write_atomic;

#[derive(Parser, Debug)]
#[command(name = "generate-test-plan")]
#[command(about = "Render a JMeter test plan for a PromQL endpoint from extracted queries", long_about = None)]
#[command(version)]
pub struct GenerateCli {
    /// JMeter test template to use
    #[arg(short, long)]
    pub template: PathBuf,

    /// Where to write the final JMeter test file
    #[arg(short, long)]
    pub output: PathBuf,

    /// Requests file produced by dashboard-to-queries
    #[arg(short, long)]
    pub requests: PathBuf,

    /// JSON file, or inline JSON object, with parameters for the queries and template
    #[arg(short, long, value_name = "FILE_OR_JSON")]
    pub parameters: Option<String>,

    /// End of the request interval as a unix timestamp in seconds (0 = current time)
    #[arg(short, long)]
    pub now: Option<i64>,

    /// Time interval in seconds for range requests
    #[arg(short, long, value_parser = clap::value_parser!(i64).range(1..))]
    pub interval: Option<i64>,

    /// Step in seconds for range requests
    #[arg(short, long, value_parser = clap::value_parser!(i64).range(1..))]
    pub step: Option<i64>,

    /// Fail instead of defaulting to the current time when a query has no time/end
    #[arg(long)]
    pub strict_time: bool,

    #[command(flatten)]
    pub log: LogArgs,
}

impl GenerateCli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            now: self.now,
            interval: self.interval,
            step: self.step,
        }
    }

    pub fn policy(&self) -> MissingTimePolicy {
        if self.strict_time {
            MissingTimePolicy::Strict
        } else {
            MissingTimePolicy::LiveNow
        }
    }
}

pub fn run_generate(cli: &GenerateCli) -> Result<()> {
    let queries = QueryCollection::load(&cli.requests)
        .with_context(|| format!("Failed to load requests from {}", cli.requests.display()))?;
    let template = std::fs::read_to_string(&cli.template)
        .with_context(|| format!("Cannot read template {}", cli.template.display()))?;
    let parameters = match &cli.parameters {
        Some(source) => Parameters::load(source).context("Failed to load parameters")?,
        None => Parameters::new(),
    };
    log::debug!("Loaded {} parameters", parameters.len());

    let generator = PlanGenerator::new(parameters, cli.overrides()).with_policy(cli.policy());
    let rendered =
        generate(&generator, &queries, &template).context("Failed to generate test plan")?;

    write_atomic(&cli.output, rendered.as_bytes())
        .with_context(|| format!("Failed to write test plan {}", cli.output.display()))?;
    log::info!("Wrote test plan to {}", cli.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_flags_match_long_ones() {
        let cli = GenerateCli::parse_from([
            "generate-test-plan",
            "-t",
            "plan.jmx.j2",
            "-o",
            "plan.jmx",
            "-r",
            "requests.json",
            "-p",
            r#"{"step_s": "15"}"#,
            "-n",
            "0",
            "-i",
            "300",
            "-s",
            "15",
        ]);
        assert_eq!(
            cli.overrides(),
            Overrides {
                now: Some(0),
                interval: Some(300),
                step: Some(15),
            }
        );
        assert_eq!(cli.parameters.as_deref(), Some(r#"{"step_s": "15"}"#));
        assert_eq!(cli.policy(), MissingTimePolicy::LiveNow);
    }

    #[test]
    fn strict_time_selects_strict_policy() {
        let cli = GenerateCli::parse_from([
            "generate-test-plan",
            "--template",
            "t",
            "--output",
            "o",
            "--requests",
            "r",
            "--strict-time",
        ]);
        assert_eq!(cli.policy(), MissingTimePolicy::Strict);
        assert_eq!(cli.overrides(), Overrides::default());
    }

    #[test]
    fn non_positive_window_flags_are_rejected() {
        for (flag, value) in [("-i", "0"), ("-i", "-300"), ("-s", "0"), ("-s", "-5")] {
            let result = GenerateCli::try_parse_from([
                "generate-test-plan",
                "-t",
                "t",
                "-o",
                "o",
                "-r",
                "r",
                flag,
                value,
            ]);
            assert!(result.is_err(), "{flag} {value} should be rejected");
        }
    }

    #[test]
    fn template_output_and_requests_are_required() {
        assert!(GenerateCli::try_parse_from(["generate-test-plan", "-t", "t", "-o", "o"]).is_err());
    }
}
