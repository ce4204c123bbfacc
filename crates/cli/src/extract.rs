use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dashload_extractor::{extract, ExtractMode, PanelKinds};
use serde_json::Value;
use std::path::PathBuf;

use crate::logging::LogArgs;
use crate::output::write_atomic;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Typed panels: `type` + `targets[].expr`
    Panels,
    /// Every value stored under `--key`, as range queries
    Key,
}

#[derive(Parser, Debug)]
#[command(name = "dashboard-to-queries")]
#[command(about = "Extract PromQL queries from a Grafana dashboard into a requests file", long_about = None)]
#[command(version)]
pub struct ExtractCli {
    /// Dashboard to convert into queries
    #[arg(short = 'g', long)]
    pub grafana_dashboard: PathBuf,

    /// File to store the queries found in the dashboard, keyed by hash
    #[arg(short, long)]
    pub requests: PathBuf,

    /// How queries are recognized in the dashboard
    #[arg(long, value_enum, default_value_t = ModeArg::Panels)]
    pub mode: ModeArg,

    /// Key holding query expressions (key mode)
    #[arg(long, default_value = "expr")]
    pub key: String,

    /// Extra panel type producing instant queries (panels mode, repeatable)
    #[arg(long = "instant-panel", value_name = "TYPE")]
    pub instant_panels: Vec<String>,

    /// Extra panel type producing range queries (panels mode, repeatable)
    #[arg(long = "range-panel", value_name = "TYPE")]
    pub range_panels: Vec<String>,

    #[command(flatten)]
    pub log: LogArgs,
}

impl ExtractCli {
    pub fn extract_mode(&self) -> ExtractMode {
        match self.mode {
            ModeArg::Key => ExtractMode::Key(self.key.clone()),
            ModeArg::Panels => {
                let kinds = self
                    .instant_panels
                    .iter()
                    .fold(PanelKinds::default(), |kinds, t| kinds.with_instant(t.as_str()));
                let kinds = self
                    .range_panels
                    .iter()
                    .fold(kinds, |kinds, t| kinds.with_range(t.as_str()));
                ExtractMode::Panels(kinds)
            }
        }
    }
}

pub fn run_extract(cli: &ExtractCli) -> Result<()> {
    let path = &cli.grafana_dashboard;
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read dashboard {}", path.display()))?;
    let dashboard: Value = serde_json::from_str(&raw)
        .with_context(|| format!("Dashboard {} is not valid JSON", path.display()))?;

    let queries = extract(&dashboard, &cli.extract_mode());
    if queries.is_empty() {
        log::warn!("No queries found in {}", path.display());
    }
    log::info!(
        "Found {} instant and {} range queries in {}",
        queries.instant_queries.len(),
        queries.range_queries.len(),
        path.display()
    );

    let bytes = queries.to_json_pretty().context("Failed to serialize queries")?;
    write_atomic(&cli.requests, &bytes)
        .with_context(|| format!("Failed to write requests file {}", cli.requests.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashload_extractor::QueryKind;

    #[test]
    fn panel_flags_extend_default_kinds() {
        let cli = ExtractCli::parse_from([
            "dashboard-to-queries",
            "-g",
            "dash.json",
            "-r",
            "requests.json",
            "--instant-panel",
            "stat",
            "--range-panel",
            "timeseries",
        ]);
        let ExtractMode::Panels(kinds) = cli.extract_mode() else {
            panic!("expected panels mode");
        };
        assert_eq!(kinds.kind_of("stat"), Some(QueryKind::Instant));
        assert_eq!(kinds.kind_of("timeseries"), Some(QueryKind::Range));
        assert_eq!(kinds.kind_of("graph"), Some(QueryKind::Range));
    }

    #[test]
    fn key_mode_uses_key_flag() {
        let cli = ExtractCli::parse_from([
            "dashboard-to-queries",
            "--grafana-dashboard",
            "dash.json",
            "--requests",
            "requests.json",
            "--mode",
            "key",
            "--key",
            "query",
        ]);
        assert_eq!(cli.extract_mode(), ExtractMode::Key("query".to_string()));
    }

    #[test]
    fn debug_and_verbose_conflict() {
        let result = ExtractCli::try_parse_from([
            "dashboard-to-queries",
            "-g",
            "d.json",
            "-r",
            "r.json",
            "-d",
            "-v",
        ]);
        assert!(result.is_err());
    }
}
