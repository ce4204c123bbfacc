#![allow(dead_code)]

use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

pub const DASHBOARD: &str = r#"{
  "dashboard": {
    "title": "API",
    "templating": {"list": [{"name": "job", "query": "label_values(up, job)"}]},
    "rows": [
      {
        "panels": [
          {"type": "singlestat", "targets": [{"expr": "sum(up{job=\"$job\"})", "refId": "A"}]},
          {"type": "graph", "targets": [
            {"expr": "rate(http_requests_total{job=\"$job\"}[$range])", "refId": "A"},
            {"expr": "histogram_quantile(0.99, rate(latency_bucket[$range]))", "refId": "B"}
          ]}
        ]
      },
      {
        "panels": [
          {"type": "graph", "targets": [{"expr": "rate(http_requests_total{job=\"$job\"}[$range])"}]},
          {"type": "text", "content": "ignored"}
        ]
      }
    ]
  }
}"#;

pub const TEMPLATE: &str = "{% for name, q in range_queries.items() %}\
RANGE {{ name }} {{ q.query }} start={{ q.start }} end={{ q.end }} step={{ q.step }}\n\
{% endfor %}\
{% for name, q in instant_queries.items() %}\
INSTANT {{ name }} {{ q.query }} time={{ q.time }}\n\
{% endfor %}\
host={{ parameters.host }}\n";

#[allow(deprecated)]
pub fn extractor() -> Command {
    Command::cargo_bin("dashboard-to-queries").expect("binary")
}

#[allow(deprecated)]
pub fn generator() -> Command {
    Command::cargo_bin("generate-test-plan").expect("binary")
}

pub fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

pub fn read_json(path: &Path) -> Value {
    let raw = fs::read_to_string(path).expect("read json");
    serde_json::from_str(&raw).expect("valid json")
}

/// Run the extractor on `DASHBOARD` and return the requests file path.
pub fn extract_fixture(dir: &Path) -> PathBuf {
    let dashboard = write(dir, "dashboard.json", DASHBOARD);
    let requests = dir.join("requests.json");
    extractor()
        .arg("--grafana-dashboard")
        .arg(&dashboard)
        .arg("--requests")
        .arg(&requests)
        .assert()
        .success();
    requests
}
