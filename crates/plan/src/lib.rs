//! # Dashload Plan
//!
//! Turns a deduplicated [`QueryCollection`] into a rendered load test plan.
//!
//! ```text
//! QueryCollection + Parameters + Overrides
//!     │
//!     ├──> PlanGenerator::prepare
//!     │      ├─ resolve time/start/end/step (overrides > stored > parameters)
//!     │      └─ substitute $variables in every query
//!     │
//!     └──> render_plan(template, PreparedPlan, Parameters) -> String
//! ```
//!
//! Every failure aborts the whole run; there is no partial plan.

mod error;
mod generator;
mod parameters;
mod render;
mod substitute;

pub use dashload_queries::QueryCollection;
pub use error::{PlanError, Result};
pub use generator::{
    live_now, live_now_minus, MissingTimePolicy, Overrides, PlanGenerator, PreparedPlan,
    INTERVAL_PARAMETER, LIVE_NOW_TOKEN, STEP_PARAMETER,
};
pub use parameters::Parameters;
pub use render::render_plan;
pub use substitute::convert_query;

/// Prepare `queries` and render them through `template` in one go.
pub fn generate(
    generator: &PlanGenerator,
    queries: &QueryCollection,
    template: &str,
) -> Result<String> {
    let plan = generator.prepare(queries)?;
    render_plan(template, &plan, generator.parameters())
}
