use anyhow::Result;
use clap::Parser;

mod extract;
mod generate;
mod logging;
mod output;

pub use extract::{run_extract, ExtractCli, ModeArg};
pub use generate::{run_generate, GenerateCli};
pub use logging::LogArgs;

/// Entry point of `dashboard-to-queries`.
pub fn extract_main() -> Result<()> {
    let cli = ExtractCli::parse();
    cli.log.init();
    run_extract(&cli)
}

/// Entry point of `generate-test-plan`.
pub fn generate_main() -> Result<()> {
    let cli = GenerateCli::parse();
    cli.log.init();
    run_generate(&cli)
}
