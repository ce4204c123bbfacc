use clap::Args;
use log::LevelFilter;

/// Verbosity flags shared by both binaries.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct LogArgs {
    /// Debug mode (DEBUG level)
    #[arg(short, long, conflicts_with = "verbose")]
    pub debug: bool,

    /// Verbose mode (INFO level)
    #[arg(short, long)]
    pub verbose: bool,
}

impl LogArgs {
    /// Explicit level from the flags; `None` leaves the `RUST_LOG`/WARN default.
    pub fn level(&self) -> Option<LevelFilter> {
        if self.debug {
            Some(LevelFilter::Debug)
        } else if self.verbose {
            Some(LevelFilter::Info)
        } else {
            None
        }
    }

    /// Install the process logger on stderr. Called once, from `main`.
    pub fn init(&self) {
        let mut builder =
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
        if let Some(level) = self.level() {
            builder.filter_level(level);
        }
        builder.target(env_logger::Target::Stderr).init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_to_levels() {
        assert_eq!(LogArgs::default().level(), None);
        let verbose = LogArgs {
            verbose: true,
            ..LogArgs::default()
        };
        assert_eq!(verbose.level(), Some(LevelFilter::Info));
        let debug = LogArgs {
            debug: true,
            ..LogArgs::default()
        };
        assert_eq!(debug.level(), Some(LevelFilter::Debug));
    }
}
