//! # Logging Flags
//!
//! Every subcommand logs to stderr. Each `-v` raises the verbosity one step
//! above the subcommand's default; `-q` silences everything.

use stderrlog::{LogLevelNum, Timestamp};

/// Default verbosity for commands which write their results to stdout.
pub const WARN_LEVEL: u8 = 2;

/// Default verbosity for commands which report through the log.
pub const INFO_LEVEL: u8 = 3;

/// The most verbose level; further `-v` flags are ignored.
const MAX_LEVEL: u8 = 5;

/// Logging arg group.
#[derive(clap::Args, Debug)]
pub struct LogArgs {
    /// Silence all log output.
    #[arg(short, long)]
    quiet: bool,

    /// More log output, repeatable (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Prefix log lines with a timestamp.
    #[arg(long)]
    ts: bool,
}

impl LogArgs {
    /// The effective verbosity, `0` (off) to `5` (trace).
    fn verbosity(
        &self,
        default: u8,
    ) -> u8 {
        if self.quiet {
            0
        } else {
            default.saturating_add(self.verbose).min(MAX_LEVEL)
        }
    }

    /// Install the stderr logger.
    ///
    /// ## Arguments
    /// * `default` - the verbosity with no `-v` flags; see [`WARN_LEVEL`] and [`INFO_LEVEL`].
    pub fn init(
        &self,
        default: u8,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let level = match self.verbosity(default) {
            0 => LogLevelNum::Off,
            1 => LogLevelNum::Error,
            2 => LogLevelNum::Warn,
            3 => LogLevelNum::Info,
            4 => LogLevelNum::Debug,
            _ => LogLevelNum::Trace,
        };

        let timestamp = match self.ts {
            true => Timestamp::Second,
            false => Timestamp::Off,
        };

        stderrlog::new()
            .verbosity(level)
            .timestamp(timestamp)
            .init()?;
        Ok(())
    }
}
