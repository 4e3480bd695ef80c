use std::io::{self, IsTerminal, Write};

use idnxtr::Progress;
use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise warnings and errors are shown.
/// `--silent` turns logging off entirely.
pub fn init_logging(silent: bool) {
    let filter = if silent {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Prints pipeline steps to stderr, but only when stderr is connected to a
/// TTY (terminal) and output is not silenced.
pub struct ProgressReporter {
    enabled: bool,
}

impl ProgressReporter {
    pub fn new(silent: bool) -> Self {
        Self {
            enabled: !silent && io::stderr().is_terminal(),
        }
    }

    /// Announce the step that is about to start.
    pub fn start(&self, message: &str) {
        if self.enabled {
            eprint!("\r- {message}...");
            let _ = io::stderr().flush();
        }
    }

    /// Report a finished step.
    pub fn report(&self, progress: &Progress) {
        if self.enabled {
            eprintln!("\r\x1b[2K\u{2714} {progress}");
        }
    }
}
