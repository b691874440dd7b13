//! Process-wide logging through `fern`.
//!
//! Messages from the crates of this workspace are shown down to `debug`
//! by default; everything else stops at `info`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{Level, LevelFilter};

use crate::Result;

/// Targets whose level is controlled by [`GlobalLogger::verbosity`].
const OUR_TARGETS: &[&str] = &[
    "rsp2_symmetry",
    "rsp2_structure",
    "rsp2_spacegroup",
    "rsp2_kpoints",
];

/// Builder for the global logger.
///
/// ```no_run
/// # fn main() -> rsp2_symmetry::Result<()> {
/// rsp2_symmetry::GlobalLogger::default()
///     .path("symmetry.log")
///     .verbosity(1)
///     .apply()?;
/// # Ok(()) }
/// ```
#[derive(Debug, Clone, Default)]
pub struct GlobalLogger {
    path: Option<PathBuf>,
    verbosity: i32,
}

impl GlobalLogger {
    /// Also write the log to a file, which is truncated.
    pub fn path<P: AsRef<Path>>(&mut self, path: P) -> &mut Self
    { self.path = Some(path.as_ref().to_owned()); self }

    /// Negative is quieter, positive is louder.  Values beyond ±1 saturate.
    pub fn verbosity(&mut self, level: i32) -> &mut Self
    { self.verbosity = level.max(-1).min(1); self }

    fn our_level(&self) -> LevelFilter {
        match self.verbosity {
            v if v < 0 => LevelFilter::Info,
            0 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// Install the logger.  Fails if a logger was already installed.
    pub fn apply(&mut self) -> Result<()> {
        let start = Instant::now();
        let our_level = self.our_level();

        let mut dispatch = fern::Dispatch::new()
            .format(move |out, message, record| {
                let t = start.elapsed();
                out.finish(format_args!(
                    "[{:>4}.{:03}s][{}][{}] {}",
                    t.as_secs(),
                    t.subsec_millis(),
                    record.target(),
                    ColorizedLevel(record.level()),
                    message,
                ))
            })
            .level(LevelFilter::Info)
            .chain(std::io::stdout());

        for &target in OUR_TARGETS {
            dispatch = dispatch.level_for(target, our_level);
        }
        if let Some(path) = &self.path {
            dispatch = dispatch.chain(fern::log_file(path)?);
        }

        dispatch.apply()?;
        debug!("logging at {} for {}", our_level, OUR_TARGETS.join(", "));
        Ok(())
    }
}

/// Displays a level in a terminal color.
#[derive(Debug, Copy, Clone)]
pub struct ColorizedLevel(pub Level);

impl fmt::Display for ColorizedLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ansi_term::Colour::{Red, Cyan, Yellow};

        let style = match self.0 {
            Level::Error => Red.bold(),
            Level::Warn => Red.normal(),
            Level::Info => Cyan.bold(),
            Level::Debug => Yellow.dimmed(),
            Level::Trace => Cyan.normal(),
        };
        write!(f, "{}", style.paint(self.0.to_string()))
    }
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;

    #[test]
    fn verbosity() {
        let mut logger = GlobalLogger::default();
        assert_eq!(logger.our_level(), LevelFilter::Debug);
        logger.verbosity(3);
        assert_eq!(logger.verbosity, 1);
        assert_eq!(logger.our_level(), LevelFilter::Trace);
        logger.verbosity(-7);
        assert_eq!(logger.our_level(), LevelFilter::Info);

        logger.path("out.log");
        assert_eq!(logger.path, Some(PathBuf::from("out.log")));
    }

    #[test]
    fn colorized_level_keeps_the_name() {
        let s = ColorizedLevel(Level::Warn).to_string();
        assert!(s.contains("WARN"));
        assert_ne!(s, "WARN");
    }
}
