use serde::Deserialize;
use tracing::Level;

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct Log {
    #[serde(default = "log_level")]
    level: LevelDef,
}

impl Default for Log {
    fn default() -> Self {
        Self { level: log_level() }
    }
}

impl Log {
    pub fn level(&self) -> Level {
        match self.level {
            LevelDef::Error => Level::ERROR,
            LevelDef::Warn => Level::WARN,
            LevelDef::Info => Level::INFO,
            LevelDef::Debug => Level::DEBUG,
            LevelDef::Trace => Level::TRACE,
        }
    }

    /// Applies `-v` flags: one selects debug, two or more select trace. The
    /// configured level is kept when it is already more verbose.
    pub(super) fn raise(&mut self, verbose: u8) {
        let requested = match verbose {
            0 => return,
            1 => LevelDef::Debug,
            _ => LevelDef::Trace,
        };

        if requested > self.level {
            self.level = requested;
        }
    }
}

#[derive(Copy, Clone, Debug, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
enum LevelDef {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

fn log_level() -> LevelDef {
    LevelDef::Info
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity() {
        let mut log = Log::default();
        log.raise(0);
        assert_eq!(log.level(), Level::INFO);
        log.raise(1);
        assert_eq!(log.level(), Level::DEBUG);
        log.raise(3);
        assert_eq!(log.level(), Level::TRACE);

        let mut log = Log {
            level: LevelDef::Trace,
        };
        log.raise(1);
        assert_eq!(log.level(), Level::TRACE);
    }
}
