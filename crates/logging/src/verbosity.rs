/// Verbosity level derived from the CLI's `-v`/`-q` flags.
///
/// Maps onto `tracing` levels rather than defining its own; the only job of
/// this type is to turn "how many `-v` did the user pass, or did they pass
/// `-q`" into an `EnvFilter` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// `-q`: only setup errors.
    Quiet,
    /// Default: setup errors and pass summaries.
    Normal,
    /// `-v`: adds per-offset mismatch lines.
    Verbose,
    /// `-vv` or more: adds per-routine/per-sweep tracing.
    Debug,
}

impl Verbosity {
    /// Derives a level from a repeat count of `-v` and a `-q` flag. `-q`
    /// wins over any number of `-v`.
    #[must_use]
    pub fn from_flags(verbose_count: u8, quiet: bool) -> Self {
        if quiet {
            return Verbosity::Quiet;
        }
        match verbose_count {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    }

    /// The `EnvFilter` directive string for this level, used when
    /// `RUST_LOG` is unset.
    #[must_use]
    pub const fn directive(self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "info",
            Verbosity::Verbose => "warn,ramstress=debug",
            Verbosity::Debug => "debug",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_flag_overrides_verbose_count() {
        assert_eq!(Verbosity::from_flags(3, true), Verbosity::Quiet);
    }

    #[test]
    fn verbose_count_escalates_level() {
        assert_eq!(Verbosity::from_flags(0, false), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(1, false), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(2, false), Verbosity::Debug);
        assert_eq!(Verbosity::from_flags(5, false), Verbosity::Debug);
    }

    #[test]
    fn ordering_is_monotonic() {
        assert!(Verbosity::Quiet < Verbosity::Normal);
        assert!(Verbosity::Normal < Verbosity::Verbose);
        assert!(Verbosity::Verbose < Verbosity::Debug);
    }
}
