//! The global sink to which statistics are written.
//!
//! Statistics are only written once a sink has been configured with
//! [`configure_statistic_logging`]. Every statistic becomes one line of the form
//! `{prefix} {name}={value}`.
use std::fmt::Display;
use std::io::Write;
use std::sync::Mutex;
use std::sync::OnceLock;

use convert_case::Case;
use convert_case::Casing;
use log::debug;

/// How statistics are rendered, and where they are written to.
pub struct StatisticOptions {
    prefix: &'static str,
    /// Written once all statistics of a session are logged.
    postfix: Option<&'static str>,
    casing: Option<Case>,
    writer: Mutex<Box<dyn Write + Send + Sync>>,
}

impl std::fmt::Debug for StatisticOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatisticOptions")
            .field("prefix", &self.prefix)
            .field("postfix", &self.postfix)
            .field("casing", &self.casing)
            .finish_non_exhaustive()
    }
}

impl StatisticOptions {
    fn render(&self, name: impl Display, value: impl Display) -> String {
        let name = match self.casing {
            Some(casing) => name.to_string().to_case(casing),
            None => name.to_string(),
        };
        format!("{} {name}={value}", self.prefix)
    }

    fn write_line(&self, line: &str) {
        let Ok(mut writer) = self.writer.lock() else {
            return;
        };

        if let Err(e) = writeln!(writer, "{line}") {
            debug!("Could not write statistic: {e}");
        }
    }
}

static STATISTIC_OPTIONS: OnceLock<StatisticOptions> = OnceLock::new();

/// Start writing statistics. Lines are prefixed by `prefix`, names are converted to `casing`,
/// and the output goes to `writer` (standard output when `None`).
///
/// Only the first configuration takes effect.
pub fn configure_statistic_logging(
    prefix: &'static str,
    postfix: Option<&'static str>,
    casing: Option<Case>,
    writer: Option<Box<dyn Write + Send + Sync>>,
) {
    let _ = STATISTIC_OPTIONS.get_or_init(|| StatisticOptions {
        prefix,
        postfix,
        casing,
        writer: Mutex::new(writer.unwrap_or_else(|| Box::new(std::io::stdout()))),
    });
}

/// Write the statistic `name` with `value`, if statistics are logged.
pub fn log_statistic(name: impl Display, value: impl Display) {
    if let Some(options) = STATISTIC_OPTIONS.get() {
        options.write_line(&options.render(name, value));
    }
}

/// Write the configured postfix, if there is one.
pub fn log_statistic_postfix() {
    if let Some(options) = STATISTIC_OPTIONS.get() {
        if let Some(postfix) = options.postfix {
            options.write_line(postfix);
        }
    }
}

pub fn should_log_statistics() -> bool {
    STATISTIC_OPTIONS.get().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(casing: Option<Case>) -> StatisticOptions {
        StatisticOptions {
            prefix: "c STAT",
            postfix: None,
            casing,
            writer: Mutex::new(Box::new(std::io::sink())),
        }
    }

    #[test]
    fn names_are_converted_to_the_configured_case() {
        assert_eq!(
            "c STAT coreReductionNumCandidates=4",
            options(Some(Case::Camel)).render("core_reduction_num_candidates", 4)
        );
    }

    #[test]
    fn names_are_kept_without_a_case() {
        assert_eq!(
            "c STAT higher_order_max_depth=2",
            options(None).render("higher_order_max_depth", 2)
        );
    }
}
