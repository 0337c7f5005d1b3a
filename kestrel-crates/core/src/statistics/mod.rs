//! Statistics of a solving session.
//!
//! Every component keeps its counters in a struct generated by
//! [`create_statistics_struct!`](crate::create_statistics_struct), and logs them under its own
//! name through a [`StatisticLogger`].
mod sink;

use std::fmt::Display;

use itertools::Itertools;
pub use sink::configure_statistic_logging;
pub use sink::log_statistic;
pub use sink::log_statistic_postfix;
pub use sink::should_log_statistics;
pub use sink::StatisticOptions;

/// Logs statistics under a name which is built from segments, such as `core_reduction` for the
/// statistics of the core reduction.
#[derive(Debug, Default, Clone)]
pub struct StatisticLogger {
    name: String,
}

impl StatisticLogger {
    pub fn new<Segment: Display>(segments: impl IntoIterator<Item = Segment>) -> Self {
        StatisticLogger {
            name: segments.into_iter().join("_"),
        }
    }

    /// A logger for the statistics nested under `segment`.
    pub fn attach_to_prefix(&self, segment: impl Display) -> Self {
        StatisticLogger {
            name: format!("{}_{segment}", self.name),
        }
    }

    pub fn log_statistic(&self, value: impl Display) {
        log_statistic(&self.name, value);
    }
}

/// A value which can be written to the statistics.
pub trait Statistic {
    fn log(&self, statistic_logger: StatisticLogger);
}

impl<Value: Display> Statistic for Value {
    fn log(&self, statistic_logger: StatisticLogger) {
        statistic_logger.log_statistic(self);
    }
}

/// Generate a struct of counters which implements [`Statistic`] by logging every field under
/// its own name.
///
/// # Example
/// ```rust
/// # use kestrel_core::create_statistics_struct;
/// create_statistics_struct!(PhaseStatistics {
///     num_sat_calls: u64,
///     max_core_size: usize,
/// });
///
/// let mut statistics = PhaseStatistics::default();
/// statistics.num_sat_calls += 1;
///
/// assert_eq!(1, statistics.num_sat_calls);
/// assert_eq!(0, statistics.max_core_size);
/// ```
#[macro_export]
macro_rules! create_statistics_struct {
    ($(#[$struct_documentation:meta])* $name:ident { $($(#[$variable_documentation:meta])* $field:ident : $type:ident),+ $(,)? }) => {
        $(#[$struct_documentation])*
        #[derive(Default, Debug, Copy, Clone)]
        pub struct $name {
            $($(#[$variable_documentation])* pub $field: $type),+
        }

        impl $crate::statistics::Statistic for $name {
            fn log(&self, statistic_logger: $crate::statistics::StatisticLogger) {
                $($crate::statistics::Statistic::log(&self.$field, statistic_logger.attach_to_prefix(stringify!($field))));+
            }
        }
    };
}
