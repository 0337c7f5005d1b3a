//! Options which determine how a [`Solver`](crate::Solver) behaves.
use crate::basic_types::ConfigurationError;

/// The strategy used to minimise the unsatisfiable core of an unsatisfiable problem.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum CoreMinimisation {
    /// Recycling core extraction, see [`RceStrategy`](crate::ucore::RceStrategy).
    #[default]
    Rce,
    /// Naive core extraction, see [`NceStrategy`](crate::ucore::NceStrategy).
    Nce,
    /// Report the core of the first refutation as is.
    None,
}

/// How many resolution steps away from the axioms a resolvent may be to get recycled by
/// [`RceStrategy`](crate::ucore::RceStrategy).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ResolutionDistance {
    Bounded(usize),
    /// Every learnable resolvent is recycled.
    #[default]
    Unbounded,
}

impl TryFrom<i64> for ResolutionDistance {
    type Error = ConfigurationError;

    fn try_from(distance: i64) -> Result<Self, Self::Error> {
        usize::try_from(distance)
            .map(ResolutionDistance::Bounded)
            .map_err(|_| ConfigurationError::NegativeResolutionDistance(distance))
    }
}

/// Options for the [`Solver`](crate::Solver).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverOptions {
    /// The strategy used to minimise unsatisfiable cores.
    pub core_minimisation: CoreMinimisation,
    /// The resolution distance used when the core is minimised with
    /// [`CoreMinimisation::Rce`].
    pub resolution_distance: ResolutionDistance,
}
