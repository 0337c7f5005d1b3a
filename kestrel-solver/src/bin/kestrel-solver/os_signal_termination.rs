use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use kestrel_solver::core::termination::TerminationCondition;

/// A [`TerminationCondition`] which triggers once the process receives SIGINT or SIGTERM. Clones
/// share the same flag.
#[derive(Clone, Debug)]
pub(crate) struct OsSignal {
    /// The number of the last signal which was received, or 0.
    received: Arc<AtomicUsize>,
}

impl OsSignal {
    pub(crate) fn install() -> std::io::Result<OsSignal> {
        let received = Arc::new(AtomicUsize::new(0));

        for signal in [signal_hook::consts::SIGINT, signal_hook::consts::SIGTERM] {
            let number = usize::try_from(signal).map_err(std::io::Error::other)?;
            let _ = signal_hook::flag::register_usize(signal, Arc::clone(&received), number)?;
        }

        Ok(OsSignal { received })
    }

    /// The signal which stopped the session, if any.
    pub(crate) fn received(&self) -> Option<usize> {
        match self.received.load(Ordering::Relaxed) {
            0 => None,
            signal => Some(signal),
        }
    }
}

impl TerminationCondition for OsSignal {
    fn should_stop(&mut self) -> bool {
        self.received().is_some()
    }
}
