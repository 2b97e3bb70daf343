//! Type-state markers for the discoverer lifecycle.
//!
//! `Idle → Listening → Stopped`. Each transition consumes the discoverer, so
//! starting twice or stopping before starting is a compile error rather than
//! a runtime condition.

use std::fmt;

/// Runtime view of a lifecycle state, for logs and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscovererState {
    /// Constructed, not yet subscribed
    Idle,
    /// Subscribed and receiving exchanges
    Listening,
    /// Unsubscribed; receives nothing further
    Stopped,
}

impl fmt::Display for DiscovererState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscovererState::Idle => write!(f, "idle"),
            DiscovererState::Listening => write!(f, "listening"),
            DiscovererState::Stopped => write!(f, "stopped"),
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Implemented by the three marker types only.
///
/// Markers cannot be forged outside this crate:
///
/// ```compile_fail
/// use jwt_discovery::Listening;
///
/// let forged = Listening { _private: () };
/// ```
///
/// and a discoverer cannot be started twice:
///
/// ```compile_fail
/// use jwt_discovery::{JwtDiscoverer, MemoryStore, ReplaySource};
/// use std::rc::Rc;
///
/// let mut source = ReplaySource::new();
/// let listening = JwtDiscoverer::new(Rc::new(MemoryStore::new())).start(&mut source);
/// let _again = listening.start(&mut source);
/// ```
pub trait LifecycleState: sealed::Sealed {
    /// The runtime state this marker stands for.
    const STATE: DiscovererState;
}

/// Marker for a discoverer that has not started.
#[derive(Debug, Clone, Copy)]
pub struct Idle {
    _private: (),
}

/// Marker for a discoverer subscribed to a source.
#[derive(Debug, Clone, Copy)]
pub struct Listening {
    _private: (),
}

/// Marker for a discoverer that has been stopped.
#[derive(Debug, Clone, Copy)]
pub struct Stopped {
    _private: (),
}

impl sealed::Sealed for Idle {}
impl sealed::Sealed for Listening {}
impl sealed::Sealed for Stopped {}

impl LifecycleState for Idle {
    const STATE: DiscovererState = DiscovererState::Idle;
}

impl LifecycleState for Listening {
    const STATE: DiscovererState = DiscovererState::Listening;
}

impl LifecycleState for Stopped {
    const STATE: DiscovererState = DiscovererState::Stopped;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_markers_are_zero_sized() {
        assert_eq!(std::mem::size_of::<Idle>(), 0);
        assert_eq!(std::mem::size_of::<Listening>(), 0);
        assert_eq!(std::mem::size_of::<Stopped>(), 0);
    }

    #[test]
    fn markers_map_to_runtime_states() {
        assert_eq!(Idle::STATE, DiscovererState::Idle);
        assert_eq!(Listening::STATE, DiscovererState::Listening);
        assert_eq!(Stopped::STATE, DiscovererState::Stopped);
    }

    #[test]
    fn runtime_state_display() {
        assert_eq!(DiscovererState::Idle.to_string(), "idle");
        assert_eq!(DiscovererState::Listening.to_string(), "listening");
        assert_eq!(DiscovererState::Stopped.to_string(), "stopped");
    }
}
