//! Mount tracking for page views.
//!
//! A view mints a [`Ticket`] for every request it issues. Unmounting the view
//! (navigating away) or starting a newer load bumps the generation, so a
//! response that arrives afterwards finds its ticket stale and is dropped
//! instead of mutating state nobody is looking at.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Generation counter owned by one page view.
#[derive(Debug, Clone, Default)]
pub struct Mount {
    generation: Arc<AtomicU64>,
}

/// Proof that a request was issued by the current generation of a view.
#[derive(Debug, Clone)]
pub struct Ticket {
    generation: Arc<AtomicU64>,
    issued: u64,
}

impl Mount {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticket for the current generation.
    pub fn ticket(&self) -> Ticket {
        Ticket {
            generation: Arc::clone(&self.generation),
            issued: self.generation.load(Ordering::SeqCst),
        }
    }

    /// Invalidate every outstanding ticket.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

impl Ticket {
    pub fn is_current(&self) -> bool {
        self.generation.load(Ordering::SeqCst) == self.issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_goes_stale_on_invalidate() {
        let mount = Mount::new();
        let t = mount.ticket();
        assert!(t.is_current());
        mount.invalidate();
        assert!(!t.is_current());
        assert!(mount.ticket().is_current());
    }

    #[test]
    fn clones_share_generation() {
        let mount = Mount::new();
        let other = mount.clone();
        let t = mount.ticket();
        other.invalidate();
        assert!(!t.is_current());
    }
}
