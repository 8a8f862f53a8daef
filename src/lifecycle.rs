use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Liveness flag for a view. Work that finishes after `unmount` must not
/// touch the view's state; it checks `is_mounted` before applying.
#[derive(Debug, Clone)]
pub struct Mount {
    alive: Arc<AtomicBool>,
}

impl Mount {
    pub fn new() -> Self {
        Self { alive: Arc::new(AtomicBool::new(true)) }
    }

    pub fn is_mounted(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Shared by every clone.
    pub fn unmount(&self) {
        self.alive.store(false, Ordering::Release);
    }
}

impl Default for Mount {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmount_is_seen_by_clones() {
        let mount = Mount::new();
        let handle = mount.clone();
        assert!(handle.is_mounted());

        mount.unmount();
        assert!(!handle.is_mounted());
    }
}
