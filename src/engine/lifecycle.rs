//! Viewport lifecycle state machine and listener bookkeeping.

/// Where the viewport is in its life.
///
/// `Uninitialized → Mounted → Disposed`, or straight to `Disposed` when torn
/// down before ever mounting. `Disposed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    /// Constructed but not attached to a mount point.
    #[default]
    Uninitialized,
    /// Attached; listeners registered and the render loop running.
    Mounted,
    /// Torn down. Nothing runs and nothing can be restarted.
    Disposed,
}

impl Lifecycle {
    /// Move to `Mounted`. Returns whether the state changed.
    pub fn mount(&mut self) -> bool {
        if *self == Self::Uninitialized {
            *self = Self::Mounted;
            true
        } else {
            false
        }
    }

    /// Move to `Disposed`. Returns whether the state changed.
    pub fn dispose(&mut self) -> bool {
        if *self == Self::Disposed {
            false
        } else {
            *self = Self::Disposed;
            true
        }
    }
}

/// Event callbacks the viewport reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listener {
    /// Primary-button click that did not become a drag.
    Click,
    /// End of an orbit interaction.
    OrbitEnd,
}

/// Which listeners are currently registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListenerSet {
    click: bool,
    orbit_end: bool,
}

impl ListenerSet {
    /// Register every listener. Already-registered ones are left alone.
    pub fn register_all(&mut self) {
        self.click = true;
        self.orbit_end = true;
    }

    /// Deregister every listener. Returns how many were registered.
    pub fn deregister_all(&mut self) -> usize {
        let removed = usize::from(self.click) + usize::from(self.orbit_end);
        *self = Self::default();
        removed
    }

    /// Whether `listener` is registered.
    #[must_use]
    pub fn is_registered(&self, listener: Listener) -> bool {
        match listener {
            Listener::Click => self.click,
            Listener::OrbitEnd => self.orbit_end,
        }
    }

    /// True when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.click && !self.orbit_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mount_only_from_uninitialized() {
        let mut state = Lifecycle::default();
        assert!(state.mount());
        assert!(!state.mount());
        assert!(state.dispose());
        assert!(!state.mount());
        assert_eq!(state, Lifecycle::Disposed);
    }

    #[test]
    fn dispose_is_idempotent() {
        let mut state = Lifecycle::Uninitialized;
        assert!(state.dispose());
        assert!(!state.dispose());
    }

    #[test]
    fn listeners_deregister_once() {
        let mut listeners = ListenerSet::default();
        assert!(listeners.is_empty());
        listeners.register_all();
        listeners.register_all();
        assert!(listeners.is_registered(Listener::Click));
        assert!(listeners.is_registered(Listener::OrbitEnd));
        assert_eq!(listeners.deregister_all(), 2);
        assert_eq!(listeners.deregister_all(), 0);
        assert!(listeners.is_empty());
    }
}
