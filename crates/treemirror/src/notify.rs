//! Host change-notification seam.

use std::collections::BTreeSet;

use treemirror_core::LocalId;

/// Subscribes to value-change notifications from the host.
///
/// The host later delivers `(sender, value)` pairs to
/// [`Mirror::on_value_changed`](crate::Mirror::on_value_changed).
pub trait Notifier {
    fn register(&mut self, id: LocalId);
    fn unregister(&mut self, id: LocalId);
}

/// A registration event seen by [`RecordingNotifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Registered(LocalId),
    Unregistered(LocalId),
}

/// Remembers current registrations and the full event history.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    active: BTreeSet<LocalId>,
    events: Vec<Registration>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_registered(&self, id: LocalId) -> bool {
        self.active.contains(&id)
    }

    /// Currently registered ids, ascending.
    pub fn registered(&self) -> Vec<LocalId> {
        self.active.iter().copied().collect()
    }

    pub fn events(&self) -> &[Registration] {
        &self.events
    }
}

impl Notifier for RecordingNotifier {
    fn register(&mut self, id: LocalId) {
        self.active.insert(id);
        self.events.push(Registration::Registered(id));
    }

    fn unregister(&mut self, id: LocalId) {
        self.active.remove(&id);
        self.events.push(Registration::Unregistered(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracks_registrations() {
        let mut notifier = RecordingNotifier::new();
        notifier.register(LocalId::new(5));
        notifier.register(LocalId::new(3));
        notifier.unregister(LocalId::new(5));

        assert_eq!(notifier.registered(), vec![LocalId::new(3)]);
        assert_eq!(notifier.events().len(), 3);
        assert_eq!(
            notifier.events()[2],
            Registration::Unregistered(LocalId::new(5))
        );
    }
}
