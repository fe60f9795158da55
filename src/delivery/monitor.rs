use std::{cell::RefCell, fmt, rc::Rc};

use crate::{
    catalog::Catalog,
    delivery::{DeliveryObserver, DeliveryRequest},
};

/// Destination used for deliveries detected by the monitor
pub const DEFAULT_DESTINATION: &str = "Various destinations";

/// Priority used for deliveries detected by the monitor
pub const DEFAULT_PRIORITY: u8 = 2;

/// A registered observer
pub type ObserverHandle = Rc<RefCell<dyn DeliveryObserver>>;

/// Watches a catalog's book count and alerts observers about new arrivals
pub struct LibraryMonitor {
    /// Book count seen at the last check
    last_book_count: usize,
    /// Registered observers, in registration order
    observers: Vec<ObserverHandle>,
}

// Manual implementation of Debug for LibraryMonitor
impl fmt::Debug for LibraryMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LibraryMonitor")
            .field("last_book_count", &self.last_book_count)
            .field("observers_count", &self.observers.len())
            .finish()
    }
}

impl LibraryMonitor {
    /// Start monitoring from the catalog's current book count
    #[must_use]
    pub fn new(catalog: &impl Catalog) -> Self {
        Self { last_book_count: catalog.book_count(), observers: Vec::new() }
    }

    #[must_use]
    pub fn last_book_count(&self) -> usize {
        self.last_book_count
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Register an observer. Registering the same observer twice has no effect.
    pub fn add_observer(&mut self, observer: ObserverHandle) {
        if !self.is_registered(&observer) {
            self.observers.push(observer);
        }
    }

    /// Unregister an observer, returning whether it was registered
    pub fn remove_observer(&mut self, observer: &ObserverHandle) -> bool {
        let before = self.observers.len();
        self.observers.retain(|registered| !same_observer(registered, observer));
        self.observers.len() != before
    }

    #[must_use]
    pub fn is_registered(&self, observer: &ObserverHandle) -> bool {
        self.observers.iter().any(|registered| same_observer(registered, observer))
    }

    /// Deliver `request` to every registered observer.
    ///
    /// An observer that is already borrowed elsewhere is skipped.
    pub fn notify_observers(&self, request: &DeliveryRequest) {
        for observer in &self.observers {
            match observer.try_borrow_mut() {
                Ok(mut observer) => observer.update(request),
                Err(_) => {
                    tracing::warn!(title = %request.title, "observer busy, notification skipped");
                }
            }
        }
    }

    /// Compare the catalog's book count with the last one seen and, if it
    /// grew, alert every observer. Returns whether new books were found.
    pub fn check_for_new_books(&mut self, catalog: &impl Catalog) -> bool {
        let current = catalog.book_count();
        let Some(new_books) = current.checked_sub(self.last_book_count).filter(|n| *n > 0) else {
            return false;
        };

        tracing::info!(library = catalog.name(), new_books, "new books detected");
        let request = DeliveryRequest::new(&format!("{new_books} new books"), DEFAULT_DESTINATION)
            .with_priority(DEFAULT_PRIORITY);
        self.notify_observers(&request);
        self.last_book_count = current;
        true
    }
}

/// Whether two handles point at the same observer
fn same_observer(a: &ObserverHandle, b: &ObserverHandle) -> bool {
    Rc::as_ptr(a).cast::<()>() == Rc::as_ptr(b).cast::<()>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::Library, pilot::Pilot, spaceship::Spaceship};

    /// Observer that only counts notifications
    #[derive(Debug, Default)]
    struct Counter {
        /// Titles received so far
        seen: Vec<String>,
    }

    impl DeliveryObserver for Counter {
        fn update(&mut self, request: &DeliveryRequest) {
            self.seen.push(request.title.clone());
        }
    }

    #[test]
    fn test_monitor_detects_new_books() {
        let mut library = Library::new("Galactic Archives", 1000);
        let mut monitor = LibraryMonitor::new(&library);
        let counter = Rc::new(RefCell::new(Counter::default()));
        monitor.add_observer(counter.clone());

        assert!(!monitor.check_for_new_books(&library));

        library.receive_books(3);
        assert!(monitor.check_for_new_books(&library));
        assert_eq!(counter.borrow().seen, vec!["3 new books".to_string()]);
        assert_eq!(monitor.last_book_count(), 1003);

        // Same count again: nothing new.
        assert!(!monitor.check_for_new_books(&library));
        assert_eq!(counter.borrow().seen.len(), 1);
    }

    #[test]
    fn test_duplicate_registration_is_ignored() {
        let library = Library::new("Galactic Archives", 0);
        let mut monitor = LibraryMonitor::new(&library);
        let ship = Spaceship::new("Falcon", 100).shared();

        monitor.add_observer(ship.clone());
        monitor.add_observer(ship.clone());
        assert_eq!(monitor.observer_count(), 1);

        let handle: ObserverHandle = ship;
        assert!(monitor.remove_observer(&handle));
        assert!(!monitor.remove_observer(&handle));
        assert_eq!(monitor.observer_count(), 0);
    }

    #[test]
    fn test_every_ship_is_notified_even_if_ineligible() {
        let library = Library::new("Galactic Archives", 0);
        let mut monitor = LibraryMonitor::new(&library);

        let crewed = Spaceship::new("Enterprise", 200).shared();
        crewed.borrow_mut().assign_pilot(Pilot::new("James Kirk"));
        let empty_tank = Spaceship::new("Derelict", 0).shared();
        monitor.add_observer(crewed.clone());
        monitor.add_observer(empty_tank.clone());

        let request = DeliveryRequest::new("Codex", "Vulcan").with_priority(3);
        monitor.notify_observers(&request);

        assert!(crewed.borrow().has_received_alert("Codex"));
        assert!(empty_tank.borrow().has_received_alert("Codex"));
    }

    #[test]
    fn test_busy_observer_is_skipped() {
        let library = Library::new("Galactic Archives", 0);
        let mut monitor = LibraryMonitor::new(&library);
        let counter = Rc::new(RefCell::new(Counter::default()));
        monitor.add_observer(counter.clone());

        let guard = counter.borrow_mut();
        monitor.notify_observers(&DeliveryRequest::new("Codex", "Vulcan"));
        drop(guard);

        assert!(counter.borrow().seen.is_empty());
    }
}
