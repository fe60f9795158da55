//! New-book alerts and delivery assignment through the public API

#![allow(clippy::expect_used)]

use std::{cell::RefCell, rc::Rc};

use spaceship_library::{
    Library, MissionError, MissionStatus, Pilot, Spaceship,
    delivery::{DeliveryObserver, DeliveryRequest, DeliverySystem},
};

fn crewed(name: &str, fuel: u32, pilot: &str) -> Rc<RefCell<Spaceship>> {
    let mut ship = Spaceship::new(name, fuel);
    ship.assign_pilot(Pilot::new(pilot));
    ship.shared()
}

#[test]
fn test_new_books_reach_every_registered_ship() {
    let mut library = Library::new("Galactic Archives", 100);
    let mut system = DeliverySystem::new();
    let mut monitor = system.initialize(&library);
    let enterprise = crewed("Enterprise", 100, "Kirk");
    let shuttle = crewed("Shuttle", 5, "Sulu");
    system.register_spaceship(&mut monitor, &enterprise);
    system.register_spaceship(&mut monitor, &shuttle);
    system.register_spaceship(&mut monitor, &enterprise);

    assert_eq!(monitor.observer_count(), 2);
    assert!(!monitor.check_for_new_books(&library));

    library.receive_books(5);
    assert!(monitor.check_for_new_books(&library));
    assert_eq!(monitor.last_book_count(), 105);

    assert!(enterprise.borrow().has_received_alert("5 new books"));
    assert!(shuttle.borrow().has_received_alert("5 new books"));
    // Priority 2 needs 20 fuel: only the Enterprise relays it to its pilot
    assert_eq!(enterprise.borrow().pilot().map(|pilot| pilot.mission_alerts().len()), Some(1));
    assert_eq!(shuttle.borrow().pilot().map(|pilot| pilot.mission_alerts().len()), Some(0));

    assert!(!monitor.check_for_new_books(&library));
}

#[test]
fn test_unregistered_ship_hears_nothing() {
    let mut library = Library::new("Galactic Archives", 10);
    let mut system = DeliverySystem::new();
    let mut monitor = system.initialize(&library);
    let voyager = crewed("Voyager", 80, "Janeway");
    system.register_spaceship(&mut monitor, &voyager);

    let handle: Rc<RefCell<dyn DeliveryObserver>> = voyager.clone();
    assert!(monitor.remove_observer(&handle));

    library.receive_books(1);
    assert!(monitor.check_for_new_books(&library));
    assert!(!voyager.borrow().has_received_alert("1 new books"));
}

#[test]
fn test_delivery_lifecycle() {
    let mut system = DeliverySystem::new();
    let voyager = crewed("Voyager", 95, "Janeway");
    let defiant = crewed("Defiant", 60, "Sisko");
    let ships = vec![crewed("Enterprise", 80, "Kirk"), Rc::clone(&voyager), Rc::clone(&defiant)];
    let request = DeliveryRequest::new("Rare Manuscripts", "Vulcan").with_priority(2);

    let assignment = system.assign_mission(&request, &ships).expect("eligible ships exist");
    assert_eq!(assignment.ship_name, "Voyager");
    assert_eq!(system.mission_status("Rare Manuscripts"), Some(MissionStatus::InProgress));

    let moved = system.reassign_mission(&request, &ships, &["Enterprise"]).expect("Defiant can take it");
    assert_eq!(moved.ship_name, "Defiant");
    assert!(!voyager.borrow().has_active_mission(&request));

    assert_eq!(
        system.record_mission_completion(&voyager, &request),
        Err(MissionError::DeliveryRejected { ship: "Voyager".to_string(), title: "Rare Manuscripts".to_string() })
    );
    system.record_mission_completion(&moved.ship, &request).expect("Defiant holds it");

    assert!(system.verify_book_delivered("Rare Manuscripts"));
    assert_eq!(system.mission_status("Rare Manuscripts"), Some(MissionStatus::Completed));
    assert_eq!(defiant.borrow().pilot().map(Pilot::experience), Some(2));
}
