use crate::{
    delivery::{DeliveryObserver, DeliveryRequest},
    error::MissionError,
    pilot::Pilot,
    spaceship::{Spaceship, transfer_pilot},
};

/// Helper to build a ship with a pilot aboard
fn crewed(name: &str, fuel: u32, pilot: &str) -> Spaceship {
    let mut ship = Spaceship::new(name, fuel);
    ship.assign_pilot(Pilot::new(pilot));
    ship
}

#[test]
fn test_new_ship_defaults() {
    let ship = Spaceship::new("Enterprise", 100);

    assert_eq!(ship.location(), "Library Hub Alpha");
    assert_eq!(ship.capacity(), 100);
    assert!(ship.pilot().is_none());
    assert!(ship.status_report().contains("No pilot assigned"));
}

#[test]
#[allow(clippy::expect_used)]
fn test_travel_burns_fuel() {
    let mut ship = Spaceship::new("Enterprise", 100);

    assert_eq!(ship.travel(33).expect("enough fuel"), 67);
    assert_eq!(ship.fuel_level(), 67);
}

#[test]
fn test_travel_without_fuel_leaves_tank_untouched() {
    let mut ship = Spaceship::new("Serenity", 20);

    assert_eq!(ship.travel(29), Err(MissionError::InsufficientFuel { required: 29, available: 20 }));
    assert_eq!(ship.fuel_level(), 20);
}

#[test]
fn test_refuel_report() {
    let mut ship = Spaceship::new("Serenity", 20);

    let report = ship.refuel(30);

    assert_eq!(ship.fuel_level(), 50);
    assert!(report.contains("20"));
    assert!(report.contains("30"));
    assert!(report.contains("50"));
}

#[test]
fn test_fulfillment_thresholds() {
    let ship = crewed("Serenity", 40, "Mal");

    for priority in 1..=5_u8 {
        let plain = DeliveryRequest::new("Charts", "Persephone").with_priority(priority);
        let fragile = plain.clone().with_requirement("fragile").with_requirement("cold storage");

        assert_eq!(ship.can_fulfill_mission(&plain), 10 * u32::from(priority) <= 40);
        assert_eq!(ship.can_fulfill_mission(&fragile), 10 * u32::from(priority) + 10 <= 40);
    }

    let empty = Spaceship::new("Ghost", 100);
    assert!(!empty.can_fulfill_mission(&DeliveryRequest::new("Charts", "Persephone")));
}

#[test]
fn test_assign_pilot_links_both_sides() {
    let mut ship = Spaceship::new("Enterprise", 100);

    assert!(ship.assign_pilot(Pilot::new("Picard")).is_none());
    let displaced = ship.assign_pilot(Pilot::new("Riker"));

    assert_eq!(ship.pilot().and_then(Pilot::ship_name), Some("Enterprise"));
    assert_eq!(ship.pilot().map(Pilot::name), Some("Riker"));
    let displaced = displaced.as_ref();
    assert_eq!(displaced.map(Pilot::name), Some("Picard"));
    assert_eq!(displaced.and_then(Pilot::ship_name), None);
}

#[test]
#[allow(clippy::expect_used)]
fn test_transfer_pilot_moves_the_link() {
    let mut enterprise = crewed("Enterprise", 100, "Picard");
    let mut stargazer = Spaceship::new("Stargazer", 60);

    let displaced = transfer_pilot(&mut enterprise, &mut stargazer).expect("pilot aboard");

    assert!(displaced.is_none());
    assert!(enterprise.pilot().is_none());
    let pilot = stargazer.pilot().expect("pilot moved");
    assert_eq!(pilot.name(), "Picard");
    assert_eq!(pilot.ship_name(), Some("Stargazer"));

    assert_eq!(
        transfer_pilot(&mut enterprise, &mut stargazer),
        Err(MissionError::NoPilot("Enterprise".to_string()))
    );
}

#[test]
fn test_urgent_alert_is_accepted_automatically() {
    let mut ship = crewed("Rocinante", 100, "Holden");
    let urgent = DeliveryRequest::new("Protomolecule Research", "Eros").with_priority(4);

    ship.update(&urgent);

    assert!(ship.has_received_alert("Protomolecule Research"));
    assert!(ship.has_active_mission(&urgent));
    assert_eq!(ship.fuel_level(), 60);
    let pilot = ship.pilot().map(Pilot::mission_count);
    assert_eq!(pilot, Some(1));
    assert!(ship.pilot().is_some_and(|pilot| pilot.mission_alerts().is_empty()));
}

#[test]
#[allow(clippy::expect_used)]
fn test_routine_alert_awaits_decision() {
    let mut ship = crewed("Rocinante", 100, "Holden");
    let routine = DeliveryRequest::new("Star Charts", "Ceres").with_priority(2);

    ship.update(&routine);

    assert!(!ship.has_active_mission(&routine));
    assert_eq!(ship.fuel_level(), 100);
    assert_eq!(ship.pilot().map(|pilot| pilot.mission_alerts().len()), Some(1));

    ship.accept_alert(&routine).expect("pilot accepts");
    assert!(ship.has_active_mission(&routine));
    assert_eq!(ship.fuel_level(), 80);
}

#[test]
fn test_alert_without_pilot_is_only_recorded() {
    let mut ship = Spaceship::new("Ghost", 100);
    let urgent = DeliveryRequest::new("Charts", "Titan").with_priority(5);

    ship.update(&urgent);

    assert!(ship.has_received_alert("Charts"));
    assert!(ship.current_missions().is_empty());
    assert_eq!(ship.accept_alert(&urgent), Err(MissionError::NoPilot("Ghost".to_string())));
}

#[test]
#[allow(clippy::expect_used)]
fn test_complete_delivery_adds_experience() {
    let mut ship = crewed("Serenity", 100, "Mal");
    let request = DeliveryRequest::new("Reaver Lore", "Miranda").with_priority(3);
    ship.accept_alert(&request).expect("enough fuel");

    ship.complete_delivery(&request).expect("delivery is active");

    assert!(ship.current_missions().is_empty());
    assert_eq!(ship.mission_history(), [request.clone()]);
    assert_eq!(ship.pilot().map(Pilot::experience), Some(3));
    assert_eq!(
        ship.complete_delivery(&request),
        Err(MissionError::DeliveryRejected { ship: "Serenity".to_string(), title: "Reaver Lore".to_string() })
    );
}

#[test]
fn test_capacity_limits_active_missions() {
    let mut ship = Spaceship::with_capacity("Shuttle", 500, 20);
    ship.assign_pilot(Pilot::new("Sulu"));

    ship.add_active_mission(&DeliveryRequest::new("First", "Vulcan"));
    assert!(ship.is_available_for_missions());
    ship.add_active_mission(&DeliveryRequest::new("Second", "Vulcan"));
    assert!(!ship.is_available_for_missions());
}
