use crate::{
    error::MissionError,
    member::{LoanedItem, MAX_QUALIFICATION, Member, PilotMember},
    policy::MissionPolicy,
    spaceship::Spaceship,
};

#[test]
fn test_loans_are_not_duplicated() {
    let mut member = Member::new("Ada", "M-001");
    member.add_loan(LoanedItem::Book("978-0001".to_string()));
    member.add_loan(LoanedItem::Book("978-0001".to_string()));
    member.add_loan(LoanedItem::Ship("Serenity".to_string()));

    assert_eq!(member.loans().len(), 2);
    assert!(member.remove_loan(&LoanedItem::Book("978-0001".to_string())));
    assert!(!member.remove_loan(&LoanedItem::Book("978-0001".to_string())));
    assert_eq!(member.loans(), [LoanedItem::Ship("Serenity".to_string())]);
}

#[test]
#[allow(clippy::expect_used)]
fn test_promotion_when_crossing_hundred_hours() {
    let mut pilot = PilotMember::with_qualification("Jean-Luc Picard", "P-001", 3).expect("valid level");

    pilot.log_flight_hours(99.5);
    assert_eq!(pilot.qualification_level(), 3);

    pilot.log_flight_hours(0.5);
    // Exactly 100 is not past the threshold
    assert_eq!(pilot.qualification_level(), 3);

    pilot.log_flight_hours(1.0);
    assert_eq!(pilot.qualification_level(), 4);

    pilot.log_flight_hours(50.0);
    assert_eq!(pilot.qualification_level(), 4);
    assert!((pilot.flight_hours() - 151.0).abs() < 1e-9);
}

#[test]
#[allow(clippy::expect_used)]
fn test_promotion_is_capped() {
    let mut pilot =
        PilotMember::with_qualification("Jean-Luc Picard", "P-001", MAX_QUALIFICATION).expect("valid level");

    pilot.log_flight_hours(150.0);

    assert_eq!(pilot.qualification_level(), MAX_QUALIFICATION);
}

#[test]
fn test_non_positive_hours_are_ignored() {
    let mut pilot = PilotMember::new("Wesley Crusher", "P-002");

    pilot.log_flight_hours(-5.0);
    pilot.log_flight_hours(0.0);

    assert!(pilot.flight_hours().abs() < f64::EPSILON);
}

#[test]
fn test_invalid_qualification_is_rejected() {
    assert_eq!(
        PilotMember::with_qualification("Q", "P-999", 6),
        Err(MissionError::InvalidQualification(6))
    );

    let mut pilot = PilotMember::new("Wesley Crusher", "P-002");
    assert_eq!(pilot.set_qualification_level(9), Err(MissionError::InvalidQualification(9)));
    assert_eq!(pilot.qualification_level(), 0);
}

#[test]
#[allow(clippy::expect_used)]
fn test_can_pilot_thresholds() {
    let policy = MissionPolicy::default();
    let enterprise = Spaceship::new("Enterprise", 100);
    let shuttle = Spaceship::new("Shuttle Galileo", 100);

    let cadet = PilotMember::with_qualification("Cadet", "P-010", 1).expect("valid level");
    let officer = PilotMember::with_qualification("Officer", "P-011", 2).expect("valid level");
    let captain = PilotMember::with_qualification("Captain", "P-012", 4).expect("valid level");

    assert!(!cadet.can_pilot(&shuttle, &policy));
    assert!(officer.can_pilot(&shuttle, &policy));
    assert!(!officer.can_pilot(&enterprise, &policy));
    assert!(captain.can_pilot(&enterprise, &policy));
    assert_eq!(PilotMember::required_level(&enterprise, &policy), 4);
}
