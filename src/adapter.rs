use chrono::NaiveDate;

use crate::{
    error::LoanError,
    loanable::{Annotate, CheckoutStatus, Loanable, due_date_from_today},
    member::Member,
    pilot::Pilot,
    spaceship::Spaceship,
};

/// 64-bit FNV-1a hash
fn fnv1a(data: &[u8]) -> u64 {
    let mut h: u64 = 0xcbf2_9ce4_8422_2325;
    for &b in data {
        h ^= u64::from(b);
        h = h.wrapping_mul(0x0100_0000_01b3);
    }
    h
}

/// Lets the library lend a spaceship as if it were a book.
///
/// The adapter owns the ship: lending puts a pilot named after the borrower
/// aboard, returning takes the pilot off again.
#[derive(Debug, Clone, PartialEq)]
pub struct SpaceshipAdapter {
    /// The wrapped ship
    spaceship: Spaceship,
    /// Lending state
    checkout_status: CheckoutStatus,
    /// Number of the member holding the ship
    borrower: Option<String>,
    /// Date the ship is due back
    due_date: Option<NaiveDate>,
}

impl SpaceshipAdapter {
    #[must_use]
    pub fn new(spaceship: Spaceship) -> Self {
        Self { spaceship, checkout_status: CheckoutStatus::Available, borrower: None, due_date: None }
    }

    #[must_use]
    pub fn spaceship(&self) -> &Spaceship {
        &self.spaceship
    }

    pub fn spaceship_mut(&mut self) -> &mut Spaceship {
        &mut self.spaceship
    }

    #[must_use]
    pub fn into_inner(self) -> Spaceship {
        self.spaceship
    }
}

impl Loanable for SpaceshipAdapter {
    fn title(&self) -> String {
        format!("Spaceship: {}", self.spaceship.name())
    }

    fn identifier(&self) -> String {
        let code = fnv1a(self.spaceship.name().as_bytes()) % 10_000;
        format!("SHIP-{code:04}")
    }

    fn checkout_status(&self) -> CheckoutStatus {
        self.checkout_status
    }

    fn borrower(&self) -> Option<&str> {
        self.borrower.as_deref()
    }

    fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    fn is_available(&self) -> bool {
        self.checkout_status == CheckoutStatus::Available && self.spaceship.fuel_level() > 0
    }

    fn borrow_item(&mut self, borrower: &Member, loan_days: u64) -> Result<(), LoanError> {
        if !self.is_available() {
            return Err(LoanError::Unavailable(self.title()));
        }

        if let Some(previous) = self.spaceship.assign_pilot(Pilot::new(borrower.name())) {
            tracing::warn!(ship = self.spaceship.name(), pilot = previous.name(), "replaced idle pilot");
        }
        self.checkout_status = CheckoutStatus::CheckedOut;
        self.borrower = Some(borrower.number().to_string());
        self.due_date = Some(due_date_from_today(loan_days));
        Ok(())
    }

    fn return_item(&mut self) -> Result<(), LoanError> {
        if self.checkout_status != CheckoutStatus::CheckedOut {
            return Err(LoanError::NotCheckedOut(self.title()));
        }

        self.spaceship.release_pilot();
        self.checkout_status = CheckoutStatus::Available;
        self.borrower = None;
        self.due_date = None;
        Ok(())
    }
}

// Ships keep no notes.
impl Annotate for SpaceshipAdapter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_view() {
        let adapter = SpaceshipAdapter::new(Spaceship::new("Enterprise", 100));
        assert_eq!(adapter.title(), "Spaceship: Enterprise");

        let id = adapter.identifier();
        assert!(id.starts_with("SHIP-"));
        assert_eq!(id.len(), 9);
        assert_eq!(id, SpaceshipAdapter::new(Spaceship::new("Enterprise", 5)).identifier());
    }

    #[test]
    fn test_empty_tank_is_unavailable() {
        let adapter = SpaceshipAdapter::new(Spaceship::new("Serenity", 0));
        assert!(!adapter.is_available());
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_borrow_puts_member_aboard() {
        let member = Member::new("Han Solo", "M-042");
        let mut adapter = SpaceshipAdapter::new(Spaceship::new("Millennium Falcon", 150));

        adapter.borrow_item(&member, 7).expect("ship is available");

        assert_eq!(adapter.checkout_status(), CheckoutStatus::CheckedOut);
        assert_eq!(adapter.borrower(), Some("M-042"));
        assert_eq!(adapter.due_date(), Some(due_date_from_today(7)));
        assert!(!adapter.is_available());

        let pilot = adapter.spaceship().pilot().expect("pilot aboard");
        assert_eq!(pilot.name(), "Han Solo");
        assert_eq!(pilot.ship_name(), Some("Millennium Falcon"));
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_second_borrow_is_rejected() {
        let mut adapter = SpaceshipAdapter::new(Spaceship::new("Serenity", 80));
        adapter.borrow_item(&Member::new("Mal", "M-1"), 7).expect("first loan");

        let second = adapter.borrow_item(&Member::new("Zoe", "M-2"), 7);
        assert_eq!(second, Err(LoanError::Unavailable("Spaceship: Serenity".to_string())));
        assert_eq!(adapter.borrower(), Some("M-1"));
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_return_clears_everything() {
        let mut adapter = SpaceshipAdapter::new(Spaceship::new("Serenity", 80));
        adapter.borrow_item(&Member::new("Mal", "M-1"), 7).expect("loan");

        adapter.return_item().expect("return");

        assert!(adapter.is_available());
        assert_eq!(adapter.borrower(), None);
        assert_eq!(adapter.due_date(), None);
        assert!(adapter.spaceship().pilot().is_none());
        assert_eq!(
            adapter.return_item(),
            Err(LoanError::NotCheckedOut("Spaceship: Serenity".to_string()))
        );
    }

    #[test]
    fn test_notes_are_dropped() {
        let mut adapter = SpaceshipAdapter::new(Spaceship::new("Serenity", 80));
        assert!(!adapter.add_note("Went to Vega"));
    }
}
