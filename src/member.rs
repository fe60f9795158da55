use serde::{Deserialize, Serialize};

use crate::{error::MissionError, policy::MissionPolicy, spaceship::Spaceship};

/// Highest qualification level a pilot can hold
pub const MAX_QUALIFICATION: u8 = 5;

/// Cumulative flight hours past which a pilot earns a promotion
pub const PROMOTION_HOURS: f64 = 100.0;

/// Something a member currently holds
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum LoanedItem {
    /// A book, by ISBN
    Book(String),
    /// A spaceship, by name
    Ship(String),
}

/// A registered library member
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Member {
    /// Display name
    name: String,
    /// Membership number, unique within a library
    number: String,
    /// Items currently on loan
    loans: Vec<LoanedItem>,
}

impl Member {
    /// Create a member with no loans
    #[must_use]
    pub fn new(name: &str, number: &str) -> Self {
        Self { name: name.to_string(), number: number.to_string(), loans: Vec::new() }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn number(&self) -> &str {
        &self.number
    }

    #[must_use]
    pub fn loans(&self) -> &[LoanedItem] {
        &self.loans
    }

    /// Whether the member currently holds `item`
    #[must_use]
    pub fn holds(&self, item: &LoanedItem) -> bool {
        self.loans.contains(item)
    }

    /// Record a new loan. Recording the same item twice has no effect.
    pub fn add_loan(&mut self, item: LoanedItem) {
        if !self.holds(&item) {
            self.loans.push(item);
        }
    }

    /// Drop a loan, returning whether it was held
    pub fn remove_loan(&mut self, item: &LoanedItem) -> bool {
        let before = self.loans.len();
        self.loans.retain(|held| held != item);
        self.loans.len() != before
    }
}

/// A library member who may also fly the library's ships
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PilotMember {
    /// Underlying membership
    member: Member,
    /// 0 to 5, gates which ships the member may fly
    qualification_level: u8,
    /// Cumulative hours logged on missions
    flight_hours: f64,
}

impl PilotMember {
    /// Create an unqualified pilot member
    #[must_use]
    pub fn new(name: &str, number: &str) -> Self {
        Self { member: Member::new(name, number), qualification_level: 0, flight_hours: 0.0 }
    }

    /// Create a pilot member at a given level
    ///
    /// # Errors
    ///
    /// Returns `MissionError::InvalidQualification` if `level` is above 5.
    pub fn with_qualification(name: &str, number: &str, level: u8) -> Result<Self, MissionError> {
        let mut pilot = Self::new(name, number);
        pilot.set_qualification_level(level)?;
        Ok(pilot)
    }

    #[must_use]
    pub fn member(&self) -> &Member {
        &self.member
    }

    pub fn member_mut(&mut self) -> &mut Member {
        &mut self.member
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.member.name()
    }

    #[must_use]
    pub fn number(&self) -> &str {
        self.member.number()
    }

    #[must_use]
    pub fn qualification_level(&self) -> u8 {
        self.qualification_level
    }

    /// Set the qualification level.
    ///
    /// # Errors
    ///
    /// Returns `MissionError::InvalidQualification` if `level` is above 5;
    /// the current level is kept.
    pub fn set_qualification_level(&mut self, level: u8) -> Result<(), MissionError> {
        if level > MAX_QUALIFICATION {
            return Err(MissionError::InvalidQualification(level));
        }
        self.qualification_level = level;
        Ok(())
    }

    #[must_use]
    pub fn flight_hours(&self) -> f64 {
        self.flight_hours
    }

    /// Add flight hours. Crossing 100 cumulative hours promotes the pilot by
    /// one level, up to 5. Non-positive amounts are ignored.
    pub fn log_flight_hours(&mut self, hours: f64) {
        if hours <= 0.0 {
            return;
        }

        let before = self.flight_hours;
        self.flight_hours += hours;

        if before <= PROMOTION_HOURS
            && self.flight_hours > PROMOTION_HOURS
            && self.qualification_level < MAX_QUALIFICATION
        {
            self.qualification_level = self.qualification_level.saturating_add(1);
            tracing::info!(
                pilot = self.name(),
                level = self.qualification_level,
                "pilot promoted after crossing {PROMOTION_HOURS} flight hours"
            );
        }
    }

    /// Level required for `ship` under `policy`
    #[must_use]
    pub fn required_level(ship: &Spaceship, policy: &MissionPolicy) -> u8 {
        policy.required_level(ship.name())
    }

    /// Whether this member is qualified to fly `ship`
    #[must_use]
    pub fn can_pilot(&self, ship: &Spaceship, policy: &MissionPolicy) -> bool {
        self.qualification_level >= Self::required_level(ship, policy)
    }
}

#[cfg(test)]
mod tests;
