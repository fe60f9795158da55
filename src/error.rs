use std::io;

use thiserror::Error;

use crate::status::MissionStatus;

/// Errors raised while lending or returning an item
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoanError {
    /// The item exists but cannot be borrowed right now
    #[error("{0} is not available")]
    Unavailable(String),
    /// A return was requested for an item that is not on loan
    #[error("{0} is not checked out")]
    NotCheckedOut(String),
    /// The member returning the item is not the one holding it
    #[error("{item} is not held by member {member}")]
    NotHeldBy {
        /// Item being returned
        item: String,
        /// Member that attempted the return
        member: String,
    },
    /// No book or ship with this identity is known to the library
    #[error("unknown item: {0}")]
    UnknownItem(String),
    /// No member with this number is registered
    #[error("unknown member: {0}")]
    UnknownMember(String),
}

/// Errors raised by the mission and delivery orchestration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MissionError {
    /// The requested spaceship is missing or already lent out
    #[error("spaceship {0} is not available")]
    ShipUnavailable(String),
    /// The pilot's qualification is below what the ship requires
    #[error("insufficient qualification level for {ship}: has {level}, needs {required}")]
    InsufficientQualification {
        /// Ship the pilot tried to fly
        ship: String,
        /// Pilot's current level
        level: u8,
        /// Level required by the ship
        required: u8,
    },
    /// A requested book is missing or already lent out
    #[error("book {0} is not available")]
    BookUnavailable(String),
    /// No mission with this id has been prepared
    #[error("mission {0} not found")]
    MissionNotFound(u32),
    /// The mission cannot move to the requested state from where it is
    #[error("mission is in an incorrect state: {0}")]
    InvalidState(MissionStatus),
    /// The ship does not carry enough fuel for the trip
    #[error("insufficient fuel: {required} needed, {available} available")]
    InsufficientFuel {
        /// Fuel the trip would consume
        required: u32,
        /// Fuel left in the tank
        available: u32,
    },
    /// No candidate ship can fulfill the delivery
    #[error("no spaceship can deliver {0}")]
    NoEligibleShip(String),
    /// No delivery with this title has been assigned
    #[error("delivery {0} not found")]
    DeliveryNotFound(String),
    /// A ship needed for the delivery is borrowed elsewhere
    #[error("spaceship is in use elsewhere, cannot handle delivery {0}")]
    ShipBusy(String),
    /// The ship has no pilot on board
    #[error("spaceship {0} has no pilot")]
    NoPilot(String),
    /// The ship refused to accept or complete the delivery
    #[error("spaceship {ship} rejected delivery {title}")]
    DeliveryRejected {
        /// Ship that refused
        ship: String,
        /// Title of the delivery
        title: String,
    },
    /// Qualification levels range from 0 to 5
    #[error("qualification level {0} is out of range")]
    InvalidQualification(u8),
    /// A lending step failed
    #[error(transparent)]
    Loan(#[from] LoanError),
}

/// Errors raised while loading a mission policy
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The policy file could not be read
    #[error("failed to read policy file: {0}")]
    Io(#[from] io::Error),
    /// The policy file is not valid JSON for a policy
    #[error("failed to parse policy: {0}")]
    Parse(#[from] serde_json::Error),
}
