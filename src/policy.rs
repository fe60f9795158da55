use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::PolicyError;

/// Rules the library applies when lending ships and books
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MissionPolicy {
    /// Ships that only senior pilots may fly
    pub privileged_ships: Vec<String>,
    /// Qualification needed for a privileged ship
    pub privileged_level: u8,
    /// Qualification needed for any other ship
    pub standard_level: u8,
    /// Fuel level restored when a ship comes back
    pub full_tank: u32,
    /// Loan period for ships, in days
    pub ship_loan_days: u64,
    /// Loan period for books, in days
    pub book_loan_days: u64,
}

impl Default for MissionPolicy {
    fn default() -> Self {
        Self {
            privileged_ships: vec!["Enterprise".to_string(), "Millennium Falcon".to_string()],
            privileged_level: 4,
            standard_level: 2,
            full_tank: 100,
            ship_loan_days: 7,
            book_loan_days: 21,
        }
    }
}

impl MissionPolicy {
    /// Qualification level a pilot needs to fly `ship_name`
    #[must_use]
    pub fn required_level(&self, ship_name: &str) -> u8 {
        if self.privileged_ships.iter().any(|name| name == ship_name) {
            self.privileged_level
        } else {
            self.standard_level
        }
    }

    /// Load a policy from a JSON file. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns a `PolicyError` if the file cannot be read or is not valid JSON.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Parse a policy from a JSON document. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::Parse` if the document is not a valid policy.
    pub fn from_json_str(contents: &str) -> Result<Self, PolicyError> {
        Ok(serde_json::from_str(contents)?)
    }
}
