use serde::{Deserialize, Serialize};

/// Base fuel per priority level
const FUEL_PER_PRIORITY: u32 = 10;

/// Extra fuel per special requirement
const FUEL_PER_REQUIREMENT: u32 = 5;

/// Books waiting to be delivered somewhere
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct DeliveryRequest {
    /// What is being delivered
    pub title: String,
    /// Where it must go
    pub destination: String,
    /// 1 (routine) and up; above 3 pilots accept without asking
    pub priority: u8,
    /// Handling constraints, each one costs extra fuel
    #[serde(default)]
    pub special_requirements: Vec<String>,
}

impl DeliveryRequest {
    /// Create a routine request (priority 1, no special requirements)
    #[must_use]
    pub fn new(title: &str, destination: &str) -> Self {
        Self {
            title: title.to_string(),
            destination: destination.to_string(),
            priority: 1,
            special_requirements: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_requirement(mut self, requirement: &str) -> Self {
        self.special_requirements.push(requirement.to_string());
        self
    }

    /// Fuel a ship burns to carry out this delivery:
    /// `10 * priority + 5 * special requirements`
    #[must_use]
    pub fn fuel_required(&self) -> u32 {
        let requirements = u32::try_from(self.special_requirements.len()).unwrap_or(u32::MAX);
        FUEL_PER_PRIORITY
            .saturating_mul(u32::from(self.priority))
            .saturating_add(FUEL_PER_REQUIREMENT.saturating_mul(requirements))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuel_thresholds() {
        for priority in 1..=5_u8 {
            let plain = DeliveryRequest::new("Atlas", "Vega").with_priority(priority);
            assert_eq!(plain.fuel_required(), 10 * u32::from(priority));

            let fragile = plain.with_requirement("fragile").with_requirement("cold storage");
            assert_eq!(fragile.fuel_required(), 10 * u32::from(priority) + 10);
        }
    }

    #[test]
    fn test_defaults() {
        let request = DeliveryRequest::new("Atlas", "Vega");
        assert_eq!(request.priority, 1);
        assert!(request.special_requirements.is_empty());
    }
}
