use std::{cell::RefCell, rc::Rc};

use crate::{
    delivery::{DeliveryObserver, DeliveryRequest},
    error::MissionError,
    pilot::{AlertResponse, Pilot},
};

/// Where a new ship is docked
const HOME_PORT: &str = "Library Hub Alpha";

/// Default number of books a ship can carry
const DEFAULT_CAPACITY: u32 = 100;

/// A ship shared between the library monitor and the delivery system
pub type ShipHandle = Rc<RefCell<Spaceship>>;

/// A spaceship that can carry books across space
#[derive(Debug, Clone, PartialEq)]
pub struct Spaceship {
    /// Unique ship name
    name: String,
    /// Fuel units in the tank
    fuel_level: u32,
    /// Maximum number of books carried at once
    capacity: u32,
    /// Current port
    location: String,
    /// Pilot on board
    pilot: Option<Pilot>,
    /// Deliveries accepted and not yet completed
    current_missions: Vec<DeliveryRequest>,
    /// Deliveries completed by this ship
    mission_history: Vec<DeliveryRequest>,
    /// Every alert this ship was notified of
    received_alerts: Vec<DeliveryRequest>,
}

impl Spaceship {
    /// Create a ship with the default capacity and no pilot
    #[must_use]
    pub fn new(name: &str, fuel_level: u32) -> Self {
        Self::with_capacity(name, fuel_level, DEFAULT_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(name: &str, fuel_level: u32, capacity: u32) -> Self {
        Self {
            name: name.to_string(),
            fuel_level,
            capacity,
            location: HOME_PORT.to_string(),
            pilot: None,
            current_missions: Vec::new(),
            mission_history: Vec::new(),
            received_alerts: Vec::new(),
        }
    }

    /// Wrap the ship in a shared handle
    #[must_use]
    pub fn shared(self) -> ShipHandle {
        Rc::new(RefCell::new(self))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn fuel_level(&self) -> u32 {
        self.fuel_level
    }

    pub fn set_fuel_level(&mut self, fuel_level: u32) {
        self.fuel_level = fuel_level;
    }

    #[must_use]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    #[must_use]
    pub fn pilot(&self) -> Option<&Pilot> {
        self.pilot.as_ref()
    }

    pub fn pilot_mut(&mut self) -> Option<&mut Pilot> {
        self.pilot.as_mut()
    }

    #[must_use]
    pub fn current_missions(&self) -> &[DeliveryRequest] {
        &self.current_missions
    }

    #[must_use]
    pub fn mission_history(&self) -> &[DeliveryRequest] {
        &self.mission_history
    }

    /// Put `pilot` aboard, linking both sides.
    ///
    /// Any pilot already aboard is unlinked first and handed back.
    pub fn assign_pilot(&mut self, mut pilot: Pilot) -> Option<Pilot> {
        let displaced = self.release_pilot();

        pilot.link(Some(self.name.clone()));
        tracing::debug!(ship = %self.name, pilot = pilot.name(), "pilot assigned");
        self.pilot = Some(pilot);

        displaced
    }

    /// Take the pilot off the ship, clearing both sides of the link
    pub fn release_pilot(&mut self) -> Option<Pilot> {
        let mut pilot = self.pilot.take()?;
        pilot.link(None);
        Some(pilot)
    }

    /// Burn `fuel_used` units, returning the fuel left.
    ///
    /// # Errors
    ///
    /// Returns `MissionError::InsufficientFuel` if the tank holds less than
    /// `fuel_used`; the fuel level is left unchanged.
    pub fn travel(&mut self, fuel_used: u32) -> Result<u32, MissionError> {
        let remaining = self.fuel_level.checked_sub(fuel_used).ok_or(
            MissionError::InsufficientFuel { required: fuel_used, available: self.fuel_level },
        )?;

        self.fuel_level = remaining;
        tracing::info!(ship = %self.name, fuel_used, remaining, "spaceship traveled");
        Ok(remaining)
    }

    /// Add fuel and describe the refill
    pub fn refuel(&mut self, amount: u32) -> String {
        let before = self.fuel_level;
        self.fuel_level = self.fuel_level.saturating_add(amount);
        tracing::debug!(ship = %self.name, before, after = self.fuel_level, "spaceship refueled");

        format!(
            "{} refueled: {before} + {amount} units, new fuel level {} units",
            self.name, self.fuel_level
        )
    }

    /// Whether the ship has the fuel, the pilot and the room for `request`
    #[must_use]
    pub fn can_fulfill_mission(&self, request: &DeliveryRequest) -> bool {
        let has_fuel = self.fuel_level >= request.fuel_required();
        has_fuel && self.pilot.is_some() && self.capacity > 0
    }

    /// Take on `request`, burning the fuel it needs. Returns the fuel used.
    ///
    /// # Errors
    ///
    /// Returns `MissionError::DeliveryRejected` if the ship cannot fulfill it.
    pub fn accept_mission(&mut self, request: &DeliveryRequest) -> Result<u32, MissionError> {
        if !self.can_fulfill_mission(request) {
            return Err(self.rejection(request));
        }

        let fuel_needed = request.fuel_required();
        self.fuel_level = self.fuel_level.saturating_sub(fuel_needed);
        self.current_missions.push(request.clone());
        tracing::info!(
            ship = %self.name,
            title = %request.title,
            destination = %request.destination,
            "mission accepted"
        );
        Ok(fuel_needed)
    }

    /// Move `request` from the active list to the history
    pub fn complete_mission(&mut self, request: &DeliveryRequest) -> bool {
        if !self.abandon_mission(request) {
            return false;
        }
        self.mission_history.push(request.clone());
        tracing::info!(ship = %self.name, title = %request.title, "mission completed");
        true
    }

    /// Drop `request` from the active list without completing it
    pub fn abandon_mission(&mut self, request: &DeliveryRequest) -> bool {
        match self.current_missions.iter().position(|mission| mission == request) {
            Some(pos) => {
                self.current_missions.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Track `request` as active without burning fuel. Already active
    /// requests are ignored.
    pub fn add_active_mission(&mut self, request: &DeliveryRequest) {
        if !self.has_active_mission(request) {
            self.current_missions.push(request.clone());
        }
    }

    #[must_use]
    pub fn has_active_mission(&self, request: &DeliveryRequest) -> bool {
        self.current_missions.contains(request)
    }

    /// Whether an alert with this title reached the ship
    #[must_use]
    pub fn has_received_alert(&self, title: &str) -> bool {
        self.received_alerts.iter().any(|alert| alert.title == title)
    }

    /// Whether the ship has room for another delivery. Each active delivery
    /// takes a tenth of the capacity.
    #[must_use]
    pub fn is_available_for_missions(&self) -> bool {
        let slots = usize::try_from(self.capacity / 10).unwrap_or(usize::MAX);
        self.current_missions.len() < slots
    }

    /// The pilot aboard accepts a pending alert.
    ///
    /// # Errors
    ///
    /// Returns `MissionError::NoPilot` without a pilot aboard, or the error
    /// from [`Self::accept_mission`].
    pub fn accept_alert(&mut self, request: &DeliveryRequest) -> Result<(), MissionError> {
        if self.pilot.is_none() {
            return Err(MissionError::NoPilot(self.name.clone()));
        }

        self.accept_mission(request)?;
        if let Some(pilot) = self.pilot.as_mut() {
            pilot.record_acceptance(request);
        }
        Ok(())
    }

    /// The pilot aboard finishes an active delivery and gains experience.
    ///
    /// # Errors
    ///
    /// Returns `MissionError::NoPilot` without a pilot aboard, or
    /// `MissionError::DeliveryRejected` if `request` is not active.
    pub fn complete_delivery(&mut self, request: &DeliveryRequest) -> Result<(), MissionError> {
        if self.pilot.is_none() {
            return Err(MissionError::NoPilot(self.name.clone()));
        }
        if !self.complete_mission(request) {
            return Err(self.rejection(request));
        }

        if let Some(pilot) = self.pilot.as_mut() {
            pilot.record_completion(request);
        }
        Ok(())
    }

    /// Multi-line summary of the ship's state
    #[must_use]
    pub fn status_report(&self) -> String {
        let pilot_info = match &self.pilot {
            Some(pilot) => format!("Piloted by {}", pilot.name()),
            None => "No pilot assigned".to_string(),
        };
        let mission_info = if self.current_missions.is_empty() {
            "No active missions".to_string()
        } else {
            format!("Active missions: {}", self.current_missions.len())
        };

        format!(
            "Spaceship: {}\nLocation: {}\nFuel: {} units\nCapacity: {} books\n{pilot_info}\n{mission_info}",
            self.name, self.location, self.fuel_level, self.capacity
        )
    }

    /// Error for a delivery this ship cannot take or finish
    fn rejection(&self, request: &DeliveryRequest) -> MissionError {
        MissionError::DeliveryRejected { ship: self.name.clone(), title: request.title.clone() }
    }
}

impl DeliveryObserver for Spaceship {
    fn update(&mut self, request: &DeliveryRequest) {
        self.received_alerts.push(request.clone());

        if !self.can_fulfill_mission(request) {
            tracing::debug!(ship = %self.name, title = %request.title, "cannot fulfill delivery");
            return;
        }

        let response = match self.pilot.as_mut() {
            Some(pilot) => pilot.receive_mission_alert(request),
            None => {
                tracing::warn!(ship = %self.name, title = %request.title, "spaceship needs a pilot");
                return;
            }
        };

        if response == AlertResponse::AwaitingDecision {
            return;
        }
        if let Err(err) = self.accept_alert(request) {
            tracing::warn!(ship = %self.name, %err, "automatic acceptance failed");
        }
    }
}

/// Move the pilot of `from` aboard `to`.
///
/// The pilot is unlinked from `from` before being linked to `to`. Returns
/// whoever was displaced from `to`.
///
/// # Errors
///
/// Returns `MissionError::NoPilot` if `from` has no pilot; neither ship changes.
pub fn transfer_pilot(from: &mut Spaceship, to: &mut Spaceship) -> Result<Option<Pilot>, MissionError> {
    let pilot = from.release_pilot().ok_or_else(|| MissionError::NoPilot(from.name.clone()))?;
    Ok(to.assign_pilot(pilot))
}

#[cfg(test)]
mod tests;
