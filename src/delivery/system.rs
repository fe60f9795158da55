use std::{collections::HashMap, fmt};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    catalog::Catalog,
    delivery::{DeliveryRequest, LibraryMonitor},
    error::MissionError,
    observers::MissionObserver,
    spaceship::ShipHandle,
    status::{Lifecycle, MissionEvent, MissionStatus, StatusTransition},
};

/// One line of the delivery activity log
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ActivityEntry {
    /// When the activity happened
    pub timestamp: DateTime<Utc>,
    /// What happened
    pub message: String,
}

impl fmt::Display for ActivityEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.timestamp.format("%Y-%m-%d %H:%M:%S"), self.message)
    }
}

/// A delivery tracked by the system
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DeliveryRecord {
    /// What is being delivered
    pub request: DeliveryRequest,
    /// Ship currently responsible for it
    pub ship: String,
    /// Status and transition history
    pub lifecycle: Lifecycle,
    /// When the first assignment happened
    pub assigned_at: DateTime<Utc>,
}

/// Result of a successful assignment
#[derive(Debug, Clone)]
pub struct Assignment {
    /// The chosen ship
    pub ship: ShipHandle,
    /// Name of the chosen ship
    pub ship_name: String,
    /// Fuel the ship burned to accept the delivery
    pub fuel_used: u32,
}

/// Assigns delivery requests to ships and tracks them to completion
#[derive(Default)]
pub struct DeliverySystem {
    /// Deliveries by title
    records: HashMap<String, DeliveryRecord>,
    /// Titles delivered so far, in completion order
    delivered: Vec<String>,
    /// Append-only activity log
    log: Vec<ActivityEntry>,
    /// Registered status observers
    observers: Vec<Box<dyn MissionObserver>>,
}

// Manual implementation of Debug for DeliverySystem
impl fmt::Debug for DeliverySystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeliverySystem")
            .field("records", &self.records)
            .field("delivered", &self.delivered)
            .field("log", &self.log)
            .field("observers_count", &self.observers.len())
            .finish()
    }
}

impl DeliverySystem {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer to be notified of status changes
    pub fn register_observer(&mut self, observer: Box<dyn MissionObserver>) {
        self.observers.push(observer);
    }

    /// Start monitoring `catalog` for new books
    pub fn initialize(&mut self, catalog: &impl Catalog) -> LibraryMonitor {
        self.record_activity(format!("Monitoring initialized for library: {}", catalog.name()));
        LibraryMonitor::new(catalog)
    }

    /// Subscribe `ship` to the monitor's delivery alerts
    pub fn register_spaceship(&mut self, monitor: &mut LibraryMonitor, ship: &ShipHandle) {
        monitor.add_observer(ship.clone());
        let Ok(registered) = ship.try_borrow() else {
            tracing::warn!("spaceship registered while in use elsewhere");
            return;
        };
        let name = registered.name().to_string();
        drop(registered);
        self.record_activity(format!("Spaceship {name} registered for delivery missions"));
    }

    /// Hand `request` to the eligible ship with the most fuel. Ties go to the
    /// ship listed first. The ship burns the fuel and its pilot is briefed.
    ///
    /// # Errors
    ///
    /// Returns `MissionError::InvalidState` if the title is already tracked,
    /// `MissionError::NoEligibleShip` if no ship can fulfill it. Ships
    /// borrowed elsewhere are not considered.
    pub fn assign_mission(
        &mut self,
        request: &DeliveryRequest,
        ships: &[ShipHandle],
    ) -> Result<Assignment, MissionError> {
        if let Some(record) = self.records.get(&request.title) {
            return Err(MissionError::InvalidState(record.lifecycle.status()));
        }

        let Some(ship) = select_ship(request, ships, &[]) else {
            self.record_activity(format!("No spaceship available to deliver {}", request.title));
            return Err(MissionError::NoEligibleShip(request.title.clone()));
        };
        let assignment = dispatch(request, ship)?;

        let mut lifecycle = Lifecycle::new();
        let transition = lifecycle.apply(MissionEvent::Launch)?;
        self.records.insert(
            request.title.clone(),
            DeliveryRecord {
                request: request.clone(),
                ship: assignment.ship_name.clone(),
                lifecycle,
                assigned_at: Utc::now(),
            },
        );
        self.notify(&request.title, &transition);
        self.record_activity(format!(
            "Mission {} assigned to {} (destination {}, fuel used {})",
            request.title, assignment.ship_name, request.destination, assignment.fuel_used
        ));

        Ok(assignment)
    }

    /// Move an in-progress delivery to another ship, chosen the same way as
    /// [`Self::assign_mission`] among ships not named in `excluded`. The
    /// current ship is always excluded and drops the delivery once a
    /// replacement has accepted it.
    ///
    /// # Errors
    ///
    /// Returns `MissionError::DeliveryNotFound` for an unknown title,
    /// `MissionError::InvalidState` unless the delivery is in progress, and
    /// `MissionError::NoEligibleShip` if no other ship can take it, and
    /// `MissionError::ShipBusy` if the current ship is borrowed elsewhere;
    /// the current assignment is kept in these failure cases.
    pub fn reassign_mission(
        &mut self,
        request: &DeliveryRequest,
        ships: &[ShipHandle],
        excluded: &[&str],
    ) -> Result<Assignment, MissionError> {
        let record = self
            .records
            .get(&request.title)
            .ok_or_else(|| MissionError::DeliveryNotFound(request.title.clone()))?;
        let status = record.lifecycle.status();
        if status != MissionStatus::InProgress {
            return Err(MissionError::InvalidState(status));
        }
        let previous = record.ship.clone();

        let mut current = ships
            .iter()
            .find(|ship| ship.try_borrow().is_ok_and(|ship| ship.name() == previous))
            .map(|ship| ship.try_borrow_mut().map_err(|_| MissionError::ShipBusy(request.title.clone())))
            .transpose()?;

        let mut blocked: Vec<&str> = excluded.to_vec();
        blocked.push(&previous);
        let Some(ship) = select_ship(request, ships, &blocked) else {
            drop(current);
            self.record_activity(format!("Reassignment of {} failed: no other spaceship", request.title));
            return Err(MissionError::NoEligibleShip(request.title.clone()));
        };
        let assignment = dispatch(request, ship)?;

        if let Some(old) = current.as_mut() {
            old.abandon_mission(request);
        }
        drop(current);

        let transition = match self.records.get_mut(&request.title) {
            Some(record) => {
                record.ship.clone_from(&assignment.ship_name);
                record.lifecycle.apply(MissionEvent::Reassign)?
            }
            None => return Err(MissionError::DeliveryNotFound(request.title.clone())),
        };
        self.notify(&request.title, &transition);
        self.record_activity(format!(
            "Mission {} reassigned from {previous} to {}",
            request.title, assignment.ship_name
        ));

        Ok(assignment)
    }

    /// The pilot of `ship` finishes `request`; the title is recorded as
    /// delivered. Deliveries that were never assigned through this system
    /// are recorded as well.
    ///
    /// # Errors
    ///
    /// Returns `MissionError::InvalidState` if the tracked delivery is not in
    /// progress, `MissionError::DeliveryRejected` if another ship holds it,
    /// `MissionError::ShipBusy` if `ship` is borrowed elsewhere, or the error
    /// from `Spaceship::complete_delivery`.
    pub fn record_mission_completion(
        &mut self,
        ship: &ShipHandle,
        request: &DeliveryRequest,
    ) -> Result<(), MissionError> {
        let mut finisher =
            ship.try_borrow_mut().map_err(|_| MissionError::ShipBusy(request.title.clone()))?;
        let ship_name = finisher.name().to_string();

        if let Some(record) = self.records.get(&request.title) {
            let status = record.lifecycle.status();
            if status != MissionStatus::InProgress {
                return Err(MissionError::InvalidState(status));
            }
            if record.ship != ship_name {
                return Err(MissionError::DeliveryRejected {
                    ship: ship_name,
                    title: request.title.clone(),
                });
            }
        }

        finisher.complete_delivery(request)?;
        drop(finisher);

        if let Some(record) = self.records.get_mut(&request.title) {
            let transition = record.lifecycle.apply(MissionEvent::Complete)?;
            self.notify(&request.title, &transition);
        }
        self.delivered.push(request.title.clone());
        self.record_activity(format!(
            "Mission completed: {ship_name} delivered {} to {}",
            request.title, request.destination
        ));

        Ok(())
    }

    /// Whether a delivery with this title was completed
    #[must_use]
    pub fn verify_book_delivered(&self, title: &str) -> bool {
        self.delivered.iter().any(|delivered| delivered == title)
    }

    /// Status of the delivery with this title, if tracked
    #[must_use]
    pub fn mission_status(&self, title: &str) -> Option<MissionStatus> {
        self.records.get(title).map(|record| record.lifecycle.status())
    }

    #[must_use]
    pub fn record(&self, title: &str) -> Option<&DeliveryRecord> {
        self.records.get(title)
    }

    #[must_use]
    pub fn activity_log(&self) -> &[ActivityEntry] {
        &self.log
    }

    /// Append a timestamped line to the activity log
    fn record_activity(&mut self, message: String) {
        tracing::info!("{message}");
        self.log.push(ActivityEntry { timestamp: Utc::now(), message });
    }

    /// Notify every observer of a status change
    fn notify(&self, subject: &str, transition: &StatusTransition) {
        for observer in &self.observers {
            observer.on_status_change(subject, transition);
        }
    }
}

/// Pick the eligible ship with the most fuel, the earliest one on ties.
/// Ships borrowed elsewhere are skipped.
fn select_ship<'s>(
    request: &DeliveryRequest,
    ships: &'s [ShipHandle],
    excluded: &[&str],
) -> Option<&'s ShipHandle> {
    let mut best: Option<(&ShipHandle, u32)> = None;

    for ship in ships {
        let Ok(candidate) = ship.try_borrow_mut() else {
            continue;
        };
        if excluded.iter().any(|name| *name == candidate.name())
            || !candidate.can_fulfill_mission(request)
        {
            continue;
        }

        let fuel = candidate.fuel_level();
        if best.is_none_or(|(_, best_fuel)| fuel > best_fuel) {
            best = Some((ship, fuel));
        }
    }

    best.map(|(ship, _)| ship)
}

/// Have `ship` accept `request` and brief its pilot
fn dispatch(request: &DeliveryRequest, ship: &ShipHandle) -> Result<Assignment, MissionError> {
    let mut chosen =
        ship.try_borrow_mut().map_err(|_| MissionError::ShipBusy(request.title.clone()))?;
    let fuel_used = chosen.accept_mission(request)?;
    if let Some(pilot) = chosen.pilot_mut() {
        pilot.record_briefing(request);
    }

    Ok(Assignment { ship: ship.clone(), ship_name: chosen.name().to_string(), fuel_used })
}
