use std::{
    collections::{BTreeMap, HashSet},
    fmt,
};

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
    error::{LoanError, MissionError},
    loanable::{Annotate, Loanable},
    observers::MissionObserver,
    space_library::SpaceLibrary,
    status::{Lifecycle, MissionEvent, MissionStatus, StatusTransition},
};

/// Fixed part of the launch fuel cost
const BASE_LAUNCH_FUEL: u32 = 10;

/// Destination lengths wrap around at this value in the fuel formula
const DESTINATION_FUEL_MODULUS: u32 = 20;

/// Launch fuel per transported book
const FUEL_PER_BOOK: u32 = 5;

/// A knowledge-exchange mission flown with a borrowed ship
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MissionRecord {
    /// Sequential id, starting at 1
    pub id: u32,
    /// Number of the pilot member flying the mission
    pub pilot: String,
    /// Name of the borrowed ship
    pub ship: String,
    /// Where the mission goes
    pub destination: String,
    /// ISBNs of the transported books
    pub books: Vec<String>,
    /// Day the mission was prepared
    pub departure_date: NaiveDate,
    /// Status and transition history
    pub lifecycle: Lifecycle,
}

impl MissionRecord {
    #[must_use]
    pub fn status(&self) -> MissionStatus {
        self.lifecycle.status()
    }
}

/// Fuel needed to launch: `10 + chars(destination) % 20 + 5 * books`
#[must_use]
pub fn launch_fuel(destination: &str, book_count: usize) -> u32 {
    let length = u32::try_from(destination.chars().count()).unwrap_or(u32::MAX);
    let books = u32::try_from(book_count).unwrap_or(u32::MAX);
    BASE_LAUNCH_FUEL
        .saturating_add(length % DESTINATION_FUEL_MODULUS)
        .saturating_add(FUEL_PER_BOOK.saturating_mul(books))
}

/// Flight hours logged for a trip: a tenth of the destination length
#[must_use]
pub fn flight_hours(destination: &str) -> f64 {
    let length = u32::try_from(destination.chars().count()).unwrap_or(u32::MAX);
    f64::from(length) / 10.0
}

/// Runs missions that carry books to other worlds on borrowed ships
pub struct IntergalacticMissionService {
    /// Library lending the ships and books
    library: SpaceLibrary,
    /// Every mission ever prepared, by id
    missions: BTreeMap<u32, MissionRecord>,
    /// Id of the last mission prepared
    mission_counter: u32,
    /// Most recent failure, kept for display
    last_error: Option<MissionError>,
    /// Registered status observers
    observers: Vec<Box<dyn MissionObserver>>,
}

// Manual implementation of Debug for IntergalacticMissionService
impl fmt::Debug for IntergalacticMissionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntergalacticMissionService")
            .field("library", &self.library)
            .field("missions", &self.missions)
            .field("mission_counter", &self.mission_counter)
            .field("last_error", &self.last_error)
            .field("observers_count", &self.observers.len())
            .finish()
    }
}

impl IntergalacticMissionService {
    #[must_use]
    pub fn new(library: SpaceLibrary) -> Self {
        Self {
            library,
            missions: BTreeMap::new(),
            mission_counter: 0,
            last_error: None,
            observers: Vec::new(),
        }
    }

    /// Register an observer to be notified of status changes
    pub fn register_observer(&mut self, observer: Box<dyn MissionObserver>) {
        self.observers.push(observer);
    }

    #[must_use]
    pub fn library(&self) -> &SpaceLibrary {
        &self.library
    }

    pub fn library_mut(&mut self) -> &mut SpaceLibrary {
        &mut self.library
    }

    #[must_use]
    pub fn mission(&self, id: u32) -> Option<&MissionRecord> {
        self.missions.get(&id)
    }

    /// All missions, by id
    #[must_use]
    pub fn missions(&self) -> &BTreeMap<u32, MissionRecord> {
        &self.missions
    }

    /// The error returned by the most recent failed call, cleared by the
    /// next call that succeeds
    #[must_use]
    pub fn last_error(&self) -> Option<&MissionError> {
        self.last_error.as_ref()
    }

    /// Render every mission as pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if serialization fails.
    pub fn missions_json(&self) -> Result<String, serde_json::Error> {
        let missions: Vec<&MissionRecord> = self.missions.values().collect();
        serde_json::to_string_pretty(&missions)
    }

    /// Reserve a ship and books for a trip to `destination`.
    ///
    /// Checks, in order: the ship is available, the member may fly it, every
    /// book is available and listed once. Nothing is borrowed unless every
    /// check passes.
    ///
    /// # Errors
    ///
    /// Returns `MissionError::ShipUnavailable`,
    /// `MissionError::InsufficientQualification`,
    /// `MissionError::BookUnavailable` or a wrapped `LoanError` for an
    /// unknown member.
    pub fn prepare_mission(
        &mut self,
        ship_name: &str,
        member_number: &str,
        destination: &str,
        books: &[&str],
    ) -> Result<u32, MissionError> {
        let outcome = self.try_prepare(ship_name, member_number, destination, books);
        self.remember(outcome)
    }

    /// Take off. Success moves the mission to In Progress and logs flight
    /// hours for the pilot; a fuel shortage moves it to Failed.
    ///
    /// # Errors
    ///
    /// Returns `MissionError::MissionNotFound`, `MissionError::InvalidState`
    /// unless the mission is Preparing, or `MissionError::InsufficientFuel`.
    pub fn launch_mission(&mut self, id: u32) -> Result<(), MissionError> {
        let outcome = self.try_launch(id);
        self.remember(outcome)
    }

    /// Bring the ship and books back. The ship is refueled; books that are
    /// no longer held by the pilot are put back on the shelf. Problems with
    /// single items are logged and do not stop the completion.
    ///
    /// # Errors
    ///
    /// Returns `MissionError::MissionNotFound`, or
    /// `MissionError::InvalidState` unless the mission is In Progress.
    pub fn complete_mission(&mut self, id: u32) -> Result<(), MissionError> {
        let outcome = self.try_complete(id);
        self.remember(outcome)
    }

    /// Record the outcome of a public call
    fn remember<T>(&mut self, outcome: Result<T, MissionError>) -> Result<T, MissionError> {
        match &outcome {
            Ok(_) => self.last_error = None,
            Err(err) => {
                tracing::warn!(%err, "mission operation failed");
                self.last_error = Some(err.clone());
            }
        }
        outcome
    }

    /// Validation and reservation behind `prepare_mission`
    fn try_prepare(
        &mut self,
        ship_name: &str,
        member_number: &str,
        destination: &str,
        books: &[&str],
    ) -> Result<u32, MissionError> {
        let ship = self
            .library
            .ship(ship_name)
            .filter(|ship| ship.is_available())
            .ok_or_else(|| MissionError::ShipUnavailable(ship_name.to_string()))?;

        let pilot = self
            .library
            .member(member_number)
            .ok_or_else(|| LoanError::UnknownMember(member_number.to_string()))?;
        let policy = self.library.policy();
        if !pilot.can_pilot(ship.spaceship(), policy) {
            return Err(MissionError::InsufficientQualification {
                ship: ship_name.to_string(),
                level: pilot.qualification_level(),
                required: policy.required_level(ship_name),
            });
        }

        let mut requested = HashSet::new();
        for isbn in books {
            let available = self.library.book(isbn).is_some_and(Loanable::is_available);
            // A book can only travel once per mission
            if !available || !requested.insert(*isbn) {
                return Err(MissionError::BookUnavailable((*isbn).to_string()));
            }
        }

        self.library.borrow_ship(ship_name, member_number)?;
        for isbn in books {
            self.library.borrow_book(isbn, member_number)?;
        }

        self.mission_counter = self.mission_counter.saturating_add(1);
        let id = self.mission_counter;
        self.missions.insert(
            id,
            MissionRecord {
                id,
                pilot: member_number.to_string(),
                ship: ship_name.to_string(),
                destination: destination.to_string(),
                books: books.iter().map(|isbn| (*isbn).to_string()).collect(),
                departure_date: Local::now().date_naive(),
                lifecycle: Lifecycle::new(),
            },
        );
        tracing::info!(id, ship = ship_name, pilot = member_number, destination, "mission prepared");

        Ok(id)
    }

    /// Fuel check and takeoff behind `launch_mission`
    fn try_launch(&mut self, id: u32) -> Result<(), MissionError> {
        let mission = self.missions.get(&id).ok_or(MissionError::MissionNotFound(id))?;
        if mission.status() != MissionStatus::Preparing {
            return Err(MissionError::InvalidState(mission.status()));
        }

        let fuel_needed = launch_fuel(&mission.destination, mission.books.len());
        let hours = flight_hours(&mission.destination);
        let ship_name = mission.ship.clone();
        let pilot_number = mission.pilot.clone();

        let travel = match self.library.ship_mut(&ship_name) {
            Some(ship) => ship.spaceship_mut().travel(fuel_needed),
            None => Err(MissionError::ShipUnavailable(ship_name)),
        };

        match travel {
            Ok(_) => {
                self.transition(id, MissionEvent::Launch)?;
                if let Some(pilot) = self.library.member_mut(&pilot_number) {
                    pilot.log_flight_hours(hours);
                }
                Ok(())
            }
            Err(err) => {
                self.transition(id, MissionEvent::Abort)?;
                Err(err)
            }
        }
    }

    /// Resource return behind `complete_mission`
    fn try_complete(&mut self, id: u32) -> Result<(), MissionError> {
        let mission = self.missions.get(&id).ok_or(MissionError::MissionNotFound(id))?;
        if mission.status() != MissionStatus::InProgress {
            return Err(MissionError::InvalidState(mission.status()));
        }
        let mission = mission.clone();
        let note = format!("This book traveled to {}!", mission.destination);

        if let Err(err) = self.library.return_ship(&mission.ship, &mission.pilot) {
            tracing::warn!(id, ship = %mission.ship, %err, "spaceship could not be returned");
        }
        if let Some(ship) = self.library.ship_mut(&mission.ship) {
            ship.add_note(&note);
        }

        for isbn in &mission.books {
            self.return_book(isbn, &mission.pilot);
            self.library.annotate_book(isbn, &note);
        }

        self.transition(id, MissionEvent::Complete)?;
        Ok(())
    }

    /// Hand a mission book back, putting it on the shelf if the pilot no
    /// longer holds it
    fn return_book(&mut self, isbn: &str, pilot_number: &str) {
        let held = self.library.book(isbn).is_some_and(|book| book.is_borrowed_by(pilot_number));
        let result = if held {
            self.library.return_book(isbn, pilot_number)
        } else {
            tracing::warn!(isbn, "book was not held by the pilot, forcing it back on the shelf");
            self.library.force_book_available(isbn)
        };

        if let Err(err) = result {
            tracing::warn!(isbn, %err, "book could not be returned");
        }
    }

    /// Apply `event` to a mission and notify observers
    fn transition(&mut self, id: u32, event: MissionEvent) -> Result<(), MissionError> {
        let mission = self.missions.get_mut(&id).ok_or(MissionError::MissionNotFound(id))?;
        let transition: StatusTransition = mission.lifecycle.apply(event)?;

        let subject = format!("mission {id}");
        for observer in &self.observers {
            observer.on_status_change(&subject, &transition);
        }
        Ok(())
    }
}
