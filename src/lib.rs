//! A library that lends books and spaceships.
//!
//! Ships are lent through [`SpaceshipAdapter`], which presents a
//! [`Spaceship`] as a [`Loanable`] item. Borrowed ships fly knowledge
//! missions through [`IntergalacticMissionService`], while the
//! [`delivery`] module broadcasts new-book alerts to ships and assigns
//! deliveries to the best-fueled one. Missions and deliveries share the
//! [`MissionStatus`] lifecycle.

pub mod adapter;
pub mod book;
pub mod catalog;
pub mod delivery;
pub mod error;
pub mod loanable;
pub mod member;
pub mod mission;
pub mod observers;
pub mod pilot;
pub mod policy;
pub mod space_library;
pub mod spaceship;
pub mod status;

pub use adapter::SpaceshipAdapter;
pub use book::{Book, BookStatus};
pub use catalog::{Catalog, Library};
pub use error::{LoanError, MissionError, PolicyError};
pub use loanable::{Annotate, CheckoutStatus, Loanable};
pub use member::{LoanedItem, Member, PilotMember};
pub use mission::{IntergalacticMissionService, MissionRecord};
pub use observers::{FailureAlarm, MissionObserver, TransitionLogger};
pub use pilot::Pilot;
pub use policy::MissionPolicy;
pub use space_library::SpaceLibrary;
pub use spaceship::{ShipHandle, Spaceship};
pub use status::{Lifecycle, MissionEvent, MissionStatus, StatusTransition};
