//! Observer side of the library: a monitor broadcasts delivery requests to
//! ships, and the delivery system assigns each request to the best ship.

pub mod monitor;
pub mod observer;
pub mod request;
pub mod system;

pub use monitor::LibraryMonitor;
pub use observer::DeliveryObserver;
pub use request::DeliveryRequest;
pub use system::{ActivityEntry, Assignment, DeliveryRecord, DeliverySystem};
