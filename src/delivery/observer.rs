use crate::delivery::DeliveryRequest;

/// Trait for parties interested in book deliveries
pub trait DeliveryObserver {
    /// Called by the monitor for every delivery request it broadcasts
    fn update(&mut self, request: &DeliveryRequest);
}
