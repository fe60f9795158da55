use crate::delivery::DeliveryRequest;

/// Priority above which a pilot accepts a delivery without deciding
pub const AUTO_ACCEPT_PRIORITY: u8 = 3;

/// How a pilot reacts to a delivery alert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertResponse {
    /// The delivery is urgent enough to take on at once
    AutoAccept,
    /// The alert stays pending until the pilot accepts or declines it
    AwaitingDecision,
}

/// A pilot flying one of the library's ships
///
/// The ship link is written only by `Spaceship::assign_pilot` and
/// `Spaceship::release_pilot`, so it always names the ship that currently
/// carries this pilot.
#[derive(Debug, Clone, PartialEq)]
pub struct Pilot {
    /// Display name
    name: String,
    /// Name of the ship carrying this pilot
    ship: Option<String>,
    /// Sum of the priorities of completed deliveries
    experience: u32,
    /// Deliveries accepted so far
    mission_count: u32,
    /// Alerts waiting for a decision
    mission_alerts: Vec<DeliveryRequest>,
    /// Deliveries the pilot was briefed on
    briefings: Vec<DeliveryRequest>,
}

impl Pilot {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ship: None,
            experience: 0,
            mission_count: 0,
            mission_alerts: Vec::new(),
            briefings: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the ship this pilot is aboard
    #[must_use]
    pub fn ship_name(&self) -> Option<&str> {
        self.ship.as_deref()
    }

    #[must_use]
    pub fn experience(&self) -> u32 {
        self.experience
    }

    #[must_use]
    pub fn mission_count(&self) -> u32 {
        self.mission_count
    }

    #[must_use]
    pub fn mission_alerts(&self) -> &[DeliveryRequest] {
        &self.mission_alerts
    }

    /// Set or clear the ship link
    pub(crate) fn link(&mut self, ship: Option<String>) {
        self.ship = ship;
    }

    /// Record an alert and decide whether to take the delivery right away
    pub fn receive_mission_alert(&mut self, request: &DeliveryRequest) -> AlertResponse {
        self.mission_alerts.push(request.clone());
        tracing::info!(pilot = %self.name, destination = %request.destination, "mission alert received");

        if request.priority > AUTO_ACCEPT_PRIORITY {
            AlertResponse::AutoAccept
        } else {
            tracing::debug!(pilot = %self.name, title = %request.title, "awaiting pilot decision");
            AlertResponse::AwaitingDecision
        }
    }

    /// Drop a pending alert, returning whether it was pending
    pub fn decline_mission(&mut self, request: &DeliveryRequest) -> bool {
        let declined = self.remove_alert(request);
        if declined {
            tracing::info!(pilot = %self.name, destination = %request.destination, "mission declined");
        }
        declined
    }

    /// Note that the ship carrying this pilot took on `request`
    pub(crate) fn record_acceptance(&mut self, request: &DeliveryRequest) {
        self.mission_count = self.mission_count.saturating_add(1);
        self.remove_alert(request);
    }

    /// Note that the ship carrying this pilot finished `request`
    pub(crate) fn record_completion(&mut self, request: &DeliveryRequest) {
        self.experience = self.experience.saturating_add(u32::from(request.priority));
    }

    /// Hand the pilot a briefing for an assigned delivery
    pub fn record_briefing(&mut self, request: &DeliveryRequest) {
        self.briefings.push(request.clone());
    }

    #[must_use]
    pub fn has_received_briefing(&self, title: &str) -> bool {
        self.briefings.iter().any(|briefing| briefing.title == title)
    }

    /// Multi-line summary of the pilot's record
    #[must_use]
    pub fn status_report(&self) -> String {
        let ship_info = match &self.ship {
            Some(ship) => format!("Piloting {ship}"),
            None => "Not assigned to any spaceship".to_string(),
        };
        let alert_info = if self.mission_alerts.is_empty() {
            "No pending mission alerts".to_string()
        } else {
            format!("Pending mission alerts: {}", self.mission_alerts.len())
        };

        format!(
            "Pilot: {}\nExperience: {} points\nCompleted missions: {}\n{ship_info}\n{alert_info}",
            self.name, self.experience, self.mission_count
        )
    }

    /// Remove `request` from the pending alerts
    fn remove_alert(&mut self, request: &DeliveryRequest) -> bool {
        match self.mission_alerts.iter().position(|alert| alert == request) {
            Some(pos) => {
                self.mission_alerts.remove(pos);
                true
            }
            None => false,
        }
    }
}
