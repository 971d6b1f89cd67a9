use serde::{Deserialize, Serialize};

use super::coords::{ContentSize, NormalizedRect, TileCoord, Vec2};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelDestination {
    pub map: String,
    #[serde(default)]
    pub spawn: Option<TileCoord>,
}

/// Contextual action of a location together with its action-specific data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum LocationAction {
    Expense { category: String },
    Travel { destinations: Vec<TravelDestination> },
    Closet,
    Notebook,
}

impl LocationAction {
    pub fn as_token(&self) -> &'static str {
        match self {
            Self::Expense { .. } => "expense",
            Self::Travel { .. } => "travel",
            Self::Closet => "closet",
            Self::Notebook => "notebook",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub bounds: NormalizedRect,
    #[serde(flatten)]
    pub action: LocationAction,
}

/// Emitted once when movement ends inside an authored location.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrivalTrigger {
    pub location_id: String,
    pub location_name: String,
    pub action: LocationAction,
    pub tile: TileCoord,
}

impl ArrivalTrigger {
    pub fn from_location(location: &Location, tile: TileCoord) -> Self {
        Self {
            location_id: location.id.clone(),
            location_name: location.name.clone(),
            action: location.action.clone(),
            tile,
        }
    }
}

/// Receives arrival triggers; implemented by whatever opens the flow behind a
/// location (expense entry, travel picker, ...).
pub trait ArrivalHandler {
    fn on_arrival(&mut self, trigger: &ArrivalTrigger);
}

impl<F> ArrivalHandler for F
where
    F: FnMut(&ArrivalTrigger),
{
    fn on_arrival(&mut self, trigger: &ArrivalTrigger) {
        self(trigger)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationResolver {
    locations: Vec<Location>,
}

impl LocationResolver {
    pub fn new(locations: Vec<Location>) -> Self {
        Self { locations }
    }

    /// First location, in authoring order, whose bounds contain `pixel` once
    /// scaled to the measured content size.
    pub fn resolve(&self, pixel: Vec2, content: ContentSize) -> Option<&Location> {
        self.locations
            .iter()
            .find(|location| location.bounds.to_pixels(content).contains(pixel))
    }
}
