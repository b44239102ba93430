//! Taxi-v3 state codec and human-readable descriptions.
//!
//! A Taxi observation packs four bounded fields into one integer:
//! `((taxi_row * 5 + taxi_col) * 5 + passenger_location) * 4 + destination`.
//! Destination is the least significant digit.

use std::fmt;

use crate::core::{GymError, Result};

pub const NUM_ROWS: u32 = 5;
pub const NUM_COLS: u32 = 5;
/// Four pickup locations plus "in taxi".
pub const NUM_PASSENGER_LOCATIONS: u32 = 5;
pub const NUM_DESTINATIONS: u32 = 4;
pub const NUM_STATES: u32 = NUM_ROWS * NUM_COLS * NUM_PASSENGER_LOCATIONS * NUM_DESTINATIONS;
pub const NUM_ACTIONS: u32 = 6;

/// The four fields of a Taxi observation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaxiState {
    pub taxi_row: u32,
    pub taxi_col: u32,
    pub passenger_location: u32,
    pub destination: u32,
}

impl TaxiState {
    pub fn new(taxi_row: u32, taxi_col: u32, passenger_location: u32, destination: u32) -> Self {
        Self { taxi_row, taxi_col, passenger_location, destination }
    }

    /// Split a state id into its fields.
    ///
    /// No range check is made. Ids at or above [`NUM_STATES`] still decode, but
    /// `taxi_row` then exceeds its bound and the result has no meaning.
    pub fn decode(state: u32) -> Self {
        let mut rest = state;
        let destination = rest % NUM_DESTINATIONS;
        rest = (rest - destination) / NUM_DESTINATIONS;
        let passenger_location = rest % NUM_PASSENGER_LOCATIONS;
        rest = (rest - passenger_location) / NUM_PASSENGER_LOCATIONS;
        let taxi_col = rest % NUM_COLS;
        rest = (rest - taxi_col) / NUM_COLS;
        Self { taxi_row: rest, taxi_col, passenger_location, destination }
    }

    /// Pack the fields back into a state id. Exact inverse of [`TaxiState::decode`] for valid states.
    /// Out-of-bounds fields wrap around `u32` instead of panicking.
    pub fn encode(&self) -> u32 {
        self.taxi_row
            .wrapping_mul(NUM_COLS)
            .wrapping_add(self.taxi_col)
            .wrapping_mul(NUM_PASSENGER_LOCATIONS)
            .wrapping_add(self.passenger_location)
            .wrapping_mul(NUM_DESTINATIONS)
            .wrapping_add(self.destination)
    }

    /// Whether every field lies within its declared bound.
    pub fn is_valid(&self) -> bool {
        self.taxi_row < NUM_ROWS
            && self.taxi_col < NUM_COLS
            && self.passenger_location < NUM_PASSENGER_LOCATIONS
            && self.destination < NUM_DESTINATIONS
    }

    /// All valid states, in state id order.
    pub fn all() -> impl Iterator<Item = TaxiState> {
        (0..NUM_STATES).map(TaxiState::decode)
    }

    pub fn passenger(&self) -> Option<PassengerLocation> {
        PassengerLocation::try_from(self.passenger_location).ok()
    }

    pub fn destination_location(&self) -> Option<Location> {
        Location::try_from(self.destination).ok()
    }
}

/// The four marked pickup and drop-off squares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Location {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Location {
    pub const ALL: [Location; 4] = [Location::Red, Location::Green, Location::Yellow, Location::Blue];

    pub fn label(self) -> &'static str {
        match self {
            Location::Red => "Red",
            Location::Green => "Green",
            Location::Yellow => "Yellow",
            Location::Blue => "Blue",
        }
    }
}

impl TryFrom<u32> for Location {
    type Error = GymError;

    fn try_from(index: u32) -> Result<Self> {
        Location::ALL
            .get(index as usize)
            .copied()
            .ok_or_else(|| GymError::InvalidObservation(format!("no location with index {index}")))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.label()) }
}

/// Where the passenger is: waiting at a marked square, or riding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PassengerLocation {
    At(Location),
    InTaxi,
}

impl PassengerLocation {
    pub fn label(self) -> &'static str {
        match self {
            PassengerLocation::At(loc) => loc.label(),
            PassengerLocation::InTaxi => "In taxi",
        }
    }
}

impl TryFrom<u32> for PassengerLocation {
    type Error = GymError;

    fn try_from(index: u32) -> Result<Self> {
        match index {
            4 => Ok(PassengerLocation::InTaxi),
            i => Location::try_from(i).map(PassengerLocation::At),
        }
    }
}

impl fmt::Display for PassengerLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.label()) }
}

/// The six Taxi actions, in action id order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaxiAction {
    South,
    North,
    East,
    West,
    Pickup,
    Dropoff,
}

impl TaxiAction {
    pub const ALL: [TaxiAction; 6] = [
        TaxiAction::South,
        TaxiAction::North,
        TaxiAction::East,
        TaxiAction::West,
        TaxiAction::Pickup,
        TaxiAction::Dropoff,
    ];

    pub fn id(self) -> u32 { self as u32 }

    pub fn label(self) -> &'static str {
        match self {
            TaxiAction::South => "Move south (down)",
            TaxiAction::North => "Move north (up)",
            TaxiAction::East => "Move east (right)",
            TaxiAction::West => "Move west (left)",
            TaxiAction::Pickup => "Pick up passenger",
            TaxiAction::Dropoff => "Drop off passenger",
        }
    }
}

impl TryFrom<i64> for TaxiAction {
    type Error = GymError;

    fn try_from(action: i64) -> Result<Self> {
        usize::try_from(action)
            .ok()
            .and_then(|i| TaxiAction::ALL.get(i).copied())
            .ok_or_else(|| {
                GymError::InvalidAction(format!("{action} is outside the Taxi action space [0, {NUM_ACTIONS})"))
            })
    }
}

impl TryFrom<u32> for TaxiAction {
    type Error = GymError;

    fn try_from(action: u32) -> Result<Self> { TaxiAction::try_from(i64::from(action)) }
}

impl fmt::Display for TaxiAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.label()) }
}

/// One-sentence description of a Taxi state id.
pub fn describe_state(state: u32) -> String {
    let s = TaxiState::decode(state);
    // passenger_location and destination are reduced modulo their radix, so both labels always resolve
    let passenger = s.passenger().map_or("?", PassengerLocation::label);
    let destination = s.destination_location().map_or("?", Location::label);
    format!(
        "Passenger is at: {passenger}, wants to go to {destination}. Taxi currently at ({}, {})",
        s.taxi_row, s.taxi_col
    )
}

/// Label for an action id. Ids outside `[0, 6)` are a caller error.
pub fn describe_action(action: i64) -> Result<&'static str> {
    TaxiAction::try_from(action).map(TaxiAction::label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_boundaries() {
        assert_eq!(TaxiState::decode(0), TaxiState::new(0, 0, 0, 0));
        assert_eq!(TaxiState::decode(499), TaxiState::new(4, 4, 4, 3));
        assert_eq!(TaxiState::decode(4), TaxiState::new(0, 0, 1, 0));
    }

    #[test]
    fn out_of_range_id_decodes_without_error() {
        let s = TaxiState::decode(500);
        assert_eq!(s, TaxiState::new(5, 0, 0, 0));
        assert!(!s.is_valid());
    }

    #[test]
    fn encode_wraps_oversized_fields() {
        assert_eq!(TaxiState::new(u32::MAX, 0, 0, 0).encode(), u32::MAX.wrapping_mul(100));
        let _ = TaxiState::new(u32::MAX, u32::MAX, u32::MAX, u32::MAX).encode();
        assert_eq!(TaxiState::decode(u32::MAX).encode(), u32::MAX);
    }

    #[test]
    fn all_states_are_valid_and_ordered() {
        let ids: Vec<u32> = TaxiState::all().map(|s| s.encode()).collect();
        assert_eq!(ids.len(), NUM_STATES as usize);
        assert!(ids.iter().enumerate().all(|(i, &id)| i as u32 == id));
        assert!(TaxiState::all().all(|s| s.is_valid()));
    }

    #[test]
    fn state_sentence() {
        assert_eq!(
            describe_state(0),
            "Passenger is at: Red, wants to go to Red. Taxi currently at (0, 0)"
        );
        // row 3, col 1, passenger in taxi, destination Blue
        let id = TaxiState::new(3, 1, 4, 3).encode();
        assert_eq!(
            describe_state(id),
            "Passenger is at: In taxi, wants to go to Blue. Taxi currently at (3, 1)"
        );
    }

    #[test]
    fn action_labels() {
        assert_eq!(describe_action(0).unwrap(), "Move south (down)");
        assert_eq!(describe_action(4).unwrap(), "Pick up passenger");
        assert_eq!(describe_action(5).unwrap(), "Drop off passenger");
        assert!(matches!(describe_action(6), Err(GymError::InvalidAction(_))));
        assert!(matches!(describe_action(-1), Err(GymError::InvalidAction(_))));
    }

    #[test]
    fn destination_never_in_taxi() {
        assert!(TaxiState::all().all(|s| s.destination_location().is_some()));
        assert_eq!(PassengerLocation::try_from(4).unwrap(), PassengerLocation::InTaxi);
        assert!(Location::try_from(4).is_err());
    }
}
