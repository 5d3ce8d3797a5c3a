use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitType {
    Tram,
    Metro,
    #[default]
    Rail,
    Bus,
    Ferry,
    CableCar,
    Gondola,
    Funicular,
}

/// A scheduled departure of a trip on a transit line edge.
#[derive(Clone, Debug, Default)]
pub struct TransitDeparture {
    pub line_id: u32,
    pub trip_id: u32,
    pub block_id: u32,
    /// Index into the tile's transit route table.
    pub route_index: u32,
    /// Index into the tile's transit schedule table.
    pub schedule_index: u32,
    /// Departure time in seconds from local midnight.
    pub departure_time: u32,
    /// Travel seconds to the next stop.
    pub elapsed_time: u32,
    pub headsign: String,
}

#[derive(Clone, Debug, Default)]
pub struct TransitRoute {
    pub route_type: TransitType,
    pub one_stop_id: String,
    pub short_name: String,
    pub long_name: String,
    pub color: u32,
    pub text_color: u32,
    pub description: String,
    pub operator_one_stop_id: String,
    pub operator_name: String,
    pub operator_url: String,
}

/// A transit stop, platform, station, or egress record.
#[derive(Clone, Debug, Default)]
pub struct TransitStop {
    pub one_stop_id: String,
    pub name: String,
}

/// Validity window of the tile's schedule, in days since the tile was built.
#[derive(Clone, Debug, Default)]
pub struct TransitSchedule {
    pub end_day: u32,
}
