use std::sync::Arc;

use chrono::NaiveDate;

use crate::{
    gtfs::models::{GtfsCalendar, GtfsRoute, GtfsStop, GtfsTransfer},
    shared::{
        geo::Coordinate,
        time::{Duration, Time},
    },
};

/// A physical point where passengers can board or alight from a vehicle.
#[derive(Debug, Default, Clone)]
pub struct Stop {
    /// The global internal index used for O(1) array lookups in the feed.
    pub index: u32,
    /// Unique external identifier for the stop.
    pub id: Arc<str>,
    /// Human-readable name. Several stops may share one name, e.g. the
    /// platforms of a station.
    pub name: Arc<str>,
    /// Normalized name used for case-insensitive matching.
    pub normalized_name: Arc<str>,
    /// Missing when the feed ships no coordinates for this stop; such stops
    /// are excluded from nearest-stop lookups.
    pub coordinate: Option<Coordinate>,
}

impl From<GtfsStop> for Stop {
    fn from(value: GtfsStop) -> Self {
        let coordinate = if let Some(lat) = value.stop_lat
            && let Some(lon) = value.stop_lon
        {
            Some(Coordinate {
                latitude: lat,
                longitude: lon,
            })
        } else {
            None
        };

        Self {
            index: u32::MAX,
            id: value.stop_id.into(),
            name: value.stop_name.clone().into(),
            normalized_name: value.stop_name.to_lowercase().into(),
            coordinate,
        }
    }
}

/// A grouping of trips displayed to riders under a single name.
#[derive(Debug, Default, Clone)]
pub struct Route {
    pub index: u32,
    pub id: Arc<str>,
    pub short_name: Option<Arc<str>>,
    pub long_name: Option<Arc<str>>,
    /// Classification of the vehicle (0: Tram, 1: Subway, 3: Bus, etc.).
    pub route_type: Option<i32>,
}

impl From<GtfsRoute> for Route {
    fn from(value: GtfsRoute) -> Self {
        Self {
            index: u32::MAX,
            id: value.route_id.into(),
            short_name: value.route_short_name.map(|val| val.into()),
            long_name: value.route_long_name.map(|val| val.into()),
            route_type: value.route_type,
        }
    }
}

/// A specific journey taken by a vehicle through a sequence of stops.
#[derive(Debug, Default, Clone)]
pub struct Trip {
    pub index: u32,
    pub id: Arc<str>,
    /// Pointer to the parent [`Route`].
    pub route_idx: u32,
    /// Pointer to the [`Service`] governing which days this trip runs.
    pub service_idx: u32,
    pub headsign: Option<Arc<str>>,
    /// Pointer to the full range of stop times for this trip.
    pub stop_times: StopTimeSlice,
}

/// Metadata describing a contiguous range within the global `stop_times`
/// array.
#[derive(Default, Debug, Clone, Copy)]
pub struct StopTimeSlice {
    /// The index where the trip's stop-times begin.
    pub start_idx: u32,
    /// The total number of stops in the trip.
    pub count: u32,
}

/// Individual event within a trip where a vehicle calls at a stop.
#[derive(Debug, Default, Clone)]
pub struct StopTime {
    /// Internal index of the parent [`Trip`].
    pub trip_idx: u32,
    /// Internal index of the associated [`Stop`].
    pub stop_idx: u32,
    /// The order of this stop within the trip.
    pub sequence: u32,
    /// Scheduled arrival time (seconds since midnight).
    pub arrival_time: Time,
    /// Scheduled departure time (seconds since midnight).
    pub departure_time: Time,
}

/// One calendar entry: the weekday pattern and date range a set of trips
/// runs under.
#[derive(Debug, Default, Clone)]
pub struct Service {
    pub index: u32,
    pub id: Arc<str>,
    /// Slot 0 is Sunday, slot 6 is Saturday.
    pub weekdays: [bool; 7],
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Service {
    pub fn runs_on(&self, weekday: usize) -> bool {
        self.weekdays[weekday]
    }
}

impl From<GtfsCalendar> for Service {
    fn from(value: GtfsCalendar) -> Self {
        let weekdays = [
            value.sunday != 0,
            value.monday != 0,
            value.tuesday != 0,
            value.wednesday != 0,
            value.thursday != 0,
            value.friday != 0,
            value.saturday != 0,
        ];
        Self {
            index: u32::MAX,
            id: value.service_id.into(),
            weekdays,
            start_date: NaiveDate::parse_from_str(&value.start_date, "%Y%m%d").ok(),
            end_date: NaiveDate::parse_from_str(&value.end_date, "%Y%m%d").ok(),
        }
    }
}

/// A pedestrian connection between two stops.
#[derive(Debug, Default, Clone)]
pub struct Transfer {
    pub from_stop_idx: u32,
    pub to_stop_idx: u32,
    /// Raw GTFS `transfer_type`; only minimum-time transfers (type 2) reach
    /// a compiled timetable.
    pub transfer_type: u8,
    /// The minimum time required to complete this transfer.
    pub min_transfer_time: Option<Duration>,
}

impl Transfer {
    pub fn from_gtfs(value: GtfsTransfer, from_stop_idx: u32, to_stop_idx: u32) -> Self {
        Self {
            from_stop_idx,
            to_stop_idx,
            transfer_type: value.transfer_type.unwrap_or(0),
            min_transfer_time: value.min_transfer_time.map(Duration::from_seconds),
        }
    }
}
