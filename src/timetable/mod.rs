use std::{collections::HashMap, sync::Arc};

use thiserror::Error;
use tracing::debug;

mod day;
mod filter;
mod transfers;

pub use day::*;
pub use filter::*;
pub use transfers::*;

use crate::{feed::Feed, shared::time::Time};

#[derive(Error, Debug)]
pub enum Error {
    #[error("day {0:?} does not name a weekday")]
    UnknownDay(String),
    #[error("day {0:?} matches more than one weekday")]
    AmbiguousDay(String),
    #[error("route pattern {0:?} leaves no routes")]
    NoRoutesMatch(String),
    #[error("the pattern \"!\" would exclude every route")]
    SillyPattern,
    #[error("invalid route pattern: {0}")]
    BadPattern(#[from] regex::Error),
    #[error("no services run on {0}")]
    NoServicesOnDay(&'static str),
}

/// A single vehicle hop between two adjacent stops on one trip. Stop and
/// trip fields are compact indices into the owning timetable's id maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub departure_stop: u32,
    pub arrival_stop: u32,
    pub departure_time: Time,
    pub arrival_time: Time,
    pub trip: u32,
}

/// A feed projected onto one service day (and optional route filter):
/// a departure-time-sorted connection array, the transfer index, and the
/// maps translating compact indices back to GTFS ids.
///
/// Immutable once compiled. All tables sit behind `Arc`, so a timetable is
/// cheap to clone and safe to share between concurrently running queries;
/// every query owns its own scratch state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timetable {
    day: Day,
    connections: Arc<[Connection]>,
    transfers: TransferIndex,
    stop_ids: Arc<[Arc<str>]>,
    trip_ids: Arc<[Arc<str>]>,
    stop_lookup: Arc<HashMap<Arc<str>, u32>>,
    /// Compact stop index -> index into the feed's stop table.
    feed_stops: Arc<[u32]>,
    /// Compact trip index -> index into the feed's trip table.
    feed_trips: Arc<[u32]>,
    /// Connection indices grouped per compact trip, in ride order (CSR).
    trip_conns: Arc<[u32]>,
    trip_conn_offsets: Arc<[u32]>,
}

impl Timetable {
    /// Projects the feed onto the given day, keeping only trips whose route
    /// passes the filter and whose service runs on that weekday.
    ///
    /// Compilation is deterministic: equal inputs produce structurally
    /// equal timetables.
    pub fn compile(feed: &Feed, day: Day, filter: Option<&RouteFilter>) -> Result<Self, Error> {
        let route_ok: Vec<bool> = feed
            .routes()
            .iter()
            .map(|route| match filter {
                Some(filter) => filter.is_match(route.short_name.as_deref().unwrap_or("")),
                None => true,
            })
            .collect();
        if let Some(filter) = filter
            && !route_ok.iter().any(|ok| *ok)
        {
            return Err(Error::NoRoutesMatch(filter.pattern().to_string()));
        }

        // Surviving trips keep their feed order; stops are numbered in
        // order of first reference by a surviving stop time.
        let mut feed_trips: Vec<u32> = Vec::new();
        let mut trip_ids: Vec<Arc<str>> = Vec::new();
        let mut stop_map: Vec<u32> = vec![u32::MAX; feed.stops().len()];
        let mut feed_stops: Vec<u32> = Vec::new();
        let mut stop_ids: Vec<Arc<str>> = Vec::new();
        let mut connections: Vec<Connection> = Vec::new();

        for trip in feed.trips() {
            if !route_ok[trip.route_idx as usize] {
                continue;
            }
            if !feed.service(trip.service_idx).runs_on(day.index()) {
                continue;
            }
            let trip_index = feed_trips.len() as u32;
            feed_trips.push(trip.index);
            trip_ids.push(trip.id.clone());

            let stop_times = feed.stop_times_of(trip.index);
            for stop_time in stop_times {
                let slot = &mut stop_map[stop_time.stop_idx as usize];
                if *slot == u32::MAX {
                    *slot = feed_stops.len() as u32;
                    feed_stops.push(stop_time.stop_idx);
                    stop_ids.push(feed.stop(stop_time.stop_idx).id.clone());
                }
            }
            for pair in stop_times.windows(2) {
                connections.push(Connection {
                    departure_stop: stop_map[pair[0].stop_idx as usize],
                    arrival_stop: stop_map[pair[1].stop_idx as usize],
                    departure_time: pair[0].departure_time,
                    arrival_time: pair[1].arrival_time,
                    trip: trip_index,
                });
            }
        }

        if connections.is_empty() {
            return Err(Error::NoServicesOnDay(day.name()));
        }

        // Stable sort keeps equal departure times in input order, which is
        // what makes scan tie-breaking deterministic.
        connections.sort_by_key(|c| c.departure_time);

        let trip_conn_offsets = {
            let mut counts = vec![0u32; feed_trips.len() + 1];
            for connection in &connections {
                counts[connection.trip as usize + 1] += 1;
            }
            for i in 1..counts.len() {
                counts[i] += counts[i - 1];
            }
            counts
        };
        let mut trip_conns = vec![0u32; connections.len()];
        {
            let mut cursors = trip_conn_offsets.clone();
            // Within one trip departure times strictly increase, so the
            // sorted order already is the ride order.
            for (index, connection) in connections.iter().enumerate() {
                let cursor = &mut cursors[connection.trip as usize];
                trip_conns[*cursor as usize] = index as u32;
                *cursor += 1;
            }
        }

        let compiled_transfers: Vec<CompiledTransfer> = feed
            .transfers()
            .iter()
            .filter(|t| t.transfer_type == 2)
            .filter_map(|t| {
                let from_stop = stop_map[t.from_stop_idx as usize];
                let to_stop = stop_map[t.to_stop_idx as usize];
                if from_stop == u32::MAX || to_stop == u32::MAX {
                    return None;
                }
                Some(CompiledTransfer {
                    from_stop,
                    to_stop,
                    min_transfer_time: t.min_transfer_time.unwrap_or_default(),
                })
            })
            .collect();
        let transfers = TransferIndex::build(compiled_transfers, feed_stops.len());

        let stop_lookup: HashMap<Arc<str>, u32> = stop_ids
            .iter()
            .enumerate()
            .map(|(index, id)| (id.clone(), index as u32))
            .collect();

        debug!(
            day = day.name(),
            connections = connections.len(),
            stops = feed_stops.len(),
            trips = feed_trips.len(),
            transfers = transfers.len(),
            "compiled timetable"
        );

        Ok(Self {
            day,
            connections: connections.into(),
            transfers,
            stop_ids: stop_ids.into(),
            trip_ids: trip_ids.into(),
            stop_lookup: Arc::new(stop_lookup),
            feed_stops: feed_stops.into(),
            feed_trips: feed_trips.into(),
            trip_conns: trip_conns.into(),
            trip_conn_offsets: trip_conn_offsets.into(),
        })
    }

    pub fn day(&self) -> Day {
        self.day
    }

    /// All connections, sorted by departure time ascending.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn transfers(&self) -> &TransferIndex {
        &self.transfers
    }

    pub fn stop_count(&self) -> usize {
        self.stop_ids.len()
    }

    pub fn trip_count(&self) -> usize {
        self.trip_ids.len()
    }

    /// GTFS id of a compact stop index.
    pub fn stop_id(&self, stop: u32) -> &Arc<str> {
        &self.stop_ids[stop as usize]
    }

    /// GTFS id of a compact trip index.
    pub fn trip_id(&self, trip: u32) -> &Arc<str> {
        &self.trip_ids[trip as usize]
    }

    pub fn stop_ids(&self) -> &[Arc<str>] {
        &self.stop_ids
    }

    pub fn trip_ids(&self) -> &[Arc<str>] {
        &self.trip_ids
    }

    /// Compact index of a GTFS stop id, if the stop made it into this
    /// timetable.
    pub fn stop_index(&self, id: &str) -> Option<u32> {
        self.stop_lookup.get(id).copied()
    }

    pub(crate) fn feed_stop(&self, stop: u32) -> u32 {
        self.feed_stops[stop as usize]
    }

    pub(crate) fn feed_trip(&self, trip: u32) -> u32 {
        self.feed_trips[trip as usize]
    }

    pub(crate) fn trip_conns(&self) -> &[u32] {
        &self.trip_conns
    }

    pub(crate) fn trip_conn_offsets(&self) -> &[u32] {
        &self.trip_conn_offsets
    }
}
