use std::{collections::HashMap, sync::Arc};

use tracing::{debug, warn};

mod entities;
pub use entities::*;

use crate::{
    gtfs::{self, Gtfs},
    shared::time::Time,
};

type IdToIndex = HashMap<Arc<str>, usize>;

/// Immutable, normalised view of the six GTFS tables the planner consumes.
///
/// String ids are interned once; all cross-references are u32 indices into
/// the contiguous tables. The feed never changes after
/// [`with_gtfs`](Feed::with_gtfs) and all tables sit behind `Arc`, so clones
/// are cheap and instances can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct Feed {
    pub(crate) stops: Arc<[Stop]>,
    pub(crate) routes: Arc<[Route]>,
    pub(crate) trips: Arc<[Trip]>,
    pub(crate) stop_times: Arc<[StopTime]>,
    pub(crate) services: Arc<[Service]>,
    pub(crate) transfers: Arc<[Transfer]>,

    stop_lookup: Arc<IdToIndex>,
    route_lookup: Arc<IdToIndex>,
    trip_lookup: Arc<IdToIndex>,
    service_lookup: Arc<IdToIndex>,
}

impl Feed {
    pub fn new() -> Self {
        Default::default()
    }

    /// Streams a feed's tables into the normalised form. Depending on the
    /// size of the feed this can be a long blocking function.
    ///
    /// Rows referencing unknown ids and stop-times with unparseable times
    /// are dropped with a warning rather than failing the whole load.
    pub fn with_gtfs(mut self, mut gtfs: Gtfs) -> Result<Self, gtfs::Error> {
        let mut stop_lookup: IdToIndex = HashMap::new();
        let mut stops: Vec<Stop> = Vec::new();
        gtfs.stream_stops(|(_, stop)| {
            let mut value: Stop = stop.into();
            value.index = stops.len() as u32;
            stop_lookup.insert(value.id.clone(), stops.len());
            stops.push(value);
        })?;
        debug!(count = stops.len(), "loaded stops");

        let mut route_lookup: IdToIndex = HashMap::new();
        let mut routes: Vec<Route> = Vec::new();
        gtfs.stream_routes(|(_, route)| {
            let mut value: Route = route.into();
            value.index = routes.len() as u32;
            route_lookup.insert(value.id.clone(), routes.len());
            routes.push(value);
        })?;
        debug!(count = routes.len(), "loaded routes");

        let mut service_lookup: IdToIndex = HashMap::new();
        let mut services: Vec<Service> = Vec::new();
        gtfs.stream_calendar(|(_, row)| {
            let mut value: Service = row.into();
            value.index = services.len() as u32;
            service_lookup.insert(value.id.clone(), services.len());
            services.push(value);
        })?;
        debug!(count = services.len(), "loaded calendar entries");

        let mut trip_lookup: IdToIndex = HashMap::new();
        let mut trips: Vec<Trip> = Vec::new();
        gtfs.stream_trips(|(_, trip)| {
            let Some(route_idx) = route_lookup.get(trip.route_id.as_str()) else {
                warn!(trip = %trip.trip_id, route = %trip.route_id, "trip references unknown route");
                return;
            };
            let Some(service_idx) = service_lookup.get(trip.service_id.as_str()) else {
                warn!(trip = %trip.trip_id, service = %trip.service_id, "trip references unknown service");
                return;
            };
            let value = Trip {
                index: trips.len() as u32,
                id: trip.trip_id.into(),
                route_idx: *route_idx as u32,
                service_idx: *service_idx as u32,
                headsign: trip.trip_headsign.map(|val| val.into()),
                stop_times: Default::default(),
            };
            trip_lookup.insert(value.id.clone(), trips.len());
            trips.push(value);
        })?;
        debug!(count = trips.len(), "loaded trips");

        // Bucket stop-times per trip, then flatten in trip order so each
        // trip owns one contiguous, sequence-sorted slice.
        let mut buckets: Vec<Vec<StopTime>> = vec![Vec::new(); trips.len()];
        gtfs.stream_stop_times(|(_, row)| {
            let Some(trip_idx) = trip_lookup.get(row.trip_id.as_str()) else {
                warn!(trip = %row.trip_id, "stop time references unknown trip");
                return;
            };
            let Some(stop_idx) = stop_lookup.get(row.stop_id.as_str()) else {
                warn!(stop = %row.stop_id, "stop time references unknown stop");
                return;
            };
            let (Some(arrival_time), Some(departure_time)) = (
                Time::from_hms(&row.arrival_time),
                Time::from_hms(&row.departure_time),
            ) else {
                warn!(trip = %row.trip_id, sequence = row.stop_sequence, "stop time has malformed times");
                return;
            };
            buckets[*trip_idx].push(StopTime {
                trip_idx: *trip_idx as u32,
                stop_idx: *stop_idx as u32,
                sequence: row.stop_sequence,
                arrival_time,
                departure_time,
            });
        })?;
        let mut stop_times: Vec<StopTime> = Vec::with_capacity(buckets.iter().map(Vec::len).sum());
        for (trip_idx, mut bucket) in buckets.into_iter().enumerate() {
            bucket.sort_by_key(|st| st.sequence);
            trips[trip_idx].stop_times = StopTimeSlice {
                start_idx: stop_times.len() as u32,
                count: bucket.len() as u32,
            };
            stop_times.extend(bucket);
        }
        debug!(count = stop_times.len(), "loaded stop times");

        let mut transfers: Vec<Transfer> = Vec::new();
        gtfs.stream_transfers(|(_, row)| {
            let (Some(from_idx), Some(to_idx)) = (
                stop_lookup.get(row.from_stop_id.as_str()),
                stop_lookup.get(row.to_stop_id.as_str()),
            ) else {
                warn!(from = %row.from_stop_id, to = %row.to_stop_id, "transfer references unknown stop");
                return;
            };
            transfers.push(Transfer::from_gtfs(row, *from_idx as u32, *to_idx as u32));
        })?;
        debug!(count = transfers.len(), "loaded transfers");

        self.stops = stops.into();
        self.routes = routes.into();
        self.trips = trips.into();
        self.stop_times = stop_times.into();
        self.services = services.into();
        self.transfers = transfers.into();
        self.stop_lookup = stop_lookup.into();
        self.route_lookup = route_lookup.into();
        self.trip_lookup = trip_lookup.into();
        self.service_lookup = service_lookup.into();
        Ok(self)
    }

    /// Get a stop with the given id.
    /// If no stop is found with the given id None is returned.
    pub fn stop_by_id(&self, id: &str) -> Option<&Stop> {
        let stop_index = self.stop_lookup.get(id)?;
        Some(&self.stops[*stop_index])
    }

    /// Gets a route with the given id.
    pub fn route_by_id(&self, id: &str) -> Option<&Route> {
        let route_index = self.route_lookup.get(id)?;
        Some(&self.routes[*route_index])
    }

    /// Gets a trip with the given id.
    pub fn trip_by_id(&self, id: &str) -> Option<&Trip> {
        let trip_index = self.trip_lookup.get(id)?;
        Some(&self.trips[*trip_index])
    }

    /// Gets a calendar entry with the given service id.
    pub fn service_by_id(&self, id: &str) -> Option<&Service> {
        let service_index = self.service_lookup.get(id)?;
        Some(&self.services[*service_index])
    }

    pub fn stop(&self, index: u32) -> &Stop {
        &self.stops[index as usize]
    }

    pub fn route(&self, index: u32) -> &Route {
        &self.routes[index as usize]
    }

    pub fn trip(&self, index: u32) -> &Trip {
        &self.trips[index as usize]
    }

    pub fn service(&self, index: u32) -> &Service {
        &self.services[index as usize]
    }

    /// The sequence-ordered stop times of a trip.
    pub fn stop_times_of(&self, trip_idx: u32) -> &[StopTime] {
        let slice = self.trips[trip_idx as usize].stop_times;
        let start = slice.start_idx as usize;
        &self.stop_times[start..start + slice.count as usize]
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }
}
