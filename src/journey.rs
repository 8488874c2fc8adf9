use std::sync::Arc;

use serde::Serialize;

use crate::{
    csa::Step,
    feed::{Feed, Route, Stop, Trip},
    shared::time::Time,
    timetable::Timetable,
};

const TRANSFER_TRIP_NAME: &str = "(transfer)";

/// One stop event of a journey: a vehicle calling at a stop, or the end of
/// a footpath transfer.
///
/// Transfer legs carry no route or trip identity, name the destination
/// stop, and have no departure time. Id fields are only populated when the
/// query asked for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Leg {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_id: Option<Arc<str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_name: Option<Arc<str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trip_id: Option<Arc<str>>,
    pub trip_name: Arc<str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_id: Option<Arc<str>>,
    pub stop_name: Arc<str>,
    pub arrival_time: Time,
    pub departure_time: Option<Time>,
}

impl Leg {
    pub fn is_transfer(&self) -> bool {
        &*self.trip_name == TRANSFER_TRIP_NAME
    }
}

/// A stop-by-stop description of one computed journey, ordered by
/// departure time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Journey {
    legs: Vec<Leg>,
}

impl Journey {
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Departure from the first stop of the journey.
    pub fn departure_time(&self) -> Option<Time> {
        let first = self.legs.first()?;
        Some(first.departure_time.unwrap_or(first.arrival_time))
    }

    /// Arrival at the final stop of the journey.
    pub fn arrival_time(&self) -> Option<Time> {
        self.legs.last().map(|leg| leg.arrival_time)
    }
}

/// Unwinds a raw route into presentation legs.
///
/// Adjacent connections of one trip collapse into a run of per-stop rows
/// from the boarding stop to the alighting stop; footpaths become
/// "(transfer)" rows. A footpath at the head of the route is rendered at
/// its origin, the requested terminal, timed back from the first boardable
/// departure.
pub(crate) fn reconstruct(
    steps: &[Step],
    timetable: &Timetable,
    feed: &Feed,
    include_ids: bool,
) -> Option<Journey> {
    if steps.is_empty() {
        return None;
    }

    let connections = timetable.connections();
    let mut legs: Vec<Leg> = Vec::new();
    let mut current_time: Option<Time> = None;

    let mut i = 0;
    while i < steps.len() {
        match steps[i] {
            Step::Footpath {
                from_stop,
                to_stop,
                duration,
            } => {
                if let Some(at) = current_time {
                    let arrival = at + duration;
                    legs.push(transfer_leg(timetable, feed, to_stop, arrival, include_ids));
                    current_time = Some(arrival);
                } else {
                    let next_departure = steps[i + 1..].iter().find_map(|step| match step {
                        Step::Ride(ci) => Some(connections[*ci as usize].departure_time),
                        _ => None,
                    })?;
                    let arrival = next_departure
                        .checked_sub(duration)
                        .unwrap_or(Time::from_seconds(0));
                    legs.push(transfer_leg(
                        timetable, feed, from_stop, arrival, include_ids,
                    ));
                }
                i += 1;
            }
            Step::Ride(first) => {
                let trip = connections[first as usize].trip;
                let mut run: Vec<u32> = Vec::new();
                while i < steps.len() {
                    let Step::Ride(ci) = steps[i] else { break };
                    if connections[ci as usize].trip != trip {
                        break;
                    }
                    run.push(ci);
                    i += 1;
                }

                let feed_trip = feed.trip(timetable.feed_trip(trip));
                let route = feed.route(feed_trip.route_idx);
                let stop_of = |stop: u32| feed.stop(timetable.feed_stop(stop));

                let head = connections[run[0] as usize];
                legs.push(ride_leg(
                    route,
                    feed_trip,
                    stop_of(head.departure_stop),
                    head.departure_time,
                    Some(head.departure_time),
                    include_ids,
                ));
                for pair in run.windows(2) {
                    let reached = connections[pair[0] as usize];
                    let onward = connections[pair[1] as usize];
                    legs.push(ride_leg(
                        route,
                        feed_trip,
                        stop_of(reached.arrival_stop),
                        reached.arrival_time,
                        Some(onward.departure_time),
                        include_ids,
                    ));
                }
                let tail = connections[run[run.len() - 1] as usize];
                legs.push(ride_leg(
                    route,
                    feed_trip,
                    stop_of(tail.arrival_stop),
                    tail.arrival_time,
                    Some(tail.arrival_time),
                    include_ids,
                ));
                current_time = Some(tail.arrival_time);
            }
        }
    }

    legs.sort_by_key(|leg| leg.departure_time.unwrap_or(leg.arrival_time));

    if legs.is_empty() {
        None
    } else {
        Some(Journey { legs })
    }
}

fn ride_leg(
    route: &Route,
    trip: &Trip,
    feed_stop: &Stop,
    arrival_time: Time,
    departure_time: Option<Time>,
    include_ids: bool,
) -> Leg {
    Leg {
        route_id: include_ids.then(|| route.id.clone()),
        route_name: Some(route.short_name.clone().unwrap_or_else(|| route.id.clone())),
        trip_id: include_ids.then(|| trip.id.clone()),
        trip_name: trip.headsign.clone().unwrap_or_else(|| trip.id.clone()),
        stop_id: include_ids.then(|| feed_stop.id.clone()),
        stop_name: feed_stop.name.clone(),
        arrival_time,
        departure_time,
    }
}

fn transfer_leg(
    timetable: &Timetable,
    feed: &Feed,
    stop: u32,
    arrival_time: Time,
    include_ids: bool,
) -> Leg {
    let feed_stop = feed.stop(timetable.feed_stop(stop));
    Leg {
        route_id: None,
        route_name: None,
        trip_id: None,
        trip_name: TRANSFER_TRIP_NAME.into(),
        stop_id: include_ids.then(|| feed_stop.id.clone()),
        stop_name: feed_stop.name.clone(),
        arrival_time,
        departure_time: None,
    }
}
