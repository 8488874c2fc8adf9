mod reverse;
mod state;

pub(crate) use reverse::*;
pub use state::*;

use crate::{
    shared::time::{Duration, Time},
    timetable::{Connection, Timetable, TransferIndex},
};

/// Borrowed view of a connection array and its transfer index, so the scan
/// runs unchanged over a compiled timetable or a time-reversed derivation
/// of one.
pub(crate) struct ScanView<'a> {
    pub connections: &'a [Connection],
    pub transfers: &'a TransferIndex,
    pub trip_conns: &'a [u32],
    pub trip_conn_offsets: &'a [u32],
}

impl ScanView<'_> {
    /// Connection indices of one trip, in ride order.
    fn trip_connections(&self, trip: u32) -> &[u32] {
        let start = self.trip_conn_offsets[trip as usize] as usize;
        let end = self.trip_conn_offsets[trip as usize + 1] as usize;
        &self.trip_conns[start..end]
    }
}

impl Timetable {
    pub(crate) fn scan_view(&self) -> ScanView<'_> {
        ScanView {
            connections: self.connections(),
            transfers: self.transfers(),
            trip_conns: self.trip_conns(),
            trip_conn_offsets: self.trip_conn_offsets(),
        }
    }
}

/// The best end stop found by a scan.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Arrival {
    pub stop: u32,
    pub time: Time,
}

/// One element of an unwound route: a single connection ridden, or a
/// footpath between two stops.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Step {
    /// Index into the scanned connection array.
    Ride(u32),
    Footpath {
        from_stop: u32,
        to_stop: u32,
        duration: Duration,
    },
}

/// Earliest-arrival connection scan.
///
/// Walks the departure-time-sorted connections once, relaxing arrival times
/// and footpath transfers, and stops as soon as no remaining connection can
/// improve any end stop. When two connections reach a stop at the same
/// time the first one scanned wins, which the stable compile order makes
/// deterministic.
pub(crate) fn scan(
    view: &ScanView,
    state: &mut ScanState,
    sources: &[u32],
    targets: &[u32],
    start_time: Time,
    max_transfers: Option<u32>,
) -> Option<Arrival> {
    let max_transfers = max_transfers.unwrap_or(u32::MAX);

    for &stop in sources {
        state.tau[stop as usize] = start_time;
        state.is_start[stop as usize] = true;
    }
    let mut best_time = Time::MAX;
    let mut best_stop = None;
    for &stop in targets {
        state.is_end[stop as usize] = true;
        // A start stop that is also an end stop is already reached.
        if state.tau[stop as usize] < best_time {
            best_time = state.tau[stop as usize];
            best_stop = Some(stop);
        }
    }

    let first = view
        .connections
        .partition_point(|c| c.departure_time < start_time);

    for connection in &view.connections[first..] {
        // Nothing departing later can still improve an end stop.
        if connection.departure_time > best_time {
            break;
        }

        let trip = connection.trip as usize;
        let departure = connection.departure_stop as usize;

        let count = if state.trip_reachable[trip] {
            state.trip_transfers[trip]
        } else if state.tau[departure] <= connection.departure_time {
            // Boarding a fresh trip. It costs a transfer unless we board at
            // a start stop or step over from the same trip we arrived with.
            let continues = matches!(
                state.back[departure],
                Some(Back::Ride { trip: t, .. }) if t == connection.trip
            );
            let delta = if state.is_start[departure] || continues {
                0
            } else {
                1
            };
            let count = state.n_transfers[departure] + delta;
            if count > max_transfers {
                continue;
            }
            state.trip_reachable[trip] = true;
            state.trip_transfers[trip] = count;
            state.trip_boarded_at[trip] = connection.departure_stop;
            count
        } else {
            continue;
        };

        let arrival = connection.arrival_stop as usize;
        if connection.arrival_time < state.tau[arrival] {
            state.tau[arrival] = connection.arrival_time;
            state.back[arrival] = Some(Back::Ride {
                trip: connection.trip,
                boarded_at: state.trip_boarded_at[trip],
            });
            state.n_transfers[arrival] = count;
            if state.is_end[arrival] && connection.arrival_time < best_time {
                best_time = connection.arrival_time;
                best_stop = Some(connection.arrival_stop);
            }

            for transfer in view.transfers.from_stop(connection.arrival_stop) {
                let reached = connection.arrival_time + transfer.min_transfer_time;
                let to = transfer.to_stop as usize;
                if reached < state.tau[to] {
                    state.tau[to] = reached;
                    state.back[to] = Some(Back::Footpath {
                        from_stop: connection.arrival_stop,
                        duration: transfer.min_transfer_time,
                    });
                    state.n_transfers[to] = count;
                    if state.is_end[to] && reached < best_time {
                        best_time = reached;
                        best_stop = Some(transfer.to_stop);
                    }
                }
            }
        }
    }

    best_stop.map(|stop| Arrival {
        stop,
        time: best_time,
    })
}

/// Walks the back-pointers from `end_stop` to a start stop, producing the
/// ridden connections and footpaths in travel order.
///
/// Trips that revisit a stop (circular routes) are cut at the first
/// matching boarding position; the guard counter keeps a corrupt chain
/// from looping.
pub(crate) fn unwind(view: &ScanView, state: &ScanState, end_stop: u32) -> Vec<Step> {
    let mut steps: Vec<Step> = Vec::new();
    let mut cursor = end_stop;
    let mut guard = view.connections.len() + state.back.len() + 1;

    while let Some(back) = state.back[cursor as usize] {
        if guard == 0 {
            break;
        }
        guard -= 1;

        match back {
            Back::Footpath {
                from_stop,
                duration,
            } => {
                steps.push(Step::Footpath {
                    from_stop,
                    to_stop: cursor,
                    duration,
                });
                cursor = from_stop;
            }
            Back::Ride { trip, boarded_at } => {
                let conns = view.trip_connections(trip);
                let board = conns.iter().position(|&ci| {
                    view.connections[ci as usize].departure_stop == boarded_at
                });
                let alight = conns
                    .iter()
                    .position(|&ci| view.connections[ci as usize].arrival_stop == cursor);
                let (Some(board), Some(alight)) = (board, alight) else {
                    break;
                };
                if alight < board {
                    break;
                }
                for &ci in conns[board..=alight].iter().rev() {
                    steps.push(Step::Ride(ci));
                }
                cursor = boarded_at;
            }
        }
    }

    steps.reverse();
    steps
}
