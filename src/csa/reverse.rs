use crate::{
    csa::{ScanState, ScanView, Step, scan, unwind},
    shared::time::Time,
    timetable::{Connection, Timetable, TransferIndex},
};

/// Time-reversed derivation of a compiled timetable, pivoted around a fixed
/// arrival moment.
///
/// Departure and arrival fields swap roles and every timestamp `t` becomes
/// `pivot - t`; connections that would map to a negative departure are
/// dropped. The view is derived, never aliased: building one leaves the
/// forward timetable untouched.
pub(crate) struct ReversedTimetable {
    connections: Vec<Connection>,
    /// Reversed connection index -> index in the forward timetable.
    source: Vec<u32>,
    transfers: TransferIndex,
    trip_conns: Vec<u32>,
    trip_conn_offsets: Vec<u32>,
}

impl ReversedTimetable {
    pub fn build(timetable: &Timetable, pivot: Time) -> Self {
        let mut reversed: Vec<(Connection, u32)> = timetable
            .connections()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.arrival_time <= pivot)
            .map(|(index, c)| {
                let connection = Connection {
                    departure_stop: c.arrival_stop,
                    arrival_stop: c.departure_stop,
                    departure_time: Time::from_seconds(
                        pivot.as_seconds() - c.arrival_time.as_seconds(),
                    ),
                    arrival_time: Time::from_seconds(
                        pivot.as_seconds() - c.departure_time.as_seconds(),
                    ),
                    trip: c.trip,
                };
                (connection, index as u32)
            })
            .collect();
        reversed.sort_by_key(|(c, _)| c.departure_time);

        let (connections, source): (Vec<Connection>, Vec<u32>) = reversed.into_iter().unzip();

        let trip_count = timetable.trip_count();
        let mut trip_conn_offsets = vec![0u32; trip_count + 1];
        for connection in &connections {
            trip_conn_offsets[connection.trip as usize + 1] += 1;
        }
        for i in 1..trip_conn_offsets.len() {
            trip_conn_offsets[i] += trip_conn_offsets[i - 1];
        }
        let mut trip_conns = vec![0u32; connections.len()];
        let mut cursors = trip_conn_offsets.clone();
        for (index, connection) in connections.iter().enumerate() {
            let cursor = &mut cursors[connection.trip as usize];
            trip_conns[*cursor as usize] = index as u32;
            *cursor += 1;
        }

        Self {
            connections,
            source,
            transfers: timetable.transfers().transposed(),
            trip_conns,
            trip_conn_offsets,
        }
    }

    fn scan_view(&self) -> ScanView<'_> {
        ScanView {
            connections: &self.connections,
            transfers: &self.transfers,
            trip_conns: &self.trip_conns,
            trip_conn_offsets: &self.trip_conn_offsets,
        }
    }
}

/// Reruns the scan over the reversed timetable to push the departure as
/// late as the fixed arrival time allows.
///
/// Returns the refined route in forward travel order, expressed in forward
/// connection indices. `None` when the reverse scan finds nothing, in which
/// case the caller keeps the forward result.
pub(crate) fn refine(
    timetable: &Timetable,
    state: &mut ScanState,
    sources: &[u32],
    targets: &[u32],
    arrival: Time,
    max_transfers: Option<u32>,
) -> Option<Vec<Step>> {
    let reversed = ReversedTimetable::build(timetable, arrival);
    let view = reversed.scan_view();

    state.reset();
    let best = scan(
        &view,
        state,
        targets,
        sources,
        Time::from_seconds(0),
        max_transfers,
    )?;

    let mut steps: Vec<Step> = unwind(&view, state, best.stop)
        .into_iter()
        .map(|step| match step {
            Step::Ride(index) => Step::Ride(reversed.source[index as usize]),
            Step::Footpath {
                from_stop,
                to_stop,
                duration,
            } => Step::Footpath {
                from_stop: to_stop,
                to_stop: from_stop,
                duration,
            },
        })
        .collect();
    steps.reverse();

    if steps.is_empty() { None } else { Some(steps) }
}
