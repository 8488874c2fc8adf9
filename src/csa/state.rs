use crate::shared::time::{Duration, Time};

/// How a stop's best arrival was achieved.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Back {
    /// Rode `trip`, having boarded it at `boarded_at`.
    Ride { trip: u32, boarded_at: u32 },
    /// Walked from `from_stop` via a minimum-time transfer.
    Footpath { from_stop: u32, duration: Duration },
}

/// Per-query scratch state for one connection scan.
///
/// Sized to the timetable's stop and trip counts. Queries may reuse one
/// instance sequentially by calling [`reset`](ScanState::reset) in between;
/// sharing across concurrent queries is not supported, each query owns its
/// state.
pub struct ScanState {
    /// Earliest known arrival time per stop.
    pub(crate) tau: Vec<Time>,
    /// Back-pointer per stop describing how `tau` was achieved.
    pub(crate) back: Vec<Option<Back>>,
    /// Transfers used along the best known path per stop.
    pub(crate) n_transfers: Vec<u32>,
    /// Whether a trip has been boarded earlier in the scan.
    pub(crate) trip_reachable: Vec<bool>,
    /// Transfer count the trip was boarded with.
    pub(crate) trip_transfers: Vec<u32>,
    /// Stop where the trip was boarded.
    pub(crate) trip_boarded_at: Vec<u32>,
    /// Membership masks for the query's start and end sets.
    pub(crate) is_start: Vec<bool>,
    pub(crate) is_end: Vec<bool>,
}

impl ScanState {
    pub fn new(stop_count: usize, trip_count: usize) -> Self {
        Self {
            tau: vec![Time::MAX; stop_count],
            back: vec![None; stop_count],
            n_transfers: vec![0; stop_count],
            trip_reachable: vec![false; trip_count],
            trip_transfers: vec![0; trip_count],
            trip_boarded_at: vec![u32::MAX; trip_count],
            is_start: vec![false; stop_count],
            is_end: vec![false; stop_count],
        }
    }

    pub fn reset(&mut self) {
        self.tau.fill(Time::MAX);
        self.back.fill(None);
        self.n_transfers.fill(0);
        self.trip_reachable.fill(false);
        self.trip_transfers.fill(0);
        self.trip_boarded_at.fill(u32::MAX);
        self.is_start.fill(false);
        self.is_end.fill(false);
    }
}
