use crate::gtfs::{GtfsCalendar, GtfsRoute, GtfsStop, GtfsStopTime, GtfsTransfer, GtfsTrip};

/// The six tables of a feed held in memory. Mostly useful for tests and for
/// callers that source rows from somewhere other than a feed archive.
#[derive(Default, Debug, Clone)]
pub struct GtfsData {
    pub stops: Vec<GtfsStop>,
    pub routes: Vec<GtfsRoute>,
    pub trips: Vec<GtfsTrip>,
    pub stop_times: Vec<GtfsStopTime>,
    pub calendar: Vec<GtfsCalendar>,
    pub transfers: Vec<GtfsTransfer>,
}
