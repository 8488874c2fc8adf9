#![allow(dead_code)]

use avgang::{
    feed::Feed,
    gtfs::{Config, Gtfs, GtfsData},
    gtfs::models::{GtfsCalendar, GtfsRoute, GtfsStop, GtfsStopTime, GtfsTransfer, GtfsTrip},
    planner::Planner,
};

pub fn stop(id: &str, name: &str, lat: f64, lon: f64) -> GtfsStop {
    GtfsStop {
        stop_id: id.into(),
        stop_name: name.into(),
        stop_lat: Some(lat),
        stop_lon: Some(lon),
    }
}

pub fn route(id: &str, short_name: &str) -> GtfsRoute {
    GtfsRoute {
        route_id: id.into(),
        route_short_name: Some(short_name.into()),
        route_long_name: None,
        route_type: None,
    }
}

pub fn trip(route_id: &str, service_id: &str, id: &str, headsign: &str) -> GtfsTrip {
    GtfsTrip {
        route_id: route_id.into(),
        service_id: service_id.into(),
        trip_id: id.into(),
        trip_headsign: Some(headsign.into()),
    }
}

pub fn stop_time(trip_id: &str, sequence: u32, stop_id: &str, arrival: &str, departure: &str) -> GtfsStopTime {
    GtfsStopTime {
        trip_id: trip_id.into(),
        arrival_time: arrival.into(),
        departure_time: departure.into(),
        stop_id: stop_id.into(),
        stop_sequence: sequence,
    }
}

pub fn weekday_service(id: &str) -> GtfsCalendar {
    GtfsCalendar {
        service_id: id.into(),
        monday: 1,
        tuesday: 1,
        wednesday: 1,
        thursday: 1,
        friday: 1,
        saturday: 0,
        sunday: 0,
        start_date: "20240101".into(),
        end_date: "20341231".into(),
    }
}

pub fn saturday_service(id: &str) -> GtfsCalendar {
    GtfsCalendar {
        service_id: id.into(),
        monday: 0,
        tuesday: 0,
        wednesday: 0,
        thursday: 0,
        friday: 0,
        saturday: 1,
        sunday: 0,
        start_date: "20240101".into(),
        end_date: "20341231".into(),
    }
}

pub fn transfer(from: &str, to: &str, transfer_type: u8, min_transfer_time: u32) -> GtfsTransfer {
    GtfsTransfer {
        from_stop_id: from.into(),
        to_stop_id: to.into(),
        transfer_type: Some(transfer_type),
        min_transfer_time: Some(min_transfer_time),
    }
}

/// A small Berlin-flavoured network.
///
/// U4 runs Innsbrucker Platz -> Nollendorfplatz (11:30, 12:05, 12:08 on
/// weekdays, 12:05 on Saturdays), U2 continues Nollendorfplatz ->
/// Stadtmitte -> Alexanderplatz (dep 12:15), U8 runs Schonleinstr ->
/// Alexanderplatz (U8 platform, 12:10 -> 12:25), S5 runs Alexanderplatz ->
/// Berlin Hauptbahnhof (12:40 -> 12:52), U55 runs Hauptbahnhof ->
/// Brandenburger Tor (12:45 -> 12:50), S41 serves the second Innsbrucker
/// platform, and S9 serves Ostbahnhof early in the morning. Minimum-time
/// transfers connect the two Alexanderplatz platforms (180 s) and
/// Hauptbahnhof -> Ostbahnhof (240 s).
pub fn berlin_data() -> GtfsData {
    GtfsData {
        stops: vec![
            stop("S1a", "Innsbrucker Platz", 52.4783, 13.3433),
            stop("S1b", "Innsbrucker Platz", 52.4786, 13.3440),
            stop("N1", "Nollendorfplatz", 52.4996, 13.3542),
            stop("M1", "Stadtmitte", 52.5110, 13.3900),
            stop("A1", "Alexanderplatz", 52.5219, 13.4132),
            stop("A2", "Alexanderplatz", 52.5212, 13.4125),
            stop("SCH", "Schonleinstr", 52.4933, 13.4222),
            stop("H1", "Berlin Hauptbahnhof", 52.5251, 13.3694),
            stop("B1", "Brandenburger Tor", 52.5163, 13.3810),
            stop("O1", "Ostbahnhof", 52.5103, 13.4349),
            stop("G1", "Schoneberg", 52.4789, 13.3551),
        ],
        routes: vec![
            route("r-u4", "U4"),
            route("r-u2", "U2"),
            route("r-u8", "U8"),
            route("r-u55", "U55"),
            route("r-s5", "S5"),
            route("r-s9", "S9"),
            route("r-s41", "S41"),
        ],
        trips: vec![
            trip("r-u4", "wd", "t-u4-a", "Nollendorfplatz"),
            trip("r-u4", "wd", "t-u4-b", "Nollendorfplatz"),
            trip("r-u4", "wd", "t-u4-c", "Nollendorfplatz"),
            trip("r-u4", "sat", "t-u4-sat", "Nollendorfplatz"),
            trip("r-u2", "wd", "t-u2-a", "Pankow"),
            trip("r-u8", "wd", "t-u8-a", "Wittenau"),
            trip("r-u55", "wd", "t-u55-a", "Brandenburger Tor"),
            trip("r-s5", "wd", "t-s5-a", "Westkreuz"),
            trip("r-s9", "wd", "t-s9-a", "Spandau"),
            trip("r-s41", "wd", "t-s41-a", "Ringbahn"),
        ],
        stop_times: vec![
            stop_time("t-u4-a", 1, "S1a", "11:30:00", "11:30:00"),
            stop_time("t-u4-a", 2, "N1", "11:37:00", "11:37:00"),
            stop_time("t-u4-b", 1, "S1a", "12:05:00", "12:05:00"),
            stop_time("t-u4-b", 2, "N1", "12:12:00", "12:12:00"),
            stop_time("t-u4-c", 1, "S1a", "12:08:00", "12:08:00"),
            stop_time("t-u4-c", 2, "N1", "12:14:00", "12:14:00"),
            stop_time("t-u4-sat", 1, "S1a", "12:05:00", "12:05:00"),
            stop_time("t-u4-sat", 2, "N1", "12:12:00", "12:12:00"),
            stop_time("t-u2-a", 1, "N1", "12:14:00", "12:15:00"),
            stop_time("t-u2-a", 2, "M1", "12:22:00", "12:23:00"),
            stop_time("t-u2-a", 3, "A1", "12:30:00", "12:30:00"),
            stop_time("t-u8-a", 1, "SCH", "12:10:00", "12:10:00"),
            stop_time("t-u8-a", 2, "A2", "12:25:00", "12:25:00"),
            stop_time("t-u55-a", 1, "H1", "12:45:00", "12:45:00"),
            stop_time("t-u55-a", 2, "B1", "12:50:00", "12:50:00"),
            stop_time("t-s5-a", 1, "A1", "12:40:00", "12:40:00"),
            stop_time("t-s5-a", 2, "H1", "12:52:00", "12:52:00"),
            stop_time("t-s9-a", 1, "O1", "06:00:00", "06:00:00"),
            stop_time("t-s9-a", 2, "H1", "06:10:00", "06:10:00"),
            stop_time("t-s41-a", 1, "S1b", "11:50:00", "11:50:00"),
            stop_time("t-s41-a", 2, "G1", "11:58:00", "11:58:00"),
        ],
        calendar: vec![weekday_service("wd"), saturday_service("sat")],
        transfers: vec![
            transfer("A2", "A1", 2, 180),
            transfer("A1", "A2", 2, 180),
            transfer("H1", "O1", 2, 240),
            // Honoured transfer types are minimum-time only; these two rows
            // must be dropped silently.
            transfer("A1", "A2", 0, 60),
            transfer("N1", "M1", 3, 60),
        ],
    }
}

pub fn berlin_feed() -> Feed {
    let gtfs = Gtfs::new(Config::default()).from_data(berlin_data());
    Feed::new().with_gtfs(gtfs).unwrap()
}

pub fn berlin_planner() -> Planner {
    Planner::new(berlin_feed())
}

/// One trip that revisits its first stop: X1 -> X2 -> X1 -> X3.
pub fn circular_planner() -> Planner {
    let data = GtfsData {
        stops: vec![
            stop("X1", "Loopgate", 52.50, 13.40),
            stop("X2", "Eastloop", 52.51, 13.41),
            stop("X3", "Loopend", 52.52, 13.42),
        ],
        routes: vec![route("r-m10", "M10")],
        trips: vec![trip("r-m10", "wd", "t-m10-a", "Loopend")],
        stop_times: vec![
            stop_time("t-m10-a", 1, "X1", "10:00:00", "10:00:00"),
            stop_time("t-m10-a", 2, "X2", "10:05:00", "10:05:00"),
            stop_time("t-m10-a", 3, "X1", "10:10:00", "10:10:00"),
            stop_time("t-m10-a", 4, "X3", "10:15:00", "10:15:00"),
        ],
        calendar: vec![weekday_service("wd")],
        transfers: vec![],
    };
    let gtfs = Gtfs::new(Config::default()).from_data(data);
    Planner::new(Feed::new().with_gtfs(gtfs).unwrap())
}
