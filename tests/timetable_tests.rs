mod common;

use avgang::{planner, timetable};
use common::berlin_planner;

#[test]
fn connections_sorted_by_departure_test() {
    let planner = berlin_planner();
    let timetable = planner.timetable("we", None).unwrap();
    let connections = timetable.connections();
    assert!(!connections.is_empty());
    for pair in connections.windows(2) {
        assert!(pair[0].departure_time <= pair[1].departure_time);
    }
}

#[test]
fn compact_indices_in_bounds_test() {
    let planner = berlin_planner();
    let timetable = planner.timetable("we", None).unwrap();
    let stops = timetable.stop_count() as u32;
    let trips = timetable.trip_count() as u32;
    for connection in timetable.connections() {
        assert!(connection.departure_stop < stops);
        assert!(connection.arrival_stop < stops);
        assert!(connection.trip < trips);
    }
}

#[test]
fn saturday_trips_excluded_on_wednesday_test() {
    let planner = berlin_planner();
    let timetable = planner.timetable("we", None).unwrap();
    assert!(
        !timetable
            .trip_ids()
            .iter()
            .any(|id| id.as_ref() == "t-u4-sat")
    );

    let saturday = planner.timetable("sa", None).unwrap();
    assert!(
        saturday
            .trip_ids()
            .iter()
            .any(|id| id.as_ref() == "t-u4-sat")
    );
    assert!(!saturday.trip_ids().iter().any(|id| id.as_ref() == "t-u4-a"));
}

#[test]
fn compile_idempotence_test() {
    let planner = berlin_planner();
    let first = planner.timetable("we", None).unwrap();
    let second = planner.timetable("we", None).unwrap();
    assert_eq!(first, second);

    let filtered_first = planner.timetable("we", Some("^U")).unwrap();
    let filtered_second = planner.timetable("we", Some("^U")).unwrap();
    assert_eq!(filtered_first, filtered_second);
}

#[test]
fn route_filter_restricts_trips_test() {
    let planner = berlin_planner();
    let timetable = planner.timetable("we", Some("^U")).unwrap();
    let feed = planner.feed();
    for trip_id in timetable.trip_ids() {
        let trip = feed.trip_by_id(trip_id).unwrap();
        let route = feed.route(trip.route_idx);
        assert!(route.short_name.as_deref().unwrap().starts_with('U'));
    }
    assert!(timetable.stop_index("H1").is_some());
    assert!(timetable.stop_index("O1").is_none());
}

#[test]
fn negated_route_filter_test() {
    let planner = berlin_planner();
    let timetable = planner.timetable("we", Some("!^U")).unwrap();
    let feed = planner.feed();
    for trip_id in timetable.trip_ids() {
        let trip = feed.trip_by_id(trip_id).unwrap();
        let route = feed.route(trip.route_idx);
        assert!(route.short_name.as_deref().unwrap().starts_with('S'));
    }
}

#[test]
fn filter_matching_nothing_test() {
    let planner = berlin_planner();
    let result = planner.timetable("we", Some("^ICE"));
    assert!(matches!(
        result,
        Err(planner::Error::Timetable(timetable::Error::NoRoutesMatch(_)))
    ));
}

#[test]
fn negation_leaving_nothing_test() {
    let planner = berlin_planner();
    let result = planner.timetable("we", Some("!."));
    assert!(matches!(
        result,
        Err(planner::Error::Timetable(timetable::Error::NoRoutesMatch(_)))
    ));
}

#[test]
fn silly_pattern_test() {
    let planner = berlin_planner();
    let result = planner.timetable("we", Some("!"));
    assert!(matches!(
        result,
        Err(planner::Error::Timetable(timetable::Error::SillyPattern))
    ));
}

#[test]
fn no_services_on_sunday_test() {
    let planner = berlin_planner();
    let result = planner.timetable("su", None);
    assert!(matches!(
        result,
        Err(planner::Error::Timetable(timetable::Error::NoServicesOnDay(
            _
        )))
    ));
}

#[test]
fn ambiguous_day_test() {
    let planner = berlin_planner();
    let result = planner.timetable("t", None);
    assert!(matches!(
        result,
        Err(planner::Error::Timetable(timetable::Error::AmbiguousDay(_)))
    ));
}

#[test]
fn unknown_day_test() {
    let planner = berlin_planner();
    let result = planner.timetable("noday", None);
    assert!(matches!(
        result,
        Err(planner::Error::Timetable(timetable::Error::UnknownDay(_)))
    ));
}

#[test]
fn only_minimum_time_transfers_compiled_test() {
    let planner = berlin_planner();
    let timetable = planner.timetable("we", None).unwrap();
    // The fixture carries five transfer rows but only three of type 2.
    assert_eq!(timetable.transfers().len(), 3);

    let a2 = timetable.stop_index("A2").unwrap();
    let from_a2 = timetable.transfers().from_stop(a2);
    assert_eq!(from_a2.len(), 1);
    assert_eq!(from_a2[0].to_stop, timetable.stop_index("A1").unwrap());
    assert_eq!(from_a2[0].min_transfer_time.as_seconds(), 180);
}

#[test]
fn id_maps_round_trip_test() {
    let planner = berlin_planner();
    let timetable = planner.timetable("we", None).unwrap();
    for (index, id) in timetable.stop_ids().iter().enumerate() {
        assert_eq!(timetable.stop_index(id), Some(index as u32));
    }
    for trip_id in timetable.trip_ids() {
        assert!(planner.feed().trip_by_id(trip_id).is_some());
    }
}
