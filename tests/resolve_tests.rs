mod common;

use avgang::{planner, timetable};
use common::berlin_planner;

#[test]
fn regex_name_match_test() {
    let planner = berlin_planner();
    let journey = planner
        .query("Innsbrucker", "Alex.*platz")
        .on_day("we")
        .departing_at((12, 2))
        .solve()
        .unwrap();
    assert!(journey.is_some());
}

#[test]
fn name_match_is_case_insensitive_test() {
    let planner = berlin_planner();
    let journey = planner
        .query("innsbrucker platz", "ALEXANDERPLATZ")
        .on_day("we")
        .departing_at((12, 2))
        .solve()
        .unwrap();
    assert!(journey.is_some());
}

#[test]
fn fixed_name_match_test() {
    let planner = berlin_planner();
    let journey = planner
        .query("Innsbrucker Platz", "Alexanderplatz")
        .on_day("we")
        .departing_at((12, 2))
        .grep_fixed(true)
        .solve()
        .unwrap();
    assert!(journey.is_some());
}

#[test]
fn fixed_mode_takes_pattern_literally_test() {
    let planner = berlin_planner();
    // "Alex.*platz" is a usable regex but no stop contains it literally.
    let result = planner
        .query("Innsbrucker Platz", "Alex.*platz")
        .on_day("we")
        .departing_at((12, 2))
        .grep_fixed(true)
        .solve();
    assert!(matches!(result, Err(planner::Error::StationNotFound(_))));
}

#[test]
fn unknown_station_test() {
    let planner = berlin_planner();
    let result = planner
        .query("Atlantis", "Alexanderplatz")
        .on_day("we")
        .departing_at((12, 2))
        .solve();
    assert!(matches!(result, Err(planner::Error::StationNotFound(_))));
}

#[test]
fn malformed_name_pattern_test() {
    let planner = berlin_planner();
    let result = planner
        .query("[", "Alexanderplatz")
        .on_day("we")
        .departing_at((12, 2))
        .solve();
    assert!(matches!(
        result,
        Err(planner::Error::Timetable(timetable::Error::BadPattern(_)))
    ));
}
