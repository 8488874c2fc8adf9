use avgang::{
    gtfs::models::{GtfsCalendar, GtfsRoute, GtfsStop, GtfsStopTime, GtfsTransfer, GtfsTrip},
    prelude::*,
};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

const LINES: usize = 8;
const STOPS_PER_LINE: usize = 25;
const TRIPS_PER_LINE: usize = 40;

/// A chain of transit lines: each line is a sequence of stops with trips
/// every 15 minutes, and the end of one line connects to the start of the
/// next by a 120 s minimum-time transfer.
fn synthetic_feed() -> Feed {
    let mut data = GtfsData::default();

    data.calendar.push(GtfsCalendar {
        service_id: "daily".into(),
        monday: 1,
        tuesday: 1,
        wednesday: 1,
        thursday: 1,
        friday: 1,
        saturday: 1,
        sunday: 1,
        start_date: "20240101".into(),
        end_date: "20341231".into(),
    });

    for line in 0..LINES {
        data.routes.push(GtfsRoute {
            route_id: format!("r{line}"),
            route_short_name: Some(format!("L{line}")),
            route_long_name: None,
            route_type: None,
        });
        for stop in 0..STOPS_PER_LINE {
            data.stops.push(GtfsStop {
                stop_id: format!("l{line}s{stop}"),
                stop_name: format!("Line {line} Stop {stop}"),
                stop_lat: Some(52.0 + line as f64 * 0.01),
                stop_lon: Some(13.0 + stop as f64 * 0.01),
            });
        }
        for trip in 0..TRIPS_PER_LINE {
            let trip_id = format!("t{line}x{trip}");
            data.trips.push(GtfsTrip {
                route_id: format!("r{line}"),
                service_id: "daily".into(),
                trip_id: trip_id.clone(),
                trip_headsign: Some(format!("Line {line} Stop {}", STOPS_PER_LINE - 1)),
            });
            let depart = 6 * 3600 + trip * 900;
            for stop in 0..STOPS_PER_LINE {
                let at = Time::from_seconds((depart + stop * 120) as u32).to_hms_string();
                data.stop_times.push(GtfsStopTime {
                    trip_id: trip_id.clone(),
                    arrival_time: at.clone(),
                    departure_time: at,
                    stop_id: format!("l{line}s{stop}"),
                    stop_sequence: stop as u32 + 1,
                });
            }
        }
        if line > 0 {
            data.transfers.push(GtfsTransfer {
                from_stop_id: format!("l{}s{}", line - 1, STOPS_PER_LINE - 1),
                to_stop_id: format!("l{line}s0"),
                transfer_type: Some(2),
                min_transfer_time: Some(120),
            });
        }
    }

    let gtfs = Gtfs::new(Config::default()).from_data(data);
    Feed::new().with_gtfs(gtfs).expect("failed to build feed")
}

fn short_solve(planner: &Planner) {
    let _ = black_box(
        planner
            .query("Line 0 Stop 0", "Line 0 Stop 24")
            .on_day("mo")
            .departing_at((6, 30))
            .grep_fixed(true)
            .solve(),
    );
}

fn long_solve(planner: &Planner) {
    let _ = black_box(
        planner
            .query("Line 0 Stop 0", "Line 7 Stop 24")
            .on_day("mo")
            .departing_at((6, 30))
            .grep_fixed(true)
            .solve(),
    );
}

fn criterion_benchmark(c: &mut Criterion) {
    let planner = Planner::new(synthetic_feed());
    // Warm the timetable cache so the benches measure the scan.
    planner
        .timetable("mo", None)
        .expect("failed to compile timetable");

    let mut group = c.benchmark_group("Routing");

    group.bench_function("Short route solve", |b| b.iter(|| short_solve(&planner)));

    group.bench_function("Long route solve", |b| b.iter(|| long_solve(&planner)));

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
