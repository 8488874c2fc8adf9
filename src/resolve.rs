use rayon::prelude::*;
use regex::RegexBuilder;
use tracing::warn;

use crate::{
    feed::Feed,
    planner::Error,
    shared::geo::{Coordinate, Distance},
    timetable::{self, Timetable},
};

const SPAN_WARNING: Distance = Distance::from_kilometers(5.0);

/// A start or end point as given by the caller: a stop name to match, a
/// GTFS stop id, or a position to resolve to the nearest named stop.
#[derive(Debug, Clone)]
pub enum StopQuery {
    Name(String),
    Id(String),
    Coordinate(Coordinate),
}

impl From<&str> for StopQuery {
    fn from(value: &str) -> Self {
        Self::Name(value.to_string())
    }
}

impl From<String> for StopQuery {
    fn from(value: String) -> Self {
        Self::Name(value)
    }
}

impl From<Coordinate> for StopQuery {
    fn from(value: Coordinate) -> Self {
        Self::Coordinate(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ResolveOptions {
    /// Treat name queries as GTFS stop ids.
    pub as_ids: bool,
    /// Match names literally instead of as a regex.
    pub fixed: bool,
}

/// Maps a query onto the compact stop indices of a compiled timetable.
///
/// Name matching is case-insensitive and runs over every compiled stop in
/// parallel. A coordinate resolves to the nearest stop by great-circle
/// distance, then to every stop sharing that stop's name, so all platforms
/// of the nearest station participate in the search.
pub(crate) fn resolve(
    timetable: &Timetable,
    feed: &Feed,
    query: &StopQuery,
    opts: ResolveOptions,
) -> Result<Vec<u32>, Error> {
    match query {
        StopQuery::Id(id) => by_id(timetable, id),
        StopQuery::Name(name) if opts.as_ids => by_id(timetable, name),
        StopQuery::Name(name) => by_name(timetable, feed, name, opts.fixed),
        StopQuery::Coordinate(coordinate) => by_coordinate(timetable, feed, coordinate),
    }
}

fn by_id(timetable: &Timetable, id: &str) -> Result<Vec<u32>, Error> {
    match timetable.stop_index(id) {
        Some(stop) => Ok(vec![stop]),
        None => Err(Error::StationNotFound(id.to_string())),
    }
}

fn by_name(
    timetable: &Timetable,
    feed: &Feed,
    name: &str,
    fixed: bool,
) -> Result<Vec<u32>, Error> {
    let stop_count = timetable.stop_count() as u32;
    let matches: Vec<u32> = if fixed {
        let needle = name.to_lowercase();
        (0..stop_count)
            .into_par_iter()
            .filter(|&stop| {
                feed.stop(timetable.feed_stop(stop))
                    .normalized_name
                    .contains(&needle)
            })
            .collect()
    } else {
        let regex = RegexBuilder::new(name)
            .case_insensitive(true)
            .build()
            .map_err(timetable::Error::from)?;
        (0..stop_count)
            .into_par_iter()
            .filter(|&stop| regex.is_match(&feed.stop(timetable.feed_stop(stop)).name))
            .collect()
    };

    if matches.is_empty() {
        return Err(Error::StationNotFound(name.to_string()));
    }
    warn_on_wide_span(timetable, feed, name, &matches);
    Ok(matches)
}

fn by_coordinate(
    timetable: &Timetable,
    feed: &Feed,
    coordinate: &Coordinate,
) -> Result<Vec<u32>, Error> {
    let stop_count = timetable.stop_count() as u32;
    let nearest = (0..stop_count)
        .into_par_iter()
        .filter_map(|stop| {
            let position = feed.stop(timetable.feed_stop(stop)).coordinate?;
            Some((stop, position.great_circle_distance(coordinate)))
        })
        .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let Some((nearest, _)) = nearest else {
        return Err(Error::StationNotFound(coordinate.to_string()));
    };

    let name = feed.stop(timetable.feed_stop(nearest)).name.clone();
    let matches: Vec<u32> = (0..stop_count)
        .into_par_iter()
        .filter(|&stop| feed.stop(timetable.feed_stop(stop)).name == name)
        .collect();
    Ok(matches)
}

fn warn_on_wide_span(timetable: &Timetable, feed: &Feed, name: &str, matches: &[u32]) {
    let coordinates: Vec<Coordinate> = matches
        .iter()
        .filter_map(|&stop| feed.stop(timetable.feed_stop(stop)).coordinate)
        .collect();
    let mut span = Distance::default();
    for (i, a) in coordinates.iter().enumerate() {
        for b in &coordinates[i + 1..] {
            let distance = a.great_circle_distance(b);
            if distance > span {
                span = distance;
            }
        }
    }
    if span > SPAN_WARNING {
        warn!(
            query = name,
            span_km = span.as_kilometers(),
            "matched stops are more than 5 km apart"
        );
    }
}
