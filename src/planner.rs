use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

use chrono::{Datelike, Local};
use thiserror::Error;
use tracing::debug;

use crate::{
    csa::{ScanState, refine, scan, unwind},
    feed::Feed,
    gtfs,
    journey::{Journey, reconstruct},
    resolve::{ResolveOptions, StopQuery, resolve},
    shared::time::Time,
    timetable::{self, Day, DayInput, RouteFilter, Timetable},
};

#[derive(Error, Debug)]
pub enum Error {
    #[error("could not read {0:?} as a time")]
    BadTime(String),
    #[error("no connections depart at or after {0}")]
    NoServicesAfterStart(String),
    #[error("no stop matches {0:?}")]
    StationNotFound(String),
    #[error("from has {from} entries but to has {to}")]
    LengthMismatch { from: usize, to: usize },
    #[error(transparent)]
    Timetable(#[from] timetable::Error),
    #[error(transparent)]
    Gtfs(#[from] gtfs::Error),
}

/// A departure time as given by the caller: seconds, an `(H, M)` pair, an
/// `(H, M, S)` triple, or an `HH:MM:SS` string. Strings are validated when
/// the query runs.
#[derive(Debug, Clone)]
pub enum TimeInput {
    At(Time),
    Text(String),
}

impl TimeInput {
    fn resolve(&self) -> Result<Time, Error> {
        match self {
            Self::At(time) => Ok(*time),
            Self::Text(text) => {
                Time::from_hms(text).ok_or_else(|| Error::BadTime(text.clone()))
            }
        }
    }
}

impl From<Time> for TimeInput {
    fn from(value: Time) -> Self {
        Self::At(value)
    }
}

impl From<u32> for TimeInput {
    fn from(value: u32) -> Self {
        Self::At(Time::from_seconds(value))
    }
}

impl From<(u32, u32)> for TimeInput {
    fn from((hours, minutes): (u32, u32)) -> Self {
        Self::At(Time::from_seconds(hours * 3600 + minutes * 60))
    }
}

impl From<(u32, u32, u32)> for TimeInput {
    fn from((hours, minutes, seconds): (u32, u32, u32)) -> Self {
        Self::At(Time::from_seconds(hours * 3600 + minutes * 60 + seconds))
    }
}

impl From<&str> for TimeInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for TimeInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

type CacheKey = (Day, Option<String>);

/// The query surface of the crate.
///
/// Owns an immutable [`Feed`] and hands out compiled timetables, caching
/// one per (day, route filter) pair so repeated queries against the same
/// projection never recompile.
pub struct Planner {
    feed: Feed,
    cache: Mutex<HashMap<CacheKey, Timetable>>,
}

impl Planner {
    pub fn new(feed: Feed) -> Self {
        Self {
            feed,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    /// The compiled timetable for a day and optional route filter.
    pub fn timetable(
        &self,
        day: impl Into<DayInput>,
        route_pattern: Option<&str>,
    ) -> Result<Timetable, Error> {
        let day = Day::resolve(&day.into())?;
        self.timetable_for(day, route_pattern)
    }

    fn timetable_for(&self, day: Day, route_pattern: Option<&str>) -> Result<Timetable, Error> {
        let key = (day, route_pattern.map(str::to_string));
        let mut cache = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(timetable) = cache.get(&key) {
            debug!(day = day.name(), "reusing cached timetable");
            return Ok(timetable.clone());
        }
        let filter = route_pattern.map(RouteFilter::parse).transpose()?;
        let timetable = Timetable::compile(&self.feed, day, filter.as_ref())?;
        cache.insert(key, timetable.clone());
        Ok(timetable)
    }

    /// Starts a journey query between one origin and one destination.
    pub fn query(&self, from: impl Into<StopQuery>, to: impl Into<StopQuery>) -> Query<'_> {
        self.query_many(vec![from.into()], vec![to.into()])
    }

    /// Starts a batch query. `from` and `to` are matched up pairwise and
    /// must have the same length.
    pub fn query_many(&self, from: Vec<StopQuery>, to: Vec<StopQuery>) -> Query<'_> {
        Query {
            planner: self,
            from,
            to,
            day: DayInput::Number(Local::now().weekday().num_days_from_sunday() as u8 + 1),
            start_time: TimeInput::At(Time::now()),
            route_pattern: None,
            earliest_arrival: true,
            include_ids: false,
            max_transfers: None,
            from_to_are_ids: false,
            grep_fixed: false,
        }
    }
}

/// One journey query under construction. Defaults: today's weekday, the
/// current wall-clock time, no route filter, earliest-arrival refinement
/// on, ids omitted, transfers unbounded.
pub struct Query<'a> {
    planner: &'a Planner,
    from: Vec<StopQuery>,
    to: Vec<StopQuery>,
    day: DayInput,
    start_time: TimeInput,
    route_pattern: Option<String>,
    earliest_arrival: bool,
    include_ids: bool,
    max_transfers: Option<u32>,
    from_to_are_ids: bool,
    grep_fixed: bool,
}

impl Query<'_> {
    /// Day of the week to plan on: 1..7 (1 = Sunday) or an unambiguous
    /// weekday prefix such as "tu".
    pub fn on_day(mut self, day: impl Into<DayInput>) -> Self {
        self.day = day.into();
        self
    }

    /// The earliest moment the journey may begin.
    pub fn departing_at(mut self, time: impl Into<TimeInput>) -> Self {
        self.start_time = time.into();
        self
    }

    /// Restricts the timetable to routes whose short name matches the
    /// pattern; a leading `!` keeps the non-matching routes instead.
    pub fn route_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.route_pattern = Some(pattern.into());
        self
    }

    /// When disabled, the first scan's result is returned as-is instead of
    /// being refined towards the latest feasible departure.
    pub fn earliest_arrival(mut self, enabled: bool) -> Self {
        self.earliest_arrival = enabled;
        self
    }

    /// Include GTFS route, trip, and stop ids in the journey legs.
    pub fn include_ids(mut self, enabled: bool) -> Self {
        self.include_ids = enabled;
        self
    }

    /// Upper bound on boarded-trip changes along the journey.
    pub fn max_transfers(mut self, limit: u32) -> Self {
        self.max_transfers = Some(limit);
        self
    }

    /// Treat `from`/`to` strings as GTFS stop ids instead of names.
    pub fn from_to_are_ids(mut self, enabled: bool) -> Self {
        self.from_to_are_ids = enabled;
        self
    }

    /// Match stop names literally instead of as regular expressions.
    pub fn grep_fixed(mut self, enabled: bool) -> Self {
        self.grep_fixed = enabled;
        self
    }

    /// Computes the journey for a single origin/destination pair.
    ///
    /// `Ok(None)` means the network offers no journey for the request,
    /// which is a normal outcome, not an error.
    pub fn solve(self) -> Result<Option<Journey>, Error> {
        let mut journeys = self.solve_all()?;
        Ok(journeys.pop().flatten())
    }

    /// Computes one journey per `from`/`to` pair. The result has the same
    /// length and order as the inputs.
    pub fn solve_all(self) -> Result<Vec<Option<Journey>>, Error> {
        if self.from.len() != self.to.len() {
            return Err(Error::LengthMismatch {
                from: self.from.len(),
                to: self.to.len(),
            });
        }

        let day = Day::resolve(&self.day)?;
        let timetable = self
            .planner
            .timetable_for(day, self.route_pattern.as_deref())?;
        let start_time = self.start_time.resolve()?;

        let connections = timetable.connections();
        let first = connections.partition_point(|c| c.departure_time < start_time);
        if first == connections.len() {
            return Err(Error::NoServicesAfterStart(start_time.to_hms_string()));
        }

        let opts = ResolveOptions {
            as_ids: self.from_to_are_ids,
            fixed: self.grep_fixed,
        };
        let feed = self.planner.feed();
        let mut state = ScanState::new(timetable.stop_count(), timetable.trip_count());
        let mut journeys = Vec::with_capacity(self.from.len());

        for (from, to) in self.from.iter().zip(self.to.iter()) {
            let sources = resolve(&timetable, feed, from, opts)?;
            let targets = resolve(&timetable, feed, to, opts)?;

            state.reset();
            let view = timetable.scan_view();
            let Some(arrival) = scan(
                &view,
                &mut state,
                &sources,
                &targets,
                start_time,
                self.max_transfers,
            ) else {
                journeys.push(None);
                continue;
            };

            let mut steps = unwind(&view, &state, arrival.stop);
            if self.earliest_arrival
                && let Some(refined) = refine(
                    &timetable,
                    &mut state,
                    &sources,
                    &targets,
                    arrival.time,
                    self.max_transfers,
                )
            {
                steps = refined;
            }

            journeys.push(reconstruct(&steps, &timetable, feed, self.include_ids));
        }

        Ok(journeys)
    }
}
