//! A GTFS journey planner built on the Connection Scan Algorithm.
//!
//! A feed is loaded once into an immutable [`feed::Feed`], projected onto a
//! service day as a compact [`timetable::Timetable`], and queried through
//! [`planner::Planner`]:
//!
//! ```no_run
//! use avgang::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let gtfs = Gtfs::new(Config::default()).from_zip("feed.zip")?;
//! let feed = Feed::new().with_gtfs(gtfs)?;
//! let planner = Planner::new(feed);
//!
//! let journey = planner
//!     .query("Innsbrucker Platz", "Alexanderplatz")
//!     .on_day("we")
//!     .departing_at((12, 2))
//!     .solve()?;
//!
//! if let Some(journey) = journey {
//!     for leg in journey.legs() {
//!         println!("{} {}", leg.arrival_time.to_hms_string(), leg.stop_name);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub(crate) mod csa;
pub mod feed;
pub mod gtfs;
pub mod journey;
pub mod planner;
pub mod resolve;
pub mod shared;
pub mod timetable;

pub mod prelude {
    pub use crate::{
        feed::Feed,
        gtfs::{Config, Gtfs, GtfsData},
        journey::{Journey, Leg},
        planner::{Planner, Query},
        resolve::StopQuery,
        shared::{Coordinate, Duration, Time},
        timetable::{Day, Timetable},
    };
}
