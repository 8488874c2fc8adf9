use serde::de::DeserializeOwned;
use std::{
    fs::File,
    io::{self},
    path::{Path, PathBuf},
};
use thiserror::Error;
use zip::{ZipArchive, read::ZipFile};

mod config;
mod data;
pub mod models;
pub use config::*;
pub use data::*;
use models::*;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Could not find file with name: {0}")]
    FileNotFound(String),
}

#[derive(Default)]
pub enum StorageType {
    #[default]
    None,
    Zip(ZipArchive<File>),
    Dir(PathBuf),
    Memory(GtfsData),
}

/// Access to the raw tables of a GTFS feed. Rows are streamed to the caller
/// one at a time so the whole file never has to sit in memory twice.
#[derive(Default)]
pub struct Gtfs {
    config: Config,
    storage: StorageType,
}

impl Gtfs {
    pub fn new(config: self::Config) -> Self {
        Self {
            config,
            storage: Default::default(),
        }
    }

    pub fn from_zip<P: AsRef<Path>>(mut self, path: P) -> Result<Self, self::Error> {
        let zip_file = File::open(path)?;
        let archive = ZipArchive::new(zip_file)?;
        self.storage = StorageType::Zip(archive);
        Ok(self)
    }

    /// Reads an unpacked feed, a directory holding the `.txt` tables.
    pub fn from_dir<P: AsRef<Path>>(mut self, path: P) -> Result<Self, self::Error> {
        let dir = path.as_ref().to_path_buf();
        if !dir.is_dir() {
            return Err(self::Error::FileNotFound(dir.display().to_string()));
        }
        self.storage = StorageType::Dir(dir);
        Ok(self)
    }

    pub fn from_data(mut self, data: GtfsData) -> Self {
        self.storage = StorageType::Memory(data);
        self
    }

    pub fn stream_stops<F>(&mut self, f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, GtfsStop)),
    {
        let file_name = self.config.stops_file_name.clone();
        self.stream_table(&file_name, false, |data| data.stops.clone(), f)
    }

    pub fn stream_routes<F>(&mut self, f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, GtfsRoute)),
    {
        let file_name = self.config.routes_file_name.clone();
        self.stream_table(&file_name, false, |data| data.routes.clone(), f)
    }

    pub fn stream_trips<F>(&mut self, f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, GtfsTrip)),
    {
        let file_name = self.config.trips_file_name.clone();
        self.stream_table(&file_name, false, |data| data.trips.clone(), f)
    }

    pub fn stream_stop_times<F>(&mut self, f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, GtfsStopTime)),
    {
        let file_name = self.config.stop_times_file_name.clone();
        self.stream_table(&file_name, false, |data| data.stop_times.clone(), f)
    }

    pub fn stream_calendar<F>(&mut self, f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, GtfsCalendar)),
    {
        let file_name = self.config.calendar_file_name.clone();
        self.stream_table(&file_name, false, |data| data.calendar.clone(), f)
    }

    /// Transfers are optional in GTFS; a feed without the table streams
    /// nothing.
    pub fn stream_transfers<F>(&mut self, f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, GtfsTransfer)),
    {
        let file_name = self.config.transfers_file_name.clone();
        self.stream_table(&file_name, true, |data| data.transfers.clone(), f)
    }

    fn stream_table<T, S, F>(
        &mut self,
        file_name: &str,
        optional: bool,
        select: S,
        f: F,
    ) -> Result<(), self::Error>
    where
        T: DeserializeOwned,
        S: Fn(&GtfsData) -> Vec<T>,
        F: FnMut((usize, T)),
    {
        match &mut self.storage {
            StorageType::None => Ok(()),
            StorageType::Zip(archive) => {
                if optional && archive.index_for_name(file_name).is_none() {
                    return Ok(());
                }
                stream_from_zip::<T, F>(archive, file_name, f)
            }
            StorageType::Dir(dir) => {
                let path = dir.join(file_name);
                if !path.is_file() {
                    if optional {
                        return Ok(());
                    }
                    return Err(self::Error::FileNotFound(file_name.to_string()));
                }
                stream_from_path::<T, F>(&path, f)
            }
            StorageType::Memory(data) => {
                select(data).into_iter().enumerate().for_each(f);
                Ok(())
            }
        }
    }
}

fn stream_from_zip<T, F>(
    archive: &mut ZipArchive<File>,
    file_name: &str,
    f: F,
) -> Result<(), self::Error>
where
    T: DeserializeOwned,
    F: FnMut((usize, T)),
{
    let file = get_file(archive, file_name)?;
    let mut reader = csv::Reader::from_reader(file);
    reader
        .deserialize()
        .filter_map(|row| row.ok())
        .enumerate()
        .for_each(f);
    Ok(())
}

fn stream_from_path<T, F>(path: &Path, f: F) -> Result<(), self::Error>
where
    T: DeserializeOwned,
    F: FnMut((usize, T)),
{
    let mut reader = csv::Reader::from_path(path)?;
    reader
        .deserialize()
        .filter_map(|row| row.ok())
        .enumerate()
        .for_each(f);
    Ok(())
}

fn get_file<'a>(
    archive: &'a mut ZipArchive<File>,
    name: &'a str,
) -> Result<ZipFile<'a>, self::Error> {
    let index = archive
        .index_for_name(name)
        .ok_or(self::Error::FileNotFound(name.to_string()))?;
    let file = archive.by_index(index)?;
    Ok(file)
}
