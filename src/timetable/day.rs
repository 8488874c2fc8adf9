use crate::timetable::Error;

const DAY_NAMES: [&str; 7] = [
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

/// A resolved weekday. Slot 0 is Sunday, matching the 1-based numbering of
/// query inputs (1 = Sunday .. 7 = Saturday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Day(u8);

impl Day {
    /// Resolves a user-facing day input: a number 1..7 or a weekday prefix
    /// that names exactly one weekday ("tu" and "th" work, "t" does not).
    pub fn resolve(input: &DayInput) -> Result<Self, Error> {
        match input {
            DayInput::Number(n) => {
                if (1..=7).contains(n) {
                    Ok(Self(n - 1))
                } else {
                    Err(Error::UnknownDay(n.to_string()))
                }
            }
            DayInput::Name(name) => {
                let needle = name.trim().to_lowercase();
                if needle.is_empty() {
                    return Err(Error::UnknownDay(name.clone()));
                }
                let mut matches = DAY_NAMES
                    .iter()
                    .enumerate()
                    .filter(|(_, day)| day.starts_with(&needle));
                match (matches.next(), matches.next()) {
                    (Some((index, _)), None) => Ok(Self(index as u8)),
                    (Some(_), Some(_)) => Err(Error::AmbiguousDay(name.clone())),
                    _ => Err(Error::UnknownDay(name.clone())),
                }
            }
        }
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub fn name(self) -> &'static str {
        DAY_NAMES[self.0 as usize]
    }
}

/// A day as given by the caller, before resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DayInput {
    Number(u8),
    Name(String),
}

impl From<u8> for DayInput {
    fn from(value: u8) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for DayInput {
    fn from(value: &str) -> Self {
        Self::Name(value.to_string())
    }
}

impl From<String> for DayInput {
    fn from(value: String) -> Self {
        Self::Name(value)
    }
}

#[test]
fn resolve_number_test() {
    assert_eq!(Day::resolve(&1.into()).unwrap().name(), "sunday");
    assert_eq!(Day::resolve(&7.into()).unwrap().name(), "saturday");
}

#[test]
fn resolve_number_out_of_range_test() {
    assert!(matches!(Day::resolve(&0.into()), Err(Error::UnknownDay(_))));
    assert!(matches!(Day::resolve(&8.into()), Err(Error::UnknownDay(_))));
}

#[test]
fn resolve_unique_prefix_test() {
    assert_eq!(Day::resolve(&"tu".into()).unwrap().name(), "tuesday");
    assert_eq!(Day::resolve(&"th".into()).unwrap().name(), "thursday");
    assert_eq!(Day::resolve(&"Monday".into()).unwrap().name(), "monday");
    assert_eq!(Day::resolve(&"w".into()).unwrap().name(), "wednesday");
}

#[test]
fn resolve_ambiguous_prefix_test() {
    assert!(matches!(
        Day::resolve(&"t".into()),
        Err(Error::AmbiguousDay(_))
    ));
    assert!(matches!(
        Day::resolve(&"s".into()),
        Err(Error::AmbiguousDay(_))
    ));
}

#[test]
fn resolve_unknown_name_test() {
    assert!(matches!(
        Day::resolve(&"noday".into()),
        Err(Error::UnknownDay(_))
    ));
    assert!(matches!(Day::resolve(&"".into()), Err(Error::UnknownDay(_))));
}
