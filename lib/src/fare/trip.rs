//! Trip parameters and their categorical levels.

use crate::fare::FareError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

pub const DENSITY_RANGE: RangeInclusive<u32> = 1..=10;
pub const BAGS_RANGE: RangeInclusive<u32> = 1..=5;
pub const WEIGHT_RANGE: RangeInclusive<u32> = 10..=100;
pub const DISTANCE_RANGE: RangeInclusive<u32> = 50..=500;

/// Implements the shared plumbing of a closed categorical level set:
/// canonical order, index codes, clean names and case-insensitive parsing.
macro_rules! category {
    ($ty:ident, $field:literal, [$($variant:ident => $name:literal),+ $(,)?]) => {
        impl $ty {
            /// All levels in canonical order.
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// Position in [`Self::ALL`], used as the encoder code.
            pub fn index(self) -> usize {
                self as usize
            }

            pub fn from_index(index: usize) -> Option<Self> {
                Self::ALL.get(index).copied()
            }

            pub fn name(self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $ty {
            type Err = FareError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|level| level.name().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| FareError::UnsupportedCategory {
                        field: $field,
                        value: s.to_string(),
                    })
            }
        }
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Station {
    #[serde(rename = "New Delhi")]
    NewDelhi,
    #[serde(rename = "Mumbai CST")]
    MumbaiCst,
    #[serde(rename = "Howrah")]
    Howrah,
    #[serde(rename = "Chennai Central")]
    ChennaiCentral,
    #[serde(rename = "Bengaluru City")]
    BengaluruCity,
}

category!(Station, "station", [
    NewDelhi => "New Delhi",
    MumbaiCst => "Mumbai CST",
    Howrah => "Howrah",
    ChennaiCentral => "Chennai Central",
    BengaluruCity => "Bengaluru City",
]);

impl Station {
    /// Statutory minimum daily wage in rupees.
    pub fn min_wage(self) -> u32 {
        match self {
            Station::NewDelhi => 400,
            Station::MumbaiCst => 450,
            Station::Howrah => 350,
            Station::ChennaiCentral => 370,
            Station::BengaluruCity => 420,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Season {
    Summer,
    Monsoon,
    Winter,
    Festival,
}

category!(Season, "season", [
    Summer => "Summer",
    Monsoon => "Monsoon",
    Winter => "Winter",
    Festival => "Festival",
]);

impl Season {
    /// Demand multiplier in hundredths.
    pub fn factor_pct(self) -> u32 {
        match self {
            Season::Summer => 100,
            Season::Monsoon => 110,
            Season::Winter => 90,
            Season::Festival => 130,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BagSize {
    Small,
    Medium,
    Large,
}

category!(BagSize, "bag size", [
    Small => "Small",
    Medium => "Medium",
    Large => "Large",
]);

impl BagSize {
    /// Handling multiplier in hundredths.
    pub fn factor_pct(self) -> u32 {
        match self {
            BagSize::Small => 80,
            BagSize::Medium => 100,
            BagSize::Large => 120,
        }
    }
}

/// One porter request. Numeric fields are validated on construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TripRecord {
    station: Station,
    train_arrival_density: u32,
    season: Season,
    num_bags: u32,
    total_weight_kg: u32,
    avg_bag_size: BagSize,
    platform_distance_m: u32,
}

fn check(field: &'static str, value: u32, range: RangeInclusive<u32>) -> Result<u32, FareError> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(FareError::OutOfRange {
            field,
            value: value as i64,
            min: *range.start() as i64,
            max: *range.end() as i64,
        })
    }
}

impl TripRecord {
    pub fn new(
        station: Station,
        train_arrival_density: u32,
        season: Season,
        num_bags: u32,
        total_weight_kg: u32,
        avg_bag_size: BagSize,
        platform_distance_m: u32,
    ) -> Result<Self, FareError> {
        Ok(Self {
            station,
            train_arrival_density: check(
                "train_arrival_density",
                train_arrival_density,
                DENSITY_RANGE,
            )?,
            season,
            num_bags: check("num_bags", num_bags, BAGS_RANGE)?,
            total_weight_kg: check("total_weight_kg", total_weight_kg, WEIGHT_RANGE)?,
            avg_bag_size,
            platform_distance_m: check(
                "platform_distance_m",
                platform_distance_m,
                DISTANCE_RANGE,
            )?,
        })
    }

    /// Caller guarantees every numeric field is in range.
    pub(crate) fn new_unchecked(
        station: Station,
        train_arrival_density: u32,
        season: Season,
        num_bags: u32,
        total_weight_kg: u32,
        avg_bag_size: BagSize,
        platform_distance_m: u32,
    ) -> Self {
        Self {
            station,
            train_arrival_density,
            season,
            num_bags,
            total_weight_kg,
            avg_bag_size,
            platform_distance_m,
        }
    }

    pub fn station(&self) -> Station {
        self.station
    }

    pub fn train_arrival_density(&self) -> u32 {
        self.train_arrival_density
    }

    pub fn season(&self) -> Season {
        self.season
    }

    pub fn num_bags(&self) -> u32 {
        self.num_bags
    }

    pub fn total_weight_kg(&self) -> u32 {
        self.total_weight_kg
    }

    pub fn avg_bag_size(&self) -> BagSize {
        self.avg_bag_size
    }

    pub fn platform_distance_m(&self) -> u32 {
        self.platform_distance_m
    }

    /// Same trip in another season.
    pub fn with_season(mut self, season: Season) -> Self {
        self.season = season;
        self
    }

    /// Same trip from another station.
    pub fn with_station(mut self, station: Station) -> Self {
        self.station = station;
        self
    }
}
