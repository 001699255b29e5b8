//! Closed-form porter tariff and the synthetic corpus labelled with it.
//!
//! ```text
//! price = ( min_wage * 0.02
//!         + total_weight_kg * bag_size_factor * 0.5
//!         + platform_distance_m * 0.1
//!         + train_arrival_density * 5
//!         ) * season_factor
//! ```
//!
//! Every coefficient is a whole number of hundredths, so the price is
//! evaluated as an exact fraction and rounded half to even. Ties such as
//! 24.5 are real ties and round to 24.

use crate::fare::{BagSize, Season, Station, TripRecord};
use serde::Serialize;
use std::collections::BTreeSet;
use std::io::Write;
use tracing::info;

/// Default number of synthetic records.
pub const DEFAULT_CORPUS_SIZE: usize = 200;

// price = base / 200 * season_pct / 100
const DENOMINATOR: u64 = 20_000;

/// Rounds `n / d` to the nearest integer, ties to even. `d` must be non-zero.
pub fn round_half_even(n: u64, d: u64) -> u64 {
    let q = n / d;
    let r = n % d;
    match (2 * r).cmp(&d) {
        std::cmp::Ordering::Less => q,
        std::cmp::Ordering::Greater => q + 1,
        std::cmp::Ordering::Equal => q + (q & 1),
    }
}

/// Price scaled by 200, before the season multiplier.
fn base_x200(trip: &TripRecord) -> u64 {
    4 * trip.station().min_wage() as u64
        + trip.total_weight_kg() as u64 * trip.avg_bag_size().factor_pct() as u64
        + 20 * trip.platform_distance_m() as u64
        + 1000 * trip.train_arrival_density() as u64
}

/// Unrounded tariff, for display and diagnostics.
pub fn exact_price(trip: &TripRecord) -> f64 {
    (base_x200(trip) * trip.season().factor_pct() as u64) as f64 / DENOMINATOR as f64
}

/// The tariff rounded half to even.
pub fn closed_form_price(trip: &TripRecord) -> u32 {
    let numerator = base_x200(trip) * trip.season().factor_pct() as u64;
    // bounded by (1800 + 12000 + 10000 + 10000) * 130 / 20000 < 220
    round_half_even(numerator, DENOMINATOR) as u32
}

/// The `i`-th synthetic trip. Each field cycles through its legal range.
pub fn synthetic_trip(i: usize) -> TripRecord {
    TripRecord::new_unchecked(
        Station::ALL[i % Station::ALL.len()],
        (i % 10) as u32 + 1,
        Season::ALL[i % Season::ALL.len()],
        (i % 5) as u32 + 1,
        10 + (i % 90) as u32,
        BagSize::ALL[i % BagSize::ALL.len()],
        50 + (i % 450) as u32,
    )
}

/// Labelled training trips.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Corpus {
    records: Vec<TripRecord>,
    labels: Vec<u32>,
}

/// Categorical levels present in a corpus.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Coverage {
    pub stations: BTreeSet<Station>,
    pub seasons: BTreeSet<Season>,
    pub bag_sizes: BTreeSet<BagSize>,
}

impl Coverage {
    /// Whether every known level appears at least once.
    pub fn is_complete(&self) -> bool {
        self.stations.len() == Station::ALL.len()
            && self.seasons.len() == Season::ALL.len()
            && self.bag_sizes.len() == BagSize::ALL.len()
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    station: &'a str,
    train_arrival_density: u32,
    season: &'a str,
    num_bags: u32,
    total_weight_kg: u32,
    avg_bag_size: &'a str,
    platform_distance_m: u32,
    price: u32,
}

impl Corpus {
    /// Deterministic corpus of `n` trips labelled with [`closed_form_price`].
    pub fn generate(n: usize) -> Self {
        let records: Vec<TripRecord> = (0..n).map(synthetic_trip).collect();
        let corpus = Self::from_records(records);
        let coverage = corpus.coverage();
        info!(
            records = n,
            stations = coverage.stations.len(),
            seasons = coverage.seasons.len(),
            bag_sizes = coverage.bag_sizes.len(),
            "generated synthetic corpus"
        );
        corpus
    }

    /// Labels arbitrary trips with the closed-form tariff.
    pub fn from_records(records: Vec<TripRecord>) -> Self {
        let labels = records.iter().map(closed_form_price).collect();
        Self { records, labels }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TripRecord, u32)> {
        self.records.iter().zip(self.labels.iter().copied())
    }

    pub fn coverage(&self) -> Coverage {
        let mut coverage = Coverage::default();
        for trip in &self.records {
            coverage.stations.insert(trip.station());
            coverage.seasons.insert(trip.season());
            coverage.bag_sizes.insert(trip.avg_bag_size());
        }
        coverage
    }

    /// Writes a header and one row per trip, price last.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(writer);
        for (trip, price) in self.iter() {
            wtr.serialize(CsvRow {
                station: trip.station().name(),
                train_arrival_density: trip.train_arrival_density(),
                season: trip.season().name(),
                num_bags: trip.num_bags(),
                total_weight_kg: trip.total_weight_kg(),
                avg_bag_size: trip.avg_bag_size().name(),
                platform_distance_m: trip.platform_distance_m(),
                price,
            })?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn trip(
        station: Station,
        density: u32,
        season: Season,
        weight: u32,
        size: BagSize,
        distance: u32,
    ) -> TripRecord {
        TripRecord::new(station, density, season, 2, weight, size, distance).unwrap()
    }

    #[test]
    fn test_round_half_even() {
        assert_eq!(round_half_even(49, 2), 24);
        assert_eq!(round_half_even(51, 2), 26);
        assert_eq!(round_half_even(754, 10), 75);
        assert_eq!(round_half_even(756, 10), 76);
        assert_eq!(round_half_even(0, 7), 0);
    }

    #[test]
    fn test_reference_trip() {
        let t = trip(Station::NewDelhi, 5, Season::Summer, 30, BagSize::Medium, 100);
        assert_eq!(closed_form_price(&t), 58);
        assert!((exact_price(&t) - 58.0).abs() < 1e-9);
    }

    #[test]
    fn test_festival_surcharge() {
        let t = trip(Station::NewDelhi, 5, Season::Festival, 30, BagSize::Medium, 100);
        assert!((exact_price(&t) - 75.4).abs() < 1e-9);
        assert_eq!(closed_form_price(&t), 75);
    }

    #[test]
    fn test_tie_rounds_to_even() {
        let t = trip(Station::Howrah, 1, Season::Summer, 15, BagSize::Medium, 50);
        assert!((exact_price(&t) - 24.5).abs() < 1e-9);
        assert_eq!(closed_form_price(&t), 24);
    }

    #[test]
    fn test_exact_tie_not_float_rounded() {
        // (8 + 4 + 38 + 5) * 1.1 is 60.50000000000001 in f64
        let t = trip(Station::NewDelhi, 1, Season::Monsoon, 10, BagSize::Small, 380);
        assert_eq!(base_x200(&t), 11_000);
        assert_eq!(closed_form_price(&t), 60);
    }

    #[test]
    fn test_extremes() {
        let low = trip(Station::Howrah, 1, Season::Winter, 10, BagSize::Small, 50);
        // (7 + 4 + 5 + 5) * 0.9 = 18.9
        assert_eq!(closed_form_price(&low), 19);
        let high = trip(Station::MumbaiCst, 10, Season::Festival, 100, BagSize::Large, 500);
        // (9 + 60 + 50 + 50) * 1.3 = 219.7
        assert_eq!(closed_form_price(&high), 220);
    }

    #[test]
    fn test_synthetic_trip_cycles() {
        let t = synthetic_trip(7);
        assert_eq!(t.station(), Station::Howrah);
        assert_eq!(t.season(), Season::Festival);
        assert_eq!(t.train_arrival_density(), 8);
        assert_eq!(t.num_bags(), 3);
        assert_eq!(t.total_weight_kg(), 17);
        assert_eq!(t.avg_bag_size(), BagSize::Medium);
        assert_eq!(t.platform_distance_m(), 57);

        let wrapped = synthetic_trip(449);
        assert_eq!(wrapped.total_weight_kg(), 10 + 449 % 90);
        assert_eq!(wrapped.platform_distance_m(), 499);
    }

    #[test]
    fn test_default_corpus_covers_every_level() {
        let corpus = Corpus::generate(DEFAULT_CORPUS_SIZE);
        assert_eq!(corpus.len(), 200);
        assert!(corpus.coverage().is_complete());
    }

    #[test]
    fn test_small_corpus_coverage() {
        assert!(Corpus::generate(5).coverage().is_complete());
        let partial = Corpus::generate(3).coverage();
        assert!(!partial.is_complete());
        assert_eq!(partial.stations.len(), 3);
    }

    #[test]
    fn test_empty_corpus() {
        let corpus = Corpus::generate(0);
        assert!(corpus.is_empty());
        assert_eq!(corpus.coverage(), Coverage::default());
    }

    #[test]
    fn test_labels_match_tariff() {
        let corpus = Corpus::generate(50);
        for (trip, price) in corpus.iter() {
            assert_eq!(closed_form_price(trip), price);
        }
    }

    #[test]
    fn test_write_csv() {
        let mut out = Vec::new();
        Corpus::generate(2).write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            concat!(
                "station,train_arrival_density,season,num_bags,",
                "total_weight_kg,avg_bag_size,platform_distance_m,price"
            )
        );
        assert!(lines[1].starts_with("New Delhi,1,Summer,1,10,Small,50,"));
        assert!(lines[2].starts_with("Mumbai CST,2,Monsoon,2,11,Medium,51,"));
    }

    fn any_trip() -> impl Strategy<Value = TripRecord> {
        (
            0..Station::ALL.len(),
            1u32..=10,
            0..Season::ALL.len(),
            1u32..=5,
            10u32..=100,
            0..BagSize::ALL.len(),
            50u32..=500,
        )
            .prop_map(|(st, density, se, bags, weight, size, distance)| {
                TripRecord::new(
                    Station::ALL[st],
                    density,
                    Season::ALL[se],
                    bags,
                    weight,
                    BagSize::ALL[size],
                    distance,
                )
                .unwrap()
            })
    }

    proptest! {
        #[test]
        fn prop_price_is_deterministic(t in any_trip()) {
            let again = t;
            prop_assert_eq!(closed_form_price(&t), closed_form_price(&again));
        }

        #[test]
        fn prop_price_within_half_of_exact(t in any_trip()) {
            let exact = exact_price(&t);
            let rounded = closed_form_price(&t) as f64;
            prop_assert!((rounded - exact).abs() <= 0.5 + 1e-9);
            prop_assert!(rounded >= 0.0);
        }

        #[test]
        fn prop_num_bags_does_not_affect_price(t in any_trip(), bags in 1u32..=5) {
            let other = TripRecord::new(
                t.station(),
                t.train_arrival_density(),
                t.season(),
                bags,
                t.total_weight_kg(),
                t.avg_bag_size(),
                t.platform_distance_m(),
            )
            .unwrap();
            prop_assert_eq!(closed_form_price(&t), closed_form_price(&other));
        }
    }
}
