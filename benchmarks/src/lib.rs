//! Shared inputs for the porter_fare benchmarks.

use porter_fare::fare::simulator::synthetic_trip;
use porter_fare::fare::TripRecord;

/// Trips spread over the feature space, mostly absent from the default corpus.
pub fn sample_trips(n: usize) -> Vec<TripRecord> {
    (0..n).map(|i| synthetic_trip(i * 7 + 3)).collect()
}
