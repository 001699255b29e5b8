//! End-to-end fare estimation example
//!
//! This example walks through the whole flow:
//! - Generating the synthetic corpus and checking its coverage
//! - Fitting the estimator and reading its training fit
//! - Quoting trips in different seasons against the exact tariff
//! - Confirming a booking
//!
//! Run with: cargo run --example quote_trip

use porter_fare::fare::simulator::exact_price;
use porter_fare::fare::{
    BagSize, Booking, Corpus, EstimatorSettings, FareEstimator, Season, Station, TripRecord,
};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    println!("=== Porter Fare Estimation ===\n");

    let corpus = Corpus::generate(200);
    let coverage = corpus.coverage();
    println!(
        "Corpus: {} trips, {} stations, {} seasons, {} bag sizes",
        corpus.len(),
        coverage.stations.len(),
        coverage.seasons.len(),
        coverage.bag_sizes.len()
    );

    let estimator = FareEstimator::fit(&corpus, &EstimatorSettings::default())?;
    println!("Training fit: {}\n", estimator.training_report());

    let base = TripRecord::new(Station::NewDelhi, 5, Season::Summer, 2, 30, BagSize::Medium, 100)?;
    println!("{:<10} {:>8} {:>10}", "season", "tariff", "estimate");
    for &season in Season::ALL {
        let trip = base.with_season(season);
        println!(
            "{:<10} {:>8.2} {:>10}",
            season,
            exact_price(&trip),
            estimator.predict(&trip)?
        );
    }

    let quote = estimator.quote(&"Howrah".parse::<Station>().map(|s| base.with_station(s))?)?;
    println!("\nQuote for Howrah: ₹{}", quote.price);

    let accepted = Booking::new(quote).confirm();
    for message in accepted.messages() {
        println!("{}", message);
    }

    Ok(())
}
