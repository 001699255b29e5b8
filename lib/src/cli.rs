//! Command-line surface of `porter-fare`.
//!
//! - `quote`: estimate one trip, optionally confirm the booking
//! - `corpus`: export the synthetic corpus as CSV
//! - `evaluate`: train and print the training fit
//!
//! Commands write to the given writer so they can be driven from tests.

use crate::fare::{
    BagSize, Booking, Corpus, FareError, LazyEstimator, Quote, Season, Station, TripRecord,
};
use crate::settings::Settings;
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Porter fare estimator for railway stations
#[derive(Parser, Debug)]
#[command(name = "porter-fare")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Extra configuration file, layered above config/default and config/local
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Estimate the fare for one trip
    Quote(QuoteArgs),

    /// Write the synthetic training corpus as CSV
    Corpus {
        /// Number of records (defaults to corpus.size)
        #[arg(long)]
        size: Option<usize>,

        /// Output file; stdout when omitted
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Train and print how well the model fits its corpus
    Evaluate,
}

#[derive(Args, Debug)]
pub struct QuoteArgs {
    #[arg(long)]
    pub station: Station,

    #[arg(long)]
    pub season: Season,

    /// Train arrival density, 1 (quiet) to 10 (rush)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=10))]
    pub density: u32,

    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=5))]
    pub bags: u32,

    /// Total luggage weight in kg
    #[arg(long, value_parser = clap::value_parser!(u32).range(10..=100))]
    pub weight: u32,

    #[arg(long)]
    pub bag_size: BagSize,

    /// Walking distance on the platform in metres
    #[arg(long, value_parser = clap::value_parser!(u32).range(50..=500))]
    pub distance: u32,

    /// Request a porter after quoting
    #[arg(long)]
    pub confirm: bool,

    /// Print a JSON object instead of text
    #[arg(long)]
    pub json: bool,
}

impl QuoteArgs {
    pub fn trip(&self) -> Result<TripRecord, FareError> {
        TripRecord::new(
            self.station,
            self.density,
            self.season,
            self.bags,
            self.weight,
            self.bag_size,
            self.distance,
        )
    }
}

/// Runs one parsed command against `settings`, writing its output to `out`.
pub fn run<W: Write>(command: Command, settings: &Settings, out: &mut W) -> anyhow::Result<()> {
    match command {
        Command::Quote(args) => quote(settings, &args, out),
        Command::Corpus { size, output } => corpus(settings, size, output.as_deref(), out),
        Command::Evaluate => evaluate(settings, out),
    }
}

fn estimator(settings: &Settings) -> LazyEstimator {
    LazyEstimator::new(settings.corpus.size, settings.estimator.clone())
}

fn quote<W: Write>(settings: &Settings, args: &QuoteArgs, out: &mut W) -> anyhow::Result<()> {
    let trip = args.trip()?;
    let quote = estimator(settings)
        .get()
        .context("training fare estimator")?
        .quote(&trip)?;
    write_quote(out, quote, args.confirm, args.json)?;
    Ok(())
}

/// Renders a quote as text or JSON, running the confirmation when asked.
///
/// The JSON form is one object `{trip, price, accepted}`.
pub fn write_quote<W: Write>(
    out: &mut W,
    quote: Quote,
    confirm: bool,
    json: bool,
) -> std::io::Result<()> {
    let booking = Booking::new(quote);
    if json {
        let accepted = confirm && booking.confirm().accepted();
        let value = serde_json::json!({
            "trip": quote.trip,
            "price": quote.price,
            "accepted": accepted,
        });
        serde_json::to_writer_pretty(&mut *out, &value)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "Estimated porter charge: ₹{}", quote.price)?;
    if confirm {
        for message in booking.confirm().messages() {
            writeln!(out, "{}", message)?;
        }
    }
    Ok(())
}

fn corpus<W: Write>(
    settings: &Settings,
    size: Option<usize>,
    output: Option<&Path>,
    out: &mut W,
) -> anyhow::Result<()> {
    let corpus = Corpus::generate(size.unwrap_or(settings.corpus.size));
    match output {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("creating {}", path.display()))?;
            corpus.write_csv(BufWriter::new(file))?;
        }
        None => corpus.write_csv(out)?,
    }
    Ok(())
}

fn evaluate<W: Write>(settings: &Settings, out: &mut W) -> anyhow::Result<()> {
    let estimator = estimator(settings)
        .get()
        .context("training fare estimator")?;
    let report = serde_json::to_string(&estimator.training_report())?;
    writeln!(out, "training fit: {}", report)?;
    writeln!(out, "encoded features: {}", estimator.encoded_width())?;
    Ok(())
}
