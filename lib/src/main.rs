use anyhow::Context;
use clap::Parser;
use porter_fare::cli::{self, Cli};
use porter_fare::settings::Settings;
use porter_fare::telemetry;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref()).context("loading configuration")?;
    telemetry::init_logging(&settings.logging);

    cli::run(cli.command, &settings, &mut std::io::stdout().lock())
}
