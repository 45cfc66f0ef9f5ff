use std::env;
use std::io;

use anyhow::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use timestamp_dimension::{BuiltinHolidays, Config, CountrySet, DimensionTable};

const SAMPLE_SIZE: usize = 10;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let mut config = Config::default();

    if let Some(output) = env::args().nth(1) {
        config = config.with_output(output);
    }

    if let Some(path) = env::args().nth(2) {
        let countries = CountrySet::load(&path)
            .with_context(|| format!("could not load countries from {path}"))?;

        config = config.with_countries(countries);
    }

    let table = DimensionTable::build(&config, &BuiltinHolidays::new())
        .context("failed to generate dimension table")?;

    println!("\nSample data:");
    let sample_len = table.len().min(SAMPLE_SIZE);
    let sample = DimensionTable::from_rows(table.rows()[..sample_len].to_vec());
    sample.write_csv(io::stdout().lock())?;

    println!("\nData summary:");
    print!("{}", table.stats());

    table
        .save(config.output())
        .context("failed to save dimension table")?;

    println!("\nDimension table saved to: {}", config.output().display());
    Ok(())
}
