use std::env;
use std::process::ExitCode;

use anyhow::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use timestamp_dimension::verify::verify_file;
use timestamp_dimension::{Config, CountrySet};

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Exit with a failure status when any issue is found, so that the check can gate a pipeline.
fn main() -> anyhow::Result<ExitCode> {
    init_tracing();
    let mut config = Config::default();

    if let Some(input) = env::args().nth(1) {
        config = config.with_output(input);
    }

    if let Some(path) = env::args().nth(2) {
        let countries = CountrySet::load(&path)
            .with_context(|| format!("could not load countries from {path}"))?;

        config = config.with_countries(countries);
    }

    let report = verify_file(config.output(), &config)
        .with_context(|| format!("failed to read {}", config.output().display()))?;

    print!("{report}");

    if report.passed() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
