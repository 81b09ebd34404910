//! GIG Tables Inspector
//!
//! Imports a tree-sequence table collection stored as JSON, optionally
//! decapitates it, freezes the result and prints the tables.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `GIG_CHROMOSOME`: chromosome stamped on every imported edge (default: none)
//! - `GIG_TIMEDELTA`: amount added to every node time (default: 0)
//! - `GIG_DECAPITATE`: remove nodes at or above this time (default: keep all)
//! - `GIG_MAX_LINES`: maximum rows printed per table (default: 40)
//! - `RUST_LOG`: log level filter (default: gig_tables=info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: json)
//!
//! ## Usage
//!
//! ```bash
//! GIG_DECAPITATE=100 cargo run --bin gig_tables_inspect -- tree_sequence.json
//! ```

use std::str::FromStr;

use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gig_tables::{ImportOptions, PrintOptions, Tables, TreeSequenceTables};

/// Initialize the tracing subscriber with JSON or pretty format
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gig_tables=info,gig_tables_inspect=info".into());

    if log_format == "pretty" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// Parse an optional environment variable, warning about unparseable values.
fn env_var<T: FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(variable = name, value = %raw, "ignoring unparseable environment variable");
            None
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let path = std::env::args()
        .nth(1)
        .ok_or("usage: gig_tables_inspect <tree-sequence.json>")?;

    let options = ImportOptions {
        chromosome: env_var("GIG_CHROMOSOME"),
        timedelta: env_var("GIG_TIMEDELTA").unwrap_or(0.0),
        time_units: None,
    };
    let print = PrintOptions {
        max_lines: env_var("GIG_MAX_LINES").unwrap_or_else(|| PrintOptions::default().max_lines),
    };

    info!(path = %path, version = env!("CARGO_PKG_VERSION"), "loading tree sequence");
    let source = TreeSequenceTables::from_json(&std::fs::read_to_string(&path)?)?;
    let mut tables = Tables::from_tree_sequence(&source, &options)?;

    if let Some(time) = env_var::<f64>("GIG_DECAPITATE") {
        tables.decapitate(time)?;
    }
    tables.freeze();

    info!(
        fingerprint = %tables.fingerprint()?,
        num_nodes = tables.nodes().len(),
        num_individuals = tables.individuals().len(),
        num_iedges = tables.iedges().len(),
        flags = ?tables.iedges().flags(),
        time_units = tables.time_units(),
        "published tables"
    );
    println!("{}", tables.render(&print));
    Ok(())
}
