//! geogate: diagnostics CLI
//!
//! Shows the canonical form and cache key a query maps to, and the
//! effective configuration after file and environment resolution.

use clap::{Parser, Subcommand};

use geogate::normalize;
use geogate::{Config, Partition};

/// Geogate diagnostics
#[derive(Parser)]
#[command(name = "geogate")]
#[command(version = geogate::PKG_VERSION)]
#[command(about = "Geogate cache key and configuration diagnostics")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the canonical form and cache key for a query
    Key {
        #[command(subcommand)]
        query: KeyQuery,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Path to configuration file.
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,
    },
}

#[derive(Subcommand)]
enum KeyQuery {
    /// Free-text address
    Address {
        /// Address text; several words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Coordinate pair
    Coords {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lng: f64,
    },

    /// IP literal (hashed as given)
    Ip { ip: String },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    match args.command {
        Command::Key { query } => print_key(query),
        Command::Config { config } => {
            let config = Config::load(config.as_deref())?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn print_key(query: KeyQuery) {
    let (partition, canonical, key) = match query {
        KeyQuery::Address { text } => {
            let raw = text.join(" ");
            (
                Partition::Address,
                normalize::normalize_address(&raw),
                normalize::address_key(&raw),
            )
        }
        KeyQuery::Coords { lat, lng } => (
            Partition::ReverseGeocode,
            normalize::canonical_coordinates(lat, lng),
            normalize::coordinate_key(lat, lng),
        ),
        KeyQuery::Ip { ip } => (Partition::Ip, ip.clone(), normalize::ip_key(&ip)),
    };

    println!("partition: {partition}");
    println!("canonical: {canonical}");
    println!("key:       {key}");
}
