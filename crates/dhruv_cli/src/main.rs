use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use dhruv_rectify::{
    BirthData, DashaPeriodProvider, DefaultEngine, EphemerisProvider, LifeEvent, LogProgress,
    PositionProvider, RectifyConfig, VimshottariProvider, Warning, config,
};
use dhruv_vedic_base::{ALL_GRAHAS, nakshatra_from_longitude, rashi_from_longitude};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dhruv", about = "Dhruv birth-time rectification CLI")]
struct Cli {
    /// Log filter (overrides RUST_LOG), e.g. `info` or `dhruv_rectify=debug`
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rectify a birth time and print the JSON result
    Rectify {
        /// Birth data JSON: {date, time, latitude, longitude, timezone}
        #[arg(long)]
        input: PathBuf,
        /// Life events JSON array
        #[arg(long)]
        events: Option<PathBuf>,
        /// TOML config; built-in defaults when omitted
        #[arg(long)]
        config: Option<PathBuf>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Positions, houses, dignities and scores for one time and place
    Chart {
        #[command(flatten)]
        birth: BirthArgs,
        /// TOML config for ayanamsha, houses and scoring weights
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Active Vimshottari periods at a date for a birth chart
    Dasha {
        #[command(flatten)]
        birth: BirthArgs,
        /// Query date (YYYY-MM-DD), taken at 00:00 UTC
        #[arg(long)]
        at: String,
        /// TOML config for ayanamsha and houses
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct BirthArgs {
    /// Local date (YYYY-MM-DD)
    #[arg(long)]
    date: String,
    /// Local time (HH:MM or HH:MM:SS)
    #[arg(long)]
    time: String,
    /// Latitude in degrees, north positive
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,
    /// Longitude in degrees, east positive
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,
    /// Fixed UTC offset, e.g. +05:30
    #[arg(long, default_value = "UTC", allow_hyphen_values = true)]
    tz: String,
}

impl BirthArgs {
    fn to_birth_data(&self) -> BirthData {
        BirthData {
            date: self.date.clone(),
            time: self.time.clone(),
            latitude: self.lat,
            longitude: self.lon,
            timezone: self.tz.clone(),
        }
    }
}

fn fail(msg: impl Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> T {
    let raw = fs::read_to_string(path)
        .unwrap_or_else(|e| fail(format!("cannot read {what} {}: {e}", path.display())));
    serde_json::from_str(&raw)
        .unwrap_or_else(|e| fail(format!("invalid {what} {}: {e}", path.display())))
}

/// Loaded config, or defaults plus whether defaults were used.
fn load_config(path: Option<&Path>) -> (RectifyConfig, bool) {
    match path {
        Some(path) => (config::load(path).unwrap_or_else(|e| fail(e)), false),
        None => (RectifyConfig::default(), true),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    match cli.command {
        Commands::Rectify {
            input,
            events,
            config,
            pretty,
        } => {
            let birth: BirthData = read_json(&input, "birth data");
            let events: Vec<LifeEvent> = events
                .as_deref()
                .map(|p| read_json(p, "events"))
                .unwrap_or_default();
            let (cfg, defaulted) = load_config(config.as_deref());
            if defaulted {
                tracing::warn!("no config supplied; using defaults");
            }

            let engine = DefaultEngine::with_defaults(cfg).unwrap_or_else(|e| fail(e));
            let mut result = engine
                .rectify_with_progress(&birth, &events, &LogProgress)
                .unwrap_or_else(|e| fail(e));
            if defaulted {
                result.warnings.insert(0, Warning::MissingConfig);
            }

            let json = if pretty {
                serde_json::to_string_pretty(&result)
            } else {
                serde_json::to_string(&result)
            };
            println!("{}", json.unwrap_or_else(|e| fail(e)));
        }

        Commands::Chart { birth, config } => {
            let resolved = birth.to_birth_data().resolve().unwrap_or_else(|e| fail(e));
            let (cfg, _) = load_config(config.as_deref());
            let engine = DefaultEngine::with_defaults(cfg).unwrap_or_else(|e| fail(e));
            let candidate = engine
                .evaluate_at(resolved.utc, &resolved.location, &[])
                .unwrap_or_else(|e| fail(e));
            let (chart, strength, harmony) =
                (&candidate.positions, &candidate.strength, &candidate.harmony);

            println!("Time (UTC): {}", chart.time);
            println!("Ayanamsha: {:.4} deg", chart.ayanamsha_deg);
            let asc = rashi_from_longitude(chart.ascendant);
            println!(
                "Lagna: {:.4} deg ({} / {} {:.2} deg)",
                chart.ascendant,
                asc.rashi.name(),
                asc.rashi.western_name(),
                asc.degrees_in_rashi
            );
            println!();
            println!(
                "{:<10} {:>9} {:<11} {:<18} {:>5} {:>8} {:<12} {:>8}",
                "Graha", "Lon", "Rashi", "Nakshatra", "House", "Speed", "Dignity", "Strength"
            );
            for graha in ALL_GRAHAS {
                let (Some(body), Some(s)) = (chart.body(graha), strength.bodies.get(&graha)) else {
                    continue;
                };
                let rashi = rashi_from_longitude(body.longitude);
                let nak = nakshatra_from_longitude(body.longitude);
                println!(
                    "{:<10} {:>9.4} {:<11} {:<18} {:>5} {:>8.4} {:<12} {:>8.3}",
                    graha.name(),
                    body.longitude,
                    rashi.rashi.name(),
                    format!("{} {}", nak.name, nak.pada),
                    body.house,
                    body.speed,
                    format!("{:?}", s.dignity),
                    s.total
                );
            }
            println!();
            println!("Mean strength: {:.3}", strength.score);
            println!(
                "Harmony: {:.3} (aspects {:.3}, houses {:.3}, yogas {:.3})",
                harmony.score, harmony.aspect_harmony, harmony.house_balance, harmony.yoga_strength
            );
            if !harmony.yogas.is_empty() {
                println!("Yogas: {:?}", harmony.yogas);
            }
            println!(
                "Elemental: {:.3}  Confidence (no events): {:.3}",
                candidate.elemental.score,
                candidate.overall()
            );
        }

        Commands::Dasha { birth, at, config } => {
            let resolved = birth.to_birth_data().resolve().unwrap_or_else(|e| fail(e));
            let at: DateTime<Utc> = NaiveDate::parse_from_str(&at, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
                .unwrap_or_else(|| fail(format!("invalid date: {at}")));
            let (cfg, _) = load_config(config.as_deref());
            let provider =
                EphemerisProvider::with_chart_config(cfg.chart).unwrap_or_else(|e| fail(e));
            let natal = provider
                .compute(resolved.utc, &resolved.location)
                .unwrap_or_else(|e| fail(e));
            let periods = VimshottariProvider
                .active_periods(&natal, at)
                .unwrap_or_else(|e| fail(e));
            if periods.is_empty() {
                println!("No period active at {at} (before birth)");
                return;
            }
            for (label, lord) in [
                ("Mahadasha", periods.major),
                ("Antardasha", periods.sub),
                ("Pratyantardasha", periods.sub_sub),
            ] {
                if let Some(lord) = lord {
                    println!("{label:<16} {}", lord.name());
                }
            }
        }
    }
}
