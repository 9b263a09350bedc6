use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use cityguide::catalog::FilterCounts;
use cityguide::config::StorageBackend;
use cityguide::geolocation::FixedPositionProvider;
use cityguide::models::Position;
use cityguide::{
    Catalog, CatalogLoader, CityGuideConfig, CityGuideError, Coordinates, EmptyState,
    FjallStore, MemoryStore, ProximityEngine, QuickFilter, Session, SiteFilter, StateStore,
    VisitFilter, logging, request_position,
};

#[derive(Parser)]
#[command(
    name = "cityguide",
    version,
    about = "Track the sites you visit in a city and how far they are on foot"
)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List catalog sites
    List {
        /// all, visited, unvisited or priority
        #[arg(long, default_value = "all")]
        filter: VisitFilter,
        /// quick-visit, short-visit, less-crowded, must-see or hidden-gems (repeatable)
        #[arg(long = "quick")]
        quick: Vec<QuickFilter>,
        /// Your position as LAT,LNG
        #[arg(long, allow_hyphen_values = true)]
        near: Option<Coordinates>,
        /// Only sites within this many minutes on foot
        #[arg(long)]
        max_minutes: Option<u32>,
        /// Nearest sites first
        #[arg(long)]
        sort_nearest: bool,
    },
    /// Mark a site visited, or unmark it
    Toggle { site_id: String },
    /// Flag or unflag a site as priority
    Priority {
        site_id: String,
        #[arg(value_parser = parse_on_off)]
        enabled: bool,
    },
    /// Rate a site from 1 to 5 stars; omit the stars to clear the rating
    Rate { site_id: String, stars: Option<u8> },
    /// Show how much of the city you have seen
    Progress,
}

fn parse_on_off(value: &str) -> Result<bool, String> {
    match value {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        other => Err(format!("expected on or off, got '{other}'")),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<CityGuideError>() {
                Some(e) => eprintln!("Error: {}", e.user_message()),
                None => eprintln!("Error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = CityGuideConfig::load_from_path(cli.config.clone())?;
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    logging::init(&config.logging)?;

    let catalog = match &config.catalog.path {
        Some(path) => CatalogLoader::load_from_path(path)?,
        None => CatalogLoader::load_builtin(config.catalog.city)?,
    };

    let store: Box<dyn StateStore> = match config.storage.backend {
        StorageBackend::Fjall => {
            std::fs::create_dir_all(&config.storage.location).with_context(|| {
                format!(
                    "Failed to create data directory: {}",
                    config.storage.location.display()
                )
            })?;
            Box::new(FjallStore::open(&config.storage.location)?)
        }
        StorageBackend::Memory => Box::new(MemoryStore::new()),
    };
    let mut session = Session::open(store)?;

    if cli.verbose {
        println!("Using config from: {}", describe_config_path(cli.config.as_ref()));
        println!("Data location: {}", config.storage.location.display());
        println!("Log level: {}", config.logging.level);
    }

    match cli.command {
        None => print_summary(&catalog, &session),
        Some(Command::List {
            filter,
            quick,
            near,
            max_minutes,
            sort_nearest,
        }) => {
            if let Some(coordinates) = near {
                let provider = FixedPositionProvider::new(Position::new(
                    coordinates.latitude,
                    coordinates.longitude,
                )?);
                let timeout = Duration::from_millis(config.proximity.geolocation_timeout_ms);
                session.apply_position(request_position(&provider, timeout).await);
            }

            let mut site_filter = SiteFilter::new(filter);
            site_filter.quick.extend(quick);
            let engine = ProximityEngine::new(config.proximity.walking_speed_kmh)?;
            let max_minutes = max_minutes.or(config.proximity.default_max_walking_minutes);
            list_sites(&catalog, &session, &site_filter, &engine, max_minutes, sort_nearest)?;
        }
        Some(Command::Toggle { site_id }) => {
            let site = known_site(&catalog, &site_id)?;
            let visited = session.toggle_visited(&site_id)?;
            let progress = session.state().progress(&catalog);
            println!(
                "{} {} ({}/{} visited)",
                if visited { "Visited" } else { "Not visited" },
                site.name,
                progress.visited,
                progress.total
            );
        }
        Some(Command::Priority { site_id, enabled }) => {
            let site = known_site(&catalog, &site_id)?;
            session.set_priority(&site_id, enabled)?;
            println!(
                "{} {}",
                site.name,
                if enabled { "is a priority" } else { "is no longer a priority" }
            );
        }
        Some(Command::Rate { site_id, stars }) => {
            let site = known_site(&catalog, &site_id)?;
            session.set_rating(&site_id, stars)?;
            match stars {
                Some(stars) => println!("Rated {} {}/5", site.name, stars),
                None => println!("Cleared rating for {}", site.name),
            }
        }
        Some(Command::Progress) => {
            let progress = session.state().progress(&catalog);
            println!(
                "{}: {} of {} sites visited ({:.0}%)",
                catalog.city(),
                progress.visited,
                progress.total,
                progress.percentage
            );
        }
    }

    Ok(())
}

fn describe_config_path(path: Option<&PathBuf>) -> String {
    path.cloned()
        .or_else(CityGuideConfig::get_config_path)
        .map_or_else(|| "defaults".to_string(), |p| p.display().to_string())
}

fn known_site<'a>(catalog: &'a Catalog, site_id: &str) -> Result<&'a cityguide::Site> {
    match catalog.get(site_id) {
        Some(site) => Ok(site),
        None => bail!("No site '{}' in the {} catalog", site_id, catalog.city()),
    }
}

fn print_summary<S: StateStore>(catalog: &Catalog, session: &Session<S>) {
    let state = session.state();
    let progress = state.progress(catalog);
    let counts: FilterCounts = state.filter_counts(catalog);

    println!("CityGuide - {}", catalog.city());
    println!(
        "All sites ({}) | To visit ({}) | Visited ({}) | Priority ({})",
        counts.all, counts.unvisited, counts.visited, counts.priority
    );
    if progress.visited > 0 {
        println!("Your progress: {} of {}", progress.visited, progress.total);
    }
    println!("Run `cityguide list --help` to browse sites.");
}

fn list_sites<S: StateStore>(
    catalog: &Catalog,
    session: &Session<S>,
    filter: &SiteFilter,
    engine: &ProximityEngine,
    max_minutes: Option<u32>,
    sort_nearest: bool,
) -> Result<()> {
    let state = session.state();
    let filtered = filter.apply(catalog.sites(), &state.visited, Some(&state.annotations));
    let position = state.position.as_ref().map(|p| &p.coordinates);

    let mut measured = engine.measure(filtered.sites().iter().copied(), position)?;
    if let Some(max) = max_minutes {
        measured = ProximityEngine::within_walking_time(measured, max);
    }
    if sort_nearest {
        ProximityEngine::rank_by_proximity(&mut measured);
    }

    if measured.is_empty() {
        let message = if !filtered.is_empty() {
            "No sites are within walking range."
        } else {
            match EmptyState::classify(filter.mode, &state.progress(catalog)) {
                EmptyState::NothingVisitedYet => {
                    "Start exploring and mark your first site!"
                }
                EmptyState::AllVisited => "Congratulations! You've visited all the sites!",
                EmptyState::NoMatch => "No sites match your filter.",
            }
        };
        println!("{message}");
        return Ok(());
    }

    for entry in &measured {
        let site = entry.site;
        let mark = if state.visited.contains(&site.id) { "x" } else { " " };
        let priority = if state.annotations.is_priority(&site.id) { " *" } else { "" };
        let walk = entry
            .formatted_walking_time()
            .map(|t| format!(" - {t} walk"))
            .unwrap_or_default();
        println!(
            "[{mark}] {} ({}){priority} - {} - {} crowd - {}{walk}",
            site.name, site.id, site.duration, site.crowd_level, site.popularity
        );
    }
    Ok(())
}
