// Dashboard CLI
// Run with: cargo run --bin astroscope -- asteroids --search apophis

use astroscope::{
    config::Config,
    dashboard::{AsteroidBoard, EventBoard, LoadState},
    eonet::EonetClient,
    error::DynErr,
    filter::CategoryFilter,
    metrics::MetricsRegistry,
    neo::{FeedRange, NeoClient},
    notify::{ConsoleNotifier, LogNotifier},
    render,
};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "astroscope", about = "Near-Earth asteroids and natural events from NASA open data")]
struct Cli {
    /// Print Prometheus metrics before exiting
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Asteroids approaching Earth in a date window
    Asteroids {
        /// Case-insensitive name filter
        #[arg(long, default_value = "")]
        search: String,

        /// First day of the window (YYYY-MM-DD); defaults to today
        #[arg(long, requires = "end")]
        start: Option<NaiveDate>,

        /// Last day of the window (YYYY-MM-DD)
        #[arg(long, requires = "start")]
        end: Option<NaiveDate>,
    },
    /// Open natural events from the last ten days
    Events {
        /// all, wildfires, volcanoes, storms or floods
        #[arg(long, default_value = "all")]
        category: CategoryFilter,
    },
    /// Headline numbers for both views
    Overview,
}

#[tokio::main]
async fn main() -> Result<(), DynErr> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let cfg = Config::from_env();
    let registry = MetricsRegistry::new();
    info!(config = ?cfg, "Starting astroscope");

    match cli.command {
        Command::Asteroids { search, start, end } => {
            let range = start.zip(end).map(|(start, end)| FeedRange::new(start, end));
            run_asteroids(&cfg, range, search).await;
        }
        Command::Events { category } => run_events(&cfg, category).await,
        Command::Overview => run_overview(&cfg).await,
    }

    if cli.metrics {
        println!("{}", registry.gather_metrics());
    }

    Ok(())
}

async fn run_asteroids(cfg: &Config, range: Option<FeedRange>, search: String) {
    let client = NeoClient::new(cfg);
    let mut board = AsteroidBoard::new();

    board.load(&client, range, &ConsoleNotifier).await;
    board.set_search(search);

    println!("{}\n", "Asteroid Tracker".bold());
    println!("{}\n", render::asteroid_summary(&board.stats()));

    let visible = board.visible();
    if visible.is_empty() {
        println!("{}", render::empty_asteroids(board.search()));
        return;
    }
    for asteroid in visible.iter() {
        println!("{}", render::asteroid_card(asteroid));
    }
}

async fn run_events(cfg: &Config, category: CategoryFilter) {
    let client = EonetClient::new(cfg);
    let mut board = EventBoard::new();

    board.load(&client, Utc::now(), &ConsoleNotifier).await;
    board.select_category(category);

    println!("{}", "Natural Events Monitor".bold());
    println!("Categories: {}\n", render::category_legend());
    println!("{}\n", render::event_summary(&board.stats()));

    let visible = board.visible();
    if visible.is_empty() {
        println!("{}", render::empty_events(&board.category().to_string()));
    }
    for event in visible.iter() {
        println!("{}", render::event_card(event));
    }

    println!("{}", render::map_placeholder().dimmed());
}

async fn run_overview(cfg: &Config) {
    let neo = NeoClient::new(cfg);
    let eonet = EonetClient::new(cfg);
    let mut asteroids = AsteroidBoard::new();
    let mut events = EventBoard::new();

    futures::join!(
        asteroids.load(&neo, None, &LogNotifier),
        events.load(&eonet, Utc::now(), &LogNotifier),
    );

    println!("{}", "Asteroids".bold());
    match asteroids.state() {
        LoadState::Ready => println!("  {}", render::asteroid_summary(&asteroids.stats())),
        _ => println!("  unavailable"),
    }

    println!("{}", "Natural events".bold());
    match events.state() {
        LoadState::Ready => println!("  {}", render::event_summary(&events.stats())),
        _ => println!("  unavailable"),
    }
}
