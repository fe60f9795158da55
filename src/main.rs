use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use colored::Colorize;
use spaceship_library::{
    Book, Catalog, FailureAlarm, IntergalacticMissionService, Library, Loanable, MissionPolicy,
    Pilot, PilotMember, SpaceLibrary, Spaceship, TransitionLogger,
    delivery::{DeliveryRequest, DeliverySystem},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for the spaceship library demo
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log every state change (same as RUST_LOG=spaceship_library=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Demo scenarios
#[derive(Subcommand, Debug)]
enum Command {
    /// Lend ships like books and fly knowledge missions with them
    Adapter {
        /// Lending rules as a JSON file
        #[arg(long)]
        policy: Option<PathBuf>,

        /// Print the mission registry as JSON at the end
        #[arg(long)]
        json: bool,
    },
    /// Alert ships about new books and assign deliveries
    Observer {
        /// Print the activity log as JSON at the end
        #[arg(long)]
        json: bool,
    },
}

/// Install the tracing subscriber, honoring `RUST_LOG` when set
fn init_tracing(verbose: bool) {
    let default = if verbose { "spaceship_library=debug" } else { "spaceship_library=info" };
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default.into()),
    );

    tracing_subscriber::registry().with(filter).with(tracing_subscriber::fmt::layer()).init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let outcome = match cli.command {
        Command::Adapter { policy, json } => adapter_demo(policy, json),
        Command::Observer { json } => observer_demo(json),
    };

    match outcome {
        Ok(()) => {
            println!("\n{}", "Demonstration complete!".green().bold());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

/// Lend ships through the adapter and run one successful and one failed mission
fn adapter_demo(policy: Option<PathBuf>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", "Spaceship Library: Adapter Demonstration".green().bold());
    println!("=========================================\n");

    let policy = match policy {
        Some(path) => MissionPolicy::from_json_file(path)?,
        None => MissionPolicy::default(),
    };

    let mut library = SpaceLibrary::with_policy("Starfleet Academy Library", policy);
    library.add_ship(Spaceship::new("Enterprise", 100));
    library.add_ship(Spaceship::new("Millennium Falcon", 150));
    library.add_ship(Spaceship::new("Serenity", 40));
    library.add_book(Book::new("Python Programming", "978-0001"));
    library.add_book(Book::new("Space Travel Techniques", "978-0002"));
    library.add_book(Book::new("Design Patterns", "978-0003"));
    library.add_book(Book::new("The Hitchhiker's Guide", "978-0004"));
    library.add_book(Book::new("Astrophysics Basics", "978-0005"));
    library.add_member(PilotMember::with_qualification("Jean-Luc Picard", "P-001", 5)?);
    library.add_member(PilotMember::with_qualification("Malcolm Reynolds", "P-002", 2)?);

    println!("{}", library.description());
    println!("{}", "\nAvailable spaceships:".yellow().bold());
    for ship in library.list_available() {
        println!(
            "  {} [{}] fuel {}",
            ship.title(),
            ship.identifier(),
            ship.spaceship().fuel_level()
        );
    }

    let mut service = IntergalacticMissionService::new(library);
    service.register_observer(Box::new(TransitionLogger));
    service.register_observer(Box::new(FailureAlarm));

    println!("{}", "\nMission to Alpha Centauri".yellow().bold());
    let id = service.prepare_mission("Enterprise", "P-001", "Alpha Centauri", &["978-0001", "978-0002"])?;
    service.launch_mission(id)?;
    if let Some(ship) = service.library().ship("Enterprise") {
        println!("  Enterprise launched, fuel left: {}", ship.spaceship().fuel_level());
    }
    if let Some(pilot) = service.library().member("P-001") {
        println!("  Captain {} now has {:.1} flight hours", pilot.name(), pilot.flight_hours());
    }
    service.complete_mission(id)?;
    println!("  Mission {id} completed, Enterprise back at the hub and refueled");

    println!("{}", "\nMission to the Andromeda Galaxy".yellow().bold());
    let id = service.prepare_mission(
        "Serenity",
        "P-002",
        "Andromeda Galaxy",
        &["978-0003", "978-0004", "978-0005"],
    )?;
    match service.launch_mission(id) {
        Ok(()) => println!("  Serenity launched"),
        Err(err) => println!("  {} {err}", "Launch aborted:".red()),
    }

    println!("{}", "\nMissions:".yellow().bold());
    for mission in service.missions().values() {
        println!("  #{} {} to {}: {}", mission.id, mission.ship, mission.destination, mission.status());
    }

    if json {
        println!("{}", service.missions_json()?);
    }

    Ok(())
}

/// Watch a library for new books and hand the resulting deliveries to ships
fn observer_demo(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", "Spaceship Library: Observer Demonstration".green().bold());
    println!("==========================================\n");

    let mut library = Library::new("Galactic Archives", 100);
    let mut system = DeliverySystem::new();
    system.register_observer(Box::new(TransitionLogger));
    let mut monitor = system.initialize(&library);

    let mut enterprise = Spaceship::new("Enterprise", 100);
    enterprise.assign_pilot(Pilot::new("James T. Kirk"));
    let mut voyager = Spaceship::new("Voyager", 80);
    voyager.assign_pilot(Pilot::new("Kathryn Janeway"));
    let ships = vec![enterprise.shared(), voyager.shared()];
    for ship in &ships {
        system.register_spaceship(&mut monitor, ship);
    }

    println!("{}", "New books arrive".yellow().bold());
    library.receive_books(5);
    let found = monitor.check_for_new_books(&library);
    println!("  New books detected: {found}");
    for ship in &ships {
        let ship = ship.borrow();
        println!("  {} has {} active missions", ship.name(), ship.current_missions().len());
    }

    println!("{}", "\nUrgent delivery".yellow().bold());
    let request = DeliveryRequest::new("Rare Manuscripts", "Vulcan")
        .with_priority(4)
        .with_requirement("climate control");
    let assignment = system.assign_mission(&request, &ships)?;
    println!("  Assigned to {} ({} fuel used)", assignment.ship_name, assignment.fuel_used);
    system.record_mission_completion(&assignment.ship, &request)?;
    println!("  Delivered: {}", system.verify_book_delivered(&request.title));

    println!("{}", "\nPilot reports".yellow().bold());
    for ship in &ships {
        if let Some(pilot) = ship.borrow().pilot() {
            println!("{}\n", pilot.status_report());
        }
    }

    println!("{}", "Activity log".yellow().bold());
    for entry in system.activity_log() {
        println!("  {entry}");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(system.activity_log())?);
    }

    Ok(())
}
