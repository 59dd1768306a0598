//! Campus navigation runner.
//!
//! Walks a simulated position from the fallback location to a faculty
//! office and logs every update. There is no device on the command line,
//! so the initial fix request always falls back to the configured
//! default location.
//!
//! Usage:
//!   cargo run -p campus_nav --bin campus_nav -- [OPTIONS]
//!
//! Options:
//!   -d, --destination <ID>    Destination id (default: prof-101)
//!   --list                    List destinations and exit
//!   --config <FILE>           JSON configuration file
//!   --directory <FILE>        JSON faculty directory
//!   --step <DEG>              Simulation step in degrees (default: 0.00005)
//!   --tick-ms <MS>            Simulation tick period (default: 100)
//!   --arrival-radius <M>      Arrival radius in meters (default: 20)
//!
//! Set `RUST_LOG=debug` for per-tick output.

use std::env;
use std::process;
use std::str::FromStr;
use std::sync::Arc;

use campus_nav::{
    Directory, LocationError, LogPresenter, MockLocationProvider, NavigationController,
    NavigationMode, NavigatorConfig, SourcePreference, StaticDirectory, StraightLineRouter,
};

struct Args {
    destination: String,
    list: bool,
    config: Option<String>,
    directory: Option<String>,
    step_deg: Option<f64>,
    tick_ms: Option<u64>,
    arrival_radius_m: Option<f64>,
}

fn parse_args() -> Args {
    let mut args = Args {
        destination: "prof-101".to_string(),
        list: false,
        config: None,
        directory: None,
        step_deg: None,
        tick_ms: None,
        arrival_radius_m: None,
    };

    let raw: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < raw.len() {
        match raw[i].as_str() {
            "-d" | "--destination" => {
                i += 1;
                args.destination = string_arg(&raw, i, "destination");
            }
            "--list" => args.list = true,
            "--config" => {
                i += 1;
                args.config = Some(string_arg(&raw, i, "config"));
            }
            "--directory" => {
                i += 1;
                args.directory = Some(string_arg(&raw, i, "directory"));
            }
            "--step" => {
                i += 1;
                args.step_deg = Some(parse_arg(&raw, i, "step"));
            }
            "--tick-ms" => {
                i += 1;
                args.tick_ms = Some(parse_arg(&raw, i, "tick-ms"));
            }
            "--arrival-radius" => {
                i += 1;
                args.arrival_radius_m = Some(parse_arg(&raw, i, "arrival-radius"));
            }
            "-h" | "--help" => {
                print_usage();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown option: {other}");
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    args
}

fn string_arg(raw: &[String], i: usize, name: &str) -> String {
    raw.get(i).cloned().unwrap_or_else(|| {
        eprintln!("Error: --{name} requires a value");
        process::exit(1);
    })
}

fn parse_arg<T: FromStr>(raw: &[String], i: usize, name: &str) -> T {
    string_arg(raw, i, name).parse().unwrap_or_else(|_| {
        eprintln!("Error: invalid value for --{name}");
        process::exit(1);
    })
}

fn print_usage() {
    eprintln!(
        "Usage: campus_nav [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 -d, --destination <ID>  Destination id (default: prof-101)\n\
         \x20 --list                  List destinations and exit\n\
         \x20 --config <FILE>         JSON configuration file\n\
         \x20 --directory <FILE>      JSON faculty directory\n\
         \x20 --step <DEG>            Simulation step in degrees (default: 0.00005)\n\
         \x20 --tick-ms <MS>          Simulation tick period (default: 100)\n\
         \x20 --arrival-radius <M>    Arrival radius in meters (default: 20)\n\
         \x20 -h, --help              Show this help"
    );
}

fn load_config(args: &Args) -> NavigatorConfig {
    let mut config = match &args.config {
        Some(path) => NavigatorConfig::from_json_file(path).unwrap_or_else(|e| {
            eprintln!("Error: {path}: {e}");
            process::exit(1);
        }),
        None => NavigatorConfig::default(),
    };
    config.initial_source = SourcePreference::Simulated;
    if let Some(step) = args.step_deg {
        config.simulation.step_deg = step;
    }
    if let Some(tick_ms) = args.tick_ms {
        config.simulation.tick_interval_ms = tick_ms;
    }
    if let Some(radius) = args.arrival_radius_m {
        config.arrival_radius_m = radius;
    }
    config
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args();
    let config = load_config(&args);

    let directory: Arc<dyn Directory> = match &args.directory {
        Some(path) => Arc::new(StaticDirectory::from_json_file(path).unwrap_or_else(|e| {
            eprintln!("Error: {path}: {e}");
            process::exit(1);
        })),
        None => Arc::new(StaticDirectory::campus()),
    };

    if args.list {
        for destination in directory.list() {
            println!(
                "{:<10} {}  {}",
                destination.id,
                destination.label(),
                destination.office()
            );
        }
        return;
    }

    let provider = Arc::new(MockLocationProvider::unavailable(LocationError::Unsupported));
    let mut controller = NavigationController::new(
        config,
        directory,
        provider,
        StraightLineRouter::new(),
        Box::new(LogPresenter::new()),
    )
    .unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    });

    controller.locate().await;

    if let Err(e) = controller
        .select_destination(&args.destination)
        .and_then(|_| controller.start_navigation())
    {
        eprintln!("Error: {e}");
        process::exit(1);
    }

    println!("=== campus_nav ===");
    println!("Press Ctrl+C to stop.\n");

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    while controller.mode().is_active() {
        tokio::select! {
            _ = &mut ctrl_c => {
                println!("\nShutdown requested.");
                controller.stop_navigation();
                break;
            }
            result = controller.process_next() => {
                if let Err(e) = result {
                    eprintln!("Navigation error: {e}");
                    process::exit(1);
                }
            }
        }
    }

    if controller.mode() == NavigationMode::Arrived {
        if let Some(destination) = controller.selected() {
            println!(
                "\nArrived at {} ({}).",
                destination.label(),
                destination.office()
            );
        }
    }
}
