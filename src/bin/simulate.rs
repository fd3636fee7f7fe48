//! Headless phone simulator CLI.
//!
//! Runs the battery and the live crowd on simulated time with a scripted
//! watcher, then prints what happened.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                      # Default: 10 minutes, 6 chats
//!   cargo run --bin simulate -- -m 60 --premium   # An hour on the premium tier
//!   cargo run --bin simulate -- --seed 42         # Reproducible run

use chatwatch::build_info;
use chatwatch::simulator::{run_simulation, SimConfig};
use chatwatch::utils::init_logging;
use std::env;

fn main() {
    let args: Vec<String> = env::args().collect();
    let config = parse_args(&args);

    let level = if config.verbosity >= 2 { "debug" } else { "warn" };
    let _ = init_logging(level);

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              CHATWATCH PHONE SIMULATOR                        ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Duration:       {}s", config.duration_ms / 1000);
    println!("  Chats:          {}", config.chat_ids.join(", "));
    println!("  Premium:        {}", config.is_premium);
    if config.drain_every_ms > 0 {
        println!("  Drain every:    {}ms", config.drain_every_ms);
    }
    if config.react_every_ms > 0 {
        println!("  React every:    {}ms", config.react_every_ms);
    }
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    println!();

    let report = run_simulation(&config);

    println!("{}", report.to_text());

    if args.iter().any(|a| a == "--json") {
        let filename = format!(
            "sim_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        match std::fs::write(&filename, report.to_json()) {
            Ok(()) => println!("JSON report saved to: {}", filename),
            Err(e) => {
                eprintln!("Failed to write {}: {}", filename, e);
                std::process::exit(1);
            }
        }
    }
}

fn parse_args(args: &[String]) -> SimConfig {
    let mut config = SimConfig::default();
    let mut premium = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-s" | "--seed" => {
                if i + 1 < args.len() {
                    config.seed = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "-m" | "--minutes" => {
                if i + 1 < args.len() {
                    if let Ok(minutes) = args[i + 1].parse::<i64>() {
                        config.duration_ms = minutes * 60 * 1000;
                    }
                    i += 1;
                }
            }
            "--seconds" => {
                if i + 1 < args.len() {
                    if let Ok(seconds) = args[i + 1].parse::<i64>() {
                        config.duration_ms = seconds * 1000;
                    }
                    i += 1;
                }
            }
            "-c" | "--chats" => {
                if i + 1 < args.len() {
                    config.chat_ids = args[i + 1]
                        .split(',')
                        .map(str::trim)
                        .filter(|id| !id.is_empty())
                        .map(str::to_string)
                        .collect();
                    i += 1;
                }
            }
            "--drain-every" => {
                if i + 1 < args.len() {
                    config.drain_every_ms = args[i + 1].parse().unwrap_or(config.drain_every_ms);
                    i += 1;
                }
            }
            "--no-charge" => {
                config.auto_charge = false;
            }
            "--premium" => {
                premium = true;
            }
            "--binge" => {
                config = SimConfig::binge_session(config.duration_ms / 60_000);
            }
            "--lurker" => {
                config = SimConfig::lurker(config.duration_ms / 60_000);
            }
            "-v" | "--verbose" => {
                config.verbosity = 2;
            }
            "--version" => {
                println!("{}", build_info::version_line("simulate"));
                std::process::exit(0);
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            _ => {}
        }
        i += 1;
    }

    // Presets reset the tier, so apply it last
    config.is_premium |= premium;
    config
}

fn print_help() {
    println!("Chatwatch Phone Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -s, --seed <S>        Random seed for reproducibility");
    println!("    -m, --minutes <M>     Simulated minutes (default: 10)");
    println!("        --seconds <S>     Simulated seconds");
    println!("    -c, --chats <A,B,..>  Conversations to seed (default: 1-6)");
    println!("        --drain-every <MS> Drain one unit every MS (0 = never)");
    println!("        --no-charge       Do not plug in when the battery dies");
    println!("        --premium         Use the premium battery tier");
    println!("        --binge           Heavy watcher preset (keeps duration)");
    println!("        --lurker          Watcher who never drains or reacts");
    println!("        --json            Also write a JSON report");
    println!("    -v, --verbose         Print every event");
    println!("        --version         Print version");
    println!("    -h, --help            Print this help");
}
