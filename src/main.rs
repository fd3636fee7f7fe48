use chatwatch::battery::{BatteryEngine, JsonFileStore};
use chatwatch::build_info;
use chatwatch::utils::init_logging;
use std::io;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 3000;

struct Options {
    premium: bool,
    store_path: Option<PathBuf>,
    chat_ids: Vec<String>,
    serve_port: Option<u16>,
}

fn print_help() {
    println!("chatwatch - simulation backend for the voyeur messaging phone\n");
    println!("Usage: chatwatch [OPTIONS]\n");
    println!("Options:");
    println!("  --premium            Use the premium battery tier");
    println!("  --store=PATH         Battery save file (default: platform data dir)");
    println!("  --chats=ID,ID,...    Conversations to simulate (default: 1-6)");
    println!("  --serve[=PORT]       Run the live feed server (requires `web` feature)");
    println!("  -v, --version        Print version");
    println!("  -h, --help           Print this help");
    println!("\nWithout --serve, prints the saved battery after offline recovery.");
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options {
        premium: false,
        store_path: None,
        chat_ids: (1..=6).map(|i| i.to_string()).collect(),
        serve_port: None,
    };

    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--premium" => options.premium = true,
            "--serve" => options.serve_port = Some(DEFAULT_PORT),
            s if s.starts_with("--serve=") => {
                let port = s["--serve=".len()..]
                    .parse()
                    .map_err(|_| format!("invalid port in {}", s))?;
                options.serve_port = Some(port);
            }
            s if s.starts_with("--store=") => {
                options.store_path = Some(PathBuf::from(&s["--store=".len()..]));
            }
            s if s.starts_with("--chats=") => {
                options.chat_ids = s["--chats=".len()..]
                    .split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            other => return Err(format!("unknown argument: {}", other)),
        }
    }
    Ok(options)
}

fn open_store(options: &Options) -> io::Result<JsonFileStore> {
    match &options.store_path {
        Some(path) => Ok(JsonFileStore::new(path)),
        None => JsonFileStore::default_location()
            .map_err(|e| io::Error::new(io::ErrorKind::NotFound, e.to_string())),
    }
}

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--version" | "-v" => {
                println!("{}", build_info::version_line("chatwatch"));
                return Ok(());
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            _ => {}
        }
    }

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(msg) => {
            eprintln!("{}\n", msg);
            print_help();
            std::process::exit(2);
        }
    };

    // A second init only fails if a subscriber is already set
    let _ = init_logging("info");

    let store = open_store(&options)?;

    match options.serve_port {
        Some(port) => serve(store, &options, port),
        None => print_status(store, options.premium),
    }
}

fn print_status(store: JsonFileStore, premium: bool) -> io::Result<()> {
    let engine = BatteryEngine::load(store, premium);
    if let Some(recovery) = engine.last_recovery() {
        if recovery.recharge > 0.0 {
            println!(
                "Recovered {:.0} energy while away ({:.0} -> {:.0})",
                recovery.recharge, recovery.level_before, recovery.level_after
            );
        }
    }
    let json = serde_json::to_string_pretty(engine.state())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    println!("{}", json);
    Ok(())
}

#[cfg(feature = "web")]
fn serve(store: JsonFileStore, options: &Options, port: u16) -> io::Result<()> {
    use chatwatch::battery::BatteryStore;
    use chatwatch::core::clock::{Clock, SystemClock};
    use chatwatch::live::LiveSessionSimulator;
    use chatwatch::web::{spawn_driver, start_live_server};
    use chatwatch::Phone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    let store: Box<dyn BatteryStore + Send> = Box::new(store);
    let battery = BatteryEngine::initialize(store, SystemClock, options.premium);
    let mut rng = StdRng::from_entropy();
    let live = LiveSessionSimulator::initialize(&options.chat_ids, SystemClock.now_ms(), &mut rng);
    let phone = Phone::new(battery, live, rng);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let driver = Arc::new(spawn_driver(phone));
        start_live_server(port, driver).await
    })
}

#[cfg(not(feature = "web"))]
fn serve(_store: JsonFileStore, _options: &Options, _port: u16) -> io::Result<()> {
    eprintln!("chatwatch was built without the `web` feature; rebuild with --features web");
    std::process::exit(2);
}
