//! EnvNode Firmware — Host Entry Point
//!
//! Hexagonal architecture with a single-threaded cooperative poll loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  SimHardware        LogEventSink   FileEeprom   MonotonicClock │
//! │  (Sensor+Clock+Pix) (EventSink)    (Region)     (loop time)    │
//! │  StdConsole         UdpAdapter     JsonConfigStore             │
//! │  (ConsolePort)      (Datagram)     (ConfigPort)                │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Interpreter · LED bank · DHT · Alarm · Log store      │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `envnode [config.json]`. `RUST_LOG` sets the log level.

#![deny(unused_must_use)]

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use env_logger::Env;
use log::{info, warn};

use envnode::adapters::config_store::JsonConfigStore;
use envnode::adapters::console::StdConsole;
use envnode::adapters::eeprom::FileEeprom;
use envnode::adapters::hardware::{SimDht, SimHardware};
use envnode::adapters::log_sink::LogEventSink;
use envnode::adapters::time::{MonotonicClock, SoftRtc};
use envnode::adapters::udp::UdpAdapter;
use envnode::app::ports::{ConfigError, ConfigPort};
use envnode::app::service::{AppService, Ports};
use envnode::config::SystemConfig;
use envnode::storage::EEPROM_SIZE;

/// Pause between poll passes.
const IDLE_SLEEP: Duration = Duration::from_millis(1);

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("╔══════════════════════════════════════╗");
    info!("║  EnvNode v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let store = JsonConfigStore::new(std::env::args_os().nth(1).map(PathBuf::from));
    let config = match store.load() {
        Ok(cfg) => cfg,
        Err(ConfigError::NotFound) => {
            warn!("Config file not found, writing defaults");
            let cfg = SystemConfig::default();
            if let Err(e) = store.save(&cfg) {
                warn!("Could not write default config: {}", e);
            }
            cfg
        }
        Err(e) => return Err(e).context("loading configuration"),
    };

    // ── 3. Adapters ───────────────────────────────────────────
    let mut eeprom = FileEeprom::open(&config.eeprom_path, EEPROM_SIZE)
        .with_context(|| format!("opening EEPROM image {}", config.eeprom_path))?;
    let mut udp = UdpAdapter::bind(config.udp_port)
        .with_context(|| format!("binding UDP port {}", config.udp_port))?;
    let mut console = StdConsole::spawn().context("starting console reader")?;
    let mut hw = SimHardware::new(SimDht::new(0), SoftRtc::new());
    let mut events = LogEventSink::new();
    let clock = MonotonicClock::new();

    // ── 4. Application service ────────────────────────────────
    let mut app = AppService::new(config);
    let mut ports = Ports {
        hw: &mut hw,
        eeprom: &mut eeprom,
        events: &mut events,
    };
    app.start(&mut ports, &mut console)
        .context("starting application service")?;

    info!("System ready. Entering poll loop.");

    // ── 5. Poll loop ──────────────────────────────────────────
    let mut stdin_open = true;
    loop {
        app.poll(clock.now_ms(), &mut ports, &mut console, &mut udp);

        if stdin_open && console.is_closed() {
            stdin_open = false;
            info!("Console input closed; still serving the network");
        }
        std::thread::sleep(IDLE_SLEEP);
    }
}
