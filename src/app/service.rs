//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the interpreter, the LED bank, DHT state, the alarm
//! evaluator and the bookkeeping of every persisted structure. It exposes
//! a clean, hardware-agnostic API. All I/O flows through port traits
//! injected at call sites, making the entire service testable with mock
//! adapters.
//!
//! ```text
//!  ConsolePort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//! DatagramPort ◀─▶ │          AppService          │
//!     Hardware ◀─▶ │ lexer · dispatch · alarm · log│ ◀─▶ PersistentRegion
//!                  └──────────────────────────────┘
//! ```
//!
//! One [`poll`](AppService::poll) pass runs, in order: LED blink tick,
//! DHT sampling tick (alarm evaluation, monitor print, log append), local
//! console input, network input. Each input channel dispatches at most
//! one command per pass.

use std::net::SocketAddrV4;

use log::{debug, info, warn};

use crate::alarm::{AlarmEvaluator, AlarmLevel, Transition};
use crate::config::{SystemConfig, validate_config};
use crate::drivers::led_bank::{LIGHT_ALARM, LIGHT_NETWORK, LIGHT_POWER, LedBank, LightMode, Rgb};
use crate::drivers::line_editor::{Edit, LineEditor};
use crate::interpreter::{Lexer, MAX_INPUT_LEN, interpret, report};
use crate::scheduler::Interval;
use crate::sensors::dht::DhtState;
use crate::storage::gates::AlarmGates;
use crate::storage::log_store::{CircularLog, LogEntry};
use crate::storage::settings::NetworkSettings;
use crate::storage::{PersistentRegion, gates_window, log_window, network_window};

use super::events::AppEvent;
use super::output::{ConsoleOut, DatagramReply};
use super::ports::{
    AlarmNotifier, ClockPort, ConsolePort, DatagramPort, EventSink, Hardware, OutputSink,
    PixelPort, SensorPort, Urgency,
};

const POWER_COLOUR: Rgb = (0, 50, 0);
const LINK_UP_COLOUR: Rgb = (0, 50, 0);
const LINK_DOWN_COLOUR: Rgb = (50, 0, 0);

/// Receive buffer for command datagrams. Anything past the interpreter's
/// input limit only needs to be seen to be rejected as too long.
const DATAGRAM_BUF_LEN: usize = MAX_INPUT_LEN * 2;

// ───────────────────────────────────────────────────────────────
// Ports bundle
// ───────────────────────────────────────────────────────────────

/// The driven ports every dispatch may touch.
pub struct Ports<'a> {
    pub hw: &'a mut dyn Hardware,
    pub eeprom: &'a mut dyn PersistentRegion,
    pub events: &'a mut dyn EventSink,
}

// ───────────────────────────────────────────────────────────────
// Network bookkeeping
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub(super) struct NetState {
    pub(super) link_up: bool,
    /// Set by the first datagram after boot.
    pub(super) destination_learned: bool,
    pub(super) settings: NetworkSettings,
    pub(super) rx_packets: u32,
    pub(super) tx_packets: u32,
}

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    pub(super) config: SystemConfig,
    lexer: Lexer,
    pub(super) leds: LedBank,
    pub(super) dht: DhtState,
    pub(super) alarm: AlarmEvaluator,
    pub(super) gates: AlarmGates,
    pub(super) log: CircularLog,
    pub(super) net: NetState,
    pub(super) editor: LineEditor,
    sample_timer: Interval,
    log_timer: Interval,
    net_timer: Interval,
    frame_dirty: bool,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Nothing is read from storage until [`start`](Self::start).
    pub fn new(config: SystemConfig) -> Self {
        let lexer = if config.lenient_operands {
            Lexer::lenient()
        } else {
            Lexer::new()
        };
        Self {
            lexer,
            leds: LedBank::new(config.blink_rate_ms),
            dht: DhtState::new(config.fahrenheit),
            alarm: AlarmEvaluator::new(),
            gates: AlarmGates::new(config.default_alarm_gates),
            log: CircularLog::default(),
            net: NetState::default(),
            editor: LineEditor::new(),
            sample_timer: Interval::new("dht", u64::from(config.sample_interval_ms)),
            log_timer: Interval::new("log", u64::from(config.log_interval_ms)),
            net_timer: Interval::new("net", u64::from(config.network_poll_interval_ms)),
            frame_dirty: true,
            config,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Load persisted state, light the status LEDs and print the first
    /// prompt.
    ///
    /// Fails before touching storage if the configuration is out of range.
    pub fn start(
        &mut self,
        ports: &mut Ports<'_>,
        console: &mut dyn ConsolePort,
    ) -> crate::error::Result<()> {
        validate_config(&self.config)?;
        self.log = CircularLog::open(&mut log_window(ports.eeprom))?;
        self.gates = AlarmGates::load(&mut gates_window(ports.eeprom), self.config.default_alarm_gates)?;
        self.net.settings = NetworkSettings::load(&network_window(ports.eeprom))?;

        if !self.gates.is_ascending() {
            warn!("gates: stored thresholds {:?} are not ascending", self.gates.as_array());
        }
        match self.net.settings.destination() {
            Some(dest) => info!("net: alarm destination {}", dest),
            None => info!("net: no alarm destination yet"),
        }

        self.leds.set_colour(LIGHT_POWER, POWER_COLOUR);
        self.leds.set_colour(LIGHT_ALARM, self.alarm.level().colour());
        self.leds.set_colour(LIGHT_NETWORK, LINK_DOWN_COLOUR);
        self.flush_frame(ports);

        ports.events.emit(&AppEvent::Started {
            log_entries: self.log.count(),
            gates: self.gates.as_array(),
        });
        info!(
            "AppService started: {} log entries, gates {:?}",
            self.log.count(),
            self.gates.as_array()
        );

        console.write_str("Program start.\r\n");
        self.editor.prompt(console);
        Ok(())
    }

    // ── Per-pass orchestration ────────────────────────────────

    /// Run one cooperative pass at monotonic time `now_ms`.
    pub fn poll(
        &mut self,
        now_ms: u64,
        ports: &mut Ports<'_>,
        console: &mut dyn ConsolePort,
        net: &mut dyn DatagramPort,
    ) {
        if self.leds.tick(now_ms) {
            self.frame_dirty = true;
        }

        if self.sample_timer.poll(now_ms) {
            self.sample(now_ms, ports, console, net);
        }

        self.service_console(ports, console);

        if self.net_timer.poll(now_ms) {
            self.service_network(ports, net);
        }

        self.flush_frame(ports);
    }

    /// Tokenize, decode and execute one input unit, writing every reply
    /// line to `out`.
    pub fn dispatch(&mut self, input: &[u8], out: &mut dyn OutputSink, ports: &mut Ports<'_>) {
        match interpret(&self.lexer, input) {
            Ok(cmd) => {
                debug!("dispatch: {:?} via {:?}", cmd, out.channel());
                self.execute(cmd, out, ports);
                self.frame_dirty = true;
            }
            Err(error) => {
                debug!("rejected via {:?}: {}", out.channel(), error);
                report(&error, out);
                ports.events.emit(&AppEvent::CommandRejected {
                    channel: out.channel(),
                    error,
                });
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn leds(&self) -> &LedBank {
        &self.leds
    }

    pub fn dht(&self) -> &DhtState {
        &self.dht
    }

    pub fn alarm_level(&self) -> AlarmLevel {
        self.alarm.level()
    }

    pub fn gates(&self) -> AlarmGates {
        self.gates
    }

    pub fn log(&self) -> &CircularLog {
        &self.log
    }

    pub fn network_settings(&self) -> NetworkSettings {
        self.net.settings
    }

    /// Datagrams received and sent since boot.
    pub fn packet_counts(&self) -> (u32, u32) {
        (self.net.rx_packets, self.net.tx_packets)
    }

    pub fn is_waiting_for_key(&self) -> bool {
        self.editor.is_waiting_for_key()
    }

    // ── Internal ──────────────────────────────────────────────

    fn sample(
        &mut self,
        now_ms: u64,
        ports: &mut Ports<'_>,
        console: &mut dyn ConsolePort,
        net: &mut dyn DatagramPort,
    ) {
        let reading = match ports.hw.read() {
            Ok(r) => r,
            Err(e) => {
                warn!("dht: read failed: {}", e);
                if self.dht.monitoring() {
                    let mut out = ConsoleOut::new(console);
                    out.line_fmt(format_args!("DHT read failed, err={e}"));
                }
                ports.events.emit(&AppEvent::SampleFailed(e));
                return;
            }
        };
        self.dht.record(reading);

        let fahrenheit = self.dht.alarm_input();
        let gates = self.gates.as_array();
        let transition = self
            .alarm
            .evaluate(fahrenheit, &gates, &mut AlarmLight(&mut self.leds));
        if let Transition::Changed(level) = transition {
            self.frame_dirty = true;
            self.notify_alarm(level, net);
            ports.events.emit(&AppEvent::AlarmChanged { level, fahrenheit });
        }

        if self.dht.monitoring() {
            let mut out = ConsoleOut::new(console);
            out.line_fmt(format_args!("{}", self.dht.reading_text(&reading)));
        }

        if self.log_timer.poll(now_ms) {
            let entry = LogEntry {
                timestamp: ports.hw.now(),
                temperature_c: reading.temperature_c as i8,
                humidity_pct: reading.humidity_pct as u8,
            };
            match self.log.append(&mut log_window(ports.eeprom), &entry) {
                Ok(()) => {
                    debug!("log: appended {:?}", entry);
                    ports.events.emit(&AppEvent::LogAppended {
                        count: self.log.count(),
                        write_offset: self.log.write_offset(),
                    });
                }
                Err(e) => warn!("log: append failed: {}", e),
            }
        }
    }

    /// Send one alarm datagram to the learned destination.
    fn notify_alarm(&mut self, level: AlarmLevel, net: &mut dyn DatagramPort) {
        let Some(dest) = self.net.settings.destination() else {
            debug!("alarm: no destination, notification not sent");
            return;
        };
        let mut msg = DatagramReply::new();
        msg.line_fmt(format_args!(
            "Arduino Alarm: Temperature {} {}",
            level.description(),
            self.dht.reading_text(&self.dht.latest())
        ));
        self.send(dest, &msg, net);
    }

    fn service_console(&mut self, ports: &mut Ports<'_>, console: &mut dyn ConsolePort) {
        while let Some(byte) = console.read_byte() {
            match self.editor.feed(byte, console) {
                Edit::Pending => {}
                Edit::Dismissed => {
                    if self.dht.monitoring() {
                        self.dht.toggle_monitor();
                        info!("dht: monitor off");
                    }
                    self.editor.prompt(console);
                    return;
                }
                Edit::Submit(line) => {
                    self.dispatch(&line, &mut ConsoleOut::new(console), ports);
                    self.editor.prompt(console);
                    return;
                }
            }
        }
    }

    fn service_network(&mut self, ports: &mut Ports<'_>, net: &mut dyn DatagramPort) {
        let up = net.link_up();
        if up != self.net.link_up {
            self.net.link_up = up;
            let colour = if up { LINK_UP_COLOUR } else { LINK_DOWN_COLOUR };
            self.leds.set_colour(LIGHT_NETWORK, colour);
            self.frame_dirty = true;
            info!("net: link {}", if up { "up" } else { "down" });
            ports.events.emit(&AppEvent::LinkChanged(up));
        }
        if !up {
            return;
        }

        let mut buf = [0u8; DATAGRAM_BUF_LEN];
        let Some((len, peer)) = net.recv(&mut buf) else {
            return;
        };
        self.net.rx_packets = self.net.rx_packets.wrapping_add(1);
        debug!("net: {} bytes from {}", len, peer);

        if !self.net.destination_learned {
            self.learn_destination(peer, ports);
        }

        let mut reply = DatagramReply::new();
        self.dispatch(&buf[..len], &mut reply, ports);
        if !reply.is_empty() {
            self.send(peer, &reply, net);
        }
    }

    fn learn_destination(&mut self, peer: SocketAddrV4, ports: &mut Ports<'_>) {
        self.net.destination_learned = true;
        if self.net.settings.destination() == Some(peer) {
            return;
        }
        self.net.settings.set_destination(peer);
        if let Err(e) = self.net.settings.store(&mut network_window(ports.eeprom)) {
            warn!("net: could not persist destination: {}", e);
        }
        info!("net: alarm destination is now {}", peer);
        ports.events.emit(&AppEvent::DestinationLearned(peer));
    }

    fn send(&mut self, peer: SocketAddrV4, msg: &DatagramReply, net: &mut dyn DatagramPort) {
        if net.send_to(peer, msg.as_bytes()) {
            self.net.tx_packets = self.net.tx_packets.wrapping_add(1);
        } else {
            warn!("net: send to {} failed", peer);
        }
    }

    fn flush_frame(&mut self, ports: &mut Ports<'_>) {
        if self.frame_dirty {
            ports.hw.show(&self.leds.frame());
            self.frame_dirty = false;
        }
    }
}

/// Drives the alarm light from evaluator notifications.
struct AlarmLight<'a>(&'a mut LedBank);

impl AlarmNotifier for AlarmLight<'_> {
    fn alarm_changed(&mut self, description: &'static str, colour: Rgb, urgency: Urgency) {
        self.0.set_colour(LIGHT_ALARM, colour);
        let mode = match urgency {
            Urgency::Calm => LightMode::On,
            Urgency::Attention => LightMode::Blink,
        };
        self.0.set_mode(LIGHT_ALARM, mode);
        debug!("alarm light: {} {:?} {}", description, colour, mode.label());
    }
}
