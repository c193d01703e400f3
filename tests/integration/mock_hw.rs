//! Mock adapters for integration tests.
//!
//! Records every frame, datagram and event so tests can assert on the
//! full history without a terminal, socket or LED strip.

use std::collections::VecDeque;
use std::net::SocketAddrV4;

use envnode::app::events::AppEvent;
use envnode::app::ports::{
    ClockPort, ConsolePort, DatagramPort, EventSink, PixelPort, Reading, SensorError, SensorPort,
};
use envnode::app::service::{AppService, Ports};
use envnode::config::SystemConfig;
use envnode::drivers::led_bank::{NUM_LIGHTS, Rgb};
use envnode::drivers::rtc::DateTime;
use envnode::storage::{EEPROM_SIZE, MemRegion};

// ── MockHardware ──────────────────────────────────────────────

/// 26.3 °C reads as 79 °F: comfortable against the default gates.
pub const DEFAULT_READING: Reading = Reading {
    temperature_c: 26.3,
    humidity_pct: 45.0,
};

pub struct MockHardware {
    /// Scripted samples, consumed front first; empty means [`DEFAULT_READING`].
    pub readings: VecDeque<Result<Reading, SensorError>>,
    pub clock: DateTime,
    pub frames: Vec<[Rgb; NUM_LIGHTS]>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            readings: VecDeque::new(),
            clock: DateTime {
                year: 24,
                month: 1,
                day: 1,
                weekday: 1,
                hour: 0,
                minute: 0,
                second: 0,
            },
            frames: Vec::new(),
        }
    }

    pub fn push_reading(&mut self, temperature_c: f32, humidity_pct: f32) {
        self.readings.push_back(Ok(Reading {
            temperature_c,
            humidity_pct,
        }));
    }

    pub fn fail_next(&mut self, error: SensorError) {
        self.readings.push_back(Err(error));
    }

    pub fn last_frame(&self) -> Option<&[Rgb; NUM_LIGHTS]> {
        self.frames.last()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read(&mut self) -> Result<Reading, SensorError> {
        self.readings.pop_front().unwrap_or(Ok(DEFAULT_READING))
    }
}

impl ClockPort for MockHardware {
    fn now(&mut self) -> DateTime {
        self.clock
    }

    fn set(&mut self, ts: DateTime) {
        self.clock = ts;
    }
}

impl PixelPort for MockHardware {
    fn show(&mut self, pixels: &[Rgb]) {
        let mut frame = [(0, 0, 0); NUM_LIGHTS];
        frame.copy_from_slice(pixels);
        self.frames.push(frame);
    }
}

// ── MockConsole ───────────────────────────────────────────────

#[derive(Default)]
pub struct MockConsole {
    pub input: VecDeque<u8>,
    pub output: String,
}

impl MockConsole {
    pub fn type_bytes(&mut self, bytes: &[u8]) {
        self.input.extend(bytes.iter().copied());
    }

    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }
}

impl ConsolePort for MockConsole {
    fn read_byte(&mut self) -> Option<u8> {
        self.input.pop_front()
    }

    fn write_str(&mut self, text: &str) {
        self.output.push_str(text);
    }
}

// ── MockNet ───────────────────────────────────────────────────

pub struct MockNet {
    pub link: bool,
    pub inbox: VecDeque<(Vec<u8>, SocketAddrV4)>,
    pub sent: Vec<(SocketAddrV4, String)>,
}

#[allow(dead_code)]
impl MockNet {
    pub fn new() -> Self {
        Self {
            link: true,
            inbox: VecDeque::new(),
            sent: Vec::new(),
        }
    }

    pub fn last_sent(&self) -> Option<&(SocketAddrV4, String)> {
        self.sent.last()
    }
}

impl Default for MockNet {
    fn default() -> Self {
        Self::new()
    }
}

impl DatagramPort for MockNet {
    fn link_up(&mut self) -> bool {
        self.link
    }

    fn recv(&mut self, buf: &mut [u8]) -> Option<(usize, SocketAddrV4)> {
        let (payload, peer) = self.inbox.pop_front()?;
        let n = payload.len().min(buf.len());
        buf[..n].copy_from_slice(&payload[..n]);
        Some((n, peer))
    }

    fn send_to(&mut self, peer: SocketAddrV4, payload: &[u8]) -> bool {
        self.sent
            .push((peer, String::from_utf8_lossy(payload).into_owned()));
        true
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink(pub Vec<AppEvent>);

#[allow(dead_code)]
impl RecordingSink {
    pub fn contains(&self, event: &AppEvent) -> bool {
        self.0.contains(event)
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.0.push(event.clone());
    }
}

// ── Rig ───────────────────────────────────────────────────────

/// A started [`AppService`] wired to mocks.
pub struct Rig {
    pub app: AppService,
    pub hw: MockHardware,
    pub eeprom: MemRegion,
    pub events: RecordingSink,
    pub console: MockConsole,
    pub net: MockNet,
}

#[allow(dead_code)]
impl Rig {
    pub fn new() -> Self {
        Self::with_config(SystemConfig::default())
    }

    pub fn with_config(config: SystemConfig) -> Self {
        Self::with_eeprom(config, MemRegion::new(EEPROM_SIZE))
    }

    /// Boot against an existing EEPROM image.
    pub fn with_eeprom(config: SystemConfig, eeprom: MemRegion) -> Self {
        let mut rig = Self {
            app: AppService::new(config),
            hw: MockHardware::new(),
            eeprom,
            events: RecordingSink::default(),
            console: MockConsole::default(),
            net: MockNet::new(),
        };
        let mut ports = Ports {
            hw: &mut rig.hw,
            eeprom: &mut rig.eeprom,
            events: &mut rig.events,
        };
        rig.app
            .start(&mut ports, &mut rig.console)
            .expect("start against a healthy region");
        rig
    }

    pub fn poll(&mut self, now_ms: u64) {
        let mut ports = Ports {
            hw: &mut self.hw,
            eeprom: &mut self.eeprom,
            events: &mut self.events,
        };
        self.app
            .poll(now_ms, &mut ports, &mut self.console, &mut self.net);
    }

    /// Type `line` plus Enter, run one pass and return everything printed.
    pub fn type_line(&mut self, line: &str, now_ms: u64) -> String {
        self.console.take_output();
        self.console.type_bytes(line.as_bytes());
        self.console.type_bytes(b"\r");
        self.poll(now_ms);
        self.console.take_output()
    }

    pub fn send_datagram(&mut self, payload: &str, peer: SocketAddrV4) {
        self.net.inbox.push_back((payload.as_bytes().to_vec(), peer));
    }

    /// Deliver `payload` from `peer`, run one pass and return the reply.
    pub fn exchange(&mut self, payload: &str, peer: SocketAddrV4, now_ms: u64) -> Option<String> {
        let before = self.net.sent.len();
        self.send_datagram(payload, peer);
        self.poll(now_ms);
        self.net.sent[before..]
            .iter()
            .find(|(to, _)| *to == peer)
            .map(|(_, text)| text.clone())
    }
}

impl Default for Rig {
    fn default() -> Self {
        Self::new()
    }
}
