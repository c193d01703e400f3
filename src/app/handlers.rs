//! Execution of decoded [`Command`]s.
//!
//! Every handler writes its reply through the caller's [`OutputSink`], so
//! the console and a datagram reply receive identical text. Range checks
//! on operands happen here; a rejected operand leaves all state untouched.

use log::{info, warn};

use crate::drivers::led_bank::{LIGHT_USER, NUM_LIGHTS};
use crate::drivers::rtc;
use crate::sensors::dht::Scale;
use crate::storage::gates::GATE_COUNT;
use crate::storage::{gates_window, log_window};

use super::commands::Command;
use super::events::AppEvent;
use super::ports::{Channel, ClockPort, EventSink, OutputSink, Reading};
use super::service::{AppService, Ports};

const HELP: &[&str] = &[
    "Commands (square brackets denote options):",
    "\tLED, DHT, TIME, DATE, VERSION, HELP",
    "\tLED [on|off|red|green|yellow|blink]",
    "\tRGB <0-255> <0-255> <0-255> (RGB values)",
    "\tDHT [MONITOR|LOG|ALARM]",
    "\tDHT LOG [INFO|CLEAR]",
    "\tSET TIME <HH> <MM> <SS>",
    "\tSET DATE <YY> <MM> <DD>",
    "\tSET DHT SCALE [0|1] (Celsius or Fahrenheit)",
    "\tSET BLINK <number 1-65535>",
    "\tSET ALARM <0-3> <degrees F>",
];

/// Largest gate value accepted from an unsigned operand.
const MAX_GATE: u16 = i16::MAX as u16;

impl AppService {
    pub(super) fn execute(&mut self, cmd: Command, out: &mut dyn OutputSink, ports: &mut Ports<'_>) {
        if cmd.interactive_only() && out.channel() != Channel::Interactive {
            out.write_line("DHT MONITOR is only available on the local console.");
            return;
        }

        match cmd {
            Command::LedStatus => self.led_status(out),
            Command::LedMode(mode) => {
                self.leds.set_mode(LIGHT_USER, mode);
            }
            Command::LedColour(colour) => {
                self.leds.set_colour(LIGHT_USER, colour);
            }

            Command::DhtStatus => {
                out.line_fmt(format_args!("{}", self.dht.reading_text(&self.dht.latest())));
                out.line_fmt(format_args!("Scale set to {}", self.dht.scale().name()));
            }
            Command::DhtMonitor => {
                if self.dht.toggle_monitor() {
                    out.write_line("DHT readings will now be printed.");
                    self.editor.arm_press_any_key();
                    info!("dht: monitor on");
                } else {
                    out.write_line("DHT monitor off.");
                }
            }
            Command::LogDump => self.log_dump(out, ports),
            Command::LogInfo => self.log_info(out, ports),
            Command::LogClear => match self.log.clear(&mut log_window(ports.eeprom)) {
                Ok(()) => {
                    out.write_line("DHT Log cleared.");
                    ports.events.emit(&AppEvent::LogCleared);
                }
                Err(e) => {
                    warn!("log: clear failed: {}", e);
                    out.write_line("DHT Log could not be cleared.");
                }
            },
            Command::AlarmStatus => {
                let [a, b, c, d] = self.gates.as_array();
                out.line_fmt(format_args!("Alarm gates: {a}, {b}, {c}, {d}"));
                out.line_fmt(format_args!("Alarm state: {}", self.alarm.level().description()));
            }

            Command::ClockStatus => {
                let now = ports.hw.now();
                out.line_fmt(format_args!("Date (yyyy/mm/dd): {}", now.date()));
                out.line_fmt(format_args!("Time (hh:mm:ss): {}", now.time()));
            }
            Command::SetTime {
                hour,
                minute,
                second,
            } => match rtc::with_time(ports.hw.now(), hour, minute, second) {
                Ok(ts) => {
                    ports.hw.set(ts);
                    out.line_fmt(format_args!("Time set to {ts}"));
                }
                Err(e) => out.line_fmt(format_args!("{e}")),
            },
            Command::SetDate { year, month, day } => {
                match rtc::with_date(ports.hw.now(), year, month, day) {
                    Ok(ts) => {
                        ports.hw.set(ts);
                        out.line_fmt(format_args!("Date-Time set to {ts}"));
                    }
                    Err(e) => out.line_fmt(format_args!("{e}")),
                }
            }

            Command::SetBlinkRate(rate) => {
                if self.leds.set_blink_rate(rate) {
                    out.line_fmt(format_args!("Blink Rate: {rate}"));
                } else {
                    out.write_line("Blink rate must be at least 1 ms.");
                }
            }
            Command::SetScale(flag) => {
                let scale = match flag {
                    0 => Scale::Celsius,
                    1 => Scale::Fahrenheit,
                    _ => {
                        out.write_line("Scale must be 0 (Celsius) or 1 (Fahrenheit).");
                        return;
                    }
                };
                self.dht.set_scale(scale);
                out.line_fmt(format_args!("Scale set to {}", scale.name()));
            }
            Command::SetAlarmGate { index, value } => self.set_gate(index, value, out, ports),

            Command::Version => out.write_line(env!("CARGO_PKG_VERSION")),
            Command::Help => {
                for line in HELP {
                    out.write_line(line);
                }
            }
        }
    }

    fn led_status(&self, out: &mut dyn OutputSink) {
        for light in 0..NUM_LIGHTS {
            let (Some(mode), Some((r, g, b))) =
                (self.leds.mode(light), self.leds.shown(light))
            else {
                continue;
            };
            out.line_fmt(format_args!(
                "Light {light} set to {}, color is rgb({r}, {g}, {b})",
                mode.label()
            ));
        }
        out.line_fmt(format_args!("Blink Rate: {}", self.leds.blink_rate_ms()));
    }

    fn log_dump(&self, out: &mut dyn OutputSink, ports: &mut Ports<'_>) {
        if self.log.is_empty() {
            out.write_line("No logs.");
            return;
        }
        let region = log_window(ports.eeprom);
        out.write_line("Date\tTime\tTemp, Humidity");
        for entry in self.log.iter(&region) {
            match entry {
                Ok(e) => {
                    let reading = Reading {
                        temperature_c: f32::from(e.temperature_c),
                        humidity_pct: f32::from(e.humidity_pct),
                    };
                    out.line_fmt(format_args!(
                        "{}\t{}",
                        e.timestamp,
                        self.dht.reading_text(&reading)
                    ));
                }
                Err(err) => {
                    warn!("log: read failed: {}", err);
                    return;
                }
            }
        }
    }

    fn log_info(&self, out: &mut dyn OutputSink, ports: &mut Ports<'_>) {
        out.line_fmt(format_args!(
            "{} entries stored in the log. Next memory address is {}",
            self.log.count(),
            self.log.write_offset()
        ));
        let stats = match self.log.stats(&log_window(ports.eeprom)) {
            Ok(Some(stats)) => stats,
            Ok(None) => return,
            Err(e) => {
                warn!("log: read failed: {}", e);
                return;
            }
        };
        let max = self.dht.temperature(f32::from(stats.max_temperature_c));
        let min = self.dht.temperature(f32::from(stats.min_temperature_c));
        out.line_fmt(format_args!("Max Temperature: {max}"));
        out.line_fmt(format_args!("Min Temperature: {min}"));
        out.line_fmt(format_args!("Max Humidity: {}%RH", stats.max_humidity_pct));
        out.line_fmt(format_args!("Min Humidity: {}%RH", stats.min_humidity_pct));
    }

    fn set_gate(&mut self, index: u8, value: u16, out: &mut dyn OutputSink, ports: &mut Ports<'_>) {
        let index = usize::from(index);
        if index >= GATE_COUNT {
            out.line_fmt(format_args!("Alarm gate must be 0-{}.", GATE_COUNT - 1));
            return;
        }
        if value > MAX_GATE {
            out.line_fmt(format_args!("Alarm gate value must be 0-{MAX_GATE}."));
            return;
        }

        let mut gates = self.gates;
        gates.set(index, value as i16);
        if let Err(e) = gates.store(&mut gates_window(ports.eeprom)) {
            warn!("gates: store failed: {}", e);
            out.write_line("Alarm gates could not be saved.");
            return;
        }
        self.gates = gates;
        info!("gates: now {:?}", gates.as_array());

        out.line_fmt(format_args!("Alarm Gate {index}: {value}"));
        if !gates.is_ascending() {
            out.write_line("Warning: alarm gates are not in ascending order.");
        }
    }
}
