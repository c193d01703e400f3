//! End-to-end tests: console lines and datagrams through the service to
//! the mock LED strip, clock, EEPROM and socket.

use std::net::{Ipv4Addr, SocketAddrV4};

use envnode::alarm::AlarmLevel;
use envnode::app::events::AppEvent;
use envnode::app::ports::{Channel, ConfigError, SensorError};
use envnode::app::service::{AppService, Ports};
use envnode::config::SystemConfig;
use envnode::drivers::led_bank::{BLUE, LIGHT_ALARM, LIGHT_NETWORK, LIGHT_USER, LightMode};
use envnode::error::Error;
use envnode::interpreter::UNKNOWN_COMMAND;
use envnode::storage::gates::AlarmGates;
use envnode::storage::settings::NetworkSettings;
use envnode::storage::{EEPROM_SIZE, MemRegion, gates_window, network_window};

use crate::mock_hw::{MockConsole, MockHardware, RecordingSink, Rig};

const PEER: SocketAddrV4 = SocketAddrV4::new(Ipv4Addr::new(10, 0, 0, 5), 4000);

// ── Console ───────────────────────────────────────────────────

#[test]
fn start_prints_banner_and_prompt() {
    let mut rig = Rig::new();
    let out = rig.console.take_output();
    assert_eq!(out, "Program start.\r\n\r\n>");
    assert!(matches!(rig.events.0.first(), Some(AppEvent::Started { log_entries: 0, .. })));
}

#[test]
fn led_on_lights_user_led_and_pushes_frame() {
    let mut rig = Rig::new();
    rig.poll(0);
    rig.type_line("led on", 1);

    assert_eq!(rig.app.leds().mode(LIGHT_USER), Some(LightMode::On));
    let frame = rig.hw.last_frame().expect("a frame was shown");
    assert_eq!(frame[LIGHT_USER], BLUE);
}

#[test]
fn led_status_lists_every_light() {
    let mut rig = Rig::new();
    rig.poll(0);
    rig.type_line("rgb 10 20 30", 1);
    let out = rig.type_line("led", 2);

    assert!(out.contains("Light 0 set to on, color is rgb(10, 20, 30)\r\n"), "{out}");
    assert!(out.contains("Light 1 set to on"), "{out}");
    assert!(out.contains("Light 3 set to"), "{out}");
    assert!(out.contains("Blink Rate: 500\r\n"), "{out}");
}

#[test]
fn led_status_reports_the_colour_on_the_strip() {
    let mut rig = Rig::new();
    rig.poll(0);
    rig.type_line("rgb 10 20 30", 1);
    rig.type_line("led off", 2);
    let out = rig.type_line("led", 3);

    assert!(out.contains("Light 0 set to off, color is rgb(0, 0, 0)\r\n"), "{out}");
}

#[test]
fn start_rejects_out_of_range_config() {
    let mut app = AppService::new(SystemConfig {
        blink_rate_ms: 0,
        ..SystemConfig::default()
    });
    let mut hw = MockHardware::new();
    let mut eeprom = MemRegion::new(EEPROM_SIZE);
    let mut events = RecordingSink::default();
    let mut console = MockConsole::default();
    let mut ports = Ports {
        hw: &mut hw,
        eeprom: &mut eeprom,
        events: &mut events,
    };

    let err = app.start(&mut ports, &mut console).expect_err("zero blink rate");
    assert_eq!(
        err,
        Error::Config(ConfigError::ValidationFailed("blink_rate_ms must be > 0"))
    );
    assert!(console.output.is_empty());
    assert!(events.0.is_empty());
}

#[test]
fn set_time_updates_clock() {
    let mut rig = Rig::new();
    let out = rig.type_line("set time 12 30 0", 0);
    assert!(out.contains("Time set to 2024/01/01 12:30:00\r\n"), "{out}");
    assert_eq!(rig.hw.clock.hour, 12);
    assert_eq!(rig.hw.clock.minute, 30);

    let out = rig.type_line("time", 1);
    assert!(out.contains("Date (yyyy/mm/dd): 2024/01/01\r\n"), "{out}");
    assert!(out.contains("Time (hh:mm:ss): 12:30:00\r\n"), "{out}");
}

#[test]
fn impossible_date_is_rejected_without_touching_clock() {
    let mut rig = Rig::new();
    let before = rig.hw.clock;
    let out = rig.type_line("set date 24 2 30", 0);
    assert!(out.contains("Invalid Date-Time: 2024/02/30 00:00:00\r\n"), "{out}");
    assert_eq!(rig.hw.clock, before);

    let out = rig.type_line("set date 24 2 29", 1);
    assert!(out.contains("Date-Time set to 2024/02/29 00:00:00\r\n"), "{out}");
    assert_eq!(rig.hw.clock.weekday, 4, "29 Feb 2024 is a Thursday");
}

#[test]
fn out_of_range_rgb_is_unknown_command() {
    let mut rig = Rig::new();
    let out = rig.type_line("rgb 300 0 0", 0);
    assert!(out.contains(UNKNOWN_COMMAND), "{out}");
    assert_eq!(rig.app.leds().mode(LIGHT_USER), Some(LightMode::Off));
    assert!(rig.events.0.iter().any(|e| matches!(
        e,
        AppEvent::CommandRejected {
            channel: Channel::Interactive,
            ..
        }
    )));
}

#[test]
fn bad_operand_reports_parse_error_in_strict_mode() {
    let mut rig = Rig::new();
    let out = rig.type_line("rgb 10 2x 30", 0);
    assert!(out.contains("Non-number entered.\r\n"), "{out}");
    assert!(out.contains(UNKNOWN_COMMAND), "{out}");
    assert_eq!(rig.app.leds().remembered(LIGHT_USER), Some(BLUE));
}

#[test]
fn lenient_mode_drops_bad_operand_silently() {
    let config = SystemConfig {
        lenient_operands: true,
        ..SystemConfig::default()
    };
    let mut rig = Rig::with_config(config);
    let out = rig.type_line("rgb 10 2x 30", 0);
    assert!(!out.contains("Non-number entered."), "{out}");
    assert!(out.contains(UNKNOWN_COMMAND), "{out}");
}

#[test]
fn zero_blink_rate_is_rejected() {
    let mut rig = Rig::new();
    let out = rig.type_line("set blink 0", 0);
    assert!(out.contains("Blink rate must be at least 1 ms.\r\n"), "{out}");
    assert_eq!(rig.app.leds().blink_rate_ms(), 500);

    let out = rig.type_line("set blink 1000", 1);
    assert!(out.contains("Blink Rate: 1000\r\n"), "{out}");
    assert_eq!(rig.app.leds().blink_rate_ms(), 1000);
}

#[test]
fn scale_switch_changes_display() {
    let mut rig = Rig::new();
    rig.poll(0);
    let out = rig.type_line("set dht scale 0", 1);
    assert!(out.contains("Scale set to Celsius\r\n"), "{out}");

    let out = rig.type_line("dht", 2);
    assert!(out.contains("26°C, 45%RH\r\n"), "{out}");

    let out = rig.type_line("set dht scale 2", 3);
    assert!(out.contains("Scale must be 0 (Celsius) or 1 (Fahrenheit).\r\n"), "{out}");
}

#[test]
fn up_arrow_recalls_last_line() {
    let mut rig = Rig::new();
    rig.type_line("version", 0);
    rig.console.take_output();
    rig.console.type_bytes(b"\x1b[A\r");
    rig.poll(1);
    let out = rig.console.take_output();
    assert!(out.contains(concat!(env!("CARGO_PKG_VERSION"), "\r\n")), "{out}");
}

// ── DHT monitor ───────────────────────────────────────────────

#[test]
fn monitor_prints_samples_until_a_key_is_pressed() {
    let mut rig = Rig::new();
    rig.poll(0);

    let out = rig.type_line("dht monitor", 1);
    assert!(out.contains("DHT readings will now be printed.\r\n"), "{out}");
    assert!(out.contains("Press any key to continue..."), "{out}");
    assert!(rig.app.is_waiting_for_key());

    rig.poll(5_000);
    assert!(rig.console.take_output().contains("79°F, 45%RH\r\n"));

    rig.console.type_bytes(b"x");
    rig.poll(5_001);
    assert!(!rig.app.dht().monitoring());
    assert!(!rig.app.is_waiting_for_key());

    rig.poll(10_000);
    assert!(!rig.console.take_output().contains("°F"));
}

#[test]
fn monitor_reports_failed_reads() {
    let mut rig = Rig::new();
    rig.poll(0);
    rig.type_line("dht monitor", 1);
    rig.hw.fail_next(SensorError::Timeout);
    rig.poll(5_000);

    let out = rig.console.take_output();
    assert!(out.contains("DHT read failed, err=sensor timeout\r\n"), "{out}");
    assert!(rig.events.contains(&AppEvent::SampleFailed(SensorError::Timeout)));
}

// ── Network ───────────────────────────────────────────────────

#[test]
fn first_datagram_learns_and_persists_destination() {
    let mut rig = Rig::new();
    let reply = rig.exchange("version", PEER, 0).expect("reply sent");
    assert_eq!(reply, concat!(env!("CARGO_PKG_VERSION"), "\r\n"));

    assert_eq!(rig.app.network_settings().destination(), Some(PEER));
    assert!(rig.events.contains(&AppEvent::DestinationLearned(PEER)));
    let stored = NetworkSettings::load(&network_window(&mut rig.eeprom)).expect("readable");
    assert_eq!(stored.destination(), Some(PEER));
    assert_eq!(rig.app.packet_counts(), (1, 1));
}

#[test]
fn later_datagrams_reply_to_sender_without_relearning() {
    let mut rig = Rig::new();
    rig.exchange("version", PEER, 0);

    let other = SocketAddrV4::new(Ipv4Addr::new(10, 0, 0, 9), 5000);
    let reply = rig.exchange("dht alarm", other, 100).expect("reply sent");
    assert!(reply.contains("Alarm gates: 60, 70, 80, 90\r\n"), "{reply}");
    assert!(reply.contains("Alarm state: Comfortable\r\n"), "{reply}");
    assert_eq!(rig.app.network_settings().destination(), Some(PEER));
}

#[test]
fn silent_command_sends_no_reply() {
    let mut rig = Rig::new();
    assert_eq!(rig.exchange("led on", PEER, 0), None);
    assert_eq!(rig.app.leds().mode(LIGHT_USER), Some(LightMode::On));
    assert_eq!(rig.app.packet_counts(), (1, 0));
}

#[test]
fn monitor_is_refused_over_the_network() {
    let mut rig = Rig::new();
    let reply = rig.exchange("dht monitor", PEER, 0).expect("reply sent");
    assert_eq!(reply, "DHT MONITOR is only available on the local console.\r\n");
    assert!(!rig.app.dht().monitoring());
    assert!(!rig.app.is_waiting_for_key());
}

#[test]
fn help_text_is_identical_on_both_channels() {
    let mut rig = Rig::new();
    let reply = rig.exchange("help", PEER, 0).expect("reply sent");
    let console = rig.type_line("help", 1);
    assert!(reply.starts_with("Commands (square brackets denote options):\r\n"));
    assert!(console.contains(&reply), "{console}");
}

#[test]
fn rejected_datagram_gets_diagnostic() {
    let mut rig = Rig::new();
    let reply = rig.exchange("led sideways", PEER, 0).expect("reply sent");
    assert!(reply.contains(UNKNOWN_COMMAND), "{reply}");
    assert!(rig.events.0.iter().any(|e| matches!(
        e,
        AppEvent::CommandRejected {
            channel: Channel::Message,
            ..
        }
    )));
}

#[test]
fn link_loss_turns_network_light_red_and_stops_reading() {
    let mut rig = Rig::new();
    rig.poll(0);
    assert_eq!(rig.app.leds().shown(LIGHT_NETWORK), Some((0, 50, 0)));

    rig.net.link = false;
    rig.send_datagram("version", PEER);
    rig.poll(100);
    assert_eq!(rig.app.leds().shown(LIGHT_NETWORK), Some((50, 0, 0)));
    assert!(rig.events.contains(&AppEvent::LinkChanged(false)));
    assert_eq!(rig.net.inbox.len(), 1, "datagram left queued while down");

    rig.net.link = true;
    rig.poll(200);
    assert!(rig.net.inbox.is_empty());
}

// ── Alarm ─────────────────────────────────────────────────────

#[test]
fn alarm_change_notifies_learned_destination() {
    let mut rig = Rig::new();
    rig.exchange("version", PEER, 0);
    assert_eq!(rig.app.alarm_level(), AlarmLevel::Comfortable);

    // 35.5 °C is 95 °F, above the top gate.
    rig.hw.push_reading(35.5, 40.0);
    rig.poll(5_000);

    assert_eq!(rig.app.alarm_level(), AlarmLevel::MajorOver);
    let (to, text) = rig.net.last_sent().expect("alarm sent");
    assert_eq!(*to, PEER);
    assert_eq!(text, "Arduino Alarm: Temperature Major Over 95°F, 40%RH\r\n");
    assert!(rig.events.contains(&AppEvent::AlarmChanged {
        level: AlarmLevel::MajorOver,
        fahrenheit: 95,
    }));
    assert_eq!(rig.app.leds().mode(LIGHT_ALARM), Some(LightMode::Blink));
    assert_eq!(rig.app.leds().remembered(LIGHT_ALARM), Some((100, 0, 0)));

    // Same level again: no second notification.
    let sent = rig.net.sent.len();
    rig.hw.push_reading(36.0, 40.0);
    rig.poll(10_000);
    assert_eq!(rig.net.sent.len(), sent);
}

#[test]
fn alarm_without_destination_only_lights_led() {
    let mut rig = Rig::new();
    rig.hw.push_reading(10.3, 50.0);
    rig.poll(0);

    assert_eq!(rig.app.alarm_level(), AlarmLevel::MajorUnder);
    assert!(rig.net.sent.is_empty());
    assert_eq!(rig.app.leds().remembered(LIGHT_ALARM), Some((40, 0, 40)));
}

#[test]
fn set_alarm_gate_persists_and_validates() {
    let mut rig = Rig::new();
    let out = rig.type_line("set alarm 3 95", 0);
    assert!(out.contains("Alarm Gate 3: 95\r\n"), "{out}");
    let stored = AlarmGates::load(&mut gates_window(&mut rig.eeprom), [0; 4]).expect("readable");
    assert_eq!(stored.as_array(), [60, 70, 80, 95]);

    let out = rig.type_line("set alarm 4 10", 1);
    assert!(out.contains("Alarm gate must be 0-3.\r\n"), "{out}");

    let out = rig.type_line("set alarm 1 50", 2);
    assert!(out.contains("Alarm Gate 1: 50\r\n"), "{out}");
    assert!(out.contains("Warning: alarm gates are not in ascending order.\r\n"), "{out}");
    assert_eq!(rig.app.gates().as_array(), [60, 50, 80, 95]);
}

#[test]
fn persisted_state_survives_restart() {
    let mut rig = Rig::new();
    rig.type_line("set alarm 0 40", 0);
    rig.exchange("version", PEER, 100);

    let rebooted = Rig::with_eeprom(SystemConfig::default(), rig.eeprom.clone());
    assert_eq!(rebooted.app.gates().as_array(), [40, 70, 80, 90]);
    assert_eq!(rebooted.app.network_settings().destination(), Some(PEER));
}

// ── Log ───────────────────────────────────────────────────────

fn logging_rig() -> Rig {
    Rig::with_config(SystemConfig {
        log_interval_ms: 10_000,
        ..SystemConfig::default()
    })
}

#[test]
fn log_appends_on_its_own_cadence() {
    let mut rig = logging_rig();
    rig.poll(0);
    assert_eq!(rig.app.log().count(), 1);
    assert!(rig.events.contains(&AppEvent::LogAppended {
        count: 1,
        write_offset: 13,
    }));

    rig.poll(5_000);
    assert_eq!(rig.app.log().count(), 1);

    rig.poll(10_000);
    assert_eq!(rig.app.log().count(), 2);
    assert!(rig.events.contains(&AppEvent::LogAppended {
        count: 2,
        write_offset: 22,
    }));

    let out = rig.type_line("dht log", 10_001);
    assert!(out.contains("Date\tTime\tTemp, Humidity\r\n"), "{out}");
    assert!(out.contains("2024/01/01 00:00:00\t78°F, 45%RH\r\n"), "{out}");
}

#[test]
fn log_info_and_clear() {
    let mut rig = logging_rig();
    rig.poll(0);

    let out = rig.type_line("dht log info", 1);
    assert!(
        out.contains("1 entries stored in the log. Next memory address is 13\r\n"),
        "{out}"
    );
    assert!(out.contains("Max Temperature: 78°F\r\n"), "{out}");
    assert!(out.contains("Min Humidity: 45%RH\r\n"), "{out}");

    let out = rig.type_line("dht log clear", 2);
    assert!(out.contains("DHT Log cleared.\r\n"), "{out}");
    assert!(rig.events.contains(&AppEvent::LogCleared));

    let out = rig.type_line("dht log", 3);
    assert!(out.contains("No logs.\r\n"), "{out}");

    let out = rig.type_line("dht log info", 4);
    assert!(
        out.contains("0 entries stored in the log. Next memory address is 4\r\n"),
        "{out}"
    );
    assert!(!out.contains("Max Temperature"), "{out}");
}

#[test]
fn failed_sample_is_not_logged() {
    let mut rig = logging_rig();
    rig.hw.fail_next(SensorError::Checksum);
    rig.poll(0);
    assert!(rig.app.log().is_empty());
    assert!(rig.events.contains(&AppEvent::SampleFailed(SensorError::Checksum)));

    // The log tick was not spent on the failed read.
    rig.poll(5_000);
    assert_eq!(rig.app.log().count(), 1);
}
