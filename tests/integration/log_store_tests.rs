//! Log ring inside the full EEPROM layout.

use envnode::drivers::rtc::DateTime;
use envnode::storage::log_store::{CAPACITY, CircularLog, LogEntry};
use envnode::storage::region::ERASED;
use envnode::storage::{EEPROM_SIZE, LOG_LEN, MemRegion, PersistentRegion, log_window};

fn entry(n: u8) -> LogEntry {
    LogEntry {
        timestamp: DateTime {
            year: 24,
            month: 3,
            day: 1 + n / 60,
            weekday: 5,
            hour: 8,
            minute: n % 60,
            second: 0,
        },
        temperature_c: 20 + (n % 10) as i8,
        humidity_pct: 40 + n % 20,
    }
}

fn append_n(dev: &mut MemRegion, log: &mut CircularLog, n: u8) {
    for i in 0..n {
        log.append(&mut log_window(dev), &entry(i)).expect("append");
    }
}

#[test]
fn fresh_device_initialises_only_the_log_region() {
    let mut dev = MemRegion::new(EEPROM_SIZE);
    let log = CircularLog::open(&mut log_window(&mut dev)).expect("open");

    assert!(log.is_empty());
    assert_eq!(log.write_offset(), 4);
    assert!(dev.as_bytes()[LOG_LEN..].iter().all(|&b| b == ERASED));
}

#[test]
fn entries_survive_reopen() {
    let mut dev = MemRegion::new(EEPROM_SIZE);
    let mut log = CircularLog::open(&mut log_window(&mut dev)).expect("open");
    append_n(&mut dev, &mut log, 5);

    let reopened = CircularLog::open(&mut log_window(&mut dev)).expect("reopen");
    assert_eq!(reopened, log);
    let window = log_window(&mut dev);
    let got: Vec<LogEntry> = reopened.iter(&window).map(|e| e.expect("read")).collect();
    assert_eq!(got, (0..5).map(entry).collect::<Vec<_>>());
}

#[test]
fn full_ring_overwrites_oldest_first() {
    let mut dev = MemRegion::new(EEPROM_SIZE);
    let mut log = CircularLog::open(&mut log_window(&mut dev)).expect("open");
    let total = CAPACITY as u8 + 3;
    append_n(&mut dev, &mut log, total);

    assert_eq!(log.count(), CAPACITY);
    let window = log_window(&mut dev);
    let got: Vec<LogEntry> = log.iter(&window).map(|e| e.expect("read")).collect();
    assert_eq!(got.first(), Some(&entry(3)));
    assert_eq!(got.last(), Some(&entry(total - 1)));

    let stats = log.stats(&window).expect("read").expect("non-empty");
    assert_eq!(stats.min_temperature_c, 20);
    assert_eq!(stats.max_temperature_c, 29);
    drop(window);

    assert!(dev.as_bytes()[LOG_LEN..].iter().all(|&b| b == ERASED));
}

#[test]
fn corrupt_header_is_reset() {
    let mut dev = MemRegion::new(EEPROM_SIZE);
    // Offset 5 is not on a slot boundary.
    dev.write_at(0, &[5, 0, 1, 0]).expect("write");
    let log = CircularLog::open(&mut log_window(&mut dev)).expect("open");
    assert!(log.is_empty());
    assert_eq!(log.write_offset(), 4);
}
