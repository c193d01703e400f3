//! Fuzz target: `CircularLog` over arbitrary EEPROM contents
//!
//! Seeds the log region with fuzzer bytes, opens it, then drives an
//! append / clear / read sequence, verifying:
//! - `open` never panics and always yields a consistent header
//! - The ring never reports more than `CAPACITY` entries
//! - Every stored entry can be read back after any operation
//! - Nothing outside the log region is written
//!
//! cargo fuzz run fuzz_log_store

#![no_main]

use envnode::drivers::rtc::DateTime;
use envnode::storage::log_store::{CAPACITY, CircularLog, LogEntry};
use envnode::storage::{EEPROM_SIZE, LOG_LEN, MemRegion, PersistentRegion, log_window};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let split = data.len().min(LOG_LEN);
    let (image, ops) = data.split_at(split);

    let mut dev = MemRegion::new(EEPROM_SIZE);
    let _ = dev.write_at(0, image);
    let tail = dev.as_bytes()[LOG_LEN..].to_vec();

    let Ok(mut log) = CircularLog::open(&mut log_window(&mut dev)) else {
        return;
    };
    assert!(log.count() <= CAPACITY);

    for (i, &op) in ops.iter().enumerate() {
        if op == 0xFF {
            log.clear(&mut log_window(&mut dev)).expect("clear");
        } else {
            let entry = LogEntry {
                timestamp: DateTime {
                    second: op % 60,
                    minute: (i % 60) as u8,
                    ..DateTime::default()
                },
                temperature_c: op as i8,
                humidity_pct: op / 3,
            };
            log.append(&mut log_window(&mut dev), &entry).expect("append");
        }
        assert!(log.count() <= CAPACITY);
    }

    let window = log_window(&mut dev);
    assert_eq!(log.iter(&window).filter(Result::is_ok).count(), log.count());
    drop(window);

    assert_eq!(&dev.as_bytes()[LOG_LEN..], tail.as_slice());
});
