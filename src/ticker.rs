//! Per-tick clock state: hand angles, digital readout, phrase dispatch.
//!
//! Each tick snapshots the wall clock once, derives the three hand angles
//! (0 degrees at the 12 mark, clockwise), and hands a phrase to the
//! announcer at most once per wall-clock second. Nothing here blocks;
//! speech latency never touches the tick cadence.

use chrono::{Local, Timelike};

use crate::announcer::Announcer;
use crate::phrases;

/// Immutable snapshot of the local time, taken once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockReading {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl ClockReading {
    pub fn now() -> Self {
        let now = Local::now();
        Self {
            hour: now.hour(),
            minute: now.minute(),
            second: now.second(),
        }
    }
}

/// What a dial renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TickFrame {
    pub hour_deg: f64,
    pub minute_deg: f64,
    pub second_deg: f64,
    /// 24-hour digital readout, zero padded.
    pub digital: String,
}

impl TickFrame {
    fn from_reading(reading: &ClockReading) -> Self {
        Self {
            hour_deg: hour_angle(reading.hour, reading.minute),
            minute_deg: minute_angle(reading.minute, reading.second),
            second_deg: second_angle(reading.second),
            digital: format!(
                "{:02}:{:02}:{:02}",
                reading.hour, reading.minute, reading.second
            ),
        }
    }
}

/// The hour hand moves on the 12-hour dial and creeps with the minutes.
pub fn hour_angle(hour: u32, minute: u32) -> f64 {
    ((hour % 12) as f64 + minute as f64 / 60.0) * 30.0
}

pub fn minute_angle(minute: u32, second: u32) -> f64 {
    (minute as f64 + second as f64 / 60.0) * 6.0
}

pub fn second_angle(second: u32) -> f64 {
    second as f64 * 6.0
}

/// Drives one update cycle: angles out, at most one phrase per second in.
pub struct Ticker {
    last_spoken_second: Option<u32>,
}

impl Ticker {
    pub fn new() -> Self {
        Self {
            last_spoken_second: None,
        }
    }

    pub fn on_tick(&mut self, announcer: &Announcer) -> TickFrame {
        self.tick_at(ClockReading::now(), announcer)
    }

    /// If the timer jitters and fires twice inside one wall-clock second,
    /// the dedup on `last_spoken_second` keeps the phrase from repeating.
    pub fn tick_at(&mut self, reading: ClockReading, announcer: &Announcer) -> TickFrame {
        let frame = TickFrame::from_reading(&reading);

        if announcer.speech_enabled() && self.last_spoken_second != Some(reading.second) {
            let phrase = phrases::format_phrase(reading.hour, reading.minute, reading.second);
            // Best effort: a full queue drops the phrase, the next second
            // gets a fresh one.
            announcer.try_enqueue(phrase);
            self.last_spoken_second = Some(reading.second);
        }

        frame
    }
}
