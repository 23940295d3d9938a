//! Speech synthesis backend.
//!
//! Wraps the platform synthesizer behind a blocking `speak` so the
//! announcer worker can serialize utterances. Rate and volume are applied
//! once at startup; a synthesizer that fails to initialize is fatal.

use std::thread;
use std::time::Duration;
use tracing::{debug, info};
use tts::Tts;

use crate::config::SpeechConfig;

/// How often to check whether the utterance has finished playing.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Words-per-minute the platform's normal rate is taken to correspond to.
const NOMINAL_WPM: f32 = 200.0;

/// A speech capability: `speak` returns only once playback has completed
/// (or failed). The announcer worker is the sole caller.
pub trait SpeechBackend {
    fn speak(&mut self, text: &str) -> Result<(), String>;
}

pub struct TtsBackend {
    tts: Tts,
    can_poll: bool,
    rate_wpm: f32,
}

impl TtsBackend {
    pub fn new(config: &SpeechConfig) -> Result<Self, String> {
        let mut tts =
            Tts::default().map_err(|e| format!("Failed to initialize speech engine: {e}"))?;

        let features = tts.supported_features();

        if features.rate {
            let rate = map_rate(
                config.rate_wpm,
                tts.min_rate(),
                tts.normal_rate(),
                tts.max_rate(),
            );
            tts.set_rate(rate)
                .map_err(|e| format!("Failed to set speech rate: {e}"))?;
        }

        if features.volume {
            let volume = config.volume.clamp(tts.min_volume(), tts.max_volume());
            tts.set_volume(volume)
                .map_err(|e| format!("Failed to set speech volume: {e}"))?;
        }

        info!(
            "Speech engine ready (rate: {} wpm, volume: {:.2})",
            config.rate_wpm, config.volume
        );

        Ok(Self {
            tts,
            can_poll: features.is_speaking,
            rate_wpm: config.rate_wpm,
        })
    }
}

impl SpeechBackend for TtsBackend {
    fn speak(&mut self, text: &str) -> Result<(), String> {
        self.tts
            .speak(text, false)
            .map_err(|e| format!("Utterance failed: {e}"))?;

        if self.can_poll {
            // The engine returns immediately; wait for playback to drain.
            loop {
                match self.tts.is_speaking() {
                    Ok(true) => thread::sleep(POLL_INTERVAL),
                    Ok(false) => break,
                    Err(e) => return Err(format!("Lost track of utterance: {e}")),
                }
            }
        } else {
            // No playback introspection on this platform; approximate the
            // duration from the word count and configured rate.
            let words = text.split_whitespace().count().max(1);
            let secs = words as f32 * 60.0 / self.rate_wpm;
            thread::sleep(Duration::from_secs_f32(secs));
        }

        debug!("Utterance finished ({} chars)", text.len());
        Ok(())
    }
}

/// Map words-per-minute onto the platform rate scale, pivoting at the
/// platform's normal rate and clamping to its bounds.
fn map_rate(wpm: f32, min: f32, normal: f32, max: f32) -> f32 {
    let t = (wpm - NOMINAL_WPM) / NOMINAL_WPM;
    let rate = if t >= 0.0 {
        normal + t * (max - normal)
    } else {
        normal + t * (normal - min)
    };
    rate.clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nominal_wpm_maps_to_normal_rate() {
        assert_eq!(map_rate(NOMINAL_WPM, 0.0, 1.0, 2.0), 1.0);
    }

    #[test]
    fn extreme_rates_clamp_to_platform_bounds() {
        assert_eq!(map_rate(10_000.0, 0.0, 1.0, 2.0), 2.0);
        assert_eq!(map_rate(0.0, 0.0, 1.0, 2.0), 0.0);
    }

    #[test]
    fn slower_than_nominal_lands_between_min_and_normal() {
        let rate = map_rate(100.0, 0.0, 1.0, 2.0);
        assert!(rate > 0.0 && rate < 1.0);
    }

    #[test]
    fn rate_mapping_handles_negative_platform_ranges() {
        // speech-dispatcher style: rates run -100..100 around normal 0.
        assert_eq!(map_rate(NOMINAL_WPM, -100.0, 0.0, 100.0), 0.0);
        assert!(map_rate(300.0, -100.0, 0.0, 100.0) > 0.0);
        assert!(map_rate(100.0, -100.0, 0.0, 100.0) < 0.0);
    }
}
