//! Main service loop.
//!
//! A fixed-cadence interval drives the ticker; control events and Ctrl-C
//! are folded into the same select loop. The announcer runs on its own
//! thread, so a slow utterance never delays the next tick.

use tokio::sync::mpsc;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{info, warn};

use crate::announcer::Announcer;
use crate::config::Config;
use crate::controls::ControlEvent;
use crate::surface::ConsoleSurface;
use crate::ticker::Ticker;

pub struct ClockService {
    config: Config,
    ticker: Ticker,
    announcer: Announcer,
    surface: ConsoleSurface,
}

impl ClockService {
    pub fn new(config: Config, announcer: Announcer) -> Self {
        Self {
            config,
            ticker: Ticker::new(),
            announcer,
            surface: ConsoleSurface::new(),
        }
    }

    pub async fn run(
        &mut self,
        mut controls: mpsc::Receiver<ControlEvent>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut tick = interval(Duration::from_millis(self.config.clock.tick_ms));
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            "Clock running, tick every {}ms (commands: on, off, mute, quit)",
            self.config.clock.tick_ms
        );

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    let frame = self.ticker.on_tick(&self.announcer);
                    self.surface.present(&frame);
                }
                event = controls.recv() => {
                    match event {
                        Some(ControlEvent::SpeechOn) => self.announcer.set_speech_enabled(true),
                        Some(ControlEvent::SpeechOff) => self.announcer.set_speech_enabled(false),
                        Some(ControlEvent::MuteNow) => self.announcer.mute_now(),
                        Some(ControlEvent::Quit) => {
                            info!("Quit requested");
                            break;
                        }
                        None => {
                            warn!("Control channel closed");
                            break;
                        }
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Ctrl-C received");
                    break;
                }
            }
        }

        info!("Shutting down, letting the current utterance finish");
        self.announcer.shutdown();
        Ok(())
    }
}
