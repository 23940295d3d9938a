//! Terminal presentation of the clock state.
//!
//! The seam a real dial renderer would plug into; here it keeps a single
//! updating line with the digital readout.

use std::io::{self, Write};
use tracing::debug;

use crate::ticker::TickFrame;

pub struct ConsoleSurface;

impl ConsoleSurface {
    pub fn new() -> Self {
        Self
    }

    pub fn present(&mut self, frame: &TickFrame) {
        debug!(
            "hands: h={:.1} m={:.1} s={:.1} deg",
            frame.hour_deg, frame.minute_deg, frame.second_deg
        );

        print!("\r{}  (24h format)", frame.digital);
        let _ = io::stdout().flush();
    }
}
