//! Frame-export bookkeeping. Encoding and saving the PNG is the host's job;
//! this only decides whether a frame is kept and what it is called.

pub const DEFAULT_PREFIX: &str = "voronoi";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRecorder {
    prefix: String,
    recording: bool,
    saved: u32,
}

impl FrameRecorder {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            recording: false,
            saved: 0,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn saved(&self) -> u32 {
        self.saved
    }

    /// Starts or stops recording. Returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.set_recording(!self.recording);
        self.recording
    }

    pub fn set_recording(&mut self, on: bool) {
        if on == self.recording {
            return;
        }
        self.recording = on;
        if on {
            log::info!("recording started: {}", file_name(&self.prefix, 0));
        } else {
            log::info!("recording stopped after {} frames", self.saved);
            self.saved = 0;
        }
    }

    /// Name for the current frame while recording, then advances the counter.
    pub fn next_file_name(&mut self) -> Option<String> {
        if !self.recording {
            return None;
        }
        let name = file_name(&self.prefix, self.saved);
        self.saved += 1;
        if self.saved % 100 == 0 {
            log::info!("{} frames recorded", self.saved);
        }
        Some(name)
    }
}

impl Default for FrameRecorder {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

/// `<prefix>-frame-0000.png`
pub fn file_name(prefix: &str, index: u32) -> String {
    format!("{prefix}-frame-{index:04}.png")
}
