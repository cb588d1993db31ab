//! Audio and cursor collaborators that only log.

use stride_motion::{AudioSink, CursorControl};
use tracing::{debug, info};

/// Logs each footstep instead of playing it.
#[derive(Debug, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play_once(&mut self, clip: &str, volume: f32, pitch: f32) {
        debug!(clip, volume, pitch, "play one-shot");
    }
}

/// Headless pointer lock.
#[derive(Debug, Default)]
pub struct LogCursor;

impl CursorControl for LogCursor {
    fn set_captured(&mut self, captured: bool) {
        info!(captured, "cursor capture");
    }
}
