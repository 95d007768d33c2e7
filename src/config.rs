//! Runtime configuration shared by every lab instance
//!
//! The binary fills this from command-line flags and `LABBENCH_*` environment
//! variables; the library never reads the environment itself.

use crate::input::KeyMap;
use std::time::Duration;

/// Display frames per second when none is given
pub const DEFAULT_FPS: u32 = 30;

/// Frames a momentary hold survives without a repeat (about 200 ms at 30 fps)
pub const DEFAULT_HOLD_FRAMES: u32 = 6;

/// Longest frame step fed to a lab clock; stalls beyond this are not replayed
pub const MAX_FRAME_DT: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct LabConfig {
    pub fps: u32,
    pub hold_frames: u32,
    pub keymap: KeyMap,
    pub max_frame_dt: Duration,
}

impl LabConfig {
    /// Target wall time between frames
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.fps.clamp(1, 240)
    }

    /// Clamp a measured frame time to what the clock may absorb
    pub fn clamp_dt(&self, dt: Duration) -> Duration {
        dt.min(self.max_frame_dt)
    }
}

impl Default for LabConfig {
    fn default() -> Self {
        LabConfig {
            fps: DEFAULT_FPS,
            hold_frames: DEFAULT_HOLD_FRAMES,
            keymap: KeyMap::default(),
            max_frame_dt: MAX_FRAME_DT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_interval() {
        let config = LabConfig {
            fps: 50,
            ..LabConfig::default()
        };
        assert_eq!(config.frame_interval(), Duration::from_millis(20));

        let config = LabConfig {
            fps: 0,
            ..LabConfig::default()
        };
        assert_eq!(config.frame_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_clamp_dt() {
        let config = LabConfig::default();
        assert_eq!(config.clamp_dt(Duration::from_secs(3)), MAX_FRAME_DT);
        assert_eq!(
            config.clamp_dt(Duration::from_millis(16)),
            Duration::from_millis(16)
        );
    }
}
