//! Frame-timed attack animation shared by melee and ranged attacks.

use serde::{Deserialize, Serialize};
use warden_common::Millis;

/// What happened to a swing during one update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SwingProgress {
    /// The spawn frame was reached; the effect must be produced now
    pub spawn: bool,
    /// The swing ended (completed or aborted)
    pub finished: bool,
}

/// Animation progress of one attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Swing {
    active: bool,
    frame: u8,
    last_frame_at: Millis,
    spawned: bool,
}

impl Swing {
    /// Starts a new swing at frame zero.
    pub fn start(&mut self, now: Millis) {
        *self = Self {
            active: true,
            frame: 0,
            last_frame_at: now,
            spawned: false,
        };
    }

    /// Advances one frame per elapsed interval.
    ///
    /// A swing without frames for the current facing is cancelled silently.
    pub fn advance(
        &mut self,
        now: Millis,
        frame_interval_ms: u64,
        total_frames: u8,
        spawn_frame: u8,
    ) -> SwingProgress {
        if !self.active {
            return SwingProgress::default();
        }
        if total_frames == 0 {
            self.cancel();
            return SwingProgress {
                spawn: false,
                finished: true,
            };
        }
        if now.since(self.last_frame_at) < frame_interval_ms {
            return SwingProgress::default();
        }

        self.last_frame_at = now;
        self.frame = self.frame.saturating_add(1);

        let mut progress = SwingProgress::default();
        if !self.spawned && self.frame == spawn_frame {
            self.spawned = true;
            progress.spawn = true;
        }
        if self.frame >= total_frames {
            self.cancel();
            progress.finished = true;
        }
        progress
    }

    /// Stops the swing without producing anything further.
    pub fn cancel(&mut self) {
        self.active = false;
        self.frame = 0;
        self.spawned = false;
    }

    /// Whether the animation is playing.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Current frame index.
    #[must_use]
    pub fn frame(&self) -> u8 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swing_spawns_once_and_finishes() {
        let mut swing = Swing::default();
        swing.start(Millis::ZERO);

        assert_eq!(swing.advance(Millis::new(99), 100, 6, 4), SwingProgress::default());
        for t in 1..=3 {
            let p = swing.advance(Millis::new(t * 100), 100, 6, 4);
            assert!(!p.spawn && !p.finished);
        }
        let p = swing.advance(Millis::new(400), 100, 6, 4);
        assert!(p.spawn && !p.finished);
        assert!(!swing.advance(Millis::new(500), 100, 6, 4).spawn);
        let p = swing.advance(Millis::new(600), 100, 6, 4);
        assert!(p.finished);
        assert!(!swing.is_active());
    }

    #[test]
    fn test_spawn_on_last_frame() {
        let mut swing = Swing::default();
        swing.start(Millis::ZERO);
        for t in 1..=3 {
            swing.advance(Millis::new(t * 100), 100, 4, 4);
        }
        let p = swing.advance(Millis::new(400), 100, 4, 4);
        assert!(p.spawn && p.finished);
    }

    #[test]
    fn test_missing_frames_abort() {
        let mut swing = Swing::default();
        swing.start(Millis::ZERO);
        let p = swing.advance(Millis::new(1_000), 100, 0, 4);
        assert!(p.finished && !p.spawn);
        assert!(!swing.is_active());
    }

    #[test]
    fn test_inactive_swing_is_inert() {
        let mut swing = Swing::default();
        assert_eq!(swing.advance(Millis::new(1_000), 100, 4, 1), SwingProgress::default());
    }
}
