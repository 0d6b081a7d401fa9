//! Animation preview stepping.
//!
//! `Playback` only tracks which frame index the preview shows; it never
//! touches the sprite. Front ends call [`Playback::tick`] every
//! [`Playback::frame_interval`] and draw the returned frame.

use crate::config::PlaybackConfig;
use log::debug;
use std::time::Duration;

pub const MIN_FPS: u32 = 1;
pub const MAX_FPS: u32 = 60;

/// Current travel direction through the play range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayDirection {
    Forward,
    Backward,
}

/// Preview playback state over a sprite's frames.
#[derive(Debug, Clone, PartialEq)]
pub struct Playback {
    /// Frames per second (1 - 60)
    pub fps: u32,
    /// Inclusive 1-based play range `(start, end)`
    pub range: (usize, usize),
    /// Bounce at either end instead of looping
    pub ping_pong: bool,
    /// Direction of the next tick
    pub direction: PlayDirection,
    /// Zero-based index of the frame being shown
    pub index: usize,
    /// Whether `tick` advances
    pub playing: bool,
    frame_count: usize,
}

impl Playback {
    /// Creates playback over `frame_count` frames, playing the whole range.
    pub fn new(frame_count: usize, fps: u32) -> Self {
        let frame_count = frame_count.max(1);
        Self {
            fps: fps.clamp(MIN_FPS, MAX_FPS),
            range: (1, frame_count),
            ping_pong: false,
            direction: PlayDirection::Forward,
            index: 0,
            playing: true,
            frame_count,
        }
    }

    pub fn from_config(config: &PlaybackConfig, frame_count: usize) -> Self {
        let mut playback = Self::new(frame_count, config.fps);
        playback.ping_pong = config.ping_pong;
        playback
    }

    /// Time between two ticks.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps.clamp(MIN_FPS, MAX_FPS) as f64)
    }

    pub fn set_fps(&mut self, fps: u32) {
        self.fps = fps.clamp(MIN_FPS, MAX_FPS);
    }

    /// Sets the inclusive 1-based play range, clamped to the frame count.
    ///
    /// `end` never falls below `start`. Direction resets to forward and the
    /// index is pulled into the range.
    pub fn set_range(&mut self, start: usize, end: usize) {
        let start = start.clamp(1, self.frame_count);
        let end = end.clamp(start, self.frame_count);
        self.range = (start, end);
        self.direction = PlayDirection::Forward;
        self.index = self.index.clamp(start - 1, end - 1);
    }

    pub fn set_ping_pong(&mut self, ping_pong: bool) {
        self.ping_pong = ping_pong;
        self.direction = PlayDirection::Forward;
    }

    /// Re-clamps range and index after frames were added or deleted.
    ///
    /// A range that ended on the old last frame keeps following the last frame.
    pub fn set_frame_count(&mut self, frame_count: usize) {
        let frame_count = frame_count.max(1);
        let follows_end = self.range.1 == self.frame_count;
        self.frame_count = frame_count;
        let end = if follows_end {
            frame_count
        } else {
            self.range.1.min(frame_count)
        };
        let start = self.range.0.min(end);
        self.range = (start, end);
        self.index = self.index.min(frame_count - 1);
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Advances one step if playing and returns the frame to show.
    pub fn tick(&mut self) -> usize {
        if self.playing {
            self.advance();
        }
        self.index
    }

    /// Advances one step following the loop or ping-pong rule.
    pub fn advance(&mut self) -> usize {
        let (first, last) = self.bounds();

        if !self.ping_pong {
            self.index = if self.index >= last { first } else { self.index + 1 };
            return self.index;
        }

        match self.direction {
            PlayDirection::Forward => {
                if self.index >= last {
                    self.direction = PlayDirection::Backward;
                    self.index = last.saturating_sub(1).max(first);
                } else {
                    self.index += 1;
                }
            }
            PlayDirection::Backward => {
                if self.index <= first {
                    self.direction = PlayDirection::Forward;
                    self.index = (first + 1).min(last);
                } else {
                    self.index -= 1;
                }
            }
        }
        debug!("Playback frame {} ({:?})", self.index, self.direction);
        self.index
    }

    /// Manual step forward, wrapping at the end of the range.
    pub fn step_forward(&mut self) -> usize {
        let (first, last) = self.bounds();
        self.index = if self.index >= last { first } else { self.index + 1 };
        self.index
    }

    /// Manual step back, wrapping at the start of the range.
    pub fn step_back(&mut self) -> usize {
        let (first, last) = self.bounds();
        self.index = if self.index <= first { last } else { self.index - 1 };
        self.index
    }

    pub fn toggle_playing(&mut self) {
        self.playing = !self.playing;
    }

    /// Restarts from the first frame over the whole sprite.
    pub fn reset(&mut self) {
        self.playing = true;
        self.index = 0;
        self.range = (1, self.frame_count);
        self.direction = PlayDirection::Forward;
    }

    /// Zero-based inclusive bounds of the play range.
    fn bounds(&self) -> (usize, usize) {
        (self.range.0 - 1, self.range.1 - 1)
    }
}
