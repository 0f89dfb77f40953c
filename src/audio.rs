//! Sound cues for simulation events
//!
//! The simulation only raises `GameEvent`s; this module turns them into the
//! named cues a playback backend loads (`<name>.wav`). Playback itself lives
//! outside the crate.

use serde::{Deserialize, Serialize};

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Run starts
    Beginning,
    /// First visit to a cell
    Chomp,
    /// Out of lives
    Death,
    /// Invincibility power collected
    EatFlask,
    /// Ghost eaten while invincible
    EatGhost,
    /// Extra life collected
    ExtraPac,
}

impl SoundEffect {
    /// Cue for an event, if it has one
    pub fn for_event(event: GameEvent) -> Option<Self> {
        match event {
            GameEvent::GameStart => Some(SoundEffect::Beginning),
            GameEvent::Chomp => Some(SoundEffect::Chomp),
            GameEvent::GameOver => Some(SoundEffect::Death),
            GameEvent::CollectPower => Some(SoundEffect::EatFlask),
            GameEvent::EatGhost => Some(SoundEffect::EatGhost),
            GameEvent::CollectLife => Some(SoundEffect::ExtraPac),
            // A single lost life is silent
            GameEvent::LoseLife | GameEvent::InvincibilityEnded => None,
        }
    }

    /// Asset name without extension
    pub fn asset_name(self) -> &'static str {
        match self {
            SoundEffect::Beginning => "beginning",
            SoundEffect::Chomp => "chomp",
            SoundEffect::Death => "death",
            SoundEffect::EatFlask => "eatflask",
            SoundEffect::EatGhost => "eatghost",
            SoundEffect::ExtraPac => "extrapac",
        }
    }
}

/// A cue ready for playback
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cue {
    pub effect: SoundEffect,
    pub volume: f32,
}

/// Collects the cues of one tick for a playback backend
#[derive(Debug, Clone)]
pub struct CueQueue {
    pending: Vec<SoundEffect>,
    master_volume: f32,
    muted: bool,
}

impl Default for CueQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl CueQueue {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            master_volume: 0.3,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all cues
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Queue the cues for a tick's events; a cue plays at most once per tick
    pub fn push_events(&mut self, events: &[GameEvent]) {
        for effect in events.iter().copied().filter_map(SoundEffect::for_event) {
            if !self.pending.contains(&effect) {
                self.pending.push(effect);
            }
        }
    }

    /// Take everything queued, in event order. Nothing comes out while muted.
    pub fn drain(&mut self) -> Vec<Cue> {
        let volume = self.effective_volume();
        let pending = std::mem::take(&mut self.pending);
        if volume <= 0.0 {
            return Vec::new();
        }
        pending
            .into_iter()
            .map(|effect| Cue { effect, volume })
            .collect()
    }
}
