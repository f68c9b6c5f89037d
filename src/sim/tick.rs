//! Per-tick orchestration
//!
//! `Session` owns the world and the trigger set and runs one tick in a fixed
//! order: input, triggers, draw+update, death check, collision, present.

use super::avatar::Intents;
use super::collision::resolve_collisions;
use super::patterns::schedule_from;
use super::scheduler::Scheduler;
use super::world::World;
use crate::Settings;
use crate::audio::AudioSink;
use crate::consts::OVERLAY_ALPHA;
use crate::input::TickInput;
use crate::renderer::{Renderer, colors};

/// Whether a run is in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Avatar alive, script running
    Playing,
    /// Avatar destroyed, waiting for the restart key
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Quit,
}

/// One play session
pub struct Session {
    pub settings: Settings,
    pub world: World,
    pub scheduler: Scheduler,
    pub phase: SessionPhase,
    /// Held input, carried over restarts
    intents: Intents,
    /// Seconds since the current run started
    pub run_time: f32,
    pub ticks: u64,
    pub deaths: u32,
}

impl Session {
    /// An idle session; call `start` to spawn the avatar and the script
    pub fn new(settings: Settings) -> Self {
        let world = World::new(settings.avatar_health, settings.seed);
        Self {
            settings,
            world,
            scheduler: Scheduler::new(),
            phase: SessionPhase::Dead,
            intents: Intents::default(),
            run_time: 0.0,
            ticks: 0,
            deaths: 0,
        }
    }

    /// Spawn a fresh avatar, register the script and start the music
    pub fn start(&mut self, audio: &mut dyn AudioSink) {
        self.world.spawn_avatar();
        for trigger in schedule_from(self.settings.start_offset) {
            self.scheduler.register(trigger);
        }
        audio.play(&self.settings.music_track, true, self.settings.start_offset);
        self.phase = SessionPhase::Playing;
        self.run_time = 0.0;
        log::info!(
            "Run started at {:.2}s with {} triggers",
            self.settings.start_offset,
            self.scheduler.len()
        );
    }

    /// Stop the music and empty the registry and trigger set
    pub fn reset(&mut self, audio: &mut dyn AudioSink) {
        audio.stop();
        self.world.clear();
        self.world.reseed(self.settings.seed);
        self.scheduler.clear();
    }

    pub fn restart(&mut self, audio: &mut dyn AudioSink) {
        log::info!("Restart requested");
        self.reset(audio);
        self.start(audio);
    }

    fn on_death(&mut self, audio: &mut dyn AudioSink) {
        self.deaths += 1;
        log::info!("Avatar died after {:.2}s (death #{})", self.run_time, self.deaths);
        self.reset(audio);
        self.phase = SessionPhase::Dead;
        if self.settings.auto_restart {
            self.start(audio);
        }
    }

    /// Advance the session by `dt` seconds
    pub fn tick(
        &mut self,
        input: &TickInput,
        dt: f32,
        renderer: &mut dyn Renderer,
        audio: &mut dyn AudioSink,
    ) -> TickOutcome {
        if input.quit {
            log::info!("Quit after {} ticks", self.ticks);
            return TickOutcome::Quit;
        }
        let dt = dt.min(self.settings.max_frame_dt).max(0.0);

        for event in &input.events {
            self.intents.apply(*event);
        }
        if input.restart_requested() {
            self.restart(audio);
        }
        let intents = self.intents;
        if let Some(avatar) = self.world.avatar_mut() {
            avatar.intents = intents;
        }

        for pattern in self.scheduler.advance(dt) {
            pattern.run(&mut self.world);
        }

        renderer.begin_frame();
        self.world.draw_and_update(dt, renderer);
        renderer.composite_overlay(OVERLAY_ALPHA);

        if !self.world.avatar_alive() {
            renderer.fill_overlay(colors::DEATH, OVERLAY_ALPHA);
            if self.phase == SessionPhase::Playing {
                self.on_death(audio);
            }
        }

        if let Some(avatar) = self.world.avatar_id() {
            resolve_collisions(&mut self.world, avatar);
        }

        renderer.present_frame();
        self.run_time += dt;
        self.ticks += 1;
        TickOutcome::Continue
    }
}
