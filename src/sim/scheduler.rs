//! Timed pattern triggers
//!
//! Each trigger keeps its own clock from the moment it was registered and
//! fires whenever that clock passes a multiple of its delay. The first
//! firing uses `initial_delay`, every later one the steady `delay`.
//! Triggers only report what fired; running the pattern is the caller's job.

use super::patterns::Pattern;

/// Slack when comparing a period boundary against a lifespan
const BOUNDARY_EPSILON: f32 = 1e-4;

/// A recurring or one-shot pattern invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Trigger {
    pub pattern: Pattern,
    /// Steady-state period (seconds); 0 fires every tick
    pub delay: f32,
    /// Period used for the first firing only
    pub initial_delay: f32,
    /// Absolute lifetime (seconds); 0 never expires
    pub lifespan: f32,
    pub elapsed: f32,
    pub fired_first: bool,
}

/// What a trigger did this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TriggerStep {
    pub fired: bool,
    pub retired: bool,
}

impl Trigger {
    /// Fire every `delay` seconds, forever
    pub fn every(delay: f32, pattern: Pattern) -> Self {
        Self {
            pattern,
            delay,
            initial_delay: delay,
            lifespan: 0.0,
            elapsed: 0.0,
            fired_first: false,
        }
    }

    pub fn starting_at(mut self, initial_delay: f32) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    pub fn until(mut self, lifespan: f32) -> Self {
        self.lifespan = lifespan;
        self
    }

    /// Rebase onto a script that starts `offset` seconds in.
    ///
    /// A first firing already in the past falls back to the steady delay;
    /// a trigger whose lifespan is already over is dropped.
    pub fn shifted(mut self, offset: f32) -> Option<Self> {
        if offset <= 0.0 {
            return Some(self);
        }
        self.initial_delay -= offset;
        if self.initial_delay < 0.0 {
            self.initial_delay = self.delay;
        }
        if self.lifespan != 0.0 {
            self.lifespan -= offset;
            if self.lifespan <= 0.0 {
                return None;
            }
        }
        Some(self)
    }

    #[inline]
    fn applicable_delay(&self) -> f32 {
        if self.fired_first {
            self.delay
        } else {
            self.initial_delay
        }
    }

    #[inline]
    fn has_lifespan(&self) -> bool {
        self.lifespan != 0.0
    }

    /// Advance the trigger's clock by `dt`
    pub fn advance(&mut self, dt: f32) -> TriggerStep {
        let previous = self.elapsed;
        self.elapsed += dt;

        if self.has_lifespan() && previous >= self.lifespan {
            return TriggerStep {
                fired: false,
                retired: true,
            };
        }

        let delay = self.applicable_delay();
        // Instant of the firing: the period boundary, or the tick start
        let (crossed, boundary) = if delay == 0.0 {
            (true, previous)
        } else {
            let phase = self.elapsed % delay;
            (phase < previous % delay, self.elapsed - phase)
        };

        let fired = crossed && (!self.has_lifespan() || boundary <= self.lifespan + BOUNDARY_EPSILON);
        if fired {
            self.fired_first = true;
        }

        TriggerStep {
            fired,
            retired: self.has_lifespan() && self.elapsed >= self.lifespan,
        }
    }
}

/// The active trigger set
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    triggers: Vec<Trigger>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, trigger: Trigger) {
        self.triggers.push(trigger);
    }

    pub fn clear(&mut self) {
        self.triggers.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    pub fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }

    /// Advance every trigger; returns the patterns due this tick in
    /// registration order. Expired triggers leave the set.
    pub fn advance(&mut self, dt: f32) -> Vec<Pattern> {
        let mut due = Vec::new();
        self.triggers.retain_mut(|trigger| {
            let step = trigger.advance(dt);
            if step.fired {
                log::debug!("trigger {:?} fired at {:.3}s", trigger.pattern, trigger.elapsed);
                due.push(trigger.pattern);
            }
            if step.retired {
                log::debug!("trigger {:?} retired", trigger.pattern);
            }
            !step.retired
        });
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 64.0;

    fn run(trigger: Trigger, ticks: usize, dt: f32) -> (usize, Scheduler) {
        let mut scheduler = Scheduler::new();
        scheduler.register(trigger);
        let fired = (0..ticks).map(|_| scheduler.advance(dt).len()).sum();
        (fired, scheduler)
    }

    #[test]
    fn test_steady_trigger_fire_count() {
        let (fired, scheduler) = run(Trigger::every(0.125, Pattern::CyclePalette), 64, DT);
        assert_eq!(fired, 8);
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn test_lifespan_stops_firing_and_retires() {
        let (fired, scheduler) = run(
            Trigger::every(0.125, Pattern::CyclePalette).until(0.5),
            64,
            DT,
        );
        assert_eq!(fired, 4);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_one_shot_fires_once() {
        let (fired, scheduler) = run(
            Trigger::every(8.6, Pattern::Pentagram).until(8.6),
            60 * 10,
            1.0 / 60.0,
        );
        assert_eq!(fired, 1);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_zero_delay_one_shot() {
        let mut scheduler = Scheduler::new();
        scheduler.register(Trigger::every(0.0, Pattern::BulletRing).until(0.001));
        // A whole tick longer than the lifespan still fires once
        assert_eq!(scheduler.advance(1.0 / 60.0), vec![Pattern::BulletRing]);
        assert!(scheduler.is_empty());
        assert!(scheduler.advance(1.0 / 60.0).is_empty());
    }

    #[test]
    fn test_zero_delay_fires_while_started_before_lifespan() {
        let mut scheduler = Scheduler::new();
        scheduler.register(Trigger::every(0.0, Pattern::BulletRing).until(0.001));
        assert_eq!(scheduler.advance(0.0).len(), 1);
        // This tick started at 0, inside the lifespan
        assert_eq!(scheduler.advance(1.0 / 60.0).len(), 1);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_zero_delay_fires_every_tick() {
        let (fired, _) = run(Trigger::every(0.0, Pattern::CyclePalette), 10, DT);
        assert_eq!(fired, 10);
    }

    #[test]
    fn test_initial_delay_then_steady() {
        let (fired, _) = run(
            Trigger::every(0.125, Pattern::HomingRain).starting_at(0.5),
            64,
            DT,
        );
        // 0.5, 0.625, 0.75, 0.875, 1.0
        assert_eq!(fired, 5);
    }

    #[test]
    fn test_uneven_dt_still_detects_boundaries() {
        // 0.1s period with 0.03s ticks: boundaries at 0.1 .. 0.9
        let (fired, _) = run(Trigger::every(0.1, Pattern::CyclePalette), 31, 0.03);
        assert_eq!(fired, 9);
    }

    #[test]
    fn test_shifted_rebases_timings() {
        let t = Trigger::every(0.2, Pattern::HomingRain)
            .starting_at(4.0)
            .until(8.0)
            .shifted(1.0)
            .unwrap();
        assert_eq!(t.initial_delay, 3.0);
        assert_eq!(t.lifespan, 7.0);

        let past = Trigger::every(0.2, Pattern::HomingRain)
            .starting_at(0.5)
            .shifted(1.0)
            .unwrap();
        assert_eq!(past.initial_delay, 0.2);
        assert_eq!(past.lifespan, 0.0);

        assert!(
            Trigger::every(0.1125, Pattern::SineStream)
                .until(0.5)
                .shifted(1.0)
                .is_none()
        );
    }

    #[test]
    fn test_fires_in_registration_order() {
        let mut scheduler = Scheduler::new();
        scheduler.register(Trigger::every(0.0, Pattern::SlowHell));
        scheduler.register(Trigger::every(0.0, Pattern::CyclePalette));
        assert_eq!(
            scheduler.advance(DT),
            vec![Pattern::SlowHell, Pattern::CyclePalette]
        );
    }

    proptest! {
        #[test]
        fn prop_fire_count_matches_elapsed(delay_ticks in 1u32..32, ticks in 0usize..2000) {
            let delay = delay_ticks as f32 * DT;
            let (fired, _) = run(Trigger::every(delay, Pattern::CyclePalette), ticks, DT);
            prop_assert_eq!(fired, ticks / delay_ticks as usize);
        }

        #[test]
        fn prop_never_fires_after_lifespan(
            delay_ticks in 1u32..32,
            life_ticks in 1u32..200,
            ticks in 0usize..600,
        ) {
            let delay = delay_ticks as f32 * DT;
            let lifespan = life_ticks as f32 * DT;
            let mut trigger = Trigger::every(delay, Pattern::CyclePalette).until(lifespan);
            let mut fired = 0;
            for _ in 0..ticks {
                let before = trigger.elapsed;
                let step = trigger.advance(DT);
                if step.fired {
                    prop_assert!(before < lifespan);
                    fired += 1;
                }
                if step.retired {
                    break;
                }
            }
            if ticks as u32 >= life_ticks && life_ticks >= delay_ticks {
                prop_assert!(fired >= 1);
            }
        }
    }
}
