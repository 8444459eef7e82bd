//! Fixed-rate stepping of the world from variable frame times.

use std::{mem, time::Duration};

use xorx_core::{Buttons, Command, Event, InputSnapshot, SoundSet};
use xorx_world::{self as world, World};

/// Steps run per frame at most; the rest of a long stall is dropped.
const MAX_CATCH_UP_STEPS: u32 = 5;

/// Accumulates frame time and runs whole simulation steps.
#[derive(Debug)]
pub(crate) struct Driver {
    step: Duration,
    accumulator: Duration,
    previous: Buttons,
    events: Vec<Event>,
    sounds: SoundSet,
}

impl Driver {
    pub(crate) fn new(tick_rate: u32) -> Self {
        Self {
            step: Duration::from_secs(1) / tick_rate.max(1),
            accumulator: Duration::ZERO,
            previous: Buttons::empty(),
            events: Vec::new(),
            sounds: SoundSet::new(),
        }
    }

    /// Adds `elapsed` to the accumulator and runs the steps that became due.
    /// Returns the number of steps run.
    pub(crate) fn advance(
        &mut self,
        world: &mut World,
        elapsed: Duration,
        buttons: Buttons,
    ) -> u32 {
        self.accumulator += elapsed;
        let mut steps = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            if steps == MAX_CATCH_UP_STEPS {
                self.accumulator = Duration::ZERO;
                break;
            }
            self.step_once(world, buttons);
            steps += 1;
        }
        steps
    }

    /// Runs one step with `buttons` held.
    pub(crate) fn step_once(&mut self, world: &mut World, buttons: Buttons) {
        let input = InputSnapshot::new(buttons, self.previous);
        self.previous = buttons;
        world::apply(world, Command::Step { input }, &mut self.events);
        for event in self.events.drain(..) {
            log::debug!("{event:?}");
        }
        for effect in world::take_sounds(world).iter() {
            self.sounds.insert(effect);
        }
    }

    /// Effects requested by the steps run since the previous call.
    pub(crate) fn take_sounds(&mut self) -> SoundSet {
        mem::take(&mut self.sounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xorx_core::SoundEffect;
    use xorx_world::query;

    #[test]
    fn whole_steps_are_run_from_accumulated_time() {
        let mut world = World::new();
        let mut driver = Driver::new(30);
        let idle = Buttons::empty();

        assert_eq!(driver.advance(&mut world, Duration::from_millis(20), idle), 0);
        assert_eq!(driver.advance(&mut world, Duration::from_millis(20), idle), 1);
        assert_eq!(driver.advance(&mut world, Duration::from_millis(70), idle), 2);
        assert_eq!(query::local_tick(&world).value(), 3);
    }

    #[test]
    fn long_stalls_are_capped() {
        let mut world = World::new();
        let mut driver = Driver::new(30);
        assert_eq!(
            driver.advance(&mut world, Duration::from_secs(10), Buttons::empty()),
            MAX_CATCH_UP_STEPS
        );
        assert_eq!(driver.accumulator, Duration::ZERO);
    }

    #[test]
    fn held_buttons_only_press_once() {
        let mut world = World::new();
        let mut driver = Driver::new(30);
        driver.step_once(&mut world, Buttons::X);
        assert!(query::is_paused(&world));
        driver.step_once(&mut world, Buttons::X);
        assert!(query::is_paused(&world));
        driver.step_once(&mut world, Buttons::empty());
        driver.step_once(&mut world, Buttons::X);
        assert!(!query::is_paused(&world));
    }

    #[test]
    fn sounds_collect_across_steps_until_taken() {
        let mut world = World::new();
        let mut driver = Driver::new(30);
        driver.step_once(&mut world, Buttons::X);
        driver.step_once(&mut world, Buttons::empty());

        let sounds = driver.take_sounds();
        assert!(sounds.contains(SoundEffect::Pause));
        assert!(driver.take_sounds().is_empty());
    }
}
