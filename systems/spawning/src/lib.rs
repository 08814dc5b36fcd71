#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system that emits entity spawn commands on a cadence.

use std::time::Duration;

use gridkeep_core::{Command, Event, PathId};

const RNG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const RNG_INCREMENT: u64 = 1;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    spawn_interval: Duration,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided spawn cadence and seed.
    #[must_use]
    pub const fn new(spawn_interval: Duration, rng_seed: u64) -> Self {
        Self {
            spawn_interval,
            rng_seed,
        }
    }
}

/// Pure system that deterministically emits spawn commands against paths.
#[derive(Debug)]
pub struct Spawning {
    spawn_interval: Duration,
    accumulator: Duration,
    rng_state: u64,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            spawn_interval: config.spawn_interval,
            accumulator: Duration::ZERO,
            rng_state: config.rng_seed,
        }
    }

    /// Consumes events and the registered path set to emit spawn commands.
    ///
    /// Elapsed time accumulates across frames; each full interval releases
    /// one spawn against a pseudo-randomly selected registered path. Without
    /// registered paths the accumulator still drains, so spawns never burst
    /// retroactively once a path appears.
    pub fn handle(&mut self, events: &[Event], paths: &[PathId], out: &mut Vec<Command>) {
        if self.spawn_interval.is_zero() {
            return;
        }

        let mut accumulated = Duration::ZERO;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                accumulated = accumulated.saturating_add(*dt);
            }
        }

        if accumulated.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        let spawn_attempts = self.resolve_spawn_attempts();

        if paths.is_empty() {
            return;
        }

        for _ in 0..spawn_attempts {
            let path = self.select_path(paths);
            out.push(Command::SpawnEntity { path });
        }
    }

    fn resolve_spawn_attempts(&mut self) -> usize {
        if self.spawn_interval.is_zero() {
            return 0;
        }

        let mut attempts = 0;
        while self.accumulator >= self.spawn_interval {
            self.accumulator -= self.spawn_interval;
            attempts += 1;
        }
        attempts
    }

    fn select_path(&mut self, paths: &[PathId]) -> PathId {
        debug_assert!(!paths.is_empty(), "select_path requires registered paths");
        let value = self.advance_rng();
        let index = (value % paths.len() as u64) as usize;
        paths[index]
    }

    fn advance_rng(&mut self) -> u64 {
        self.rng_state = self
            .rng_state
            .wrapping_mul(RNG_MULTIPLIER)
            .wrapping_add(RNG_INCREMENT);
        self.rng_state
    }
}
