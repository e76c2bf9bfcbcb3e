use log::debug;
use rand::Rng;

use crate::difficulty::{active_duration_range_for_level, max_active_for_level, random_token};
use crate::session::{SessionState, GRID_SIZE};

/// Logical time that passes per spawner tick (ms)
pub const SPAWN_TICK_MS: u64 = 80;

/// Mole spawner with its own per-cell countdowns.
///
/// Each run of the spawner process builds a fresh one, so timers always start at
/// zero; cells still up from before a pause drop on the first tick after resuming.
#[derive(Debug, Default)]
pub struct Spawner {
    remaining_ms: [u64; GRID_SIZE],
}

impl Spawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances one tick against the latest snapshot. `None` tells the process to stop.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        state: &SessionState,
        rng: &mut R,
    ) -> Option<SessionState> {
        if !state.running || state.game_over {
            return None;
        }

        let mut next = state.clone();

        for (up, remaining) in next.cells.iter_mut().zip(self.remaining_ms.iter_mut()) {
            if *up {
                *remaining = remaining.saturating_sub(SPAWN_TICK_MS);
                if *remaining == 0 {
                    *up = false;
                }
            }
        }

        let level = next.level();
        let max_active = max_active_for_level(level);
        let (min_ms, max_ms) = active_duration_range_for_level(level);

        if next.active_count() < max_active {
            let idx = rng.gen_range(0..GRID_SIZE);
            if !next.cells[idx] {
                let duration = rng.gen_range(min_ms..=max_ms);
                next.cells[idx] = true;
                next.tokens[idx] = random_token(rng);
                self.remaining_ms[idx] = duration;
                debug!("spawned cell {} for {}ms at level {}", idx, duration, level);
            }
        }

        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn running_state(rng: &mut StdRng) -> SessionState {
        SessionState::fresh(rng)
    }

    #[test]
    fn test_step_stops_when_paused_or_over() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut spawner = Spawner::new();

        let paused = running_state(&mut rng).toggle_running().unwrap();
        assert!(spawner.step(&paused, &mut rng).is_none());

        let over = SessionState {
            running: false,
            game_over: true,
            time_left: 0,
            ..running_state(&mut rng)
        };
        assert!(spawner.step(&over, &mut rng).is_none());
    }

    #[test]
    fn test_first_tick_spawns_on_empty_grid() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut spawner = Spawner::new();
        let state = spawner.step(&running_state(&mut rng), &mut rng).unwrap();
        assert_eq!(state.active_count(), 1);
    }

    #[test]
    fn test_never_exceeds_max_active() {
        let mut rng = StdRng::seed_from_u64(42);
        for score in [0, 5, 15, 30, 50, 75] {
            let mut spawner = Spawner::new();
            let mut state = SessionState {
                score,
                ..running_state(&mut rng)
            };
            let max = max_active_for_level(state.level());
            for _ in 0..500 {
                state = spawner.step(&state, &mut rng).unwrap();
                assert!(
                    state.active_count() <= max,
                    "score {} had {} active",
                    score,
                    state.active_count()
                );
            }
        }
    }

    #[test]
    fn test_mole_expires_after_its_duration() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut spawner = Spawner::new();
        let mut state = spawner.step(&running_state(&mut rng), &mut rng).unwrap();
        let idx = state.active_indices()[0];
        let duration = spawner.remaining_ms[idx];
        assert!((600..=1200).contains(&duration));

        for _ in 0..duration.div_ceil(SPAWN_TICK_MS) - 1 {
            state = spawner.step(&state, &mut rng).unwrap();
            assert_eq!(state.active_indices(), vec![idx]);
        }

        // the same tick may respawn, possibly into the cell that just expired
        state = spawner.step(&state, &mut rng).unwrap();
        assert!(state.active_count() <= 1);
        assert!(!state.cells[idx] || spawner.remaining_ms[idx] >= 600);
    }

    #[test]
    fn test_fresh_spawner_drops_leftover_moles() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut state = running_state(&mut rng);
        state.cells[3] = true;

        let mut spawner = Spawner::new();
        let next = spawner.step(&state, &mut rng).unwrap();
        assert_eq!(next.active_count(), 1);
        assert!(!next.cells[3] || spawner.remaining_ms[3] >= 600);
    }

    #[test]
    fn test_spawn_refreshes_token_only_on_activated_cell() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut spawner = Spawner::new();
        let before = running_state(&mut rng);
        let after = spawner.step(&before, &mut rng).unwrap();

        for i in 0..GRID_SIZE {
            if !after.cells[i] {
                assert_eq!(after.tokens[i], before.tokens[i]);
            }
        }
        assert_eq!(after.score, before.score);
        assert_eq!(after.time_left, before.time_left);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut spawner = Spawner::new();
            let mut state = running_state(&mut rng);
            let mut history = Vec::new();
            for _ in 0..50 {
                state = spawner.step(&state, &mut rng).unwrap();
                history.push(state.cells);
            }
            history
        };
        assert_eq!(run(77), run(77));
    }
}
