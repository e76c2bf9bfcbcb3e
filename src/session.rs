use itertools::Itertools;
use rand::Rng;

use crate::difficulty::{level_for, random_token, Token};

pub const SESSION_DURATION_SECS: u32 = 30;
pub const GRID_SIZE: usize = 9;
pub const GRID_COLUMNS: usize = 3;

/// Lifecycle position of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    Paused,
    GameOver,
}

/// One immutable snapshot of a session. Transitions hand back a new value and
/// leave `self` untouched; `None` means nothing changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub score: u32,
    pub running: bool,
    pub time_left: u32,
    pub game_over: bool,
    /// Row-major 3x3 grid, true while a mole is up
    pub cells: [bool; GRID_SIZE],
    pub tokens: [Token; GRID_SIZE],
}

impl SessionState {
    pub fn fresh<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            score: 0,
            running: true,
            time_left: SESSION_DURATION_SECS,
            game_over: false,
            cells: [false; GRID_SIZE],
            tokens: std::array::from_fn(|_| random_token(rng)),
        }
    }

    pub fn level(&self) -> u32 {
        level_for(self.score)
    }

    pub fn timer_fraction(&self) -> f64 {
        (self.time_left as f64 / SESSION_DURATION_SECS as f64).clamp(0.0, 1.0)
    }

    pub fn active_count(&self) -> usize {
        self.cells.iter().filter(|&&up| up).count()
    }

    pub fn active_indices(&self) -> Vec<usize> {
        self.cells.iter().positions(|&up| up).collect()
    }

    pub fn phase(&self) -> Phase {
        match (self.game_over, self.running) {
            (true, _) => Phase::GameOver,
            (false, true) => Phase::Running,
            (false, false) => Phase::Paused,
        }
    }

    /// Scores a hit on an active cell. Pausing does not block hits, game over does.
    pub fn hit(&self, index: usize) -> Option<Self> {
        if self.game_over || !self.cells.get(index).copied().unwrap_or(false) {
            return None;
        }
        let mut next = self.clone();
        next.score += 1;
        next.cells[index] = false;
        Some(next)
    }

    pub fn toggle_running(&self) -> Option<Self> {
        if self.game_over {
            return None;
        }
        Some(Self {
            running: !self.running,
            ..self.clone()
        })
    }

    /// One countdown second. `None` once the countdown has nothing left to do.
    pub fn countdown_step(&self) -> Option<Self> {
        if !self.running || self.game_over {
            return None;
        }
        let time_left = self.time_left.saturating_sub(1);
        if time_left == 0 {
            return Some(Self {
                time_left: 0,
                game_over: true,
                running: false,
                cells: [false; GRID_SIZE],
                ..self.clone()
            });
        }
        Some(Self {
            time_left,
            ..self.clone()
        })
    }
}
