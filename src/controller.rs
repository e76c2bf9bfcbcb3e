use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use log::{error, info, warn};
use rand::{rngs::StdRng, RngCore, SeedableRng};

use crate::session::{SessionState, GRID_SIZE};
use crate::spawner::{Spawner, SPAWN_TICK_MS};

pub const COUNTDOWN_TICK_MS: u64 = 1000;

/// Wall-clock pause between ticks of each periodic process.
///
/// Only the real-time pacing changes; a countdown tick is always one logical
/// second and a spawner tick always 80 logical milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    pub countdown: Duration,
    pub spawner: Duration,
}

impl Default for Cadence {
    fn default() -> Self {
        Self {
            countdown: Duration::from_millis(COUNTDOWN_TICK_MS),
            spawner: Duration::from_millis(SPAWN_TICK_MS),
        }
    }
}

struct Shared {
    state: SessionState,
    /// Bumped whenever running processes must stand down
    epoch: u64,
    rng: Box<dyn RngCore + Send>,
    subscribers: Vec<Sender<SessionState>>,
}

impl Shared {
    fn publish(&mut self, next: SessionState) {
        if next == self.state {
            return;
        }
        self.state = next;
        let state = &self.state;
        self.subscribers.retain(|tx| tx.send(state.clone()).is_ok());
    }
}

// A snapshot is only ever swapped whole, so a poisoned lock still guards a valid one
fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns the live session and the countdown/spawner processes that advance it.
///
/// Every change is a read-compute-publish step under one lock, so user actions
/// and ticks never interleave and subscribers see snapshots in order.
pub struct SessionController {
    shared: Arc<Mutex<Shared>>,
    cadence: Cadence,
}

#[allow(clippy::new_without_default)]
impl SessionController {
    /// Starts a fresh session with an entropy-seeded spawner and real-time cadence
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy(), Cadence::default())
    }

    /// Starts a fresh session driven by the given random source
    pub fn with_rng<R: RngCore + Send + 'static>(mut rng: R, cadence: Cadence) -> Self {
        let state = SessionState::fresh(&mut rng);
        let controller = Self::from_snapshot(state, rng, cadence);
        let epoch = controller.lock().epoch;
        controller.start_processes(epoch);
        controller
    }

    /// Installs `state` as-is without starting either process
    pub fn from_snapshot<R: RngCore + Send + 'static>(
        state: SessionState,
        rng: R,
        cadence: Cadence,
    ) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                state,
                epoch: 0,
                rng: Box::new(rng),
                subscribers: Vec::new(),
            })),
            cadence,
        }
    }

    pub fn snapshot(&self) -> SessionState {
        self.lock().state.clone()
    }

    /// Receives the current snapshot right away, then every change after it
    pub fn subscribe(&self) -> Receiver<SessionState> {
        let (tx, rx) = mpsc::channel();
        let mut shared = self.lock();
        // rx is still in hand, the send can't fail
        let _ = tx.send(shared.state.clone());
        shared.subscribers.push(tx);
        rx
    }

    pub fn hit_cell(&self, index: usize) {
        if index >= GRID_SIZE {
            warn!("ignoring hit on cell {} outside the grid", index);
            return;
        }
        let mut shared = self.lock();
        if let Some(next) = shared.state.hit(index) {
            shared.publish(next);
        }
    }

    pub fn restart(&self) {
        let epoch = {
            let mut guard = self.lock();
            let shared = &mut *guard;
            shared.epoch += 1;
            let fresh = SessionState::fresh(&mut *shared.rng);
            shared.publish(fresh);
            shared.epoch
        };
        info!("session restarted");
        self.start_processes(epoch);
    }

    pub fn pause_resume(&self) {
        let resumed = {
            let mut shared = self.lock();
            let Some(next) = shared.state.toggle_running() else {
                return;
            };
            shared.epoch += 1;
            let running = next.running;
            shared.publish(next);
            running.then_some(shared.epoch)
        };
        match resumed {
            Some(epoch) => {
                info!("session resumed");
                self.start_processes(epoch);
            }
            None => info!("session paused"),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        lock(&self.shared)
    }

    fn start_processes(&self, epoch: u64) {
        let shared = Arc::clone(&self.shared);
        let period = self.cadence.countdown;
        if let Err(e) = thread::Builder::new()
            .name("countdown".into())
            .spawn(move || run_countdown(shared, epoch, period))
        {
            error!("failed to start countdown: {}", e);
        }

        let shared = Arc::clone(&self.shared);
        let period = self.cadence.spawner;
        if let Err(e) = thread::Builder::new()
            .name("spawner".into())
            .spawn(move || run_spawner(shared, epoch, period))
        {
            error!("failed to start spawner: {}", e);
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        let mut shared = self.lock();
        shared.epoch += 1;
        shared.subscribers.clear();
    }
}

fn run_countdown(shared: Arc<Mutex<Shared>>, epoch: u64, period: Duration) {
    loop {
        thread::sleep(period);
        let mut guard = lock(&shared);
        if guard.epoch != epoch {
            return;
        }
        let Some(next) = guard.state.countdown_step() else {
            return;
        };
        let over = next.game_over;
        guard.publish(next);
        if over {
            info!(
                "time's up: final score {} at level {}",
                guard.state.score,
                guard.state.level()
            );
            return;
        }
    }
}

fn run_spawner(shared: Arc<Mutex<Shared>>, epoch: u64, period: Duration) {
    let mut spawner = Spawner::new();
    loop {
        {
            let mut guard = lock(&shared);
            let shared = &mut *guard;
            if shared.epoch != epoch {
                return;
            }
            let Some(next) = spawner.step(&shared.state, &mut *shared.rng) else {
                return;
            };
            shared.publish(next);
        }
        thread::sleep(period);
    }
}
