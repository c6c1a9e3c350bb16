//! Per-room mutual exclusion around read-validate-write sequences.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex as StdMutex, PoisonError},
};

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::GameId;

type LockMap = HashMap<GameId, Arc<Mutex<()>>>;

/// One async lock per room code.
///
/// An entry exists only while some task holds or waits for that room's lock,
/// so codes for rooms that never existed do not accumulate.
#[derive(Default)]
pub struct RoomLocks {
    locks: Arc<StdMutex<LockMap>>,
}

impl RoomLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `game_id`. Released when the guard drops.
    pub async fn acquire(&self, game_id: &GameId) -> RoomGuard {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            // Entries left behind by cancelled waiters
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(game_id.clone()).or_default().clone()
        };
        let guard = lock.clone().lock_owned().await;
        RoomGuard {
            game_id: game_id.clone(),
            lock,
            guard: Some(guard),
            locks: self.locks.clone(),
        }
    }

    /// Number of rooms with a lock currently held or awaited
    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Exclusive access to one room
pub struct RoomGuard {
    game_id: GameId,
    lock: Arc<Mutex<()>>,
    guard: Option<OwnedMutexGuard<()>>,
    locks: Arc<StdMutex<LockMap>>,
}

impl Drop for RoomGuard {
    fn drop(&mut self) {
        self.guard.take();
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // The map and this guard are the last two owners: nobody is waiting
        if Arc::strong_count(&self.lock) == 2
            && locks
                .get(&self.game_id)
                .is_some_and(|lock| Arc::ptr_eq(lock, &self.lock))
        {
            locks.remove(&self.game_id);
        }
    }
}
