//! Matchmaking queue and the pending handoff mailbox.
//!
//! Both live behind one async mutex: enqueue may deliver a handoff instead of
//! queueing, and pairing writes handoffs while removing players from the
//! queue, so the two must change together.

use std::collections::{HashMap, HashSet};

use rand::Rng;
use tokio::sync::{Mutex, MutexGuard};

use crate::domain::{Guid, PlayerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    Queued,
    AlreadyQueued,
    /// A game was created for the player before they asked again.
    Paired(Guid),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DequeueOutcome {
    Dequeued,
    NotQueued,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandoffPoll {
    Ready(Guid),
    Waiting,
    NotQueued,
}

/// Waiting players plus the single-delivery handoff map.
#[derive(Debug, Default)]
pub struct QueueState {
    waiting: HashSet<PlayerId>,
    handoffs: HashMap<PlayerId, Guid>,
}

impl QueueState {
    pub fn enqueue(&mut self, player: PlayerId) -> EnqueueOutcome {
        if self.waiting.contains(&player) {
            return EnqueueOutcome::AlreadyQueued;
        }
        if let Some(guid) = self.handoffs.remove(&player) {
            return EnqueueOutcome::Paired(guid);
        }
        self.waiting.insert(player);
        EnqueueOutcome::Queued
    }

    pub fn dequeue(&mut self, player: PlayerId) -> DequeueOutcome {
        if self.waiting.remove(&player) {
            DequeueOutcome::Dequeued
        } else {
            DequeueOutcome::NotQueued
        }
    }

    pub fn poll_handoff(&mut self, player: PlayerId) -> HandoffPoll {
        if let Some(guid) = self.handoffs.remove(&player) {
            HandoffPoll::Ready(guid)
        } else if self.waiting.contains(&player) {
            HandoffPoll::Waiting
        } else {
            HandoffPoll::NotQueued
        }
    }

    /// Drop a player from the queue. Returns whether they were waiting.
    pub fn remove(&mut self, player: PlayerId) -> bool {
        self.waiting.remove(&player)
    }

    /// Put one player back after a failed game creation.
    pub fn restore(&mut self, player: PlayerId) {
        self.waiting.insert(player);
    }

    /// Take two distinct players, each chosen uniformly at random.
    pub fn draw_pair<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<(PlayerId, PlayerId)> {
        let n = self.waiting.len();
        if n < 2 {
            return None;
        }
        // HashSet order is arbitrary but not random; sort so the draw only
        // depends on the rng.
        let mut ids: Vec<PlayerId> = self.waiting.iter().copied().collect();
        ids.sort_unstable();

        let i = rng.random_range(0..n);
        let mut j = rng.random_range(0..n - 1);
        if j >= i {
            j += 1;
        }
        let (a, b) = (ids[i], ids[j]);
        self.waiting.remove(&a);
        self.waiting.remove(&b);
        Some((a, b))
    }

    /// Put a drawn pair back after a failed game creation.
    pub fn restore_pair(&mut self, a: PlayerId, b: PlayerId) {
        self.restore(a);
        self.restore(b);
    }

    pub fn record_handoff(&mut self, player: PlayerId, guid: Guid) {
        self.handoffs.insert(player, guid);
    }

    pub fn len(&self) -> usize {
        self.waiting.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty()
    }

    pub fn contains(&self, player: PlayerId) -> bool {
        self.waiting.contains(&player)
    }

    pub fn pending_handoffs(&self) -> usize {
        self.handoffs.len()
    }
}

#[derive(Debug, Default)]
pub struct MatchmakingQueue {
    state: Mutex<QueueState>,
}

impl MatchmakingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclusive access for multi-step operations such as a pairing sweep.
    pub async fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().await
    }

    pub async fn enqueue(&self, player: PlayerId) -> EnqueueOutcome {
        self.state.lock().await.enqueue(player)
    }

    pub async fn dequeue(&self, player: PlayerId) -> DequeueOutcome {
        self.state.lock().await.dequeue(player)
    }

    pub async fn poll_handoff(&self, player: PlayerId) -> HandoffPoll {
        self.state.lock().await.poll_handoff(player)
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.len()
    }
}
