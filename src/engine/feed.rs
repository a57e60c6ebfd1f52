use std::collections::VecDeque;
use std::sync::Mutex;

use serde::Serialize;
use tokio::sync::broadcast;

use crate::models::SeatStatus;

/// One seat-status transition, stamped with the event's feed version.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatChange {
    pub version: u64,
    pub seat_id: i64,
    pub status: SeatStatus,
}

#[derive(Debug)]
struct FeedLog {
    next_version: u64,
    log: VecDeque<SeatChange>,
}

/// Per-event change feed for viewers of a seating chart.
///
/// Keeps a bounded log of recent transitions so polling clients can ask
/// for "everything since version V", and a broadcast channel for
/// in-process push subscribers. Publication happens while the event's
/// write lock is held, so versions are monotonic per seat.
#[derive(Debug)]
pub struct ChangeFeed {
    log_capacity: usize,
    inner: Mutex<FeedLog>,
    tx: broadcast::Sender<SeatChange>,
}

impl ChangeFeed {
    pub fn new(log_capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(log_capacity.max(16));
        Self {
            log_capacity,
            inner: Mutex::new(FeedLog {
                next_version: 1,
                log: VecDeque::new(),
            }),
            tx,
        }
    }

    /// Current feed version; 0 means no change has been published yet.
    pub fn version(&self) -> u64 {
        self.inner.lock().unwrap().next_version - 1
    }

    /// Records a transition and notifies push subscribers. Returns the
    /// version assigned to the change.
    pub fn publish(&self, seat_id: i64, status: SeatStatus) -> u64 {
        let change = {
            let mut inner = self.inner.lock().unwrap();
            let change = SeatChange {
                version: inner.next_version,
                seat_id,
                status,
            };
            inner.next_version += 1;
            inner.log.push_back(change.clone());
            while inner.log.len() > self.log_capacity {
                inner.log.pop_front();
            }
            change
        };
        // Nobody listening is fine.
        let _ = self.tx.send(change.clone());
        change.version
    }

    /// Changes after `since`, or `None` when `since` is outside the
    /// retained window and the caller must fall back to a full snapshot.
    pub fn delta_since(&self, since: u64) -> Option<Vec<SeatChange>> {
        let inner = self.inner.lock().unwrap();
        let version = inner.next_version - 1;
        if since == version {
            return Some(Vec::new());
        }
        if since > version {
            // Client is ahead of us (stale event, restart); resync fully.
            return None;
        }
        match inner.log.front() {
            Some(first) if first.version <= since + 1 => Some(
                inner
                    .log
                    .iter()
                    .filter(|c| c.version > since)
                    .cloned()
                    .collect(),
            ),
            _ => None,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SeatChange> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions_are_monotonic() {
        let feed = ChangeFeed::new(16);
        assert_eq!(feed.version(), 0);
        let v1 = feed.publish(1, SeatStatus::Held);
        let v2 = feed.publish(1, SeatStatus::Available);
        assert!(v2 > v1);
        assert_eq!(feed.version(), v2);
    }

    #[test]
    fn delta_since_returns_newer_changes() {
        let feed = ChangeFeed::new(16);
        feed.publish(1, SeatStatus::Held);
        let v = feed.publish(2, SeatStatus::Held);
        feed.publish(1, SeatStatus::Available);

        let delta = feed.delta_since(v).unwrap();
        assert_eq!(delta.len(), 1);
        assert_eq!(delta[0].seat_id, 1);
        assert_eq!(delta[0].status, SeatStatus::Available);

        assert!(feed.delta_since(feed.version()).unwrap().is_empty());
    }

    #[test]
    fn delta_outside_window_forces_full_snapshot() {
        let feed = ChangeFeed::new(2);
        for i in 0..5 {
            feed.publish(i, SeatStatus::Held);
        }
        // versions 1..=3 fell out of the 2-entry log
        assert!(feed.delta_since(1).is_none());
        assert!(feed.delta_since(3).unwrap().len() == 2);
    }

    #[test]
    fn client_ahead_of_feed_resyncs() {
        let feed = ChangeFeed::new(4);
        feed.publish(1, SeatStatus::Held);
        assert!(feed.delta_since(99).is_none());
    }

    #[tokio::test]
    async fn subscribers_receive_published_changes() {
        let feed = ChangeFeed::new(16);
        let mut rx = feed.subscribe();
        feed.publish(7, SeatStatus::Held);
        let change = rx.recv().await.unwrap();
        assert_eq!(change.seat_id, 7);
        assert_eq!(change.status, SeatStatus::Held);
    }
}
