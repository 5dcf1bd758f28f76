//! 샘플러 → 소비자 스냅샷 핸드오프.
//!
//! 단일 슬롯 `tokio::sync::watch` 채널 위에 구축한다.
//! 샘플러는 스냅샷을 완전히 조립한 뒤 `Arc`로 한 번에 교체하므로
//! 소비자는 부분적으로 조립된 값을 관찰할 수 없다.

use std::sync::Arc;
use tokio::sync::watch;

use crate::models::system::Snapshot;

/// 게시 측 (샘플러 전용, 유일한 writer)
#[derive(Debug)]
pub struct SnapshotPublisher {
    tx: watch::Sender<Arc<Snapshot>>,
}

/// 읽기 측 (복제 가능, 읽기 전용)
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    rx: watch::Receiver<Arc<Snapshot>>,
}

/// 초기 스냅샷이 담긴 핸드오프 채널 생성
pub fn channel() -> (SnapshotPublisher, SnapshotReader) {
    let (tx, rx) = watch::channel(Arc::new(Snapshot::initial()));
    (SnapshotPublisher { tx }, SnapshotReader { rx })
}

impl SnapshotPublisher {
    /// 스냅샷 게시 (이전 값 전체 교체)
    ///
    /// 수신자가 하나도 없어도 값은 보존된다.
    pub fn publish(&self, snapshot: Snapshot) {
        self.tx.send_replace(Arc::new(snapshot));
    }

    /// 현재 게시된 스냅샷
    pub fn current(&self) -> Arc<Snapshot> {
        self.tx.borrow().clone()
    }

    /// 새 읽기 측 생성
    pub fn subscribe(&self) -> SnapshotReader {
        SnapshotReader {
            rx: self.tx.subscribe(),
        }
    }
}

impl SnapshotReader {
    /// 가장 최근 게시된 스냅샷 (블로킹 없음)
    pub fn latest(&self) -> Arc<Snapshot> {
        self.rx.borrow().clone()
    }

    /// 다음 게시까지 대기 후 해당 스냅샷 반환
    ///
    /// 게시 측이 사라지면 `None`.
    pub async fn next(&mut self) -> Option<Arc<Snapshot>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::system::ConnectivityStatus;

    fn snapshot_with(sequence: u64) -> Snapshot {
        let mut snap = Snapshot::initial();
        snap.sequence = sequence;
        snap.connectivity = ConnectivityStatus::Connected;
        snap
    }

    #[test]
    fn reader_sees_initial_before_publish() {
        let (_publisher, reader) = channel();
        let snap = reader.latest();
        assert!(snap.is_initial());
    }

    #[test]
    fn publish_replaces_whole_value() {
        let (publisher, reader) = channel();
        publisher.publish(snapshot_with(1));
        publisher.publish(snapshot_with(2));

        let snap = reader.latest();
        assert_eq!(snap.sequence, 2);
        assert_eq!(snap.connectivity, ConnectivityStatus::Connected);
        assert_eq!(publisher.current().sequence, 2);
    }

    #[test]
    fn old_reference_stays_valid() {
        let (publisher, reader) = channel();
        publisher.publish(snapshot_with(1));
        let held = reader.latest();
        publisher.publish(snapshot_with(2));

        assert_eq!(held.sequence, 1);
        assert_eq!(reader.latest().sequence, 2);
    }

    #[tokio::test]
    async fn next_waits_for_publish() {
        let (publisher, reader) = channel();
        let mut sub = publisher.subscribe();
        drop(reader);

        let handle = tokio::spawn(async move { sub.next().await });
        publisher.publish(snapshot_with(7));

        let received = handle.await.unwrap().unwrap();
        assert_eq!(received.sequence, 7);
    }

    #[tokio::test]
    async fn next_ends_when_publisher_dropped() {
        let (publisher, mut reader) = channel();
        drop(publisher);
        assert!(reader.next().await.is_none());
    }
}
