#[cfg(test)]
mod tests {
    use crate::errors::{Error, Result};
    use crate::refresh::{RefreshCache, RefreshStatus, SlotState, Snapshot, SnapshotSource};
    use async_trait::async_trait;
    use chrono::Utc;
    use futures::future::join_all;
    use mnav_market_data::SpotPrices;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    const TTL: Duration = Duration::from_secs(30);

    // --- Mock snapshot source ---
    struct ScriptedSource {
        calls: AtomicUsize,
        delay: Duration,
        fail: AtomicBool,
        panic: AtomicBool,
    }

    impl ScriptedSource {
        fn new(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                delay,
                fail: AtomicBool::new(false),
                panic: AtomicBool::new(false),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SnapshotSource for ScriptedSource {
        async fn load_snapshot(&self) -> Result<Snapshot> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            if self.panic.load(Ordering::SeqCst) {
                panic!("upstream exploded");
            }
            if self.fail.load(Ordering::SeqCst) {
                return Err(Error::Refresh("pipeline down".to_string()));
            }
            Ok(Snapshot::new(SpotPrices::new(), Vec::new(), Utc::now()))
        }
    }

    fn cache(source: &Arc<ScriptedSource>) -> RefreshCache {
        RefreshCache::new(source.clone(), TTL)
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_get_fetches_then_serves_from_cache() {
        let source = ScriptedSource::new(Duration::ZERO);
        let cache = cache(&source);
        assert_eq!(cache.state(), SlotState::Empty);
        assert!(cache.peek().is_none());

        let first = cache.get().await.unwrap();
        assert_eq!(source.calls(), 1);
        assert_eq!(cache.state(), SlotState::Fresh);
        assert_eq!(cache.status(), RefreshStatus::Idle);

        let second = cache.get().await.unwrap();
        assert_eq!(source.calls(), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refreshes_only_once_ttl_has_elapsed() {
        let source = ScriptedSource::new(Duration::ZERO);
        let cache = cache(&source);
        cache.get().await.unwrap();

        tokio::time::advance(TTL - Duration::from_millis(1)).await;
        cache.get().await.unwrap();
        assert_eq!(source.calls(), 1);

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(cache.state(), SlotState::Stale);
        cache.get().await.unwrap();
        assert_eq!(source.calls(), 2);
        assert_eq!(cache.state(), SlotState::Fresh);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_stale_reads_trigger_one_refresh() {
        let source = ScriptedSource::new(Duration::from_secs(1));
        let cache = cache(&source);
        let old = cache.get().await.unwrap();
        tokio::time::advance(TTL).await;

        let results = join_all((0..10).map(|_| cache.get())).await;

        assert_eq!(source.calls(), 2);
        let snapshots: Vec<_> = results.into_iter().map(|r| r.unwrap()).collect();
        let served_old = snapshots.iter().filter(|s| Arc::ptr_eq(s, &old)).count();
        assert_eq!(served_old, 9);
        assert_eq!(cache.state(), SlotState::Fresh);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_reads_on_empty_slot_wait_for_one_refresh() {
        let source = ScriptedSource::new(Duration::from_secs(1));
        let cache = cache(&source);

        let results = join_all((0..5).map(|_| cache.get())).await;

        assert_eq!(source.calls(), 1);
        let snapshots: Vec<_> = results.into_iter().map(|r| r.unwrap()).collect();
        assert!(snapshots.iter().all(|s| Arc::ptr_eq(s, &snapshots[0])));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_refresh_keeps_previous_snapshot() {
        let source = ScriptedSource::new(Duration::ZERO);
        let cache = cache(&source);
        let good = cache.get().await.unwrap();
        let fetched_at = cache.last_fetched_at();

        source.fail.store(true, Ordering::SeqCst);
        tokio::time::advance(TTL).await;

        let served = cache.get().await.unwrap();
        assert!(Arc::ptr_eq(&served, &good));
        assert_eq!(cache.last_fetched_at(), fetched_at);
        assert!(matches!(cache.status(), RefreshStatus::Error(m) if m.contains("pipeline down")));
        // Timestamp not bumped, so the next read retries.
        assert_eq!(cache.state(), SlotState::Stale);

        source.fail.store(false, Ordering::SeqCst);
        cache.get().await.unwrap();
        assert_eq!(source.calls(), 3);
        assert_eq!(cache.status(), RefreshStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_first_refresh_is_an_error() {
        let source = ScriptedSource::new(Duration::ZERO);
        source.fail.store(true, Ordering::SeqCst);
        let cache = cache(&source);

        assert!(matches!(cache.get().await, Err(Error::Refresh(_))));
        assert_eq!(cache.state(), SlotState::Empty);
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicking_refresh_is_contained() {
        let source = ScriptedSource::new(Duration::ZERO);
        source.panic.store(true, Ordering::SeqCst);
        let cache = cache(&source);

        match cache.get().await {
            Err(Error::Refresh(message)) => assert!(message.contains("upstream exploded")),
            other => panic!("expected refresh error, got {:?}", other.map(|_| ())),
        }
        assert_eq!(cache.state(), SlotState::Empty);

        source.panic.store(false, Ordering::SeqCst);
        assert!(cache.get().await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_caller_does_not_leave_slot_refreshing() {
        let source = ScriptedSource::new(Duration::from_secs(5));
        let cache = cache(&source);

        let abandoned = tokio::time::timeout(Duration::from_secs(1), cache.get()).await;
        assert!(abandoned.is_err());
        assert_eq!(cache.state(), SlotState::Refreshing);
        assert_eq!(cache.status(), RefreshStatus::Fetching);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(cache.state(), SlotState::Fresh);
        assert_eq!(source.calls(), 1);
    }
}
