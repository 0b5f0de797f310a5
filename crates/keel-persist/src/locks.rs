//! Per-directory mutual exclusion for index updates.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// One async mutex per directory, created on first use and forgotten once
/// the last guard for it is dropped.
///
/// Lock ordering: the map mutex is only held while looking up or pruning a
/// handle, never across an `.await`.
#[derive(Debug, Default)]
pub struct DirectoryLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl DirectoryLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `directory`.
    pub async fn lock(&self, directory: &str) -> DirectoryGuard<'_> {
        let guard = self.handle(directory).lock_owned().await;
        DirectoryGuard {
            locks: self,
            directory: directory.to_string(),
            guard: Some(guard),
        }
    }

    /// Forget the mutex for `directory` if nobody holds or awaits it.
    pub fn release(&self, directory: &str) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if locks
            .get(directory)
            .is_some_and(|handle| Arc::strong_count(handle) == 1)
        {
            locks.remove(directory);
        }
    }

    /// Number of directories with a live mutex.
    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn handle(&self, directory: &str) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(directory.to_string()).or_default())
    }
}

/// Exclusive access to one directory. Dropping it unlocks the directory and
/// prunes its mutex if no other task holds or awaits it.
#[derive(Debug)]
pub struct DirectoryGuard<'a> {
    locks: &'a DirectoryLocks,
    directory: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl DirectoryGuard<'_> {
    pub fn directory(&self) -> &str {
        &self.directory
    }
}

impl Drop for DirectoryGuard<'_> {
    fn drop(&mut self) {
        // Unlock first so our own handle no longer counts as a holder.
        self.guard.take();
        self.locks.release(&self.directory);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_directory_is_exclusive() {
        let locks = Arc::new(DirectoryLocks::new());
        let guard = locks.lock("/a").await;

        let contender = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.lock("/a").await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.unwrap();
    }

    #[tokio::test]
    async fn different_directories_do_not_block() {
        let locks = DirectoryLocks::new();
        let _a = locks.lock("/a").await;
        let _b = tokio::time::timeout(Duration::from_secs(1), locks.lock("/b"))
            .await
            .expect("independent directory should lock immediately");
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn release_skips_held_locks() {
        let locks = DirectoryLocks::new();
        let guard = locks.lock("/a").await;
        assert_eq!(guard.directory(), "/a");
        locks.release("/a");
        assert_eq!(locks.len(), 1);

        drop(guard);
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn waiters_keep_the_mutex_alive() {
        let locks = Arc::new(DirectoryLocks::new());
        let guard = locks.lock("/a").await;

        let contender = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.lock("/a").await;
                locks.len()
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(guard);
        assert_eq!(locks.len(), 1, "a waiting task still needs the mutex");

        assert_eq!(contender.await.unwrap(), 1);
        assert!(locks.is_empty());
    }
}
