//! Async game loading.

use std::time::Instant;

use anyhow::{anyhow, Result};
use tokio::runtime::{Builder, Runtime};
use tokio::sync::oneshot::{self, error::TryRecvError};

use crate::catalog::LoadFuture;
use crate::game::GameCtor;

/// Runs load futures off the frame loop.
pub struct Loader {
    runtime: Runtime,
}

impl Loader {
    pub fn new() -> Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("arctui-loader")
            .enable_time()
            .build()?;
        Ok(Self { runtime })
    }

    /// Spawn `load`; poll the returned handle from the frame loop.
    pub fn start(&self, slug: &str, load: LoadFuture) -> PendingLoad {
        let (tx, rx) = oneshot::channel();
        self.runtime.spawn(async move {
            let _ = tx.send(load.await);
        });
        PendingLoad {
            slug: slug.to_string(),
            started: Instant::now(),
            rx,
        }
    }
}

impl std::fmt::Debug for Loader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loader").finish_non_exhaustive()
    }
}

/// Result of checking a [`PendingLoad`].
pub enum LoadPoll {
    Pending,
    Ready(Result<GameCtor>),
}

/// An in-flight load. Checked without blocking; never cancelled.
pub struct PendingLoad {
    slug: String,
    started: Instant,
    rx: oneshot::Receiver<Result<GameCtor>>,
}

impl PendingLoad {
    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn started(&self) -> Instant {
        self.started
    }

    pub fn poll(&mut self) -> LoadPoll {
        match self.rx.try_recv() {
            Ok(result) => LoadPoll::Ready(result),
            Err(TryRecvError::Empty) => LoadPoll::Pending,
            // The task dropped its sender: the load future panicked.
            Err(TryRecvError::Closed) => {
                LoadPoll::Ready(Err(anyhow!("load of {:?} ended without a result", self.slug)))
            }
        }
    }
}

impl std::fmt::Debug for PendingLoad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingLoad")
            .field("slug", &self.slug)
            .field("started", &self.started)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use std::time::Duration;

    fn wait(pending: &mut PendingLoad) -> Result<GameCtor> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let LoadPoll::Ready(result) = pending.poll() {
                return result;
            }
            assert!(Instant::now() < deadline, "load never resolved");
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn failing_load_reports_its_error() {
        let loader = Loader::new().unwrap();
        let load = async { Err::<GameCtor, _>(anyhow!("missing asset")) }.boxed();
        let mut pending = loader.start("bad", load);
        let err = wait(&mut pending).err().unwrap();
        assert!(err.to_string().contains("missing asset"));
    }

    fn exploding() -> Result<GameCtor> {
        panic!("loader exploded")
    }

    #[test]
    fn panicking_load_is_reported_as_error() {
        let loader = Loader::new().unwrap();
        let mut pending = loader.start("boom", async { exploding() }.boxed());
        let err = wait(&mut pending).err().unwrap();
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn slow_load_stays_pending_until_done() {
        let loader = Loader::new().unwrap();
        let mut pending = loader.start(
            "slow",
            async {
                tokio::time::sleep(Duration::from_millis(300)).await;
                Err::<GameCtor, _>(anyhow!("late"))
            }
            .boxed(),
        );
        assert!(matches!(pending.poll(), LoadPoll::Pending));
        assert!(wait(&mut pending).is_err());
    }
}
