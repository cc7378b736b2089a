use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

use crate::error::AppError;

/// Lifetime of one mounted screen.
///
/// Requests issued through [`ScreenScope::run`] resolve to
/// [`AppError::Cancelled`] once the scope is closed, whether the close happens
/// before the request starts or while it is in flight. Clones share the same
/// signal, so the router can close a scope the screen is awaiting on.
#[derive(Clone)]
pub struct ScreenScope {
    closed: Arc<watch::Sender<bool>>,
}

impl Default for ScreenScope {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenScope {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            closed: Arc::new(tx),
        }
    }

    pub fn close(&self) {
        self.closed.send_replace(true);
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    pub async fn run<T, F>(&self, request: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, AppError>>,
    {
        if self.is_closed() {
            return Err(AppError::Cancelled);
        }

        let rx = self.closed.subscribe();
        tokio::select! {
            biased;
            _ = wait_closed(rx) => Err(AppError::Cancelled),
            result = request => {
                if self.is_closed() {
                    Err(AppError::Cancelled)
                } else {
                    result
                }
            }
        }
    }
}

async fn wait_closed(mut rx: watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
