//! Graceful shutdown signal handling.
//!
//! [`ShutdownSignal`] is a cloneable trigger shared by the accept loop and
//! every connection task. [`ConnectionTracker`] counts live connections so the
//! server can wait for them to drain before it returns.
//!
//! ```rust
//! use stockroom_server::ShutdownSignal;
//!
//! let shutdown = ShutdownSignal::new();
//! let for_task = shutdown.clone();
//!
//! shutdown.trigger();
//! assert!(for_task.is_shutdown());
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::sync::{broadcast, Notify};

/// A signal that can be used to trigger and await graceful shutdown.
///
/// All clones observe the same trigger.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    triggered: Arc<AtomicBool>,
    sender: broadcast::Sender<()>,
}

impl ShutdownSignal {
    /// Creates a new, untriggered shutdown signal.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1);
        Self {
            triggered: Arc::new(AtomicBool::new(false)),
            sender,
        }
    }

    /// Triggers the shutdown signal. Idempotent.
    pub fn trigger(&self) {
        if self
            .triggered
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            // No receivers is fine
            let _ = self.sender.send(());
        }
    }

    /// Returns `true` if shutdown has been triggered.
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    /// Returns a future that completes once shutdown is triggered.
    ///
    /// Completes immediately if the signal was already triggered.
    pub fn recv(&self) -> ShutdownReceiver {
        let mut rx = self.sender.subscribe();
        ShutdownReceiver {
            triggered: Arc::clone(&self.triggered),
            receiver: Box::pin(async move {
                let _ = rx.recv().await;
            }),
        }
    }

    /// Creates a shutdown signal triggered by SIGTERM or SIGINT (Ctrl+C).
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn with_os_signals() -> Self {
        let signal = Self::new();
        let signal_clone = signal.clone();

        tokio::spawn(async move {
            wait_for_os_signal().await;
            signal_clone.trigger();
        });

        signal
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// A future that completes when the shutdown signal is triggered.
///
/// Created by [`ShutdownSignal::recv()`].
pub struct ShutdownReceiver {
    triggered: Arc<AtomicBool>,
    receiver: Pin<Box<dyn Future<Output = ()> + Send>>,
}

impl Future for ShutdownReceiver {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.triggered.load(Ordering::SeqCst) {
            return Poll::Ready(());
        }

        match self.receiver.as_mut().poll(cx) {
            Poll::Ready(()) => Poll::Ready(()),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Waits for SIGTERM or SIGINT. On non-Unix targets only Ctrl+C is observed.
///
/// If a handler cannot be registered the failure is logged and the remaining
/// signal source is used instead.
async fn wait_for_os_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {
                        tracing::info!("received SIGTERM, initiating graceful shutdown");
                    }
                    _ = wait_for_ctrl_c() => {}
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to register SIGTERM handler");
                wait_for_ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    wait_for_ctrl_c().await;
}

async fn wait_for_ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("received SIGINT, initiating graceful shutdown"),
        Err(e) => {
            tracing::error!(error = %e, "failed to listen for Ctrl+C; OS signals disabled");
            std::future::pending::<()>().await;
        }
    }
}

/// Counts active connections so shutdown can wait for them to close.
///
/// ```rust
/// use stockroom_server::ConnectionTracker;
///
/// let tracker = ConnectionTracker::new();
/// let token = tracker.acquire();
/// assert_eq!(tracker.active_connections(), 1);
///
/// drop(token);
/// assert_eq!(tracker.active_connections(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct ConnectionTracker {
    active: Arc<AtomicUsize>,
    notify: Arc<Notify>,
}

impl ConnectionTracker {
    /// Creates a tracker with no active connections.
    #[must_use]
    pub fn new() -> Self {
        Self {
            active: Arc::new(AtomicUsize::new(0)),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Acquires a token to hold for the lifetime of a connection.
    #[must_use]
    pub fn acquire(&self) -> ConnectionToken {
        self.active.fetch_add(1, Ordering::SeqCst);
        ConnectionToken {
            active: Arc::clone(&self.active),
            notify: Arc::clone(&self.notify),
        }
    }

    /// Returns the number of active connections.
    #[must_use]
    pub fn active_connections(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Waits until every token has been dropped.
    pub async fn wait_for_shutdown(&self) {
        loop {
            // Registered before the check so a concurrent last drop is not missed
            let notified = self.notify.notified();
            if self.active.load(Ordering::SeqCst) == 0 {
                return;
            }
            notified.await;
        }
    }
}

impl Default for ConnectionTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// A token representing an active connection.
#[derive(Debug)]
pub struct ConnectionToken {
    active: Arc<AtomicUsize>,
    notify: Arc<Notify>,
}

impl Drop for ConnectionToken {
    fn drop(&mut self) {
        if self.active.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.notify.notify_waiters();
        }
    }
}
