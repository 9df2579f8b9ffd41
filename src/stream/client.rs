//! Reconnecting event stream client
//!
//! Maintains a logically continuous server-push stream over HTTP despite
//! transport-level disconnects. Connection drops and open failures both feed
//! an exponential backoff loop that retries until the handle is closed; a
//! successful open resets the backoff.

use super::backoff::Backoff;
use super::parser::SseParser;
use super::types::{
    ErrorHandler, EventHandler, OpenHandler, StreamConfig, StreamError, StreamEvent,
};
use futures_util::StreamExt;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::sleep;

/// Reconnecting client for a named-event stream endpoint.
///
/// Handlers are registered up front, then [`StreamClient::connect`] moves the
/// client into a single background task and returns a [`StreamHandle`] whose
/// only operation is `close()`.
pub struct StreamClient {
    config: StreamConfig,
    listeners: HashMap<String, EventHandler>,
    on_open: Option<OpenHandler>,
    on_error: Option<ErrorHandler>,
}

impl StreamClient {
    /// Create a new client with the given configuration
    pub fn new(config: StreamConfig) -> Self {
        Self {
            config,
            listeners: HashMap::new(),
            on_open: None,
            on_error: None,
        }
    }

    /// Register a handler for a named event. Registering the same name again
    /// replaces the previous handler.
    pub fn on_event(
        mut self,
        name: impl Into<String>,
        handler: impl Fn(StreamEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.listeners.insert(name.into(), Box::new(handler));
        self
    }

    /// Register a callback invoked on every successful (re)connection
    pub fn on_open(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_open = Some(Box::new(f));
        self
    }

    /// Register a callback invoked on every connection failure
    pub fn on_error(
        mut self,
        f: impl Fn(&StreamError, u32, std::time::Duration) + Send + Sync + 'static,
    ) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    /// Start the connection loop in a background task.
    ///
    /// The returned handle is the only way to interact with the running
    /// client; dropping it closes the stream just like calling
    /// [`StreamHandle::close`].
    pub fn connect(self) -> StreamHandle {
        let closed = Arc::new(AtomicBool::new(false));
        let (cancel_tx, cancel_rx) = watch::channel(false);

        let handle = StreamHandle {
            closed: closed.clone(),
            cancel: cancel_tx,
        };

        if self.config.url.is_empty() {
            tracing::error!("stream url is empty, client will never connect");
            closed.store(true, Ordering::SeqCst);
            return handle;
        }

        tokio::spawn(async move {
            if let Err(e) = run_connection_loop(self, closed, cancel_rx).await {
                tracing::error!(error = %e, "stream connection loop failed");
            }
        });

        handle
    }
}

/// Handle to a running stream client.
///
/// At most one transport connection and one pending reconnect timer exist
/// behind a handle at any time; `close()` tears both down.
#[derive(Debug)]
pub struct StreamHandle {
    closed: Arc<AtomicBool>,
    cancel: watch::Sender<bool>,
}

impl StreamHandle {
    /// Close the stream. Idempotent: cancels a pending reconnect timer,
    /// drops the active connection and prevents any future attempts. Safe to
    /// call before the first connection completes.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        let _ = self.cancel.send(true);
        tracing::debug!("stream client closed");
    }

    /// Whether `close()` has been called (or the client never started).
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        self.close();
    }
}

/// Run the connect/retry loop until closed
async fn run_connection_loop(
    client: StreamClient,
    closed: Arc<AtomicBool>,
    mut cancel: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    let StreamClient {
        config,
        listeners,
        on_open,
        on_error,
    } = client;

    let http = reqwest::Client::builder().build()?;
    let mut backoff = Backoff::new(
        config.initial_delay,
        config.max_delay,
        config.factor,
        config.jitter,
    );

    loop {
        if closed.load(Ordering::SeqCst) {
            break;
        }

        let error = tokio::select! {
            err = connect_and_stream(&http, &config.url, &listeners, &on_open, &mut backoff) => err,
            _ = cancel.changed() => break,
        };

        // A close that raced the failure wins: no callback, no retry.
        if closed.load(Ordering::SeqCst) {
            break;
        }

        let (attempt, delay) = backoff.next();
        tracing::warn!(
            error = %error,
            attempt,
            delay_ms = delay.as_millis() as u64,
            "stream connection lost, reconnecting"
        );
        if let Some(ref f) = on_error {
            f(&error, attempt, delay);
        }

        tokio::select! {
            _ = sleep(delay) => {}
            _ = cancel.changed() => break,
        }
    }

    tracing::debug!("stream connection loop stopped");
    Ok(())
}

/// Open the stream and dispatch events until it fails.
///
/// Only returns on failure; the caller decides whether to retry. Dropping
/// the response on any exit path closes the transport.
async fn connect_and_stream(
    http: &reqwest::Client,
    url: &str,
    listeners: &HashMap<String, EventHandler>,
    on_open: &Option<OpenHandler>,
    backoff: &mut Backoff,
) -> StreamError {
    tracing::debug!(url = %url, "connecting to event stream");

    let response = match http
        .get(url)
        .header(reqwest::header::ACCEPT, "text/event-stream")
        .send()
        .await
    {
        Ok(r) => r,
        Err(e) => return StreamError::ConnectFailed(e.to_string()),
    };

    if !response.status().is_success() {
        return StreamError::ConnectFailed(format!("unexpected status {}", response.status()));
    }

    backoff.reset();
    tracing::info!(url = %url, "event stream connected");
    if let Some(f) = on_open {
        f();
    }

    let mut parser = SseParser::new();
    let mut body = response.bytes_stream();

    while let Some(chunk) = body.next().await {
        let chunk = match chunk {
            Ok(c) => c,
            Err(e) => return StreamError::Disconnected(e.to_string()),
        };
        for event in parser.feed(&chunk) {
            dispatch(listeners, event);
        }
    }

    StreamError::Disconnected("server closed the stream".into())
}

/// Invoke the handler registered for the event's name, if any.
fn dispatch(listeners: &HashMap<String, EventHandler>, event: StreamEvent) {
    match listeners.get(&event.name) {
        Some(handler) => {
            let name = event.name.clone();
            if let Err(e) = handler(event) {
                tracing::warn!(event = %name, error = %e, "event handler failed");
            }
        }
        None => {
            tracing::trace!(event = %event.name, "no handler registered, dropping event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn event(name: &str, data: &str) -> StreamEvent {
        StreamEvent {
            name: name.to_string(),
            data: data.to_string(),
            id: None,
        }
    }

    #[test]
    fn test_dispatch_unregistered_event_dropped() {
        let listeners: HashMap<String, EventHandler> = HashMap::new();
        // Must not panic or invoke anything.
        dispatch(&listeners, event("unknown", "{}"));
    }

    #[test]
    fn test_dispatch_handler_error_does_not_stop_later_events() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let mut listeners: HashMap<String, EventHandler> = HashMap::new();
        listeners.insert(
            "flaky".to_string(),
            Box::new(move |_| {
                calls_clone.fetch_add(1, Ordering::SeqCst);
                anyhow::bail!("handler blew up")
            }),
        );

        dispatch(&listeners, event("flaky", "{}"));
        dispatch(&listeners, event("flaky", "{}"));

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_on_event_replaces_same_name() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let tx2 = tx.clone();

        let client = StreamClient::new(StreamConfig::new("http://localhost/x"))
            .on_event("status", move |_| {
                tx.send("first").unwrap();
                Ok(())
            })
            .on_event("status", move |_| {
                tx2.send("second").unwrap();
                Ok(())
            });

        assert_eq!(client.listeners.len(), 1);
        dispatch(&client.listeners, event("status", "{}"));
        assert_eq!(rx.try_recv().unwrap(), "second");
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let handle = StreamClient::new(StreamConfig::new("http://127.0.0.1:1/api/events"))
            .connect();

        handle.close();
        handle.close();
        handle.close();
        assert!(handle.is_closed());
    }

    #[tokio::test]
    async fn test_empty_url_never_connects() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = StreamClient::new(StreamConfig::default())
            .on_open(move || {
                tx.send(()).ok();
            })
            .connect();

        assert!(handle.is_closed());
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(rx.try_recv().is_err());
    }

    // Runs on the current-thread flavor: the spawned task cannot make
    // progress before the first await, so close() lands before any attempt.
    #[tokio::test]
    async fn test_close_before_first_attempt_silences_callbacks() {
        let (open_tx, mut open_rx) = mpsc::unbounded_channel();
        let (err_tx, mut err_rx) = mpsc::unbounded_channel();

        let config = StreamConfig::new("http://127.0.0.1:1/api/events")
            .initial_delay(Duration::from_millis(10))
            .jitter(false);

        let handle = StreamClient::new(config)
            .on_open(move || {
                open_tx.send(()).ok();
            })
            .on_error(move |_, attempt, _| {
                err_tx.send(attempt).ok();
            })
            .connect();

        handle.close();

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(open_rx.try_recv().is_err());
        assert!(err_rx.try_recv().is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_refused_connection_retries_with_increasing_attempts() {
        // Bind then drop to get a port with nothing listening.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let (err_tx, mut err_rx) = mpsc::unbounded_channel();

        let config = StreamConfig::new(format!("http://{addr}/api/events"))
            .initial_delay(Duration::from_millis(20))
            .max_delay(Duration::from_millis(100))
            .factor(2.0)
            .jitter(false);

        let handle = StreamClient::new(config)
            .on_error(move |err, attempt, delay| {
                assert!(matches!(err, StreamError::ConnectFailed(_)));
                err_tx.send((attempt, delay)).ok();
            })
            .connect();

        let (attempt, delay) = tokio::time::timeout(Duration::from_secs(5), err_rx.recv())
            .await
            .expect("timed out waiting for error callback")
            .expect("callback channel closed");
        assert_eq!(attempt, 1);
        assert_eq!(delay, Duration::from_millis(20));

        let (attempt, delay) = tokio::time::timeout(Duration::from_secs(5), err_rx.recv())
            .await
            .expect("timed out waiting for error callback")
            .expect("callback channel closed");
        assert_eq!(attempt, 2);
        assert_eq!(delay, Duration::from_millis(40));

        handle.close();
    }
}
