use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::time::Instant;

use super::*;
use crate::error::ShellError;

/// What the next `connect` call does.
enum Attempt {
    Refuse,
    Accept(Vec<Result<String, ShellError>>),
}

/// Transport that replays scripted attempts and refuses once they run out.
struct ScriptedTransport {
    attempts: Mutex<VecDeque<Attempt>>,
    connects: Mutex<Vec<Instant>>,
}

impl ScriptedTransport {
    fn new(attempts: Vec<Attempt>) -> Arc<Self> {
        Arc::new(Self { attempts: Mutex::new(attempts.into()), connects: Mutex::new(Vec::new()) })
    }

    fn connects(&self) -> Vec<Instant> {
        self.connects.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedTransport for ScriptedTransport {
    async fn connect(&self, _url: &str) -> Result<Box<dyn FeedStream>, ShellError> {
        self.connects.lock().unwrap().push(Instant::now());
        match self.attempts.lock().unwrap().pop_front() {
            Some(Attempt::Accept(messages)) => Ok(Box::new(ScriptedStream { messages: messages.into() })),
            Some(Attempt::Refuse) | None => Err(ShellError::Feed("connection refused".into())),
        }
    }
}

struct ScriptedStream {
    messages: VecDeque<Result<String, ShellError>>,
}

#[async_trait]
impl FeedStream for ScriptedStream {
    async fn next_text(&mut self) -> Option<Result<String, ShellError>> {
        self.messages.pop_front()
    }
}

fn start(transport: Arc<ScriptedTransport>) -> (JoinHandle<()>, Arc<RwLock<NetworkPanels>>, mpsc::UnboundedReceiver<FeedStatus>) {
    let panels = Arc::new(RwLock::new(NetworkPanels::new()));
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = NetworkBridge::new(transport, "ws://localhost:8765", panels.clone(), tx).spawn();
    (handle, panels, rx)
}

async fn next_statuses(rx: &mut mpsc::UnboundedReceiver<FeedStatus>, n: usize) -> Vec<FeedStatus> {
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        out.push(rx.recv().await.unwrap());
    }
    out
}

// =============================================================
// Status sequence
// =============================================================

#[tokio::test(start_paused = true)]
async fn refused_connect_reports_error_then_disconnected() {
    let transport = ScriptedTransport::new(vec![Attempt::Refuse]);
    let (handle, panels, mut rx) = start(transport);

    let statuses = next_statuses(&mut rx, 4).await;

    assert_eq!(
        statuses,
        [FeedStatus::Connecting, FeedStatus::Error, FeedStatus::Disconnected, FeedStatus::Connecting]
    );
    handle.abort();
    assert_ne!(panels.read().await.status, FeedStatus::Connected);
}

#[tokio::test(start_paused = true)]
async fn close_reports_disconnected() {
    let transport = ScriptedTransport::new(vec![Attempt::Accept(Vec::new())]);
    let (handle, _panels, mut rx) = start(transport);

    let statuses = next_statuses(&mut rx, 3).await;

    assert_eq!(statuses, [FeedStatus::Connecting, FeedStatus::Connected, FeedStatus::Disconnected]);
    handle.abort();
}

#[tokio::test(start_paused = true)]
async fn stream_error_reports_error() {
    let transport =
        ScriptedTransport::new(vec![Attempt::Accept(vec![Err(ShellError::Feed("reset by peer".into()))])]);
    let (handle, _panels, mut rx) = start(transport);

    let statuses = next_statuses(&mut rx, 4).await;

    assert_eq!(
        statuses,
        [FeedStatus::Connecting, FeedStatus::Connected, FeedStatus::Error, FeedStatus::Disconnected]
    );
    handle.abort();
}

// =============================================================
// Reconnect timing
// =============================================================

#[tokio::test(start_paused = true)]
async fn reconnects_after_fixed_delay() {
    let transport = ScriptedTransport::new(vec![Attempt::Refuse, Attempt::Accept(Vec::new()), Attempt::Refuse]);
    let (handle, _panels, mut rx) = start(transport.clone());

    // Three full attempts plus the fourth Connecting.
    next_statuses(&mut rx, 10).await;
    handle.abort();

    let connects = transport.connects();
    assert!(connects.len() >= 3);
    for pair in connects.windows(2) {
        let gap = pair[1] - pair[0];
        assert!(gap >= RECONNECT_DELAY, "gap {gap:?} shorter than reconnect delay");
        assert!(gap < RECONNECT_DELAY + Duration::from_millis(100), "gap {gap:?} suggests backoff");
    }
}

// =============================================================
// Messages
// =============================================================

#[tokio::test(start_paused = true)]
async fn malformed_message_is_skipped() {
    let good = r#"{"upload_bps": 1500, "listening_count": 3}"#.to_owned();
    let transport = ScriptedTransport::new(vec![Attempt::Accept(vec![Ok("not json".into()), Ok(good)])]);
    let (handle, panels, mut rx) = start(transport);

    let statuses = next_statuses(&mut rx, 3).await;
    handle.abort();

    assert_eq!(statuses[2], FeedStatus::Disconnected);
    let panels = panels.read().await;
    assert_eq!(panels.upload_speed, "1.5 Kbps");
    assert_eq!(panels.listening_count, "(3)");
}
