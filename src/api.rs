//! Background HTTP workers for the prediction server.
//!
//! Every request runs on its own thread and reports its settled outcome
//! (success or failure, never a panic) back to the event loop through the
//! `ApiEvent` channel. Prediction outcomes carry the epoch of the request
//! that produced them so the loop can discard stale arrivals.

use std::sync::mpsc::Sender;
use std::thread;
use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::constants::{DOT_DIR, REQUEST_TIMEOUT_SECS};
use crate::state::{Order, Source, Suggestion};

/// Settled request outcomes delivered to the event loop
#[derive(Debug)]
pub enum ApiEvent {
    /// A /predict round-trip settled. `epoch` identifies the issuance.
    Predicted { epoch: u64, outcome: Result<Prediction, String> },
    /// The startup /sources fetch settled
    Sources(Result<Vec<Source>, String>),
}

/// Decoded /predict payload
#[derive(Debug, PartialEq)]
pub struct Prediction {
    pub suggestions: Vec<Suggestion>,
    pub order: Order,
}

#[derive(Deserialize)]
struct PredictResponse {
    suggestions: Vec<Suggestion>,
    order: u8,
}

#[derive(Deserialize)]
struct SourcesResponse {
    sources: Vec<Source>,
}

/// Shared client with a request timeout, so a hung server settles as a
/// failure instead of pinning the loading indicator
pub fn build_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .expect("failed to build reqwest client")
}

/// Append a line to .wordpilot/debug.log. Logging failures are ignored.
pub fn debug_log(msg: &str) {
    use std::io::Write;
    let dir = std::path::Path::new(DOT_DIR);
    let _ = std::fs::create_dir_all(dir);
    if let Ok(mut f) =
        std::fs::OpenOptions::new().create(true).append(true).open(dir.join("debug.log"))
    {
        let _ = writeln!(f, "[{}] {}", chrono::Local::now().format("%H:%M:%S%.3f"), msg);
    }
}

/// Run one /predict request in the background
pub fn spawn_predict(client: Client, base_url: String, text: String, epoch: u64, tx: Sender<ApiEvent>) {
    thread::spawn(move || {
        let started = Instant::now();
        let outcome = predict(&client, &base_url, &text);
        match &outcome {
            Ok(p) => debug_log(&format!(
                "predict #{} settled in {:?} ({} suggestions, {})",
                epoch,
                started.elapsed(),
                p.suggestions.len(),
                p.order.label()
            )),
            Err(e) => debug_log(&format!("predict #{} failed after {:?}: {}", epoch, started.elapsed(), e)),
        }
        let _ = tx.send(ApiEvent::Predicted { epoch, outcome });
    });
}

/// Run a source toggle followed by a fresh prediction for `text` (the editor
/// text captured at toggle time). The toggle response body is not consumed;
/// its failure is folded into whatever the prediction step reports.
pub fn spawn_toggle_then_predict(
    client: Client,
    base_url: String,
    source: String,
    active: bool,
    text: String,
    epoch: u64,
    tx: Sender<ApiEvent>,
) {
    thread::spawn(move || {
        if let Err(e) = toggle_source(&client, &base_url, &source, active) {
            debug_log(&format!("toggle_source '{}' failed: {}", source, e));
        }
        let outcome = predict(&client, &base_url, &text);
        let _ = tx.send(ApiEvent::Predicted { epoch, outcome });
    });
}

/// Fetch the source list once at startup
pub fn spawn_fetch_sources(client: Client, base_url: String, tx: Sender<ApiEvent>) {
    thread::spawn(move || {
        let outcome = fetch_sources(&client, &base_url);
        if let Err(e) = &outcome {
            debug_log(&format!("sources fetch failed: {}", e));
        }
        let _ = tx.send(ApiEvent::Sources(outcome));
    });
}

fn predict(client: &Client, base_url: &str, text: &str) -> Result<Prediction, String> {
    let response = client
        .post(format!("{}/predict", base_url))
        .json(&serde_json::json!({ "text": text }))
        .send()
        .map_err(|e| format!("request failed: {}", e))?;

    if !response.status().is_success() {
        return Err(format!("server returned {}", response.status()));
    }

    let body = response.text().map_err(|e| format!("failed to read response: {}", e))?;
    parse_prediction(&body)
}

fn toggle_source(client: &Client, base_url: &str, source: &str, active: bool) -> Result<(), String> {
    let response = client
        .post(format!("{}/toggle_source", base_url))
        .json(&serde_json::json!({ "source": source, "active": active }))
        .send()
        .map_err(|e| format!("request failed: {}", e))?;

    if !response.status().is_success() {
        return Err(format!("server returned {}", response.status()));
    }
    Ok(())
}

fn fetch_sources(client: &Client, base_url: &str) -> Result<Vec<Source>, String> {
    let response = client
        .get(format!("{}/sources", base_url))
        .send()
        .map_err(|e| format!("request failed: {}", e))?;

    if !response.status().is_success() {
        return Err(format!("server returned {}", response.status()));
    }

    let body = response.text().map_err(|e| format!("failed to read response: {}", e))?;
    parse_sources(&body)
}

fn parse_prediction(body: &str) -> Result<Prediction, String> {
    let decoded: PredictResponse =
        serde_json::from_str(body).map_err(|e| format!("malformed prediction response: {}", e))?;
    Ok(Prediction { suggestions: decoded.suggestions, order: Order::from_wire(decoded.order) })
}

fn parse_sources(body: &str) -> Result<Vec<Source>, String> {
    let decoded: SourcesResponse =
        serde_json::from_str(body).map_err(|e| format!("malformed sources response: {}", e))?;
    Ok(decoded.sources)
}
