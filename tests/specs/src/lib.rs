// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test harness for end-to-end binary smoke tests.
//!
//! Runs the real `roost` binary against a throwaway data directory and
//! a scripted mock of the Beds24 authentication API.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

use roost::record::Slot;

/// Resolve the path to the compiled `roost` binary.
pub fn roost_binary() -> PathBuf {
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));
    // tests/specs → tests → workspace root
    let workspace = manifest.parent().and_then(|p| p.parent()).unwrap_or(manifest);
    workspace.join("target").join("debug").join("roost")
}

#[derive(Clone)]
struct Endpoint {
    responses: Arc<Vec<(u16, String)>>,
    calls: Arc<AtomicU32>,
}

impl Endpoint {
    fn new(responses: Vec<(u16, String)>) -> Self {
        Self { responses: Arc::new(responses), calls: Arc::new(AtomicU32::new(0)) }
    }

    fn count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn route(&self) -> axum::routing::MethodRouter {
        let responses = Arc::clone(&self.responses);
        let calls = Arc::clone(&self.calls);
        get(move || {
            let responses = Arc::clone(&responses);
            let calls = Arc::clone(&calls);
            async move {
                let index = calls.fetch_add(1, Ordering::SeqCst) as usize;
                // Past the end of the script the last response repeats.
                let (status, body) = responses
                    .get(index.min(responses.len().saturating_sub(1)))
                    .cloned()
                    .unwrap_or((500, "{}".to_owned()));
                (StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR), body)
            }
        })
    }
}

/// A mock Beds24 authentication API with scripted responses.
pub struct MockApi {
    addr: SocketAddr,
    setup: Endpoint,
    refresh: Endpoint,
    details: Endpoint,
}

impl MockApi {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn setup_calls(&self) -> u32 {
        self.setup.count()
    }

    pub fn refresh_calls(&self) -> u32 {
        self.refresh.count()
    }

    pub fn details_calls(&self) -> u32 {
        self.details.count()
    }
}

/// Start a mock API server with one response script per endpoint.
pub async fn mock_api(
    setup: Vec<(u16, String)>,
    refresh: Vec<(u16, String)>,
    details: Vec<(u16, String)>,
) -> anyhow::Result<MockApi> {
    let setup = Endpoint::new(setup);
    let refresh = Endpoint::new(refresh);
    let details = Endpoint::new(details);

    let app = Router::new()
        .route("/authentication/setup", setup.route())
        .route("/authentication/token", refresh.route())
        .route("/authentication/details", details.route());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(MockApi { addr, setup, refresh, details })
}

/// JSON body for a successful invite code exchange.
pub fn setup_body(token: &str, refresh_token: &str, expires_in: i64) -> (u16, String) {
    let body = serde_json::json!({
        "token": token,
        "refreshToken": refresh_token,
        "expiresIn": expires_in,
    });
    (200, body.to_string())
}

/// JSON body for a successful token refresh.
pub fn token_body(token: &str, expires_in: i64) -> (u16, String) {
    let body = serde_json::json!({ "token": token, "expiresIn": expires_in });
    (200, body.to_string())
}

/// JSON body for a token validity report.
pub fn details_body(valid: bool) -> (u16, String) {
    let body = serde_json::json!({ "validToken": valid });
    (200, body.to_string())
}

/// Parse a stored record file as raw JSON.
pub fn read_record(path: &Path) -> anyhow::Result<serde_json::Value> {
    Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
}

/// Rewrite a stored record in place so it reads as expired.
pub fn expire_record(path: &Path) -> anyhow::Result<()> {
    let mut value = read_record(path)?;
    let Some(object) = value.as_object_mut() else {
        anyhow::bail!("record at {} is not a JSON object", path.display());
    };
    object.insert(
        "expiration".to_owned(),
        serde_json::Value::String("2001-01-01T00:00:00.000000Z".to_owned()),
    );
    std::fs::write(path, value.to_string())?;
    Ok(())
}

/// Captured result of one `roost` invocation.
pub struct RoostOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// A throwaway data directory plus the flags every invocation shares.
pub struct Roost {
    data_dir: tempfile::TempDir,
    api_base: String,
}

impl Roost {
    pub fn new(api_base: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self { data_dir: tempfile::tempdir()?, api_base: api_base.into() })
    }

    /// Path of the JSON file backing `slot`.
    pub fn record_path(&self, slot: Slot) -> PathBuf {
        self.data_dir.path().join(slot.file_name())
    }

    /// Run the binary with the shared flags plus `args`, capturing output.
    pub async fn run(&self, args: &[&str]) -> anyhow::Result<RoostOutput> {
        let binary = roost_binary();
        anyhow::ensure!(binary.exists(), "roost binary not found at {}", binary.display());

        let output = tokio::process::Command::new(&binary)
            .arg("--data-dir")
            .arg(self.data_dir.path())
            .arg("--api-base")
            .arg(&self.api_base)
            .arg("--log-level")
            .arg("warn")
            .args(args)
            .output()
            .await?;

        Ok(RoostOutput {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8(output.stdout)?,
            stderr: String::from_utf8(output.stderr)?,
        })
    }
}
