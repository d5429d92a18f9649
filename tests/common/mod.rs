use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("no free port available")?;

        // Override with TENANCY_API_BIN when testing a release build or a
        // binary living outside the workspace target dir
        let binary = std::env::var("TENANCY_API_BIN")
            .unwrap_or_else(|_| "target/debug/tenancy-api".to_string());

        let child = Command::new(&binary)
            .env("API_PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("failed to spawn server binary '{}'", binary))?;

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}", port),
            child,
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;

        while Instant::now() < deadline {
            // /health is allow-listed: an answer here proves the server is up
            // and that the tenant middleware is letting infrastructure paths
            // through without an identifier
            if let Ok(resp) = client
                .get(format!("{}/health", self.base_url))
                .send()
                .await
            {
                match resp.status() {
                    StatusCode::OK | StatusCode::SERVICE_UNAVAILABLE => return Ok(()),
                    other => anyhow::bail!("unexpected readiness status {}", other),
                }
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        anyhow::bail!(
            "server on {} did not become ready within {:?}",
            self.base_url,
            timeout
        )
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Client that sends every request on behalf of `tenant`, so individual
/// tests don't repeat the header plumbing.
pub fn tenant_client(tenant: &str) -> reqwest::Client {
    let mut headers = HeaderMap::new();
    headers.insert(
        "x-tenant-id",
        HeaderValue::from_str(tenant).expect("tenant identifiers are valid header values"),
    );
    reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .expect("reqwest client")
}
