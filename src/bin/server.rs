//! HTTP front end for the inventory dashboard
//! Serves the JSON routes of `inventory_dashboard::api` over raw tokio sockets

use inventory_dashboard::api::{route, ApiResponse};
use inventory_dashboard::config::DashboardConfig;
use inventory_dashboard::observability::init_tracing;
use inventory_dashboard::Dashboard;
use std::io;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{timeout, Duration};
use tracing::{debug, error, info, warn};

/// Largest request accepted, headers and body together
const MAX_REQUEST_BYTES: usize = 64 * 1024;

/// Time a client gets to deliver its whole request
const READ_TIMEOUT: Duration = Duration::from_secs(5);

type SharedDashboard = Arc<Mutex<Dashboard>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let config = DashboardConfig::from_env()?;
    info!("Dataset: {}", config.data_path.display());

    let bind_addr = config.bind_addr.clone();
    let mut dashboard = Dashboard::new(config);

    // Load eagerly so a broken dataset is reported at startup; requests
    // retry through the cache if this fails.
    if let Err(e) = dashboard.table() {
        warn!("Dataset not loaded at startup: {}", e);
    }

    let shared: SharedDashboard = Arc::new(Mutex::new(dashboard));

    let listener = TcpListener::bind(&bind_addr).await?;
    info!("Server listening on http://{}", bind_addr);

    loop {
        let (stream, addr) = listener.accept().await?;
        debug!("New connection from: {}", addr);
        tokio::spawn(handle_connection(stream, Arc::clone(&shared)));
    }
}

async fn handle_connection(mut stream: TcpStream, dashboard: SharedDashboard) {
    let request = match read_request(&mut stream, READ_TIMEOUT).await {
        Ok(Some(request)) => request,
        Ok(None) => return,
        Err(e) if e.kind() == io::ErrorKind::TimedOut => {
            warn!("Request read timeout");
            let response = ApiResponse::json(408, &serde_json::json!({ "error": "request timeout" }));
            let _ = stream.write_all(response.to_http().as_bytes()).await;
            return;
        }
        Err(e) => {
            error!("Failed to read from stream: {}", e);
            return;
        }
    };

    let response = tokio::task::spawn_blocking(move || handle_request(&request, &dashboard))
        .await
        .unwrap_or_else(|e| {
            error!("Request handler panicked: {}", e);
            ApiResponse::json(500, &serde_json::json!({ "error": "internal error" }))
        });

    if let Err(e) = stream.write_all(response.to_http().as_bytes()).await {
        error!("Failed to write response: {}", e);
    }
}

/// Read one request, giving up with `TimedOut` after `limit`
async fn read_request<S>(stream: &mut S, limit: Duration) -> io::Result<Option<String>>
where
    S: AsyncRead + Unpin,
{
    match timeout(limit, read_until_complete(stream)).await {
        Ok(result) => result,
        Err(_) => Err(io::Error::new(io::ErrorKind::TimedOut, "request read timed out")),
    }
}

/// Read headers, then as much body as `Content-Length` announces
async fn read_until_complete<S>(stream: &mut S) -> io::Result<Option<String>>
where
    S: AsyncRead + Unpin,
{
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let size = stream.read(&mut chunk).await?;
        if size == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..size]);

        if let Some(header_end) = find_header_end(&buffer) {
            let headers = String::from_utf8_lossy(&buffer[..header_end]);
            let expected = header_end
                .saturating_add(4)
                .saturating_add(content_length(&headers));
            if buffer.len() >= expected {
                break;
            }
        }
        if buffer.len() > MAX_REQUEST_BYTES {
            warn!("Request exceeds {} bytes, truncating", MAX_REQUEST_BYTES);
            break;
        }
    }

    if buffer.is_empty() {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&buffer).into_owned()))
}

fn find_header_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(4).position(|w| w == b"\r\n\r\n")
}

fn content_length(headers: &str) -> usize {
    headers
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}

fn handle_request(request: &str, dashboard: &SharedDashboard) -> ApiResponse {
    let request_line = request.lines().next().unwrap_or_default();
    let parts: Vec<&str> = request_line.split_whitespace().collect();
    if parts.len() < 2 {
        return ApiResponse::json(400, &serde_json::json!({ "error": "malformed request line" }));
    }

    let body = request
        .split_once("\r\n\r\n")
        .map(|(_, body)| body)
        .unwrap_or_default();

    let mut dashboard = match dashboard.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    let response = route(&mut dashboard, parts[0], parts[1], body);
    info!("{} {} -> {}", parts[0], parts[1], response.status);
    response
}
