//! One-shot HTTP server for exercising the adapters end to end.

use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Canned response served to the first connection.
pub struct CannedResponse {
    /// Status line suffix, e.g. `"200 OK"`.
    pub status: &'static str,
    /// JSON body.
    pub body: String,
}

impl CannedResponse {
    /// `200 OK` with `body`.
    pub fn ok(body: &str) -> Self {
        Self {
            status: "200 OK",
            body: body.to_owned(),
        }
    }
}

/// Serve `canned` once and hand back the raw request text.
///
/// Must be called inside a runtime; the returned task completes after the
/// first request has been answered.
pub async fn serve_once(canned: CannedResponse) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("listener has an address");
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("client should connect");
        let mut buffer = vec![0_u8; 16 * 1024];
        let read = socket.read(&mut buffer).await.expect("request should arrive");
        buffer.truncate(read);
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            canned.status,
            canned.body.len(),
            canned.body
        );
        socket
            .write_all(response.as_bytes())
            .await
            .expect("response should be written");
        String::from_utf8_lossy(&buffer).into_owned()
    });
    (format!("http://{addr}"), handle)
}

/// Address on which nothing is listening.
pub async fn closed_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr: SocketAddr = listener.local_addr().expect("listener has an address");
    drop(listener);
    format!("http://{addr}")
}

/// Current-thread runtime shared by the steps of one scenario.
pub fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime should build")
}
