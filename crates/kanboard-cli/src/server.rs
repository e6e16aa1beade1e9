//! WebSocket API server
//!
//! Each text frame carries one JSON request and gets exactly one JSON reply
//! (see `kanboard_core::api` for both shapes). All connections share a single
//! `Service` behind a mutex, so requests are applied one at a time and a read
//! always sees every write that finished before it.
//! Requests run on tokio's blocking pool because each write ends in an fsync.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use kanboard_core::{Response, Service};

type SharedService = Arc<Mutex<Service>>;

/// Bind `addr` and serve until Ctrl-C
pub async fn serve(service: Service, addr: &str) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    let local = listener.local_addr()?;
    info!("Listening on ws://{}", local);

    let service = Arc::new(Mutex::new(service));

    tokio::select! {
        result = accept_loop(listener, service) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down");
            Ok(())
        }
    }
}

/// Accept connections forever, one task per peer
pub async fn accept_loop(listener: TcpListener, service: SharedService) -> Result<()> {
    loop {
        let (stream, peer) = listener
            .accept()
            .await
            .context("Failed to accept connection")?;

        let service = Arc::clone(&service);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer, service).await {
                warn!("Connection {} ended with error: {}", peer, e);
            }
        });
    }
}

async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    service: SharedService,
) -> Result<()> {
    let ws_stream = accept_async(stream)
        .await
        .context("WebSocket handshake failed")?;
    debug!("Peer connected: {}", peer);

    let (mut write, mut read) = ws_stream.split();

    while let Some(msg) = read.next().await {
        let msg = msg.context("Failed to read frame")?;

        let reply = match msg {
            Message::Text(text) => dispatch(&service, &text).await,
            Message::Binary(bytes) => match String::from_utf8(bytes) {
                Ok(text) => dispatch(&service, &text).await,
                Err(_) => Response::error("BAD_REQUEST", "Binary frames must be UTF-8 JSON"),
            },
            Message::Ping(payload) => {
                write.send(Message::Pong(payload)).await?;
                continue;
            }
            Message::Close(_) => break,
            _ => continue,
        };

        write
            .send(Message::Text(reply.to_json()))
            .await
            .context("Failed to send reply")?;
    }

    debug!("Peer disconnected: {}", peer);
    Ok(())
}

/// Run one request on the blocking pool; a mutation ends in an fsync
async fn dispatch(service: &SharedService, text: &str) -> Response {
    let service = Arc::clone(service);
    let text = text.to_owned();

    tokio::task::spawn_blocking(move || service.blocking_lock().handle_json(&text))
        .await
        .unwrap_or_else(|e| {
            warn!("Request task failed: {}", e);
            Response::error("INTERNAL_SERVER_ERROR", "Request could not be completed")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kanboard_core::Config;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

    async fn start(temp_dir: &TempDir) -> SocketAddr {
        let service = Service::open(Config::with_data_dir(temp_dir.path())).unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(accept_loop(listener, Arc::new(Mutex::new(service))));
        addr
    }

    type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

    async fn roundtrip(ws: &mut Client, request: Value) -> Value {
        ws.send(Message::Text(request.to_string())).await.unwrap();
        loop {
            match ws.next().await.unwrap().unwrap() {
                Message::Text(text) => return serde_json::from_str(&text).unwrap(),
                _ => continue,
            }
        }
    }

    #[tokio::test]
    async fn test_requests_over_websocket() {
        let temp_dir = TempDir::new().unwrap();
        let addr = start(&temp_dir).await;
        let (mut ws, _) = connect_async(format!("ws://{}", addr)).await.unwrap();

        let login = roundtrip(
            &mut ws,
            json!({"operation": "login", "args": {"username": "sid", "password": "123"}}),
        )
        .await;
        assert_eq!(login["status"], "success");
        assert_eq!(login["data"]["username"], "sid");

        let board = roundtrip(
            &mut ws,
            json!({"operation": "createBoard", "args": {"name": "Sprint 1", "userId": "u1"}}),
        )
        .await;
        let board_id = board["data"]["id"].as_str().unwrap().to_string();

        let list = roundtrip(
            &mut ws,
            json!({"operation": "createList", "args": {"name": "Todo", "boardId": board_id}}),
        )
        .await;
        assert_eq!(list["message"], "List created");

        let lists = roundtrip(
            &mut ws,
            json!({"operation": "lists", "args": {"boardId": board_id}}),
        )
        .await;
        assert_eq!(lists["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_clients_see_each_other() {
        let temp_dir = TempDir::new().unwrap();
        let addr = start(&temp_dir).await;
        let (mut writer, _) = connect_async(format!("ws://{}", addr)).await.unwrap();
        let (mut reader, _) = connect_async(format!("ws://{}", addr)).await.unwrap();

        for name in ["A", "B", "C"] {
            let created = roundtrip(
                &mut writer,
                json!({"operation": "createBoard", "args": {"name": name, "userId": "u1"}}),
            )
            .await;
            assert_eq!(created["status"], "success");
        }

        let boards = roundtrip(
            &mut reader,
            json!({"operation": "boards", "args": {"userId": "u1"}}),
        )
        .await;
        let names: Vec<&str> = boards["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_errors_keep_connection_open() {
        let temp_dir = TempDir::new().unwrap();
        let addr = start(&temp_dir).await;
        let (mut ws, _) = connect_async(format!("ws://{}", addr)).await.unwrap();

        ws.send(Message::Text("not json".to_string())).await.unwrap();
        let reply = match ws.next().await.unwrap().unwrap() {
            Message::Text(text) => serde_json::from_str::<Value>(&text).unwrap(),
            other => panic!("unexpected frame: {:?}", other),
        };
        assert_eq!(reply["code"], "BAD_REQUEST");

        let missing = roundtrip(
            &mut ws,
            json!({"operation": "createList", "args": {"name": "Todo", "boardId": "nope"}}),
        )
        .await;
        assert_eq!(missing["status"], "error");
        assert_eq!(missing["code"], "NOT_FOUND");
    }
}
