//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use phase_staking::blockchain::types::BlockchainResult;
use phase_staking::blockchain::ChainRpc;
use solana_sdk::hash::Hash;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::{Transaction, TransactionError};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

/// A request seen by the mock API.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Handle to a running mock API.
#[derive(Clone)]
pub struct MockApi {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockApi {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests().iter().filter(|r| r.path == path).count()
    }
}

/// Start a programmable mock API on an ephemeral port.
///
/// `route` maps (method, path, body) to (status, JSON body).
pub async fn start_mock_api<F>(route: F) -> MockApi
where
    F: Fn(&str, &str, &str) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let route = Arc::new(route);

    let recorded = requests.clone();
    tokio::spawn(async move {
        loop {
            let Ok((socket, _)) = listener.accept().await else {
                break;
            };
            let route = route.clone();
            let recorded = recorded.clone();
            tokio::spawn(async move {
                let (read_half, mut write_half) = socket.into_split();
                let mut reader = BufReader::new(read_half);

                let mut request_line = String::new();
                if reader.read_line(&mut request_line).await.unwrap_or(0) == 0 {
                    return;
                }
                let mut parts = request_line.split_whitespace();
                let method = parts.next().unwrap_or_default().to_string();
                let path = parts.next().unwrap_or_default().to_string();

                let mut headers = Vec::new();
                let mut content_length = 0usize;
                loop {
                    let mut line = String::new();
                    if reader.read_line(&mut line).await.unwrap_or(0) == 0 {
                        break;
                    }
                    let line = line.trim_end();
                    if line.is_empty() {
                        break;
                    }
                    if let Some((name, value)) = line.split_once(':') {
                        let (name, value) = (name.trim().to_string(), value.trim().to_string());
                        if name.eq_ignore_ascii_case("content-length") {
                            content_length = value.parse().unwrap_or(0);
                        }
                        headers.push((name, value));
                    }
                }

                let mut body = vec![0u8; content_length];
                if content_length > 0 && reader.read_exact(&mut body).await.is_err() {
                    return;
                }
                let body = String::from_utf8_lossy(&body).to_string();

                let (status, response) = route(&method, &path, &body);
                recorded.lock().unwrap().push(RecordedRequest {
                    method,
                    path,
                    headers,
                    body,
                });

                let status_text = match status {
                    200 => "200 OK",
                    400 => "400 Bad Request",
                    401 => "401 Unauthorized",
                    404 => "404 Not Found",
                    429 => "429 Too Many Requests",
                    500 => "500 Internal Server Error",
                    503 => "503 Service Unavailable",
                    _ => "200 OK",
                };
                let response_str = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_text,
                    response.len(),
                    response
                );
                let _ = write_half.write_all(response_str.as_bytes()).await;
                let _ = write_half.shutdown().await;
            });
        }
    });

    MockApi { addr, requests }
}

/// Start a server that answers every request with a 400 whose body is shorter
/// than its advertised `Content-Length`, then closes the connection.
pub async fn start_truncating_api() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((socket, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let (read_half, mut write_half) = socket.into_split();
                let mut reader = BufReader::new(read_half);

                let mut content_length = 0usize;
                loop {
                    let mut line = String::new();
                    if reader.read_line(&mut line).await.unwrap_or(0) == 0 {
                        return;
                    }
                    let line = line.trim_end();
                    if line.is_empty() {
                        break;
                    }
                    if let Some((name, value)) = line.split_once(':') {
                        if name.trim().eq_ignore_ascii_case("content-length") {
                            content_length = value.trim().parse().unwrap_or(0);
                        }
                    }
                }
                let mut body = vec![0u8; content_length];
                if content_length > 0 && reader.read_exact(&mut body).await.is_err() {
                    return;
                }

                let partial = r#"{"success":false,"error":{"mess"#;
                let response = format!(
                    "HTTP/1.1 400 Bad Request\r\nContent-Type: application/json\r\nContent-Length: 512\r\nConnection: close\r\n\r\n{}",
                    partial
                );
                let _ = write_half.write_all(response.as_bytes()).await;
                let _ = write_half.shutdown().await;
            });
        }
    });

    addr
}

pub const HEALTHY: &str =
    r#"{"success":true,"data":{"status":"healthy","checks":{"solana":{"latency":12}}}}"#;

/// An unsigned transaction whose fee payer is `agent`.
pub fn unsigned_stake_transaction(agent: &Pubkey) -> Transaction {
    let ix = Instruction::new_with_bytes(
        Pubkey::new_unique(),
        &[2, 0, 0, 0],
        vec![
            AccountMeta::new(*agent, true),
            AccountMeta::new(Pubkey::new_unique(), false),
        ],
    );
    let mut tx = Transaction::new_with_payer(&[ix], Some(agent));
    tx.message.recent_blockhash = Hash::new_unique();
    tx
}

/// JSON body of a successful `/stake/build` response for `tx`.
pub fn build_response(tx: &Transaction) -> String {
    let serialized = general_purpose::STANDARD.encode(bincode::serialize(tx).unwrap());
    serde_json::json!({
        "success": true,
        "data": {
            "transaction": { "serialized": serialized },
            "metadata": {
                "stakeAccount": "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin",
                "validator": "8p1VGE8YZYfYAJaJ9UfZLFjR5jhJhzjzKvVv5HYjLXhm",
                "estimatedApy": 7.1,
                "fees": { "transactionFee": 5000, "rakeFee": 2500000 }
            }
        }
    })
    .to_string()
}

/// In-memory chain that counts calls and keeps submitted transactions.
pub struct MockChain {
    pub balance_lamports: u64,
    pub status: Option<Result<(), TransactionError>>,
    pub balance_calls: AtomicUsize,
    pub send_calls: AtomicUsize,
    pub status_calls: AtomicUsize,
    pub sent: Mutex<Vec<Transaction>>,
}

impl MockChain {
    pub fn with_balance(balance_lamports: u64) -> Self {
        Self {
            balance_lamports,
            status: Some(Ok(())),
            balance_calls: AtomicUsize::new(0),
            send_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sends(&self) -> usize {
        self.send_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainRpc for MockChain {
    async fn get_balance(&self, _pubkey: &Pubkey) -> BlockchainResult<u64> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.balance_lamports)
    }

    async fn send_transaction(&self, transaction: &Transaction) -> BlockchainResult<Signature> {
        self.send_calls.fetch_add(1, Ordering::SeqCst);
        self.sent.lock().unwrap().push(transaction.clone());
        Ok(transaction.signatures[0])
    }

    async fn get_signature_status(
        &self,
        _signature: &Signature,
    ) -> BlockchainResult<Option<Result<(), TransactionError>>> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.status.clone())
    }
}
