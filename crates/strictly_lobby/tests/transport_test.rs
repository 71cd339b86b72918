//! End-to-end tests over TCP, plus the cleanup task.

mod common;

use common::Recorder;
use std::net::SocketAddr;
use std::time::Duration;
use strictly_lobby::{SessionRegistry, serve, spawn_janitor};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(5);

struct Client {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl Client {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.expect("connect");
        let (reader, writer) = stream.into_split();
        Self {
            lines: BufReader::new(reader).lines(),
            writer,
        }
    }

    async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{line}\n").as_bytes())
            .await
            .expect("write");
    }

    async fn recv(&mut self) -> Option<String> {
        timeout(WAIT, self.lines.next_line())
            .await
            .expect("timed out waiting for server")
            .expect("read")
    }

    async fn expect(&mut self, expected: &str) {
        assert_eq!(self.recv().await.as_deref(), Some(expected));
    }
}

async fn start(capacity: usize) -> (SocketAddr, SessionRegistry) {
    let registry = SessionRegistry::new(capacity);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(serve(listener, registry.clone()));
    (addr, registry)
}

#[tokio::test]
async fn test_two_clients_play_to_a_win() {
    let (addr, registry) = start(10).await;

    let mut p1 = Client::connect(addr).await;
    p1.expect("SYMBOL:X").await;
    let mut p2 = Client::connect(addr).await;
    p2.expect("SYMBOL:O").await;
    assert_eq!(registry.count_active(), 1);

    for client in [&mut p1, &mut p2] {
        client.expect("BOARD:0,0,0,0,0,0,0,0,0").await;
        client.expect("TURN:X").await;
    }

    p1.send("MOVE:0,0").await;
    for client in [&mut p1, &mut p2] {
        client.expect("BOARD:10,0,0,0,0,0,0,0,0").await;
        client.expect("TURN:O").await;
    }

    p2.send("MOVE:5,5").await;
    p2.expect("ERROR:Invalid cell (5, 5): out of range").await;
    p2.send("HELLO").await;
    p2.expect("ERROR:Unknown command: HELLO").await;

    p2.send("MOVE:1,1").await;
    drain_board(&mut p1, &mut p2).await;
    p1.send("MOVE:0,1").await;
    drain_board(&mut p1, &mut p2).await;
    p2.send("MOVE:2,2").await;
    drain_board(&mut p1, &mut p2).await;

    p1.send("MOVE:0,2").await;
    p1.expect("WINNER:X").await;
    p2.expect("WINNER:X").await;

    p2.send("MOVE:2,0").await;
    p2.expect("ERROR:Game is over").await;

    p1.send("RESTART").await;
    for client in [&mut p1, &mut p2] {
        client.expect("BOARD:0,0,0,0,0,0,0,0,0").await;
        client.expect("TURN:X").await;
    }
}

/// Consumes the board and turn lines both clients get after a move.
async fn drain_board(p1: &mut Client, p2: &mut Client) {
    for client in [p1, p2] {
        assert!(client.recv().await.expect("board").starts_with("BOARD:"));
        assert!(client.recv().await.expect("turn").starts_with("TURN:"));
    }
}

#[tokio::test]
async fn test_disconnect_notifies_opponent_and_frees_seat() {
    let (addr, registry) = start(10).await;

    let mut p1 = Client::connect(addr).await;
    p1.expect("SYMBOL:X").await;
    let mut p2 = Client::connect(addr).await;
    p2.expect("SYMBOL:O").await;
    drain_board(&mut p1, &mut p2).await;

    p1.send("QUIT").await;
    assert_eq!(p1.recv().await, None);
    p2.expect("ERROR:Opponent disconnected").await;

    let mut p3 = Client::connect(addr).await;
    p3.expect("SYMBOL:X").await;
    assert_eq!(registry.count_active(), 1);
    p3.expect("BOARD:0,0,0,0,0,0,0,0,0").await;
    p2.expect("BOARD:0,0,0,0,0,0,0,0,0").await;
}

#[tokio::test]
async fn test_restart_refused_without_opponent() {
    let (addr, _registry) = start(10).await;

    let mut p1 = Client::connect(addr).await;
    p1.expect("SYMBOL:X").await;
    p1.send("RESTART").await;
    p1.expect("ERROR:Restart needs two connected players").await;
    p1.send("MOVE:0,0").await;
    p1.expect("ERROR:Waiting for opponent").await;
}

#[tokio::test]
async fn test_capacity_rejection_closes_connection() {
    let (addr, registry) = start(1).await;

    let mut p1 = Client::connect(addr).await;
    p1.expect("SYMBOL:X").await;
    let mut p2 = Client::connect(addr).await;
    p2.expect("SYMBOL:O").await;

    let mut p3 = Client::connect(addr).await;
    p3.expect("ERROR:Server is at capacity (1 sessions)").await;
    assert_eq!(p3.recv().await, None);
    assert_eq!(registry.count_active(), 1);
}

#[tokio::test]
async fn test_janitor_removes_abandoned_sessions() {
    let registry = SessionRegistry::new(10);
    let (stays, leaves) = (Recorder::new(), Recorder::new());
    let kept = registry.add_participant(&stays.handle()).expect("join");
    registry.add_participant(&Recorder::new().handle()).expect("join");
    let abandoned = registry.add_participant(&leaves.handle()).expect("join");
    abandoned.leave(leaves.handle().id());

    let janitor = spawn_janitor(registry.clone(), Duration::from_millis(20));
    timeout(WAIT, async {
        while registry.count_active() > 1 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("janitor never swept");
    janitor.abort();

    assert!(registry.session(kept.id()).is_some());
    assert!(registry.session(abandoned.id()).is_none());
}
