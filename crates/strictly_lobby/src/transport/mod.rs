//! Line-based TCP transport.
//!
//! Each connection becomes a [`Participant`]. Outgoing notifications go
//! through an unbounded channel to a writer task, so sessions never wait on
//! the network while holding their lock.

mod command;

pub use command::{ClientCommand, CommandError};

use crate::participant::{Notification, Participant, ParticipantId};
use crate::registry::SessionRegistry;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use strictly_tictactoe::Mark;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// A connected client.
#[derive(Debug)]
pub struct Connection {
    id: ParticipantId,
    peer: SocketAddr,
    outbox: mpsc::UnboundedSender<String>,
    connected: AtomicBool,
    mark: Mutex<Option<Mark>>,
}

impl Connection {
    /// Wraps the sending half of a connection's outbox.
    pub fn new(peer: SocketAddr, outbox: mpsc::UnboundedSender<String>) -> Self {
        Self {
            id: ParticipantId::next(),
            peer,
            outbox,
            connected: AtomicBool::new(true),
            mark: Mutex::new(None),
        }
    }

    /// Remote address.
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Mark assigned by the session, if seated.
    pub fn mark(&self) -> Option<Mark> {
        *self.mark.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Marks the connection as gone; later notifications are skipped.
    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::Release);
    }
}

impl Participant for Connection {
    fn id(&self) -> ParticipantId {
        self.id
    }

    fn notify(&self, notification: Notification) {
        if self.outbox.send(notification.to_string()).is_err() {
            debug!(participant = %self.id, "Dropped notification for closed connection");
        }
    }

    fn is_reachable(&self) -> bool {
        self.connected.load(Ordering::Acquire) && !self.outbox.is_closed()
    }

    fn assign_mark(&self, mark: Mark) {
        *self.mark.lock().unwrap_or_else(PoisonError::into_inner) = Some(mark);
    }
}

/// Accepts connections forever, one task per client.
pub async fn serve(listener: TcpListener, registry: SessionRegistry) -> anyhow::Result<()> {
    info!(addr = %listener.local_addr()?, "Accepting connections");
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!(error = %e, "Accept failed");
                continue;
            }
        };
        let registry = registry.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer, registry).await {
                warn!(%peer, error = %e, "Connection ended with error");
            }
        });
    }
}

/// Runs one client from matchmaking to disconnect.
///
/// The client is matched on connect, then each request line is routed to
/// its session. EOF, a read error or `QUIT` vacates the seat.
#[instrument(skip(stream, registry))]
pub async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    registry: SessionRegistry,
) -> anyhow::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let connection = Arc::new(Connection::new(peer, tx));
    let participant: Arc<dyn Participant> = connection.clone();
    info!(participant = %connection.id, "Client connected");

    let writer_task = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            if writer.write_all(line.as_bytes()).await.is_err()
                || writer.write_all(b"\n").await.is_err()
            {
                break;
            }
        }
        let _ = writer.shutdown().await;
    });

    let session = match registry.add_participant(&participant) {
        Ok(session) => session,
        Err(err) => {
            info!(error = %err, "Matchmaking failed, closing connection");
            connection.disconnect();
            drop(participant);
            drop(connection);
            writer_task.await?;
            return Ok(());
        }
    };

    let mut lines = BufReader::new(reader).lines();
    let result = loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break Ok(()),
            Err(e) => break Err(e),
        };
        match line.parse::<ClientCommand>() {
            Ok(ClientCommand::Move { row, col }) => {
                if let Err(err) = session.make_move(connection.id, row, col) {
                    debug!(mark = ?connection.mark(), error = %err, "Move rejected");
                }
            }
            Ok(ClientCommand::Restart) => {
                if !session.restart() {
                    connection.notify(Notification::Error(
                        "Restart needs two connected players".to_string(),
                    ));
                }
            }
            Ok(ClientCommand::Quit) => break Ok(()),
            Err(err) => connection.notify(Notification::Error(err.to_string())),
        }
    };

    connection.disconnect();
    session.leave(connection.id);
    info!(participant = %connection.id, session_id = %session.id(), "Client disconnected");

    drop(participant);
    drop(connection);
    writer_task.await?;
    Ok(result?)
}
