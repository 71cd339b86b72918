//! Shared test participant.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use strictly_lobby::{Mark, Notification, Participant, ParticipantId};

/// Participant that records everything it is told.
#[derive(Debug)]
pub struct Recorder {
    id: ParticipantId,
    reachable: AtomicBool,
    mark: Mutex<Option<Mark>>,
    inbox: Mutex<Vec<Notification>>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            id: ParticipantId::next(),
            reachable: AtomicBool::new(true),
            mark: Mutex::new(None),
            inbox: Mutex::new(Vec::new()),
        })
    }

    pub fn handle(self: &Arc<Self>) -> Arc<dyn Participant> {
        self.clone()
    }

    pub fn mark(&self) -> Option<Mark> {
        *self.mark.lock().unwrap()
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Drains and returns received notifications.
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.inbox.lock().unwrap())
    }

    pub fn last(&self) -> Option<Notification> {
        self.inbox.lock().unwrap().last().cloned()
    }
}

impl Participant for Recorder {
    fn id(&self) -> ParticipantId {
        self.id
    }

    fn notify(&self, notification: Notification) {
        self.inbox.lock().unwrap().push(notification);
    }

    fn is_reachable(&self) -> bool {
        self.reachable.load(Ordering::SeqCst)
    }

    fn assign_mark(&self, mark: Mark) {
        *self.mark.lock().unwrap() = Some(mark);
    }
}
