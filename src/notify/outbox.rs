use super::{CheckInNotice, Notifier};
use crate::ui::messages::background_warning;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

/// Fire-and-forget queue in front of a [`Notifier`].
///
/// `publish` never blocks on delivery and never fails; the worker thread
/// drains the queue in order and logs delivery errors to stderr.
pub struct Outbox {
    sender: Option<Sender<CheckInNotice>>,
    done: Option<Receiver<()>>,
}

impl Outbox {
    /// An outbox that drops every notice (no endpoint configured).
    pub fn disabled() -> Self {
        Self {
            sender: None,
            done: None,
        }
    }

    pub fn spawn<N: Notifier>(notifier: N) -> Self {
        let (sender, queue) = mpsc::channel::<CheckInNotice>();
        let (done_tx, done) = mpsc::channel::<()>();

        let worker = thread::Builder::new()
            .name("qrattend-outbox".into())
            .spawn(move || {
                for notice in queue {
                    if let Err(e) = notifier.send(&notice) {
                        background_warning(format!(
                            "Check-in notification for {} not delivered: {e}",
                            notice.name
                        ));
                    }
                }
                let _ = done_tx.send(());
            });

        match worker {
            Ok(_) => Self {
                sender: Some(sender),
                done: Some(done),
            },
            Err(e) => {
                background_warning(format!("Notification worker not started: {e}"));
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.sender.is_some()
    }

    pub fn publish(&self, notice: CheckInNotice) {
        if let Some(sender) = &self.sender
            && sender.send(notice).is_err()
        {
            background_warning("Notification worker stopped; notice dropped");
        }
    }

    /// Close the queue and wait at most `grace` for pending notices.
    /// Returns `true` if the worker finished in time.
    pub fn shutdown(mut self, grace: Duration) -> bool {
        drop(self.sender.take());

        match self.done.take() {
            Some(done) => done.recv_timeout(grace).is_ok(),
            None => true,
        }
    }
}
