//! Session actor: a task that owns one [`FocusSession`] and drains a private
//! mailbox, so inputs from several producers are serialized onto one owner.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use focusguard_common::config::EngineConfig;
use focusguard_common::error::FocusResult;
use focusguard_session_model::input::SessionInput;
use focusguard_session_model::summary::SessionSummary;

use crate::replay::{ReplayFeed, ReplayOptions, ReplayStats};
use crate::session::{FocusSession, SessionSnapshot};
use crate::sink::EventSink;

/// Mailbox capacity used by [`SessionActor::spawn_default`].
pub const DEFAULT_MAILBOX_CAPACITY: usize = 256;

#[derive(Debug, thiserror::Error)]
pub enum ActorError {
    #[error("Session actor has stopped")]
    Closed,

    #[error("Session actor task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Messages accepted by a running session actor.
#[derive(Debug)]
pub enum SessionCommand {
    Input(SessionInput),
    Snapshot(oneshot::Sender<SessionSnapshot>),
    Stop(oneshot::Sender<SessionSummary>),
}

/// The task side of a session actor.
pub struct SessionActor<S> {
    session: FocusSession,
    sink: S,
    mailbox: mpsc::Receiver<SessionCommand>,
}

impl<S: EventSink + Send + 'static> SessionActor<S> {
    /// Start a session and spawn its actor on the current tokio runtime.
    ///
    /// Fails before spawning anything if `config` is invalid.
    pub fn spawn(config: EngineConfig, sink: S, capacity: usize) -> FocusResult<SessionHandle> {
        let session = FocusSession::start(config)?;
        let (tx, mailbox) = mpsc::channel(capacity.max(1));
        let actor = Self {
            session,
            sink,
            mailbox,
        };
        let task = tokio::spawn(actor.run());
        Ok(SessionHandle { tx, task })
    }

    pub fn spawn_default(config: EngineConfig, sink: S) -> FocusResult<SessionHandle> {
        Self::spawn(config, sink, DEFAULT_MAILBOX_CAPACITY)
    }

    async fn run(mut self) -> Option<SessionSummary> {
        while let Some(command) = self.mailbox.recv().await {
            match command {
                SessionCommand::Input(input) => {
                    self.session.process(&input, &mut self.sink);
                }
                SessionCommand::Snapshot(reply) => {
                    let _ = reply.send(self.session.snapshot());
                }
                SessionCommand::Stop(reply) => {
                    let summary = self.session.stop();
                    if let Err(summary) = reply.send(summary) {
                        return Some(summary);
                    }
                    return None;
                }
            }
        }

        // every handle dropped without a stop
        tracing::debug!("Session mailbox closed, stopping session");
        Some(self.session.stop())
    }
}

/// Producer side of a session actor.
pub struct SessionHandle {
    tx: mpsc::Sender<SessionCommand>,
    task: JoinHandle<Option<SessionSummary>>,
}

impl SessionHandle {
    /// Queue one input, waiting for mailbox space if it is full.
    pub async fn send(&self, input: SessionInput) -> Result<(), ActorError> {
        self.tx
            .send(SessionCommand::Input(input))
            .await
            .map_err(|_| ActorError::Closed)
    }

    /// Queue a whole recording, with synthesized ticks ahead of each input
    /// when `options` asks for them.
    pub async fn replay<I>(
        &self,
        inputs: I,
        options: ReplayOptions,
    ) -> Result<ReplayStats, ActorError>
    where
        I: IntoIterator<Item = SessionInput>,
    {
        let mut feed = ReplayFeed::new(options);
        for input in inputs {
            for tick in feed.ticks_before(&input) {
                self.send(tick).await?;
            }
            self.send(input).await?;
        }
        Ok(feed.finish())
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot, ActorError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(SessionCommand::Snapshot(reply))
            .await
            .map_err(|_| ActorError::Closed)?;
        rx.await.map_err(|_| ActorError::Closed)
    }

    /// Stop the session after every input already queued, and wait for the
    /// actor task to finish.
    pub async fn stop(self) -> Result<SessionSummary, ActorError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(SessionCommand::Stop(reply))
            .await
            .map_err(|_| ActorError::Closed)?;
        let summary = rx.await.map_err(|_| ActorError::Closed)?;
        self.task.await?;
        Ok(summary)
    }
}
