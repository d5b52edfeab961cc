use std::future;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tracing::{debug, info, trace};

use quiz_core::model::{OptionIndex, SessionId, SessionPhase};
use quiz_core::{Action, Outcome, QuizSession, Rejection, Summary};

use crate::error::SessionError;

type Job = Box<dyn FnOnce(&mut QuizSession) + Send>;

const COMMAND_BUFFER: usize = 32;
const MIN_TICK_PERIOD: Duration = Duration::from_millis(1);

/// Handle to a session owned by a background task.
///
/// The task applies commands one at a time and ticks the session once per
/// `tick_period` while it is running. It stops when every handle is dropped.
#[derive(Clone, Debug)]
pub struct SessionDriver {
    id: SessionId,
    commands: mpsc::Sender<Job>,
}

impl SessionDriver {
    /// Spawn the driver task on the current tokio runtime.
    #[must_use]
    pub fn spawn(session: QuizSession, tick_period: Duration) -> Self {
        let (commands, rx) = mpsc::channel(COMMAND_BUFFER);
        let id = session.id();
        tokio::spawn(run(session, rx, tick_period.max(MIN_TICK_PERIOD)));
        Self { id, commands }
    }

    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.id
    }

    /// Run `f` against the session inside the driver task.
    ///
    /// # Errors
    ///
    /// `SessionError::DriverClosed` if the task is gone.
    pub async fn with_session<R, F>(&self, f: F) -> Result<R, SessionError>
    where
        F: FnOnce(&mut QuizSession) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (reply, response) = oneshot::channel();
        let job: Job = Box::new(move |session| {
            let _ = reply.send(f(session));
        });
        self.commands
            .send(job)
            .await
            .map_err(|_| SessionError::DriverClosed)?;
        response.await.map_err(|_| SessionError::DriverClosed)
    }

    /// # Errors
    ///
    /// `SessionError::Rejected` if the session refuses the action.
    pub async fn apply(&self, action: Action) -> Result<Outcome, SessionError> {
        self.transition(action.name(), move |session| session.apply(action))
            .await
    }

    /// # Errors
    ///
    /// As [`SessionDriver::apply`].
    pub async fn start(&self) -> Result<(), SessionError> {
        self.transition("start", QuizSession::start).await
    }

    /// # Errors
    ///
    /// As [`SessionDriver::apply`].
    pub async fn select_answer(
        &self,
        question: usize,
        option: OptionIndex,
    ) -> Result<(), SessionError> {
        self.transition("select-answer", move |session| {
            session.select_answer(question, option)
        })
        .await
    }

    /// # Errors
    ///
    /// As [`SessionDriver::apply`].
    pub async fn navigate(&self, target: i64) -> Result<usize, SessionError> {
        self.transition("navigate", move |session| session.navigate(target))
            .await
    }

    /// # Errors
    ///
    /// As [`SessionDriver::apply`].
    pub async fn previous(&self) -> Result<usize, SessionError> {
        self.transition("previous", QuizSession::previous).await
    }

    /// # Errors
    ///
    /// As [`SessionDriver::apply`].
    pub async fn save_and_next(&self) -> Result<usize, SessionError> {
        self.transition("save-and-next", QuizSession::save_and_next)
            .await
    }

    /// # Errors
    ///
    /// As [`SessionDriver::apply`].
    pub async fn skip(&self) -> Result<usize, SessionError> {
        self.transition("skip", QuizSession::skip).await
    }

    /// # Errors
    ///
    /// As [`SessionDriver::apply`].
    pub async fn submit(&self) -> Result<Summary, SessionError> {
        self.transition("submit", |session| session.submit().cloned())
            .await
    }

    /// # Errors
    ///
    /// `SessionError::DriverClosed` if the task is gone.
    pub async fn reset(&self) -> Result<(), SessionError> {
        self.with_session(QuizSession::reset).await
    }

    /// Copy of the current session state.
    ///
    /// # Errors
    ///
    /// `SessionError::DriverClosed` if the task is gone.
    pub async fn snapshot(&self) -> Result<QuizSession, SessionError> {
        self.with_session(|session| session.clone()).await
    }

    async fn transition<T, F>(&self, name: &'static str, f: F) -> Result<T, SessionError>
    where
        F: FnOnce(&mut QuizSession) -> Result<T, Rejection> + Send + 'static,
        T: Send + 'static,
    {
        let result = self.with_session(f).await?;
        if let Err(rejection) = &result {
            debug!(session = %self.id, action = name, %rejection, "action rejected");
        }
        Ok(result?)
    }
}

async fn run(mut session: QuizSession, mut commands: mpsc::Receiver<Job>, tick_period: Duration) {
    let id = session.id();
    let mut ticker: Option<Interval> = None;
    debug!(session = %id, "session driver started");

    loop {
        sync_ticker(session.phase(), &mut ticker, tick_period);

        tokio::select! {
            job = commands.recv() => {
                let Some(job) = job else { break };
                let before = session.phase();
                job(&mut session);
                let after = session.phase();
                if before != after {
                    info!(session = %id, from = %before, to = %after, "session phase changed");
                }
            }
            () = next_tick(&mut ticker) => {
                if session.tick() {
                    trace!(
                        session = %id,
                        question = session.current_index(),
                        elapsed = session.elapsed_secs(),
                        "tick"
                    );
                }
            }
        }
    }

    debug!(session = %id, "session driver stopped");
}

/// Keep an interval only while the session is running.
fn sync_ticker(phase: SessionPhase, ticker: &mut Option<Interval>, period: Duration) {
    match (phase, ticker.is_some()) {
        (SessionPhase::Running, false) => {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            *ticker = Some(interval);
        }
        (SessionPhase::Running, true) => {}
        (_, _) => *ticker = None,
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => future::pending().await,
    }
}
