use serde::Serialize;
use statig::prelude::*;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Where a petition creation attempt stands, as shown to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Pending,
    Success,
    Error,
}

impl SubmissionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SubmissionStatus::Success | SubmissionStatus::Error)
    }

    /// Call-to-action text for the submit control
    pub fn action_label(&self) -> &'static str {
        match self {
            SubmissionStatus::Idle => "Launch Your Petition",
            SubmissionStatus::Pending => "Creating Petition...",
            SubmissionStatus::Success => "Petition Created!",
            SubmissionStatus::Error => "Failed - Try Again",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SubmissionStatus::Idle => "idle",
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Success => "success",
            SubmissionStatus::Error => "error",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionEvent {
    Submit,
    Confirm,
    Fail { message: String },
    Reset,
}

/// Legal status transitions: idle → pending → {success | error} → idle.
///
/// Events that do not apply to the current state are ignored, so a terminal
/// state can never be reached without passing through pending.
#[derive(Debug, Default)]
pub struct SubmissionMachine {
    status: SubmissionStatus,
    message: Option<String>,
}

#[state_machine(initial = "State::idle()")]
impl SubmissionMachine {
    #[state]
    fn idle(&mut self, event: &SubmissionEvent) -> Outcome<State> {
        match event {
            SubmissionEvent::Submit => {
                self.enter(SubmissionStatus::Pending, None);
                Transition(State::pending())
            }
            _ => Handled,
        }
    }

    #[state]
    fn pending(&mut self, event: &SubmissionEvent) -> Outcome<State> {
        match event {
            SubmissionEvent::Confirm => {
                self.enter(SubmissionStatus::Success, None);
                Transition(State::success())
            }
            SubmissionEvent::Fail { message } => {
                self.enter(SubmissionStatus::Error, Some(message.clone()));
                Transition(State::error())
            }
            _ => Handled,
        }
    }

    #[state]
    fn success(&mut self, event: &SubmissionEvent) -> Outcome<State> {
        match event {
            SubmissionEvent::Reset => {
                self.enter(SubmissionStatus::Idle, None);
                Transition(State::idle())
            }
            _ => Handled,
        }
    }

    #[state]
    fn error(&mut self, event: &SubmissionEvent) -> Outcome<State> {
        match event {
            SubmissionEvent::Reset => {
                self.enter(SubmissionStatus::Idle, None);
                Transition(State::idle())
            }
            _ => Handled,
        }
    }
}

impl SubmissionMachine {
    fn enter(&mut self, status: SubmissionStatus, message: Option<String>) {
        debug!(from = %self.status, to = %status, "Submission status transition");
        self.status = status;
        self.message = message;
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

struct BoardState {
    machine: Mutex<StateMachine<SubmissionMachine>>,
    history: Mutex<Vec<SubmissionStatus>>,
    updates: watch::Sender<SubmissionStatus>,
}

impl BoardState {
    fn apply(&self, event: SubmissionEvent) -> SubmissionStatus {
        let (before, after) = {
            let mut machine = lock(&self.machine);
            let before = machine.inner().status();
            machine.handle(&event);
            (before, machine.inner().status())
        };

        if before != after {
            lock(&self.history).push(after);
            self.updates.send_replace(after);
        }
        after
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Shared status display for one workflow instance.
///
/// Terminal states revert to idle after `reset_after` through a tokio task
/// owned by the board; the task is aborted when a new attempt begins and when
/// the board is dropped.
pub struct StatusBoard {
    state: Arc<BoardState>,
    reset_after: Duration,
    reset_task: Mutex<Option<JoinHandle<()>>>,
}

impl StatusBoard {
    pub fn new(reset_after: Duration) -> Self {
        let (updates, _) = watch::channel(SubmissionStatus::Idle);
        Self {
            state: Arc::new(BoardState {
                machine: Mutex::new(SubmissionMachine::default().state_machine()),
                history: Mutex::new(vec![SubmissionStatus::Idle]),
                updates,
            }),
            reset_after,
            reset_task: Mutex::new(None),
        }
    }

    pub fn status(&self) -> SubmissionStatus {
        lock(&self.state.machine).inner().status()
    }

    /// Error text of the last failed attempt, while it is displayed
    pub fn message(&self) -> Option<String> {
        lock(&self.state.machine).inner().message().map(str::to_string)
    }

    pub fn subscribe(&self) -> watch::Receiver<SubmissionStatus> {
        self.state.updates.subscribe()
    }

    /// Every status the board has shown, starting with the initial idle
    pub fn history(&self) -> Vec<SubmissionStatus> {
        lock(&self.state.history).clone()
    }

    /// Start a new attempt; clears any terminal state still on display.
    pub fn begin(&self) -> SubmissionStatus {
        self.cancel_reset();
        if self.status().is_terminal() {
            self.state.apply(SubmissionEvent::Reset);
        }
        self.state.apply(SubmissionEvent::Submit)
    }

    pub fn succeed(&self) -> SubmissionStatus {
        self.state.apply(SubmissionEvent::Confirm)
    }

    /// Mark the attempt failed and schedule the revert to idle.
    pub fn fail(&self, message: impl Into<String>) -> SubmissionStatus {
        let message = message.into();
        warn!(error = %message, "Petition submission failed");
        let status = self.state.apply(SubmissionEvent::Fail { message });
        self.schedule_reset(self.reset_after);
        status
    }

    pub fn reset_now(&self) -> SubmissionStatus {
        self.cancel_reset();
        self.state.apply(SubmissionEvent::Reset)
    }

    pub fn schedule_reset(&self, delay: Duration) {
        let state = Arc::clone(&self.state);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let status = state.apply(SubmissionEvent::Reset);
            info!(status = %status, "Submission status reset");
        });

        if let Some(previous) = lock(&self.reset_task).replace(handle) {
            previous.abort();
        }
    }

    fn cancel_reset(&self) {
        if let Some(task) = lock(&self.reset_task).take() {
            task.abort();
        }
    }
}

impl Drop for StatusBoard {
    fn drop(&mut self) {
        self.cancel_reset();
    }
}
