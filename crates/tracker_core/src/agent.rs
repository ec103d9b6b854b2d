//! Page-agent control: `Idle -> Tracking -> {Saved | Error} -> Idle`.
//!
//! The state machine is pure. The host applies the returned effects (inject the
//! control, scrape, send the save request, show toasts, arm the reset timer) and
//! feeds results back in as messages.
use std::time::Duration;

use crate::{JobData, JobRecord, Request, Response};

pub const LABEL_IDLE: &str = "📝 Track Job";
pub const LABEL_TRACKING: &str = "⏳ Tracking...";
pub const LABEL_SAVED: &str = "✅ Saved!";
pub const LABEL_ERROR: &str = "❌ Error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlState {
    #[default]
    Idle,
    Tracking,
    Saved,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// Cosmetic delays; they never gate the save itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentTimings {
    pub reset_delay: Duration,
    pub toast_delay: Duration,
}

impl Default for AgentTimings {
    fn default() -> Self {
        Self {
            reset_delay: Duration::from_millis(3000),
            toast_delay: Duration::from_millis(3000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentMsg {
    /// Page finished loading; `supported` is the site allow-list verdict.
    PageLoaded { supported: bool },
    /// User activated the floating control.
    TrackClicked,
    /// Scrape finished, or failed with a message.
    Scraped(Result<JobRecord, String>),
    /// Sync service replied to the save request.
    SaveResponse(Response),
    /// Reset timer fired.
    ResetElapsed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentEffect {
    InjectControl {
        label: &'static str,
    },
    SetControl {
        label: &'static str,
        enabled: bool,
    },
    ScrapeJob,
    SendMessage(Request),
    ShowToast {
        kind: ToastKind,
        text: String,
        dismiss_after: Duration,
    },
    ScheduleReset {
        after: Duration,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AgentState {
    injected: bool,
    control: ControlState,
    enabled: bool,
    pending: Option<JobRecord>,
    timings: AgentTimings,
}

impl AgentState {
    pub fn new(timings: AgentTimings) -> Self {
        Self {
            timings,
            ..Self::default()
        }
    }

    pub fn control(&self) -> ControlState {
        self.control
    }

    pub fn is_injected(&self) -> bool {
        self.injected
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn label(&self) -> &'static str {
        match self.control {
            ControlState::Idle => LABEL_IDLE,
            ControlState::Tracking => LABEL_TRACKING,
            ControlState::Saved => LABEL_SAVED,
            ControlState::Error => LABEL_ERROR,
        }
    }

    fn toast(&self, kind: ToastKind, text: String) -> AgentEffect {
        AgentEffect::ShowToast {
            kind,
            text,
            dismiss_after: self.timings.toast_delay,
        }
    }

    fn settle(&mut self, outcome: ControlState) -> Option<AgentEffect> {
        if self.control != ControlState::Tracking {
            return None;
        }
        self.control = outcome;
        Some(AgentEffect::SetControl {
            label: self.label(),
            enabled: false,
        })
    }
}

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AgentState, msg: AgentMsg) -> (AgentState, Vec<AgentEffect>) {
    let effects = match msg {
        AgentMsg::PageLoaded { supported } => {
            if !supported || state.injected {
                return (state, Vec::new());
            }
            state.injected = true;
            state.enabled = true;
            state.control = ControlState::Idle;
            vec![AgentEffect::InjectControl { label: LABEL_IDLE }]
        }
        AgentMsg::TrackClicked => {
            // Clicks on a disabled control are dropped.
            if !state.injected || !state.enabled {
                return (state, Vec::new());
            }
            state.control = ControlState::Tracking;
            state.enabled = false;
            vec![
                AgentEffect::SetControl {
                    label: LABEL_TRACKING,
                    enabled: false,
                },
                AgentEffect::ScrapeJob,
                AgentEffect::ScheduleReset {
                    after: state.timings.reset_delay,
                },
            ]
        }
        AgentMsg::Scraped(Ok(record)) => {
            if !state.injected {
                return (state, Vec::new());
            }
            state.pending = Some(record.clone());
            vec![AgentEffect::SendMessage(Request::SaveJobData {
                job_data: JobData::from(record),
            })]
        }
        AgentMsg::Scraped(Err(message)) => {
            let mut effects = vec![state.toast(ToastKind::Error, format!("❌ Error: {message}"))];
            effects.extend(state.settle(ControlState::Error));
            effects
        }
        AgentMsg::SaveResponse(response) => {
            let record = state.pending.take();
            let mut effects = Vec::with_capacity(2);
            if response.success {
                let text = match record {
                    Some(record) => format!("✅ Saved: {} at {}", record.title, record.company),
                    None => "✅ Saved".to_string(),
                };
                effects.push(state.toast(ToastKind::Success, text));
                effects.extend(state.settle(ControlState::Saved));
            } else {
                effects.push(state.toast(ToastKind::Error, "❌ Error saving to sheets".to_string()));
                effects.extend(state.settle(ControlState::Error));
            }
            effects
        }
        AgentMsg::ResetElapsed => {
            if !state.injected {
                return (state, Vec::new());
            }
            state.control = ControlState::Idle;
            state.enabled = true;
            vec![AgentEffect::SetControl {
                label: LABEL_IDLE,
                enabled: true,
            }]
        }
    };

    (state, effects)
}
