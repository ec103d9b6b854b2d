//! Drives the page-agent state machine against a loaded page.
use std::collections::VecDeque;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tracker_core::{
    update, AgentEffect, AgentMsg, AgentState, AgentTimings, Request, Response, ToastKind,
};
use tracker_logging::{tracker_debug, tracker_info};

use crate::{PageSnapshot, SiteRegistry};

/// Channel from the page to the sync service.
pub trait Messenger {
    fn send_message(&self, request: Request) -> Response;
}

impl<F> Messenger for F
where
    F: Fn(Request) -> Response,
{
    fn send_message(&self, request: Request) -> Response {
        self(request)
    }
}

/// Where the agent's visible feedback goes.
pub trait PageSurface {
    fn inject_control(&mut self, label: &str);
    fn set_control(&mut self, label: &str, enabled: bool);
    fn show_toast(&mut self, kind: ToastKind, text: &str, dismiss_after: Duration);
}

pub struct PageAgent<'a> {
    registry: &'a SiteRegistry,
    page: PageSnapshot,
    state: AgentState,
    reset_tx: mpsc::Sender<AgentMsg>,
    reset_rx: mpsc::Receiver<AgentMsg>,
    armed_resets: usize,
}

impl<'a> PageAgent<'a> {
    /// Runs the page-load check. Unsupported pages get no control.
    pub fn load(
        registry: &'a SiteRegistry,
        page: PageSnapshot,
        timings: AgentTimings,
        surface: &mut dyn PageSurface,
    ) -> Self {
        let (reset_tx, reset_rx) = mpsc::channel();
        let supported = registry.is_supported(page.hostname());
        if !supported {
            tracker_info!("{} is not a supported job site", page.hostname());
        }
        let mut agent = Self {
            registry,
            page,
            state: AgentState::new(timings),
            reset_tx,
            reset_rx,
            armed_resets: 0,
        };
        agent.run(AgentMsg::PageLoaded { supported }, None, surface);
        agent
    }

    pub fn state(&self) -> &AgentState {
        &self.state
    }

    /// Handles a click and everything it triggers up to the save reply.
    /// The reset timer keeps running; see [`PageAgent::wait_for_reset`].
    pub fn click(&mut self, messenger: &dyn Messenger, surface: &mut dyn PageSurface) {
        self.run(AgentMsg::TrackClicked, Some(messenger), surface);
    }

    /// Blocks until the next armed reset timer fires and applies it.
    /// Returns `false` if no timer is armed.
    pub fn wait_for_reset(&mut self, surface: &mut dyn PageSurface) -> bool {
        if self.armed_resets == 0 {
            return false;
        }
        match self.reset_rx.recv() {
            Ok(msg) => {
                self.armed_resets -= 1;
                self.run(msg, None, surface);
                true
            }
            Err(_) => false,
        }
    }

    fn run(
        &mut self,
        first: AgentMsg,
        messenger: Option<&dyn Messenger>,
        surface: &mut dyn PageSurface,
    ) {
        let mut inbox = VecDeque::from([first]);
        while let Some(msg) = inbox.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;
            for effect in effects {
                if let Some(next) = self.apply(effect, messenger, surface) {
                    inbox.push_back(next);
                }
            }
        }
    }

    fn apply(
        &mut self,
        effect: AgentEffect,
        messenger: Option<&dyn Messenger>,
        surface: &mut dyn PageSurface,
    ) -> Option<AgentMsg> {
        match effect {
            AgentEffect::InjectControl { label } => {
                surface.inject_control(label);
                None
            }
            AgentEffect::SetControl { label, enabled } => {
                surface.set_control(label, enabled);
                None
            }
            AgentEffect::ShowToast {
                kind,
                text,
                dismiss_after,
            } => {
                surface.show_toast(kind, &text, dismiss_after);
                None
            }
            AgentEffect::ScrapeJob => Some(AgentMsg::Scraped(
                self.registry
                    .extract(&self.page)
                    .map_err(|err| err.to_string()),
            )),
            AgentEffect::SendMessage(request) => {
                tracker_debug!("Sending {} from {}", request.action(), self.page.url());
                let response = match messenger {
                    Some(messenger) => messenger.send_message(request),
                    None => Response::failure("no connection to the sync service"),
                };
                Some(AgentMsg::SaveResponse(response))
            }
            AgentEffect::ScheduleReset { after } => {
                self.armed_resets += 1;
                let tx = self.reset_tx.clone();
                thread::spawn(move || {
                    thread::sleep(after);
                    let _ = tx.send(AgentMsg::ResetElapsed);
                });
                None
            }
        }
    }
}
