// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Call session controller.
//!
//! Owns the SDK event subscription, applies events to a [`CallState`] and
//! drives the start/stop toggle. Once a call ends, a one-shot timer navigates
//! to the profile route; dropping the controller cancels the timer, releases
//! the subscription and lifts the benign-error log suppression.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::call::sdk::{CallVariables, EventSubscription, VoiceEvent, VoiceSdk};
use crate::call::state::{CallPhase, CallState, CallView, CallerIdentity, Transition};
use crate::config::VoiceConfig;
use crate::logging::{BenignErrorFilter, SuppressionGuard};

/// Page navigation, provided by the UI shell.
pub trait Navigator: Send + Sync + 'static {
    fn navigate(&self, route: &str);
}

/// What a toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// A session start was requested and accepted by the SDK
    Started,
    /// The SDK rejected the start request; back to idle
    StartFailed,
    /// A stop was requested for the active session
    StopRequested,
    /// Connecting or already ended
    Ignored,
}

pub struct CallController {
    sdk: Arc<dyn VoiceSdk>,
    navigator: Arc<dyn Navigator>,
    identity: CallerIdentity,
    config: VoiceConfig,
    state: CallState,
    events: EventSubscription,
    redirect: Option<JoinHandle<()>>,
    _suppression: SuppressionGuard,
}

impl CallController {
    /// Subscribe to the SDK and start suppressing its benign errors.
    pub fn new(
        sdk: Arc<dyn VoiceSdk>,
        navigator: Arc<dyn Navigator>,
        identity: CallerIdentity,
        config: VoiceConfig,
        log_filter: &BenignErrorFilter,
    ) -> Self {
        let events = sdk.subscribe();
        Self {
            sdk,
            navigator,
            identity,
            config,
            state: CallState::new(),
            events,
            redirect: None,
            _suppression: log_filter.suppress(),
        }
    }

    pub fn state(&self) -> &CallState {
        &self.state
    }

    pub fn view(&self) -> CallView {
        self.state.view(&self.identity)
    }

    /// Start a call when idle, stop it when active, otherwise do nothing.
    pub async fn toggle(&mut self) -> ToggleOutcome {
        match self.state.phase() {
            CallPhase::Connecting | CallPhase::Ended => {
                tracing::debug!(phase = ?self.state.phase(), "Toggle ignored");
                ToggleOutcome::Ignored
            }
            CallPhase::Active => {
                tracing::info!("Stopping voice session");
                self.sdk.stop();
                ToggleOutcome::StopRequested
            }
            CallPhase::Idle => {
                self.state.begin_connecting();

                let variables = CallVariables {
                    full_name: self.identity.call_name(),
                    user_id: self.identity.user_id.clone(),
                };
                tracing::info!(
                    workflow_id = %self.config.workflow_id,
                    user_id = ?variables.user_id,
                    "Starting voice session"
                );

                match self.sdk.start(&self.config.workflow_id, &variables).await {
                    Ok(()) => ToggleOutcome::Started,
                    Err(e) => {
                        tracing::warn!(error = %e, "Voice session failed to start");
                        self.state.connect_failed();
                        ToggleOutcome::StartFailed
                    }
                }
            }
        }
    }

    /// Apply one SDK event.
    ///
    /// Must be called within a Tokio runtime: a call-end arms the redirect
    /// timer, and a new call-start disarms it.
    pub fn handle_event(&mut self, event: VoiceEvent) {
        match &event {
            VoiceEvent::Error(message) => {
                tracing::error!(error = %message, "Voice SDK error");
            }
            VoiceEvent::Message(_) => {
                tracing::trace!(event = event.name(), "Voice SDK message");
            }
            _ => {
                tracing::debug!(event = event.name(), "Voice SDK event");
            }
        }

        match self.state.apply(&event) {
            Transition::Ended => self.arm_redirect(),
            Transition::Started => self.cancel_redirect(),
            Transition::None | Transition::Failed => {}
        }
    }

    /// Apply every event already delivered. Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.events.try_recv() {
            self.handle_event(event);
            applied += 1;
        }
        applied
    }

    /// Wait for the next event and apply it. Returns `false` once the SDK's
    /// event hub is gone.
    pub async fn next_event(&mut self) -> bool {
        match self.events.recv().await {
            Some(event) => {
                self.handle_event(event);
                true
            }
            None => false,
        }
    }

    fn cancel_redirect(&mut self) {
        if let Some(redirect) = self.redirect.take() {
            tracing::debug!("Pending profile redirect cancelled");
            redirect.abort();
        }
    }

    fn arm_redirect(&mut self) {
        self.cancel_redirect();

        let navigator = self.navigator.clone();
        let route = self.config.profile_route.clone();
        let delay = self.config.redirect_delay;

        self.redirect = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::info!(route = %route, "Call finished, redirecting");
            navigator.navigate(&route);
        }));
    }
}

impl Drop for CallController {
    fn drop(&mut self) {
        if let Some(redirect) = self.redirect.take() {
            redirect.abort();
        }
    }
}
