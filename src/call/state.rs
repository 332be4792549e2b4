// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Call session state machine.
//!
//! Phases move Idle → Connecting → Active → Ended. Speaking is only tracked
//! while Active, so the derived flags always satisfy: at most one of
//! connecting/active is set, and speaking implies active.

use serde::Serialize;

use crate::call::sdk::{TranscriptRole, VoiceEvent};

/// Name sent to the assistant when the caller has no first name.
pub const CALL_NAME_PLACEHOLDER: &str = "There";
/// Caller name shown when nobody is signed in.
pub const GUEST_NAME: &str = "Guest";
/// Notice appended to the transcript view once the call is over.
pub const CALL_COMPLETE_NOTICE: &str =
    "Your Fitness Program has been generated! Redirecting to your profile...";

/// Signed-in user as reported by the identity provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerIdentity {
    pub user_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
}

impl CallerIdentity {
    /// Name passed to the voice workflow.
    pub fn call_name(&self) -> String {
        match self.first_name.as_deref().filter(|name| !name.is_empty()) {
            Some(first) => self.join_name(first),
            None => CALL_NAME_PLACEHOLDER.to_string(),
        }
    }

    /// Name shown on the caller card.
    pub fn display_name(&self) -> String {
        if self.user_id.is_none() {
            return GUEST_NAME.to_string();
        }
        self.join_name(self.first_name.as_deref().unwrap_or_default())
    }

    fn join_name(&self, first: &str) -> String {
        format!("{} {}", first, self.last_name.as_deref().unwrap_or_default())
            .trim()
            .to_string()
    }
}

/// One finalized transcript segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptMessage {
    pub role: TranscriptRole,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallPhase {
    #[default]
    Idle,
    Connecting,
    Active,
    Ended,
}

/// Phase change caused by an event, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    None,
    Started,
    Ended,
    Failed,
}

#[derive(Debug, Clone, Default)]
pub struct CallState {
    phase: CallPhase,
    speaking: bool,
    transcript: Vec<TranscriptMessage>,
}

impl CallState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> CallPhase {
        self.phase
    }

    pub fn is_connecting(&self) -> bool {
        self.phase == CallPhase::Connecting
    }

    pub fn is_active(&self) -> bool {
        self.phase == CallPhase::Active
    }

    pub fn is_ended(&self) -> bool {
        self.phase == CallPhase::Ended
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking
    }

    pub fn transcript(&self) -> &[TranscriptMessage] {
        &self.transcript
    }

    /// The toggle does nothing while connecting or after the call ended.
    pub fn can_toggle(&self) -> bool {
        matches!(self.phase, CallPhase::Idle | CallPhase::Active)
    }

    /// Enter Connecting for a new call, discarding the previous transcript.
    pub fn begin_connecting(&mut self) {
        self.phase = CallPhase::Connecting;
        self.speaking = false;
        self.transcript.clear();
    }

    /// The start request failed before the SDK reported anything.
    pub fn connect_failed(&mut self) {
        if self.phase == CallPhase::Connecting {
            self.phase = CallPhase::Idle;
        }
    }

    /// Apply one SDK event.
    pub fn apply(&mut self, event: &VoiceEvent) -> Transition {
        match event {
            VoiceEvent::CallStart => {
                if self.phase == CallPhase::Active {
                    return Transition::None;
                }
                self.phase = CallPhase::Active;
                self.speaking = false;
                Transition::Started
            }
            VoiceEvent::CallEnd => match self.phase {
                CallPhase::Connecting | CallPhase::Active => {
                    self.phase = CallPhase::Ended;
                    self.speaking = false;
                    Transition::Ended
                }
                // A second call-end must not re-arm the redirect
                CallPhase::Idle | CallPhase::Ended => Transition::None,
            },
            VoiceEvent::SpeechStart => {
                if self.phase == CallPhase::Active {
                    self.speaking = true;
                }
                Transition::None
            }
            VoiceEvent::SpeechEnd => {
                self.speaking = false;
                Transition::None
            }
            VoiceEvent::Message(message) => {
                if self.phase != CallPhase::Idle {
                    if let Some(segment) = message.final_transcript() {
                        self.transcript.push(segment);
                    }
                }
                Transition::None
            }
            VoiceEvent::Error(_) => match self.phase {
                CallPhase::Connecting | CallPhase::Active => {
                    self.phase = CallPhase::Idle;
                    self.speaking = false;
                    Transition::Failed
                }
                CallPhase::Idle | CallPhase::Ended => Transition::None,
            },
        }
    }

    /// Labels and content rendered by the call page.
    pub fn view(&self, identity: &CallerIdentity) -> CallView {
        let status_label = if self.speaking {
            "Speaking..."
        } else {
            match self.phase {
                CallPhase::Active => "Listening...",
                CallPhase::Ended => "Redirecting To Profile",
                CallPhase::Idle | CallPhase::Connecting => "Waiting..",
            }
        };

        let button_label = match self.phase {
            CallPhase::Active => "End Call",
            CallPhase::Connecting => "Connecting...",
            CallPhase::Ended => "View Profile",
            CallPhase::Idle => "Start Call",
        };

        CallView {
            status_label,
            button_label,
            button_enabled: self.can_toggle(),
            caller_name: identity.display_name(),
            transcript: self.transcript.clone(),
            closing_notice: self.is_ended().then_some(CALL_COMPLETE_NOTICE),
        }
    }
}

/// Snapshot of everything the call page displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallView {
    pub status_label: &'static str,
    pub button_label: &'static str,
    pub button_enabled: bool,
    pub caller_name: String,
    pub transcript: Vec<TranscriptMessage>,
    pub closing_notice: Option<&'static str>,
}
