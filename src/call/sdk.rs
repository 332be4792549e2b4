// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Voice SDK boundary: events, start variables and the event hub.
//!
//! The SDK delivers `call-start`, `call-end`, `speech-start`, `speech-end`,
//! `message` and `error` events. An adapter for a concrete SDK implements
//! [`VoiceSdk`] and forwards those events into an [`EventHub`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::call::state::TranscriptMessage;

/// Default channel capacity (events)
pub const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Speaker of a transcript segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptRole {
    Assistant,
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptType {
    Partial,
    Final,
}

/// Payload of a `message` event.
///
/// Only transcripts are modelled; every other message type deserializes to
/// [`SdkMessage::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SdkMessage {
    Transcript {
        #[serde(rename = "transcriptType")]
        transcript_type: TranscriptType,
        transcript: String,
        role: TranscriptRole,
    },
    #[serde(other)]
    Other,
}

impl SdkMessage {
    /// The transcript message carried by a final transcript segment.
    pub fn final_transcript(&self) -> Option<TranscriptMessage> {
        match self {
            SdkMessage::Transcript {
                transcript_type: TranscriptType::Final,
                transcript,
                role,
            } => Some(TranscriptMessage {
                role: *role,
                content: transcript.clone(),
            }),
            _ => None,
        }
    }
}

/// Event delivered by the voice SDK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceEvent {
    CallStart,
    CallEnd,
    SpeechStart,
    SpeechEnd,
    Message(SdkMessage),
    Error(String),
}

impl VoiceEvent {
    /// SDK event name.
    pub fn name(&self) -> &'static str {
        match self {
            VoiceEvent::CallStart => "call-start",
            VoiceEvent::CallEnd => "call-end",
            VoiceEvent::SpeechStart => "speech-start",
            VoiceEvent::SpeechEnd => "speech-end",
            VoiceEvent::Message(_) => "message",
            VoiceEvent::Error(_) => "error",
        }
    }
}

/// Variables passed to the voice workflow when a session starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallVariables {
    pub full_name: String,
    pub user_id: Option<String>,
}

/// Voice SDK errors
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    #[error("Session start rejected: {0}")]
    StartRejected(String),

    #[error("Voice transport error: {0}")]
    Transport(String),
}

/// Actions and event stream of an external voice-session SDK.
#[async_trait]
pub trait VoiceSdk: Send + Sync {
    /// Start a session of the given workflow template.
    async fn start(&self, workflow_id: &str, variables: &CallVariables) -> Result<(), SdkError>;

    /// Request the current session to stop; the SDK confirms with `call-end`.
    fn stop(&self);

    /// Subscribe to the SDK's events.
    fn subscribe(&self) -> EventSubscription;
}

/// Fan-out of SDK events to subscribers.
#[derive(Clone)]
pub struct EventHub {
    tx: broadcast::Sender<VoiceEvent>,
}

impl EventHub {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Deliver an event to all current subscribers.
    ///
    /// Events emitted while nobody is subscribed are dropped.
    pub fn emit(&self, event: VoiceEvent) {
        tracing::trace!(event = event.name(), "EventHub::emit");
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> EventSubscription {
        EventSubscription {
            rx: self.tx.subscribe(),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new(EVENT_CHANNEL_CAPACITY)
    }
}

/// Subscription handle. Dropping it unsubscribes.
pub struct EventSubscription {
    rx: broadcast::Receiver<VoiceEvent>,
}

impl EventSubscription {
    /// Wait for the next event. Returns `None` once the hub is gone.
    pub async fn recv(&mut self) -> Option<VoiceEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Voice event subscriber lagged, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Next already-delivered event, if any.
    pub fn try_recv(&mut self) -> Option<VoiceEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Voice event subscriber lagged, events dropped");
                }
                Err(_) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_transcript_parsed() {
        let message: SdkMessage = serde_json::from_value(serde_json::json!({
            "type": "transcript",
            "transcriptType": "final",
            "transcript": "I want to build strength",
            "role": "user"
        }))
        .unwrap();

        assert_eq!(
            message.final_transcript(),
            Some(TranscriptMessage {
                role: TranscriptRole::User,
                content: "I want to build strength".to_string(),
            })
        );
    }

    #[test]
    fn test_partial_transcript_and_other_messages_ignored() {
        let partial: SdkMessage = serde_json::from_value(serde_json::json!({
            "type": "transcript",
            "transcriptType": "partial",
            "transcript": "I want",
            "role": "user"
        }))
        .unwrap();
        assert_eq!(partial.final_transcript(), None);

        let status: SdkMessage = serde_json::from_value(serde_json::json!({
            "type": "status-update",
            "status": "in-progress"
        }))
        .unwrap();
        assert_eq!(status, SdkMessage::Other);
    }

    #[test]
    fn test_dropping_subscription_unsubscribes() {
        let hub = EventHub::default();
        let mut first = hub.subscribe();
        let second = hub.subscribe();
        assert_eq!(hub.subscriber_count(), 2);

        drop(second);
        assert_eq!(hub.subscriber_count(), 1);

        hub.emit(VoiceEvent::CallStart);
        assert_eq!(first.try_recv(), Some(VoiceEvent::CallStart));
        assert_eq!(first.try_recv(), None);
    }

    #[test]
    fn test_lagged_subscriber_keeps_newest_events() {
        let hub = EventHub::new(2);
        let mut sub = hub.subscribe();

        hub.emit(VoiceEvent::CallStart);
        hub.emit(VoiceEvent::SpeechStart);
        hub.emit(VoiceEvent::SpeechEnd);

        assert_eq!(sub.try_recv(), Some(VoiceEvent::SpeechStart));
        assert_eq!(sub.try_recv(), Some(VoiceEvent::SpeechEnd));
    }
}
