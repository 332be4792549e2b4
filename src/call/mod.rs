// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Voice call session: SDK boundary, call state and the controller.

pub mod controller;
pub mod sdk;
pub mod state;

pub use controller::{CallController, Navigator, ToggleOutcome};
pub use sdk::{
    CallVariables, EventHub, EventSubscription, SdkError, SdkMessage, TranscriptRole,
    TranscriptType, VoiceEvent, VoiceSdk,
};
pub use state::{CallPhase, CallState, CallView, CallerIdentity, TranscriptMessage, Transition};
