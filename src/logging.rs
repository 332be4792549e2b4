// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Logging setup and the benign voice SDK error filter.
//!
//! The voice SDK reports "Meeting has ended" as an error after every normal
//! hang-up. [`BenignErrorFilter`] drops such error events from the output
//! layer it is attached to, but only while at least one [`SuppressionGuard`]
//! is alive. Call controllers hold a guard for their lifetime.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Metadata};
use tracing_subscriber::layer::{Context, Filter, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Messages the voice SDK emits as errors after a normal hang-up.
pub const KNOWN_BENIGN_ERRORS: &[&str] = &["Meeting has ended"];

/// Per-layer filter dropping known benign error events.
#[derive(Debug, Clone)]
pub struct BenignErrorFilter {
    patterns: Arc<[String]>,
    guards: Arc<AtomicUsize>,
}

impl BenignErrorFilter {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
            guards: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Suppress matching errors until the returned guard is dropped.
    pub fn suppress(&self) -> SuppressionGuard {
        self.guards.fetch_add(1, Ordering::SeqCst);
        SuppressionGuard {
            guards: self.guards.clone(),
        }
    }

    pub fn is_suppressing(&self) -> bool {
        self.guards.load(Ordering::SeqCst) > 0
    }

    fn matches(&self, event: &Event<'_>) -> bool {
        let mut matcher = PatternMatcher {
            patterns: &self.patterns,
            matched: false,
        };
        event.record(&mut matcher);
        matcher.matched
    }
}

impl Default for BenignErrorFilter {
    fn default() -> Self {
        Self::new(KNOWN_BENIGN_ERRORS.iter().copied())
    }
}

impl<S> Filter<S> for BenignErrorFilter {
    fn enabled(&self, _meta: &Metadata<'_>, _cx: &Context<'_, S>) -> bool {
        true
    }

    fn event_enabled(&self, event: &Event<'_>, _cx: &Context<'_, S>) -> bool {
        if *event.metadata().level() != Level::ERROR || !self.is_suppressing() {
            return true;
        }
        !self.matches(event)
    }
}

/// Keeps benign error suppression on while alive.
#[derive(Debug)]
pub struct SuppressionGuard {
    guards: Arc<AtomicUsize>,
}

impl Drop for SuppressionGuard {
    fn drop(&mut self) {
        self.guards.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Checks every field of an event against the patterns.
struct PatternMatcher<'a> {
    patterns: &'a [String],
    matched: bool,
}

impl PatternMatcher<'_> {
    fn check(&mut self, value: &str) {
        if !self.matched {
            self.matched = self.patterns.iter().any(|p| value.contains(p.as_str()));
        }
    }
}

impl Visit for PatternMatcher<'_> {
    fn record_str(&mut self, _field: &Field, value: &str) {
        self.check(value);
    }

    fn record_debug(&mut self, _field: &Field, value: &dyn fmt::Debug) {
        self.check(&format!("{:?}", value));
    }
}

/// Initialize structured JSON logging (GCP-compliant).
pub fn init_logging(benign_errors: BenignErrorFilter) {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true)
        .with_filter(benign_errors);

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("muscle_ai=debug,info")),
        )
        .with(format)
        .init();
}
