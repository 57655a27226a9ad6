//! Event-script sink that records every trigger instead of running a script.

use std::sync::Mutex;

use combat_core::{EventSink, EventTrigger};

#[derive(Debug, Default)]
pub struct RecordingEventSink {
    triggers: Mutex<Vec<EventTrigger>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every trigger received so far, in order.
    pub fn triggers(&self) -> Vec<EventTrigger> {
        match self.triggers.lock() {
            Ok(triggers) => triggers.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn events(&self) -> Vec<String> {
        self.triggers().into_iter().map(|t| t.event).collect()
    }
}

impl EventSink for RecordingEventSink {
    fn trigger(&self, trigger: &EventTrigger) {
        tracing::info!(event = %trigger.event, actor = %trigger.actor, target = ?trigger.target, "event triggered");
        match self.triggers.lock() {
            Ok(mut triggers) => triggers.push(trigger.clone()),
            Err(poisoned) => poisoned.into_inner().push(trigger.clone()),
        }
    }
}
