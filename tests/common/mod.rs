//! Common test utilities for integration tests.

#![allow(dead_code)]

pub mod harness;

use slint_immediate_nodes::{CreatedLink, EditorContext};

/// Accumulates the link events the editor reports, frame after frame.
#[derive(Debug, Default, Clone)]
pub struct EventTracker {
    /// Pins links were dragged out of.
    pub started: Vec<i32>,
    pub created: Vec<CreatedLink>,
    /// (start pin, was the link detached)
    pub dropped: Vec<(i32, bool)>,
    pub destroyed: Vec<i32>,
}

impl EventTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record whatever the last frame reported.
    pub fn record(&mut self, ctx: &EditorContext) {
        if let Some(pin) = ctx.link_started() {
            self.started.push(pin);
        }
        if let Some(link) = ctx.link_created() {
            self.created.push(link);
        }
        if let Some(pin) = ctx.link_dropped(true) {
            let detached = ctx.link_dropped(false).is_none();
            self.dropped.push((pin, detached));
        }
        if let Some(link) = ctx.link_destroyed() {
            self.destroyed.push(link);
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
