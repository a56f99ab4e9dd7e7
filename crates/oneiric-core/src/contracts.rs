// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! Behavioral contracts a [`crate::candidate::Instance`] may implement.
//!
//! `Instance` is `Arc<dyn Any + Send + Sync>` so the registry stays
//! domain-agnostic; a factory that wants its instance callable through a
//! bridge wraps it as `Arc::new(concrete_impl) as Arc<dyn Trait>` and then
//! erases *that* Arc into `Instance`. Bridges downcast to the `Arc<dyn
//! Trait>` alias below to get back a callable handle (§3 "factory is an
//! opaque constructor").

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// An event-domain candidate's callable (§4.5 Event bridge).
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, payload: &Value, headers: &Value) -> Result<Value, String>;
}

/// Type stored in `Instance` for event-domain candidates.
pub type SharedEventHandler = Arc<dyn EventHandler>;

/// A task-domain candidate's callable (§4.5 Task bridge, §4.6 node execution).
#[async_trait]
pub trait TaskRunner: Send + Sync {
    async fn run(&self, payload: Value) -> Result<Value, String>;
}

/// Type stored in `Instance` for task-domain candidates.
pub type SharedTaskRunner = Arc<dyn TaskRunner>;

/// A queue-adapter candidate's callable (§4.6 `enqueue`).
#[async_trait]
pub trait QueueAdapter: Send + Sync {
    async fn enqueue(&self, workflow_key: &str, payload: Value) -> Result<String, String>;
}

pub type SharedQueueAdapter = Arc<dyn QueueAdapter>;

/// A messaging-adapter candidate's callable (§4.9 Notification Router).
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, target: &str, message: &Value) -> Result<(), String>;
}

pub type SharedNotificationSender = Arc<dyn NotificationSender>;
