// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! The Notification Router (§4.9): pure routing from a `workflow.notify`
//! action output to a resolved messaging candidate. Formatting is the
//! workflow action's job, not the router's.

use oneiric_bridges::Bridge;
use oneiric_core::{OneiricError, SharedNotificationSender};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// The payload a `workflow.notify` action hands the router.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifyRequest {
    pub channel: String,
    pub level: String,
    pub message: String,
    #[serde(default)]
    pub context: Value,
}

/// What actually gets sent to the resolved adapter (§4.9).
#[derive(Debug, Clone, Serialize)]
pub struct NotificationMessage {
    pub target: String,
    pub title: String,
    pub text: String,
    pub extra: Value,
}

/// Resolves `channel` through the Adapter domain's bridge and invokes
/// `NotificationSender::send`; never formats or interprets `message` beyond
/// passing it through.
pub struct NotificationRouter {
    bridge: Bridge,
}

impl NotificationRouter {
    pub fn new(bridge: Bridge) -> Self {
        Self { bridge }
    }

    pub async fn route(&self, request: NotifyRequest, target: &str) -> Result<(), OneiricError> {
        let handle = self.bridge.use_key(&request.channel, None).await?;
        let sender: Arc<SharedNotificationSender> = handle
            .downcast::<SharedNotificationSender>()
            .ok_or_else(|| OneiricError::Handler("resolved candidate is not a NotificationSender".to_string()))?;

        let message = NotificationMessage {
            target: target.to_string(),
            title: request.level,
            text: request.message,
            extra: request.context,
        };
        let payload = serde_json::to_value(&message).map_err(OneiricError::Serde)?;
        sender.send(target, &payload).await.map_err(OneiricError::Handler)
    }
}

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
