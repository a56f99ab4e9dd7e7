// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! Data model, ID types, clock abstraction, retry policy, and error
//! taxonomy shared by every Oneiric crate.

pub mod activity;
pub mod candidate;
pub mod clock;
pub mod contracts;
pub mod domain;
pub mod error;
pub mod handle;
pub mod id;
pub mod lifecycle_state;
pub mod retry;
#[cfg(feature = "test-support")]
pub mod test_support;

pub use activity::ActivityState;
pub use candidate::{
    Candidate, CandidateDescriptor, CandidateId, CandidateMetadata, Capabilities, Extras, Factory,
    Instance, LifecycleHooks, NoHooks, Source,
};
pub use contracts::{
    EventHandler, NotificationSender, QueueAdapter, SharedEventHandler, SharedNotificationSender,
    SharedQueueAdapter, SharedTaskRunner, TaskRunner,
};
pub use clock::{Clock, FakeClock, SystemClock};
pub use domain::Domain;
pub use error::{LifecycleStage, OneiricError};
pub use handle::Handle;
pub use lifecycle_state::{LifecycleEntry, LifecycleState};
pub use retry::RetryPolicy;

define_id! {
    /// Identifies a single registration in the Candidate Registry.
    pub struct RegistrationToken("reg-");
}

define_id! {
    /// Identifies one workflow execution.
    pub struct RunId("run-");
}
