//! Exchange orchestration: runs request, decode and assertions, notifies
//! listeners at each milestone and lets them decide how failures surface.
//!
//! This module provides:
//! - The runner ([`Bastion`]) and its results ([`Outcome`], [`Exchanged`])
//! - The shared set-up object ([`ExchangeSetup`])
//! - Lifecycle events and listeners ([`ExchangeEvent`], [`ExchangeListener`])
//! - Propagation policies ([`PropagationPolicy`], [`CollectingListener`])
//! - Caller assertions ([`Assertions`], [`ExpectStatus`])

mod assertions;
mod error;
mod listener;
mod runner;
mod setup;

#[cfg(test)]
mod runner_tests;

pub use assertions::{AssertionFailure, Assertions, ExpectStatus, NoAssertions};
pub use error::{ErrorKind, ExchangeError};
pub use listener::{
    CollectedFailure, CollectingListener, Disposition, Errored, EventDispatcher, ExchangeEvent,
    ExchangeId, ExchangeListener, Failed, Finished, PropagationPolicy, Started,
};
pub use runner::{Bastion, Exchanged, Outcome};
pub use setup::ExchangeSetup;
