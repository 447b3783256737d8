// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity linking for federated sign-ups.
//!
//! When a user signs in through an external identity provider for the first
//! time, the user pool is about to create a brand new account for them. This
//! crate decides whether that identity should instead be attached to an
//! account that already exists for the same email address:
//!
//! - [`SignupEvent`]: the pre sign-up trigger payload, preserved field for field
//! - [`claim_from_event`]: extracts the claimed email and [`IncomingIdentity`]
//! - [`decide`]: the pure decision table over directory matches
//! - [`UserDirectory`]: the two directory operations the resolver needs
//! - [`IdentityLinkResolver`]: ties the pieces together and never fails
//!
//! Every failure mode resolves to "leave the event alone" so that a sign-up is
//! never blocked by the linking logic.

pub mod claim;
pub mod directory;
pub mod event;
pub mod identity;
pub mod policy;
pub mod redact;
pub mod resolver;

pub use claim::{claim_from_event, PassThrough, SignupClaim};
pub use directory::{DirectoryError, DirectoryUser, InMemoryDirectory, LinkCall, UserDirectory};
pub use event::{SignupEvent, SignupRequest, SignupResponse, EXTERNAL_PROVIDER_TRIGGER};
pub use identity::{IncomingIdentity, LinkedIdentity};
pub use policy::{decide, LinkDecision};
pub use redact::redact_email;
pub use resolver::{
	IdentityLinkResolver, LinkPolicy, Outcome, Resolution, DEFAULT_LINKED_PROVIDER, MAX_PAGE_LIMIT,
};
