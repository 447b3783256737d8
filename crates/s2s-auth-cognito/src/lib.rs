// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Cognito user pool implementation of [`s2s_auth_core::UserDirectory`].
//!
//! Lookups go through `ListUsers` with an `email = "..."` filter; links go
//! through `AdminLinkProviderForUser` with the existing account as the
//! `Cognito` destination and the federated identity as the source.

mod directory;
mod filter;

pub use directory::{CognitoDirectory, COGNITO_PROVIDER, SOURCE_ATTRIBUTE};
pub use filter::email_filter;
