// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Extraction of the claimed identity from a sign-up event.

use std::fmt;

use crate::event::{SignupEvent, EMAIL_ATTRIBUTE, EMAIL_VERIFIED_ATTRIBUTE, IDENTITIES_ATTRIBUTE};
use crate::identity::IncomingIdentity;
use crate::resolver::LinkPolicy;

/// What a federated sign-up claims about itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupClaim {
	pub user_pool_id: String,
	/// Trimmed and lower-cased.
	pub email: String,
	pub email_verified: bool,
	pub identity: IncomingIdentity,
}

/// Reason an event is returned without looking at the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassThrough {
	NotExternalProvider { trigger_source: Option<String> },
	MissingUserPool,
	MissingEmail,
	MissingProviderUserId,
	UnexpectedProvider { provider_name: String },
	EmailNotVerified,
}

impl fmt::Display for PassThrough {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			PassThrough::NotExternalProvider { trigger_source } => write!(
				f,
				"trigger source {} is not an external provider sign-up",
				trigger_source.as_deref().unwrap_or("<none>")
			),
			PassThrough::MissingUserPool => write!(f, "event has no user pool id"),
			PassThrough::MissingEmail => write!(f, "claim has no email"),
			PassThrough::MissingProviderUserId => write!(f, "claim has no provider user id"),
			PassThrough::UnexpectedProvider { provider_name } => {
				write!(f, "provider {provider_name} is not the expected primary provider")
			}
			PassThrough::EmailNotVerified => write!(f, "email is not verified"),
		}
	}
}

/// Read the claim out of an event, or say why the event should be left alone.
///
/// The identity comes from the `identities` claim when it parses, otherwise
/// from the `<Provider>_<userId>` username the platform assigned.
pub fn claim_from_event(event: &SignupEvent, policy: &LinkPolicy) -> Result<SignupClaim, PassThrough> {
	if !event.is_external_provider_signup() {
		return Err(PassThrough::NotExternalProvider {
			trigger_source: event.trigger_source.clone(),
		});
	}

	let user_pool_id = event
		.user_pool_id
		.as_deref()
		.map(str::trim)
		.filter(|id| !id.is_empty())
		.ok_or(PassThrough::MissingUserPool)?
		.to_string();

	let email = event
		.attribute(EMAIL_ATTRIBUTE)
		.map(|e| e.trim().to_lowercase())
		.filter(|e| !e.is_empty())
		.ok_or(PassThrough::MissingEmail)?;

	let identity = event
		.attribute(IDENTITIES_ATTRIBUTE)
		.and_then(IncomingIdentity::from_claim)
		.or_else(|| event.user_name.as_deref().and_then(IncomingIdentity::from_username))
		.filter(IncomingIdentity::is_complete)
		.ok_or(PassThrough::MissingProviderUserId)?;

	if let Some(primary) = policy.primary_provider.as_deref() {
		if !identity.provider_name.eq_ignore_ascii_case(primary) {
			return Err(PassThrough::UnexpectedProvider {
				provider_name: identity.provider_name,
			});
		}
	}

	let email_verified = event.attribute(EMAIL_VERIFIED_ATTRIBUTE) == Some("true");
	if policy.require_verified_email && !email_verified {
		return Err(PassThrough::EmailNotVerified);
	}

	Ok(SignupClaim {
		user_pool_id,
		email,
		email_verified,
		identity,
	})
}
