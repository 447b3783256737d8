// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Pre sign-up trigger payload.
//!
//! Only the fields the resolver reads or writes are modelled. Everything else
//! the user pool sends (`version`, `region`, `callerContext`,
//! `validationData`, ...) is captured in the `extra` maps and written back
//! untouched, so a pass-through really returns the event the platform sent.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Trigger source for a sign-up through a federated identity provider.
pub const EXTERNAL_PROVIDER_TRIGGER: &str = "PreSignUp_ExternalProvider";

/// Attribute carrying the asserted email address.
pub const EMAIL_ATTRIBUTE: &str = "email";

/// Attribute carrying the provider's verification flag, as a string.
pub const EMAIL_VERIFIED_ATTRIBUTE: &str = "email_verified";

/// Attribute carrying the JSON-encoded identities claim.
pub const IDENTITIES_ATTRIBUTE: &str = "identities";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupEvent {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub trigger_source: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user_pool_id: Option<String>,

	/// Username the platform assigned, e.g. `SNOMEDINTERNATIONAL_U1`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user_name: Option<String>,

	#[serde(default)]
	pub request: SignupRequest,

	#[serde(default)]
	pub response: SignupResponse,

	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl SignupEvent {
	pub fn is_external_provider_signup(&self) -> bool {
		self.trigger_source.as_deref() == Some(EXTERNAL_PROVIDER_TRIGGER)
	}

	/// Look up a string-valued user attribute.
	pub fn attribute(&self, name: &str) -> Option<&str> {
		self.request.user_attributes.get(name).and_then(Value::as_str)
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
	#[serde(default)]
	pub user_attributes: Map<String, Value>,

	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

/// The mutable half of the event.
///
/// Flags stay `None` unless the resolver sets them, so an untouched response
/// serializes exactly as it arrived.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub auto_confirm_user: Option<bool>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub auto_verify_email: Option<bool>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub auto_verify_phone: Option<bool>,

	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl SignupResponse {
	/// Mark the account as confirmed with a verified email.
	pub fn confirm_and_verify(&mut self) {
		self.auto_confirm_user = Some(true);
		self.auto_verify_email = Some(true);
	}

	pub fn is_confirmed(&self) -> bool {
		self.auto_confirm_user == Some(true)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn platform_event() -> Value {
		json!({
			"version": "1",
			"region": "ap-southeast-2",
			"userPoolId": "ap-southeast-2_abc",
			"userName": "SNOMEDINTERNATIONAL_U1",
			"callerContext": {
				"awsSdkVersion": "aws-sdk-unknown-unknown",
				"clientId": "client"
			},
			"triggerSource": "PreSignUp_ExternalProvider",
			"request": {
				"userAttributes": {
					"email": "test@test.com",
					"email_verified": "true"
				},
				"validationData": null
			},
			"response": {
				"autoConfirmUser": false,
				"autoVerifyEmail": false,
				"autoVerifyPhone": false
			}
		})
	}

	#[test]
	fn test_deserializes_platform_event() {
		let event: SignupEvent = serde_json::from_value(platform_event()).unwrap();
		assert!(event.is_external_provider_signup());
		assert_eq!(event.user_pool_id.as_deref(), Some("ap-southeast-2_abc"));
		assert_eq!(event.attribute("email"), Some("test@test.com"));
		assert_eq!(event.response.auto_confirm_user, Some(false));
		assert!(event.extra.contains_key("callerContext"));
		assert!(event.request.extra.contains_key("validationData"));
	}

	#[test]
	fn test_unmodelled_fields_survive_serialization() {
		let original = platform_event();
		let event: SignupEvent = serde_json::from_value(original.clone()).unwrap();
		let written = serde_json::to_value(&event).unwrap();
		assert_eq!(written, original);
	}

	#[test]
	fn test_empty_response_stays_empty() {
		let event: SignupEvent = serde_json::from_value(json!({
			"triggerSource": "PreSignUp_SignUp",
			"request": { "userAttributes": {} },
			"response": {}
		}))
		.unwrap();
		let written = serde_json::to_value(&event).unwrap();
		assert_eq!(written["response"], json!({}));
	}

	#[test]
	fn test_confirm_and_verify_sets_both_flags() {
		let mut response = SignupResponse::default();
		response.confirm_and_verify();
		assert!(response.is_confirmed());
		assert_eq!(response.auto_verify_email, Some(true));
		assert_eq!(response.auto_verify_phone, None);
	}

	#[test]
	fn test_non_string_attribute_is_ignored() {
		let event: SignupEvent = serde_json::from_value(json!({
			"request": { "userAttributes": { "email_verified": true } }
		}))
		.unwrap();
		assert_eq!(event.attribute(EMAIL_VERIFIED_ATTRIBUTE), None);
	}
}
