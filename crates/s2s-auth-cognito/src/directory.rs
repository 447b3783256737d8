// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_cognitoidentityprovider::error::DisplayErrorContext;
use aws_sdk_cognitoidentityprovider::types::{ProviderUserIdentifierType, UserType};
use aws_sdk_cognitoidentityprovider::Client;
use s2s_auth_core::{DirectoryError, DirectoryUser, IncomingIdentity, UserDirectory};
use tracing::{debug, info};

use crate::filter::email_filter;

/// Provider name the user pool uses for its own (native) accounts.
pub const COGNITO_PROVIDER: &str = "Cognito";

/// Source attribute that matches on the federated identity's subject.
pub const SOURCE_ATTRIBUTE: &str = "Cognito_Subject";

#[derive(Debug, Clone)]
pub struct CognitoDirectory {
	client: Client,
}

impl CognitoDirectory {
	pub fn new(client: Client) -> Self {
		Self { client }
	}

	/// Build a client from the Lambda environment's credentials and region.
	///
	/// `endpoint_url` points the client at a local emulator instead of AWS.
	pub async fn from_env(endpoint_url: Option<&str>) -> Self {
		let mut loader = aws_config::defaults(BehaviorVersion::latest());
		if let Some(url) = endpoint_url {
			info!(endpoint_url = %url, "using custom Cognito endpoint");
			loader = loader.endpoint_url(url);
		}
		let config = loader.load().await;
		Self::new(Client::new(&config))
	}
}

#[async_trait]
impl UserDirectory for CognitoDirectory {
	async fn list_users_by_email(
		&self,
		user_pool_id: &str,
		email: &str,
		limit: u32,
	) -> Result<Vec<DirectoryUser>, DirectoryError> {
		let limit = i32::try_from(limit)
			.map_err(|_| DirectoryError::Lookup(format!("page limit {limit} out of range")))?;

		let output = self
			.client
			.list_users()
			.user_pool_id(user_pool_id)
			.filter(email_filter(email))
			.limit(limit)
			.send()
			.await
			.map_err(|e| DirectoryError::Lookup(DisplayErrorContext(&e).to_string()))?;

		let users: Vec<DirectoryUser> = output.users().iter().map(to_directory_user).collect();
		debug!(user_pool_id, matches = users.len(), "listed users by email");
		Ok(users)
	}

	async fn link_provider_for_user(
		&self,
		user_pool_id: &str,
		destination_username: &str,
		identity: &IncomingIdentity,
	) -> Result<(), DirectoryError> {
		let destination = ProviderUserIdentifierType::builder()
			.provider_name(COGNITO_PROVIDER)
			.provider_attribute_value(destination_username)
			.build();

		let source = ProviderUserIdentifierType::builder()
			.provider_name(identity.provider_name.as_str())
			.provider_attribute_name(SOURCE_ATTRIBUTE)
			.provider_attribute_value(identity.provider_user_id.as_str())
			.build();

		self
			.client
			.admin_link_provider_for_user()
			.user_pool_id(user_pool_id)
			.destination_user(destination)
			.source_user(source)
			.send()
			.await
			.map_err(|e| DirectoryError::Link(DisplayErrorContext(&e).to_string()))?;

		debug!(user_pool_id, destination_username, "admin link call succeeded");
		Ok(())
	}
}

/// Attributes without a value are dropped.
fn to_directory_user(user: &UserType) -> DirectoryUser {
	DirectoryUser {
		username: user.username().unwrap_or_default().to_string(),
		attributes: user
			.attributes()
			.iter()
			.filter_map(|attr| {
				attr
					.value()
					.map(|value| (attr.name().to_string(), value.to_string()))
			})
			.collect(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use aws_sdk_cognitoidentityprovider::types::AttributeType;

	fn attribute(name: &str, value: Option<&str>) -> AttributeType {
		AttributeType::builder()
			.name(name)
			.set_value(value.map(str::to_string))
			.build()
			.unwrap()
	}

	#[test]
	fn test_to_directory_user() {
		let user = UserType::builder()
			.username("crowd-alice")
			.attributes(attribute("email", Some("alice@example.com")))
			.attributes(attribute(
				"identities",
				Some(r#"[{"providerName":"SNOMED","userId":"a"}]"#),
			))
			.attributes(attribute("nickname", None))
			.build();

		let converted = to_directory_user(&user);
		assert_eq!(converted.username, "crowd-alice");
		assert_eq!(converted.email(), Some("alice@example.com"));
		assert!(converted.is_linked_to("SNOMED"));
		assert!(converted.attribute("nickname").is_none());
	}

	#[test]
	fn test_user_without_username() {
		let converted = to_directory_user(&UserType::builder().build());
		assert!(converted.username.is_empty());
		assert!(converted.attributes.is_empty());
	}
}
