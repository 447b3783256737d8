// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use lambda_runtime::{Context, LambdaEvent};
use s2s_auth_core::{
	DirectoryUser, IdentityLinkResolver, InMemoryDirectory, IncomingIdentity, LinkDecision, LinkPolicy,
	Outcome, SignupEvent,
};
use s2s_lambda_presignup::{dry_run, dry_run_files, handle_signup};
use serde_json::{json, Value};

fn external_signup(email: &str) -> Value {
	json!({
		"version": "1",
		"region": "eu-west-1",
		"userPoolId": "eu-west-1_pool",
		"userName": "SNOMEDINTERNATIONAL_U1",
		"callerContext": {
			"awsSdkVersion": "aws-sdk-unknown-unknown",
			"clientId": "snap2snomed-web"
		},
		"triggerSource": "PreSignUp_ExternalProvider",
		"request": {
			"userAttributes": {
				"email": email,
				"email_verified": "true",
				"identities": "[{\"providerName\":\"SNOMEDINTERNATIONAL\",\"userId\":\"U1\"}]"
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

fn crowd_user(username: &str, email: &str) -> DirectoryUser {
	DirectoryUser::new(username)
		.with_attribute("email", email)
		.with_attribute("identities", r#"[{"providerName":"SNOMED","userId":"crowd"}]"#)
}

async fn invoke(resolver: &IdentityLinkResolver, payload: Value) -> Value {
	let event: SignupEvent = serde_json::from_value(payload).unwrap();
	let result = handle_signup(resolver, LambdaEvent::new(event, Context::default()))
		.await
		.unwrap();
	serde_json::to_value(result).unwrap()
}

#[tokio::test]
async fn test_non_external_trigger_is_returned_verbatim() {
	let resolver = IdentityLinkResolver::new(
		Arc::new(InMemoryDirectory::new(vec![crowd_user("crowd-a", "test@test.com")])),
		LinkPolicy::default(),
	);
	let mut payload = external_signup("test@test.com");
	payload["triggerSource"] = json!("PreSignUp_SignUp");

	assert_eq!(invoke(&resolver, payload.clone()).await, payload);
}

#[tokio::test]
async fn test_unknown_email_is_returned_verbatim() {
	let directory = Arc::new(InMemoryDirectory::default());
	let resolver = IdentityLinkResolver::new(directory.clone(), LinkPolicy::default());
	let payload = external_signup("test@test.com");

	assert_eq!(invoke(&resolver, payload.clone()).await, payload);
	assert!(directory.link_calls().await.is_empty());
}

#[tokio::test]
async fn test_crowd_user_is_linked_and_confirmed() {
	let directory = Arc::new(InMemoryDirectory::new(vec![
		crowd_user("crowd-a", "test@test.com"),
		DirectoryUser::new("other").with_attribute("email", "test@test.com"),
	]));
	let resolver = IdentityLinkResolver::new(directory.clone(), LinkPolicy::default());
	let payload = external_signup("test@test.com");

	let result = invoke(&resolver, payload.clone()).await;

	assert_eq!(result["response"]["autoConfirmUser"], json!(true));
	assert_eq!(result["response"]["autoVerifyEmail"], json!(true));
	assert_eq!(result["response"]["autoVerifyPhone"], json!(false));
	assert_eq!(result["callerContext"], payload["callerContext"]);

	let calls = directory.link_calls().await;
	assert_eq!(calls.len(), 1);
	assert_eq!(calls[0].destination_username, "crowd-a");
	assert_eq!(calls[0].user_pool_id, "eu-west-1_pool");
	assert_eq!(calls[0].identity, IncomingIdentity::new("SNOMEDINTERNATIONAL", "U1"));
}

#[tokio::test]
async fn test_failed_link_is_returned_verbatim() {
	let directory =
		Arc::new(InMemoryDirectory::new(vec![crowd_user("crowd-a", "test@test.com")]).failing_link());
	let resolver = IdentityLinkResolver::new(directory, LinkPolicy::default());
	let payload = external_signup("test@test.com");

	assert_eq!(invoke(&resolver, payload.clone()).await, payload);
}

#[tokio::test]
async fn test_dry_run_reports_duplicate_emails() {
	let event = external_signup("dup@test.com").to_string();
	let directory = json!([
		{ "username": "a", "attributes": { "email": "dup@test.com" } },
		{ "username": "b", "attributes": { "email": "dup@test.com" } }
	])
	.to_string();

	let result = dry_run(&event, &directory, LinkPolicy::default()).await.unwrap();

	assert_eq!(
		result.outcome,
		Outcome::Decided(LinkDecision::AmbiguousDuplicateEmail { count: 2 })
	);
	assert!(result.link_calls.is_empty());
	assert_eq!(result.event.response.auto_confirm_user, Some(false));
}

#[tokio::test]
async fn test_dry_run_files() {
	let dir = tempfile::tempdir().unwrap();
	let event_path = dir.path().join("event.json");
	let directory_path = dir.path().join("directory.json");
	std::fs::write(&event_path, external_signup("test@test.com").to_string()).unwrap();
	std::fs::write(
		&directory_path,
		json!([{
			"username": "crowd-a",
			"attributes": {
				"email": "test@test.com",
				"identities": "[{\"providerName\":\"SNOMED\",\"userId\":\"crowd\"}]"
			}
		}])
		.to_string(),
	)
	.unwrap();

	let result = dry_run_files(&event_path, &directory_path, LinkPolicy::default())
		.await
		.unwrap();

	assert_eq!(
		result.outcome,
		Outcome::Linked {
			username: "crowd-a".to_string()
		}
	);
	assert_eq!(result.link_calls.len(), 1);
}

#[tokio::test]
async fn test_dry_run_rejects_bad_fixture() {
	let event = external_signup("test@test.com").to_string();
	let err = dry_run(&event, "{not json", LinkPolicy::default())
		.await
		.unwrap_err();
	assert!(err.to_string().contains("directory fixture"));
}
