// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Cognito pre sign-up trigger.
//!
//! Wires the identity link resolver to the Lambda runtime and provides the
//! offline dry run used by the `decide` subcommand.

pub mod logging;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use lambda_runtime::{Error, LambdaEvent};
use s2s_auth_cognito::CognitoDirectory;
use s2s_auth_core::{IdentityLinkResolver, InMemoryDirectory, LinkCall, LinkPolicy, Outcome, SignupEvent};
use s2s_common_config::PresignupConfig;
use tracing::{info, info_span, Instrument};

/// Build the resolver backed by the real user pool.
pub async fn cognito_resolver(config: &PresignupConfig) -> IdentityLinkResolver {
	let directory = CognitoDirectory::from_env(config.directory.endpoint_url.as_deref()).await;
	IdentityLinkResolver::new(Arc::new(directory), config.link_policy())
}

/// Lambda handler. Always returns the event; linking problems are logged by
/// the resolver rather than failing the sign-up.
pub async fn handle_signup(
	resolver: &IdentityLinkResolver,
	event: LambdaEvent<SignupEvent>,
) -> Result<SignupEvent, Error> {
	let LambdaEvent { payload, context } = event;
	let span = info_span!("presignup", request_id = %context.request_id);

	let resolution = resolver.evaluate(payload).instrument(span.clone()).await;

	span.in_scope(|| info!(outcome = resolution.outcome.as_str(), "sign-up event processed"));
	Ok(resolution.event)
}

/// Result of running the resolver against fixtures instead of the user pool.
#[derive(Debug)]
pub struct DryRun {
	pub outcome: Outcome,
	pub event: SignupEvent,
	pub link_calls: Vec<LinkCall>,
}

/// Resolve `event_json` against the users in `directory_json`.
pub async fn dry_run(event_json: &str, directory_json: &str, policy: LinkPolicy) -> anyhow::Result<DryRun> {
	let event: SignupEvent = serde_json::from_str(event_json).context("parsing sign-up event")?;
	let directory = Arc::new(InMemoryDirectory::from_json(directory_json).context("parsing directory fixture")?);

	let resolver = IdentityLinkResolver::new(directory.clone(), policy);
	let resolution = resolver.evaluate(event).await;

	Ok(DryRun {
		outcome: resolution.outcome,
		event: resolution.event,
		link_calls: directory.link_calls().await,
	})
}

/// [`dry_run`] with the event and directory read from files.
pub async fn dry_run_files(event_path: &Path, directory_path: &Path, policy: LinkPolicy) -> anyhow::Result<DryRun> {
	let event_json = tokio::fs::read_to_string(event_path)
		.await
		.with_context(|| format!("reading {}", event_path.display()))?;
	let directory_json = tokio::fs::read_to_string(directory_path)
		.await
		.with_context(|| format!("reading {}", directory_path.display()))?;
	dry_run(&event_json, &directory_json, policy).await
}
