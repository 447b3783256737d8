// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Pre sign-up trigger binary. Packaged as `bootstrap` for the
//! `provided.al2023` runtime.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use s2s_auth_core::SignupEvent;
use s2s_lambda_presignup::logging::init_tracing;
use s2s_lambda_presignup::{cognito_resolver, dry_run_files, handle_signup};

/// With no subcommand, serves pre sign-up events from the Lambda runtime.
#[derive(Parser, Debug)]
#[command(name = "s2s-presignup", about = "Snap2Snomed pre sign-up identity linking", version)]
struct Args {
	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version information
	Version,

	/// Resolve a saved event against a JSON directory fixture without
	/// touching the user pool
	Decide {
		/// Pre sign-up event JSON
		#[arg(long)]
		event: PathBuf,

		/// JSON array of `{"username": ..., "attributes": {...}}` records
		#[arg(long)]
		directory: PathBuf,

		/// TOML config file layered under the environment
		#[arg(long, env = "S2S_CONFIG_FILE")]
		config: Option<PathBuf>,
	},
}

#[tokio::main]
async fn main() -> Result<(), Error> {
	let args = Args::parse();

	match args.command {
		Some(Command::Version) => {
			println!("s2s-presignup version: {}", env!("CARGO_PKG_VERSION"));
			Ok(())
		}
		Some(Command::Decide {
			event,
			directory,
			config,
		}) => decide(event, directory, config).await,
		None => serve().await,
	}
}

async fn serve() -> Result<(), Error> {
	let config = s2s_common_config::load_config()?;
	init_tracing(&config.logging);

	tracing::info!(
		linked_provider = %config.linking.linked_provider,
		require_verified_email = config.linking.require_verified_email,
		"starting pre sign-up handler"
	);

	let resolver = Arc::new(cognito_resolver(&config).await);

	run(service_fn(move |event: LambdaEvent<SignupEvent>| {
		let resolver = Arc::clone(&resolver);
		async move { handle_signup(&resolver, event).await }
	}))
	.await
}

async fn decide(event: PathBuf, directory: PathBuf, config: Option<PathBuf>) -> Result<(), Error> {
	let config = match config {
		Some(path) => s2s_common_config::load_config_with_file(path)?,
		None => s2s_common_config::load_config()?,
	};
	init_tracing(&config.logging);

	let result = dry_run_files(&event, &directory, config.link_policy()).await?;

	eprintln!("outcome: {}", result.outcome.as_str());
	for call in &result.link_calls {
		eprintln!(
			"would link {} to {} in {}",
			call.identity, call.destination_username, call.user_pool_id
		);
	}
	println!("{}", serde_json::to_string_pretty(&result.event)?);
	Ok(())
}
