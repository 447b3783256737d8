// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use s2s_common_config::{LogFormat, LoggingConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level. JSON output carries no
/// timestamp or colour since CloudWatch stamps each line itself.
pub fn init_tracing(config: &LoggingConfig) {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
	let registry = tracing_subscriber::registry().with(filter);

	match config.format {
		LogFormat::Json => registry
			.with(
				fmt::layer()
					.json()
					.with_ansi(false)
					.without_time()
					.with_target(false)
					.with_current_span(true),
			)
			.init(),
		LogFormat::Pretty => registry.with(fmt::layer().with_target(false)).init(),
	}
}
