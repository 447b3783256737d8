// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: built-in defaults, an optional TOML file, and
//! environment variables.

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ConfigLayer;
use crate::sections::{DirectoryConfigLayer, LinkingConfigLayer, LogFormat, LoggingConfigLayer};

/// Environment variable naming an optional TOML config file.
pub const CONFIG_FILE_ENV: &str = "S2S_CONFIG_FILE";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ConfigLayer, ConfigError>;
}

pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		Ok(ConfigLayer::default())
	}
}

/// TOML file source. A missing file contributes nothing.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	/// The file named by `S2S_CONFIG_FILE`, if set.
	pub fn from_env() -> Option<Self> {
		env_var(CONFIG_FILE_ENV).map(Self::new)
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ConfigLayer::default());
		}

		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ConfigLayer = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
			path: self.path.clone(),
			source: e,
		})?;

		trace!(path = %self.path.display(), "parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: `S2S_<FIELD>`. The unprefixed names the function was first
/// deployed with (`REQUIRE_VERIFIED_EMAIL`, `PRIMARY_PROVIDER`,
/// `LINKED_PROVIDER`) are read when the prefixed ones are absent.
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		layer_from_lookup(&env_var)
	}
}

type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

/// Read the first of `names` that is set.
fn first_of(lookup: Lookup<'_>, names: &[&str]) -> Option<(String, String)> {
	names.iter().copied().find_map(|name| {
		lookup(name)
			.filter(|v| !v.is_empty())
			.map(|v| (name.to_string(), v))
	})
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
	match value.trim().to_lowercase().as_str() {
		"true" | "1" | "yes" => Ok(true),
		"false" | "0" | "no" => Ok(false),
		other => Err(ConfigError::InvalidValue {
			key: key.to_string(),
			message: format!("invalid boolean value '{other}'"),
		}),
	}
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
	value.trim().parse().map_err(|_| ConfigError::InvalidValue {
		key: key.to_string(),
		message: format!("invalid u32 value '{value}'"),
	})
}

pub(crate) fn layer_from_lookup(lookup: Lookup<'_>) -> Result<ConfigLayer, ConfigError> {
	debug!("loading environment variables");
	Ok(ConfigLayer {
		linking: Some(load_linking(lookup)?),
		directory: Some(load_directory(lookup)?),
		logging: Some(load_logging(lookup)?),
	})
}

fn load_linking(lookup: Lookup<'_>) -> Result<LinkingConfigLayer, ConfigError> {
	let require_verified_email =
		match first_of(lookup, &["S2S_REQUIRE_VERIFIED_EMAIL", "REQUIRE_VERIFIED_EMAIL"]) {
			Some((key, value)) => Some(parse_bool(&key, &value)?),
			None => None,
		};

	Ok(LinkingConfigLayer {
		require_verified_email,
		primary_provider: first_of(lookup, &["S2S_PRIMARY_PROVIDER", "PRIMARY_PROVIDER"])
			.map(|(_, v)| v),
		linked_provider: first_of(lookup, &["S2S_LINKED_PROVIDER", "LINKED_PROVIDER"])
			.map(|(_, v)| v),
	})
}

fn load_directory(lookup: Lookup<'_>) -> Result<DirectoryConfigLayer, ConfigError> {
	let page_limit = match first_of(lookup, &["S2S_DIRECTORY_PAGE_LIMIT"]) {
		Some((key, value)) => Some(parse_u32(&key, &value)?),
		None => None,
	};

	Ok(DirectoryConfigLayer {
		page_limit,
		endpoint_url: first_of(lookup, &["S2S_DIRECTORY_ENDPOINT_URL"]).map(|(_, v)| v),
	})
}

fn load_logging(lookup: Lookup<'_>) -> Result<LoggingConfigLayer, ConfigError> {
	let format = match first_of(lookup, &["S2S_LOG_FORMAT"]) {
		Some((key, value)) => Some(LogFormat::parse(&value).ok_or_else(|| {
			ConfigError::InvalidValue {
				key,
				message: format!("unknown log format '{value}', expected json or pretty"),
			}
		})?),
		None => None,
	};

	Ok(LoggingConfigLayer {
		level: first_of(lookup, &["S2S_LOG_LEVEL"]).map(|(_, v)| v),
		format,
	})
}
