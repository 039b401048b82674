// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: built-in defaults, a TOML file and the environment.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::AuthConfigLayer;
use crate::sections::{AuditConfigLayer, AuditTarget};

/// Default location of the config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/saas/auth.toml";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<AuthConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<AuthConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(AuthConfigLayer::default())
	}
}

/// TOML file configuration source.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new(SYSTEM_CONFIG_PATH)
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<AuthConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(AuthConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: AuthConfigLayer = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
			path: self.path.clone(),
			source: e,
		})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: SAAS_AUTH_<SECTION>_<FIELD>
pub struct EnvSource;

impl EnvSource {
	/// Builds a layer from an arbitrary variable lookup.
	pub fn load_from(
		lookup: impl Fn(&str) -> Option<String>,
	) -> Result<AuthConfigLayer, ConfigError> {
		let var = |name: &str| lookup(name).filter(|s| !s.is_empty());

		let target = match var("SAAS_AUTH_AUDIT_TARGET") {
			Some(v) => Some(v.parse::<AuditTarget>().map_err(|message| {
				ConfigError::InvalidValue {
					key: "SAAS_AUTH_AUDIT_TARGET".to_string(),
					message,
				}
			})?),
			None => None,
		};

		Ok(AuthConfigLayer {
			audit: Some(AuditConfigLayer {
				enabled: parse_bool("SAAS_AUTH_AUDIT_ENABLED", var("SAAS_AUTH_AUDIT_ENABLED"))?,
				record_grants: parse_bool(
					"SAAS_AUTH_AUDIT_RECORD_GRANTS",
					var("SAAS_AUTH_AUDIT_RECORD_GRANTS"),
				)?,
				target,
			}),
		})
	}
}

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<AuthConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Self::load_from(|name| std::env::var(name).ok())
	}
}

fn parse_bool(key: &str, value: Option<String>) -> Result<Option<bool>, ConfigError> {
	let Some(value) = value else {
		return Ok(None);
	};

	match value.to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Ok(Some(true)),
		"0" | "false" | "no" | "off" => Ok(Some(false)),
		_ => Err(ConfigError::InvalidValue {
			key: key.to_string(),
			message: format!("invalid boolean value '{value}'"),
		}),
	}
}
