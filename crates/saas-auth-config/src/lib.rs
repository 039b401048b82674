// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the SaaS authorization engine.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`SAAS_AUTH_*`)
//!
//! # Usage
//!
//! ```ignore
//! use saas_auth_config::load_config;
//!
//! let config = load_config()?;
//! println!("auditing decisions: {}", config.audit.enabled);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::AuthConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved authorization configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthConfig {
	pub audit: AuditConfig,
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`SAAS_AUTH_*`)
/// 2. Config file (`/etc/saas/auth.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<AuthConfig, ConfigError> {
	let sources: Vec<Box<dyn ConfigSource>> = vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	];
	load_from_sources(sources)
}

/// Load configuration from environment only (for testing or simple deployments).
pub fn load_config_from_env() -> Result<AuthConfig, ConfigError> {
	let sources: Vec<Box<dyn ConfigSource>> = vec![Box::new(EnvSource)];
	load_from_sources(sources)
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<AuthConfig, ConfigError> {
	let sources: Vec<Box<dyn ConfigSource>> = vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	];
	load_from_sources(sources)
}

/// Merge `sources` in precedence order and finalize the result.
pub fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<AuthConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = AuthConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
fn finalize(layer: AuthConfigLayer) -> Result<AuthConfig, ConfigError> {
	let audit = layer.audit.unwrap_or_default().finalize();

	validate_config(&audit)?;

	info!(
		audit_enabled = audit.enabled,
		audit_record_grants = audit.record_grants,
		audit_target = %audit.target,
		"Authorization configuration loaded"
	);

	Ok(AuthConfig { audit })
}

/// Validate cross-field configuration rules.
fn validate_config(audit: &AuditConfig) -> Result<(), ConfigError> {
	if audit.record_grants && (!audit.enabled || audit.target == AuditTarget::None) {
		return Err(ConfigError::Validation(
			"audit.record_grants is set but auditing is disabled. Enable auditing or unset \
			 record_grants."
				.to_string(),
		));
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	struct FixedSource(Precedence, AuthConfigLayer);

	impl ConfigSource for FixedSource {
		fn name(&self) -> &'static str {
			"fixed"
		}

		fn precedence(&self) -> Precedence {
			self.0
		}

		fn load(&self) -> Result<AuthConfigLayer, ConfigError> {
			Ok(self.1.clone())
		}
	}

	fn audit_layer(enabled: Option<bool>, record_grants: Option<bool>) -> AuthConfigLayer {
		AuthConfigLayer {
			audit: Some(AuditConfigLayer {
				enabled,
				record_grants,
				target: None,
			}),
		}
	}

	#[test]
	fn defaults_only() {
		let sources: Vec<Box<dyn ConfigSource>> = vec![Box::new(DefaultsSource)];
		let config = load_from_sources(sources).unwrap();
		assert_eq!(config, AuthConfig::default());
	}

	#[test]
	fn higher_precedence_wins_regardless_of_order() {
		let sources: Vec<Box<dyn ConfigSource>> = vec![
			Box::new(FixedSource(
				Precedence::Environment,
				audit_layer(Some(false), None),
			)),
			Box::new(FixedSource(
				Precedence::ConfigFile,
				audit_layer(Some(true), Some(false)),
			)),
		];
		let config = load_from_sources(sources).unwrap();
		assert!(!config.audit.enabled);
		assert!(!config.audit.record_grants);
	}

	#[test]
	fn file_values_survive_when_environment_is_silent() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[audit]\nrecord_grants = true").unwrap();

		let sources: Vec<Box<dyn ConfigSource>> = vec![
			Box::new(DefaultsSource),
			Box::new(TomlSource::new(file.path())),
			Box::new(FixedSource(Precedence::Environment, AuthConfigLayer::default())),
		];
		let config = load_from_sources(sources).unwrap();
		assert!(config.audit.enabled);
		assert!(config.audit.record_grants);
	}

	#[test]
	fn record_grants_requires_auditing() {
		let sources: Vec<Box<dyn ConfigSource>> = vec![Box::new(FixedSource(
			Precedence::ConfigFile,
			audit_layer(Some(false), Some(true)),
		))];
		let err = load_from_sources(sources).unwrap_err();
		assert!(matches!(err, ConfigError::Validation(_)));
	}

	#[test]
	fn record_grants_with_target_none_is_rejected() {
		let audit = AuditConfig {
			enabled: true,
			record_grants: true,
			target: AuditTarget::None,
		};
		assert!(validate_config(&audit).is_err());
	}
}
