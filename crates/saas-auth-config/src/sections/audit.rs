// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Decision audit configuration section.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Where audited decisions are sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuditTarget {
	/// Emit each decision as a tracing event.
	#[default]
	Tracing,
	/// Do not audit.
	None,
}

impl FromStr for AuditTarget {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"tracing" => Ok(AuditTarget::Tracing),
			"none" => Ok(AuditTarget::None),
			other => Err(format!("unknown audit target '{other}'")),
		}
	}
}

impl fmt::Display for AuditTarget {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			AuditTarget::Tracing => write!(f, "tracing"),
			AuditTarget::None => write!(f, "none"),
		}
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AuditConfigLayer {
	pub enabled: Option<bool>,
	pub record_grants: Option<bool>,
	pub target: Option<AuditTarget>,
}

impl AuditConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.enabled.is_some() {
			self.enabled = other.enabled;
		}
		if other.record_grants.is_some() {
			self.record_grants = other.record_grants;
		}
		if other.target.is_some() {
			self.target = other.target;
		}
	}

	pub fn finalize(self) -> AuditConfig {
		AuditConfig {
			enabled: self.enabled.unwrap_or(true),
			record_grants: self.record_grants.unwrap_or(false),
			target: self.target.unwrap_or_default(),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditConfig {
	/// Record decisions at all.
	pub enabled: bool,
	/// Record grants as well as denials.
	pub record_grants: bool,
	pub target: AuditTarget,
}

impl Default for AuditConfig {
	fn default() -> Self {
		AuditConfigLayer::default().finalize()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_record_denials_via_tracing() {
		let config = AuditConfig::default();
		assert!(config.enabled);
		assert!(!config.record_grants);
		assert_eq!(config.target, AuditTarget::Tracing);
	}

	#[test]
	fn merge_overrides_set_fields_only() {
		let mut layer = AuditConfigLayer {
			enabled: Some(false),
			record_grants: Some(true),
			target: Some(AuditTarget::None),
		};
		layer.merge(AuditConfigLayer {
			target: Some(AuditTarget::Tracing),
			..Default::default()
		});
		let config = layer.finalize();
		assert!(!config.enabled);
		assert!(config.record_grants);
		assert_eq!(config.target, AuditTarget::Tracing);
	}

	#[test]
	fn target_parses_case_insensitively() {
		assert_eq!("TRACING".parse::<AuditTarget>(), Ok(AuditTarget::Tracing));
		assert_eq!("none".parse::<AuditTarget>(), Ok(AuditTarget::None));
		assert!("syslog".parse::<AuditTarget>().is_err());
	}

	#[test]
	fn target_deserializes_snake_case() {
		let layer: AuditConfigLayer = toml::from_str("target = \"none\"").unwrap();
		assert_eq!(layer.target, Some(AuditTarget::None));
	}
}
