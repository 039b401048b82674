// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Audit logging for authorization decisions.
//!
//! An [`AuditSink`] attached to a [`PolicyRegistry`](crate::PolicyRegistry)
//! receives an [`AuditLogEntry`] for every decision its abilities make.
//! Denials are recorded whenever auditing is enabled; grants only when
//! [`AuditSettings::record_grants`] is set. The sink runs after the decision
//! is computed and cannot change it.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use saas_auth_config::{AuditConfig, AuditTarget};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::abac::{Decision, SubjectRef, SubjectType};
use crate::types::{Action, Role, UserId};

/// Types of events recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
	/// Access to a resource was granted.
	AccessGranted,
	/// Access to a resource was denied.
	AccessDenied,
}

impl std::fmt::Display for AuditEventType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let s = match self {
			AuditEventType::AccessGranted => "access_granted",
			AuditEventType::AccessDenied => "access_denied",
		};
		write!(f, "{s}")
	}
}

/// A recorded authorization decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
	pub id: Uuid,
	pub timestamp: DateTime<Utc>,
	pub event_type: AuditEventType,
	pub actor_user_id: UserId,
	pub role: Role,
	pub action: Action,
	pub resource_type: SubjectType,
	/// Set when the decision was about a concrete instance.
	pub resource_id: Option<String>,
	/// Matched rule counts and other decision details.
	pub details: serde_json::Value,
}

impl AuditLogEntry {
	pub fn builder(
		event_type: AuditEventType,
		actor: UserId,
		role: Role,
		action: Action,
	) -> AuditLogBuilder {
		AuditLogBuilder::new(event_type, actor, role, action)
	}
}

/// Builder for constructing audit log entries with a fluent API.
#[derive(Debug, Clone)]
pub struct AuditLogBuilder {
	event_type: AuditEventType,
	actor_user_id: UserId,
	role: Role,
	action: Action,
	resource_type: SubjectType,
	resource_id: Option<String>,
	details: serde_json::Value,
}

impl AuditLogBuilder {
	pub fn new(event_type: AuditEventType, actor: UserId, role: Role, action: Action) -> Self {
		Self {
			event_type,
			actor_user_id: actor,
			role,
			action,
			resource_type: SubjectType::All,
			resource_id: None,
			details: serde_json::Value::Null,
		}
	}

	/// Set the resource type and, for instances, its id.
	pub fn resource(mut self, resource_type: SubjectType, resource_id: Option<String>) -> Self {
		self.resource_type = resource_type;
		self.resource_id = resource_id;
		self
	}

	/// Set additional event-specific details.
	pub fn details(mut self, details: serde_json::Value) -> Self {
		self.details = details;
		self
	}

	pub fn build(self) -> AuditLogEntry {
		AuditLogEntry {
			id: Uuid::new_v4(),
			timestamp: Utc::now(),
			event_type: self.event_type,
			actor_user_id: self.actor_user_id,
			role: self.role,
			action: self.action,
			resource_type: self.resource_type,
			resource_id: self.resource_id,
			details: self.details,
		}
	}
}

/// Destination for audit entries.
pub trait AuditSink: Send + Sync {
	fn record(&self, entry: AuditLogEntry);
}

/// Emits each entry as an `info` tracing event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
	fn record(&self, entry: AuditLogEntry) {
		info!(
			audit_id = %entry.id,
			event_type = %entry.event_type,
			actor_user_id = %entry.actor_user_id,
			role = %entry.role,
			action = %entry.action,
			resource_type = %entry.resource_type,
			resource_id = entry.resource_id.as_deref().unwrap_or("-"),
			"authorization decision"
		);
	}
}

/// Keeps entries in memory.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
	entries: Mutex<Vec<AuditLogEntry>>,
}

impl MemoryAuditSink {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn entries(&self) -> Vec<AuditLogEntry> {
		self.entries
			.lock()
			.unwrap_or_else(|poisoned| poisoned.into_inner())
			.clone()
	}
}

impl AuditSink for MemoryAuditSink {
	fn record(&self, entry: AuditLogEntry) {
		self.entries
			.lock()
			.unwrap_or_else(|poisoned| poisoned.into_inner())
			.push(entry);
	}
}

/// Which decisions reach the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditSettings {
	pub enabled: bool,
	pub record_grants: bool,
}

impl Default for AuditSettings {
	fn default() -> Self {
		Self {
			enabled: true,
			record_grants: false,
		}
	}
}

impl From<&AuditConfig> for AuditSettings {
	fn from(config: &AuditConfig) -> Self {
		Self {
			enabled: config.enabled && config.target != AuditTarget::None,
			record_grants: config.record_grants,
		}
	}
}

/// A sink paired with its settings, as carried by abilities.
#[derive(Clone)]
pub(crate) struct AuditHook {
	sink: Arc<dyn AuditSink>,
	settings: AuditSettings,
}

impl AuditHook {
	pub(crate) fn new(sink: Arc<dyn AuditSink>, settings: AuditSettings) -> Self {
		Self { sink, settings }
	}

	pub(crate) fn observe(
		&self,
		actor: UserId,
		role: Role,
		action: Action,
		subject: SubjectRef<'_>,
		decision: &Decision,
	) {
		if !self.settings.enabled || (decision.allowed && !self.settings.record_grants) {
			return;
		}

		let event_type = if decision.allowed {
			AuditEventType::AccessGranted
		} else {
			AuditEventType::AccessDenied
		};

		let entry = AuditLogEntry::builder(event_type, actor, role, action)
			.resource(
				decision.subject_type,
				subject.instance().and_then(|s| s.id()),
			)
			.details(serde_json::json!({
				"matched_grants": decision.matched_grants,
				"matched_denies": decision.matched_denies,
			}))
			.build();

		self.sink.record(entry);
	}
}
