// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;

use crate::abac::SubjectType;
use crate::types::Action;

pub type Result<T> = std::result::Result<T, AuthzError>;

#[derive(Debug, Error)]
pub enum AuthzError {
	#[error("permissions for role {0} were not found")]
	UndefinedRolePolicy(String),

	#[error("unknown subject type: {0}")]
	UnknownSubjectType(String),

	#[error("invalid {subject_type} subject: {source}")]
	InvalidSubject {
		subject_type: SubjectType,
		#[source]
		source: serde_json::Error,
	},

	#[error("not allowed to {action} {subject_type}")]
	Forbidden {
		action: Action,
		subject_type: SubjectType,
	},
}

impl AuthzError {
	/// Returns true for integration mistakes (missing policy, malformed
	/// subject) as opposed to an ordinary denial.
	pub fn is_configuration_error(&self) -> bool {
		!matches!(self, AuthzError::Forbidden { .. })
	}
}
