// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Subjects: the resources protected by the policy engine.
//!
//! A query names its subject either by type ([`SubjectType`]) or by passing a
//! concrete instance ([`Subject`]). Instances are tagged variants carrying
//! only the attributes conditions look at, and are built from store records
//! through [`Subject::from_record`], which validates the discriminant before
//! anything reaches the evaluator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AuthzError, Result};
use crate::types::{InviteId, OrgId, ProjectId, Role, UserId};

/// Field carrying the subject discriminant on store records.
pub const TYPENAME_FIELD: &str = "__typename";

/// Closed set of subject types, plus the `all` wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubjectType {
	User,
	Project,
	Organization,
	Invite,
	Billing,
	/// Matches every subject type. Never the type of an instance.
	#[serde(rename = "all")]
	All,
}

impl SubjectType {
	/// Returns all concrete (non-wildcard) subject types.
	pub fn concrete() -> &'static [SubjectType] {
		&[
			SubjectType::User,
			SubjectType::Project,
			SubjectType::Organization,
			SubjectType::Invite,
			SubjectType::Billing,
		]
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			SubjectType::User => "User",
			SubjectType::Project => "Project",
			SubjectType::Organization => "Organization",
			SubjectType::Invite => "Invite",
			SubjectType::Billing => "Billing",
			SubjectType::All => "all",
		}
	}

	/// Returns true if a rule declared on `self` applies to `requested`.
	pub fn covers(&self, requested: SubjectType) -> bool {
		*self == SubjectType::All || *self == requested
	}
}

impl fmt::Display for SubjectType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for SubjectType {
	type Err = AuthzError;

	fn from_str(s: &str) -> Result<Self> {
		match s {
			"User" => Ok(SubjectType::User),
			"Project" => Ok(SubjectType::Project),
			"Organization" => Ok(SubjectType::Organization),
			"Invite" => Ok(SubjectType::Invite),
			"Billing" => Ok(SubjectType::Billing),
			"all" => Ok(SubjectType::All),
			other => Err(AuthzError::UnknownSubjectType(other.to_string())),
		}
	}
}

/// A concrete resource instance, as loaded from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "__typename", rename_all_fields = "camelCase")]
pub enum Subject {
	User {
		id: UserId,
		/// Membership role in the organization being checked, when known.
		#[serde(default)]
		role: Option<Role>,
	},
	Project {
		id: ProjectId,
		owner_id: UserId,
		organization_id: OrgId,
	},
	Organization {
		id: OrgId,
		owner_id: UserId,
	},
	Invite {
		id: InviteId,
		organization_id: OrgId,
		#[serde(default)]
		author_id: Option<UserId>,
	},
	Billing {
		organization_id: OrgId,
	},
}

impl Subject {
	/// Builds a subject from a store record, validating its discriminant.
	///
	/// Unknown (or missing) `__typename` values fail with
	/// [`AuthzError::UnknownSubjectType`]; a known type whose attributes are
	/// missing or malformed fails with [`AuthzError::InvalidSubject`].
	pub fn from_record(record: serde_json::Value) -> Result<Self> {
		let subject_type = classify_record(&record)?;
		if subject_type == SubjectType::All {
			return Err(AuthzError::UnknownSubjectType(subject_type.to_string()));
		}

		serde_json::from_value(record).map_err(|source| AuthzError::InvalidSubject {
			subject_type,
			source,
		})
	}

	pub fn subject_type(&self) -> SubjectType {
		match self {
			Subject::User { .. } => SubjectType::User,
			Subject::Project { .. } => SubjectType::Project,
			Subject::Organization { .. } => SubjectType::Organization,
			Subject::Invite { .. } => SubjectType::Invite,
			Subject::Billing { .. } => SubjectType::Billing,
		}
	}

	/// String form of the instance id, if the subject has one of its own.
	pub fn id(&self) -> Option<String> {
		match self {
			Subject::User { id, .. } => Some(id.to_string()),
			Subject::Project { id, .. } => Some(id.to_string()),
			Subject::Organization { id, .. } => Some(id.to_string()),
			Subject::Invite { id, .. } => Some(id.to_string()),
			Subject::Billing { .. } => None,
		}
	}

	/// The user who owns this subject.
	///
	/// Projects and organizations have an explicit owner, an invite is owned
	/// by its author and a user owns itself.
	pub fn owner_id(&self) -> Option<UserId> {
		match self {
			Subject::User { id, .. } => Some(*id),
			Subject::Project { owner_id, .. } => Some(*owner_id),
			Subject::Organization { owner_id, .. } => Some(*owner_id),
			Subject::Invite { author_id, .. } => *author_id,
			Subject::Billing { .. } => None,
		}
	}

	pub fn organization_id(&self) -> Option<OrgId> {
		match self {
			Subject::User { .. } => None,
			Subject::Project {
				organization_id, ..
			} => Some(*organization_id),
			Subject::Organization { id, .. } => Some(*id),
			Subject::Invite {
				organization_id, ..
			} => Some(*organization_id),
			Subject::Billing { organization_id } => Some(*organization_id),
		}
	}
}

/// Reads and validates the discriminant of a store record.
pub fn classify_record(record: &serde_json::Value) -> Result<SubjectType> {
	match record.get(TYPENAME_FIELD) {
		Some(serde_json::Value::String(tag)) => tag.parse(),
		Some(other) => Err(AuthzError::UnknownSubjectType(other.to_string())),
		None => Err(AuthzError::UnknownSubjectType(format!(
			"<missing {TYPENAME_FIELD}>"
		))),
	}
}

/// The subject argument of a query: a bare type or a concrete instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectRef<'a> {
	Type(SubjectType),
	Instance(&'a Subject),
}

impl SubjectRef<'_> {
	pub fn instance(&self) -> Option<&Subject> {
		match self {
			SubjectRef::Type(_) => None,
			SubjectRef::Instance(subject) => Some(subject),
		}
	}
}

impl From<SubjectType> for SubjectRef<'_> {
	fn from(subject_type: SubjectType) -> Self {
		SubjectRef::Type(subject_type)
	}
}

impl<'a> From<&'a Subject> for SubjectRef<'a> {
	fn from(subject: &'a Subject) -> Self {
		SubjectRef::Instance(subject)
	}
}

/// Resolves the type a query's subject is matched under.
pub fn classify_subject(subject: SubjectRef<'_>) -> SubjectType {
	match subject {
		SubjectRef::Type(subject_type) => subject_type,
		SubjectRef::Instance(instance) => instance.subject_type(),
	}
}
