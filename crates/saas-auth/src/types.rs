// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core type definitions for authorization.
//!
//! - **ID newtypes**: Type-safe wrappers around UUIDs for the entities the
//!   policy engine reasons about ([`UserId`], [`OrgId`], [`ProjectId`], [`InviteId`])
//! - **Roles**: The closed set of organization membership roles ([`Role`])
//! - **Actions**: The closed set of operations a rule can grant or deny ([`Action`])
//!
//! All ID types implement transparent serde serialization (as UUID strings) and
//! provide conversion to/from [`uuid::Uuid`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// =============================================================================
// ID Newtypes
// =============================================================================

macro_rules! define_id_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(Uuid);

		impl $name {
			/// Create a new ID from a UUID.
			pub fn new(id: Uuid) -> Self {
				Self(id)
			}

			/// Generate a new random ID.
			pub fn generate() -> Self {
				Self(Uuid::new_v4())
			}

			/// Get the inner UUID value.
			pub fn into_inner(self) -> Uuid {
				self.0
			}

			/// Get a reference to the inner UUID.
			pub fn as_uuid(&self) -> &Uuid {
				&self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl From<Uuid> for $name {
			fn from(id: Uuid) -> Self {
				Self(id)
			}
		}

		impl From<$name> for Uuid {
			fn from(id: $name) -> Self {
				id.0
			}
		}
	};
}

define_id_type!(UserId, "Unique identifier for a user.");
define_id_type!(OrgId, "Unique identifier for an organization.");
define_id_type!(ProjectId, "Unique identifier for a project.");
define_id_type!(InviteId, "Unique identifier for an invite.");

// =============================================================================
// Roles
// =============================================================================

/// Roles an actor holds within an organization.
///
/// Every variant must have a policy declaration; see
/// [`PolicyRegistry::standard`](crate::PolicyRegistry::standard).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
	/// Full control over every resource in the organization.
	Admin,
	/// Standard member; mutates only what they own.
	Member,
	/// Billing contact; sees billing and nothing else.
	Billing,
}

impl Role {
	/// Returns all available roles.
	pub fn all() -> &'static [Role] {
		&[Role::Admin, Role::Member, Role::Billing]
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Role::Admin => "ADMIN",
			Role::Member => "MEMBER",
			Role::Billing => "BILLING",
		}
	}
}

impl fmt::Display for Role {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Error returned when a role name is not one of [`Role::all`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
	type Err = UnknownRole;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"ADMIN" => Ok(Role::Admin),
			"MEMBER" => Ok(Role::Member),
			"BILLING" => Ok(Role::Billing),
			other => Err(UnknownRole(other.to_string())),
		}
	}
}

// =============================================================================
// Actions
// =============================================================================

/// Operations that rules grant or deny.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
	/// Wildcard: subsumes every other action on a matching subject.
	Manage,
	Get,
	Create,
	Update,
	Delete,
	Invite,
	TransferOwnership,
}

impl Action {
	/// Returns all available actions.
	pub fn all() -> &'static [Action] {
		&[
			Action::Manage,
			Action::Get,
			Action::Create,
			Action::Update,
			Action::Delete,
			Action::Invite,
			Action::TransferOwnership,
		]
	}

	/// Returns true if a rule listing `self` covers a request for `requested`.
	pub fn subsumes(&self, requested: Action) -> bool {
		*self == Action::Manage || *self == requested
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Action::Manage => "manage",
			Action::Get => "get",
			Action::Create => "create",
			Action::Update => "update",
			Action::Delete => "delete",
			Action::Invite => "invite",
			Action::TransferOwnership => "transfer_ownership",
		}
	}
}

impl fmt::Display for Action {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
