// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization policy engine for the SaaS API.
//!
//! Decides, for an actor holding a role in an organization, whether an action
//! on a resource is permitted. Each role's rules are declared once in the
//! [`PolicyRegistry`]; per request the registry compiles an [`Ability`] for
//! the actor, which answers [`Ability::can`] and [`Ability::cannot`].
//!
//! # Example
//!
//! ```
//! use saas_auth::{define_ability_for, Action, OrgId, ProjectId, Role, Subject, SubjectType, UserId};
//!
//! let actor = UserId::generate();
//! let ability = define_ability_for(actor, Role::Member).unwrap();
//!
//! let project = Subject::Project {
//!     id: ProjectId::generate(),
//!     owner_id: actor,
//!     organization_id: OrgId::generate(),
//! };
//!
//! assert!(ability.can(Action::Delete, &project));
//! assert!(ability.cannot(Action::Get, SubjectType::Billing));
//! ```
//!
//! The engine never raises a denial itself; callers map `cannot(..) == true`
//! to their access-denied response. Only integration mistakes are errors:
//! [`AuthzError::UndefinedRolePolicy`] and [`AuthzError::UnknownSubjectType`].

pub mod abac;
pub mod audit;
pub mod error;
pub mod types;

pub use abac::{
	classify_record, classify_subject, define_ability_for, evaluate, Ability, Condition, Decision,
	Declaration, Effect, PolicyRegistry, Rule, Subject, SubjectRef, SubjectType,
};
pub use audit::{
	AuditEventType, AuditLogBuilder, AuditLogEntry, AuditSettings, AuditSink, MemoryAuditSink,
	TracingAuditSink,
};
pub use error::{AuthzError, Result};
pub use types::{Action, InviteId, OrgId, ProjectId, Role, UnknownRole, UserId};

