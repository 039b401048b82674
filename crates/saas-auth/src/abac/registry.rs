// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Policy registry: the mapping from role to rule declaration.
//!
//! The registry is the single place that says what each role can do. It
//! compiles a role's declaration into an [`Ability`] for one actor.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use saas_auth_config::{AuditTarget, AuthConfig};
use tracing::{instrument, warn};

use super::engine::Ability;
use super::policies;
use super::rule::Rule;
use crate::audit::{AuditHook, AuditSettings, AuditSink, TracingAuditSink};
use crate::error::{AuthzError, Result};
use crate::types::{Role, UserId};

/// A role's rule declaration.
///
/// Declarations are pure: the actor id may parameterize conditions but never
/// changes which rules are emitted.
pub type Declaration = fn(UserId) -> Vec<Rule>;

#[derive(Clone, Default)]
pub struct PolicyRegistry {
	declarations: HashMap<Role, Declaration>,
	audit: Option<AuditHook>,
}

impl PolicyRegistry {
	/// Creates a registry with no declarations.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a registry holding the standard declaration for every role.
	pub fn standard() -> Self {
		let mut registry = Self::new();
		for role in Role::all() {
			registry.register_role(*role, policies::declaration_for(*role));
		}
		registry
	}

	/// Standard registry with auditing wired per `config`.
	pub fn from_config(config: &AuthConfig) -> Self {
		let registry = Self::standard();
		match config.audit.target {
			AuditTarget::Tracing => registry.with_audit(
				Arc::new(TracingAuditSink),
				AuditSettings::from(&config.audit),
			),
			AuditTarget::None => registry,
		}
	}

	/// Registers (or replaces) the declaration for `role`.
	pub fn register_role(&mut self, role: Role, declaration: Declaration) -> &mut Self {
		self.declarations.insert(role, declaration);
		self
	}

	/// Builder: attach an audit sink to every ability built from here on.
	pub fn with_audit(mut self, sink: Arc<dyn AuditSink>, settings: AuditSettings) -> Self {
		self.audit = Some(AuditHook::new(sink, settings));
		self
	}

	pub fn declaration(&self, role: Role) -> Option<Declaration> {
		self.declarations.get(&role).copied()
	}

	/// Checks that every role has a declaration.
	///
	/// Meant to run once at startup so a gap fails loudly instead of looking
	/// like an intentional deny.
	pub fn validate(&self) -> Result<()> {
		match Role::all().iter().find(|role| !self.declarations.contains_key(*role)) {
			Some(role) => {
				warn!(role = %role, "role has no policy declaration");
				Err(AuthzError::UndefinedRolePolicy(role.to_string()))
			}
			None => Ok(()),
		}
	}

	/// Lists the rules `role` would compile to for `actor`.
	pub fn rules_for(&self, role: Role, actor: UserId) -> Result<Vec<Rule>> {
		let declaration = self.declaration(role).ok_or_else(|| {
			warn!(role = %role, "role has no policy declaration");
			AuthzError::UndefinedRolePolicy(role.to_string())
		})?;
		Ok(declaration(actor))
	}

	/// Compiles the ability of `actor` acting as `role`.
	#[instrument(level = "debug", skip(self), fields(actor = %actor, role = %role))]
	pub fn build_ability(&self, actor: UserId, role: Role) -> Result<Ability> {
		let rules = self.rules_for(role, actor)?;
		Ok(Ability::new(actor, role, rules).with_audit(self.audit.clone()))
	}

	/// Like [`build_ability`](Self::build_ability) for a role name taken from
	/// the store; names outside the role enumeration have no policy.
	pub fn build_ability_for(&self, actor: UserId, role: &str) -> Result<Ability> {
		let role: Role = role.parse().map_err(|_| {
			warn!(role = %role, "role has no policy declaration");
			AuthzError::UndefinedRolePolicy(role.to_string())
		})?;
		self.build_ability(actor, role)
	}
}

impl fmt::Debug for PolicyRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut roles: Vec<_> = self.declarations.keys().collect();
		roles.sort_by_key(|r| r.as_str());
		f.debug_struct("PolicyRegistry")
			.field("roles", &roles)
			.field("audit", &self.audit.is_some())
			.finish()
	}
}

fn standard_registry() -> &'static PolicyRegistry {
	static REGISTRY: OnceLock<PolicyRegistry> = OnceLock::new();
	REGISTRY.get_or_init(PolicyRegistry::standard)
}

/// Compiles `actor`'s ability under the standard policy table.
pub fn define_ability_for(actor: UserId, role: Role) -> Result<Ability> {
	standard_registry().build_ability(actor, role)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::abac::SubjectType;
	use crate::types::Action;

	fn billing_gets_everything(_actor: UserId) -> Vec<Rule> {
		vec![Rule::grant([Action::Manage], SubjectType::All)]
	}

	mod validation {
		use super::*;

		#[test]
		fn standard_registry_is_complete() {
			assert!(PolicyRegistry::standard().validate().is_ok());
		}

		#[test]
		fn empty_registry_fails_validation() {
			let err = PolicyRegistry::new().validate().unwrap_err();
			assert!(matches!(err, AuthzError::UndefinedRolePolicy(_)));
		}

		#[test]
		fn missing_role_is_named() {
			let mut registry = PolicyRegistry::new();
			registry
				.register_role(Role::Admin, policies::org::admin)
				.register_role(Role::Member, policies::org::member);
			let err = registry.validate().unwrap_err();
			assert!(matches!(err, AuthzError::UndefinedRolePolicy(ref r) if r == "BILLING"));
		}
	}

	mod build {
		use super::*;

		#[test]
		fn unregistered_role_is_an_error() {
			let mut registry = PolicyRegistry::new();
			registry.register_role(Role::Admin, policies::org::admin);
			let err = registry
				.build_ability(UserId::generate(), Role::Member)
				.unwrap_err();
			assert!(matches!(err, AuthzError::UndefinedRolePolicy(ref r) if r == "MEMBER"));
		}

		#[test]
		fn unknown_role_name_is_an_error() {
			let err = PolicyRegistry::standard()
				.build_ability_for(UserId::generate(), "GUEST")
				.unwrap_err();
			assert!(matches!(err, AuthzError::UndefinedRolePolicy(ref r) if r == "GUEST"));
		}

		#[test]
		fn known_role_name_builds() {
			let actor = UserId::generate();
			let ability = PolicyRegistry::standard()
				.build_ability_for(actor, "BILLING")
				.unwrap();
			assert_eq!(ability.role(), Role::Billing);
			assert_eq!(ability.actor(), actor);
		}

		#[test]
		fn ability_carries_declared_rules() {
			let actor = UserId::generate();
			let ability = define_ability_for(actor, Role::Member).unwrap();
			assert_eq!(ability.rules(), policies::org::member(actor).as_slice());
		}
	}

	mod isolation {
		use super::*;

		#[test]
		fn replacing_one_role_leaves_others_untouched() {
			let actor = UserId::generate();
			let standard = PolicyRegistry::standard();
			let mut altered = PolicyRegistry::standard();
			altered.register_role(Role::Billing, billing_gets_everything);

			for role in [Role::Admin, Role::Member] {
				assert_eq!(
					standard.rules_for(role, actor).unwrap(),
					altered.rules_for(role, actor).unwrap()
				);
			}
			assert_ne!(
				standard.rules_for(Role::Billing, actor).unwrap(),
				altered.rules_for(Role::Billing, actor).unwrap()
			);
		}
	}

	#[test]
	fn from_config_attaches_audit() {
		let config = AuthConfig::default();
		let registry = PolicyRegistry::from_config(&config);
		assert!(registry.audit.is_some());
		assert!(registry.validate().is_ok());

		let mut config = AuthConfig::default();
		config.audit.target = AuditTarget::None;
		assert!(PolicyRegistry::from_config(&config).audit.is_none());
	}

	#[test]
	fn debug_lists_roles() {
		let rendered = format!("{:?}", PolicyRegistry::standard());
		assert!(rendered.contains("Admin"));
		assert!(rendered.contains("Billing"));
	}
}
