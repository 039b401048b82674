// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ability compilation output and the rule evaluator.
//!
//! [`evaluate`] is the matching algorithm:
//!
//! 1. Resolve the subject type (a bare type, or an instance's tag)
//! 2. Keep rules declared on that type or on `all`
//! 3. Keep rules listing the action, or `manage`
//! 4. Evaluate every remaining rule's condition
//! 5. Allow iff at least one grant survives and no deny does
//!
//! No matching rule means deny. Deny wins over grant regardless of the order
//! the rules were declared in.

use std::fmt;

use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::rule::{Effect, Rule};
use super::subject::{classify_subject, Subject, SubjectRef, SubjectType};
use crate::audit::AuditHook;
use crate::error::{AuthzError, Result};
use crate::types::{Action, Role, UserId};

/// Outcome of evaluating one query against a rule list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Decision {
	pub allowed: bool,
	pub subject_type: SubjectType,
	/// Grants whose action, subject and condition all matched.
	pub matched_grants: usize,
	/// Denies whose action, subject and condition all matched.
	pub matched_denies: usize,
}

/// Evaluates `action` on `subject` for `actor` against `rules`.
///
/// Pure and total: every candidate rule's condition is evaluated, there is no
/// short-circuit on the first match.
pub fn evaluate(
	rules: &[Rule],
	actor: UserId,
	action: Action,
	subject: SubjectRef<'_>,
) -> Decision {
	let subject_type = classify_subject(subject);

	let (matched_grants, matched_denies) = rules
		.iter()
		.filter(|rule| rule.matches_subject_type(subject_type))
		.filter(|rule| rule.matches_action(action))
		.filter(|rule| rule.condition_holds(subject, actor))
		.fold((0, 0), |(grants, denies), rule| match rule.effect {
			Effect::Grant => (grants + 1, denies),
			Effect::Deny => (grants, denies + 1),
		});

	Decision {
		allowed: matched_grants > 0 && matched_denies == 0,
		subject_type,
		matched_grants,
		matched_denies,
	}
}

/// The compiled rules of one actor acting under one role.
///
/// Built per authorization context by
/// [`PolicyRegistry::build_ability`](crate::PolicyRegistry::build_ability)
/// and never mutated afterwards.
#[derive(Clone)]
pub struct Ability {
	actor: UserId,
	role: Role,
	rules: Vec<Rule>,
	audit: Option<AuditHook>,
}

impl Ability {
	pub fn new(actor: UserId, role: Role, rules: Vec<Rule>) -> Self {
		Self {
			actor,
			role,
			rules,
			audit: None,
		}
	}

	pub(crate) fn with_audit(mut self, audit: Option<AuditHook>) -> Self {
		self.audit = audit;
		self
	}

	pub fn actor(&self) -> UserId {
		self.actor
	}

	pub fn role(&self) -> Role {
		self.role
	}

	pub fn rules(&self) -> &[Rule] {
		&self.rules
	}

	/// Evaluates a query and reports how many rules matched.
	#[instrument(
		level = "debug",
		skip(self, subject),
		fields(actor = %self.actor, role = %self.role, action = %action)
	)]
	pub fn decide<'a>(&self, action: Action, subject: impl Into<SubjectRef<'a>>) -> Decision {
		let subject = subject.into();
		let decision = evaluate(&self.rules, self.actor, action, subject);

		debug!(
			subject_type = %decision.subject_type,
			allowed = decision.allowed,
			matched_grants = decision.matched_grants,
			matched_denies = decision.matched_denies,
			"authorization decision"
		);

		if let Some(audit) = &self.audit {
			audit.observe(self.actor, self.role, action, subject, &decision);
		}

		decision
	}

	pub fn can<'a>(&self, action: Action, subject: impl Into<SubjectRef<'a>>) -> bool {
		self.decide(action, subject).allowed
	}

	/// Exactly `!can(action, subject)`.
	pub fn cannot<'a>(&self, action: Action, subject: impl Into<SubjectRef<'a>>) -> bool {
		!self.can(action, subject)
	}

	/// Decodes a store record and evaluates `action` on it.
	///
	/// Records with an unknown discriminant fail with
	/// [`AuthzError::UnknownSubjectType`] rather than evaluating to false.
	pub fn can_record(&self, action: Action, record: &serde_json::Value) -> Result<bool> {
		let subject = Subject::from_record(record.clone()).inspect_err(|err| {
			if let AuthzError::UnknownSubjectType(tag) = err {
				warn!(actor = %self.actor, tag = %tag, "rejected subject with unknown type");
			}
		})?;
		Ok(self.can(action, &subject))
	}

	pub fn cannot_record(&self, action: Action, record: &serde_json::Value) -> Result<bool> {
		self.can_record(action, record).map(|allowed| !allowed)
	}

	/// Returns [`AuthzError::Forbidden`] when the query is denied.
	pub fn authorize<'a>(&self, action: Action, subject: impl Into<SubjectRef<'a>>) -> Result<()> {
		let decision = self.decide(action, subject);
		if decision.allowed {
			Ok(())
		} else {
			Err(AuthzError::Forbidden {
				action,
				subject_type: decision.subject_type,
			})
		}
	}
}

impl fmt::Debug for Ability {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Ability")
			.field("actor", &self.actor)
			.field("role", &self.role)
			.field("rules", &self.rules)
			.finish_non_exhaustive()
	}
}
