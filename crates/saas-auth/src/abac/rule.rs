// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Rule representation.
//!
//! A [`Rule`] is an immutable `(effect, actions, subject, condition)` value.
//! Conditions are data rather than closures so a role's rules can be listed,
//! compared and logged.

use serde::Serialize;
use std::fmt;

use super::subject::{Subject, SubjectRef, SubjectType};
use crate::types::{Action, UserId};

/// Whether a matching rule grants or denies access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
	Grant,
	Deny,
}

/// Instance-level predicate attached to a rule.
#[derive(Clone, Copy)]
pub enum Condition {
	/// The subject's owner is the acting user.
	OwnedByActor,
	/// A named attribute check over the subject and the actor.
	Predicate {
		name: &'static str,
		check: fn(&Subject, UserId) -> bool,
	},
}

impl Condition {
	pub fn name(&self) -> &'static str {
		match self {
			Condition::OwnedByActor => "owned_by_actor",
			Condition::Predicate { name, .. } => name,
		}
	}

	/// Evaluates the condition against a concrete instance.
	pub fn holds(&self, subject: &Subject, actor: UserId) -> bool {
		match self {
			Condition::OwnedByActor => subject.owner_id() == Some(actor),
			Condition::Predicate { check, .. } => check(subject, actor),
		}
	}
}

impl fmt::Debug for Condition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Condition").field(&self.name()).finish()
	}
}

impl PartialEq for Condition {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Condition::OwnedByActor, Condition::OwnedByActor) => true,
			(
				Condition::Predicate { name: a, check: f },
				Condition::Predicate { name: b, check: g },
			) => a == b && *f as usize == *g as usize,
			_ => false,
		}
	}
}

impl Serialize for Condition {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(self.name())
	}
}

/// A single grant or deny declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
	pub effect: Effect,
	pub actions: Vec<Action>,
	pub subject: SubjectType,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub condition: Option<Condition>,
}

impl Rule {
	pub fn new(
		effect: Effect,
		actions: impl IntoIterator<Item = Action>,
		subject: SubjectType,
	) -> Self {
		Self {
			effect,
			actions: actions.into_iter().collect(),
			subject,
			condition: None,
		}
	}

	pub fn grant(actions: impl IntoIterator<Item = Action>, subject: SubjectType) -> Self {
		Self::new(Effect::Grant, actions, subject)
	}

	pub fn deny(actions: impl IntoIterator<Item = Action>, subject: SubjectType) -> Self {
		Self::new(Effect::Deny, actions, subject)
	}

	/// Builder: restrict the rule to instances satisfying `condition`.
	pub fn when(mut self, condition: Condition) -> Self {
		self.condition = Some(condition);
		self
	}

	pub fn matches_action(&self, action: Action) -> bool {
		self.actions.iter().any(|a| a.subsumes(action))
	}

	pub fn matches_subject_type(&self, subject_type: SubjectType) -> bool {
		self.subject.covers(subject_type)
	}

	/// Evaluates the rule's condition for a query subject.
	///
	/// Unconditional rules always hold. For a bare type there is no instance
	/// to inspect: a conditional grant still applies (some instance may
	/// qualify) while a conditional deny does not.
	pub fn condition_holds(&self, subject: SubjectRef<'_>, actor: UserId) -> bool {
		let Some(condition) = &self.condition else {
			return true;
		};

		match subject {
			SubjectRef::Instance(instance) => condition.holds(instance, actor),
			SubjectRef::Type(_) => self.effect == Effect::Grant,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::{OrgId, ProjectId};

	fn project_owned_by(owner: UserId) -> Subject {
		Subject::Project {
			id: ProjectId::generate(),
			owner_id: owner,
			organization_id: OrgId::generate(),
		}
	}

	fn is_billing(subject: &Subject, _actor: UserId) -> bool {
		subject.subject_type() == SubjectType::Billing
	}

	mod matching {
		use super::*;

		#[test]
		fn manage_matches_every_action() {
			let rule = Rule::grant([Action::Manage], SubjectType::Project);
			for action in Action::all() {
				assert!(rule.matches_action(*action));
			}
		}

		#[test]
		fn listed_actions_only() {
			let rule = Rule::grant([Action::Get, Action::Create], SubjectType::Project);
			assert!(rule.matches_action(Action::Get));
			assert!(rule.matches_action(Action::Create));
			assert!(!rule.matches_action(Action::Delete));
			assert!(!rule.matches_action(Action::Manage));
		}

		#[test]
		fn wildcard_subject_matches_every_type() {
			let rule = Rule::grant([Action::Manage], SubjectType::All);
			for subject_type in SubjectType::concrete() {
				assert!(rule.matches_subject_type(*subject_type));
			}
		}

		#[test]
		fn typed_subject_matches_only_itself() {
			let rule = Rule::grant([Action::Get], SubjectType::Billing);
			assert!(rule.matches_subject_type(SubjectType::Billing));
			assert!(!rule.matches_subject_type(SubjectType::Project));
		}
	}

	mod conditions {
		use super::*;

		#[test]
		fn unconditional_rule_always_holds() {
			let rule = Rule::deny([Action::Delete], SubjectType::Project);
			let subject = project_owned_by(UserId::generate());
			assert!(rule.condition_holds((&subject).into(), UserId::generate()));
			assert!(rule.condition_holds(SubjectType::Project.into(), UserId::generate()));
		}

		#[test]
		fn owned_by_actor_checks_owner() {
			let actor = UserId::generate();
			let rule =
				Rule::grant([Action::Delete], SubjectType::Project).when(Condition::OwnedByActor);

			let own = project_owned_by(actor);
			let other = project_owned_by(UserId::generate());
			assert!(rule.condition_holds((&own).into(), actor));
			assert!(!rule.condition_holds((&other).into(), actor));
		}

		#[test]
		fn type_query_applies_conditional_grant_but_not_deny() {
			let actor = UserId::generate();
			let grant =
				Rule::grant([Action::Update], SubjectType::Project).when(Condition::OwnedByActor);
			let deny =
				Rule::deny([Action::Update], SubjectType::Project).when(Condition::OwnedByActor);

			assert!(grant.condition_holds(SubjectType::Project.into(), actor));
			assert!(!deny.condition_holds(SubjectType::Project.into(), actor));
		}

		#[test]
		fn predicate_is_invoked() {
			let condition = Condition::Predicate {
				name: "is_billing",
				check: is_billing,
			};
			let billing = Subject::Billing {
				organization_id: OrgId::generate(),
			};
			assert!(condition.holds(&billing, UserId::generate()));
			assert!(!condition.holds(&project_owned_by(UserId::generate()), UserId::generate()));
			assert_eq!(condition.name(), "is_billing");
		}
	}

	#[test]
	fn serializes_for_enumeration() {
		let rule = Rule::grant([Action::Update, Action::Delete], SubjectType::Project)
			.when(Condition::OwnedByActor);
		let json = serde_json::to_value(&rule).unwrap();
		assert_eq!(
			json,
			serde_json::json!({
				"effect": "grant",
				"actions": ["update", "delete"],
				"subject": "Project",
				"condition": "owned_by_actor",
			})
		);
	}
}
