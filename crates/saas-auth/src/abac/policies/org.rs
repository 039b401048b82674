// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Organization role policies.

use crate::abac::{Condition, Rule, SubjectType};
use crate::types::{Action, UserId};

/// Administrators manage everything.
pub fn admin(_actor: UserId) -> Vec<Rule> {
	vec![Rule::grant([Action::Manage], SubjectType::All)]
}

/// Members read, create and invite freely; they mutate only what they own.
pub fn member(_actor: UserId) -> Vec<Rule> {
	let everyday = [Action::Invite, Action::Get, Action::Create];

	vec![
		Rule::grant(everyday, SubjectType::User),
		Rule::grant(everyday, SubjectType::Project),
		Rule::grant(everyday, SubjectType::Invite),
		Rule::grant([Action::Update, Action::Delete], SubjectType::Project)
			.when(Condition::OwnedByActor),
		Rule::grant(
			[Action::Update, Action::Delete, Action::TransferOwnership],
			SubjectType::Organization,
		)
		.when(Condition::OwnedByActor),
	]
}

/// Billing contacts may only read billing.
pub fn billing(_actor: UserId) -> Vec<Rule> {
	vec![Rule::grant([Action::Get], SubjectType::Billing)]
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::abac::Effect;

	#[test]
	fn admin_is_a_single_wildcard_grant() {
		assert_eq!(
			admin(UserId::generate()),
			vec![Rule::grant([Action::Manage], SubjectType::All)]
		);
	}

	#[test]
	fn member_declares_no_billing_rules() {
		let rules = member(UserId::generate());
		assert!(rules
			.iter()
			.all(|r| !r.matches_subject_type(SubjectType::Billing)));
	}

	#[test]
	fn member_mutations_are_ownership_scoped() {
		let rules = member(UserId::generate());
		for rule in rules.iter().filter(|r| {
			r.matches_action(Action::Update)
				|| r.matches_action(Action::Delete)
				|| r.matches_action(Action::TransferOwnership)
		}) {
			assert_eq!(rule.condition, Some(Condition::OwnedByActor));
		}
	}

	#[test]
	fn rule_set_does_not_depend_on_actor() {
		assert_eq!(member(UserId::generate()), member(UserId::generate()));
		assert_eq!(billing(UserId::generate()), billing(UserId::generate()));
	}

	#[test]
	fn standard_policies_declare_no_denies() {
		let actor = UserId::generate();
		for rules in [admin(actor), member(actor), billing(actor)] {
			assert!(rules.iter().all(|r| r.effect == Effect::Grant));
		}
	}
}
