// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Role policy declarations.

pub mod org;

use super::registry::Declaration;
use crate::types::Role;

/// Returns the standard declaration for `role`.
///
/// The `match` is exhaustive: adding a [`Role`] variant does not compile until
/// it has a declaration here.
pub fn declaration_for(role: Role) -> Declaration {
	match role {
		Role::Admin => org::admin,
		Role::Member => org::member,
		Role::Billing => org::billing,
	}
}
