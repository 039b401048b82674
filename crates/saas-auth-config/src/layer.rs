// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration produced by a single source.

use serde::{Deserialize, Serialize};

use crate::sections::AuditConfigLayer;

/// One source's view of the configuration; unset fields defer to lower
/// precedence sources.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AuthConfigLayer {
	pub audit: Option<AuditConfigLayer>,
}

impl AuthConfigLayer {
	/// Overlays `other` onto `self`, field by field.
	pub fn merge(&mut self, other: Self) {
		if let Some(audit) = other.audit {
			self.audit.get_or_insert_with(Default::default).merge(audit);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn merge_fills_missing_section() {
		let mut base = AuthConfigLayer::default();
		base.merge(AuthConfigLayer {
			audit: Some(AuditConfigLayer {
				enabled: Some(false),
				..Default::default()
			}),
		});
		assert_eq!(base.audit.unwrap().enabled, Some(false));
	}

	#[test]
	fn merge_keeps_fields_the_overlay_leaves_unset() {
		let mut base = AuthConfigLayer {
			audit: Some(AuditConfigLayer {
				enabled: Some(false),
				record_grants: Some(true),
				target: None,
			}),
		};
		base.merge(AuthConfigLayer {
			audit: Some(AuditConfigLayer {
				enabled: Some(true),
				..Default::default()
			}),
		});
		let audit = base.audit.unwrap();
		assert_eq!(audit.enabled, Some(true));
		assert_eq!(audit.record_grants, Some(true));
	}

	#[test]
	fn empty_overlay_is_a_no_op() {
		let original = AuthConfigLayer {
			audit: Some(AuditConfigLayer {
				record_grants: Some(true),
				..Default::default()
			}),
		};
		let mut merged = original.clone();
		merged.merge(AuthConfigLayer::default());
		assert_eq!(merged, original);
	}
}
