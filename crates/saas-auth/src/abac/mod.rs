// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Attribute-based authorization: subjects, rules, role policies and the
//! evaluator behind [`Ability::can`].

pub mod engine;
pub mod policies;
pub mod registry;
pub mod rule;
pub mod subject;

pub use engine::{evaluate, Ability, Decision};
pub use registry::{define_ability_for, Declaration, PolicyRegistry};
pub use rule::{Condition, Effect, Rule};
pub use subject::{classify_record, classify_subject, Subject, SubjectRef, SubjectType};
