//! Named constraint templates
//!
//! A Space registers with the constraints of a plan (or with custom
//! constraints). Plans are declared in the `[plans.<name>]` tables of the
//! configuration file.

use std::collections::HashMap;

use super::types::Constraints;
use crate::error::{QuotaError, Result};

/// Catalog of plan templates
#[derive(Debug, Clone, Default)]
pub struct PlanCatalog {
    plans: HashMap<String, Constraints>,
}

impl PlanCatalog {
    pub fn new(plans: HashMap<String, Constraints>) -> Self {
        PlanCatalog { plans }
    }

    /// Constraints of the named plan
    pub fn get(&self, name: &str) -> Result<Constraints> {
        self.plans
            .get(name)
            .cloned()
            .ok_or_else(|| QuotaError::UnknownPlan(name.to_string()))
    }

    /// Add or replace a plan
    pub fn insert(&mut self, name: impl Into<String>, constraints: Constraints) {
        self.plans.insert(name.into(), constraints);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.plans.contains_key(name)
    }

    /// Plan names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.plans.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}
