//! Selection filter
//!
//! Reduces a [`PolicyCatalog`] to the enabled policies and the ordered set of
//! groups they reference. Groups keep first-occurrence order from the catalog.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::catalog::PolicyCatalog;
use crate::error::CatalogError;
use crate::policy::{Policy, SettingSelector};

/// An enabled policy paired with its resolved active level
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedPolicy {
    policy: Policy,
    value: f64,
}

impl SelectedPolicy {
    /// Underlying catalog entry
    #[inline]
    #[must_use]
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Model variable name
    #[inline]
    #[must_use]
    pub fn long_name(&self) -> &str {
        &self.policy.long_name
    }

    /// Annotation label
    #[inline]
    #[must_use]
    pub fn short_name(&self) -> &str {
        &self.policy.short_name
    }

    /// Group name
    #[inline]
    #[must_use]
    pub fn group(&self) -> &str {
        &self.policy.group
    }

    /// Level applied when the policy is switched on
    #[inline]
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }
}

/// A named cluster of selected policies toggled together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    name: String,
    members: Vec<usize>,
}

impl Group {
    /// Group name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Positions of member policies within [`Selection::policies`]
    #[inline]
    #[must_use]
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Check whether the selected policy at `position` belongs here
    #[inline]
    #[must_use]
    pub fn contains(&self, position: usize) -> bool {
        self.members.binary_search(&position).is_ok()
    }
}

/// Active policies and their groups, computed once per generation
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    policies: Vec<SelectedPolicy>,
    groups: Vec<Group>,
    selector: SettingSelector,
}

impl Selection {
    /// Filter `catalog` down to enabled policies
    ///
    /// # Errors
    /// - [`CatalogError::NoPoliciesEnabled`] if nothing is enabled
    /// - [`CatalogError::MissingSetting`] / [`CatalogError::InvalidPolicy`]
    ///   if an enabled policy cannot be applied with `selector`
    pub fn from_catalog(
        catalog: &PolicyCatalog,
        selector: SettingSelector,
    ) -> Result<Self, CatalogError> {
        let mut policies = Vec::new();
        let mut seen = HashSet::new();

        for (position, policy) in catalog.policies().iter().enumerate() {
            if !policy.enabled {
                continue;
            }
            let value = policy.validate(position, selector)?;
            if !seen.insert(policy.long_name.as_str()) {
                tracing::warn!("Policy '{}' is enabled more than once", policy.long_name);
            }
            policies.push(SelectedPolicy {
                policy: policy.clone(),
                value,
            });
        }

        if policies.is_empty() {
            return Err(CatalogError::NoPoliciesEnabled);
        }

        let mut by_group: IndexMap<&str, Vec<usize>> = IndexMap::new();
        for (position, selected) in policies.iter().enumerate() {
            by_group.entry(selected.group()).or_default().push(position);
        }
        let groups: Vec<Group> = by_group
            .into_iter()
            .map(|(name, members)| Group {
                name: name.to_string(),
                members,
            })
            .collect();

        tracing::info!(
            "Selected {} of {} policies in {} groups",
            policies.len(),
            catalog.len(),
            groups.len()
        );

        Ok(Self {
            policies,
            groups,
            selector,
        })
    }

    /// Enabled policies, in catalog order
    #[inline]
    #[must_use]
    pub fn policies(&self) -> &[SelectedPolicy] {
        &self.policies
    }

    /// Distinct groups, in first-occurrence order
    #[inline]
    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Group names, in first-occurrence order
    pub fn group_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.groups.iter().map(Group::name)
    }

    /// Selected policies belonging to `group`
    pub fn members<'a>(&'a self, group: &'a Group) -> impl Iterator<Item = &'a SelectedPolicy> + 'a {
        group.members.iter().map(move |&i| &self.policies[i])
    }

    /// Selected policies outside `group`
    pub fn non_members<'a>(
        &'a self,
        group: &'a Group,
    ) -> impl Iterator<Item = &'a SelectedPolicy> + 'a {
        self.policies
            .iter()
            .enumerate()
            .filter(move |(i, _)| !group.contains(*i))
            .map(|(_, p)| p)
    }

    /// Setting selector used to resolve levels
    #[inline]
    #[must_use]
    pub fn selector(&self) -> SettingSelector {
        self.selector
    }
}
