//! Customization groups and option selection.
//!
//! A menu item offers named groups ("Size", "Extras"), each single- or
//! multiple-select, each option with a surcharge. The shopper's picks are
//! collected in a [`Selection`] and resolved against the groups into the
//! [`Customization`] list a cart line carries.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Whether a group accepts one option or many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SelectionKind {
    #[default]
    Single,
    Multiple,
}

/// A selectable option within a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomizationOption {
    pub name: String,
    #[serde(default)]
    pub price: Decimal,
}

/// A named modifier group offered on a menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomizationGroup {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: SelectionKind,
    #[serde(default)]
    pub required: bool,
    pub options: Vec<CustomizationOption>,
}

impl CustomizationGroup {
    fn option(&self, name: &str) -> Option<&CustomizationOption> {
        self.options.iter().find(|o| o.name == name)
    }
}

/// A resolved customization on a cart line.
///
/// `selected_options` is a set, so two lines compare equal regardless of the
/// order options were picked in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customization {
    pub name: String,
    pub selected_options: BTreeSet<String>,
    /// Sum of the selected options' prices.
    pub surcharge: Decimal,
}

/// Errors resolving a selection against an item's groups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// A required group has no option selected.
    #[error("please select an option for: {0}")]
    MissingRequired(String),
    /// The selection names a group the item does not offer.
    #[error("unknown customization group: {0}")]
    UnknownGroup(String),
    /// The selection names an option the group does not offer.
    #[error("unknown option {option} in {group}")]
    UnknownOption {
        /// Group name.
        group: String,
        /// Option name.
        option: String,
    },
    /// A single-select group has more than one option selected.
    #[error("only one option may be selected for: {0}")]
    TooManyOptions(String),
}

/// The shopper's picks, keyed by group name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection(BTreeMap<String, Vec<String>>);

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick an option in a group.
    ///
    /// Single-select groups replace the previous pick. Multiple-select groups
    /// toggle the option in or out.
    pub fn choose(&mut self, group: &str, option: &str, kind: SelectionKind) {
        let picked = self.0.entry(group.to_string()).or_default();
        match kind {
            SelectionKind::Single => {
                picked.clear();
                picked.push(option.to_string());
            }
            SelectionKind::Multiple => {
                if let Some(pos) = picked.iter().position(|o| o == option) {
                    picked.remove(pos);
                } else {
                    picked.push(option.to_string());
                }
            }
        }
    }

    /// Builder-style variant of [`Selection::choose`].
    #[must_use]
    pub fn with(mut self, group: &str, option: &str, kind: SelectionKind) -> Self {
        self.choose(group, option, kind);
        self
    }

    /// Options picked in a group (empty if none).
    #[must_use]
    pub fn picked(&self, group: &str) -> &[String] {
        self.0.get(group).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }
}

/// Resolve a selection into cart customizations.
///
/// Output follows group-definition order; groups with nothing picked are
/// dropped.
///
/// # Errors
///
/// Returns [`SelectionError`] if a required group is empty, a single-select
/// group has several picks, or the selection names an unknown group/option.
pub fn resolve_customizations(
    groups: &[CustomizationGroup],
    selection: &Selection,
) -> Result<Vec<Customization>, SelectionError> {
    if let Some(unknown) = selection
        .0
        .iter()
        .filter(|(_, picked)| !picked.is_empty())
        .map(|(name, _)| name)
        .find(|name| !groups.iter().any(|g| &g.name == *name))
    {
        return Err(SelectionError::UnknownGroup(unknown.clone()));
    }

    let mut resolved = Vec::new();
    for group in groups {
        let picked = selection.picked(&group.name);

        if picked.is_empty() {
            if group.required {
                return Err(SelectionError::MissingRequired(group.name.clone()));
            }
            continue;
        }

        if group.kind == SelectionKind::Single && picked.len() > 1 {
            return Err(SelectionError::TooManyOptions(group.name.clone()));
        }

        let mut surcharge = Decimal::ZERO;
        let mut selected_options = BTreeSet::new();
        for name in picked {
            let option = group
                .option(name)
                .ok_or_else(|| SelectionError::UnknownOption {
                    group: group.name.clone(),
                    option: name.clone(),
                })?;
            if selected_options.insert(option.name.clone()) {
                surcharge += option.price;
            }
        }

        resolved.push(Customization {
            name: group.name.clone(),
            selected_options,
            surcharge,
        });
    }

    Ok(resolved)
}
