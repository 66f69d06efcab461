//! Modules, actions and action sets.
//!
//! Both vocabularies are closed. Parsing returns `None` for anything outside
//! them and callers treat `None` as a denial.

use serde::{Deserialize, Serialize};

/// A functional area of the application.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Module {
    Patients,
    Appointments,
    Billing,
    Laboratory,
    Radiology,
    Pharmacy,
    /// Master data (departments, tariffs, test catalogues).
    Masters,
    Users,
    Records,
    Reports,
    Marketing,
}

impl Module {
    pub const ALL: [Module; 11] = [
        Module::Patients,
        Module::Appointments,
        Module::Billing,
        Module::Laboratory,
        Module::Radiology,
        Module::Pharmacy,
        Module::Masters,
        Module::Users,
        Module::Records,
        Module::Reports,
        Module::Marketing,
    ];

    pub(crate) const COUNT: usize = Self::ALL.len();

    /// Case-insensitive lookup by name.
    pub fn parse(input: &str) -> Option<Module> {
        let input = input.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(input))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Module::Patients => "patients",
            Module::Appointments => "appointments",
            Module::Billing => "billing",
            Module::Laboratory => "laboratory",
            Module::Radiology => "radiology",
            Module::Pharmacy => "pharmacy",
            Module::Masters => "masters",
            Module::Users => "users",
            Module::Records => "records",
            Module::Reports => "reports",
            Module::Marketing => "marketing",
        }
    }

    pub(crate) const fn index(&self) -> usize {
        *self as usize
    }
}

impl core::fmt::Display for Module {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An operation on a module.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
    Export,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::View,
        Action::Create,
        Action::Edit,
        Action::Delete,
        Action::Export,
    ];

    /// Case-insensitive lookup by name.
    pub fn parse(input: &str) -> Option<Action> {
        let input = input.trim();
        Self::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(input))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Delete => "delete",
            Action::Export => "export",
        }
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of actions, stored as a bit mask.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct ActionSet(u8);

impl ActionSet {
    pub const EMPTY: ActionSet = ActionSet(0);

    /// Every action.
    pub const ALL: ActionSet = ActionSet::of(&Action::ALL);

    pub const fn of(actions: &[Action]) -> ActionSet {
        let mut bits = 0u8;
        let mut i = 0;
        while i < actions.len() {
            bits |= actions[i].bit();
            i += 1;
        }
        ActionSet(bits)
    }

    pub const fn contains(&self, action: Action) -> bool {
        self.0 & action.bit() != 0
    }

    pub const fn union(self, other: ActionSet) -> ActionSet {
        ActionSet(self.0 | other.0)
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn insert(&mut self, action: Action) {
        self.0 |= action.bit();
    }

    /// Iterate in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Action> + '_ {
        Action::ALL.into_iter().filter(|a| self.contains(*a))
    }
}

impl FromIterator<Action> for ActionSet {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        let mut set = ActionSet::EMPTY;
        for action in iter {
            set.insert(action);
        }
        set
    }
}

/// Explanatory text for a disabled control.
pub fn denial_tooltip(module: Module, action: Action) -> String {
    format!("You don't have permission to {action} {module}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive_and_closed() {
        assert_eq!(Module::parse("Patients"), Some(Module::Patients));
        assert_eq!(Module::parse(" MASTERS "), Some(Module::Masters));
        assert_eq!(Module::parse("inventory"), None);
        assert_eq!(Action::parse("Delete"), Some(Action::Delete));
        assert_eq!(Action::parse("approve"), None);
        assert_eq!(Action::parse(""), None);
    }

    #[test]
    fn action_set_membership() {
        let set = ActionSet::of(&[Action::View, Action::Edit]);
        assert!(set.contains(Action::View));
        assert!(set.contains(Action::Edit));
        assert!(!set.contains(Action::Delete));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Action::View, Action::Edit]);
        assert!(ActionSet::EMPTY.is_empty());
        assert!(Action::ALL.iter().all(|a| ActionSet::ALL.contains(*a)));
    }

    #[test]
    fn tooltip_wording() {
        assert_eq!(
            denial_tooltip(Module::Masters, Action::Delete),
            "You don't have permission to delete masters"
        );
    }
}
