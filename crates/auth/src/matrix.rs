//! Permission matrix evaluator.
//!
//! The matrix is a dense `Role × Module → ActionSet` table: every cell is
//! defined, and a cell that was never granted holds the empty set. Elevated
//! roles are checked *before* the table is consulted, so a misconfigured
//! table can never lock them out.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::permissions::{Action, ActionSet, Module};
use crate::roles::Role;

/// A grant document: role name → module name → action names.
///
/// ```json
/// { "doctor": { "patients": ["view", "edit"] } }
/// ```
pub type MatrixDocument = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// Commonly gated action groups, each backed by exactly one matrix cell.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    EditMasters,
    DeleteMasters,
    ManageUsers,
    DeleteRecords,
}

impl Capability {
    /// The `(module, action)` cell this capability is read from.
    pub const fn requirement(self) -> (Module, Action) {
        match self {
            Capability::EditMasters => (Module::Masters, Action::Edit),
            Capability::DeleteMasters => (Module::Masters, Action::Delete),
            Capability::ManageUsers => (Module::Users, Action::Edit),
            Capability::DeleteRecords => (Module::Records, Action::Delete),
        }
    }
}

/// Role → module → allowed actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionMatrix {
    cells: [[ActionSet; Module::COUNT]; Role::COUNT],
}

const VIEW: ActionSet = ActionSet::of(&[Action::View]);
const VIEW_CREATE: ActionSet = ActionSet::of(&[Action::View, Action::Create]);
const VIEW_EDIT: ActionSet = ActionSet::of(&[Action::View, Action::Edit]);
const VIEW_EXPORT: ActionSet = ActionSet::of(&[Action::View, Action::Export]);
const VIEW_CREATE_EDIT: ActionSet = ActionSet::of(&[Action::View, Action::Create, Action::Edit]);
const ALL_BUT_DELETE: ActionSet =
    ActionSet::of(&[Action::View, Action::Create, Action::Edit, Action::Export]);

type Grants = &'static [(Module, ActionSet)];

/// Grants of the standard matrix. Roles and modules not listed are denied.
const STANDARD_GRANTS: &[(Role, Grants)] = &[
    (
        Role::Reception,
        &[
            (Module::Patients, VIEW_CREATE_EDIT),
            (Module::Appointments, VIEW_CREATE_EDIT),
            (Module::Billing, VIEW_CREATE),
            (Module::Records, VIEW),
            (Module::Masters, VIEW),
        ],
    ),
    (
        Role::Lab,
        &[
            (Module::Laboratory, VIEW_CREATE_EDIT),
            (Module::Patients, VIEW),
            (Module::Records, VIEW_CREATE),
        ],
    ),
    (
        Role::Radiology,
        &[
            (Module::Radiology, VIEW_CREATE_EDIT),
            (Module::Patients, VIEW),
            (Module::Records, VIEW_CREATE),
        ],
    ),
    (
        Role::Pharmacy,
        &[
            (Module::Pharmacy, VIEW_CREATE_EDIT),
            (Module::Patients, VIEW),
            (Module::Billing, VIEW_CREATE),
            (Module::Masters, VIEW),
        ],
    ),
    (
        Role::Doctor,
        &[
            (Module::Patients, VIEW_EDIT),
            (Module::Appointments, VIEW_EDIT),
            (Module::Laboratory, VIEW_CREATE),
            (Module::Radiology, VIEW_CREATE),
            (Module::Pharmacy, VIEW_CREATE),
            (Module::Records, VIEW_CREATE_EDIT),
            (Module::Reports, VIEW),
        ],
    ),
    (
        Role::Nurse,
        &[
            (Module::Patients, VIEW_EDIT),
            (Module::Appointments, VIEW),
            (Module::Records, VIEW_CREATE),
            (Module::Pharmacy, VIEW),
        ],
    ),
    (
        Role::Accountant,
        &[
            (Module::Billing, ALL_BUT_DELETE),
            (Module::Reports, VIEW_EXPORT),
            (Module::Patients, VIEW),
        ],
    ),
    (
        Role::User,
        &[(Module::Patients, VIEW), (Module::Appointments, VIEW)],
    ),
    (
        Role::MarketingManager,
        &[
            (Module::Marketing, ALL_BUT_DELETE),
            (Module::Reports, VIEW),
            (Module::Patients, VIEW),
        ],
    ),
];

/// The standard matrix shared by the string-boundary helpers in this module.
pub static STANDARD: PermissionMatrix = PermissionMatrix::standard();

impl PermissionMatrix {
    /// A matrix that denies everything to every tenant-scoped role.
    pub const fn empty() -> Self {
        Self {
            cells: [[ActionSet::EMPTY; Module::COUNT]; Role::COUNT],
        }
    }

    /// The built-in grants: hospital admins get every action on every module,
    /// other roles get what their desk needs.
    pub const fn standard() -> Self {
        let mut matrix = Self::empty();

        let mut m = 0;
        while m < Module::COUNT {
            matrix.cells[Role::Admin.index()][m] = ActionSet::ALL;
            m += 1;
        }

        let mut r = 0;
        while r < STANDARD_GRANTS.len() {
            let (role, grants) = STANDARD_GRANTS[r];
            let mut g = 0;
            while g < grants.len() {
                let (module, actions) = grants[g];
                let cell = &mut matrix.cells[role.index()][module.index()];
                *cell = cell.union(actions);
                g += 1;
            }
            r += 1;
        }

        matrix
    }

    /// Build a matrix from a grant document.
    ///
    /// Names are matched case-insensitively. An unrecognized role, module or
    /// action name is a configuration error, never a silent grant.
    pub fn from_document(document: &MatrixDocument) -> ConfigResult<Self> {
        let mut matrix = Self::empty();
        for (role_name, modules) in document {
            let role = Role::parse(role_name);
            if role == Role::Unknown {
                return Err(ConfigError::UnknownRole(role_name.clone()));
            }
            for (module_name, actions) in modules {
                let module = Module::parse(module_name)
                    .ok_or_else(|| ConfigError::UnknownModule(module_name.clone()))?;
                for action_name in actions {
                    let action = Action::parse(action_name)
                        .ok_or_else(|| ConfigError::UnknownAction(action_name.clone()))?;
                    matrix.grant(role, module, action);
                }
            }
        }
        Ok(matrix)
    }

    /// Add a single grant. Grants to [`Role::Unknown`] are ignored.
    pub fn grant(&mut self, role: Role, module: Module, action: Action) {
        if role == Role::Unknown {
            return;
        }
        self.cells[role.index()][module.index()].insert(action);
    }

    /// Raw table cell, without the elevation override.
    pub fn granted(&self, role: Role, module: Module) -> ActionSet {
        self.cells[role.index()][module.index()]
    }

    /// Effective actions of `role` on `module`.
    pub fn actions(&self, role: Role, module: Module) -> ActionSet {
        if role.is_elevated() {
            return ActionSet::ALL;
        }
        self.granted(role, module)
    }

    /// Decide whether `role` may perform `action` on `module`.
    pub fn allows(&self, role: Role, module: Module, action: Action) -> bool {
        if role.is_elevated() {
            tracing::debug!(%role, %module, %action, "elevated role bypass");
            return true;
        }

        let allowed = self.granted(role, module).contains(action);
        if !allowed {
            tracing::debug!(%role, %module, %action, "permission denied");
        }
        allowed
    }

    pub fn can(&self, role: Role, capability: Capability) -> bool {
        let (module, action) = capability.requirement();
        self.allows(role, module, action)
    }

    pub fn can_edit_masters(&self, role: Role) -> bool {
        self.can(role, Capability::EditMasters)
    }

    pub fn can_delete_masters(&self, role: Role) -> bool {
        self.can(role, Capability::DeleteMasters)
    }

    pub fn can_manage_users(&self, role: Role) -> bool {
        self.can(role, Capability::ManageUsers)
    }

    pub fn can_delete_records(&self, role: Role) -> bool {
        self.can(role, Capability::DeleteRecords)
    }

    /// String-boundary check against this matrix.
    ///
    /// An unrecognized module or action is denied for every role, elevated
    /// ones included.
    pub fn check(&self, role: &str, module: &str, action: &str) -> bool {
        match (Module::parse(module), Action::parse(action)) {
            (Some(module), Some(action)) => self.allows(Role::parse(role), module, action),
            _ => {
                tracing::debug!(role, module, action, "unrecognized module or action");
                false
            }
        }
    }
}

impl Default for PermissionMatrix {
    fn default() -> Self {
        Self::standard()
    }
}

/// Check a permission against the standard matrix.
pub fn has_permission(role: &str, module: &str, action: &str) -> bool {
    STANDARD.check(role, module, action)
}

pub fn can_edit_masters(role: &str) -> bool {
    STANDARD.can_edit_masters(Role::parse(role))
}

pub fn can_delete_masters(role: &str) -> bool {
    STANDARD.can_delete_masters(Role::parse(role))
}

pub fn can_manage_users(role: &str) -> bool {
    STANDARD.can_manage_users(Role::parse(role))
}

pub fn can_delete_records(role: &str) -> bool {
    STANDARD.can_delete_records(Role::parse(role))
}
