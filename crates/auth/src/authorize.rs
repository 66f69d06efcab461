use std::collections::BTreeMap;

use serde::Serialize;

use crate::matrix::PermissionMatrix;
use crate::permissions::{Action, Module, denial_tooltip};
use crate::roles::Role;

// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Detailed explanation of a permission decision.
///
/// Answers "why is this button disabled?" for support staff and audit logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationExplanation {
    /// Role after normalization.
    pub role: Role,

    pub module: Module,

    pub action: Action,

    /// Whether the action is permitted.
    pub granted: bool,

    /// Which rule decided the outcome.
    pub basis: DecisionBasis,

    /// Actions the role may perform on `module`.
    pub effective_actions: Vec<Action>,

    /// Control tooltip when denied.
    pub tooltip: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionBasis {
    /// Elevated role; the matrix was not consulted.
    ElevatedOverride,
    /// The matrix grants the action.
    MatrixGrant,
    /// The role name was not recognized.
    UnrecognizedRole,
    /// The matrix does not grant the action.
    NotGranted,
}

/// Explain the decision `matrix` makes for `(role, module, action)`.
pub fn explain_authorization(
    matrix: &PermissionMatrix,
    role: Role,
    module: Module,
    action: Action,
) -> AuthorizationExplanation {
    let granted = matrix.allows(role, module, action);
    let basis = if role.is_elevated() {
        DecisionBasis::ElevatedOverride
    } else if granted {
        DecisionBasis::MatrixGrant
    } else if role == Role::Unknown {
        DecisionBasis::UnrecognizedRole
    } else {
        DecisionBasis::NotGranted
    };

    AuthorizationExplanation {
        role,
        module,
        action,
        granted,
        basis,
        effective_actions: matrix.actions(role, module).iter().collect(),
        tooltip: (!granted).then(|| denial_tooltip(module, action)),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Matrix report
// ─────────────────────────────────────────────────────────────────────────────

/// One role's effective grants (for audit/display).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleGrants {
    pub role: Role,
    pub elevated: bool,
    pub tenant_scoped: bool,
    /// Module → permitted actions. Modules with nothing permitted are omitted.
    pub modules: BTreeMap<Module, Vec<Action>>,
}

/// Complete view of a matrix, one row per role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatrixReport {
    pub roles: Vec<RoleGrants>,
}

impl MatrixReport {
    pub fn from_matrix(matrix: &PermissionMatrix) -> Self {
        let roles = Role::ALL
            .into_iter()
            .map(|role| {
                let modules = Module::ALL
                    .into_iter()
                    .filter_map(|module| {
                        let actions: Vec<Action> = matrix.actions(role, module).iter().collect();
                        (!actions.is_empty()).then_some((module, actions))
                    })
                    .collect();
                RoleGrants {
                    role,
                    elevated: role.is_elevated(),
                    tenant_scoped: role.is_tenant_scoped(),
                    modules,
                }
            })
            .collect();

        Self { roles }
    }

    pub fn role(&self, role: Role) -> Option<&RoleGrants> {
        self.roles.iter().find(|g| g.role == role)
    }
}
