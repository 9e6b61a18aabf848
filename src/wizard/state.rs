//! Wizard step state machine — next/previous step rules and forward gates.

use serde::{Deserialize, Serialize};

use super::model::Record;

/// The steps of the onboarding wizard.
///
/// Progresses RoleSelection → ProfileInfo → DepartmentSetup → Confirmation,
/// where DepartmentSetup is visited only when the chosen role is
/// DepartmentHead. That role branch is the single conditional transition;
/// every other transition is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    RoleSelection,
    ProfileInfo,
    DepartmentSetup,
    Confirmation,
}

impl WizardStep {
    /// 1-based position in the full four-step sequence.
    pub fn index(&self) -> u8 {
        match self {
            Self::RoleSelection => 1,
            Self::ProfileInfo => 2,
            Self::DepartmentSetup => 3,
            Self::Confirmation => 4,
        }
    }

    /// Short label shown in the progress header.
    pub fn label(&self) -> &'static str {
        match self {
            Self::RoleSelection => "Role",
            Self::ProfileInfo => "Profile",
            Self::DepartmentSetup => "Setup",
            Self::Confirmation => "Confirm",
        }
    }

    /// Whether this step is terminal (submission happens here; no further
    /// forward navigation).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmation)
    }
}

impl Default for WizardStep {
    fn default() -> Self {
        Self::RoleSelection
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::RoleSelection => "role_selection",
            Self::ProfileInfo => "profile_info",
            Self::DepartmentSetup => "department_setup",
            Self::Confirmation => "confirmation",
        };
        write!(f, "{s}")
    }
}

/// Next visible step for the current record.
///
/// ProfileInfo leads to DepartmentSetup only for a DepartmentHead,
/// otherwise straight to Confirmation. Confirmation is terminal.
pub fn next_step(current: WizardStep, record: &Record) -> WizardStep {
    use WizardStep::*;
    match current {
        RoleSelection => ProfileInfo,
        ProfileInfo => {
            if record.is_department_head() {
                DepartmentSetup
            } else {
                Confirmation
            }
        }
        DepartmentSetup => Confirmation,
        Confirmation => Confirmation,
    }
}

/// Previous visible step — the mirror of [`next_step`], with the same
/// DepartmentSetup skip for non-DepartmentHead roles. RoleSelection is
/// terminal going backward.
pub fn prev_step(current: WizardStep, record: &Record) -> WizardStep {
    use WizardStep::*;
    match current {
        RoleSelection => RoleSelection,
        ProfileInfo => RoleSelection,
        DepartmentSetup => ProfileInfo,
        Confirmation => {
            if record.is_department_head() {
                DepartmentSetup
            } else {
                ProfileInfo
            }
        }
    }
}

/// Whether forward navigation out of `current` is permitted.
///
/// RoleSelection needs a role chosen; ProfileInfo needs the four required
/// profile fields; DepartmentSetup is never gated (resource selection is
/// optional). Confirmation reports false since advancing can never take
/// effect there. Backward navigation has no gate.
pub fn advance_allowed(current: WizardStep, record: &Record) -> bool {
    use WizardStep::*;
    match current {
        RoleSelection => record.role.is_some(),
        ProfileInfo => record.profile_complete(),
        DepartmentSetup => true,
        Confirmation => false,
    }
}

/// The ordered steps valid for the record's current role.
///
/// DepartmentSetup is omitted unless the role is DepartmentHead, so a
/// progress indicator built from this list never shows a step the user
/// cannot reach.
pub fn visible_steps(record: &Record) -> Vec<WizardStep> {
    use WizardStep::*;
    if record.is_department_head() {
        vec![RoleSelection, ProfileInfo, DepartmentSetup, Confirmation]
    } else {
        vec![RoleSelection, ProfileInfo, Confirmation]
    }
}
