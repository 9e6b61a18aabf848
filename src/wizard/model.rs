//! Record and enum types accumulated by the wizard.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// The role a new staff member signs up under.
///
/// The role chosen on the first step drives the rest of the flow:
/// only a DepartmentHead visits the department-setup step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    DepartmentHead,
    Personnel,
    Admin,
}

impl Role {
    /// Human label shown on the role card.
    pub fn label(&self) -> &'static str {
        match self {
            Self::DepartmentHead => "Department Head",
            Self::Personnel => "Personnel",
            Self::Admin => "Admin",
        }
    }

    /// One-line description shown under the role label.
    pub fn description(&self) -> &'static str {
        match self {
            Self::DepartmentHead => "Manage your department and resources",
            Self::Personnel => "Update field data and request resources",
            Self::Admin => "Manage users, configs, and audit logs",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::DepartmentHead => "department_head",
            Self::Personnel => "personnel",
            Self::Admin => "admin",
        };
        write!(f, "{s}")
    }
}

/// An initial department resource a DepartmentHead can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Infrastructure,
    Personnel,
    DigitalAssets,
}

impl Resource {
    /// Human label shown on the resource card.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Infrastructure => "Infrastructure",
            Self::Personnel => "Personnel",
            Self::DigitalAssets => "Digital Assets",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Infrastructure => "infrastructure",
            Self::Personnel => "personnel",
            Self::DigitalAssets => "digital_assets",
        };
        write!(f, "{s}")
    }
}

/// The submission payload accumulated across the wizard steps.
///
/// Fields fill in as the user moves through the flow; none are cleared by
/// lateral navigation. In particular `selected_resources` is retained when
/// the role changes away from DepartmentHead — it simply becomes inert
/// (never consulted, never displayed) until the role changes back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub designation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub setup_resources_requested: bool,
    #[serde(default)]
    pub selected_resources: BTreeSet<Resource>,
}

impl Record {
    /// Whether the chosen role is DepartmentHead.
    pub fn is_department_head(&self) -> bool {
        self.role == Some(Role::DepartmentHead)
    }

    /// Whether all four required profile fields are filled in.
    pub fn profile_complete(&self) -> bool {
        !self.full_name.is_empty()
            && !self.email.is_empty()
            && !self.department.is_empty()
            && !self.designation.is_empty()
    }

    /// Whether the resource selection is live: a DepartmentHead who asked
    /// for initial resources. Everywhere else `selected_resources` is inert.
    pub fn resources_applicable(&self) -> bool {
        self.is_department_head() && self.setup_resources_requested
    }

    /// Toggle a resource in or out of the selection. Returns whether the
    /// resource is selected afterwards.
    pub fn toggle_resource(&mut self, resource: Resource) -> bool {
        if self.selected_resources.remove(&resource) {
            false
        } else {
            self.selected_resources.insert(resource);
            true
        }
    }

    /// Render the review text shown on the confirmation step.
    pub fn confirmation_summary(&self) -> String {
        let mut parts = vec!["# Review and Confirm".to_string()];

        parts.push(format!(
            "- **Role:** {}",
            self.role.map(|r| r.label()).unwrap_or("")
        ));
        parts.push(format!("- **Name:** {}", self.full_name));
        parts.push(format!("- **Email:** {}", self.email));
        parts.push(format!("- **Department:** {}", self.department));
        parts.push(format!("- **Designation:** {}", self.designation));

        if let Some(ref phone) = self.phone {
            parts.push(format!("- **Phone:** {}", phone));
        }

        if self.resources_applicable() {
            let selected: Vec<&str> = self
                .selected_resources
                .iter()
                .map(|r| r.label())
                .collect();
            let rendered = if selected.is_empty() {
                "None selected".to_string()
            } else {
                selected.join(", ")
            };
            parts.push(format!("- **Initial Resources:** {}", rendered));
        }

        parts.join("\n")
    }
}
