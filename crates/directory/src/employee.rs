//! Employee payloads exchanged with the directory.

use chrono::{DateTime, Utc};
use hierarchy::EmployeeRecord;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{DirectoryError, DirectoryResult};

/// Stored employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub designation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn summary(&self) -> ManagerSummary {
        ManagerSummary {
            id: self.id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            designation: self.designation.clone(),
            image_url: self.image_url.clone(),
        }
    }

    /// Case-insensitive substring match used by listing search. Covers the
    /// same fields as [`hierarchy::filter_by_query`], so a listed match is
    /// never hidden again by the view. `needle` must already be lowercase.
    pub(crate) fn matches_search(&self, needle: &str) -> bool {
        [
            Some(self.first_name.as_str()),
            Some(self.last_name.as_str()),
            Some(self.designation.as_str()),
            self.department.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
    }
}

impl From<&Employee> for EmployeeRecord {
    fn from(employee: &Employee) -> Self {
        EmployeeRecord {
            id: employee.id.clone(),
            first_name: employee.first_name.clone(),
            last_name: employee.last_name.clone(),
            designation: employee.designation.clone(),
            department: employee.department.clone(),
            manager_id: employee.manager_id.clone(),
            is_active: employee.is_active,
            sort_order: employee.sort_order,
        }
    }
}

/// Short reference to a manager or report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerSummary {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub designation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Row returned by paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeListing {
    #[serde(flatten)]
    pub employee: Employee,
    pub manager: Option<ManagerSummary>,
    pub reports_count: usize,
}

/// Single employee with both directions of the reporting line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDetail {
    #[serde(flatten)]
    pub employee: Employee,
    pub manager: Option<ManagerSummary>,
    pub reports: Vec<ManagerSummary>,
}

/// Create payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub designation: String,
    pub department: Option<String>,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub manager_id: Option<String>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
    pub joined_at: Option<DateTime<Utc>>,
}

impl NewEmployee {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        designation: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            designation: designation.into(),
            ..Self::default()
        }
    }
}

/// Update payload. Absent fields are left unchanged; for nullable fields an
/// explicit `null` clears the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub phone: Option<Option<String>>,
    pub designation: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub department: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub bio: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub image_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub linkedin_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub manager_id: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
    #[serde(default, deserialize_with = "nullable")]
    pub joined_at: Option<Option<DateTime<Utc>>>,
}

fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Trims a required text field, rejecting blank values.
pub(crate) fn required(value: &str, label: &str) -> DirectoryResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DirectoryError::InvalidInput(format!("{label} is required")));
    }
    Ok(trimmed.to_string())
}

/// Trims an optional text field; blank becomes `None`.
pub(crate) fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
