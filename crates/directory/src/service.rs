//! Employee directory: listing, lookups and validated mutations.

use chrono::Utc;
use hierarchy::{build_forest, validate_manager, EmployeeRecord, Forest};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::employee::{
    optional, required, Employee, EmployeeDetail, EmployeeListing, EmployeePatch, ManagerSummary,
    NewEmployee,
};
use crate::error::{DirectoryError, DirectoryResult};
use crate::pagination::{Page, PageRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::store::SharedEmployeeStore;

const DUPLICATE_EMAIL: &str = "Employee with this email already exists";

/// In-memory working set backed by an [`EmployeeStore`](crate::store::EmployeeStore).
///
/// Mutations are validated against the full set, written through the store,
/// and only then become visible to readers.
pub struct Directory {
    store: SharedEmployeeStore,
    employees: RwLock<Vec<Employee>>,
    default_page_size: usize,
    max_page_size: usize,
}

impl Directory {
    pub async fn open(store: SharedEmployeeStore) -> DirectoryResult<Self> {
        let employees = store.load().await?;
        tracing::info!(count = employees.len(), "loaded employee directory");
        Ok(Self {
            store,
            employees: RwLock::new(employees),
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        })
    }

    /// Page size used when a request names none, and the cap for all
    /// requests.
    pub fn with_page_sizes(mut self, default_page_size: usize, max_page_size: usize) -> Self {
        self.max_page_size = max_page_size.max(1);
        self.default_page_size = default_page_size.clamp(1, self.max_page_size);
        self
    }

    pub async fn len(&self) -> usize {
        self.employees.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.employees.read().await.is_empty()
    }

    /// Paginated listing ordered by `sort_order`, ties in creation order.
    pub async fn list_employees(
        &self,
        request: &PageRequest,
    ) -> DirectoryResult<Page<EmployeeListing>> {
        let employees = self.employees.read().await;
        let needle = request.needle();
        let mut matching: Vec<&Employee> = employees
            .iter()
            .filter(|employee| request.include_inactive || employee.is_active)
            .filter(|employee| {
                needle
                    .as_deref()
                    .map_or(true, |needle| employee.matches_search(needle))
            })
            .collect();
        matching.sort_by_key(|employee| employee.sort_order);

        let page = Page::slice(
            matching,
            request.page(),
            request.limit(self.default_page_size, self.max_page_size),
        );
        Ok(page.map(|employee| listing(&employees, employee)))
    }

    /// Builds the org chart for one listing page.
    pub async fn org_chart(&self, request: &PageRequest) -> DirectoryResult<Forest> {
        let page = self.list_employees(request).await?;
        let records: Vec<EmployeeRecord> = page
            .data
            .iter()
            .map(|listing| EmployeeRecord::from(&listing.employee))
            .collect();
        Ok(build_forest(&records))
    }

    pub async fn get_employee(&self, id: &str) -> DirectoryResult<EmployeeDetail> {
        let employees = self.employees.read().await;
        let employee = find(&employees, id)?;
        let mut reports: Vec<&Employee> = employees
            .iter()
            .filter(|candidate| candidate.manager_id.as_deref() == Some(id))
            .collect();
        reports.sort_by_key(|report| report.sort_order);

        Ok(EmployeeDetail {
            employee: employee.clone(),
            manager: manager_summary(&employees, employee),
            reports: reports.into_iter().map(Employee::summary).collect(),
        })
    }

    #[tracing::instrument(skip_all)]
    pub async fn create_employee(&self, payload: NewEmployee) -> DirectoryResult<Employee> {
        let first_name = required(&payload.first_name, "First name")?;
        let last_name = required(&payload.last_name, "Last name")?;
        let designation = required(&payload.designation, "Designation")?;
        let email = optional(payload.email);
        let manager_id = optional(payload.manager_id);

        let mut employees = self.employees.write().await;
        if let Some(email) = email.as_deref() {
            ensure_unique_email(&employees, email, None)?;
        }
        if let Some(manager_id) = manager_id.as_deref() {
            validate_manager(&records(&employees), None, manager_id)?;
        }

        let now = Utc::now();
        let employee = Employee {
            id: Uuid::now_v7().to_string(),
            first_name,
            last_name,
            email,
            phone: optional(payload.phone),
            designation,
            department: optional(payload.department),
            bio: optional(payload.bio),
            image_url: optional(payload.image_url),
            linkedin_url: optional(payload.linkedin_url),
            manager_id,
            is_active: payload.is_active.unwrap_or(true),
            sort_order: payload.sort_order.unwrap_or(0),
            joined_at: payload.joined_at,
            created_at: now,
            updated_at: now,
        };

        let mut next = employees.clone();
        next.push(employee.clone());
        self.store.save(&next).await?;
        *employees = next;

        tracing::info!(id = %employee.id, "created employee");
        Ok(employee)
    }

    /// Creates each entry in order. Stops at the first invalid entry;
    /// entries before it stay created.
    #[tracing::instrument(skip_all, fields(entries = entries.len()))]
    pub async fn import_employees(
        &self,
        entries: Vec<NewEmployee>,
    ) -> DirectoryResult<Vec<Employee>> {
        let mut created = Vec::with_capacity(entries.len());
        for (index, payload) in entries.into_iter().enumerate() {
            match self.create_employee(payload).await {
                Ok(employee) => created.push(employee),
                Err(error) => {
                    tracing::warn!(index, created = created.len(), %error, "import stopped");
                    return Err(DirectoryError::Import {
                        index,
                        source: Box::new(error),
                    });
                }
            }
        }
        tracing::info!(created = created.len(), "imported employees");
        Ok(created)
    }

    #[tracing::instrument(skip(self, patch))]
    pub async fn update_employee(
        &self,
        id: &str,
        patch: EmployeePatch,
    ) -> DirectoryResult<Employee> {
        let mut employees = self.employees.write().await;
        let index = position(&employees, id)?;
        let mut updated = employees[index].clone();

        if let Some(first_name) = patch.first_name {
            updated.first_name = required(&first_name, "First name")?;
        }
        if let Some(last_name) = patch.last_name {
            updated.last_name = required(&last_name, "Last name")?;
        }
        if let Some(designation) = patch.designation {
            updated.designation = required(&designation, "Designation")?;
        }
        if let Some(email) = patch.email {
            let email = optional(email);
            if let Some(email) = email.as_deref() {
                if updated.email.as_deref() != Some(email) {
                    ensure_unique_email(&employees, email, Some(id))?;
                }
            }
            updated.email = email;
        }
        if let Some(manager_id) = patch.manager_id {
            let manager_id = optional(manager_id);
            if let Some(manager_id) = manager_id.as_deref() {
                validate_manager(&records(&employees), Some(id), manager_id)?;
            }
            updated.manager_id = manager_id;
        }
        if let Some(phone) = patch.phone {
            updated.phone = optional(phone);
        }
        if let Some(department) = patch.department {
            updated.department = optional(department);
        }
        if let Some(bio) = patch.bio {
            updated.bio = optional(bio);
        }
        if let Some(image_url) = patch.image_url {
            updated.image_url = optional(image_url);
        }
        if let Some(linkedin_url) = patch.linkedin_url {
            updated.linkedin_url = optional(linkedin_url);
        }
        if let Some(is_active) = patch.is_active {
            updated.is_active = is_active;
        }
        if let Some(sort_order) = patch.sort_order {
            updated.sort_order = sort_order;
        }
        if let Some(joined_at) = patch.joined_at {
            updated.joined_at = joined_at;
        }
        updated.updated_at = Utc::now();

        let mut next = employees.clone();
        next[index] = updated.clone();
        self.store.save(&next).await?;
        *employees = next;

        tracing::info!("updated employee");
        Ok(updated)
    }

    /// Removes the employee. Their direct reports lose their manager and
    /// become top-level.
    #[tracing::instrument(skip(self))]
    pub async fn delete_employee(&self, id: &str) -> DirectoryResult<Employee> {
        let mut employees = self.employees.write().await;
        let index = position(&employees, id)?;

        let mut next = employees.clone();
        let removed = next.remove(index);
        let now = Utc::now();
        let mut orphaned = 0usize;
        for report in next
            .iter_mut()
            .filter(|report| report.manager_id.as_deref() == Some(id))
        {
            report.manager_id = None;
            report.updated_at = now;
            orphaned += 1;
        }
        self.store.save(&next).await?;
        *employees = next;

        tracing::info!(orphaned, "deleted employee");
        Ok(removed)
    }
}

fn records(employees: &[Employee]) -> Vec<EmployeeRecord> {
    employees.iter().map(EmployeeRecord::from).collect()
}

fn position(employees: &[Employee], id: &str) -> DirectoryResult<usize> {
    employees
        .iter()
        .position(|employee| employee.id == id)
        .ok_or_else(|| DirectoryError::NotFound(id.to_string()))
}

fn find<'a>(employees: &'a [Employee], id: &str) -> DirectoryResult<&'a Employee> {
    position(employees, id).map(|index| &employees[index])
}

fn ensure_unique_email(
    employees: &[Employee],
    email: &str,
    except_id: Option<&str>,
) -> DirectoryResult<()> {
    let taken = employees.iter().any(|employee| {
        Some(employee.id.as_str()) != except_id
            && employee
                .email
                .as_deref()
                .is_some_and(|existing| existing.eq_ignore_ascii_case(email))
    });
    if taken {
        return Err(DirectoryError::Conflict(DUPLICATE_EMAIL.to_string()));
    }
    Ok(())
}

fn manager_summary(employees: &[Employee], employee: &Employee) -> Option<ManagerSummary> {
    let manager_id = employee.manager_id.as_deref()?;
    employees
        .iter()
        .find(|candidate| candidate.id == manager_id)
        .map(Employee::summary)
}

fn listing(employees: &[Employee], employee: &Employee) -> EmployeeListing {
    EmployeeListing {
        employee: employee.clone(),
        manager: manager_summary(employees, employee),
        reports_count: employees
            .iter()
            .filter(|candidate| candidate.manager_id.as_deref() == Some(employee.id.as_str()))
            .count(),
    }
}
