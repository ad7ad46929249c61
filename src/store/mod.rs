pub mod memory;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::employee::Employee;

/// Conjunctive filter over stored employees.
///
/// Built through the named helpers below so callers never restate the
/// underlying equality/range predicates. String arguments are normalized
/// (trimmed, lower-cased) to match what the store actually holds.
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    pub id: Option<Uuid>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub designation: Option<String>,
    pub min_salary: Option<f64>,
}

impl EmployeeFilter {
    pub fn by_id(id: Uuid) -> Self {
        EmployeeFilter {
            id: Some(id),
            ..EmployeeFilter::default()
        }
    }

    pub fn by_first_name(value: &str) -> Self {
        EmployeeFilter::default().with_first_name(value)
    }

    pub fn by_last_name(value: &str) -> Self {
        EmployeeFilter::default().with_last_name(value)
    }

    pub fn with_first_name(mut self, value: &str) -> Self {
        self.first_name = Some(value.trim().to_lowercase());
        self
    }

    pub fn with_last_name(mut self, value: &str) -> Self {
        self.last_name = Some(value.trim().to_lowercase());
        self
    }

    pub fn with_designation(mut self, value: &str) -> Self {
        self.designation = Some(value.trim().to_lowercase());
        self
    }

    pub fn with_min_salary(mut self, salary: f64) -> Self {
        self.min_salary = Some(salary);
        self
    }

    pub fn matches(&self, employee: &Employee) -> bool {
        if let Some(id) = self.id {
            if employee.id != id {
                return false;
            }
        }
        if let Some(first_name) = &self.first_name {
            if &employee.first_name != first_name {
                return false;
            }
        }
        if let Some(last_name) = &self.last_name {
            if &employee.last_name != last_name {
                return false;
            }
        }
        if let Some(designation) = &self.designation {
            if &employee.designation != designation {
                return false;
            }
        }
        if let Some(min_salary) = self.min_salary {
            if employee.salary < min_salary {
                return false;
            }
        }
        true
    }
}

/// Partial update sent to the store. Built from a validated
/// [`crate::models::employee::EmployeeUpdate`]; `updated_at` is stamped by
/// the before-update hook on this structure directly, since an in-place
/// update never loads the document into memory.
#[derive(Debug, Clone, Default)]
pub struct EmployeePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub city: Option<String>,
    pub designation: Option<String>,
    pub salary: Option<f64>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl EmployeePatch {
    pub fn apply_to(&self, employee: &mut Employee) {
        if let Some(v) = &self.first_name {
            employee.first_name = v.clone();
        }
        if let Some(v) = &self.last_name {
            employee.last_name = v.clone();
        }
        if let Some(v) = &self.email {
            employee.email = v.clone();
        }
        if let Some(v) = &self.gender {
            employee.gender = v.clone();
        }
        if let Some(v) = &self.city {
            employee.city = v.clone();
        }
        if let Some(v) = &self.designation {
            employee.designation = v.clone();
        }
        if let Some(v) = self.salary {
            employee.salary = v;
        }
        if let Some(v) = self.updated_at {
            employee.updated_at = Some(v);
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum StoreError {
    /// Uniqueness constraint violated on the named field.
    Conflict(&'static str),
    NotFound,
    Unavailable(String),
}

/// Document persistence boundary.
///
/// The adapter owns the email uniqueness constraint; duplicate inserts and
/// email-changing updates race here, not in the core.
pub trait EmployeeStore: Send + Sync {
    fn insert(&self, employee: Employee) -> Result<Employee, StoreError>;
    fn find(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>, StoreError>;
    fn update_one(
        &self,
        filter: &EmployeeFilter,
        patch: &EmployeePatch,
    ) -> Result<Employee, StoreError>;
    fn delete_one(&self, filter: &EmployeeFilter) -> Result<bool, StoreError>;
}
