use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use super::{EmployeeFilter, EmployeePatch, EmployeeStore, StoreError};
use crate::models::employee::Employee;

/// In-memory document store.
///
/// Enforces the email uniqueness constraint on insert and on any update
/// that changes the email, which makes it the single serialization point
/// for concurrent writes to the same address.
#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<Uuid, Employee>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

impl EmployeeStore for MemoryStore {
    fn insert(&self, employee: Employee) -> Result<Employee, StoreError> {
        let mut documents = self
            .documents
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))?;
        if documents.values().any(|d| d.email == employee.email) {
            return Err(StoreError::Conflict("email"));
        }
        documents.insert(employee.id, employee.clone());
        Ok(employee)
    }

    fn find(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>, StoreError> {
        let documents = self
            .documents
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))?;
        let mut matches: Vec<Employee> = documents
            .values()
            .filter(|d| filter.matches(d))
            .cloned()
            .collect();
        // Newest first, stable across runs.
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(matches)
    }

    fn update_one(
        &self,
        filter: &EmployeeFilter,
        patch: &EmployeePatch,
    ) -> Result<Employee, StoreError> {
        let mut documents = self
            .documents
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))?;
        let target_id = documents
            .values()
            .find(|d| filter.matches(d))
            .map(|d| d.id)
            .ok_or(StoreError::NotFound)?;
        if let Some(email) = &patch.email {
            if documents
                .values()
                .any(|d| d.id != target_id && &d.email == email)
            {
                return Err(StoreError::Conflict("email"));
            }
        }
        let document = documents
            .get_mut(&target_id)
            .ok_or(StoreError::NotFound)?;
        patch.apply_to(document);
        Ok(document.clone())
    }

    fn delete_one(&self, filter: &EmployeeFilter) -> Result<bool, StoreError> {
        let mut documents = self
            .documents
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))?;
        let target_id = documents.values().find(|d| filter.matches(d)).map(|d| d.id);
        match target_id {
            Some(id) => {
                documents.remove(&id);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::models::employee::{normalize, NewEmployee};

    fn stored(first: &str, email: &str, salary: f64) -> Employee {
        let mut employee = Employee::from_input(normalize(NewEmployee {
            first_name: first.to_string(),
            last_name: "doe".to_string(),
            email: email.to_string(),
            gender: "other".to_string(),
            city: "nyc".to_string(),
            designation: "engineer".to_string(),
            salary: Some(salary),
        }));
        let now = Utc::now();
        employee.created_at = Some(now);
        employee.updated_at = Some(now);
        employee
    }

    #[test]
    fn duplicate_email_insert_is_a_conflict_and_keeps_one_record() {
        let store = MemoryStore::new();
        store.insert(stored("john", "john@x.com", 1000.0)).unwrap();
        let err = store
            .insert(stored("johnny", "john@x.com", 2000.0))
            .unwrap_err();
        assert_eq!(err, StoreError::Conflict("email"));
        let all = store.find(&EmployeeFilter::default()).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].first_name, "john");
    }

    #[test]
    fn update_one_patches_the_matching_document() {
        let store = MemoryStore::new();
        let john = store.insert(stored("john", "john@x.com", 1000.0)).unwrap();
        let stamp = Utc::now();
        let updated = store
            .update_one(
                &EmployeeFilter::by_id(john.id),
                &EmployeePatch {
                    salary: Some(1500.0),
                    updated_at: Some(stamp),
                    ..EmployeePatch::default()
                },
            )
            .unwrap();
        assert_eq!(updated.salary, 1500.0);
        assert_eq!(updated.updated_at, Some(stamp));
        assert_eq!(updated.created_at, john.created_at);
    }

    #[test]
    fn update_one_rejects_an_email_already_taken() {
        let store = MemoryStore::new();
        store.insert(stored("john", "john@x.com", 1000.0)).unwrap();
        let jane = store.insert(stored("jane", "jane@x.com", 2000.0)).unwrap();
        let err = store
            .update_one(
                &EmployeeFilter::by_id(jane.id),
                &EmployeePatch {
                    email: Some("JOHN@X.COM".to_string()),
                    ..EmployeePatch::default()
                },
            )
            .unwrap_err();
        assert_eq!(err, StoreError::Conflict("email"));
    }

    #[test]
    fn update_one_without_a_match_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .update_one(
                &EmployeeFilter::by_id(Uuid::new_v4()),
                &EmployeePatch::default(),
            )
            .unwrap_err();
        assert_eq!(err, StoreError::NotFound);
    }

    #[test]
    fn delete_one_reports_whether_a_document_was_removed() {
        let store = MemoryStore::new();
        let john = store.insert(stored("john", "john@x.com", 1000.0)).unwrap();
        assert!(store.delete_one(&EmployeeFilter::by_id(john.id)).unwrap());
        assert!(!store.delete_one(&EmployeeFilter::by_id(john.id)).unwrap());
        assert!(store.find(&EmployeeFilter::default()).unwrap().is_empty());
    }

    #[test]
    fn find_filters_by_first_name_and_salary_threshold() {
        let store = MemoryStore::new();
        store.insert(stored("john", "john@x.com", 1000.0)).unwrap();
        store.insert(stored("jane", "jane@x.com", 3000.0)).unwrap();

        let hits = store
            .find(&EmployeeFilter::by_first_name("john").with_min_salary(900.0))
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].first_name, "john");

        let hits = store
            .find(&EmployeeFilter::by_first_name("john").with_min_salary(2000.0))
            .unwrap();
        assert!(hits.is_empty());
    }
}
