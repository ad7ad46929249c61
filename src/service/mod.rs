use std::sync::Arc;
use uuid::Uuid;

use crate::errors::AppError;
use crate::hooks::HookChain;
use crate::models::employee::{
    normalize, normalize_update, validate, validate_update, Employee, EmployeeUpdate, NewEmployee,
};
use crate::store::{EmployeeFilter, EmployeePatch, EmployeeStore, StoreError};

/// Core employee operations: normalize → validate → hooks → store, in that
/// order, all-or-nothing. Any failure before the store call leaves the
/// store untouched.
pub struct EmployeeService {
    store: Arc<dyn EmployeeStore>,
    hooks: HookChain,
}

impl EmployeeService {
    pub fn new(store: Arc<dyn EmployeeStore>, hooks: HookChain) -> Self {
        EmployeeService { store, hooks }
    }

    pub fn create(&self, input: NewEmployee) -> Result<Employee, AppError> {
        let input = normalize(input);
        validate(&input).map_err(AppError::Validation)?;
        let mut employee = Employee::from_input(input);
        self.hooks.notify_after_validate(&employee);
        self.hooks.run_before_save(&mut employee)?;
        let stored = self
            .store
            .insert(employee)
            .map_err(Self::map_store_error)?;
        self.hooks.notify_after_save(&stored);
        Ok(stored)
    }

    pub fn get(&self, id: Uuid) -> Result<Employee, AppError> {
        let employee = self
            .store
            .find(&EmployeeFilter::by_id(id))
            .map_err(Self::map_store_error)?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;
        self.hooks.notify_after_load(&employee);
        Ok(employee)
    }

    pub fn list(&self, filter: EmployeeFilter) -> Result<Vec<Employee>, AppError> {
        let employees = self.store.find(&filter).map_err(Self::map_store_error)?;
        for employee in &employees {
            self.hooks.notify_after_load(employee);
        }
        Ok(employees)
    }

    /// In-place update: the document is patched at the store without being
    /// loaded, so the before-update hooks stamp the patch itself.
    pub fn update(&self, id: Uuid, update: EmployeeUpdate) -> Result<Employee, AppError> {
        let update = normalize_update(update);
        validate_update(&update).map_err(AppError::Validation)?;
        if let Some(value) = &update.full_name {
            // fullName is derived; the write is accepted and dropped.
            log::debug!("ignoring write of {:?} to derived field fullName", value);
        }
        let mut patch = EmployeePatch {
            first_name: update.first_name,
            last_name: update.last_name,
            email: update.email,
            gender: update.gender,
            city: update.city,
            designation: update.designation,
            salary: update.salary,
            updated_at: None,
        };
        self.hooks.run_before_update(&mut patch)?;
        let updated = self
            .store
            .update_one(&EmployeeFilter::by_id(id), &patch)
            .map_err(Self::map_store_error)?;
        self.hooks.notify_after_save(&updated);
        Ok(updated)
    }

    pub fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let filter = EmployeeFilter::by_id(id);
        let employee = self
            .store
            .find(&filter)
            .map_err(Self::map_store_error)?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;
        let removed = self.store.delete_one(&filter).map_err(Self::map_store_error)?;
        if !removed {
            return Err(AppError::NotFound("Employee not found".to_string()));
        }
        self.hooks.notify_after_remove(&employee);
        Ok(())
    }

    fn map_store_error(err: StoreError) -> AppError {
        match err {
            StoreError::Conflict(field) => {
                AppError::Conflict(format!("An employee with this {} already exists", field))
            }
            StoreError::NotFound => AppError::NotFound("Employee not found".to_string()),
            StoreError::Unavailable(reason) => AppError::StoreUnavailable(reason),
        }
    }
}
