use chrono::Utc;
use log::{debug, info};

use crate::errors::AppError;
use crate::models::employee::Employee;
use crate::store::EmployeePatch;

pub type SaveHook = Box<dyn Fn(&mut Employee) -> Result<(), AppError> + Send + Sync>;
pub type UpdateHook = Box<dyn Fn(&mut EmployeePatch) -> Result<(), AppError> + Send + Sync>;
pub type NotifyHook = Box<dyn Fn(&Employee) + Send + Sync>;

/// Ordered, named lifecycle hooks, injected into the service at
/// construction.
///
/// The before-save and before-update lists may mutate their target and may
/// abort the operation by returning an error, which prevents later hooks
/// and the store mutation from running. Before-update hooks operate on the
/// outgoing patch, never on a loaded instance: an in-place update may never
/// load the document into memory.
///
/// The after-* lists are notification points; their `()` return makes it
/// impossible for them to abort or to alter the record they observe.
pub struct HookChain {
    before_save: Vec<(&'static str, SaveHook)>,
    before_update: Vec<(&'static str, UpdateHook)>,
    after_load: Vec<(&'static str, NotifyHook)>,
    after_validate: Vec<(&'static str, NotifyHook)>,
    after_save: Vec<(&'static str, NotifyHook)>,
    after_remove: Vec<(&'static str, NotifyHook)>,
}

impl HookChain {
    pub fn empty() -> Self {
        HookChain {
            before_save: Vec::new(),
            before_update: Vec::new(),
            after_load: Vec::new(),
            after_validate: Vec::new(),
            after_save: Vec::new(),
            after_remove: Vec::new(),
        }
    }

    /// The standard chain: audit timestamp stamping plus logging at every
    /// notification point.
    pub fn standard() -> Self {
        HookChain::empty()
            .on_before_save("stamp-timestamps", |employee| {
                debug!("before save: stamping timestamps for {}", employee.id);
                let now = Utc::now();
                // created_at is set exactly once, on the first save.
                if employee.created_at.is_none() {
                    employee.created_at = Some(now);
                }
                employee.updated_at = Some(now);
                Ok(())
            })
            .on_before_update("stamp-updated-at", |patch| {
                debug!("before update: stamping updatedAt on patch");
                patch.updated_at = Some(Utc::now());
                Ok(())
            })
            .on_after_load("log-loaded", |employee| {
                info!("{} has been loaded from the store", employee.id);
            })
            .on_after_validate("log-validated", |employee| {
                info!("{} has been validated but not yet saved", employee.id);
            })
            .on_after_save("log-saved", |employee| {
                info!("{} has been saved", employee.id);
            })
            .on_after_remove("log-removed", |employee| {
                info!("{} has been removed", employee.id);
            })
    }

    pub fn on_before_save<F>(mut self, name: &'static str, hook: F) -> Self
    where
        F: Fn(&mut Employee) -> Result<(), AppError> + Send + Sync + 'static,
    {
        self.before_save.push((name, Box::new(hook)));
        self
    }

    pub fn on_before_update<F>(mut self, name: &'static str, hook: F) -> Self
    where
        F: Fn(&mut EmployeePatch) -> Result<(), AppError> + Send + Sync + 'static,
    {
        self.before_update.push((name, Box::new(hook)));
        self
    }

    pub fn on_after_load<F>(mut self, name: &'static str, hook: F) -> Self
    where
        F: Fn(&Employee) + Send + Sync + 'static,
    {
        self.after_load.push((name, Box::new(hook)));
        self
    }

    pub fn on_after_validate<F>(mut self, name: &'static str, hook: F) -> Self
    where
        F: Fn(&Employee) + Send + Sync + 'static,
    {
        self.after_validate.push((name, Box::new(hook)));
        self
    }

    pub fn on_after_save<F>(mut self, name: &'static str, hook: F) -> Self
    where
        F: Fn(&Employee) + Send + Sync + 'static,
    {
        self.after_save.push((name, Box::new(hook)));
        self
    }

    pub fn on_after_remove<F>(mut self, name: &'static str, hook: F) -> Self
    where
        F: Fn(&Employee) + Send + Sync + 'static,
    {
        self.after_remove.push((name, Box::new(hook)));
        self
    }

    pub fn run_before_save(&self, employee: &mut Employee) -> Result<(), AppError> {
        for (name, hook) in &self.before_save {
            hook(employee).map_err(|err| {
                debug!("before-save hook {:?} aborted the operation", name);
                err
            })?;
        }
        Ok(())
    }

    pub fn run_before_update(&self, patch: &mut EmployeePatch) -> Result<(), AppError> {
        for (name, hook) in &self.before_update {
            hook(patch).map_err(|err| {
                debug!("before-update hook {:?} aborted the operation", name);
                err
            })?;
        }
        Ok(())
    }

    pub fn notify_after_load(&self, employee: &Employee) {
        for (_, hook) in &self.after_load {
            hook(employee);
        }
    }

    pub fn notify_after_validate(&self, employee: &Employee) {
        for (_, hook) in &self.after_validate {
            hook(employee);
        }
    }

    pub fn notify_after_save(&self, employee: &Employee) {
        for (_, hook) in &self.after_save {
            hook(employee);
        }
    }

    pub fn notify_after_remove(&self, employee: &Employee) {
        for (_, hook) in &self.after_remove {
            hook(employee);
        }
    }
}
