use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use uuid::Uuid;

use crate::errors::FieldError;

/// Accepted values for the gender field.
pub const GENDERS: [&str; 3] = ["male", "female", "other"];

/// Canonical employee record as kept in the store.
///
/// `created_at`/`updated_at` start out unset and are stamped by the
/// lifecycle hooks before the record first reaches the store; a persisted
/// record always carries both.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub first_name: String,
    #[serde(alias = "surname")]
    pub last_name: String,
    pub email: String,
    pub gender: String,
    pub city: String,
    pub designation: String,
    pub salary: f64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Employee {
    /// Derived full name; computed on read, never stored.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Salary with a currency prefix, e.g. `$1000`.
    pub fn formatted_salary(&self) -> String {
        format!("${}", self.salary)
    }

    /// Accepts a write to the derived full name and discards it.
    ///
    /// The full name has no backing storage. Splitting the value back into
    /// first/last name would silently corrupt stored fields, so the write
    /// is logged and dropped instead. `first_name`/`last_name` are never
    /// touched.
    pub fn set_full_name(&self, value: &str) {
        log::debug!(
            "ignoring write of {:?} to derived field fullName on {}",
            value,
            self.id
        );
    }

    pub fn from_input(input: NewEmployee) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            gender: input.gender,
            city: input.city,
            designation: input.designation,
            salary: input.salary.unwrap_or(0.0),
            created_at: None,
            updated_at: None,
        }
    }
}

/// Raw creation payload. String fields default to empty so a missing field
/// surfaces as a `required` validation error instead of a deserialization
/// failure.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    #[serde(default)]
    pub first_name: String,
    #[serde(default, alias = "surname")]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub designation: String,
    pub salary: Option<f64>,
}

/// Raw update payload; only provided fields are validated and patched.
/// `full_name` is accepted here but discarded (see [`Employee::set_full_name`]).
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeUpdate {
    pub first_name: Option<String>,
    #[serde(alias = "surname")]
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub city: Option<String>,
    pub designation: Option<String>,
    pub salary: Option<f64>,
    pub full_name: Option<String>,
}

#[derive(Clone, Copy)]
enum CaseRule {
    Lower,
    Upper,
}

/// One row of the per-field rule table: how the field is normalized and
/// which predicate it must pass. Normalization always runs before the
/// predicate, so checks see canonical values.
struct TextRule {
    field: &'static str,
    case: CaseRule,
    get: fn(&NewEmployee) -> &str,
    set: fn(&mut NewEmployee, String),
    check: fn(&str) -> Option<(&'static str, String)>,
}

static TEXT_RULES: &[TextRule] = &[
    TextRule {
        field: "firstName",
        case: CaseRule::Lower,
        get: |e| &e.first_name,
        set: |e, v| e.first_name = v,
        check: |v| check_required(v, "Please enter first name"),
    },
    TextRule {
        field: "lastName",
        case: CaseRule::Lower,
        get: |e| &e.last_name,
        set: |e, v| e.last_name = v,
        check: |v| check_required(v, "Please enter last name"),
    },
    TextRule {
        field: "email",
        case: CaseRule::Upper,
        get: |e| &e.email,
        set: |e, v| e.email = v,
        check: check_email,
    },
    TextRule {
        field: "gender",
        case: CaseRule::Lower,
        get: |e| &e.gender,
        set: |e, v| e.gender = v,
        check: check_gender,
    },
    TextRule {
        field: "city",
        case: CaseRule::Lower,
        get: |e| &e.city,
        set: |e, v| e.city = v,
        check: |v| check_required(v, "Please enter city"),
    },
    TextRule {
        field: "designation",
        case: CaseRule::Lower,
        get: |e| &e.designation,
        set: |e, v| e.designation = v,
        check: |v| check_required(v, "Please enter designation"),
    },
];

fn apply_case(case: CaseRule, value: &str) -> String {
    let trimmed = value.trim();
    match case {
        CaseRule::Lower => trimmed.to_lowercase(),
        CaseRule::Upper => trimmed.to_uppercase(),
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_re() -> &'static Regex {
    // The whole pattern is optional, so the empty string also matches.
    // Kept deliberately; the presence rule reports that case before the
    // format rule ever sees it.
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^([\w\-.]+@([\w-]+\.)+[\w-]{2,4})?$").expect("email pattern is valid")
    })
}

fn check_required(value: &str, message: &str) -> Option<(&'static str, String)> {
    if value.is_empty() {
        Some(("required", message.to_string()))
    } else {
        None
    }
}

fn check_email(value: &str) -> Option<(&'static str, String)> {
    if value.is_empty() {
        return Some(("required", "Please enter email".to_string()));
    }
    if value.len() < 5 || value.len() > 50 {
        return Some(("length", "Email must be 5 to 50 characters".to_string()));
    }
    if !email_re().is_match(value) {
        return Some(("format", "Email must look like local@domain.tld".to_string()));
    }
    None
}

fn check_gender(value: &str) -> Option<(&'static str, String)> {
    if value.is_empty() {
        return Some(("required", "Please enter gender".to_string()));
    }
    if !GENDERS.contains(&value) {
        return Some(("enum", "Gender must be one of male, female, other".to_string()));
    }
    None
}

fn check_salary(value: f64) -> Option<(&'static str, String)> {
    if value < 0.0 {
        Some(("domain", "Negative salary not allowed".to_string()))
    } else {
        None
    }
}

/// Normalizes a raw creation payload: trims every string field,
/// lower-cases names, gender, city and designation, upper-cases the email.
/// Idempotent, no side effects.
pub fn normalize(mut input: NewEmployee) -> NewEmployee {
    for rule in TEXT_RULES {
        let canonical = apply_case(rule.case, (rule.get)(&input));
        (rule.set)(&mut input, canonical);
    }
    input
}

/// Validates a normalized creation payload, collecting every violated
/// field rather than stopping at the first. Email uniqueness is not
/// checked here; the store adapter enforces it.
pub fn validate(input: &NewEmployee) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    for rule in TEXT_RULES {
        if let Some((code, message)) = (rule.check)((rule.get)(input)) {
            errors.push(FieldError::new(rule.field, code, message));
        }
    }
    if let Some((code, message)) = check_salary(input.salary.unwrap_or(0.0)) {
        errors.push(FieldError::new("salary", code, message));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Normalizes the provided fields of an update payload with the same rules
/// as [`normalize`].
pub fn normalize_update(mut update: EmployeeUpdate) -> EmployeeUpdate {
    if let Some(v) = update.first_name.take() {
        update.first_name = Some(apply_case(CaseRule::Lower, &v));
    }
    if let Some(v) = update.last_name.take() {
        update.last_name = Some(apply_case(CaseRule::Lower, &v));
    }
    if let Some(v) = update.email.take() {
        update.email = Some(apply_case(CaseRule::Upper, &v));
    }
    if let Some(v) = update.gender.take() {
        update.gender = Some(apply_case(CaseRule::Lower, &v));
    }
    if let Some(v) = update.city.take() {
        update.city = Some(apply_case(CaseRule::Lower, &v));
    }
    if let Some(v) = update.designation.take() {
        update.designation = Some(apply_case(CaseRule::Lower, &v));
    }
    update
}

/// Validates the provided fields of a normalized update payload. A field
/// that is present must satisfy the same rule it would at creation.
pub fn validate_update(update: &EmployeeUpdate) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    let checks: [(
        &'static str,
        Option<&String>,
        fn(&str) -> Option<(&'static str, String)>,
    ); 6] = [
        ("firstName", update.first_name.as_ref(), |v| {
            check_required(v, "Please enter first name")
        }),
        ("lastName", update.last_name.as_ref(), |v| {
            check_required(v, "Please enter last name")
        }),
        ("email", update.email.as_ref(), check_email),
        ("gender", update.gender.as_ref(), check_gender),
        ("city", update.city.as_ref(), |v| {
            check_required(v, "Please enter city")
        }),
        ("designation", update.designation.as_ref(), |v| {
            check_required(v, "Please enter designation")
        }),
    ];
    for (field, value, check) in checks {
        if let Some(value) = value {
            if let Some((code, message)) = check(value) {
                errors.push(FieldError::new(field, code, message));
            }
        }
    }
    if let Some(salary) = update.salary {
        if let Some((code, message)) = check_salary(salary) {
            errors.push(FieldError::new("salary", code, message));
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
