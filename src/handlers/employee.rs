use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::models::employee::{Employee, EmployeeUpdate, NewEmployee};
use crate::service::EmployeeService;
use crate::store::EmployeeFilter;

/// Outward-facing record shape: the stored fields plus the derived
/// `fullName`, which is computed on the way out and never persisted.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmployeeResponse {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    gender: String,
    city: String,
    designation: String,
    salary: f64,
    full_name: String,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<&Employee> for EmployeeResponse {
    fn from(employee: &Employee) -> Self {
        EmployeeResponse {
            id: employee.id,
            first_name: employee.first_name.clone(),
            last_name: employee.last_name.clone(),
            email: employee.email.clone(),
            gender: employee.gender.clone(),
            city: employee.city.clone(),
            designation: employee.designation.clone(),
            salary: employee.salary,
            full_name: employee.full_name(),
            created_at: employee.created_at,
            updated_at: employee.updated_at,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmployeeQueryParams {
    first_name: Option<String>,
    last_name: Option<String>,
    designation: Option<String>,
    min_salary: Option<f64>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/v1/employees")
            .route(web::post().to(create_employee))
            .route(web::get().to(get_employees)),
    )
    .service(
        web::resource("/v1/employees/{id}")
            .route(web::get().to(get_employee))
            .route(web::put().to(update_employee))
            .route(web::delete().to(delete_employee)),
    );
}

fn parse_id(raw: &str) -> Result<Uuid, actix_web::Error> {
    Uuid::parse_str(raw).map_err(|_| actix_web::error::ErrorBadRequest("Invalid employee ID"))
}

pub async fn create_employee(
    service: web::Data<EmployeeService>,
    new_employee: web::Json<NewEmployee>,
) -> Result<HttpResponse, actix_web::Error> {
    let stored = service.create(new_employee.into_inner())?;
    Ok(HttpResponse::Created().json(EmployeeResponse::from(&stored)))
}

pub async fn get_employees(
    service: web::Data<EmployeeService>,
    query: web::Query<EmployeeQueryParams>,
) -> Result<HttpResponse, actix_web::Error> {
    let mut filter = EmployeeFilter::default();
    if let Some(first_name) = &query.first_name {
        filter = filter.with_first_name(first_name);
    }
    if let Some(last_name) = &query.last_name {
        filter = filter.with_last_name(last_name);
    }
    if let Some(designation) = &query.designation {
        filter = filter.with_designation(designation);
    }
    if let Some(min_salary) = query.min_salary {
        filter = filter.with_min_salary(min_salary);
    }

    let employees = service.list(filter)?;
    let body: Vec<EmployeeResponse> = employees.iter().map(EmployeeResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

pub async fn get_employee(
    service: web::Data<EmployeeService>,
    id: web::Path<String>,
) -> Result<HttpResponse, actix_web::Error> {
    let id = parse_id(&id.into_inner())?;
    let employee = service.get(id)?;
    Ok(HttpResponse::Ok().json(EmployeeResponse::from(&employee)))
}

pub async fn update_employee(
    service: web::Data<EmployeeService>,
    id: web::Path<String>,
    updates: web::Json<EmployeeUpdate>,
) -> Result<HttpResponse, actix_web::Error> {
    let id = parse_id(&id.into_inner())?;
    let updated = service.update(id, updates.into_inner())?;
    Ok(HttpResponse::Ok().json(EmployeeResponse::from(&updated)))
}

pub async fn delete_employee(
    service: web::Data<EmployeeService>,
    id: web::Path<String>,
) -> Result<HttpResponse, actix_web::Error> {
    let id = parse_id(&id.into_inner())?;
    service.delete(id)?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee deleted successfully",
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::HookChain;
    use crate::store::memory::MemoryStore;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use std::sync::Arc;

    fn app_state() -> web::Data<EmployeeService> {
        web::Data::new(EmployeeService::new(
            Arc::new(MemoryStore::new()),
            HookChain::standard(),
        ))
    }

    fn john_payload() -> serde_json::Value {
        json!({
            "firstName": "John",
            "lastName": "Doe",
            "email": "john@x.com",
            "gender": "male",
            "city": "NYC",
            "designation": "Engineer",
            "salary": 1000.0
        })
    }

    #[actix_web::test]
    async fn create_returns_the_normalized_record_with_full_name() {
        let app =
            test::init_service(App::new().app_data(app_state()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/v1/employees")
            .set_json(john_payload())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["firstName"], "john");
        assert_eq!(body["lastName"], "doe");
        assert_eq!(body["email"], "JOHN@X.COM");
        assert_eq!(body["fullName"], "john doe");
        assert_eq!(body["createdAt"], body["updatedAt"]);
    }

    #[actix_web::test]
    async fn duplicate_email_returns_conflict() {
        let app =
            test::init_service(App::new().app_data(app_state()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/v1/employees")
            .set_json(john_payload())
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::CREATED
        );

        let req = test::TestRequest::post()
            .uri("/v1/employees")
            .set_json(john_payload())
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::CONFLICT
        );
    }

    #[actix_web::test]
    async fn invalid_payload_returns_the_violated_field_list() {
        let app =
            test::init_service(App::new().app_data(app_state()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/v1/employees")
            .set_json(json!({ "salary": -5.0 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        let fields = body["fields"].as_array().unwrap();
        assert_eq!(fields.len(), 7);
        assert!(fields
            .iter()
            .any(|e| e["field"] == "salary" && e["code"] == "domain"));
    }

    #[actix_web::test]
    async fn list_composes_first_name_and_salary_filters() {
        let app =
            test::init_service(App::new().app_data(app_state()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/v1/employees")
            .set_json(john_payload())
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::get()
            .uri("/v1/employees?firstName=John&minSalary=900")
            .to_request();
        let body: serde_json::Value =
            test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(body.as_array().unwrap().len(), 1);

        let req = test::TestRequest::get()
            .uri("/v1/employees?firstName=John&minSalary=2000")
            .to_request();
        let body: serde_json::Value =
            test::read_body_json(test::call_service(&app, req).await).await;
        assert!(body.as_array().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn update_and_delete_round_trip() {
        let app =
            test::init_service(App::new().app_data(app_state()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/v1/employees")
            .set_json(john_payload())
            .to_request();
        let body: serde_json::Value =
            test::read_body_json(test::call_service(&app, req).await).await;
        let id = body["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::put()
            .uri(&format!("/v1/employees/{}", id))
            .set_json(json!({ "salary": 2000.0, "fullName": "jane roe" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["salary"], 2000.0);
        // The write to the derived field was discarded.
        assert_eq!(body["fullName"], "john doe");

        let req = test::TestRequest::delete()
            .uri(&format!("/v1/employees/{}", id))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri(&format!("/v1/employees/{}", id))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[actix_web::test]
    async fn a_malformed_id_is_a_bad_request() {
        let app =
            test::init_service(App::new().app_data(app_state()).configure(configure)).await;
        let req = test::TestRequest::get()
            .uri("/v1/employees/not-a-uuid")
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST
        );
    }
}
