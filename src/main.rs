mod errors;
mod handlers;
mod hooks;
mod models;
mod service;
mod store;

use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use log::info;
use std::env;
use std::sync::Arc;

use hooks::HookChain;
use service::EmployeeService;
use store::memory::MemoryStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    let store = Arc::new(MemoryStore::new());
    let service = web::Data::new(EmployeeService::new(store, HookChain::standard()));

    info!("Starting server at {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .configure(handlers::employee::configure)
    })
    .bind(bind_addr)?
    .run()
    .await
}
