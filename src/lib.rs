pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod inquiries;
pub mod models;
pub mod permissions;
pub mod priorities;
pub mod rate_limit;
pub mod routes;
pub mod sla;
pub mod visitors;

use config::Config;
use db::Db;
use error::InitError;
use events::EventBus;
use rate_limit::RateLimiter;
use rocket_cors::CorsOptions;

pub fn rocket() -> Result<rocket::Rocket<rocket::Build>, InitError> {
    rocket_with_config(Config::from_env())
}

pub fn rocket_with_config(config: Config) -> Result<rocket::Rocket<rocket::Build>, InitError> {
    // Ensure data directory exists
    if let Some(parent) = std::path::Path::new(&config.database_path).parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let db_err = |source| InitError::Database {
        path: config.database_path.clone(),
        source,
    };
    let db = Db::open(&config.database_path).map_err(db_err)?;
    if let Some(token) = db.seed_admin(&config.admin).map_err(db_err)? {
        tracing::warn!(
            user_id = %config.admin.user_id,
            token = %token,
            "generated admin token; set ADMIN_TOKEN to pin it"
        );
    }
    tracing::info!(path = %config.database_path, "database ready");

    let cors = CorsOptions::default().to_cors()?;

    Ok(rocket::build()
        .manage(db)
        .manage(EventBus::new())
        .manage(RateLimiter::new())
        .manage(config.rate_limits)
        .attach(cors)
        .register(
            "/",
            rocket::catchers![
                routes::bad_request,
                routes::unauthorized,
                routes::forbidden,
                routes::not_found,
                routes::unprocessable,
                routes::too_many_requests,
                routes::internal_error,
            ],
        )
        .mount(
            "/",
            rocket::routes![
                routes::health,
                routes::unmatched_post,
                routes::unmatched_put,
                routes::list_permissions,
                routes::update_permissions,
                routes::create_priority,
                routes::list_priorities,
                routes::get_priority,
                routes::delete_priority,
                routes::list_sla,
                routes::create_sla,
                routes::get_sla,
                routes::update_sla,
                routes::delete_sla,
                routes::prioritize_inquiry,
                routes::take_inquiry,
                routes::get_inquiry,
                routes::list_queued,
                routes::inquiry_stream,
                routes::register_visitor,
                routes::open_room,
            ],
        ))
}
