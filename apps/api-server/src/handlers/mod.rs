//! HTTP handlers and route configuration.

mod categories;
mod comments;
mod health;
mod posts;
mod reports;

#[cfg(test)]
mod tests;

use actix_web::web;
use serde::de::DeserializeOwned;

use crate::middleware::error::{AppError, reject};

/// Parse a lowercase/snake_case enum value received as a plain string.
fn parse_enum<T: DeserializeOwned>(field: &str, raw: &str) -> Result<T, AppError> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|_| AppError::BadRequest(format!("Invalid {field}: {raw}")))
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(reject))
        .app_data(web::PathConfig::default().error_handler(reject))
        .app_data(web::QueryConfig::default().error_handler(reject))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(health::health_check))
                .service(
                    web::scope("/v1")
                        .service(
                            web::scope("/posts")
                                .route("", web::get().to(posts::list_posts))
                                .route("", web::post().to(posts::create_post))
                                // Before "/{id}" so "search" is not taken for an id
                                .route("/search", web::get().to(posts::search_posts))
                                .route("/{id}", web::get().to(posts::get_post))
                                .route("/{id}", web::put().to(posts::update_post))
                                .route("/{id}", web::delete().to(posts::delete_post))
                                .route("/{id}/like", web::put().to(posts::toggle_like))
                                .route("/{id}/comments", web::get().to(comments::list_comments))
                                .route(
                                    "/{id}/comments",
                                    web::post().to(comments::create_comment),
                                ),
                        )
                        .service(
                            web::scope("/categories")
                                .route("", web::get().to(categories::list_categories))
                                .route("", web::post().to(categories::create_category))
                                .route("/{id}", web::get().to(categories::get_category))
                                .route("/{id}", web::put().to(categories::rename_category))
                                .route("/{id}", web::delete().to(categories::delete_category)),
                        )
                        .service(
                            web::scope("/reports")
                                .route("", web::get().to(reports::list_reports))
                                .route("", web::post().to(reports::create_report))
                                .route("/{id}", web::put().to(reports::update_report)),
                        ),
                ),
        );
}
