#[macro_use]
extern crate rocket;

mod config;
mod db;
mod guards;
mod models;
mod routes;
mod services;
mod utils;

use dotenvy::dotenv;
use std::time::Duration;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::Header;
use rocket::{Build, Request, Response, Rocket};
use rocket_okapi::swagger_ui::{SwaggerUIConfig, make_swagger_ui};

/* ----------------------------- CORS ----------------------------- */

pub struct CORS;

#[rocket::async_trait]
impl Fairing for CORS {
    fn info(&self) -> Info {
        Info {
            name: "CORS",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        if let Some(origin) = request.headers().get_one("Origin") {
            response.set_header(Header::new("Access-Control-Allow-Origin", origin));
        }

        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "GET, POST, PUT, PATCH, DELETE, OPTIONS",
        ));

        response.set_header(Header::new(
            "Access-Control-Allow-Headers",
            "Content-Type, Authorization",
        ));

        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

/* ----------------------------- OPTIONS ----------------------------- */

#[options("/<_..>")]
fn options_handler() {}

/* ----------------------------- ERRORS ----------------------------- */

#[catch(404)]
fn not_found() -> rocket::serde::json::Value {
    rocket::serde::json::json!({
        "success": false,
        "message": "Resource not found (check /api/v1 prefix)"
    })
}

#[catch(500)]
fn internal_error() -> rocket::serde::json::Value {
    rocket::serde::json::json!({
        "success": false,
        "message": "Internal server error"
    })
}

/* ----------------------------- SWAGGER ----------------------------- */

fn swagger_config() -> SwaggerUIConfig {
    SwaggerUIConfig {
        url: "/openapi.json".to_string(),
        ..Default::default()
    }
}

/* ----------------------------- LAUNCH ----------------------------- */

#[launch]
fn rocket() -> Rocket<Build> {
    dotenv().ok();
    env_logger::init();

    println!("🏔️  Yatra API running");
    println!("📚 Swagger UI → http://localhost:8000/api/docs");

    rocket::build()
        .attach(db::init())
        .attach(CORS)
        .manage(services::resolver::ResolverSettings {
            deadline: Duration::from_millis(config::Config::resolver_timeout_ms()),
        })
        .mount("/", routes![options_handler])
        .mount(
            "/api/v1",
            routes![
                // Auth
                routes::auth::register,
                routes::auth::login,
                routes::auth::refresh_token,
                // User
                routes::user::get_profile,
                routes::user::update_profile,
                // Booking
                routes::booking::create_booking,
                routes::booking::get_my_bookings,
                routes::booking::get_guide_bookings,
                routes::booking::transition_booking,
                // Engagement
                routes::engagement::add_history,
                routes::engagement::toggle_wishlist,
                routes::engagement::get_engagement,
                // Hotels
                routes::hotel::get_all_hotels,
                routes::hotel::get_hotel_by_id,
                routes::hotel::create_hotel,
                routes::hotel::update_hotel,
                routes::hotel::delete_hotel,
                // Locations
                routes::location::get_all_locations,
                routes::location::get_location_by_id,
                routes::location::create_location,
                routes::location::update_location,
                routes::location::delete_location,
                // Packages
                routes::package::get_all_packages,
                routes::package::get_package_by_id,
                routes::package::create_package,
                routes::package::update_package,
                routes::package::delete_package,
                // Events
                routes::event::get_all_events,
                routes::event::get_event_by_id,
                routes::event::create_event,
                routes::event::update_event,
                routes::event::delete_event,
                // Culture & handicraft
                routes::culture::get_all_culture_items,
                routes::culture::get_culture_item_by_id,
                routes::culture::create_culture_item,
                routes::culture::update_culture_item,
                routes::culture::delete_culture_item,
                // Reviews
                routes::review::create_review,
                // Admin
                routes::admin::set_approval,
                routes::admin::get_all_users,
                routes::admin::get_all_bookings,
            ],
        )
        .mount("/api/docs", make_swagger_ui(&swagger_config()))
        .register("/", catchers![not_found, internal_error])
}
