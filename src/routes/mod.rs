use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::auth::AuthenticatedUser;

pub mod api;
pub mod digital_products;
pub mod main;
pub mod price_rules;
pub mod products;
pub mod purchase_orders;
pub mod suppliers;
pub mod vouchers;

/// Issue a `303 See Other` redirect to `location`.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub(crate) fn level_name(level: Level) -> &'static str {
    match level {
        Level::Debug => "debug",
        Level::Info => "info",
        Level::Success => "success",
        Level::Warning => "warning",
        Level::Error => "error",
    }
}

/// Build the template context shared by every page: flash messages, the
/// signed-in user, the active menu item and the auth service URL for the
/// account menu.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: &AuthenticatedUser,
    active_menu: &str,
    auth_service_url: &str,
) -> Context {
    let messages: Vec<(&str, &str)> = flash_messages
        .iter()
        .map(|message| (level_name(message.level()), message.content()))
        .collect();

    let mut context = Context::new();
    context.insert("flash_messages", &messages);
    context.insert("current_user", user);
    context.insert("active_menu", active_menu);
    context.insert("auth_service_url", auth_service_url);
    context
}

/// Render a Tera template, logging and returning a 500 on failure.
pub fn render_template(tera: &Tera, name: &str, context: &Context) -> HttpResponse {
    match tera.render(name, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type(header::ContentType::html())
            .body(body),
        Err(err) => {
            log::error!("Failed to render {name}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
