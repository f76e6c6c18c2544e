use actix_identity::Identity;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, get, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::auth::{AuthenticatedUser, ServerConfig};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, main as main_service};

#[get("/")]
pub async fn show_index(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match main_service::load_dashboard(repo.get_ref(), &user) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "index",
                &server_config.auth_service_url,
            );
            context.insert("dashboard", &data);
            render_template(&tera, "main/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to load dashboard: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Query parameters for the sign-in handoff.
#[derive(Debug, Deserialize)]
pub struct AuthQuery {
    pub token: String,
}

/// Accept a signed token from the central auth service and start a
/// session for its claims.
#[get("/auth")]
pub async fn auth_handoff(
    req: HttpRequest,
    params: web::Query<AuthQuery>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    match AuthenticatedUser::from_token(&params.token, &server_config.secret) {
        Ok(claims) if !claims.is_expired() => match serde_json::to_string(&claims) {
            Ok(serialized) => match Identity::login(&req.extensions(), serialized) {
                Ok(_) => redirect("/"),
                Err(err) => {
                    log::error!("Failed to start session: {err}");
                    HttpResponse::InternalServerError().finish()
                }
            },
            Err(err) => {
                log::error!("Failed to serialize claims: {err}");
                HttpResponse::InternalServerError().finish()
            }
        },
        Ok(_) => {
            FlashMessage::error("Session expired, sign in again.").send();
            redirect("/na")
        }
        Err(err) => {
            log::warn!("Rejected sign-in token: {err}");
            redirect("/na")
        }
    }
}

#[get("/logout")]
pub async fn logout(identity: Option<Identity>) -> impl Responder {
    if let Some(identity) = identity {
        identity.logout();
    }
    redirect("/na")
}

/// Landing page for unauthenticated or unauthorized visitors.
#[get("/na")]
pub async fn not_assigned(
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let messages: Vec<(&str, &str)> = flash_messages
        .iter()
        .map(|message| (crate::routes::level_name(message.level()), message.content()))
        .collect();

    let mut context = tera::Context::new();
    context.insert("flash_messages", &messages);
    context.insert("auth_service_url", &server_config.auth_service_url);
    render_template(&tera, "main/not_assigned.html", &context)
}
