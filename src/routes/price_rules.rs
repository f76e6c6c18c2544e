use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::{AuthenticatedUser, ServerConfig};
use crate::forms::price_rules::{PriceRuleForm, SavePriceRuleForm};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::price_rules::RulesQuery;
use crate::services::{ServiceError, price_rules as rules_service};

#[get("/rules")]
pub async fn show_rules(
    params: web::Query<RulesQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match rules_service::load_rules_page(repo.get_ref(), &user, params.0) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "rules",
                &server_config.auth_service_url,
            );
            context.insert("rules", &data.rules);
            context.insert("search", &data.search);
            context.insert("status", &data.status);
            render_template(&tera, "price_rules/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list price rules: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/rules/new")]
pub async fn new_rule(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = base_context(
        &flash_messages,
        &user,
        "rules",
        &server_config.auth_service_url,
    );
    let form = PriceRuleForm::new();
    context.insert("form", &form_context(&form));
    render_template(&tera, "price_rules/editor.html", &context)
}

#[get("/rules/{id}/edit")]
pub async fn edit_rule(
    rule_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match rules_service::load_rule_editor(repo.get_ref(), &user, rule_id.into_inner()) {
        Ok(form) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "rules",
                &server_config.auth_service_url,
            );
            context.insert("form", &form_context(&form));
            render_template(&tera, "price_rules/editor.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Rule not found.").send();
            redirect("/rules")
        }
        Err(err) => {
            log::error!("Failed to load rule editor: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/rules/add")]
pub async fn add_rule(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let form = match parse_rule_form(&body) {
        Ok(form) => form,
        Err(response) => return response,
    };

    match rules_service::create_rule(repo.get_ref(), &user, form) {
        Ok(rule) => {
            FlashMessage::success(format!("Rule \"{}\" created.", rule.name)).send();
            redirect("/rules")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/rules/new")
        }
        Err(err) => {
            log::error!("Failed to create price rule: {err}");
            FlashMessage::error("Failed to create the rule.").send();
            redirect("/rules")
        }
    }
}

#[post("/rules/{id}/update")]
pub async fn update_rule(
    rule_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let rule_id = rule_id.into_inner();
    let form = match parse_rule_form(&body) {
        Ok(form) => form,
        Err(response) => return response,
    };

    match rules_service::update_rule(repo.get_ref(), &user, rule_id, form) {
        Ok(rule) => {
            FlashMessage::success(format!("Rule \"{}\" updated.", rule.name)).send();
            redirect("/rules")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Rule not found.").send();
            redirect("/rules")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&format!("/rules/{rule_id}/edit"))
        }
        Err(err) => {
            log::error!("Failed to update price rule: {err}");
            FlashMessage::error("Failed to update the rule.").send();
            redirect("/rules")
        }
    }
}

#[post("/rules/{id}/delete")]
pub async fn delete_rule(
    rule_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match rules_service::delete_rule(repo.get_ref(), &user, rule_id.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Rule deleted.").send();
            redirect("/rules")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Rule not found.").send();
            redirect("/rules")
        }
        Err(err) => {
            log::error!("Failed to delete price rule: {err}");
            FlashMessage::error("Failed to delete the rule.").send();
            redirect("/rules")
        }
    }
}

/// Rule editor payloads carry repeated `condition_*` keys, which the
/// default urlencoded extractor cannot collect into vectors.
fn parse_rule_form(body: &web::Bytes) -> Result<PriceRuleForm, HttpResponse> {
    match serde_html_form::from_bytes::<SavePriceRuleForm>(body) {
        Ok(payload) => Ok(payload.into_form()),
        Err(err) => {
            log::warn!("Malformed rule form payload: {err}");
            FlashMessage::error("Malformed form submission.").send();
            Err(redirect("/rules"))
        }
    }
}

/// Serializable view of the editor draft for templates.
fn form_context(form: &PriceRuleForm) -> serde_json::Value {
    serde_json::json!({
        "id": form.id,
        "name": form.name,
        "description": form.description,
        "status": form.status,
        "match_type": form.match_type,
        "conditions": form.conditions,
        "action_value": form.action_value,
        "action_operator": form.action_operator,
        "action_mode": form.action_mode,
        "errors": form.errors,
    })
}
