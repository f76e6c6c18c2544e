use actix_web::{HttpResponse, Responder, get, post, web};
use serde::{Deserialize, Serialize};

use crate::auth::AuthenticatedUser;
use crate::domain::condition::Condition;
use crate::domain::price_rule::{ActionMode, ActionOperator, MatchType};
use crate::forms::price_rules::PriceRuleForm;
use crate::repository::DieselRepository;
use crate::services::digital_products::DigitalProductsQuery;
use crate::services::price_rules::RulesQuery;
use crate::services::products::ProductsQuery;
use crate::services::vouchers::VouchersQuery;
use crate::services::{
    ServiceError, digital_products as stock_service, main as main_service,
    price_rules as rules_service, products as products_service, vouchers as vouchers_service,
};

/// Envelope wrapping every JSON API response. Paginated payloads carry
/// their page metadata inline (`current_page`, `per_page`, `total`,
/// `last_page`, `from`, `to`).
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn ok<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse {
        data: Some(data),
        error: None,
        message: None,
    })
}

fn ok_with_message<T: Serialize>(data: T, message: Option<String>) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse {
        data: Some(data),
        error: None,
        message,
    })
}

fn service_error(context: &str, err: ServiceError) -> HttpResponse {
    let envelope = |error: String| ApiResponse::<()> {
        data: None,
        error: Some(error),
        message: None,
    };
    match err {
        ServiceError::Unauthorized => {
            HttpResponse::Unauthorized().json(envelope("unauthorized".to_string()))
        }
        ServiceError::NotFound => HttpResponse::NotFound().json(envelope("not found".to_string())),
        ServiceError::Form(message) => HttpResponse::UnprocessableEntity().json(envelope(message)),
        ServiceError::Repository(err) => {
            log::error!("{context}: {err}");
            HttpResponse::InternalServerError().json(envelope("internal error".to_string()))
        }
    }
}

#[get("/v1/dashboard")]
pub async fn api_v1_dashboard(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match main_service::load_dashboard(repo.get_ref(), &user) {
        Ok(data) => ok(data),
        Err(err) => service_error("Failed to load dashboard", err),
    }
}

#[get("/v1/products")]
pub async fn api_v1_products(
    params: web::Query<ProductsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match products_service::load_products_page(repo.get_ref(), &user, params.0) {
        Ok(data) => ok(data.products),
        Err(err) => service_error("Failed to list products", err),
    }
}

#[get("/v1/digital-products")]
pub async fn api_v1_digital_products(
    params: web::Query<DigitalProductsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match stock_service::load_digital_products_page(repo.get_ref(), &user, params.0) {
        Ok(data) => ok(data.products),
        Err(err) => service_error("Failed to list digital products", err),
    }
}

#[get("/v1/vouchers")]
pub async fn api_v1_vouchers(
    params: web::Query<VouchersQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match vouchers_service::load_vouchers_page(repo.get_ref(), &user, params.0) {
        Ok(data) => ok(data.vouchers),
        Err(err) => service_error("Failed to list vouchers", err),
    }
}

#[get("/v1/rules")]
pub async fn api_v1_rules(
    params: web::Query<RulesQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match rules_service::load_rules_page(repo.get_ref(), &user, params.0) {
        Ok(data) => ok(data.rules),
        Err(err) => service_error("Failed to list price rules", err),
    }
}

/// JSON body accepted by the preview endpoint: a rule draft, not a
/// stored rule.
#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    #[serde(default)]
    pub match_type: MatchType,
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub action_value: Option<f64>,
    #[serde(default)]
    pub action_operator: ActionOperator,
    #[serde(default)]
    pub action_mode: Option<ActionMode>,
}

#[post("/v1/rules/preview")]
pub async fn api_v1_rules_preview(
    body: web::Json<PreviewRequest>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let request = body.into_inner();

    let mut form = PriceRuleForm::new();
    if !request.conditions.is_empty() {
        form.conditions = request.conditions;
    }
    form.normalize_conditions();
    form.match_type = request.match_type;
    form.action_value = request.action_value;
    form.action_operator = request.action_operator;
    form.action_mode = request.action_mode;

    match rules_service::preview_rule(repo.get_ref(), &user, &form) {
        Ok(preview) => {
            let message = preview.warning.clone();
            ok_with_message(preview, message)
        }
        Err(err) => service_error("Failed to preview rule", err),
    }
}
