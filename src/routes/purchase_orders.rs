use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::{AuthenticatedUser, ServerConfig};
use crate::forms::purchase_orders::{AddPurchaseOrderForm, EditPurchaseOrderForm};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::purchase_orders::PurchaseOrdersQuery;
use crate::services::{ServiceError, purchase_orders as orders_service};

#[get("/orders")]
pub async fn show_purchase_orders(
    params: web::Query<PurchaseOrdersQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match orders_service::load_purchase_orders_page(repo.get_ref(), &user, params.0) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "orders",
                &server_config.auth_service_url,
            );
            context.insert("orders", &data.orders);
            context.insert("suppliers", &data.suppliers);
            context.insert("search", &data.search);
            context.insert("supplier_id", &data.supplier_id);
            context.insert("status", &data.status);
            render_template(&tera, "purchase_orders/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list purchase orders: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/orders/add")]
pub async fn add_purchase_order(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddPurchaseOrderForm>,
) -> impl Responder {
    match orders_service::create_purchase_order(repo.get_ref(), &user, form) {
        Ok(order) => {
            let reference = order.reference.unwrap_or_else(|| format!("#{}", order.id));
            FlashMessage::success(format!("Purchase order {reference} created.")).send();
            redirect("/orders")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/orders")
        }
        Err(err) => {
            log::error!("Failed to create purchase order: {err}");
            FlashMessage::error("Failed to create the purchase order.").send();
            redirect("/orders")
        }
    }
}

#[post("/orders/update")]
pub async fn update_purchase_order(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<EditPurchaseOrderForm>,
) -> impl Responder {
    match orders_service::update_purchase_order(repo.get_ref(), &user, form) {
        Ok(_) => {
            FlashMessage::success("Purchase order updated.").send();
            redirect("/orders")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Purchase order not found.").send();
            redirect("/orders")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/orders")
        }
        Err(err) => {
            log::error!("Failed to update purchase order: {err}");
            FlashMessage::error("Failed to update the purchase order.").send();
            redirect("/orders")
        }
    }
}
