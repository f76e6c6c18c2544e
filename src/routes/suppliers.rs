use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::{AuthenticatedUser, ServerConfig};
use crate::forms::suppliers::{AddSupplierForm, EditSupplierForm};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::suppliers::SuppliersQuery;
use crate::services::{ServiceError, suppliers as suppliers_service};

#[get("/suppliers")]
pub async fn show_suppliers(
    params: web::Query<SuppliersQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match suppliers_service::load_suppliers_page(repo.get_ref(), &user, params.0) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "suppliers",
                &server_config.auth_service_url,
            );
            context.insert("suppliers", &data.suppliers);
            context.insert("search", &data.search);
            context.insert("show_archived", &data.show_archived);
            render_template(&tera, "suppliers/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list suppliers: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/suppliers/add")]
pub async fn add_supplier(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddSupplierForm>,
) -> impl Responder {
    match suppliers_service::create_supplier(repo.get_ref(), &user, form) {
        Ok(supplier) => {
            FlashMessage::success(format!("Supplier \"{}\" created.", supplier.name)).send();
            redirect("/suppliers")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/suppliers")
        }
        Err(err) => {
            log::error!("Failed to create supplier: {err}");
            FlashMessage::error("Failed to create the supplier.").send();
            redirect("/suppliers")
        }
    }
}

#[post("/suppliers/update")]
pub async fn update_supplier(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<EditSupplierForm>,
) -> impl Responder {
    match suppliers_service::update_supplier(repo.get_ref(), &user, form) {
        Ok(supplier) => {
            FlashMessage::success(format!("Supplier \"{}\" updated.", supplier.name)).send();
            redirect("/suppliers")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Supplier not found.").send();
            redirect("/suppliers")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/suppliers")
        }
        Err(err) => {
            log::error!("Failed to update supplier: {err}");
            FlashMessage::error("Failed to update the supplier.").send();
            redirect("/suppliers")
        }
    }
}

#[post("/suppliers/{id}/delete")]
pub async fn delete_supplier(
    supplier_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match suppliers_service::delete_supplier(repo.get_ref(), &user, supplier_id.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Supplier deleted.").send();
            redirect("/suppliers")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Supplier not found.").send();
            redirect("/suppliers")
        }
        Err(err) => {
            log::error!("Failed to delete supplier: {err}");
            FlashMessage::error("Failed to delete the supplier.").send();
            redirect("/suppliers")
        }
    }
}
