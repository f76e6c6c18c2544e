use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::{AuthenticatedUser, ServerConfig};
use crate::forms::digital_products::{SaveBulkProductsForm, UploadProductsForm};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::digital_products::DigitalProductsQuery;
use crate::services::{ServiceError, digital_products as stock_service};

#[get("/digital-products")]
pub async fn show_digital_products(
    params: web::Query<DigitalProductsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match stock_service::load_digital_products_page(repo.get_ref(), &user, params.0) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "digital_products",
                &server_config.auth_service_url,
            );
            context.insert("products", &data.products);
            context.insert("suppliers", &data.suppliers);
            context.insert("search", &data.search);
            context.insert("supplier_id", &data.supplier_id);
            context.insert("status", &data.status);
            render_template(&tera, "digital_products/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list digital products: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Bulk entry payloads carry repeated per-row keys, which the default
/// urlencoded extractor cannot collect into vectors.
#[post("/digital-products/add")]
pub async fn add_digital_products(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let form = match serde_html_form::from_bytes::<SaveBulkProductsForm>(&body) {
        Ok(payload) => payload.into_form(),
        Err(err) => {
            log::warn!("Malformed bulk entry payload: {err}");
            FlashMessage::error("Malformed form submission.").send();
            return redirect("/digital-products");
        }
    };

    match stock_service::create_digital_products(repo.get_ref(), &user, form) {
        Ok(created) => {
            FlashMessage::success(format!("Added {} stock items.", created.len())).send();
            redirect("/digital-products")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/digital-products")
        }
        Err(err) => {
            log::error!("Failed to add digital products: {err}");
            FlashMessage::error("Failed to add stock items.").send();
            redirect("/digital-products")
        }
    }
}

#[post("/digital-products/upload")]
pub async fn upload_digital_products(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    MultipartForm(form): MultipartForm<UploadProductsForm>,
) -> impl Responder {
    match stock_service::import_digital_products(repo.get_ref(), &user, form) {
        Ok(count) => {
            FlashMessage::success(format!("Imported {count} stock items.")).send();
            redirect("/digital-products")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/digital-products")
        }
        Err(err) => {
            log::error!("Failed to import digital products: {err}");
            FlashMessage::error("Import failed.").send();
            redirect("/digital-products")
        }
    }
}

#[post("/digital-products/{id}/delete")]
pub async fn delete_digital_product(
    digital_product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match stock_service::delete_digital_product(
        repo.get_ref(),
        &user,
        digital_product_id.into_inner(),
    ) {
        Ok(()) => {
            FlashMessage::success("Stock item deleted.").send();
            redirect("/digital-products")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Stock item not found.").send();
            redirect("/digital-products")
        }
        Err(err) => {
            log::error!("Failed to delete digital product: {err}");
            FlashMessage::error("Failed to delete the stock item.").send();
            redirect("/digital-products")
        }
    }
}
