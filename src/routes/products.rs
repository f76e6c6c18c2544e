use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::{AuthenticatedUser, ServerConfig};
use crate::forms::products::{AddProductForm, EditProductForm};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::products::ProductsQuery;
use crate::services::{ServiceError, products as products_service};

#[get("/products")]
pub async fn show_products(
    params: web::Query<ProductsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match products_service::load_products_page(repo.get_ref(), &user, params.0) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "products",
                &server_config.auth_service_url,
            );
            context.insert("products", &data.products);
            context.insert("search", &data.search);
            context.insert("show_archived", &data.show_archived);
            render_template(&tera, "products/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list products: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/products/add")]
pub async fn add_product(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddProductForm>,
) -> impl Responder {
    match products_service::create_product(repo.get_ref(), &user, form) {
        Ok(product) => {
            FlashMessage::success(format!("Product \"{}\" created.", product.name)).send();
            redirect("/products")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/products")
        }
        Err(err) => {
            log::error!("Failed to create product: {err}");
            FlashMessage::error("Failed to create the product.").send();
            redirect("/products")
        }
    }
}

#[post("/products/update")]
pub async fn update_product(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<EditProductForm>,
) -> impl Responder {
    match products_service::update_product(repo.get_ref(), &user, form) {
        Ok(product) => {
            FlashMessage::success(format!("Product \"{}\" updated.", product.name)).send();
            redirect("/products")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Product not found.").send();
            redirect("/products")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/products")
        }
        Err(err) => {
            log::error!("Failed to update product: {err}");
            FlashMessage::error("Failed to update the product.").send();
            redirect("/products")
        }
    }
}

#[post("/products/{id}/delete")]
pub async fn delete_product(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match products_service::delete_product(repo.get_ref(), &user, product_id.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Product deleted.").send();
            redirect("/products")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Product not found.").send();
            redirect("/products")
        }
        Err(err) => {
            log::error!("Failed to delete product: {err}");
            FlashMessage::error("Failed to delete the product.").send();
            redirect("/products")
        }
    }
}
