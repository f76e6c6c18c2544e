use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::{AuthenticatedUser, ServerConfig};
use crate::forms::vouchers::ImportVouchersForm;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::vouchers::VouchersQuery;
use crate::services::{ServiceError, vouchers as vouchers_service};

#[get("/vouchers")]
pub async fn show_vouchers(
    params: web::Query<VouchersQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match vouchers_service::load_vouchers_page(repo.get_ref(), &user, params.0) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "vouchers",
                &server_config.auth_service_url,
            );
            context.insert("vouchers", &data.vouchers);
            context.insert("digital_products", &data.digital_products);
            context.insert("code", &data.code);
            context.insert("digital_product_id", &data.digital_product_id);
            context.insert("status", &data.status);
            render_template(&tera, "vouchers/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list vouchers: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/vouchers/import")]
pub async fn import_vouchers(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    MultipartForm(form): MultipartForm<ImportVouchersForm>,
) -> impl Responder {
    match vouchers_service::import_vouchers(repo.get_ref(), &user, form) {
        Ok(count) => {
            FlashMessage::success(format!("Imported {count} voucher codes.")).send();
            redirect("/vouchers")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/vouchers")
        }
        Err(ServiceError::Repository(err)) => {
            // Unique index on (hub, stock item, code): a clash means some
            // of the codes are already held.
            log::warn!("Voucher import rejected: {err}");
            FlashMessage::error("Import failed: one or more codes already exist.").send();
            redirect("/vouchers")
        }
        Err(err) => {
            log::error!("Failed to import vouchers: {err}");
            FlashMessage::error("Import failed.").send();
            redirect("/vouchers")
        }
    }
}
