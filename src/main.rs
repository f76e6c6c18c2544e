use std::env;

use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::http::StatusCode;
use actix_web::middleware::ErrorHandlers;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use dotenvy::dotenv;
use tera::Tera;

use cardstock::auth::{ServerConfig, redirect_unauthorized};
use cardstock::db::establish_connection_pool;
use cardstock::repository::DieselRepository;
use cardstock::routes::api::{
    api_v1_dashboard, api_v1_digital_products, api_v1_products, api_v1_rules,
    api_v1_rules_preview, api_v1_vouchers,
};
use cardstock::routes::digital_products::{
    add_digital_products, delete_digital_product, show_digital_products, upload_digital_products,
};
use cardstock::routes::main::{auth_handoff, logout, not_assigned, show_index};
use cardstock::routes::price_rules::{
    add_rule, delete_rule, edit_rule, new_rule, show_rules, update_rule,
};
use cardstock::routes::products::{add_product, delete_product, show_products, update_product};
use cardstock::routes::purchase_orders::{
    add_purchase_order, show_purchase_orders, update_purchase_order,
};
use cardstock::routes::suppliers::{add_supplier, delete_supplier, show_suppliers, update_supplier};
use cardstock::routes::vouchers::{import_vouchers, show_vouchers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let database_url = env::var("DATABASE_URL").unwrap_or("app.db".to_string());
    let port = env::var("PORT").unwrap_or("8080".to_string());
    let port = port.parse::<u16>().unwrap_or(8080);
    let address = env::var("ADDRESS").unwrap_or("127.0.0.1".to_string());

    let secret = env::var("SECRET_KEY");
    let secret_key = match &secret {
        Ok(key) => Key::from(key.as_bytes()),
        Err(_) => Key::generate(),
    };

    let auth_service_url = match env::var("AUTH_SERVICE_URL") {
        Ok(auth_service_url) => auth_service_url,
        Err(_) => {
            log::error!("AUTH_SERVICE_URL environment variable not set");
            std::process::exit(1);
        }
    };

    let server_config = ServerConfig {
        secret: secret.unwrap_or_default(),
        auth_service_url,
    };

    let domain = env::var("DOMAIN").unwrap_or("localhost".to_string());

    let pool = match establish_connection_pool(&database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = match Tera::new("templates/**/*") {
        Ok(t) => t,
        Err(e) => {
            log::error!("Parsing error(s): {e}");
            std::process::exit(1);
        }
    };

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{domain}")))
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(not_assigned)
            .service(auth_handoff)
            .service(
                web::scope("/api")
                    .service(api_v1_dashboard)
                    .service(api_v1_products)
                    .service(api_v1_digital_products)
                    .service(api_v1_vouchers)
                    .service(api_v1_rules)
                    .service(api_v1_rules_preview),
            )
            .service(
                web::scope("")
                    .wrap(ErrorHandlers::new().handler(StatusCode::UNAUTHORIZED, redirect_unauthorized))
                    .service(show_index)
                    .service(show_suppliers)
                    .service(add_supplier)
                    .service(update_supplier)
                    .service(delete_supplier)
                    .service(show_products)
                    .service(add_product)
                    .service(update_product)
                    .service(delete_product)
                    .service(show_digital_products)
                    .service(add_digital_products)
                    .service(upload_digital_products)
                    .service(delete_digital_product)
                    .service(show_purchase_orders)
                    .service(add_purchase_order)
                    .service(update_purchase_order)
                    .service(show_vouchers)
                    .service(import_vouchers)
                    .service(show_rules)
                    .service(new_rule)
                    .service(edit_rule)
                    .service(add_rule)
                    .service(update_rule)
                    .service(delete_rule)
                    .service(logout),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind((address, port))?
    .run()
    .await
}
