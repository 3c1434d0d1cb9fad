// src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Объявление модулей
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    // Инициализация логгера
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() здесь уместен: без конфигурации приложение стартовать не должно.
    let app_state = AppState::new()
        .await
        .expect("Не удалось инициализировать состояние приложения.");

    // Прогон миграций SQLx при старте
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Не удалось выполнить миграции базы данных.");

    tracing::info!("✅ Миграции базы данных выполнены успешно!");

    // Маршруты аутентификации (публичные)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Маршруты пользователя (защищённые middleware)
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let profile_routes = Router::new()
        .route("/", put(handlers::profile::update_profile))
        .route("/logo"
               ,post(handlers::profile::upload_logo)
               .delete(handlers::profile::delete_logo)
        )
        .route("/cover"
               ,post(handlers::profile::upload_cover)
               .delete(handlers::profile::delete_cover)
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let media_routes = Router::new()
        .route("/", post(handlers::profile::upload_media))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let block_routes = Router::new()
        .route("/"
               ,get(handlers::blocks::list_blocks)
               .post(handlers::blocks::create_block)
        )
        .route("/{id}"
               ,put(handlers::blocks::update_block)
               .delete(handlers::blocks::delete_block)
        )
        .route("/{id}/move"
               ,post(handlers::blocks::move_block)
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Публичная страница и заказы посетителей - без аутентификации
    let public_routes = Router::new()
        .route("/{slug}", get(handlers::public::get_public_page))
        .route("/{slug}/orders/bouquet", post(handlers::public::submit_bouquet_order))
        .route("/{slug}/orders/product", post(handlers::public::submit_product_order));

    let hub_routes = Router::new()
        .route("/orders", get(handlers::hub::list_orders))
        .route("/orders/{id}/status", put(handlers::hub::change_status))
        .route("/orders/{id}/florist", put(handlers::hub::assign_florist))
        .route("/orders/{id}/notes", put(handlers::hub::update_notes))
        .route("/orders/{id}/history", get(handlers::hub::order_history))
        .route("/florists"
               ,get(handlers::hub::list_florists)
               .post(handlers::hub::create_florist)
        )
        .route("/stats", get(handlers::hub::get_stats))
        .route("/inventory"
               ,get(handlers::inventory::list_items)
               .post(handlers::inventory::create_item)
        )
        .route("/inventory/{id}"
               ,put(handlers::inventory::update_item)
               .delete(handlers::inventory::delete_item)
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Активные справочники читает владелец при настройке блока-конструктора
    let directory_routes = Router::new()
        .route("/{kind}", get(handlers::admin::list_active_directory))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let admin_routes = Router::new()
        .route("/users", get(handlers::admin::list_users))
        .route("/users/{id}/subscription", post(handlers::admin::grant_subscription))
        .route("/directories/{kind}"
               ,get(handlers::admin::list_directory)
               .post(handlers::admin::create_directory_item)
        )
        .route("/directories/{kind}/{id}"
               ,put(handlers::admin::update_directory_item)
               .delete(handlers::admin::delete_directory_item)
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Сборка основного роутера
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/profile", profile_routes)
        .nest("/api/media", media_routes)
        .nest("/api/blocks", block_routes)
        .nest("/api/u", public_routes)
        .nest("/api/hub", hub_routes)
        .nest("/api/directories", directory_routes)
        .nest("/api/admin", admin_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    // Запуск сервера
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Не удалось открыть TCP-листенер");
    tracing::info!("🚀 Сервер слушает на {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Ошибка сервера Axum");
}
