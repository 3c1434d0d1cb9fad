// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Profile & Media ---
        handlers::profile::update_profile,
        handlers::profile::upload_logo,
        handlers::profile::delete_logo,
        handlers::profile::upload_cover,
        handlers::profile::delete_cover,
        handlers::profile::upload_media,

        // --- Blocks ---
        handlers::blocks::list_blocks,
        handlers::blocks::create_block,
        handlers::blocks::update_block,
        handlers::blocks::delete_block,
        handlers::blocks::move_block,

        // --- Public ---
        handlers::public::get_public_page,
        handlers::public::submit_bouquet_order,
        handlers::public::submit_product_order,

        // --- Hub ---
        handlers::hub::list_orders,
        handlers::hub::change_status,
        handlers::hub::assign_florist,
        handlers::hub::update_notes,
        handlers::hub::order_history,
        handlers::hub::list_florists,
        handlers::hub::create_florist,
        handlers::hub::get_stats,

        // --- Inventory ---
        handlers::inventory::list_items,
        handlers::inventory::create_item,
        handlers::inventory::update_item,
        handlers::inventory::delete_item,

        // --- Admin ---
        handlers::admin::list_users,
        handlers::admin::grant_subscription,
        handlers::admin::list_directory,
        handlers::admin::create_directory_item,
        handlers::admin::update_directory_item,
        handlers::admin::delete_directory_item,
        handlers::admin::list_active_directory,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Blocks ---
            models::block::Block,
            models::block::BlockContent,
            models::block::WhatsappContent,
            models::block::CatalogContent,
            models::block::CatalogLayout,
            models::block::CatalogProduct,
            models::block::GalleryContent,
            models::block::PromoContent,
            models::block::ProfileContent,
            models::block::BouquetContent,
            models::block::FlowerOption,
            models::block::DeliveryOptions,

            // --- Orders ---
            models::order::Order,
            models::order::OrderItem,
            models::order::OrderStatus,
            models::order::OrderStatusChange,
            models::order::Florist,
            models::order::FloristScore,
            models::order::HubStats,
            services::order_service::OrderSubmission,

            // --- Directories & Inventory ---
            models::directory::DirectoryKind,
            models::directory::DirectoryItem,
            models::inventory::InventoryItem,
            services::storage::MediaPurpose,

            // --- Payloads ---
            handlers::profile::UpdateProfilePayload,
            handlers::profile::UploadImagePayload,
            handlers::profile::UploadMediaPayload,
            handlers::profile::UploadedImage,
            handlers::blocks::CreateBlockPayload,
            handlers::blocks::MoveBlockPayload,
            handlers::public::PublicPageResponse,
            handlers::public::PublicBlockView,
            handlers::public::BouquetOrderPayload,
            handlers::public::ProductOrderPayload,
            handlers::hub::ChangeStatusPayload,
            handlers::hub::AssignFloristPayload,
            handlers::hub::UpdateNotesPayload,
            handlers::hub::CreateFloristPayload,
            handlers::inventory::InventoryItemPayload,
            handlers::admin::GrantSubscriptionPayload,
            handlers::admin::DirectoryItemPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Аутентификация и регистрация"),
        (name = "Users", description = "Данные пользователя и профиль"),
        (name = "Profile", description = "Профиль организации и медиа"),
        (name = "Blocks", description = "Блоки публичной страницы"),
        (name = "Public", description = "Публичная страница и заказы посетителей"),
        (name = "Hub", description = "Центр управления: заказы, флористы, статистика"),
        (name = "Inventory", description = "Склад организации"),
        (name = "Admin", description = "Админ-панель: организации и справочники")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
