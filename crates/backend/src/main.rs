pub mod domain;
pub mod handlers;
pub mod projections;
pub mod shared;
pub mod system;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use axum::middleware::{self, Next};
    use axum::response::Response;
    use axum::{
        routing::{get, post},
        Router,
    };
    use std::net::SocketAddr;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = std::path::Path::new("target").join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file_path = log_dir.join("backend.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| {
                // Keep application logs, quiet the SQL layer
                "info,sqlx=warn,sea_orm=warn".into()
            }),
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false),
        )
        .init();

    // One console line per request
    async fn request_logger(req: Request<Body>, next: Next) -> Response {
        let start = std::time::Instant::now();
        let method = req.method().clone();
        let uri = req.uri().clone();

        let response = next.run(req).await;

        let duration = start.elapsed();
        tracing::info!(
            "{} {:>6} {} ({}ms)",
            response.status().as_u16(),
            method,
            uri.path(),
            duration.as_millis()
        );

        response
    }

    let config = shared::config::init_config()?;
    let db_path = shared::config::get_database_path(config)?;
    shared::data::db::initialize_database(db_path.to_str())
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;

    // Apply auth system migration
    system::initialization::apply_auth_migration().await?;

    // Ensure admin user exists
    system::initialization::ensure_admin_user_exists().await?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION]);

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // SYSTEM AUTH ROUTES (PUBLIC)
        // ========================================
        .route(
            "/api/system/auth/login",
            post(system::handlers::auth::login),
        )
        .route(
            "/api/system/auth/refresh",
            post(system::handlers::auth::refresh),
        )
        .route(
            "/api/system/auth/logout",
            post(system::handlers::auth::logout),
        )
        // System auth routes (protected)
        .route(
            "/api/system/auth/me",
            get(system::handlers::auth::current_user)
                .layer(middleware::from_fn(system::auth::middleware::require_auth)),
        )
        // System users management (admin only)
        .route(
            "/api/system/users",
            get(system::handlers::users::list)
                .post(system::handlers::users::create)
                .layer(middleware::from_fn(system::auth::middleware::require_admin)),
        )
        .route(
            "/api/system/users/:id",
            get(system::handlers::users::get_by_id)
                .put(system::handlers::users::update)
                .delete(system::handlers::users::delete)
                .layer(middleware::from_fn(system::auth::middleware::require_admin)),
        )
        .route(
            "/api/system/users/:id/change-password",
            post(system::handlers::users::change_password)
                .layer(middleware::from_fn(system::auth::middleware::require_auth)),
        )
        // ========================================
        // MASTER DATA
        // ========================================
        .route(
            "/api/color",
            get(handlers::a001_color::list_all).post(handlers::a001_color::upsert),
        )
        .route(
            "/api/color/:id",
            get(handlers::a001_color::get_by_id).delete(handlers::a001_color::delete),
        )
        .route(
            "/api/color/testdata",
            post(handlers::a001_color::insert_test_data),
        )
        .route(
            "/api/location",
            get(handlers::a002_location::list_all).post(handlers::a002_location::upsert),
        )
        .route(
            "/api/location/main-warehouse",
            get(handlers::a002_location::get_main_warehouse),
        )
        .route(
            "/api/location/:id",
            get(handlers::a002_location::get_by_id).delete(handlers::a002_location::delete),
        )
        .route(
            "/api/location/testdata",
            post(handlers::a002_location::insert_test_data),
        )
        .route(
            "/api/product",
            get(handlers::a003_product::list_all).post(handlers::a003_product::upsert),
        )
        .route("/api/product/search", get(handlers::a003_product::search))
        .route(
            "/api/product/:id",
            get(handlers::a003_product::get_by_id).delete(handlers::a003_product::delete),
        )
        .route(
            "/api/product/testdata",
            post(handlers::a003_product::insert_test_data),
        )
        // ========================================
        // DOCUMENTS
        // ========================================
        .route(
            "/api/goods_receipt",
            get(handlers::a004_goods_receipt::list_all).post(handlers::a004_goods_receipt::upsert),
        )
        .route(
            "/api/goods_receipt/:id",
            get(handlers::a004_goods_receipt::get_by_id)
                .delete(handlers::a004_goods_receipt::delete),
        )
        .route(
            "/api/goods_receipt/:id/post",
            post(handlers::a004_goods_receipt::post_document),
        )
        .route(
            "/api/goods_receipt/:id/unpost",
            post(handlers::a004_goods_receipt::unpost_document),
        )
        .route(
            "/api/sale",
            get(handlers::a005_sale::list_all).post(handlers::a005_sale::upsert),
        )
        .route("/api/sale/history", get(handlers::a005_sale::history))
        .route(
            "/api/sale/:id",
            get(handlers::a005_sale::get_by_id).delete(handlers::a005_sale::delete),
        )
        .route(
            "/api/sale/:id/post",
            post(handlers::a005_sale::post_document),
        )
        .route(
            "/api/sale/:id/unpost",
            post(handlers::a005_sale::unpost_document),
        )
        // ========================================
        // PROJECTIONS
        // ========================================
        .route("/api/p900/stock", get(handlers::p900_stock::list_stock))
        .route(
            "/api/p901/conversion",
            get(handlers::p901_conversion::list),
        )
        .route(
            "/api/p901/conversion/:id/finish-box",
            post(handlers::p901_conversion::finish_box),
        )
        .route(
            "/api/p901/conversion/:id/record-pairs",
            post(handlers::p901_conversion::record_pairs),
        )
        .route(
            "/api/p902/conversion-history",
            get(handlers::p902_conversion_history::list),
        )
        .layer(middleware::from_fn(request_logger))
        .layer(cors);

    let addr: SocketAddr = ([0, 0, 0, 0], config.server.port).into();

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Port {} is already in use. Please ensure no other process is using it.",
                    config.server.port
                );
            } else {
                tracing::error!("Failed to bind to port {}. Error: {}", config.server.port, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
