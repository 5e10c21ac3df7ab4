//! Application startup and lifecycle management.

use crate::config::{PantryConfig, ProviderKind};
use crate::handlers;
use crate::middleware::metrics_middleware;
use crate::services::providers::gemini::{GeminiConfig, GeminiTextProvider};
use crate::services::providers::mock::MockTextProvider;
use crate::services::providers::TextProvider;
use crate::services::{
    ItemService, ItemStore, PantryDb, RecipeGenerator, RecipeService, RecipeStore, StoreHealth,
};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::request_id_middleware;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: PantryConfig,
    pub items: ItemService,
    pub recipes: RecipeService,
    pub store_health: Arc<dyn StoreHealth>,
}

impl AppState {
    /// Wire services over a single backing store.
    pub fn new<S>(config: PantryConfig, store: S, provider: Arc<dyn TextProvider>) -> Self
    where
        S: ItemStore + RecipeStore + StoreHealth + Clone + 'static,
    {
        let generator = Arc::new(RecipeGenerator::new(provider, config.models.temperature));
        let item_store: Arc<dyn ItemStore> = Arc::new(store.clone());
        let recipe_store: Arc<dyn RecipeStore> = Arc::new(store.clone());

        Self {
            items: ItemService::new(item_store),
            recipes: RecipeService::new(generator, recipe_store),
            store_health: Arc::new(store),
            config,
        }
    }
}

/// Build the configured text provider.
///
/// A missing Gemini key is not fatal: the service starts and generation
/// requests fail until a key is supplied.
pub fn build_text_provider(config: &PantryConfig) -> Result<Arc<dyn TextProvider>, AppError> {
    match config.models.provider {
        ProviderKind::Gemini => {
            if config.google.api_key.is_none() {
                tracing::warn!(
                    "GEMINI_API_KEY is not set; recipe generation will fail until it is configured"
                );
            }
            let gemini_config =
                GeminiConfig::new(config.google.api_key.clone(), &config.models.text_model);
            let provider = GeminiTextProvider::new(gemini_config)
                .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e.to_string())))?;

            tracing::info!(
                model = %config.models.text_model,
                "Initialized Gemini text provider"
            );
            Ok(Arc::new(provider))
        }
        ProviderKind::Mock => {
            tracing::info!("Initialized mock text provider");
            Ok(Arc::new(MockTextProvider::new()))
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let item_routes = Router::new()
        .route("/add", post(handlers::add_item))
        .route("/", get(handlers::list_items));

    let recipe_routes = Router::new()
        .route("/basket/generate-recipe", post(handlers::generate_recipe))
        .route("/history", get(handlers::recipe_history));

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .nest("/api/items", item_routes)
        .nest("/api/recipes", recipe_routes)
        .route_layer(middleware::from_fn(metrics_middleware))
        .fallback(handlers::not_found)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: PantryConfig) -> Result<Self, AppError> {
        let db = PantryDb::connect(&config.mongodb.uri, &config.mongodb.database).await?;

        db.initialize_indexes().await.map_err(|e| {
            tracing::error!("Failed to initialize database indexes: {}", e);
            e
        })?;

        let provider = build_text_provider(&config)?;
        let state = AppState::new(config.clone(), db, provider);

        // Port 0 picks a random port for tests
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Pantry service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until SIGINT or SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);

        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                e
            })
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
