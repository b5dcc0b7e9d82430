mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::admin::{self, AdminService};
use crate::features::applications::{self, ApplicationService};
use crate::features::auth::routes as auth_routes;
use crate::features::auth::{AuthService, TokenService};
use crate::features::branches::{routes as branches_routes, BranchService};
use crate::features::companies::{routes as companies_routes, CompanyService};
use crate::features::dashboard::{routes as dashboard_routes, DashboardService};
use crate::features::drives::{self, DriveService};
use crate::features::jobs::{self, JobService};
use crate::features::students::{self, StudentService};
use crate::modules::storage::{MinIOClient, ResumeStorage};
use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::Router;
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // .env must be loaded before the subscriber reads RUST_LOG
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(1),
        worker_threads,
        std::process::id()
    );
    tracing::info!("Configuration loaded successfully");

    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    tracing::info!("Running database migrations...");
    database::run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    // Auth
    let token_service = Arc::new(TokenService::new(&config.auth));
    let auth_service = Arc::new(AuthService::new(pool.clone(), Arc::clone(&token_service)));
    auth_service
        .ensure_admin(&config.admin)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bootstrap admin account: {}", e))?;
    tracing::info!("Auth service initialized");

    // Resume storage
    let storage: Arc<dyn ResumeStorage> = Arc::new(
        MinIOClient::new(&config.minio)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to initialize MinIO client: {}", e))?,
    );

    let branch_service = Arc::new(BranchService::new(pool.clone()));
    tracing::info!("Branch service initialized");

    let student_service = Arc::new(StudentService::new(
        pool.clone(),
        storage,
        config.minio.resume_prefix.clone(),
    ));
    tracing::info!("Student service initialized");

    let company_service = Arc::new(CompanyService::new(pool.clone()));
    tracing::info!("Company service initialized");

    let job_service = Arc::new(JobService::new(
        pool.clone(),
        Arc::clone(&company_service),
        Arc::clone(&branch_service),
        Arc::clone(&student_service),
    ));
    tracing::info!("Job service initialized");

    let application_service = Arc::new(ApplicationService::new(
        pool.clone(),
        Arc::clone(&job_service),
        Arc::clone(&student_service),
    ));
    tracing::info!("Application service initialized");

    let drive_service = Arc::new(DriveService::new(pool.clone()));
    tracing::info!("Drive service initialized");

    let dashboard_service = Arc::new(DashboardService::new(
        pool.clone(),
        Arc::clone(&job_service),
        Arc::clone(&student_service),
        Arc::clone(&company_service),
    ));
    tracing::info!("Dashboard service initialized");

    let admin_service = Arc::new(AdminService::new(pool.clone()));
    tracing::info!("Admin service initialized");

    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn_with_state(
                Arc::new(credentials),
                middleware::basic_auth_middleware,
            ))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // Protected routes (require a bearer token)
    let protected_routes = Router::new()
        .merge(auth_routes::protected_routes(Arc::clone(&auth_service)))
        .merge(branches_routes::protected_routes(Arc::clone(&branch_service)))
        .merge(students::routes(Arc::clone(&student_service)))
        .merge(companies_routes::protected_routes(Arc::clone(&company_service)))
        .merge(jobs::routes(Arc::clone(&job_service)))
        .merge(applications::routes(application_service))
        .merge(drives::routes(drive_service))
        .merge(dashboard_routes::protected_routes(Arc::clone(&dashboard_service)))
        .merge(admin::routes(admin_service))
        .route_layer(from_fn_with_state(
            Arc::clone(&token_service),
            middleware::auth_middleware,
        ));

    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    let public_routes = Router::new()
        .merge(auth_routes::public_routes(auth_service))
        .merge(branches_routes::public_routes(branch_service))
        .merge(companies_routes::public_routes(company_service))
        .merge(dashboard_routes::public_routes(dashboard_service));

    let app = Router::new()
        .merge(swagger)
        .merge(protected_routes)
        .merge(public_routes)
        .merge(health_route)
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    socket.set_recv_buffer_size(256 * 1024)?;
    socket.set_send_buffer_size(256 * 1024)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(65535)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
