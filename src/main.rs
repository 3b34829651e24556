use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware::Logger, web};
use anyhow::Result;

use farm_match_be::database::{
    init_database,
    repositories::{
        FarmRepository, PostRepository, ReservationRepository, ReviewRepository, StampRepository,
        UserRepository,
    },
};
use farm_match_be::handlers::{auth, farms, posts, reservations, reviews, stamps, users};
use farm_match_be::middleware::RequestId;
use farm_match_be::{AppState, AuthService, Config, StampService};

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Welcome to Farm Match API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init();

    // Load configuration
    let config = Config::from_env()?;
    log::info!("Configuration loaded (environment: {})", config.environment);

    // Initialize database
    let pool = init_database(&config.database_url).await?;
    log::info!("Database initialized");

    // Initialize repositories and services
    let user_repository = UserRepository::new(pool.clone());
    let farm_repository = FarmRepository::new(pool.clone());
    let reservation_repository = ReservationRepository::new(pool.clone());
    let review_repository = ReviewRepository::new(pool.clone());
    let post_repository = PostRepository::new(pool.clone());
    let stamp_repository = StampRepository::new(pool.clone());

    let auth_service = AuthService::new(user_repository.clone(), config.clone());
    let stamp_service = StampService::new(
        stamp_repository.clone(),
        review_repository.clone(),
        farm_repository.clone(),
    );

    let app_state = web::Data::new(AppState { auth_service });
    let user_repo_data = web::Data::new(user_repository);
    let farm_repo_data = web::Data::new(farm_repository);
    let reservation_repo_data = web::Data::new(reservation_repository);
    let review_repo_data = web::Data::new(review_repository);
    let post_repo_data = web::Data::new(post_repository);
    let stamp_service_data = web::Data::new(stamp_service);
    let config_data = web::Data::new(config.clone());

    let server_address = config.server_address();
    log::info!("Server starting on http://{}", server_address);

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(user_repo_data.clone())
            .app_data(farm_repo_data.clone())
            .app_data(reservation_repo_data.clone())
            .app_data(review_repo_data.clone())
            .app_data(post_repo_data.clone())
            .app_data(stamp_service_data.clone())
            .app_data(config_data.clone())
            .wrap(
                Cors::default()
                    .allowed_origin(&config.client_base_url)
                    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                    .allowed_headers(vec![
                        "Authorization",
                        "Content-Type",
                        "Accept",
                        "X-Requested-With",
                        "X-Correlation-ID",
                    ])
                    .max_age(3600),
            )
            .wrap(RequestId)
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T correlation_id=%{x-correlation-id}o"#,
            ))
            .service(hello)
            .service(health)
            .service(
                web::scope("/api")
                    .service(
                        web::scope("/auth")
                            .route("/login", web::post().to(auth::login))
                            .route("/me", web::get().to(auth::me)),
                    )
                    .service(
                        web::scope("/users")
                            .route("", web::get().to(users::get_users))
                            .route("", web::post().to(users::create_user))
                            .route("/email/{email}", web::get().to(users::get_user_by_email))
                            .route("/{id}", web::get().to(users::get_user))
                            .route("/{id}", web::put().to(users::update_user))
                            .route("/{id}", web::delete().to(users::delete_user))
                            .route("/{id}/reviews", web::get().to(reviews::get_guest_reviews)),
                    )
                    .service(
                        web::scope("/farms")
                            .route("", web::get().to(farms::get_farms))
                            .route("", web::post().to(farms::create_farm))
                            .route("/host/{host_id}", web::get().to(farms::get_farms_by_host))
                            .route("/{id}", web::get().to(farms::get_farm))
                            .route("/{id}", web::put().to(farms::update_farm))
                            .route("/{id}", web::delete().to(farms::delete_farm))
                            .route("/{id}/reviews", web::get().to(reviews::get_farm_reviews))
                            .route(
                                "/{id}/reviews/average",
                                web::get().to(reviews::get_farm_average_rating),
                            ),
                    )
                    .service(
                        web::scope("/reservations")
                            .route("", web::get().to(reservations::get_reservations))
                            .route("", web::post().to(reservations::create_reservation))
                            .route(
                                "/host/{host_id}",
                                web::get().to(reservations::get_host_reservations),
                            )
                            .route("/{id}", web::get().to(reservations::get_reservation))
                            .route("/{id}", web::put().to(reservations::update_reservation))
                            .route("/{id}", web::delete().to(reservations::delete_reservation))
                            .route(
                                "/{id}/approve",
                                web::post().to(reservations::approve_reservation),
                            )
                            .route(
                                "/{id}/cancel",
                                web::post().to(reservations::cancel_reservation),
                            ),
                    )
                    .service(
                        web::scope("/reviews")
                            .route("", web::post().to(reviews::create_review))
                            .route("/{id}", web::get().to(reviews::get_review))
                            .route("/{id}", web::delete().to(reviews::delete_review)),
                    )
                    .service(
                        web::scope("/posts")
                            .route("", web::get().to(posts::get_posts))
                            .route("", web::post().to(posts::create_post))
                            .route("/{id}", web::get().to(posts::get_post))
                            .route("/{id}", web::put().to(posts::update_post))
                            .route("/{id}", web::delete().to(posts::delete_post))
                            .route("/{id}/like", web::post().to(posts::like_post))
                            .route("/{id}/comments", web::get().to(posts::get_comments))
                            .route("/{id}/comments", web::post().to(posts::create_comment)),
                    )
                    .service(
                        web::scope("/comments")
                            .route("/{id}", web::delete().to(posts::delete_comment)),
                    )
                    .service(
                        web::scope("/stamps")
                            .route("/prefectures", web::get().to(stamps::get_prefectures))
                            .route("/ranking", web::get().to(stamps::get_ranking))
                            .route(
                                "/users/{user_id}/collection",
                                web::get().to(stamps::get_user_collection),
                            )
                            .route(
                                "/users/{user_id}/collection/{prefecture_code}",
                                web::get().to(stamps::get_prefecture_detail),
                            ),
                    ),
            )
    })
    .bind(&server_address)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
