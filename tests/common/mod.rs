use anyhow::Result;
use chrono::NaiveDate;
use fake::Fake;
use fake::faker::name::en::Name;
use sqlx::SqlitePool;
use tempfile::TempDir;
use uuid::Uuid;

use farm_match_be::database::init_database;
use farm_match_be::database::models::{
    ExperienceType, Farm, FarmInput, NewReservation, Reservation, User, UserInput, UserType,
};
use farm_match_be::database::repositories::{
    FarmRepository, PostRepository, ReservationRepository, ReviewRepository, StampRepository,
    UserRepository,
};
use farm_match_be::{AuthService, Config, StampService};

// Test database wrapper; the file lives in a temp dir that is removed on drop.
pub struct TestDb {
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

impl TestDb {
    pub async fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let database_url = format!("sqlite:{}/test.db", temp_dir.path().display());
        let pool = init_database(&database_url).await?;

        Ok(TestDb {
            pool,
            _temp_dir: temp_dir,
        })
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test-jwt-secret-key-that-is-long-enough".to_string(),
        jwt_expiration_minutes: 60,
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
        client_base_url: "http://localhost:3000".to_string(),
    }
}

// Repositories and services wired against one test database.
pub struct TestContext {
    pub db: TestDb,
    pub config: Config,
    pub users: UserRepository,
    pub farms: FarmRepository,
    pub reservations: ReservationRepository,
    pub reviews: ReviewRepository,
    pub posts: PostRepository,
    pub stamps: StampRepository,
    pub auth_service: AuthService,
    pub stamp_service: StampService,
}

impl TestContext {
    pub async fn new() -> Result<Self> {
        let db = TestDb::new().await?;
        let config = test_config();

        let users = UserRepository::new(db.pool.clone());
        let farms = FarmRepository::new(db.pool.clone());
        let reservations = ReservationRepository::new(db.pool.clone());
        let reviews = ReviewRepository::new(db.pool.clone());
        let posts = PostRepository::new(db.pool.clone());
        let stamps = StampRepository::new(db.pool.clone());

        let auth_service = AuthService::new(users.clone(), config.clone());
        let stamp_service = StampService::new(stamps.clone(), reviews.clone(), farms.clone());

        Ok(TestContext {
            db,
            config,
            users,
            farms,
            reservations,
            reviews,
            posts,
            stamps,
            auth_service,
            stamp_service,
        })
    }

    pub async fn create_user(&self, user_type: UserType) -> Result<User> {
        let name: String = Name().fake();

        self.users
            .create_user(UserInput {
                google_id: format!("google-{}", Uuid::new_v4()),
                email: format!("{}@example.com", Uuid::new_v4()),
                name,
                avatar_url: None,
                user_type,
                phone_number: None,
                prefecture: None,
                city: None,
            })
            .await
    }

    pub async fn create_guest(&self) -> Result<User> {
        self.create_user(UserType::Guest).await
    }

    pub async fn create_host(&self) -> Result<User> {
        self.create_user(UserType::Host).await
    }

    pub async fn create_farm(
        &self,
        host_id: i64,
        prefecture: &str,
        price_per_day: i64,
        max_guests: i64,
    ) -> Result<Farm> {
        self.farms
            .create_farm(FarmInput {
                host_id,
                name: format!("Farm {}", Uuid::new_v4()),
                description: "A quiet farm stay with hands-on harvesting".to_string(),
                prefecture: prefecture.to_string(),
                city: "Test City".to_string(),
                address: "1-2-3 Test".to_string(),
                latitude: None,
                longitude: None,
                experience_type: ExperienceType::Agriculture,
                price_per_day,
                max_guests,
                access_info: None,
            })
            .await
    }

    pub async fn create_reservation(
        &self,
        guest_id: i64,
        farm_id: i64,
        start: NaiveDate,
        end: NaiveDate,
        num_guests: i64,
        total_amount: i64,
    ) -> Result<Reservation> {
        self.reservations
            .create_reservation(NewReservation {
                guest_id,
                farm_id,
                start_date: start,
                end_date: end,
                num_guests,
                total_amount,
                contact_phone: "090-1234-5678".to_string(),
                message: None,
            })
            .await
    }

    pub fn token_for(&self, user: &User) -> String {
        self.auth_service
            .generate_token(user)
            .expect("token generation should not fail in tests")
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}
