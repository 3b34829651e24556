use actix_web::{
    Error as ActixError, FromRequest, HttpRequest, dev::Payload, error::ErrorUnauthorized,
    web::Data,
};
use anyhow::{Result, anyhow};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::future::{Ready, ready};

use crate::config::Config;
use crate::database::models::{User, UserType};
use crate::database::repositories::UserRepository;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64, // user id
    pub google_id: String,
    pub user_type: UserType,
    pub exp: usize, // expiration time
}

impl Claims {
    pub fn user_id(&self) -> i64 {
        self.sub
    }

    pub fn is_host(&self) -> bool {
        self.user_type == UserType::Host
    }

    pub fn is_admin(&self) -> bool {
        self.user_type == UserType::Admin
    }
}

impl FromRequest for Claims {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let auth_header = req.headers().get("Authorization");

        if let Some(auth_header) = auth_header {
            if let Ok(auth_str) = auth_header.to_str() {
                if let Some(token) = auth_str.strip_prefix("Bearer ") {
                    // Get the config from app data
                    if let Some(config) = req.app_data::<Data<Config>>() {
                        match decode::<Claims>(
                            token,
                            &DecodingKey::from_secret(config.jwt_secret.as_ref()),
                            &Validation::new(Algorithm::HS256),
                        ) {
                            Ok(token_data) => {
                                return ready(Ok(token_data.claims));
                            }
                            Err(_) => {
                                return ready(Err(ErrorUnauthorized("Invalid token")));
                            }
                        }
                    }
                }
            }
        }

        ready(Err(ErrorUnauthorized(
            "Missing or invalid authorization header",
        )))
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub google_id: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Exchanges a Google account id for a signed JWT. Identity verification
/// itself happens at the OAuth provider; this service only maps the id to a
/// known user.
#[derive(Clone)]
pub struct AuthService {
    user_repository: UserRepository,
    config: Config,
}

impl AuthService {
    pub fn new(user_repository: UserRepository, config: Config) -> Self {
        Self {
            user_repository,
            config,
        }
    }

    /// Returns `None` when no user is registered for the Google account.
    pub async fn login(&self, input: LoginInput) -> Result<Option<AuthResponse>> {
        let Some(user) = self
            .user_repository
            .get_user_by_google_id(&input.google_id)
            .await?
        else {
            return Ok(None);
        };

        let token = self.generate_token(&user)?;

        Ok(Some(AuthResponse { token, user }))
    }

    pub fn generate_token(&self, user: &User) -> Result<String> {
        let expiration = Utc::now() + Duration::minutes(self.config.jwt_expiration_minutes);

        let claims = Claims {
            sub: user.id,
            google_id: user.google_id.clone(),
            user_type: user.user_type.clone(),
            exp: expiration.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_ref()),
        )
        .map_err(|e| anyhow!("Failed to generate token: {}", e))
    }

    pub async fn current_user(&self, claims: &Claims) -> Result<Option<User>> {
        self.user_repository.get_user_by_id(claims.sub).await
    }
}
