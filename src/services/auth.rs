// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, NewUser, User, UserPermissions, UserType},
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    token_ttl_hours: i64,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, token_ttl_hours: i64, bcrypt_cost: u32) -> Self {
        Self { user_repo, jwt_secret, token_ttl_hours, bcrypt_cost }
    }

    /// Hash em thread separada para não travar o runtime.
    pub async fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let password = password.to_owned();
        let cost = self.bcrypt_cost;
        let hashed = tokio::task::spawn_blocking(move || hash(&password, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
        Ok(hashed)
    }

    async fn verify_password(&self, password: &str, password_hash: &str) -> Result<bool, AppError> {
        let password = password.to_owned();
        let password_hash = password_hash.to_owned();
        let valid = tokio::task::spawn_blocking(move || verify(&password, &password_hash))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
        Ok(valid)
    }

    /// Usuário inexistente e senha errada produzem o mesmo erro.
    pub async fn login_user(&self, username: &str, password: &str) -> Result<(String, User), AppError> {
        let user = self
            .user_repo
            .find_by_username(username.trim())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !self.verify_password(password, &user.password_hash).await? {
            tracing::warn!(username = %user.username, "Tentativa de login com senha inválida");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.create_token(&user)?;
        Ok((token, user))
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        // Usuário removido depois da emissão do token
        self.user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)
    }

    pub fn create_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::hours(self.token_ttl_hours);

        let claims = Claims {
            sub: user.id,
            user_type: user.user_type,
            company_id: user.company_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }

    /// O próprio usuário precisa confirmar a senha atual; admins não.
    pub async fn change_password(
        &self,
        actor: &User,
        target_id: i64,
        current_password: Option<&str>,
        new_password: &str,
    ) -> Result<(), AppError> {
        let target = self
            .user_repo
            .find_by_id(target_id)
            .await?
            .ok_or(AppError::NotFound("Usuário"))?;

        if actor.id == target.id {
            let current = current_password
                .ok_or_else(|| AppError::BadRequest("Informe a senha atual.".into()))?;
            if !self.verify_password(current, &target.password_hash).await? {
                return Err(AppError::InvalidCredentials);
            }
        } else if !actor.is_admin() {
            return Err(AppError::Forbidden("Apenas administradores podem alterar a senha de outro usuário.".into()));
        }

        let hashed = self.hash_password(new_password).await?;
        self.user_repo.update_password(target.id, &hashed).await?;
        tracing::info!(user_id = target.id, actor_id = actor.id, "Senha alterada");
        Ok(())
    }

    /// Cria o primeiro admin quando ainda não existe nenhum.
    pub async fn seed_admin(&self, pool: &sqlx::SqlitePool, username: &str, password: &str) -> Result<bool, AppError> {
        if self.user_repo.admin_exists().await? {
            return Ok(false);
        }

        let hashed = self.hash_password(password).await?;
        self.user_repo
            .create(
                pool,
                &NewUser {
                    username,
                    password_hash: &hashed,
                    full_name: Some("Administrador"),
                    email: None,
                    user_type: UserType::Admin,
                    company_id: None,
                    permissions: UserPermissions::all(),
                    department_id: None,
                    job_role_id: None,
                    manager_id: None,
                },
            )
            .await?;

        tracing::info!("👤 Usuário administrador '{}' criado.", username);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn service() -> AuthService {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        AuthService::new(UserRepository::new(pool), "segredo-de-teste".into(), 1, 4)
    }

    fn user() -> User {
        User {
            id: 42,
            username: "acme".into(),
            password_hash: String::new(),
            full_name: None,
            email: None,
            user_type: UserType::Company,
            company_id: Some(7),
            can_view_denuncias: true,
            can_view_nao_conformidades: true,
            can_view_eventos: true,
            can_view_dashboard: true,
            department_id: None,
            job_role_id: None,
            manager_id: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn token_carries_user_claims() {
        let service = service().await;
        let token = service.create_token(&user()).unwrap();

        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"segredo-de-teste"),
            &Validation::default(),
        )
        .unwrap();

        assert_eq!(data.claims.sub, 42);
        assert_eq!(data.claims.company_id, Some(7));
        assert_eq!(data.claims.user_type, UserType::Company);
        assert!(data.claims.exp > data.claims.iat);
    }

    #[tokio::test]
    async fn token_signed_with_other_secret_is_rejected() {
        let service = service().await;
        let other = AuthService::new(service.user_repo.clone(), "outro".into(), 1, 4);
        let token = other.create_token(&user()).unwrap();

        let result = service.validate_token(&token).await;
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn hash_and_verify_round_trip() {
        let service = service().await;
        let hashed = service.hash_password("segredo123").await.unwrap();
        assert!(service.verify_password("segredo123", &hashed).await.unwrap());
        assert!(!service.verify_password("errada", &hashed).await.unwrap());
    }
}
