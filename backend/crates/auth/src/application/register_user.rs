//! Register User Use Case
//!
//! Creates a disabled Keycloak account that an administrator activates later.

use std::sync::Arc;

use crate::domain::registration::{Email, NewUser, Password, Username};
use crate::domain::repository::IdentityProvider;
use crate::error::AuthResult;

pub const REGISTRATION_MESSAGE: &str = "User registered successfully, pending admin activation.";

/// Register input
pub struct RegisterUserInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Register output
pub struct RegisterUserOutput {
    pub user_id: String,
    pub message: &'static str,
}

/// Register user use case
pub struct RegisterUserUseCase<P>
where
    P: IdentityProvider,
{
    provider: Arc<P>,
}

impl<P> RegisterUserUseCase<P>
where
    P: IdentityProvider,
{
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    pub async fn execute(&self, input: RegisterUserInput) -> AuthResult<RegisterUserOutput> {
        let user = NewUser {
            username: Username::new(input.username)?,
            email: Email::new(input.email)?,
            password: Password::new(input.password)?,
        };

        let user_id = self.provider.create_user(&user).await?;
        self.provider
            .set_password(&user_id, user.password.expose())
            .await?;

        tracing::info!(
            user_id = %user_id,
            username = %user.username,
            "User registered, pending activation"
        );

        Ok(RegisterUserOutput {
            user_id,
            message: REGISTRATION_MESSAGE,
        })
    }
}
