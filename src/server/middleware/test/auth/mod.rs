use crate::server::{
    error::{auth::AuthError, AppError},
    middleware::{
        auth::AuthGuard,
        session::{AuthSession, ReturnToSession},
    },
    model::discord::DiscordUser,
};
use test_utils::{builder::TestBuilder, error::TestError};

mod require;
