use async_trait::async_trait;

use super::{CreateUserDto, GetUserDto, TwoFactorState, UpdateUserDto, User};
use crate::domain::DomainResult;
use crate::shared::PaginatedResult;

#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User>;

    async fn list_users(&self, dto: GetUserDto) -> DomainResult<PaginatedResult<User>>;
    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>>;
    async fn get_users_by_ids(&self, ids: &[String]) -> DomainResult<Vec<User>>;

    async fn update_user(&self, id: &str, dto: UpdateUserDto) -> DomainResult<Option<User>>;
    async fn update_two_factor(&self, id: &str, state: TwoFactorState) -> DomainResult<()>;
    async fn touch_last_login(&self, id: &str) -> DomainResult<()>;
    /// Wipes every account. Cars must already be gone.
    async fn delete_all(&self) -> DomainResult<u64>;
}
