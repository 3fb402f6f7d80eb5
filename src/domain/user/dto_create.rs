use super::UserRole;

#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    /// Already hashed with bcrypt
    pub password_hash: String,
}
