use super::UserRole;

#[derive(Debug, Clone, Default)]
pub struct GetUserDto {
    /// Substring match on name or email
    pub search: Option<String>,
    pub role: Option<UserRole>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}
