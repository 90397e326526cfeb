/// Authentication utilities
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: HS256 access/refresh token issuing and validation
/// - [`middleware`]: bearer header parsing into a [`middleware::Principal`]
pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, JwtError, JwtService, TokenType};
pub use middleware::{authenticate, AuthError, Principal};
pub use password::{PasswordError, PasswordService};
