/// Password hashing module using Argon2id
///
/// Hashes are PHC strings, so the parameters and salt travel with the digest and
/// verification needs nothing but the stored string.
///
/// Default cost: 64 MB memory, 3 passes, 4 lanes, 32-byte output.
///
/// # Example
///
/// ```
/// use goodtodo_shared::auth::password::PasswordService;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let service = PasswordService::new();
/// let hash = service.hash("super_secret_password_123")?;
///
/// assert!(service.verify("super_secret_password_123", &hash)?);
/// assert!(!service.verify("wrong_password", &hash)?);
/// # Ok(())
/// # }
/// ```
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, ParamsBuilder, Version,
};

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashError(String),

    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Stored digest is not a PHC string
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Argon2id hasher with fixed cost parameters
#[derive(Debug, Clone)]
pub struct PasswordService {
    params: Params,
}

impl Default for PasswordService {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordService {
    pub const DEFAULT_MEMORY_KIB: u32 = 65536;
    pub const DEFAULT_ITERATIONS: u32 = 3;
    pub const DEFAULT_PARALLELISM: u32 = 4;

    pub fn new() -> Self {
        Self::build(
            Self::DEFAULT_MEMORY_KIB,
            Self::DEFAULT_ITERATIONS,
            Self::DEFAULT_PARALLELISM,
        )
        .unwrap_or_else(|_| Self {
            params: Params::default(),
        })
    }

    /// Uses custom cost parameters; tests use this to keep hashing fast
    pub fn with_cost(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, PasswordError> {
        Self::build(memory_kib, iterations, parallelism)
    }

    fn build(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, PasswordError> {
        let params = ParamsBuilder::new()
            .m_cost(memory_kib)
            .t_cost(iterations)
            .p_cost(parallelism)
            .output_len(32)
            .build()
            .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hashes a password with a fresh random salt
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))
    }

    /// Verifies a password against a stored hash
    ///
    /// `Ok(false)` on mismatch; an error only when the hash cannot be parsed or
    /// the primitive fails. Parameters are taken from the hash itself.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

        match self.argon2().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerifyError(format!("Verification failed: {}", e))),
        }
    }
}
