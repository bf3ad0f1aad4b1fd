pub mod argon2;
pub mod errors;

pub use self::argon2::PasswordHasher;
pub use self::argon2::ITERATIONS;
pub use self::argon2::MEMORY_COST_KIB;
pub use self::argon2::PARALLELISM;
pub use errors::PasswordError;
