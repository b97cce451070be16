use abi::Error;
use bcrypt::{hash, verify, DEFAULT_COST};
use rand::{distributions::Alphanumeric, Rng};

pub(crate) const PASSWORD_LENGTH: usize = 12;

/// initial password handed to a new employee, shown once
pub(crate) fn generate_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(PASSWORD_LENGTH)
        .map(char::from)
        .collect()
}

/// bcrypt is slow on purpose, keep it off the async workers
pub(crate) async fn hash_password(password: &str) -> Result<String, Error> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || {
        hash(password, DEFAULT_COST).map_err(|e| Error::Internal(e.to_string()))
    })
    .await
    .map_err(|e| Error::Internal(format!("password hashing task failed: {e}")))?
}

pub(crate) async fn verify_password(password: &str, password_hash: &str) -> Result<bool, Error> {
    let password = password.to_string();
    let password_hash = password_hash.to_string();
    tokio::task::spawn_blocking(move || {
        verify(password, &password_hash).map_err(|e| Error::Internal(e.to_string()))
    })
    .await
    .map_err(|e| Error::Internal(format!("password check task failed: {e}")))?
}
