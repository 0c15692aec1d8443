use thiserror::Error;
use tokio::sync::OnceCell;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("hashing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Hash a plaintext password at the configured bcrypt cost.
pub fn hash_password(password: &str, work_factor: u32) -> Result<String, PasswordError> {
    Ok(bcrypt::hash(password, work_factor)?)
}

/// Hash on the blocking pool so a high work factor doesn't stall the runtime.
pub async fn hash_password_blocking(password: String, work_factor: u32) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&password, work_factor)).await?
}

/// Compare a plaintext password against a stored bcrypt hash.
///
/// A malformed stored hash counts as a mismatch rather than an error.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match bcrypt::verify(password, hash) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!("Stored password hash could not be verified: {}", e);
            false
        }
    }
}

/// `verify_password` on the blocking pool.
pub async fn verify_password_blocking(password: String, hash: String) -> Result<bool, PasswordError> {
    Ok(tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await?)
}

/// Hash compared against when the account does not exist. Built once, at the
/// work factor of the first caller.
static ABSENT_ACCOUNT_HASH: OnceCell<String> = OnceCell::const_new();

/// Check a login password against the stored hash, if there is one.
///
/// A missing account still pays for a full bcrypt verify, so response time
/// does not reveal which usernames exist. Always `false` in that case.
pub async fn verify_login(password: String, stored: Option<String>, work_factor: u32) -> Result<bool, PasswordError> {
    match stored {
        Some(hash) => verify_password_blocking(password, hash).await,
        None => {
            let hash = ABSENT_ACCOUNT_HASH
                .get_or_try_init(|| hash_password_blocking("absent-account".to_string(), work_factor))
                .await?;
            verify_password_blocking(password, hash.clone()).await?;
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_and_verifies() {
        let hash = hash_password("password1", 4).unwrap();
        assert!(hash.starts_with("$2"));
        assert!(verify_password("password1", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn malformed_hash_is_a_mismatch() {
        assert!(!verify_password("password1", "not-a-hash"));
    }

    #[tokio::test]
    async fn hashes_off_the_runtime() {
        let hash = hash_password_blocking("password1".to_string(), 4).await.unwrap();
        assert!(verify_password("password1", &hash));
    }

    #[tokio::test]
    async fn verifies_off_the_runtime() {
        let hash = hash_password("password1", 4).unwrap();
        assert!(verify_password_blocking("password1".to_string(), hash.clone()).await.unwrap());
        assert!(!verify_password_blocking("wrong".to_string(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn login_checks_stored_hash() {
        let hash = hash_password("password1", 4).unwrap();
        assert!(verify_login("password1".to_string(), Some(hash.clone()), 4).await.unwrap());
        assert!(!verify_login("wrong".to_string(), Some(hash), 4).await.unwrap());
    }

    #[tokio::test]
    async fn login_without_account_never_matches() {
        assert!(!verify_login("absent-account".to_string(), None, 4).await.unwrap());
        assert!(!verify_login("password1".to_string(), None, 4).await.unwrap());
        assert!(ABSENT_ACCOUNT_HASH.get().is_some_and(|hash| hash.starts_with("$2")));
    }

    #[test]
    fn rejects_invalid_cost() {
        assert!(hash_password("password1", 1).is_err());
    }
}
