//! Ownership checks shared by the tender and application handlers.

use crate::{error::AppError, store::Company};

/// Succeeds when the acting company is `owner_id`; otherwise a 403 naming `action`.
pub fn ensure_owner(actor: Option<&Company>, owner_id: u64, action: &str) -> Result<u64, AppError> {
    match actor {
        Some(c) if c.id == owner_id => Ok(c.id),
        _ => Err(AppError::Authorization(format!("Not authorized to {action}"))),
    }
}

/// Like [`ensure_owner`] but any of `owner_ids` is accepted.
pub fn ensure_any_owner(
    actor: Option<&Company>,
    owner_ids: &[u64],
    action: &str,
) -> Result<u64, AppError> {
    match actor {
        Some(c) if owner_ids.contains(&c.id) => Ok(c.id),
        _ => Err(AppError::Authorization(format!("Not authorized to {action}"))),
    }
}
