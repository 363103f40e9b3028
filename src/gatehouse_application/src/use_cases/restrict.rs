use gatehouse_core::{Role, User};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ForbiddenError {
    #[error("You do not have permission to perform this action")]
    Forbidden,
}

/// Role check - pure set-membership test over an already-resolved actor.
///
/// Runs strictly after the authorization gate; it has no identity-resolution
/// logic of its own.
pub fn restrict_to(allowed: &[Role], actor: &User) -> Result<(), ForbiddenError> {
    if actor.role().is_one_of(allowed) {
        Ok(())
    } else {
        Err(ForbiddenError::Forbidden)
    }
}
