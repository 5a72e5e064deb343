use crate::auth::Role;

/// Payload problems caught before any network call is made.
#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("product title must not be empty")]
    EmptyTitle,
    #[error("product price must be greater than zero")]
    ZeroPrice,
    #[error("update carries no changed fields")]
    EmptyPatch,
    #[error("order must contain at least one item")]
    EmptyOrder,
    #[error("order item quantity must be greater than zero")]
    ZeroQuantity,
    #[error("order total exceeds the representable amount")]
    TotalOverflow,
    #[error("cancellation reason must not be empty")]
    EmptyCancellationReason,
}

#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("role {0:?} cannot review approvals")]
    NotAReviewer(Role),
    #[error("role {0:?} cannot submit product actions")]
    ProductActionsForbidden(Role),
    #[error("role {0:?} cannot submit order actions")]
    OrderActionsForbidden(Role),
}
