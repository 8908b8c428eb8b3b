use crate::models::common::OrderStatus;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    Approve,
    Reject,
    Cancel,
}

impl OrderAction {
    pub fn target(&self) -> OrderStatus {
        match self {
            OrderAction::Approve => OrderStatus::Approved,
            OrderAction::Reject => OrderStatus::Rejected,
            OrderAction::Cancel => OrderStatus::Cancelled,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Order is already {0}")]
    NotPending(OrderStatus),
    #[error("Order can only be cancelled within {0} minutes of placing it")]
    WindowElapsed(i64),
}

/// Decides the status an order moves to.
///
/// Only `pending` orders move. Cancellation is additionally bounded by
/// `cancel_window`, measured from `created_at`; the boundary instant is still inside.
pub fn next_status(
    current: OrderStatus,
    action: OrderAction,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
    cancel_window: Duration,
) -> Result<OrderStatus, TransitionError> {
    if current.is_final() {
        return Err(TransitionError::NotPending(current));
    }
    if action == OrderAction::Cancel && now.signed_duration_since(created_at) > cancel_window {
        return Err(TransitionError::WindowElapsed(cancel_window.num_minutes()));
    }
    Ok(action.target())
}
