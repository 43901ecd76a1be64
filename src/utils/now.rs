use chrono::{DateTime, Utc};

/// Returns the current wall-clock time in UTC.
///
/// Used to stamp inbound responses as they arrive so the registry history can
/// be inspected in arrival order.
///
/// # Example:
/// ```rust
/// use sublink::utils::now;
/// let received_at = now();
/// assert!(received_at.timestamp() > 0);
/// ```
pub fn now() -> DateTime<Utc> {
    Utc::now()
}
