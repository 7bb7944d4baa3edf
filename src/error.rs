use thiserror::Error;

/// Errors raised while configuring an [`MBTreeMap`](crate::MBTreeMap).
///
/// Lookups and removals never fail: a missing key is reported as `None`.
///
/// # Examples
///
/// ```
/// use mbtree::{ConfigError, Order};
///
/// assert_eq!(Order::new(2), Err(ConfigError::OrderTooSmall { order: 2 }));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The requested order cannot hold a valid B-tree.
    #[error("B-tree order must be greater than {min}, got {order}", min = crate::Order::MIN - 1)]
    OrderTooSmall {
        /// The rejected order.
        order: usize,
    },
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn order_too_small_message() {
        let err = ConfigError::OrderTooSmall { order: 1 };
        assert_eq!(err.to_string(), "B-tree order must be greater than 2, got 1");
    }
}
