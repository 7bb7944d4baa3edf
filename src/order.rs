use core::fmt;

use crate::error::ConfigError;

/// The order `M` of a B-tree: the maximum number of children of any node.
///
/// Every node holds at most `M - 1` entries, and every node other than the
/// root holds at least `ceil(M / 2) - 1`. The order is fixed when a map is
/// created and cannot change afterwards.
///
/// # Examples
///
/// ```
/// use mbtree::Order;
///
/// let order = Order::new(5).unwrap();
/// assert_eq!(order.max_entries(), 4);
/// assert_eq!(order.min_entries(), 2);
///
/// assert!(Order::new(2).is_err());
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Order(usize);

impl Order {
    /// The smallest order accepted.
    pub const MIN: usize = 3;

    /// The order used by [`MBTreeMap::new`](crate::MBTreeMap::new).
    pub const DEFAULT: Self = Self(12);

    /// Validates `order`, rejecting anything below [`Order::MIN`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OrderTooSmall`] if `order <= 2`.
    pub fn new(order: usize) -> Result<Self, ConfigError> {
        if order < Self::MIN {
            tracing::debug!(order, "rejected B-tree order");
            return Err(ConfigError::OrderTooSmall { order });
        }
        Ok(Self(order))
    }

    /// Returns the order as a plain integer.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }

    /// Maximum number of children of an internal node.
    #[must_use]
    pub const fn max_children(self) -> usize {
        self.0
    }

    /// Maximum number of entries a node may hold before it must split.
    #[must_use]
    pub const fn max_entries(self) -> usize {
        self.0 - 1
    }

    /// Minimum number of entries every non-root node must hold.
    #[must_use]
    pub const fn min_entries(self) -> usize {
        self.0.div_ceil(2) - 1
    }
}

impl Default for Order {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<usize> for Order {
    type Error = ConfigError;

    fn try_from(order: usize) -> Result<Self, Self::Error> {
        Self::new(order)
    }
}

impl From<Order> for usize {
    fn from(order: Order) -> Self {
        order.get()
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_orders_below_three() {
        for order in 0..Order::MIN {
            assert_eq!(Order::new(order), Err(ConfigError::OrderTooSmall { order }));
        }
    }

    #[test]
    fn default_is_twelve() {
        assert_eq!(Order::default().get(), 12);
        assert_eq!(Order::DEFAULT.max_entries(), 11);
        assert_eq!(Order::DEFAULT.min_entries(), 5);
    }

    #[test]
    fn order_three_bounds() {
        let order = Order::new(3).unwrap();
        assert_eq!(order.max_entries(), 2);
        assert_eq!(order.min_entries(), 1);
    }

    proptest! {
        #[test]
        fn bounds_are_consistent(m in 3usize..1024) {
            let order = Order::try_from(m).unwrap();
            prop_assert_eq!(order.max_children(), m);
            prop_assert!(order.min_entries() >= 1);
            // A split of an overfull node must leave both halves at or above the minimum.
            prop_assert!(order.max_entries() / 2 >= order.min_entries());
            prop_assert_eq!(usize::from(order), m);
        }
    }
}
