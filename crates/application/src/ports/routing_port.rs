//! Routing port

use async_trait::async_trait;
use domain::{CoordinateSequence, Route};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for driving route computation
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RoutingPort: Send + Sync {
    /// Fetch candidate routes through the coordinates in order
    ///
    /// Alternatives are requested only when `alternatives` is set. The
    /// returned list is non-empty and in service order.
    async fn fetch_routes(
        &self,
        coordinates: &CoordinateSequence,
        alternatives: bool,
    ) -> Result<Vec<Route>, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn RoutingPort>();
    }
}
