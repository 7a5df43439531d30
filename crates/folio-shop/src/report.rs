//! # Report Access Gate
//!
//! Only admins may see the sales report. The role check happens before
//! the aggregate is computed, so denied callers cost nothing.

use std::sync::Arc;

use tracing::{debug, warn};

use folio_core::{Identity, SalesReport};

use crate::error::{ShopError, ShopResult};
use crate::ports::SalesAggregator;

pub struct ReportGate {
    source: Arc<dyn SalesAggregator>,
}

impl ReportGate {
    pub fn new(source: Arc<dyn SalesAggregator>) -> Self {
        ReportGate { source }
    }

    /// Sales totals over every non-cancelled order.
    ///
    /// `None` (no caller identity) and non-admin callers both get
    /// `Unauthorized`.
    pub async fn get_report(&self, identity: Option<&Identity>) -> ShopResult<SalesReport> {
        match identity {
            Some(id) if id.is_admin() => {
                debug!(user_id = %id.user_id, "Generating sales report");
                self.source.sales_report().await
            }
            Some(id) => {
                warn!(user_id = %id.user_id, role = %id.role, "Sales report denied");
                Err(ShopError::Unauthorized)
            }
            None => Err(ShopError::Unauthorized),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use crate::ports::OrderRepository;
    use async_trait::async_trait;
    use chrono::Utc;
    use folio_core::{Money, Order, OrderLine};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts how often the aggregate was computed.
    #[derive(Default)]
    struct Counting(AtomicUsize);

    #[async_trait]
    impl SalesAggregator for Counting {
        async fn sales_report(&self) -> ShopResult<SalesReport> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(SalesReport {
                total_revenue_cents: 0,
                number_of_orders: 0,
                generated_at: Utc::now(),
            })
        }
    }

    #[tokio::test]
    async fn test_admin_sees_totals() {
        let store = InMemoryStore::new();
        for cents in [1500, 2500] {
            let line = OrderLine::new("B1", 1, Money::from_cents(cents)).unwrap();
            store
                .commit(&Order::place("u", vec![line], Utc::now()).unwrap())
                .await
                .unwrap();
        }
        let gate = ReportGate::new(Arc::new(store));

        let report = gate.get_report(Some(&Identity::admin("root"))).await.unwrap();
        assert_eq!(report.total_revenue_cents, 4000);
        assert_eq!(report.number_of_orders, 2);
    }

    #[tokio::test]
    async fn test_empty_store_reports_zero() {
        let gate = ReportGate::new(Arc::new(InMemoryStore::new()));
        let report = gate.get_report(Some(&Identity::admin("root"))).await.unwrap();
        assert_eq!(report.total_revenue_cents, 0);
        assert_eq!(report.number_of_orders, 0);
    }

    #[tokio::test]
    async fn test_non_admin_denied_before_aggregation() {
        let source = Arc::new(Counting::default());
        let gate = ReportGate::new(source.clone());

        let member = gate.get_report(Some(&Identity::member("alice"))).await;
        let anonymous = gate.get_report(None).await;

        assert!(matches!(member, Err(ShopError::Unauthorized)));
        assert!(matches!(anonymous, Err(ShopError::Unauthorized)));
        assert_eq!(source.0.load(Ordering::SeqCst), 0);
    }
}
