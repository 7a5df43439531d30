//! # Notification Dispatcher
//!
//! Fans a placed order out to every subscribed handler.
//!
//! ```text
//! publish(order)
//!     │
//!     ├── snapshot handler list (subscribe/unsubscribe never block delivery)
//!     │
//!     ├── handler 1 ──► Ok          delivered += 1
//!     ├── handler 2 ──► Err / panic  logged, failed += 1
//!     └── handler 3 ──► Ok          delivered += 1
//! ```
//!
//! Handlers run one after another in subscription order. Each runs on its
//! own task, so a panicking handler is reported like an error and the rest
//! still run. `publish` itself never fails.

use std::error::Error;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};

use folio_core::Order;

/// Error type handlers report back.
pub type HandlerError = Box<dyn Error + Send + Sync>;

/// Something that reacts to a placed order.
#[async_trait]
pub trait OrderHandler: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    async fn handle(&self, order: &Order) -> Result<(), HandlerError>;
}

/// Token returned by [`NotificationDispatcher::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Outcome counts for one `publish` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub delivered: usize,
    pub failed: usize,
}

#[derive(Default)]
pub struct NotificationDispatcher {
    handlers: RwLock<Vec<(SubscriptionId, Arc<dyn OrderHandler>)>>,
    next_id: AtomicU64,
}

impl NotificationDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler`. Subscribing the same handler twice delivers twice.
    pub async fn subscribe(&self, handler: Arc<dyn OrderHandler>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        debug!(handler = handler.name(), ?id, "Handler subscribed");
        self.handlers.write().await.push((id, handler));
        id
    }

    /// Removes a subscription. Unknown ids are ignored.
    pub async fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.write().await;
        let before = handlers.len();
        handlers.retain(|(sid, _)| *sid != id);
        before != handlers.len()
    }

    pub async fn handler_count(&self) -> usize {
        self.handlers.read().await.len()
    }

    /// Delivers `order` to every handler subscribed at call time.
    pub async fn publish(&self, order: &Order) -> PublishReport {
        let snapshot: Vec<Arc<dyn OrderHandler>> = self
            .handlers
            .read()
            .await
            .iter()
            .map(|(_, h)| Arc::clone(h))
            .collect();

        let mut report = PublishReport::default();
        for handler in snapshot {
            let name = handler.name().to_string();
            let owned = order.clone();
            let task = tokio::spawn(async move { handler.handle(&owned).await });

            match task.await {
                Ok(Ok(())) => report.delivered += 1,
                Ok(Err(e)) => {
                    warn!(handler = %name, order_id = %order.id, error = %e, "Order handler failed");
                    report.failed += 1;
                }
                Err(join_err) => {
                    error!(handler = %name, order_id = %order.id, error = %join_err, "Order handler panicked");
                    report.failed += 1;
                }
            }
        }

        debug!(order_id = %order.id, delivered = report.delivered, failed = report.failed, "Order published");
        report
    }
}

impl std::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationDispatcher")
            .field("next_id", &self.next_id.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use folio_core::{Money, OrderLine};
    use std::sync::Mutex;

    fn order() -> Order {
        let line = OrderLine::new("B1", 1, Money::from_cents(100)).unwrap();
        Order::place("u-1", vec![line], Utc::now()).unwrap()
    }

    /// Appends its tag to a shared log.
    struct Recorder {
        tag: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl OrderHandler for Recorder {
        async fn handle(&self, order: &Order) -> Result<(), HandlerError> {
            self.log.lock().unwrap().push(format!("{}:{}", self.tag, order.id));
            Ok(())
        }
    }

    struct Failing;

    #[async_trait]
    impl OrderHandler for Failing {
        async fn handle(&self, _order: &Order) -> Result<(), HandlerError> {
            Err("mail server down".into())
        }
    }

    struct Panicking;

    #[async_trait]
    impl OrderHandler for Panicking {
        async fn handle(&self, _order: &Order) -> Result<(), HandlerError> {
            panic!("handler bug");
        }
    }

    fn recorder(tag: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Arc<dyn OrderHandler> {
        Arc::new(Recorder {
            tag,
            log: Arc::clone(log),
        })
    }

    #[tokio::test]
    async fn test_handlers_run_in_subscription_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = NotificationDispatcher::new();
        dispatcher.subscribe(recorder("a", &log)).await;
        dispatcher.subscribe(recorder("b", &log)).await;

        let order = order();
        let report = dispatcher.publish(&order).await;

        assert_eq!(report, PublishReport { delivered: 2, failed: 0 });
        assert_eq!(
            *log.lock().unwrap(),
            vec![format!("a:{}", order.id), format!("b:{}", order.id)]
        );
    }

    #[tokio::test]
    async fn test_failing_handler_does_not_stop_the_rest() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = NotificationDispatcher::new();
        dispatcher.subscribe(Arc::new(Failing)).await;
        dispatcher.subscribe(Arc::new(Panicking)).await;
        dispatcher.subscribe(recorder("b", &log)).await;

        let report = dispatcher.publish(&order()).await;

        assert_eq!(report, PublishReport { delivered: 1, failed: 2 });
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_no_subscribers_is_a_noop() {
        let dispatcher = NotificationDispatcher::new();
        assert_eq!(dispatcher.publish(&order()).await, PublishReport::default());
    }

    #[tokio::test]
    async fn test_unsubscribe() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = NotificationDispatcher::new();
        let a = dispatcher.subscribe(recorder("a", &log)).await;
        dispatcher.subscribe(recorder("b", &log)).await;

        assert!(dispatcher.unsubscribe(a).await);
        assert!(!dispatcher.unsubscribe(a).await);
        assert_eq!(dispatcher.handler_count().await, 1);

        dispatcher.publish(&order()).await;
        let log = log.lock().unwrap();
        assert_eq!(log.len(), 1);
        assert!(log[0].starts_with("b:"));
    }

    #[tokio::test]
    async fn test_double_subscribe_delivers_twice() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = NotificationDispatcher::new();
        let handler = recorder("a", &log);
        dispatcher.subscribe(Arc::clone(&handler)).await;
        dispatcher.subscribe(handler).await;

        let report = dispatcher.publish(&order()).await;
        assert_eq!(report.delivered, 2);
    }
}
