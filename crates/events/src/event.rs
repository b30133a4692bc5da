use chrono::{DateTime, Utc};

/// A recorded fact about one aggregate.
///
/// Implementors name both themselves and the aggregate stream they belong
/// to, so an [`EventEnvelope`](crate::EventEnvelope) can be built from the
/// payload alone.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stream name of the owning aggregate (e.g. "dte.document").
    fn aggregate_type(&self) -> &'static str;

    /// Stable event name (e.g. "dte.document.signed").
    fn event_type(&self) -> &'static str;

    /// Payload schema version.
    fn version(&self) -> u32 {
        1
    }

    /// Business time of the fact.
    fn occurred_at(&self) -> DateTime<Utc>;
}
