/// A fact emitted by an aggregate or record once a command succeeded.
///
/// Published events are never altered. `event_type` is the routing name an
/// envelope carries, `<context>.<aggregate>.<fact>`.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    fn event_type(&self) -> &'static str;

    /// Payload schema version. Bump it when a payload's shape changes.
    fn version(&self) -> u32 {
        1
    }
}
