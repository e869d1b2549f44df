use super::{EntityMetadata, EventStore, Origin};

/// Trait implemented by every aggregate root
///
/// Defines the mandatory accessors plus the static metadata of the aggregate
/// class (index, collection name, UI names).
pub trait AggregateRoot {
    /// Identifier type of the aggregate
    type Id;

    // ============================================================================
    // Instance methods (data of a concrete record)
    // ============================================================================

    /// Record ID
    fn id(&self) -> Self::Id;

    /// Business code of the record (e.g. "GR-2026-0001")
    fn code(&self) -> &str;

    /// Description / display name
    fn description(&self) -> &str;

    /// Lifecycle metadata
    fn metadata(&self) -> &EntityMetadata;

    /// Mutable lifecycle metadata
    fn metadata_mut(&mut self) -> &mut EntityMetadata;

    /// Domain events
    fn events(&self) -> &EventStore;

    /// Mutable domain events
    fn events_mut(&mut self) -> &mut EventStore;

    // ============================================================================
    // Static metadata of the aggregate class
    // ============================================================================

    /// Aggregate index in the system (e.g. "a001")
    fn aggregate_index() -> &'static str;

    /// Collection name for the DB (e.g. "color")
    fn collection_name() -> &'static str;

    /// Singular display name (e.g. "Color")
    fn element_name() -> &'static str;

    /// Plural display name (e.g. "Colors")
    fn list_name() -> &'static str;

    /// Data origin of the aggregate
    fn origin() -> Origin;

    // ============================================================================
    // Default implementations
    // ============================================================================

    /// Full aggregate name (e.g. "a001_color")
    fn full_name() -> String {
        format!("{}_{}", Self::aggregate_index(), Self::collection_name())
    }

    /// Table prefix for the DB (e.g. "a001_color_")
    fn table_prefix() -> String {
        format!("{}_", Self::full_name())
    }
}
