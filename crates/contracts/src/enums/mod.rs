pub mod location_kind;

pub use location_kind::LocationKind;
