//! Runtime property access for entities.
//!
//! The dynamic filter layer never knows an entity's concrete shape. It
//! works against the declared [`PropertyDef`] schema and reads values
//! through [`Entity::property`].

use crate::types::value::{FieldKind, FieldValue};

/// Declaration of one entity property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyDef {
    /// Property name as callers spell it, e.g. `"Owner"`.
    pub name: &'static str,
    /// Backing column in a relational store.
    pub column: &'static str,
    /// Declared type.
    pub kind: FieldKind,
}

impl PropertyDef {
    /// Declare a scalar property.
    pub const fn new(name: &'static str, column: &'static str, kind: FieldKind) -> Self {
        Self { name, column, kind }
    }

    /// Declare a navigation to a related entity.
    pub const fn relation(name: &'static str) -> Self {
        Self {
            name,
            column: "",
            kind: FieldKind::Relation,
        }
    }

    /// Whether this property is a navigation.
    pub fn is_relation(&self) -> bool {
        self.kind == FieldKind::Relation
    }
}

/// A record whose properties are addressable by name at runtime.
///
/// Every entity carries a unique positive integer identifier exposed as
/// the [`Entity::ID_PROPERTY`] property.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Entity type name used in logs and messages.
    const NAME: &'static str;

    /// Backing table in a relational store.
    const TABLE: &'static str;

    /// Name of the identifier property.
    const ID_PROPERTY: &'static str = "Id";

    /// All declared properties, relations included.
    fn schema() -> &'static [PropertyDef];

    /// Unique identifier. `0` marks an entity not yet persisted.
    fn id(&self) -> i64;

    /// Assign the identifier chosen by the store.
    fn set_id(&mut self, id: i64);

    /// Read a property by its declared name.
    ///
    /// Returns `None` for unknown names and for relation properties.
    fn property(&self, name: &str) -> Option<FieldValue>;

    /// Resolve a property name case-insensitively against the schema.
    fn find_property(name: &str) -> Option<&'static PropertyDef> {
        let name = name.trim();
        Self::schema()
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Scalar (non-relation) properties in declaration order.
    fn scalar_properties() -> Vec<&'static PropertyDef> {
        Self::schema().iter().filter(|p| !p.is_relation()).collect()
    }
}
