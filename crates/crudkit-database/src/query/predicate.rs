//! Conjunctive predicates over entity properties.

use tracing::debug;

use crudkit_core::error::AppError;
use crudkit_core::result::AppResult;
use crudkit_core::traits::{Entity, PropertyDef};
use crudkit_core::types::{FieldValue, FilterDescriptor, FilterOperator};

/// One compiled comparison against a resolved property.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// Resolved property declaration.
    pub property: &'static PropertyDef,
    /// Comparison operator.
    pub operator: FilterOperator,
    /// Filter value, already coerced to the property's kind.
    pub value: FieldValue,
}

impl Condition {
    /// Test one entity.
    pub fn matches<E: Entity>(&self, entity: &E) -> bool {
        let actual = entity
            .property(self.property.name)
            .unwrap_or(FieldValue::Null);
        self.operator.accepts(actual.compare(&self.value))
    }
}

/// Conjunction of [`Condition`]s. An empty predicate matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    conditions: Vec<Condition>,
}

impl Predicate {
    /// A predicate that accepts every row.
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a predicate from already compiled conditions.
    pub fn from_conditions(conditions: Vec<Condition>) -> Self {
        Self { conditions }
    }

    /// The compiled conditions, in descriptor order.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Whether there are no conditions.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Test one entity against every condition.
    pub fn matches<E: Entity>(&self, entity: &E) -> bool {
        self.conditions.iter().all(|c| c.matches(entity))
    }
}

/// Compile one descriptor against the schema of `E`.
///
/// Fails when the property is unknown, is a relation, or when the value
/// cannot be converted to the property's declared type.
pub fn compile_condition<E: Entity>(descriptor: &FilterDescriptor) -> AppResult<Condition> {
    let property = E::find_property(&descriptor.property_name).ok_or_else(|| {
        AppError::validation(format!(
            "Property '{}' does not exist on {}",
            descriptor.property_name,
            E::NAME
        ))
    })?;

    if property.is_relation() {
        return Err(AppError::validation(format!(
            "Property '{}' on {} is a relation and cannot be filtered",
            property.name,
            E::NAME
        )));
    }

    let value = FieldValue::coerce(&descriptor.value, property.kind).ok_or_else(|| {
        AppError::validation(format!(
            "Value {} cannot be converted to {} for property '{}'",
            descriptor.value, property.kind, property.name
        ))
    })?;

    Ok(Condition {
        property,
        operator: descriptor.operator,
        value,
    })
}

/// Compile a descriptor list into a conjunctive predicate.
///
/// Descriptors without a property name or value are skipped.
pub fn compile_filters<E: Entity>(filters: &[FilterDescriptor]) -> AppResult<Predicate> {
    let mut conditions = Vec::with_capacity(filters.len());
    for descriptor in filters {
        if !descriptor.is_applicable() {
            debug!(
                entity = E::NAME,
                property = %descriptor.property_name,
                "Skipping filter without property name or value"
            );
            continue;
        }
        conditions.push(compile_condition::<E>(descriptor)?);
    }
    Ok(Predicate::from_conditions(conditions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crudkit_core::error::ErrorKind;
    use crudkit_entity::{Pokemon, fixtures};
    use serde_json::json;

    fn names(predicate: &Predicate) -> Vec<String> {
        fixtures::pokemon()
            .into_iter()
            .filter(|p| predicate.matches(p))
            .map(|p| p.name)
            .collect()
    }

    #[test]
    fn test_owner_equality() {
        let predicate =
            compile_filters::<Pokemon>(&[FilterDescriptor::eq("Owner", "Ash Ketchum")]).unwrap();
        assert_eq!(names(&predicate), vec!["Pikachu", "Squirtle"]);
    }

    #[test]
    fn test_conjunction_and_coercion() {
        let predicate = compile_filters::<Pokemon>(&[
            FilterDescriptor::eq("owner", "Misty"),
            FilterDescriptor::new("Level", FilterOperator::Gte, json!("15")),
        ])
        .unwrap();
        assert_eq!(names(&predicate), vec!["Butterfree"]);
    }

    #[test]
    fn test_every_operator() {
        let cases = [
            (FilterOperator::Eq, vec!["Charmander"]),
            (FilterOperator::Neq, vec!["Pikachu", "Bulbasaur", "Squirtle", "Butterfree"]),
            (FilterOperator::Gt, vec!["Pikachu", "Bulbasaur", "Squirtle", "Butterfree"]),
            (FilterOperator::Lt, vec![]),
            (FilterOperator::Gte, vec!["Pikachu", "Charmander", "Bulbasaur", "Squirtle", "Butterfree"]),
            (FilterOperator::Lte, vec!["Charmander"]),
        ];
        for (op, expected) in cases {
            let predicate =
                compile_filters::<Pokemon>(&[FilterDescriptor::new("Level", op, json!(12))]).unwrap();
            assert_eq!(names(&predicate), expected, "operator {op}");
        }
    }

    #[test]
    fn test_empty_filters_match_everything() {
        let predicate = compile_filters::<Pokemon>(&[]).unwrap();
        assert!(predicate.is_empty());
        assert_eq!(names(&predicate).len(), 5);
    }

    #[test]
    fn test_skips_blank_descriptors() {
        let predicate = compile_filters::<Pokemon>(&[
            FilterDescriptor::eq("", "ignored"),
            FilterDescriptor::eq("Owner", serde_json::Value::Null),
        ])
        .unwrap();
        assert!(predicate.is_empty());
    }

    #[test]
    fn test_unknown_property_fails() {
        let err = compile_filters::<Pokemon>(&[FilterDescriptor::eq("Nickname", "Sparky")])
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.message.contains("Nickname"));
    }

    #[test]
    fn test_relation_and_bad_value_fail() {
        assert!(compile_filters::<Pokemon>(&[FilterDescriptor::eq("Trainer", 1)]).is_err());
        assert!(compile_filters::<Pokemon>(&[FilterDescriptor::eq("Level", "high")]).is_err());
    }
}
