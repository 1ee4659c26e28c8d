//! Provider entity normalization.

use tracing::debug;

use crate::models::record::Entity;

use super::provider::ProviderEntity;

/// Normalize provider entities into lowercase-tagged, trimmed [`Entity`] values.
///
/// Never fails: a missing mention degrades to an empty value.
pub fn normalize_entities(entities: &[ProviderEntity]) -> Vec<Entity> {
    let normalized: Vec<Entity> = entities.iter().map(normalize_entity).collect();

    let empty = normalized.iter().filter(|e| e.value.is_empty()).count();
    debug!(
        "Normalized {} entities ({} without text)",
        normalized.len(),
        empty
    );

    normalized
}

fn normalize_entity(entity: &ProviderEntity) -> Entity {
    Entity {
        entity_type: entity.entity_type.trim().to_lowercase(),
        value: entity
            .mention_text
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string(),
        anchor: entity.anchor(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_case_and_whitespace() {
        let entities = vec![
            ProviderEntity::new(" Name ", "  Jane Smith "),
            ProviderEntity::new("MOBILE", "0412 345 678\n"),
        ];

        let normalized = normalize_entities(&entities);
        assert_eq!(
            normalized,
            vec![
                Entity::new("name", "Jane Smith"),
                Entity::new("mobile", "0412 345 678"),
            ]
        );
    }

    #[test]
    fn test_missing_mention_is_empty() {
        let entity = ProviderEntity {
            entity_type: "Address".into(),
            ..ProviderEntity::default()
        };

        let normalized = normalize_entities(&[entity]);
        assert_eq!(normalized[0].entity_type, "address");
        assert_eq!(normalized[0].value, "");
    }

    #[test]
    fn test_unknown_types_are_kept() {
        let normalized = normalize_entities(&[ProviderEntity::new("Fax", "02 9999 0000")]);
        assert_eq!(normalized[0].entity_type, "fax");
        assert_eq!(normalized[0].kind(), None);
    }
}
