//! Copying claims from one entity onto another

use crate::fix::{ClaimFix, Fix};
use wdbot_core::Property;
use wdbot_model::Entity;

/// Compute the claims needed to copy `properties` from `source` onto `dest`.
///
/// Nothing is written. A property is skipped when the source lacks it, when
/// the source holds several values for a scalar property, or when `dest`
/// already holds any value for it. Values the store cannot accept back
/// ("no value", "some value", unmodelled types) are never copied.
pub fn copy_delayed(source: &Entity, dest: &Entity, properties: &[Property]) -> Vec<Fix> {
    let mut fixes = Vec::new();

    for property in properties {
        let values = source.claims(property.id);
        if values.is_empty() {
            tracing::info!(source = %source.id(), %property, "source has no value, skipping copy");
            continue;
        }
        if property.is_scalar() && values.len() > 1 {
            tracing::info!(
                source = %source.id(),
                %property,
                count = values.len(),
                "source holds several values for a scalar property, skipping copy"
            );
            continue;
        }
        if dest.has_claim(property.id) {
            tracing::info!(dest = %dest.id(), %property, "destination already has a value, skipping copy");
            continue;
        }

        for claim in values {
            if !claim.value.is_writable() {
                tracing::info!(
                    source = %source.id(),
                    %property,
                    value = %claim.value,
                    "source value cannot be written, skipping copy"
                );
                continue;
            }
            fixes.push(ClaimFix::set(dest.id(), property, claim.value.clone()).into());
        }
    }

    fixes
}
