//! Identifier decoding for stored records.
//!
//! Blobs written by earlier versions of the app may carry free-form string
//! ids such as `proj-1`. Those map onto name-based UUIDs, so every reference
//! to the same string resolves to the same id.

use serde::{Deserialize, Deserializer};
use uuid::Uuid;

/// Namespace of ids derived from non-UUID strings.
pub const LEGACY_ID_NAMESPACE: Uuid = Uuid::from_u128(0x7f3c_1a52_9d04_4b6e_a1c8_5e2f_0b93_d417);

/// Parses `raw` as a UUID, or derives a stable one from its text.
pub fn id_from_str(raw: &str) -> Uuid {
    Uuid::parse_str(raw).unwrap_or_else(|_| Uuid::new_v5(&LEGACY_ID_NAMESPACE, raw.as_bytes()))
}

pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<Uuid, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(id_from_str(&raw))
}

#[cfg(test)]
mod tests {
    use super::id_from_str;
    use uuid::Uuid;

    #[test]
    fn uuid_text_keeps_its_value() {
        let id = Uuid::new_v4();
        assert_eq!(id_from_str(&id.to_string()), id);
    }

    #[test]
    fn free_form_text_maps_to_the_same_id_every_time() {
        assert_eq!(id_from_str("proj-1"), id_from_str("proj-1"));
        assert_ne!(id_from_str("proj-1"), id_from_str("proj-2"));
    }
}
