use std::collections::{BTreeMap, HashSet};

use rand::rngs::OsRng;
use rand::{CryptoRng, Rng};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::generation::win_pool::{FieldKind, WinPool};

/// Only slots of this type receive generated numbers; labels, images and fixed
/// text are filled in by the frontend.
pub const GENERATED_SLOT_TYPE: &str = "user_input";

/// One template slot as sent by the editor. Fields are read leniently: numbers
/// are stringified and values of any other type count as absent, so one odd
/// slot never rejects the whole request.
#[derive(Debug, Clone, Deserialize)]
pub struct SlotConfig {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub slot_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub data_key: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// Accepted for tracing only; the slot list is supplied by the caller.
    pub template_id: Option<String>,
    pub user_seed: Option<String>,
    #[serde(default)]
    pub slot_configs: Vec<SlotConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Slot id → generated string.
    pub results: BTreeMap<String, String>,
}

impl SlotConfig {
    /// Returns `(slot id, field kind)` when this slot needs a generated value.
    fn generation_target(&self) -> Option<(&str, FieldKind)> {
        if self.slot_type.as_deref() != Some(GENERATED_SLOT_TYPE) {
            return None;
        }
        let key = self.data_key.as_deref().filter(|k| !k.is_empty())?;
        let id = self.id.as_deref().filter(|id| !id.is_empty())?;
        Some((id, FieldKind::from_key(key)))
    }
}

/// Builds one pool from `seed` and fills every generation slot from it.
///
/// Slots are keyed by their own id, so two slots sharing a `data_key` get
/// independent draws. A repeated id keeps the last draw.
pub fn generate_results(seed: Option<&str>, slots: &[SlotConfig]) -> BTreeMap<String, String> {
    generate_results_with_rng(seed, slots, &mut OsRng)
}

pub fn generate_results_with_rng<R>(
    seed: Option<&str>,
    slots: &[SlotConfig],
    rng: &mut R,
) -> BTreeMap<String, String>
where
    R: Rng + CryptoRng + ?Sized,
{
    let pool = WinPool::build(seed, rng);
    let mut results = BTreeMap::new();
    let mut warned: HashSet<String> = HashSet::new();

    for (id, kind) in slots.iter().filter_map(SlotConfig::generation_target) {
        if let FieldKind::Unrecognized(key) = &kind {
            if warned.insert(key.clone()) {
                warn!("Unrecognized data_key '{key}', falling back to a random 2-digit value");
            }
        }
        results.insert(id.to_string(), pool.generate(&kind, rng));
    }

    debug!("Generated {} slot values from a {}-digit pool", results.len(), pool.digits().len());
    results
}
