//! Normalization of the 3-letter language tags ffmpeg prints next to streams.

use std::collections::HashMap;

/// Remapping table for stream language tags.
///
/// ffmpeg emits ISO 639-2 codes in both their bibliographic and terminology
/// forms, plus `und` for undetermined. The default table folds the known
/// aliases onto one canonical form and drops `und` entirely. The table is a
/// plain value so callers can extend it without touching any call site.
#[derive(Debug, Clone)]
pub struct LanguageMap {
    map: HashMap<String, Option<String>>,
}

impl Default for LanguageMap {
    fn default() -> Self {
        let mut map = HashMap::new();
        map.insert("deu".to_string(), Some("ger".to_string()));
        map.insert("und".to_string(), None);
        Self { map }
    }
}

impl LanguageMap {
    /// Adds or overrides a mapping. `None` means "treat this tag as absent".
    pub fn insert(&mut self, raw: &str, canonical: Option<&str>) {
        self.map
            .insert(raw.to_string(), canonical.map(ToString::to_string));
    }

    /// Normalizes a raw tag. Tags not present in the table pass through
    /// unchanged; a mapped-to-`None` tag (e.g. `und`) comes back absent.
    pub fn normalize(&self, raw: Option<&str>) -> Option<String> {
        let raw = raw?;
        match self.map.get(raw) {
            Some(mapped) => mapped.clone(),
            None => Some(raw.to_string()),
        }
    }
}
