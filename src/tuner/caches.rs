//! Key/row cache sizing rules.

use crate::document::{self, Document};
use crate::source::ConfigSource;
use tracing::warn;

/// Apply cache sizing for the key and row caches.
///
/// A cache's keys-to-save count is written only when its size was written; an
/// absent size leaves both keys untouched so values from an earlier bootstrap
/// survive.
pub(crate) fn apply(doc: &mut Document, source: &dyn ConfigSource) {
    apply_cache(
        doc,
        "key_cache_size_in_mb",
        source.key_cache_size_mb(),
        "key_cache_keys_to_save",
        source.key_cache_keys_to_save(),
    );
    apply_cache(
        doc,
        "row_cache_size_in_mb",
        source.row_cache_size_mb(),
        "row_cache_keys_to_save",
        source.row_cache_keys_to_save(),
    );
}

fn apply_cache(
    doc: &mut Document,
    size_key: &str,
    size: Option<String>,
    count_key: &str,
    count: Option<String>,
) {
    let Some(size) = size else {
        return;
    };

    match size.parse::<i64>() {
        Ok(mb) => document::set_int(doc, size_key, mb),
        Err(_) => {
            warn!(key = size_key, value = %size, "ignoring unparseable cache size");
            return;
        }
    }

    let Some(count) = count else {
        return;
    };

    match count.parse::<i64>() {
        Ok(n) => document::set_int(doc, count_key, n),
        Err(_) => {
            warn!(key = count_key, value = %count, "ignoring unparseable keys-to-save count");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::TunerSettings;
    use serde_yaml::Value;

    fn int_value(doc: &Document, key: &str) -> Option<i64> {
        doc.get(&Value::String(key.to_string()))
            .and_then(Value::as_i64)
    }

    #[test]
    fn test_size_and_count_written_when_both_present() {
        let mut doc = Document::new();
        let source = TunerSettings {
            key_cache_size_mb: Some("100".to_string()),
            key_cache_keys_to_save: Some("2048".to_string()),
            ..TunerSettings::default()
        };

        apply(&mut doc, &source);
        assert_eq!(int_value(&doc, "key_cache_size_in_mb"), Some(100));
        assert_eq!(int_value(&doc, "key_cache_keys_to_save"), Some(2048));
    }

    #[test]
    fn test_only_size_written_when_count_absent() {
        let mut doc = Document::new();
        let source = TunerSettings {
            row_cache_size_mb: Some("64".to_string()),
            ..TunerSettings::default()
        };

        apply(&mut doc, &source);
        assert_eq!(int_value(&doc, "row_cache_size_in_mb"), Some(64));
        assert_eq!(int_value(&doc, "row_cache_keys_to_save"), None);
    }

    #[test]
    fn test_absent_size_touches_neither_key() {
        let mut doc = Document::new();
        document::set_int(&mut doc, "key_cache_size_in_mb", 50);
        document::set_int(&mut doc, "key_cache_keys_to_save", 500);

        // count is present but size is absent; prior on-disk values survive
        let source = TunerSettings {
            key_cache_keys_to_save: Some("9999".to_string()),
            ..TunerSettings::default()
        };

        apply(&mut doc, &source);
        assert_eq!(int_value(&doc, "key_cache_size_in_mb"), Some(50));
        assert_eq!(int_value(&doc, "key_cache_keys_to_save"), Some(500));
    }

    #[test]
    fn test_unparseable_size_is_skipped() {
        let mut doc = Document::new();
        let source = TunerSettings {
            key_cache_size_mb: Some("lots".to_string()),
            key_cache_keys_to_save: Some("2048".to_string()),
            ..TunerSettings::default()
        };

        apply(&mut doc, &source);
        assert_eq!(int_value(&doc, "key_cache_size_in_mb"), None);
        assert_eq!(int_value(&doc, "key_cache_keys_to_save"), None);
    }
}
