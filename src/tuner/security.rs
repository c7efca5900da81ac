//! Client and internode encryption rules.

use crate::document::{self, Document};
use crate::error::TunerError;
use crate::source::ConfigSource;

/// Mutate the two encryption sub-mappings in place.
///
/// Both sub-mappings must pre-exist in the loaded document; a stock
/// `cassandra.yaml` always carries them, and a document without them is
/// incompatible with this tuner.
pub(crate) fn apply(doc: &mut Document, source: &dyn ConfigSource) -> Result<(), TunerError> {
    let client = document::nested_mapping_mut(doc, "client_encryption_options")?;
    document::set_bool(client, "enabled", source.client_ssl_enabled());

    let server = document::nested_mapping_mut(doc, "server_encryption_options")?;
    document::set_str(server, "internode_encryption", &source.internode_encryption());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::TunerSettings;
    use serde_yaml::Value;

    fn doc_with_encryption_options() -> Document {
        serde_yaml::from_str(
            "client_encryption_options:\n  enabled: false\n  keystore: conf/.keystore\n\
             server_encryption_options:\n  internode_encryption: none\n",
        )
        .unwrap()
    }

    #[test]
    fn test_encryption_options_are_updated_in_place() {
        let mut doc = doc_with_encryption_options();
        let source = TunerSettings {
            client_ssl_enabled: true,
            internode_encryption: "all".to_string(),
            ..TunerSettings::default()
        };

        apply(&mut doc, &source).unwrap();

        let client = doc
            .get(&Value::String("client_encryption_options".to_string()))
            .and_then(Value::as_mapping)
            .unwrap();
        assert_eq!(
            client.get(&Value::String("enabled".to_string())),
            Some(&Value::Bool(true))
        );
        // sibling keys in the sub-mapping are untouched
        assert_eq!(
            client.get(&Value::String("keystore".to_string())),
            Some(&Value::String("conf/.keystore".to_string()))
        );

        let server = doc
            .get(&Value::String("server_encryption_options".to_string()))
            .and_then(Value::as_mapping)
            .unwrap();
        assert_eq!(
            server.get(&Value::String("internode_encryption".to_string())),
            Some(&Value::String("all".to_string()))
        );
    }

    #[test]
    fn test_missing_client_options_is_structural_error() {
        let mut doc: Document =
            serde_yaml::from_str("server_encryption_options:\n  internode_encryption: none\n")
                .unwrap();
        let source = TunerSettings::default();
        assert!(matches!(
            apply(&mut doc, &source),
            Err(TunerError::Structure(_))
        ));
    }

    #[test]
    fn test_missing_server_options_is_structural_error() {
        let mut doc: Document =
            serde_yaml::from_str("client_encryption_options:\n  enabled: false\n").unwrap();
        let source = TunerSettings::default();
        assert!(matches!(
            apply(&mut doc, &source),
            Err(TunerError::Structure(_))
        ));
    }
}
