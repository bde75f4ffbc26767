use crate::config::config::{Hotkeys, OverlayConfig, SizeSpec};
use schemars::{schema_for, Schema};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Serialize)]
struct DocumentedFile<'a> {
    overlay: &'a OverlayConfig,
}

/// Renders a config file for `config`, with each field preceded by its documentation.
pub fn serialize_config(config: &OverlayConfig) -> Result<String, serde_yaml::Error> {
    let yaml_string = serde_yaml::to_string(&DocumentedFile { overlay: config })?;

    let mut field_docs = HashMap::new();
    extract_field_documentation(&schema_for!(OverlayConfig), "overlay", &mut field_docs);
    extract_field_documentation(&schema_for!(Hotkeys), "overlay.hotkeys", &mut field_docs);
    extract_field_documentation(&schema_for!(SizeSpec), "overlay.size", &mut field_docs);

    let mut output = String::new();
    output.push_str("# droptty configuration file\n");
    output.push_str("# Changes are applied as soon as the file is saved\n\n");
    output.push_str(&add_comments_to_yaml(&yaml_string, &field_docs));
    output.push('\n');
    Ok(output)
}

fn extract_field_documentation(
    schema: &Schema,
    prefix: &str,
    field_docs: &mut HashMap<String, String>,
) {
    let Some(properties) = schema
        .as_object()
        .and_then(|schema_obj| schema_obj.get("properties"))
        .and_then(|properties| properties.as_object())
    else {
        return;
    };

    for (key, prop_value) in properties {
        let description = prop_value
            .as_object()
            .and_then(|prop_obj| prop_obj.get("description"))
            .and_then(|description| description.as_str());

        if let Some(desc_str) = description {
            field_docs.insert(format!("{}.{}", prefix, key), desc_str.to_string());
        }
    }
}

fn add_comments_to_yaml(yaml: &str, field_docs: &HashMap<String, String>) -> String {
    let mut result = Vec::new();
    let mut field_path_stack = Vec::new();

    for line in yaml.lines() {
        let is_sequence_item = line.trim_start().starts_with('-');

        if let (false, Some(colon_pos)) = (is_sequence_item, line.find(':')) {
            let before_colon = &line[..colon_pos];
            let field_name = before_colon.trim();

            let indent_level = (before_colon.len() - before_colon.trim_start().len()) / 2;
            let indent = "  ".repeat(indent_level);
            field_path_stack.truncate(indent_level);
            field_path_stack.push(field_name.to_string());
            let full_field_path = field_path_stack.join(".");

            if let Some(doc) = field_docs.get(&full_field_path) {
                if !result.is_empty() {
                    result.push(String::new());
                }
                result.push(format!("{}# {}", indent, doc));
            }
        }

        result.push(line.to_string());
    }

    result.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFile;
    use crate::platform::PlatformCapabilities;

    #[test]
    fn test_default_file_is_documented() {
        let config = OverlayConfig::defaults(&PlatformCapabilities::other());
        let output = serialize_config(&config).unwrap();

        assert!(output.contains("  # Keep the overlay above every other window\n  alwaysOnTop: true"));
        assert!(output.contains("    # Hotkeys that toggle the overlay\n    open:"));
        assert!(output.contains("position: top"));
    }

    #[test]
    fn test_default_file_parses_back() {
        let config = OverlayConfig::defaults(&PlatformCapabilities::mac());
        let output = serialize_config(&config).unwrap();

        let file: ConfigFile = serde_yaml::from_str(&output).unwrap();
        let resolved = OverlayConfig::resolve(&PlatformCapabilities::other(), file.overlay.as_ref());
        assert_eq!(resolved, config);
    }
}
