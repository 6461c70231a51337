// Parsing of `-p name:value` parameter flags

use serde_json::{Map, Value};

use crate::error::{CliError, CliResult};

/// Parse `name:value` flags into a parameter map
///
/// The value is everything after the first `:`, so values may themselves
/// contain colons. A repeated name keeps the last value.
pub fn parse_parameter_flags<S: AsRef<str>>(flags: &[S]) -> CliResult<Map<String, Value>> {
    let mut parameters = Map::new();
    for flag in flags {
        let flag = flag.as_ref();
        let (name, value) = flag.split_once(':').ok_or_else(|| {
            CliError::invalid_argument(format!(
                "parameter '{}' must have the form name:value",
                flag
            ))
        })?;

        let name = name.trim();
        if name.is_empty() {
            return Err(CliError::invalid_argument(format!(
                "parameter '{}' has an empty name",
                flag
            )));
        }
        parameters.insert(name.to_string(), Value::String(value.to_string()));
    }
    Ok(parameters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_simple() {
        let params = parse_parameter_flags(&["name:billing", "port:8080"]).unwrap();
        assert_eq!(params.get("name"), Some(&json!("billing")));
        assert_eq!(params.get("port"), Some(&json!("8080")));
    }

    #[test]
    fn test_value_keeps_colons() {
        let params = parse_parameter_flags(&["url:http://localhost:3000"]).unwrap();
        assert_eq!(params.get("url"), Some(&json!("http://localhost:3000")));
    }

    #[test]
    fn test_empty_value_allowed() {
        let params = parse_parameter_flags(&["suffix:"]).unwrap();
        assert_eq!(params.get("suffix"), Some(&json!("")));
    }

    #[test]
    fn test_last_value_wins() {
        let params = parse_parameter_flags(&["name:a", "name:b"]).unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("name"), Some(&json!("b")));
    }

    #[test]
    fn test_missing_separator() {
        let result = parse_parameter_flags(&["name"]);
        assert!(matches!(result, Err(CliError::InvalidArgument { .. })));
    }

    #[test]
    fn test_empty_name() {
        let result = parse_parameter_flags(&[":value"]);
        assert!(matches!(result, Err(CliError::InvalidArgument { .. })));
    }

    #[test]
    fn test_no_flags() {
        let flags: [&str; 0] = [];
        assert!(parse_parameter_flags(&flags).unwrap().is_empty());
    }
}
