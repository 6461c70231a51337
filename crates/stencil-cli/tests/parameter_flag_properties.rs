// Property-based tests for `-p name:value` parameter flags

use proptest::prelude::*;
use serde_json::Value;
use stencil_cli::{parse_parameter_flags, CliError};

proptest! {
    /// Property: the name is everything before the first colon, the value everything after
    #[test]
    fn prop_value_is_text_after_first_colon(
        name in "[a-zA-Z][a-zA-Z0-9_]{0,12}",
        value in "[ -~]{0,24}",
    ) {
        let flag = format!("{}:{}", name, value);
        let params = parse_parameter_flags(&[flag]).unwrap();

        prop_assert_eq!(params.len(), 1);
        prop_assert_eq!(params.get(&name), Some(&Value::String(value)));
    }

    /// Property: flags without a colon are rejected
    #[test]
    fn prop_flag_without_colon_is_rejected(flag in "[a-zA-Z0-9_=]{1,16}") {
        let result = parse_parameter_flags(&[flag]);
        let rejected = matches!(result, Err(CliError::InvalidArgument { .. }));
        prop_assert!(rejected);
    }

    /// Property: one entry per distinct name, the last flag winning
    #[test]
    fn prop_last_flag_wins(
        flags in prop::collection::vec(("[a-c]", "[a-z0-9]{0,6}"), 1..8),
    ) {
        let raw: Vec<String> = flags.iter().map(|(n, v)| format!("{}:{}", n, v)).collect();
        let params = parse_parameter_flags(&raw).unwrap();

        for (name, _) in &flags {
            let last = flags.iter().rev().find(|(n, _)| n == name).map(|(_, v)| v.clone());
            let expected = last.map(Value::String);
            prop_assert_eq!(params.get(name), expected.as_ref());
        }
    }
}
