use ezdatapipe_core::error::Error::VariableFormat;
use ezdatapipe_core::error::Result;
use std::collections::HashMap;

/// Parse template variables given in the format key=value.
///
/// Only the first `=` separates key and value, so values may contain `=`.
/// A later occurrence of the same key overrides an earlier one.
///
/// # Errors
///
/// Returns [`VariableFormat`] if an entry has no `=` or an empty key.
pub fn parse_variables(variables: &[String]) -> Result<HashMap<String, String>> {
    let mut parsed = HashMap::new();

    for variable in variables {
        let Some((key, value)) = variable.split_once('=') else {
            return Err(VariableFormat(variable.to_string()));
        };

        if key.is_empty() {
            return Err(VariableFormat(variable.to_string()));
        }

        parsed.insert(key.to_string(), value.to_string());
    }

    Ok(parsed)
}
