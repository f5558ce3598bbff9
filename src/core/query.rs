use crate::utils::error::{MpError, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// Runs a JMESPath expression against `data`. A miss yields `Value::Null`.
pub fn search(expression: &str, data: &Value) -> Result<Value> {
    let query_error = |message: String| MpError::QueryError {
        expression: expression.to_string(),
        message,
    };

    let compiled = jmespath::compile(expression).map_err(|e| query_error(e.to_string()))?;
    let found = compiled
        .search(data)
        .map_err(|e| query_error(e.to_string()))?;

    Ok(serde_json::to_value(&*found)?)
}

/// Applies an optional user query, passing the document through untouched
/// when there is none.
pub fn filter(expression: Option<&str>, data: Value) -> Result<Value> {
    match expression {
        Some(expression) => search(expression, &data),
        None => Ok(data),
    }
}

/// Quotes `value` as a JMESPath JSON literal, so backslashes and quotes in
/// user input compare verbatim.
pub fn json_literal(value: &str) -> String {
    let encoded = Value::from(value).to_string();
    format!("`{}`", encoded.replace('`', "\\`"))
}

pub fn render(value: &Value, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => {
            let text = serde_yaml::to_string(value)?;
            Ok(text.trim_end().to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product() -> Value {
        json!({
            "Versions": [
                {"VersionTitle": "Product 1.2.3", "DeliveryOptions": [{"Id": "4321", "Type": "Helm"}]},
                {"VersionTitle": "Product 1.2.4", "DeliveryOptions": [{"Id": "9876", "Type": "Helm"}]}
            ]
        })
    }

    #[test]
    fn test_search_filters_versions() {
        let found = search("Versions[].VersionTitle", &product()).unwrap();
        assert_eq!(found, json!(["Product 1.2.3", "Product 1.2.4"]));
    }

    #[test]
    fn test_search_miss_is_null() {
        let found = search("Versions[?VersionTitle=='nope'] | [0].Id", &product()).unwrap();
        assert!(found.is_null());
    }

    #[test]
    fn test_invalid_expression_is_query_error() {
        let err = search("Versions[?", &product()).unwrap_err();
        assert!(matches!(err, MpError::QueryError { .. }));
    }

    #[test]
    fn test_filter_without_expression_passes_through() {
        assert_eq!(filter(None, product()).unwrap(), product());
    }

    #[test]
    fn test_json_literal_quotes_strings() {
        assert_eq!(json_literal("ami-1"), r#"`"ami-1"`"#);
        assert_eq!(json_literal("it's"), r#"`"it's"`"#);
    }

    #[test]
    fn test_json_literal_matches_awkward_titles() {
        for title in ["it's", "ends\\", r"mid\'q", "tick`ed", r"back\`tick", "say \"hi\""] {
            let data = json!([{"Title": "other"}, {"Title": title}]);
            let expression = format!("[?Title=={}] | [0].Title", json_literal(title));
            assert_eq!(search(&expression, &data).unwrap(), json!(title), "title {:?}", title);
        }
    }

    #[test]
    fn test_render_formats() {
        let value = json!({"ChangeSetId": "12345"});
        let text = render(&value, OutputFormat::Json).unwrap();
        assert_eq!(serde_json::from_str::<Value>(&text).unwrap(), value);

        let text = render(&value, OutputFormat::Yaml).unwrap();
        assert!(text.starts_with("ChangeSetId:"));
        assert_eq!(serde_yaml::from_str::<Value>(&text).unwrap(), value);
    }
}
