//! WASM bindings for the hexmap-core library.
//!
//! All functions exposed to JavaScript via wasm-bindgen are defined here.
//! Every export returns a JSON string; failures are carried in its `error` field.

use wasm_bindgen::prelude::*;

use crate::output::MapOutput;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = error)]
    pub fn console_error(s: &str);
}

fn run(input: &str, config: Option<&str>) -> String {
    let output = match crate::compute(input, config) {
        Ok(output) => output,
        Err(e) => {
            report_error(&format!("Error computing layout: {}", e));
            MapOutput::from_error(e.to_string())
        }
    };
    serde_json::to_string(&output).unwrap_or_else(|e| {
        report_error(&format!("Error serializing layout: {}", e));
        "{\"error\": {\"message\": \"Serialization error\"}}".to_string()
    })
}

fn report_error(message: &str) {
    log::error!("{}", message);
    #[cfg(target_arch = "wasm32")]
    console_error(message);
}

/// Lay out a cluster data file with its embedded (or default) config.
#[wasm_bindgen]
pub fn compute_layout(input: &str) -> String {
    run(input, None)
}

/// Lay out a cluster data file with an explicit config JSON object.
#[wasm_bindgen]
pub fn compute_layout_with_config(input: &str, config: &str) -> String {
    run(input, Some(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_malformed_input_reports_error() {
        let out: Value = serde_json::from_str(&compute_layout("not json")).unwrap();
        assert!(out["error"]["message"].as_str().unwrap().starts_with("Invalid map data"));
        assert_eq!(out["clusters"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_malformed_config_reports_config_error() {
        let input = r#"{"clusters": []}"#;
        let out: Value = serde_json::from_str(&compute_layout_with_config(input, "{oops")).unwrap();
        assert!(out["error"]["message"].as_str().unwrap().starts_with("Invalid layout config"));
    }

    #[test]
    fn test_layout_with_config() {
        let input = r#"{"clusters": [{"id": "c", "name": "C", "applications": [{"id": "a", "name": "A"}]}]}"#;
        let out: Value = serde_json::from_str(&compute_layout_with_config(input, r#"{"width": 200, "height": 100}"#)).unwrap();
        assert!(out.get("error").is_none());
        let hex = &out["clusters"][0]["hexagons"][0];
        assert_eq!(hex["x"], 100.0);
        assert_eq!(hex["y"], 50.0);
    }
}
