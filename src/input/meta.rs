use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{RenderError, RenderResult};

/// SigMF global metadata. Only the fields the renderer needs are typed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigMfGlobal {
    #[serde(rename = "core:datatype")]
    pub datatype: String,

    #[serde(rename = "core:sample_rate")]
    pub sample_rate: f64,

    #[serde(flatten)]
    pub extensions: HashMap<String, serde_json::Value>,
}

/// A capture segment; a new segment marks a change in recording parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigMfCapture {
    #[serde(rename = "core:sample_start")]
    pub sample_start: u64,

    /// Center frequency in Hz
    #[serde(rename = "core:frequency", skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f64>,

    #[serde(flatten)]
    pub extensions: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigMfAnnotation {
    #[serde(rename = "core:sample_start")]
    pub sample_start: u64,

    #[serde(rename = "core:sample_count")]
    pub sample_count: u64,

    #[serde(rename = "core:freq_lower_edge", skip_serializing_if = "Option::is_none")]
    pub freq_lower_edge: Option<f64>,

    #[serde(rename = "core:freq_upper_edge", skip_serializing_if = "Option::is_none")]
    pub freq_upper_edge: Option<f64>,

    #[serde(rename = "core:label", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(rename = "core:comment", skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    #[serde(flatten)]
    pub extensions: HashMap<String, serde_json::Value>,
}

/// A decoded `.sigmf-meta` document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigMfMeta {
    pub global: SigMfGlobal,

    pub captures: Vec<SigMfCapture>,

    #[serde(default)]
    pub annotations: Vec<SigMfAnnotation>,
}

impl SigMfMeta {
    pub fn from_json(json: &str) -> RenderResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> RenderResult<Self> {
        let mut json = String::new();
        BufReader::new(File::open(path)?).read_to_string(&mut json)?;
        Self::from_json(&json)
    }

    /// The first capture segment; its frequency is the reference for the whole render.
    pub fn first_capture(&self) -> RenderResult<&SigMfCapture> {
        self.captures.first().ok_or(RenderError::MissingCaptures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const META: &str = r#"{
        "global": {
            "core:datatype": "cf32_le",
            "core:sample_rate": 2000000,
            "core:version": "1.0.0"
        },
        "captures": [
            { "core:sample_start": 0, "core:frequency": 915000000 },
            { "core:sample_start": 4096, "core:frequency": 916000000, "core:datetime": "2024-01-01T00:00:00Z" }
        ],
        "annotations": [
            {
                "core:sample_start": 100,
                "core:sample_count": 200,
                "core:freq_lower_edge": 914500000,
                "core:freq_upper_edge": 915500000,
                "core:label": "burst"
            }
        ]
    }"#;

    #[test]
    fn decodes_core_fields() {
        let meta = SigMfMeta::from_json(META).unwrap();
        assert_eq!(meta.global.datatype, "cf32_le");
        assert_eq!(meta.global.sample_rate, 2_000_000.0);
        assert_eq!(meta.captures.len(), 2);
        assert_eq!(meta.captures[1].sample_start, 4096);
        assert_eq!(meta.first_capture().unwrap().frequency, Some(915_000_000.0));

        let ann = &meta.annotations[0];
        assert_eq!(ann.sample_count, 200);
        assert_eq!(ann.freq_upper_edge, Some(915_500_000.0));
        assert_eq!(ann.label.as_deref(), Some("burst"));
    }

    #[test]
    fn unknown_keys_are_kept_as_extensions() {
        let meta = SigMfMeta::from_json(META).unwrap();
        assert!(meta.global.extensions.contains_key("core:version"));
        assert!(meta.captures[1].extensions.contains_key("core:datetime"));
    }

    #[test]
    fn annotations_default_to_empty() {
        let meta = SigMfMeta::from_json(
            r#"{"global": {"core:datatype": "ci16_le", "core:sample_rate": 1e6},
                "captures": [{"core:sample_start": 0}]}"#,
        )
        .unwrap();
        assert!(meta.annotations.is_empty());
        assert_eq!(meta.captures[0].frequency, None);
    }

    #[test]
    fn empty_captures_are_reported() {
        let meta = SigMfMeta::from_json(
            r#"{"global": {"core:datatype": "cf32_le", "core:sample_rate": 1e6}, "captures": []}"#,
        )
        .unwrap();
        assert!(matches!(meta.first_capture(), Err(RenderError::MissingCaptures)));
    }

    #[test]
    fn malformed_json_is_a_metadata_error() {
        assert!(matches!(
            SigMfMeta::from_json("{\"global\": {}}"),
            Err(RenderError::Metadata(_))
        ));
    }
}
