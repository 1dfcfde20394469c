// MCP resource conversions.
//
// Every `k8s://` resource is a parameterless kubectl query; its JSON output is
// handed back as the resource text.

use rmcp::model::{AnnotateAble, RawResource, ReadResourceResult, Resource, ResourceContents};

use kobs::core::registry::ResourceDescriptor;
use kobs::error::Result;

use super::format::format_error;

const JSON: &str = "application/json";

/// Convert a registry descriptor into an advertised MCP resource.
pub fn to_resource(descriptor: &ResourceDescriptor) -> Resource {
    let mut raw = RawResource::new(descriptor.uri, descriptor.name);
    raw.description = Some(descriptor.description.to_string());
    raw.mime_type = Some(descriptor.mime_type.to_string());
    raw.no_annotation()
}

/// Wrap a read outcome. Failures become a JSON error document, not a fault.
pub fn read_result(uri: &str, outcome: Result<String>) -> ReadResourceResult {
    let text = match outcome {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(uri, error = %e, kind = e.kind(), "read_resource failed");
            format_error(&e)
        }
    };
    ReadResourceResult {
        contents: vec![ResourceContents::TextResourceContents {
            uri: uri.to_string(),
            mime_type: Some(JSON.to_string()),
            text,
            meta: None,
        }],
    }
}

#[cfg(test)]
mod tests {
    use kobs::core::registry::Registry;
    use kobs::error::KobsError;

    use super::*;

    fn text_of(result: &ReadResourceResult) -> &str {
        match &result.contents[0] {
            ResourceContents::TextResourceContents { text, .. } => text,
            other => panic!("expected text contents, got {other:?}"),
        }
    }

    #[test]
    fn descriptor_fields_carry_over() {
        let entry = Registry::kubernetes().resource("k8s://events").unwrap();
        let resource = to_resource(&entry.descriptor);
        assert_eq!(resource.raw.uri, "k8s://events");
        assert_eq!(resource.raw.name, "Kubernetes Events");
        assert_eq!(resource.raw.mime_type.as_deref(), Some("application/json"));
    }

    #[test]
    fn success_passes_output_through() {
        let result = read_result("k8s://nodes", Ok(r#"{"items":[]}"#.into()));
        assert_eq!(text_of(&result), r#"{"items":[]}"#);
    }

    #[test]
    fn unknown_uri_becomes_error_document() {
        let result = read_result(
            "k8s://secrets",
            Err(KobsError::UnknownResource("k8s://secrets".into())),
        );
        let doc: serde_json::Value = serde_json::from_str(text_of(&result)).unwrap();
        assert_eq!(doc["error"], "unknown_resource");
    }
}
