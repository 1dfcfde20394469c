// MCP tool conversions.
//
// Tool input schemas are generated from the registry's parameter lists so the
// advertised surface and the validation rules cannot drift apart.

use std::sync::Arc;

use rmcp::model::{CallToolResult, Content, JsonObject, Tool};
use serde_json::{Value, json};

use kobs::core::registry::ToolDescriptor;
use kobs::error::Result;

use super::format::format_error;

/// JSON Schema object for a tool's parameters.
pub fn input_schema(descriptor: &ToolDescriptor) -> JsonObject {
    let mut properties = serde_json::Map::new();
    for param in descriptor.params {
        let mut prop = json!({
            "type": param.kind,
            "description": param.description,
        });
        if let (Some(default), Some(obj)) = (param.default, prop.as_object_mut()) {
            obj.insert("default".into(), Value::from(default));
        }
        properties.insert(param.name.to_string(), prop);
    }

    let mut schema = JsonObject::new();
    schema.insert("type".into(), Value::from("object"));
    schema.insert("properties".into(), Value::Object(properties));

    let required: Vec<Value> = descriptor.required().map(|p| Value::from(p.name)).collect();
    if !required.is_empty() {
        schema.insert("required".into(), Value::Array(required));
    }
    schema
}

/// Convert a registry descriptor into an advertised MCP tool.
pub fn to_tool(descriptor: &ToolDescriptor) -> Tool {
    Tool::new(
        descriptor.name,
        descriptor.description,
        Arc::new(input_schema(descriptor)),
    )
}

/// Wrap a tool outcome. Failures are flagged `is_error` and carry the error
/// document both as text and as structured content.
pub fn call_result(name: &str, outcome: Result<String>) -> CallToolResult {
    match outcome {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(e) => {
            tracing::warn!(tool = name, error = %e, kind = e.kind(), "call_tool failed");
            let mut result = CallToolResult::error(vec![Content::text(format_error(&e))]);
            result.structured_content = Some(e.payload());
            result
        }
    }
}
