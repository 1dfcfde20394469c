//! MCP server handler.
//!
//! Manual `ServerHandler` impl: the resource and tool surface comes from the
//! dispatcher's static registry rather than from `#[tool]` attributes.

use std::sync::Arc;

use rmcp::ErrorData as McpError;
use rmcp::model::{
    CallToolRequestParams, CallToolResult, Implementation, ListResourcesResult, ListToolsResult,
    PaginatedRequestParams, ProtocolVersion, ReadResourceRequestParams, ReadResourceResult,
    ServerCapabilities, ServerInfo,
};
use rmcp::service::{RequestContext, RoleServer};

use kobs::core::dispatcher::Dispatcher;

use super::{resources, tools};

/// The kobs MCP server handler.
#[derive(Clone)]
pub struct KobsServer {
    dispatcher: Arc<Dispatcher>,
}

impl KobsServer {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// Read a resource; always produces a result document.
    pub async fn read(&self, uri: &str) -> ReadResourceResult {
        resources::read_result(uri, self.dispatcher.read_resource(uri).await)
    }

    /// Call a tool; always produces a result, flagged `is_error` on failure.
    pub async fn call(&self, name: &str, arguments: &serde_json::Map<String, serde_json::Value>) -> CallToolResult {
        tools::call_result(name, self.dispatcher.call_tool(name, arguments).await)
    }
}

impl rmcp::ServerHandler for KobsServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Read-only Kubernetes observability backed by kubectl.\n\n\
                 Resources: k8s://pods, k8s://services, k8s://nodes, k8s://events, \
                 k8s://deployments (kubectl JSON output).\n\n\
                 Tools: cluster_health_check, check_pod_status, \
                 analyze_service_connectivity, get_pod_logs.\n\n\
                 Errors come back as JSON documents with an \"error\" kind and \"message\"."
                    .to_string(),
            ),
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        let resources = self
            .dispatcher
            .list_resources()
            .into_iter()
            .map(resources::to_resource)
            .collect();
        Ok(ListResourcesResult {
            resources,
            next_cursor: None,
            meta: None,
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        Ok(self.read(&request.uri).await)
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        let tools = self
            .dispatcher
            .list_tools()
            .into_iter()
            .map(tools::to_tool)
            .collect();
        Ok(ListToolsResult {
            tools,
            meta: None,
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let arguments = request.arguments.unwrap_or_default();
        Ok(self.call(&request.name, &arguments).await)
    }

    fn get_tool(&self, name: &str) -> Option<rmcp::model::Tool> {
        self.dispatcher
            .list_tools()
            .into_iter()
            .find(|t| t.name == name)
            .map(tools::to_tool)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use rmcp::ServerHandler;
    use rmcp::model::{RawContent, ResourceContents};
    use serde_json::json;

    use kobs::config::types::KobsConfig;

    use super::*;

    fn server_with(kubectl: &Path) -> KobsServer {
        let mut cfg = KobsConfig::default();
        cfg.kubectl.binary = kubectl.to_path_buf();
        cfg.timeouts.tool_secs = 5;
        KobsServer::new(Dispatcher::from_config(&cfg))
    }

    #[test]
    fn advertises_tools_and_resources() {
        let info = server_with(Path::new("kubectl")).get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_some());
        assert!(info.capabilities.prompts.is_none());
        assert!(info.instructions.unwrap().contains("k8s://pods"));
    }

    #[test]
    fn get_tool_finds_registered_names() {
        let server = server_with(Path::new("kubectl"));
        assert!(server.get_tool("get_pod_logs").is_some());
        assert!(server.get_tool("exec_into_pod").is_none());
    }

    #[tokio::test]
    async fn unknown_resource_is_answered_not_faulted() {
        let result = server_with(Path::new("kubectl")).read("k8s://configmaps").await;
        let ResourceContents::TextResourceContents { text, .. } = &result.contents[0] else {
            panic!("expected text contents");
        };
        let doc: serde_json::Value = serde_json::from_str(text).unwrap();
        assert_eq!(doc["error"], "unknown_resource");
        assert_eq!(doc["uri"], "k8s://configmaps");
    }

    #[tokio::test]
    async fn missing_binary_is_flagged_tool_error() {
        let dir = tempfile::tempdir().unwrap();
        let server = server_with(&dir.path().join("kubectl"));
        let result = server.call("cluster_health_check", &serde_json::Map::new()).await;
        assert_eq!(result.is_error, Some(true));
        let structured = result.structured_content.unwrap();
        assert_eq!(structured["error"], "upstream_failure");
    }

    #[tokio::test]
    async fn missing_parameters_are_flagged_tool_error() {
        let server = server_with(Path::new("kubectl"));
        let result = server.call("get_pod_logs", &serde_json::Map::new()).await;
        assert_eq!(result.is_error, Some(true));
        let RawContent::Text(text) = &result.content[0].raw else {
            panic!("expected text content");
        };
        assert!(text.text.contains("pod_name"));
        assert!(text.text.contains("namespace"));
        assert_eq!(
            result.structured_content.unwrap()["missing"],
            json!(["pod_name", "namespace"])
        );
    }
}
