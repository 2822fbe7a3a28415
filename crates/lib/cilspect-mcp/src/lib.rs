//! MCP server implementation for cilspect.
//!
//! This crate wires the assembly inspector into rmcp tool handlers and
//! exposes the MCP-facing surface: eight introspection tools over compiled
//! .NET assemblies, plus stdio and streamable-HTTP server runners. The
//! decompiler engine is a type parameter; any `DecompilerEngine`
//! implementation plugs in.

mod helpers;
mod tools;
pub mod server;

use std::sync::Arc;

use cilspect_core::inspect::{AssemblyInspector, ServiceConfig};
use cilspect_engine::DecompilerEngine;
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use rmcp::{
    ErrorData,
    ServerHandler,
    handler::server::tool::ToolRouter,
    tool,
    tool_handler,
    tool_router,
};

const SERVER_INSTRUCTIONS: &str = r"cilspect provides MCP tools for inspecting and decompiling compiled .NET assemblies.

Workflow:
1. Point any tool at an assembly on disk via `assembly_path` (a .dll or .exe).
2. Get oriented with `analyze_assembly` (namespace histogram plus a capped
   public-type preview) or `list_assembly_types` (full sorted listing, with an
   optional `namespace_filter` substring).
3. Inspect a specific type:
   - `get_type_members` shows the callable surface (methods, properties,
     fields, events) without implementation details.
   - `find_type_hierarchy` shows base types and implemented interfaces.
   - `decompile_type` recovers full source; `decompile_method` recovers one
     method (all overloads, each with a parameter-count header).
4. Search across the assembly:
   - `search_members_by_name` matches member names case-insensitively; pass
     `member_kind` (method, property, field, event) to narrow the search.
   - `find_extension_methods` lists extension methods applicable to a target
     type, including open-generic targets.

Notes:
- Type names are fully qualified (e.g. 'System.Collections.Generic.List`1').
- Failures carry a stable code in the error payload: INVALID_INPUT,
  ASSEMBLY_LOAD_FAILED, TYPE_NOT_FOUND, METHOD_NOT_FOUND, TIMEOUT, CANCELLED,
  or INTERNAL_ERROR.
- `health` returns `ok`.";

/// MCP server wrapper around the assembly inspector and tool routers.
pub struct CilspectMcp<E: DecompilerEngine> {
    tool_router: ToolRouter<Self>,
    inspector: Arc<AssemblyInspector<E>>,
}

impl<E: DecompilerEngine> Clone for CilspectMcp<E> {
    fn clone(&self) -> Self {
        Self {
            tool_router: self.tool_router.clone(),
            inspector: Arc::clone(&self.inspector),
        }
    }
}

impl<E: DecompilerEngine> CilspectMcp<E> {
    /// Creates a server owning a fresh inspector over `engine`.
    #[must_use]
    pub fn new(engine: E, config: &ServiceConfig) -> Self {
        Self::with_inspector(Arc::new(AssemblyInspector::new(engine, config)))
    }

    /// Creates a server sharing an existing inspector handle.
    #[must_use]
    pub fn with_inspector(inspector: Arc<AssemblyInspector<E>>) -> Self {
        let tool_router = Self::tool_router_core()
            + Self::tool_router_decompile()
            + Self::tool_router_inspect()
            + Self::tool_router_search();
        Self {
            tool_router,
            inspector,
        }
    }

    pub(crate) fn inspector(&self) -> &AssemblyInspector<E> {
        &self.inspector
    }
}

#[tool_router(router = tool_router_core, vis = "pub")]
impl<E: DecompilerEngine> CilspectMcp<E> {
    #[tool(description = "Health check. Returns 'ok'.")]
    async fn health(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::text("ok")]))
    }
}

#[tool_handler]
impl<E: DecompilerEngine> ServerHandler for CilspectMcp<E> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}
