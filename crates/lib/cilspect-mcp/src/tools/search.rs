use cilspect_engine::DecompilerEngine;
use rmcp::model::{CallToolResult, Content};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};

use crate::CilspectMcp;
use crate::helpers;

/// Parameters for searching members by name.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SearchMembersByNameParams {
    /// Path to the .NET assembly file (.dll or .exe).
    pub assembly_path: String,
    /// Case-insensitive substring to match against member names.
    pub search_term: String,
    /// Restrict to one kind: method, property, field, or event.
    pub member_kind: Option<String>,
}

/// Parameters for finding extension methods for a target type.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct FindExtensionMethodsParams {
    /// Path to the .NET assembly file (.dll or .exe).
    pub assembly_path: String,
    /// Full name of the extended type; open generics match closed ones.
    pub target_type_name: String,
}

#[tool_router(router = tool_router_search, vis = "pub")]
impl<E: DecompilerEngine> CilspectMcp<E> {
    #[tool(
        description = "Search public types for members whose name contains a substring (case-insensitive), grouped by declaring type. Narrow with member_kind when you know what you are looking for."
    )]
    async fn search_members_by_name(
        &self,
        Parameters(params): Parameters<SearchMembersByNameParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let report = self
            .inspector()
            .search_members(
                &params.assembly_path,
                &params.search_term,
                params.member_kind.as_deref(),
                &context.ct,
            )
            .await
            .map_err(|err| helpers::tool_error(&err))?;
        Ok(CallToolResult::success(vec![Content::text(report)]))
    }

    #[tool(
        description = "Find extension methods that apply to a target type, grouped by method name. Extension methods live in static classes, so they are easy to miss when reading the target type itself."
    )]
    async fn find_extension_methods(
        &self,
        Parameters(params): Parameters<FindExtensionMethodsParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let report = self
            .inspector()
            .find_extension_methods(
                &params.assembly_path,
                &params.target_type_name,
                &context.ct,
            )
            .await
            .map_err(|err| helpers::tool_error(&err))?;
        Ok(CallToolResult::success(vec![Content::text(report)]))
    }
}
