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

/// Parameters for listing the types defined in an assembly.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ListAssemblyTypesParams {
    /// Path to the .NET assembly file (.dll or .exe).
    pub assembly_path: String,
    /// Case-insensitive namespace substring to keep (e.g. 'Collections').
    pub namespace_filter: Option<String>,
}

/// Parameters for the assembly overview.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct AnalyzeAssemblyParams {
    /// Path to the .NET assembly file (.dll or .exe).
    pub assembly_path: String,
    /// Advisory hint about what the caller is looking for; not interpreted.
    pub query: Option<String>,
}

/// Parameters for listing one type's members.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetTypeMembersParams {
    /// Path to the .NET assembly file (.dll or .exe).
    pub assembly_path: String,
    /// Full name of the type to inspect.
    pub type_name: String,
}

/// Parameters for the base-type/interface report.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct FindTypeHierarchyParams {
    /// Path to the .NET assembly file (.dll or .exe).
    pub assembly_path: String,
    /// Full name of the type to inspect.
    pub type_name: String,
}

#[tool_router(router = tool_router_inspect, vis = "pub")]
impl<E: DecompilerEngine> CilspectMcp<E> {
    #[tool(
        description = "List every type defined in an assembly, sorted by full name and tagged with its kind. Pass namespace_filter to narrow by a case-insensitive namespace substring."
    )]
    async fn list_assembly_types(
        &self,
        Parameters(params): Parameters<ListAssemblyTypesParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let report = self
            .inspector()
            .list_types(
                &params.assembly_path,
                params.namespace_filter.as_deref(),
                &context.ct,
            )
            .await
            .map_err(|err| helpers::tool_error(&err))?;
        Ok(CallToolResult::success(vec![Content::text(report)]))
    }

    #[tool(
        description = "Get a quick overview of an unfamiliar assembly: total type count, namespace histogram, and a capped listing of public types. Use this first to orient yourself."
    )]
    async fn analyze_assembly(
        &self,
        Parameters(params): Parameters<AnalyzeAssemblyParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let report = self
            .inspector()
            .analyze_assembly(&params.assembly_path, &context.ct)
            .await
            .map_err(|err| helpers::tool_error(&err))?;
        Ok(CallToolResult::success(vec![Content::text(report)]))
    }

    #[tool(
        description = "Show a type's complete API surface (method signatures, properties, fields, events) without implementation details. Faster than decompile_type when you just need to know what you can call."
    )]
    async fn get_type_members(
        &self,
        Parameters(params): Parameters<GetTypeMembersParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let report = self
            .inspector()
            .get_type_members(&params.assembly_path, &params.type_name, &context.ct)
            .await
            .map_err(|err| helpers::tool_error(&err))?;
        Ok(CallToolResult::success(vec![Content::text(report)]))
    }

    #[tool(
        description = "Show what a type inherits from and which interfaces it implements. Useful for understanding polymorphism and where shared behavior lives."
    )]
    async fn find_type_hierarchy(
        &self,
        Parameters(params): Parameters<FindTypeHierarchyParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let report = self
            .inspector()
            .find_type_hierarchy(&params.assembly_path, &params.type_name, &context.ct)
            .await
            .map_err(|err| helpers::tool_error(&err))?;
        Ok(CallToolResult::success(vec![Content::text(report)]))
    }
}
