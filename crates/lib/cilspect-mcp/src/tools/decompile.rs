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

/// Parameters for decompiling a whole type.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct DecompileTypeParams {
    /// Path to the .NET assembly file (.dll or .exe).
    pub assembly_path: String,
    /// Full name of the type to decompile (e.g. `System.String`).
    pub type_name: String,
    /// Advisory hint about what the caller is looking for; not interpreted.
    pub query: Option<String>,
}

/// Parameters for decompiling one method.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct DecompileMethodParams {
    /// Path to the .NET assembly file (.dll or .exe).
    pub assembly_path: String,
    /// Full name of the type declaring the method.
    pub type_name: String,
    /// Exact method name; every overload is returned.
    pub method_name: String,
    /// Advisory hint about what the caller is looking for; not interpreted.
    pub query: Option<String>,
}

#[tool_router(router = tool_router_decompile, vis = "pub")]
impl<E: DecompilerEngine> CilspectMcp<E> {
    #[tool(
        description = "Decompile a class/interface/struct to source when you need to interact with a library type but don't know its structure. Shows methods, properties, and constructors as compilable source."
    )]
    async fn decompile_type(
        &self,
        Parameters(params): Parameters<DecompileTypeParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let source = self
            .inspector()
            .decompile_type(&params.assembly_path, &params.type_name, &context.ct)
            .await
            .map_err(|err| helpers::tool_error(&err))?;
        Ok(CallToolResult::success(vec![Content::text(source)]))
    }

    #[tool(
        description = "Decompile a single method when you need one implementation rather than the whole type. Returns every overload, each prefixed with a parameter-count header."
    )]
    async fn decompile_method(
        &self,
        Parameters(params): Parameters<DecompileMethodParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let source = self
            .inspector()
            .decompile_method(
                &params.assembly_path,
                &params.type_name,
                &params.method_name,
                &context.ct,
            )
            .await
            .map_err(|err| helpers::tool_error(&err))?;
        Ok(CallToolResult::success(vec![Content::text(source)]))
    }
}
