//! Capability orchestration.
//!
//! One method per capability: validate inputs (failures never touch the
//! engine), acquire a concurrency permit, run the extractor under the
//! effective deadline, format the report, classify the failure. Work beyond
//! the concurrency limit queues on the semaphore rather than being
//! rejected; the queue wait counts against the deadline, so the configured
//! timeout bounds total wait for a result.

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use cilspect_engine::{DecompilerEngine, EngineSettings};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::deadline::DeadlineCoordinator;
use crate::error::{InspectError, InspectResult};
use crate::extract::MetadataExtractor;
use crate::model::{AssemblyHandle, TypeName};
use crate::report;

const DEFAULT_MAX_DECOMPILED_BYTES: usize = 1_048_576;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_CONCURRENT: usize = 10;

/// Read-only service configuration, owned by the embedder and shared by
/// every call. Nothing here is mutable after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Decompiled source beyond this many bytes is clipped with a marker
    /// line. Metadata reports are never clipped.
    pub max_decompiled_bytes: usize,
    /// Default per-operation deadline.
    pub default_timeout: Duration,
    /// Extraction operations running at once; excess work queues.
    pub max_concurrent: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_decompiled_bytes: DEFAULT_MAX_DECOMPILED_BYTES,
            default_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }
}

/// Orchestrator for the eight capabilities.
pub struct AssemblyInspector<E> {
    extractor: MetadataExtractor<E>,
    deadline: DeadlineCoordinator,
    limiter: Arc<Semaphore>,
    max_decompiled_bytes: usize,
}

impl<E: DecompilerEngine> AssemblyInspector<E> {
    #[must_use]
    pub fn new(engine: E, config: &ServiceConfig) -> Self {
        Self::with_settings(Arc::new(engine), EngineSettings::default(), config)
    }

    #[must_use]
    pub fn with_settings(
        engine: Arc<E>,
        settings: EngineSettings,
        config: &ServiceConfig,
    ) -> Self {
        Self {
            extractor: MetadataExtractor::new(engine, settings),
            deadline: DeadlineCoordinator::new(config.default_timeout),
            limiter: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
            max_decompiled_bytes: config.max_decompiled_bytes,
        }
    }

    /// Decompiles a whole type and returns its source text.
    ///
    /// # Errors
    /// One taxonomy kind: `InvalidInput`, `AssemblyLoadFailed`,
    /// `TypeNotFound`, `Timeout`, `Cancelled`, or `Internal`.
    pub async fn decompile_type(
        &self,
        assembly_path: &str,
        type_name: &str,
        cancel: &CancellationToken,
    ) -> InspectResult<String> {
        let handle = AssemblyHandle::create(assembly_path)?;
        let name = TypeName::create(type_name)?;
        info!(assembly = %handle.file_name(), type_name, "decompiling type");

        let decompiled = self
            .bounded(cancel, self.extractor.decompile_type(&handle, &name, cancel))
            .await
            .map_err(|err| note_failure("decompile_type", err))?;
        Ok(self.clip_source(decompiled.source))
    }

    /// Decompiles every overload of one method.
    ///
    /// # Errors
    /// As `decompile_type`, plus `MethodNotFound`.
    pub async fn decompile_method(
        &self,
        assembly_path: &str,
        type_name: &str,
        method_name: &str,
        cancel: &CancellationToken,
    ) -> InspectResult<String> {
        let handle = AssemblyHandle::create(assembly_path)?;
        let name = TypeName::create(type_name)?;
        info!(assembly = %handle.file_name(), type_name, method_name, "decompiling method");

        let source = self
            .bounded(
                cancel,
                self.extractor
                    .decompile_method(&handle, &name, method_name, cancel),
            )
            .await
            .map_err(|err| note_failure("decompile_method", err))?;
        Ok(self.clip_source(source))
    }

    /// Lists types defined in the assembly, sorted ascending by full name.
    ///
    /// # Errors
    /// One taxonomy kind, as `decompile_type` (minus `TypeNotFound`).
    pub async fn list_types(
        &self,
        assembly_path: &str,
        namespace_filter: Option<&str>,
        cancel: &CancellationToken,
    ) -> InspectResult<String> {
        let handle = AssemblyHandle::create(assembly_path)?;
        info!(
            assembly = %handle.file_name(),
            filter = namespace_filter.unwrap_or("none"),
            "listing types"
        );

        let types = self
            .bounded(
                cancel,
                self.extractor.list_types(&handle, namespace_filter, cancel),
            )
            .await
            .map_err(|err| note_failure("list_types", err))?;
        Ok(report::type_listing(handle.file_name(), &types))
    }

    /// Builds the capped assembly preview report.
    ///
    /// # Errors
    /// One taxonomy kind, as `list_types`.
    pub async fn analyze_assembly(
        &self,
        assembly_path: &str,
        cancel: &CancellationToken,
    ) -> InspectResult<String> {
        let handle = AssemblyHandle::create(assembly_path)?;
        info!(assembly = %handle.file_name(), "analyzing assembly");

        let summary = self
            .bounded(cancel, self.extractor.assembly_summary(&handle, cancel))
            .await
            .map_err(|err| note_failure("analyze_assembly", err))?;
        Ok(report::assembly_summary(&summary))
    }

    /// Reports a type's methods, properties, fields, and events.
    ///
    /// # Errors
    /// One taxonomy kind, as `decompile_type`.
    pub async fn get_type_members(
        &self,
        assembly_path: &str,
        type_name: &str,
        cancel: &CancellationToken,
    ) -> InspectResult<String> {
        let handle = AssemblyHandle::create(assembly_path)?;
        let name = TypeName::create(type_name)?;
        info!(assembly = %handle.file_name(), type_name, "getting type members");

        let descriptor = self
            .bounded(cancel, self.extractor.type_descriptor(&handle, &name, cancel))
            .await
            .map_err(|err| note_failure("get_type_members", err))?;
        Ok(report::type_members(&descriptor, handle.file_name()))
    }

    /// Reports a type's base types and implemented interfaces.
    ///
    /// # Errors
    /// One taxonomy kind, as `decompile_type`.
    pub async fn find_type_hierarchy(
        &self,
        assembly_path: &str,
        type_name: &str,
        cancel: &CancellationToken,
    ) -> InspectResult<String> {
        let handle = AssemblyHandle::create(assembly_path)?;
        let name = TypeName::create(type_name)?;
        info!(assembly = %handle.file_name(), type_name, "finding type hierarchy");

        let descriptor = self
            .bounded(cancel, self.extractor.type_descriptor(&handle, &name, cancel))
            .await
            .map_err(|err| note_failure("find_type_hierarchy", err))?;
        Ok(report::type_hierarchy(&descriptor))
    }

    /// Searches member names and reports matches grouped by declaring type.
    ///
    /// # Errors
    /// One taxonomy kind, as `list_types`.
    pub async fn search_members(
        &self,
        assembly_path: &str,
        search_term: &str,
        member_kind: Option<&str>,
        cancel: &CancellationToken,
    ) -> InspectResult<String> {
        let handle = AssemblyHandle::create(assembly_path)?;
        info!(
            assembly = %handle.file_name(),
            search_term,
            kind = member_kind.unwrap_or("any"),
            "searching members"
        );

        let results = self
            .bounded(
                cancel,
                self.extractor
                    .search_members(&handle, search_term, member_kind, cancel),
            )
            .await
            .map_err(|err| note_failure("search_members", err))?;
        Ok(report::member_search(
            search_term,
            handle.file_name(),
            &results,
        ))
    }

    /// Reports extension methods applicable to the target type, grouped by
    /// method name.
    ///
    /// # Errors
    /// One taxonomy kind, as `list_types`.
    pub async fn find_extension_methods(
        &self,
        assembly_path: &str,
        target_type_name: &str,
        cancel: &CancellationToken,
    ) -> InspectResult<String> {
        let handle = AssemblyHandle::create(assembly_path)?;
        let target = TypeName::create(target_type_name)?;
        info!(
            assembly = %handle.file_name(),
            target = target_type_name,
            "finding extension methods"
        );

        let methods = self
            .bounded(
                cancel,
                self.extractor
                    .find_extension_methods(&handle, &target, cancel),
            )
            .await
            .map_err(|err| note_failure("find_extension_methods", err))?;
        Ok(report::extension_methods(
            target_type_name,
            handle.file_name(),
            &methods,
        ))
    }

    async fn bounded<T>(
        &self,
        cancel: &CancellationToken,
        work: impl Future<Output = InspectResult<T>> + Send,
    ) -> InspectResult<T> {
        self.deadline
            .run(cancel, async {
                let _permit = self.limiter.acquire().await.map_err(|_| {
                    InspectError::Internal("operation limiter closed".to_string())
                })?;
                work.await
            })
            .await
    }

    fn clip_source(&self, source: String) -> String {
        if source.len() <= self.max_decompiled_bytes {
            return source;
        }
        let mut cut = self.max_decompiled_bytes;
        while cut > 0 && !source.is_char_boundary(cut) {
            cut -= 1;
        }
        let mut clipped = source[..cut].to_string();
        if !clipped.ends_with('\n') {
            clipped.push('\n');
        }
        let _ = writeln!(
            clipped,
            "// [truncated: output exceeded {} bytes]",
            self.max_decompiled_bytes
        );
        clipped
    }
}

fn note_failure(operation: &'static str, err: InspectError) -> InspectError {
    match &err {
        InspectError::Cancelled => warn!(operation, "operation cancelled"),
        InspectError::Timeout { seconds } => warn!(operation, seconds, "operation timed out"),
        InspectError::AssemblyLoadFailed { path, source } => {
            error!(operation, path = %path, cause = %source, "assembly load failed");
        }
        InspectError::Internal(message) => error!(operation, message = %message, "internal error"),
        InspectError::InvalidInput(_)
        | InspectError::TypeNotFound { .. }
        | InspectError::MethodNotFound { .. } => {}
    }
    err
}
