//! Metadata extraction against the decompiler engine.
//!
//! The extractor is the sole caller of the engine. Every operation loads a
//! fresh view (no engine state is shared between requests), runs on the
//! blocking pool because the engine call is not preemptible, and checks the
//! caller's cancellation token cooperatively at entry only — a cancellation
//! arriving mid-call is observed by the coordinator, not here.
//!
//! `TypeNotFound` and `MethodNotFound` propagate unwrapped; every other
//! engine fault is rewrapped into `AssemblyLoadFailed` with the path and
//! the underlying cause.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;

use cilspect_engine::models::NodeAccessibility;
use cilspect_engine::{DecompilerEngine, EngineSettings, LoadedAssembly};
use tokio_util::sync::CancellationToken;

use crate::error::{InspectError, InspectResult};
use crate::mapper;
use crate::model::{
    AssemblyHandle, AssemblySummary, DecompiledSource, MemberKind, MemberSearchResult,
    MethodDescriptor, TypeDescriptor, TypeName, GLOBAL_NAMESPACE,
};

/// Public types beyond this count are not included in a summary preview.
const PUBLIC_TYPE_CAP: usize = 100;

pub struct MetadataExtractor<E> {
    engine: Arc<E>,
    settings: EngineSettings,
}

impl<E: DecompilerEngine> MetadataExtractor<E> {
    #[must_use]
    pub const fn new(engine: Arc<E>, settings: EngineSettings) -> Self {
        Self { engine, settings }
    }

    /// Runs `query` against a freshly loaded view on the blocking pool.
    async fn run_query<T, F>(
        &self,
        handle: &AssemblyHandle,
        cancel: &CancellationToken,
        query: F,
    ) -> InspectResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&E::View) -> InspectResult<T> + Send + 'static,
    {
        if cancel.is_cancelled() {
            return Err(InspectError::Cancelled);
        }

        let engine = Arc::clone(&self.engine);
        let settings = self.settings.clone();
        let path = handle.path().to_path_buf();
        let display = handle.display_path();
        let joined = tokio::task::spawn_blocking(move || {
            let view = engine
                .load(&path, &settings)
                .map_err(|err| InspectError::load_failed(display, err))?;
            query(&view)
        })
        .await;

        joined.unwrap_or_else(|err| {
            Err(InspectError::Internal(format!(
                "extraction task failed: {err}"
            )))
        })
    }

    /// Resolves a type definition and maps it to a descriptor.
    ///
    /// # Errors
    /// `TypeNotFound` if the primary module has no such definition;
    /// `AssemblyLoadFailed` for any engine fault.
    pub async fn type_descriptor(
        &self,
        handle: &AssemblyHandle,
        type_name: &TypeName,
        cancel: &CancellationToken,
    ) -> InspectResult<TypeDescriptor> {
        let full = type_name.full_name().to_string();
        let assembly = handle.display_path();
        self.run_query(handle, cancel, move |view| {
            view.resolve_type(&full).map_or_else(
                || {
                    Err(InspectError::TypeNotFound {
                        type_name: full.clone(),
                        assembly,
                    })
                },
                |node| Ok(mapper::map_type(&node)),
            )
        })
        .await
    }

    /// Recovers the full source of a type, verbatim from the engine.
    ///
    /// # Errors
    /// `TypeNotFound` if the type is absent; `AssemblyLoadFailed` for any
    /// engine fault.
    pub async fn decompile_type(
        &self,
        handle: &AssemblyHandle,
        type_name: &TypeName,
        cancel: &CancellationToken,
    ) -> InspectResult<DecompiledSource> {
        let full = type_name.full_name().to_string();
        let assembly = handle.display_path();
        let file_name = handle.file_name().to_string();
        self.run_query(handle, cancel, move |view| {
            let Some(node) = view.resolve_type(&full) else {
                return Err(InspectError::TypeNotFound {
                    type_name: full,
                    assembly,
                });
            };
            let source = view
                .decompile_type(&node.full_name)
                .map_err(|err| InspectError::load_failed(assembly.clone(), err))?;
            Ok(DecompiledSource::new(source, full, file_name))
        })
        .await
    }

    /// Decompiles every overload of `method_name`, each prefixed with a
    /// parameter-count header, concatenated in engine enumeration order.
    ///
    /// The name match is exact and case-sensitive; there is no fuzzy match.
    ///
    /// # Errors
    /// `TypeNotFound` if the type is absent, `MethodNotFound` if no
    /// overload matches, `AssemblyLoadFailed` for any engine fault.
    pub async fn decompile_method(
        &self,
        handle: &AssemblyHandle,
        type_name: &TypeName,
        method_name: &str,
        cancel: &CancellationToken,
    ) -> InspectResult<String> {
        let full = type_name.full_name().to_string();
        let assembly = handle.display_path();
        let method = method_name.to_string();
        self.run_query(handle, cancel, move |view| {
            let Some(node) = view.resolve_type(&full) else {
                return Err(InspectError::TypeNotFound {
                    type_name: full,
                    assembly,
                });
            };

            let overloads: Vec<_> = node
                .methods
                .iter()
                .filter(|candidate| candidate.name == method)
                .collect();
            if overloads.is_empty() {
                return Err(InspectError::MethodNotFound {
                    method_name: method,
                    type_name: full,
                });
            }

            let mut out = String::new();
            for overload in overloads {
                let body = view
                    .decompile_member(overload.token)
                    .map_err(|err| InspectError::load_failed(assembly.clone(), err))?;
                let _ = writeln!(
                    out,
                    "// Overload with {} parameter(s)",
                    overload.parameters.len()
                );
                out.push_str(&body);
                out.push('\n');
                out.push('\n');
            }
            Ok(out)
        })
        .await
    }

    /// Lists every type defined in the primary module (type forwards are
    /// excluded), optionally filtered by a case-insensitive namespace
    /// substring, sorted ascending by full name.
    ///
    /// # Errors
    /// `AssemblyLoadFailed` for any engine fault.
    pub async fn list_types(
        &self,
        handle: &AssemblyHandle,
        namespace_filter: Option<&str>,
        cancel: &CancellationToken,
    ) -> InspectResult<Vec<TypeDescriptor>> {
        let filter = namespace_filter
            .map(str::to_lowercase)
            .filter(|needle| !needle.is_empty());
        self.run_query(handle, cancel, move |view| {
            let mut types: Vec<TypeDescriptor> = view
                .type_definitions()
                .iter()
                .filter(|node| node.in_primary_module)
                .filter(|node| {
                    filter.as_ref().is_none_or(|needle| {
                        node.namespace
                            .as_ref()
                            .is_some_and(|namespace| namespace.to_lowercase().contains(needle))
                    })
                })
                .map(mapper::map_type)
                .collect();
            types.sort_by(|a, b| a.full_name.cmp(&b.full_name));
            Ok(types)
        })
        .await
    }

    /// Builds the capped assembly preview.
    ///
    /// The first 100 public primary-module definitions are taken in engine
    /// encounter order; the namespace histogram covers exactly that capped
    /// set, while the total counts every definition the metadata exposes.
    ///
    /// # Errors
    /// `AssemblyLoadFailed` for any engine fault.
    pub async fn assembly_summary(
        &self,
        handle: &AssemblyHandle,
        cancel: &CancellationToken,
    ) -> InspectResult<AssemblySummary> {
        let file_name = handle.file_name().to_string();
        let full_path = handle.display_path();
        self.run_query(handle, cancel, move |view| {
            let definitions = view.type_definitions();
            let total_type_count = definitions.len();

            let public_types: Vec<TypeDescriptor> = definitions
                .iter()
                .filter(|node| {
                    node.in_primary_module && node.accessibility == NodeAccessibility::Public
                })
                .take(PUBLIC_TYPE_CAP)
                .map(mapper::map_type)
                .collect();

            let mut namespace_counts: HashMap<String, usize> = HashMap::new();
            for descriptor in &public_types {
                let key = descriptor
                    .namespace
                    .clone()
                    .unwrap_or_else(|| GLOBAL_NAMESPACE.to_string());
                *namespace_counts.entry(key).or_insert(0) += 1;
            }

            Ok(AssemblySummary {
                file_name,
                full_path,
                public_types,
                namespace_counts,
                total_type_count,
            })
        })
        .await
    }

    /// Finds extension methods applicable to `target`.
    ///
    /// Only public static primary-module types are scanned. A method
    /// matches when its first parameter's full type name equals the target
    /// case-insensitively, or the target contains it as a case-insensitive
    /// substring — the latter lets an open generic match a closed one.
    /// Matches keep engine enumeration order; nothing is deduplicated.
    ///
    /// # Errors
    /// `AssemblyLoadFailed` for any engine fault.
    pub async fn find_extension_methods(
        &self,
        handle: &AssemblyHandle,
        target: &TypeName,
        cancel: &CancellationToken,
    ) -> InspectResult<Vec<MethodDescriptor>> {
        let target = target.full_name().to_lowercase();
        self.run_query(handle, cancel, move |view| {
            let mut matches = Vec::new();
            for node in view.type_definitions().iter().filter(|node| {
                node.in_primary_module
                    && node.is_static
                    && node.accessibility == NodeAccessibility::Public
            }) {
                for method in node.methods.iter().filter(|m| m.is_extension_method) {
                    let Some(first) = method.parameters.first() else {
                        continue;
                    };
                    let extends = first.type_full_name.to_lowercase();
                    if extends == target || target.contains(extends.as_str()) {
                        matches.push(mapper::map_method(method));
                    }
                }
            }
            Ok(matches)
        })
        .await
    }

    /// Searches public primary-module types for members whose name contains
    /// `search_term` (case-insensitive).
    ///
    /// `member_kind` gates the four member kinds case-insensitively; absent
    /// or empty means all four, and an unrecognized kind matches nothing
    /// rather than failing. Constructors are excluded from the method
    /// search. Results are appended type-by-type, kind-by-kind, in engine
    /// order; there is no global sort.
    ///
    /// # Errors
    /// `AssemblyLoadFailed` for any engine fault.
    pub async fn search_members(
        &self,
        handle: &AssemblyHandle,
        search_term: &str,
        member_kind: Option<&str>,
        cancel: &CancellationToken,
    ) -> InspectResult<Vec<MemberSearchResult>> {
        let needle = search_term.to_lowercase();
        let member_kind = member_kind
            .map(str::to_string)
            .filter(|kind| !kind.is_empty());
        self.run_query(handle, cancel, move |view| {
            let wants = |kind: &str| {
                member_kind
                    .as_deref()
                    .is_none_or(|requested| requested.eq_ignore_ascii_case(kind))
            };

            let mut results = Vec::new();
            for node in view
                .type_definitions()
                .iter()
                .filter(|node| {
                    node.in_primary_module && node.accessibility == NodeAccessibility::Public
                })
            {
                if wants("method") {
                    for method in node.methods.iter().filter(|m| {
                        !m.is_constructor && m.name.to_lowercase().contains(&needle)
                    }) {
                        let parameters = method
                            .parameters
                            .iter()
                            .map(|p| format!("{} {}", p.type_name, p.name))
                            .collect::<Vec<_>>()
                            .join(", ");
                        results.push(MemberSearchResult {
                            type_full_name: node.full_name.clone(),
                            member_name: method.name.clone(),
                            kind: MemberKind::Method,
                            signature: format!(
                                "{} {}({parameters})",
                                method.return_type, method.name
                            ),
                        });
                    }
                }

                if wants("property") {
                    for property in node
                        .properties
                        .iter()
                        .filter(|p| p.name.to_lowercase().contains(&needle))
                    {
                        results.push(MemberSearchResult {
                            type_full_name: node.full_name.clone(),
                            member_name: property.name.clone(),
                            kind: MemberKind::Property,
                            signature: format!("{} {}", property.type_name, property.name),
                        });
                    }
                }

                if wants("field") {
                    for field in node
                        .fields
                        .iter()
                        .filter(|f| f.name.to_lowercase().contains(&needle))
                    {
                        results.push(MemberSearchResult {
                            type_full_name: node.full_name.clone(),
                            member_name: field.name.clone(),
                            kind: MemberKind::Field,
                            signature: format!("{} {}", field.type_name, field.name),
                        });
                    }
                }

                if wants("event") {
                    for event in node
                        .events
                        .iter()
                        .filter(|e| e.name.to_lowercase().contains(&needle))
                    {
                        results.push(MemberSearchResult {
                            type_full_name: node.full_name.clone(),
                            member_name: event.name.clone(),
                            kind: MemberKind::Event,
                            signature: format!("event {} {}", event.type_name, event.name),
                        });
                    }
                }
            }
            Ok(results)
        })
        .await
    }
}
