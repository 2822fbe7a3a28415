//! Value objects and descriptor snapshots.
//!
//! Descriptors are immutable once constructed and live only for the request
//! that produced them; nothing here is cached or shared across calls.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::{InspectError, InspectResult};

/// Histogram key for types declared outside any namespace.
pub const GLOBAL_NAMESPACE: &str = "(global)";

/// Validated absolute path to an existing assembly file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyHandle {
    path: PathBuf,
    file_name: String,
}

impl AssemblyHandle {
    /// Validates `path` and canonicalizes it.
    ///
    /// # Errors
    /// Returns `InvalidInput` if the path is empty, names a file that does
    /// not exist, or does not carry a `.dll`/`.exe` extension.
    pub fn create(path: &str) -> InspectResult<Self> {
        if path.trim().is_empty() {
            return Err(InspectError::InvalidInput(
                "assembly path must not be empty".to_string(),
            ));
        }

        let candidate = Path::new(path);
        if !candidate.is_file() {
            return Err(InspectError::InvalidInput(format!(
                "assembly file not found: {path}"
            )));
        }

        let has_assembly_extension = candidate
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("dll") || ext.eq_ignore_ascii_case("exe"));
        if !has_assembly_extension {
            return Err(InspectError::InvalidInput(format!(
                "invalid assembly file extension: {path}"
            )));
        }

        let canonical = std::fs::canonicalize(candidate).map_err(|err| {
            InspectError::InvalidInput(format!("cannot resolve assembly path {path}: {err}"))
        })?;
        let file_name = canonical
            .file_name()
            .and_then(|name| name.to_str())
            .map_or_else(|| path.to_string(), ToString::to_string);

        Ok(Self {
            path: canonical,
            file_name,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Base file name, for display in reports.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}

/// Fully qualified type name split into namespace and short name.
///
/// Construction performs no existence check; a type that does not exist is
/// discovered only when the extractor attempts resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeName {
    full_name: String,
    namespace: Option<String>,
    short_name: String,
}

impl TypeName {
    /// Splits `full_name` at the last `.`.
    ///
    /// # Errors
    /// Returns `InvalidInput` if the name is empty or whitespace.
    pub fn create(full_name: &str) -> InspectResult<Self> {
        if full_name.trim().is_empty() {
            return Err(InspectError::InvalidInput(
                "type name must not be empty".to_string(),
            ));
        }

        let (namespace, short_name) = full_name.rfind('.').map_or_else(
            || (None, full_name.to_string()),
            |dot| {
                (
                    Some(full_name[..dot].to_string()),
                    full_name[dot + 1..].to_string(),
                )
            },
        );

        Ok(Self {
            full_name: full_name.to_string(),
            namespace,
            short_name,
        })
    }

    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    #[must_use]
    pub fn short_name(&self) -> &str {
        &self.short_name
    }
}

/// Type classification in the descriptor model. `Unknown` absorbs every
/// engine kind the model does not distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Interface,
    Struct,
    Enum,
    Delegate,
    Unknown,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Class => "Class",
            Self::Interface => "Interface",
            Self::Struct => "Struct",
            Self::Enum => "Enum",
            Self::Delegate => "Delegate",
            Self::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

/// Descriptor accessibility. Closed: every engine-reported level maps onto
/// exactly one of these six.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessibility {
    Public,
    Internal,
    Protected,
    Private,
    ProtectedInternal,
    PrivateProtected,
}

impl fmt::Display for Accessibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Public => "Public",
            Self::Internal => "Internal",
            Self::Protected => "Protected",
            Self::Private => "Private",
            Self::ProtectedInternal => "ProtectedInternal",
            Self::PrivateProtected => "PrivateProtected",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Method,
    Property,
    Field,
    Event,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Method => "Method",
            Self::Property => "Property",
            Self::Field => "Field",
            Self::Event => "Event",
        };
        f.write_str(name)
    }
}

/// Full member-level snapshot of one type definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub full_name: String,
    pub namespace: Option<String>,
    pub short_name: String,
    pub kind: TypeKind,
    pub accessibility: Accessibility,
    /// Constructors are excluded.
    pub methods: Vec<MethodDescriptor>,
    pub properties: Vec<PropertyDescriptor>,
    pub fields: Vec<FieldDescriptor>,
    pub events: Vec<EventDescriptor>,
    /// Direct base classes; the `System.Object` root is excluded.
    pub base_types: Vec<String>,
    pub interfaces: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct MethodDescriptor {
    pub name: String,
    pub return_type: String,
    pub parameters: Vec<ParameterDescriptor>,
    pub accessibility: Accessibility,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_virtual: bool,
    pub is_extension_method: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
    pub name: String,
    pub type_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub name: String,
    pub type_name: String,
    pub accessibility: Accessibility,
    pub has_getter: bool,
    pub has_setter: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub type_name: String,
    pub accessibility: Accessibility,
    pub is_static: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDescriptor {
    pub name: String,
    pub type_name: String,
    pub accessibility: Accessibility,
}

/// Cheap assembly preview.
///
/// The namespace histogram is computed over the capped public list only,
/// while the total spans every type definition; this asymmetry is part of
/// the contract, not an oversight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblySummary {
    pub file_name: String,
    pub full_path: String,
    /// At most 100 entries, in engine encounter order.
    pub public_types: Vec<TypeDescriptor>,
    pub namespace_counts: HashMap<String, usize>,
    pub total_type_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSearchResult {
    pub type_full_name: String,
    pub member_name: String,
    pub kind: MemberKind,
    pub signature: String,
}

/// Source text recovered for a whole type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecompiledSource {
    pub source: String,
    pub type_name: String,
    pub assembly_name: String,
    pub decompiled_at: DateTime<Utc>,
}

impl DecompiledSource {
    #[must_use]
    pub fn new(source: String, type_name: String, assembly_name: String) -> Self {
        Self {
            source,
            type_name,
            assembly_name,
            decompiled_at: Utc::now(),
        }
    }
}
