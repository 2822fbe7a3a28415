//! Decompiler engine seam for cilspect.
//!
//! This crate owns the engine-native metadata node model and the two traits
//! an engine binding implements: [`DecompilerEngine`] opens an assembly and
//! hands back a per-call [`LoadedAssembly`] view exposing type resolution,
//! enumeration, and source recovery. The [`memory`] module provides a
//! complete in-process engine used by tests and embedders.

pub mod memory;
pub mod models;

use std::error::Error;
use std::fmt;
use std::path::Path;

use crate::models::{MemberToken, TypeNode};

/// Immutable settings handed to the engine on every load.
///
/// There is deliberately no shared mutable settings object; callers pass a
/// value into each call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineSettings {
    /// Keep loading when referenced assemblies cannot be resolved. Off by
    /// default: a missing reference should not abort introspection.
    pub throw_on_resolve_errors: bool,
    /// Emit XML documentation comments into recovered source.
    pub include_xml_doc: bool,
}

/// Fault raised by an engine binding.
#[derive(Debug)]
pub enum EngineError {
    /// The binary exists but could not be parsed as an assembly.
    BadImage(String),
    /// The underlying file could not be read.
    Io(std::io::Error),
    /// The engine has no source for the requested type or member.
    MissingSource(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadImage(message) => write!(f, "bad image: {message}"),
            Self::Io(err) => write!(f, "assembly read failed: {err}"),
            Self::MissingSource(what) => write!(f, "no source available for {what}"),
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::BadImage(_) | Self::MissingSource(_) => None,
        }
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// An engine binding. A fresh view is loaded per call; implementations must
/// not share mutable state between loads.
pub trait DecompilerEngine: Send + Sync + 'static {
    type View: LoadedAssembly;

    /// Opens the assembly at `path` and returns a view over its metadata.
    ///
    /// # Errors
    /// Returns `EngineError` if the file cannot be read or parsed.
    fn load(&self, path: &Path, settings: &EngineSettings) -> Result<Self::View, EngineError>;
}

/// A loaded assembly view. All enumeration happens against the primary
/// module; nodes carry an `in_primary_module` flag so type forwards can be
/// told apart from definitions hosted here.
pub trait LoadedAssembly {
    /// Looks a type definition up by fully qualified name in the primary
    /// module. Absence is not an error.
    fn resolve_type(&self, full_name: &str) -> Option<TypeNode>;

    /// Recovers the full source text of a type, verbatim.
    ///
    /// # Errors
    /// Returns `EngineError` if the engine cannot produce source.
    fn decompile_type(&self, full_name: &str) -> Result<String, EngineError>;

    /// Recovers the source text of a single member by metadata token.
    ///
    /// # Errors
    /// Returns `EngineError` if the token is unknown to this assembly.
    fn decompile_member(&self, token: MemberToken) -> Result<String, EngineError>;

    /// Enumerates every type definition the metadata exposes, in engine
    /// encounter order, including forwards and non-public definitions.
    fn type_definitions(&self) -> Vec<TypeNode>;
}
