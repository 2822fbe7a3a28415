//! In-memory engine used by tests and embedders.
//!
//! Assemblies are registered up front as fixtures keyed by path; `load`
//! hands out cloned views, so concurrent calls never share state.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::{MemberToken, TypeNode};
use crate::{DecompilerEngine, EngineError, EngineSettings, LoadedAssembly};

/// Metadata and canned source for one registered assembly.
#[derive(Debug, Clone, Default)]
pub struct AssemblyFixture {
    types: Vec<TypeNode>,
    type_sources: HashMap<String, String>,
    member_sources: HashMap<MemberToken, String>,
}

impl AssemblyFixture {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_type(mut self, node: TypeNode) -> Self {
        self.types.push(node);
        self
    }

    #[must_use]
    pub fn with_type_source(mut self, full_name: impl Into<String>, source: impl Into<String>) -> Self {
        self.type_sources.insert(full_name.into(), source.into());
        self
    }

    #[must_use]
    pub fn with_member_source(mut self, token: MemberToken, source: impl Into<String>) -> Self {
        self.member_sources.insert(token, source.into());
        self
    }
}

/// Engine serving registered [`AssemblyFixture`]s.
///
/// `with_load_delay` and `with_load_failure` exist to exercise the timeout
/// and load-failure paths of callers.
#[derive(Debug, Clone, Default)]
pub struct MemoryEngine {
    assemblies: HashMap<PathBuf, AssemblyFixture>,
    load_delay: Option<Duration>,
    load_failure: Option<String>,
}

impl MemoryEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_assembly(mut self, path: impl Into<PathBuf>, fixture: AssemblyFixture) -> Self {
        self.assemblies.insert(path.into(), fixture);
        self
    }

    /// Makes every `load` block for `delay` before returning.
    #[must_use]
    pub const fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = Some(delay);
        self
    }

    /// Makes every `load` fail as a malformed image with `message`.
    #[must_use]
    pub fn with_load_failure(mut self, message: impl Into<String>) -> Self {
        self.load_failure = Some(message.into());
        self
    }
}

impl DecompilerEngine for MemoryEngine {
    type View = MemoryView;

    fn load(&self, path: &Path, _settings: &EngineSettings) -> Result<Self::View, EngineError> {
        if let Some(delay) = self.load_delay {
            std::thread::sleep(delay);
        }
        if let Some(message) = &self.load_failure {
            return Err(EngineError::BadImage(message.clone()));
        }
        self.assemblies.get(path).cloned().map_or_else(
            || {
                Err(EngineError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("no assembly registered at {}", path.display()),
                )))
            },
            |fixture| Ok(MemoryView { fixture }),
        )
    }
}

/// View over a single registered fixture.
#[derive(Debug, Clone)]
pub struct MemoryView {
    fixture: AssemblyFixture,
}

impl LoadedAssembly for MemoryView {
    fn resolve_type(&self, full_name: &str) -> Option<TypeNode> {
        self.fixture
            .types
            .iter()
            .find(|node| node.in_primary_module && node.full_name == full_name)
            .cloned()
    }

    fn decompile_type(&self, full_name: &str) -> Result<String, EngineError> {
        self.fixture
            .type_sources
            .get(full_name)
            .cloned()
            .ok_or_else(|| EngineError::MissingSource(format!("type '{full_name}'")))
    }

    fn decompile_member(&self, token: MemberToken) -> Result<String, EngineError> {
        self.fixture
            .member_sources
            .get(&token)
            .cloned()
            .ok_or_else(|| EngineError::MissingSource(format!("member token {:#x}", token.0)))
    }

    fn type_definitions(&self) -> Vec<TypeNode> {
        self.fixture.types.clone()
    }
}
