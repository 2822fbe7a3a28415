use serde::{Deserialize, Serialize};

/// Metadata token identifying a member inside its assembly.
///
/// Tokens are opaque to the core; they are only ever handed back to the
/// engine that produced them, to request a single member's source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberToken(pub u32);

/// Type kind as the engine reports it.
///
/// This set is open-ended: engines distinguish many shapes the core does
/// not care about. Consumers must treat anything beyond the first five
/// variants as unclassified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeTypeKind {
    Class,
    Interface,
    Struct,
    Enum,
    Delegate,
    Array,
    Pointer,
    ByReference,
    TypeParameter,
    FunctionPointer,
    Tuple,
    Void,
    None,
}

/// Accessibility level as the engine reports it.
///
/// Exactly the six levels the metadata format can express; there is no
/// catch-all variant, so every level must be handled wherever this is
/// consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeAccessibility {
    Public,
    Internal,
    Protected,
    Private,
    ProtectedOrInternal,
    ProtectedAndInternal,
}

/// A type definition with its full member metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeNode {
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub name: String,
    pub kind: NodeTypeKind,
    pub accessibility: NodeAccessibility,
    #[serde(default)]
    pub is_static: bool,
    /// False for type forwards whose definition lives in another module.
    #[serde(default = "default_true")]
    pub in_primary_module: bool,
    #[serde(default)]
    pub methods: Vec<MethodNode>,
    #[serde(default)]
    pub properties: Vec<PropertyNode>,
    #[serde(default)]
    pub fields: Vec<FieldNode>,
    #[serde(default)]
    pub events: Vec<EventNode>,
    #[serde(default)]
    pub base_types: Vec<BaseTypeNode>,
}

const fn default_true() -> bool {
    true
}

/// A direct base type reference; classes and interfaces arrive through the
/// same list and are told apart by kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseTypeNode {
    pub full_name: String,
    pub kind: NodeTypeKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct MethodNode {
    pub name: String,
    pub return_type: String,
    #[serde(default)]
    pub parameters: Vec<ParameterNode>,
    pub accessibility: NodeAccessibility,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub is_virtual: bool,
    #[serde(default)]
    pub is_extension_method: bool,
    #[serde(default)]
    pub is_constructor: bool,
    pub token: MemberToken,
}

/// A method parameter. Both the short display name and the full type name
/// travel with the node: signatures render the short name, extension-method
/// targeting compares the full one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterNode {
    pub name: String,
    pub type_name: String,
    pub type_full_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyNode {
    pub name: String,
    pub type_name: String,
    pub accessibility: NodeAccessibility,
    #[serde(default)]
    pub has_getter: bool,
    #[serde(default)]
    pub has_setter: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldNode {
    pub name: String,
    pub type_name: String,
    pub accessibility: NodeAccessibility,
    #[serde(default)]
    pub is_static: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventNode {
    pub name: String,
    pub type_name: String,
    pub accessibility: NodeAccessibility,
}
