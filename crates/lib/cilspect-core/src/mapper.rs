//! Pure conversion from engine-native nodes to descriptor snapshots.
//!
//! Every function here is total and deterministic; none re-invokes the
//! engine. The accessibility table is exhaustive over the six engine
//! levels — the engine's "protected and internal" collapses onto
//! `PrivateProtected`, the closest descriptor level, and that lossy
//! collapse is part of the contract. Kind mapping keeps an explicit
//! `Unknown` arm because the engine side is open-ended.

use cilspect_engine::models::{
    EventNode, FieldNode, MethodNode, NodeAccessibility, NodeTypeKind, PropertyNode, TypeNode,
};

use crate::model::{
    Accessibility, EventDescriptor, FieldDescriptor, MethodDescriptor, ParameterDescriptor,
    PropertyDescriptor, TypeDescriptor, TypeKind,
};

const OBJECT_ROOT: &str = "System.Object";

#[must_use]
pub const fn map_kind(kind: NodeTypeKind) -> TypeKind {
    match kind {
        NodeTypeKind::Class => TypeKind::Class,
        NodeTypeKind::Interface => TypeKind::Interface,
        NodeTypeKind::Struct => TypeKind::Struct,
        NodeTypeKind::Enum => TypeKind::Enum,
        NodeTypeKind::Delegate => TypeKind::Delegate,
        NodeTypeKind::Array
        | NodeTypeKind::Pointer
        | NodeTypeKind::ByReference
        | NodeTypeKind::TypeParameter
        | NodeTypeKind::FunctionPointer
        | NodeTypeKind::Tuple
        | NodeTypeKind::Void
        | NodeTypeKind::None => TypeKind::Unknown,
    }
}

#[must_use]
pub const fn map_accessibility(accessibility: NodeAccessibility) -> Accessibility {
    match accessibility {
        NodeAccessibility::Public => Accessibility::Public,
        NodeAccessibility::Internal => Accessibility::Internal,
        NodeAccessibility::Protected => Accessibility::Protected,
        NodeAccessibility::Private => Accessibility::Private,
        NodeAccessibility::ProtectedOrInternal => Accessibility::ProtectedInternal,
        NodeAccessibility::ProtectedAndInternal => Accessibility::PrivateProtected,
    }
}

#[must_use]
pub fn map_type(node: &TypeNode) -> TypeDescriptor {
    TypeDescriptor {
        full_name: node.full_name.clone(),
        namespace: node.namespace.clone(),
        short_name: node.name.clone(),
        kind: map_kind(node.kind),
        accessibility: map_accessibility(node.accessibility),
        methods: node
            .methods
            .iter()
            .filter(|method| !method.is_constructor)
            .map(map_method)
            .collect(),
        properties: node.properties.iter().map(map_property).collect(),
        fields: node.fields.iter().map(map_field).collect(),
        events: node.events.iter().map(map_event).collect(),
        base_types: node
            .base_types
            .iter()
            .filter(|base| {
                matches!(base.kind, NodeTypeKind::Class) && base.full_name != OBJECT_ROOT
            })
            .map(|base| base.full_name.clone())
            .collect(),
        interfaces: node
            .base_types
            .iter()
            .filter(|base| matches!(base.kind, NodeTypeKind::Interface))
            .map(|base| base.full_name.clone())
            .collect(),
    }
}

#[must_use]
pub fn map_method(node: &MethodNode) -> MethodDescriptor {
    MethodDescriptor {
        name: node.name.clone(),
        return_type: node.return_type.clone(),
        parameters: node
            .parameters
            .iter()
            .map(|parameter| ParameterDescriptor {
                name: parameter.name.clone(),
                type_name: parameter.type_name.clone(),
            })
            .collect(),
        accessibility: map_accessibility(node.accessibility),
        is_static: node.is_static,
        is_abstract: node.is_abstract,
        is_virtual: node.is_virtual,
        is_extension_method: node.is_extension_method,
    }
}

#[must_use]
pub fn map_property(node: &PropertyNode) -> PropertyDescriptor {
    PropertyDescriptor {
        name: node.name.clone(),
        type_name: node.type_name.clone(),
        accessibility: map_accessibility(node.accessibility),
        has_getter: node.has_getter,
        has_setter: node.has_setter,
    }
}

#[must_use]
pub fn map_field(node: &FieldNode) -> FieldDescriptor {
    FieldDescriptor {
        name: node.name.clone(),
        type_name: node.type_name.clone(),
        accessibility: map_accessibility(node.accessibility),
        is_static: node.is_static,
    }
}

#[must_use]
pub fn map_event(node: &EventNode) -> EventDescriptor {
    EventDescriptor {
        name: node.name.clone(),
        type_name: node.type_name.clone(),
        accessibility: map_accessibility(node.accessibility),
    }
}
