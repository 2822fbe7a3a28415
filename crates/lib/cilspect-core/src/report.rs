//! Deterministic plain-text reports.
//!
//! Layout is part of the capability contract and must stay byte-stable:
//! member sections render in the fixed order Methods, Properties, Fields,
//! Events and empty sections are omitted entirely; grouped listings keep
//! first-seen order; hierarchy reports always print both sections with
//! literal placeholder text when empty.

use std::fmt::Write as _;

use crate::model::{
    AssemblySummary, MemberSearchResult, MethodDescriptor, TypeDescriptor, GLOBAL_NAMESPACE,
};

/// Member overview for one type.
#[must_use]
pub fn type_members(descriptor: &TypeDescriptor, assembly_file: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "╔═══ Type Members: {}", descriptor.full_name);
    let _ = writeln!(out, "║ Assembly: {assembly_file}");
    let _ = writeln!(out, "║ Kind: {}", descriptor.kind);
    let _ = writeln!(
        out,
        "║ Namespace: {}",
        descriptor.namespace.as_deref().unwrap_or(GLOBAL_NAMESPACE)
    );
    out.push_str("╚═══\n\n");

    if !descriptor.methods.is_empty() {
        out.push_str("Methods:\n");
        for method in &descriptor.methods {
            let accessibility = method.accessibility.to_string().to_lowercase();
            let mut modifiers = Vec::new();
            if method.is_static {
                modifiers.push("static");
            }
            if method.is_abstract {
                modifiers.push("abstract");
            }
            if method.is_virtual {
                modifiers.push("virtual");
            }
            let mods = if modifiers.is_empty() {
                String::new()
            } else {
                format!("{} ", modifiers.join(" "))
            };
            let _ = writeln!(
                out,
                "  {accessibility} {mods}{} {}({})",
                method.return_type,
                method.name,
                parameter_list(method)
            );
        }
        out.push('\n');
    }

    if !descriptor.properties.is_empty() {
        out.push_str("Properties:\n");
        for property in &descriptor.properties {
            let accessibility = property.accessibility.to_string().to_lowercase();
            let getter = if property.has_getter { "get;" } else { "" };
            let setter = if property.has_setter { "set;" } else { "" };
            let _ = writeln!(
                out,
                "  {accessibility} {} {} {{ {getter} {setter} }}",
                property.type_name, property.name
            );
        }
        out.push('\n');
    }

    if !descriptor.fields.is_empty() {
        out.push_str("Fields:\n");
        for field in &descriptor.fields {
            let accessibility = field.accessibility.to_string().to_lowercase();
            let modifiers = if field.is_static { "static " } else { "" };
            let _ = writeln!(
                out,
                "  {accessibility} {modifiers}{} {}",
                field.type_name, field.name
            );
        }
        out.push('\n');
    }

    if !descriptor.events.is_empty() {
        out.push_str("Events:\n");
        for event in &descriptor.events {
            let accessibility = event.accessibility.to_string().to_lowercase();
            let _ = writeln!(
                out,
                "  {accessibility} event {} {}",
                event.type_name, event.name
            );
        }
    }

    out
}

/// Base types and implemented interfaces for one type.
#[must_use]
pub fn type_hierarchy(descriptor: &TypeDescriptor) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Type Hierarchy: {}", descriptor.full_name);
    let _ = writeln!(out, "Kind: {}", descriptor.kind);
    out.push('\n');

    out.push_str("Inherits from:\n");
    if descriptor.base_types.is_empty() {
        out.push_str("  (none, inherits from System.Object)\n");
    } else {
        for base in &descriptor.base_types {
            let _ = writeln!(out, "  ↑ {base}");
        }
    }
    out.push('\n');

    out.push_str("Implements interfaces:\n");
    if descriptor.interfaces.is_empty() {
        out.push_str("  (none)\n");
    } else {
        for interface in &descriptor.interfaces {
            let _ = writeln!(out, "  • {interface}");
        }
    }

    out
}

/// Member matches grouped by declaring type in first-seen order.
#[must_use]
pub fn member_search(
    search_term: &str,
    assembly_file: &str,
    results: &[MemberSearchResult],
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Search results for '{search_term}' in {assembly_file}");
    out.push('\n');
    let _ = writeln!(out, "Found {} matching members:", results.len());
    out.push('\n');

    for (type_full_name, members) in grouped(results, |result| result.type_full_name.as_str()) {
        let _ = writeln!(out, "In type: {type_full_name}");
        for member in members {
            let _ = writeln!(out, "  [{}] {}", member.kind, member.signature);
        }
        out.push('\n');
    }

    out
}

/// Extension-method matches grouped by method name in first-seen order.
#[must_use]
pub fn extension_methods(
    target_type: &str,
    assembly_file: &str,
    methods: &[MethodDescriptor],
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Extension methods for type: {target_type}");
    let _ = writeln!(out, "Assembly: {assembly_file}");
    out.push('\n');

    if methods.is_empty() {
        out.push_str("No extension methods found for this type in the assembly.\n");
        out.push('\n');
        out.push_str(
            "Note: Extension methods are defined in static classes and marked with the 'this' keyword on their first parameter.\n",
        );
        return out;
    }

    let _ = writeln!(out, "Found {} extension methods:", methods.len());
    out.push('\n');

    for (name, overloads) in grouped(methods, |method| method.name.as_str()) {
        let _ = writeln!(out, "Method: {name}");
        for method in overloads {
            let _ = writeln!(
                out,
                "  {} {}({})",
                method.return_type,
                method.name,
                parameter_list(method)
            );
        }
        out.push('\n');
    }

    out.push_str(
        "Usage: these methods can be called as if they were instance methods on the target type.\n",
    );
    out
}

/// Sorted type listing with kind tags.
#[must_use]
pub fn type_listing(assembly_file: &str, types: &[TypeDescriptor]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Assembly: {assembly_file}");
    let _ = writeln!(out, "Types found: {}", types.len());
    out.push('\n');

    for descriptor in types {
        let kind = descriptor.kind.to_string().to_lowercase();
        let _ = writeln!(out, "  {kind:<10} {}", descriptor.full_name);
    }

    out
}

/// Assembly preview: totals, namespace histogram, capped public listing.
#[must_use]
pub fn assembly_summary(summary: &AssemblySummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Assembly: {}", summary.file_name);
    let _ = writeln!(out, "Total Types: {}", summary.total_type_count);
    let _ = writeln!(out, "Public Types: {}", summary.public_types.len());
    out.push('\n');

    if !summary.namespace_counts.is_empty() {
        out.push_str("Namespaces:\n");
        let mut namespaces: Vec<_> = summary.namespace_counts.iter().collect();
        namespaces.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (namespace, count) in namespaces {
            let _ = writeln!(out, "  {namespace}: {count} types");
        }
        out.push('\n');
    }

    if !summary.public_types.is_empty() {
        out.push_str("Key Public Types:\n");
        for descriptor in &summary.public_types {
            let _ = writeln!(out, "  {} {}", descriptor.kind, descriptor.full_name);
        }
    }

    out
}

fn parameter_list(method: &MethodDescriptor) -> String {
    method
        .parameters
        .iter()
        .map(|parameter| format!("{} {}", parameter.type_name, parameter.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Groups `items` by key, preserving first-seen key order.
fn grouped<'a, T>(items: &'a [T], key: impl Fn(&T) -> &str) -> Vec<(&'a str, Vec<&'a T>)> {
    let mut groups: Vec<(&str, Vec<&T>)> = Vec::new();
    for item in items {
        let item_key = key(item);
        if let Some(position) = groups.iter().position(|(existing, _)| *existing == item_key) {
            groups[position].1.push(item);
        } else {
            groups.push((item_key, vec![item]));
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Accessibility, MemberKind, ParameterDescriptor, TypeKind};

    fn baz_method() -> MethodDescriptor {
        MethodDescriptor {
            name: "Baz".to_string(),
            return_type: "void".to_string(),
            parameters: vec![ParameterDescriptor {
                name: "x".to_string(),
                type_name: "int".to_string(),
            }],
            accessibility: Accessibility::Public,
            is_static: false,
            is_abstract: false,
            is_virtual: false,
            is_extension_method: false,
        }
    }

    fn bar_descriptor() -> TypeDescriptor {
        TypeDescriptor {
            full_name: "Foo.Bar".to_string(),
            namespace: Some("Foo".to_string()),
            short_name: "Bar".to_string(),
            kind: TypeKind::Class,
            accessibility: Accessibility::Public,
            methods: vec![baz_method()],
            properties: Vec::new(),
            fields: Vec::new(),
            events: Vec::new(),
            base_types: Vec::new(),
            interfaces: Vec::new(),
        }
    }

    #[test]
    fn member_report_lists_method_and_omits_empty_sections() {
        let report = type_members(&bar_descriptor(), "Foo.dll");
        assert!(report.contains("Methods:\n"));
        assert!(report.contains("  public void Baz(int x)\n"));
        assert!(!report.contains("Properties:"));
        assert!(!report.contains("Fields:"));
        assert!(!report.contains("Events:"));
    }

    #[test]
    fn hierarchy_report_prints_placeholders_when_empty() {
        let report = type_hierarchy(&bar_descriptor());
        assert!(report.contains("Inherits from:\n  (none, inherits from System.Object)\n"));
        assert!(report.contains("Implements interfaces:\n  (none)\n"));
    }

    #[test]
    fn search_report_groups_by_first_seen_type() {
        let results = vec![
            MemberSearchResult {
                type_full_name: "B.Second".to_string(),
                member_name: "Go".to_string(),
                kind: MemberKind::Method,
                signature: "void Go()".to_string(),
            },
            MemberSearchResult {
                type_full_name: "A.First".to_string(),
                member_name: "Go".to_string(),
                kind: MemberKind::Property,
                signature: "int Go".to_string(),
            },
            MemberSearchResult {
                type_full_name: "B.Second".to_string(),
                member_name: "Gone".to_string(),
                kind: MemberKind::Field,
                signature: "bool Gone".to_string(),
            },
        ];
        let report = member_search("Go", "lib.dll", &results);
        assert!(report.contains("Found 3 matching members:"));
        let second = report.find("In type: B.Second").expect("group for B.Second");
        let first = report.find("In type: A.First").expect("group for A.First");
        assert!(second < first, "first-seen order must be preserved");
        assert!(report.contains("  [Method] void Go()\n"));
        assert!(report.contains("  [Field] bool Gone\n"));
    }

    #[test]
    fn listing_pads_kind_column() {
        let mut descriptor = bar_descriptor();
        descriptor.kind = TypeKind::Enum;
        let report = type_listing("lib.dll", std::slice::from_ref(&descriptor));
        assert!(report.contains("  enum       Foo.Bar\n"));
    }

    #[test]
    fn empty_extension_report_is_not_an_error_shape() {
        let report = extension_methods("System.String", "lib.dll", &[]);
        assert!(report.contains("No extension methods found"));
        assert!(report.contains("Note: Extension methods"));
    }

    #[test]
    fn summary_orders_namespaces_by_descending_count() {
        let mut counts = std::collections::HashMap::new();
        counts.insert("A.Small".to_string(), 1);
        counts.insert("B.Big".to_string(), 3);
        counts.insert("C.Small".to_string(), 1);
        let summary = AssemblySummary {
            file_name: "lib.dll".to_string(),
            full_path: "/tmp/lib.dll".to_string(),
            public_types: Vec::new(),
            namespace_counts: counts,
            total_type_count: 9,
        };
        let report = assembly_summary(&summary);
        let big = report.find("B.Big: 3 types").expect("B.Big line");
        let a_small = report.find("A.Small: 1 types").expect("A.Small line");
        let c_small = report.find("C.Small: 1 types").expect("C.Small line");
        assert!(big < a_small && a_small < c_small);
    }
}
