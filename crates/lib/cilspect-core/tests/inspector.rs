//! End-to-end orchestrator tests against the in-memory engine.

use std::time::Duration;

use cilspect_core::inspect::{AssemblyInspector, ServiceConfig};
use cilspect_engine::memory::{AssemblyFixture, MemoryEngine};
use cilspect_engine::models::{
    BaseTypeNode, EventNode, FieldNode, MemberToken, MethodNode, NodeAccessibility, NodeTypeKind,
    ParameterNode, PropertyNode, TypeNode,
};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

/// Writes a placeholder assembly file and returns its canonical path.
fn assembly_file(dir: &TempDir, name: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, b"MZ").expect("fixture file should be writable");
    std::fs::canonicalize(&path)
        .expect("fixture path should canonicalize")
        .display()
        .to_string()
}

fn class(full_name: &str) -> TypeNode {
    let (namespace, name) = full_name.rfind('.').map_or_else(
        || (None, full_name.to_string()),
        |dot| (Some(full_name[..dot].to_string()), full_name[dot + 1..].to_string()),
    );
    TypeNode {
        full_name: full_name.to_string(),
        namespace,
        name,
        kind: NodeTypeKind::Class,
        accessibility: NodeAccessibility::Public,
        is_static: false,
        in_primary_module: true,
        methods: Vec::new(),
        properties: Vec::new(),
        fields: Vec::new(),
        events: Vec::new(),
        base_types: Vec::new(),
    }
}

fn method(name: &str, token: u32, parameters: Vec<ParameterNode>) -> MethodNode {
    MethodNode {
        name: name.to_string(),
        return_type: "void".to_string(),
        parameters,
        accessibility: NodeAccessibility::Public,
        is_static: false,
        is_abstract: false,
        is_virtual: false,
        is_extension_method: false,
        is_constructor: false,
        token: MemberToken(token),
    }
}

fn int_parameter(name: &str) -> ParameterNode {
    ParameterNode {
        name: name.to_string(),
        type_name: "int".to_string(),
        type_full_name: "System.Int32".to_string(),
    }
}

/// `Foo.dll` fixture: public class `Foo.Bar` with exactly one public method
/// `Baz(int x)` and no properties, fields, or events.
fn foo_fixture() -> AssemblyFixture {
    let mut bar = class("Foo.Bar");
    bar.methods.push(MethodNode {
        is_constructor: true,
        ..method(".ctor", 0x0600_0001, Vec::new())
    });
    bar.methods
        .push(method("Baz", 0x0600_0002, vec![int_parameter("x")]));
    AssemblyFixture::new()
        .with_type(bar)
        .with_type_source("Foo.Bar", "public class Bar\n{\n    public void Baz(int x) { }\n}\n")
        .with_member_source(MemberToken(0x0600_0002), "public void Baz(int x) { }")
}

fn inspector(engine: MemoryEngine) -> AssemblyInspector<MemoryEngine> {
    AssemblyInspector::new(engine, &ServiceConfig::default())
}

#[tokio::test]
async fn list_types_is_sorted_ascending_by_full_name() {
    let dir = TempDir::new().expect("tempdir");
    let path = assembly_file(&dir, "lib.dll");
    let fixture = AssemblyFixture::new()
        .with_type(class("Zeta.Last"))
        .with_type(class("Alpha.First"))
        .with_type(class("Alpha.Second"));
    let inspector = inspector(MemoryEngine::new().with_assembly(&path, fixture));

    let report = inspector
        .list_types(&path, None, &CancellationToken::new())
        .await
        .expect("listing should succeed");

    let alpha_first = report.find("Alpha.First").expect("Alpha.First listed");
    let alpha_second = report.find("Alpha.Second").expect("Alpha.Second listed");
    let zeta = report.find("Zeta.Last").expect("Zeta.Last listed");
    assert!(alpha_first < alpha_second && alpha_second < zeta);
    assert!(report.contains("Types found: 3"));
}

#[tokio::test]
async fn list_types_excludes_forwards_and_filters_namespaces() {
    let dir = TempDir::new().expect("tempdir");
    let path = assembly_file(&dir, "lib.dll");
    let mut forwarded = class("Alpha.Forwarded");
    forwarded.in_primary_module = false;
    let fixture = AssemblyFixture::new()
        .with_type(class("Alpha.Here"))
        .with_type(class("Beta.There"))
        .with_type(forwarded);
    let inspector = inspector(MemoryEngine::new().with_assembly(&path, fixture));

    let report = inspector
        .list_types(&path, Some("ALPHA"), &CancellationToken::new())
        .await
        .expect("listing should succeed");

    assert!(report.contains("Alpha.Here"));
    assert!(!report.contains("Alpha.Forwarded"));
    assert!(!report.contains("Beta.There"));
    assert!(report.contains("Types found: 1"));
}

#[tokio::test]
async fn analyze_assembly_caps_public_types_and_counts_everything() {
    let dir = TempDir::new().expect("tempdir");
    let path = assembly_file(&dir, "big.dll");
    let mut fixture = AssemblyFixture::new();
    for index in 0..120 {
        fixture = fixture.with_type(class(&format!("Big.Type{index:03}")));
    }
    let mut hidden = class("Big.Hidden");
    hidden.accessibility = NodeAccessibility::Internal;
    fixture = fixture.with_type(hidden);
    let inspector = inspector(MemoryEngine::new().with_assembly(&path, fixture));

    let report = inspector
        .analyze_assembly(&path, &CancellationToken::new())
        .await
        .expect("analysis should succeed");

    assert!(report.contains("Total Types: 121"));
    assert!(report.contains("Public Types: 100"));
    // Histogram covers exactly the capped set, never the total.
    assert!(report.contains("Big: 100 types"));
}

#[tokio::test]
async fn decompile_type_returns_engine_source_verbatim() {
    let dir = TempDir::new().expect("tempdir");
    let path = assembly_file(&dir, "Foo.dll");
    let inspector = inspector(MemoryEngine::new().with_assembly(&path, foo_fixture()));

    let source = inspector
        .decompile_type(&path, "Foo.Bar", &CancellationToken::new())
        .await
        .expect("decompilation should succeed");
    assert_eq!(source, "public class Bar\n{\n    public void Baz(int x) { }\n}\n");
}

#[tokio::test]
async fn decompile_type_of_unknown_type_is_type_not_found() {
    let dir = TempDir::new().expect("tempdir");
    let path = assembly_file(&dir, "Foo.dll");
    let inspector = inspector(MemoryEngine::new().with_assembly(&path, foo_fixture()));

    let err = inspector
        .decompile_type(&path, "Foo.Missing", &CancellationToken::new())
        .await
        .expect_err("unknown type must fail");
    assert_eq!(err.code(), "TYPE_NOT_FOUND");
}

#[tokio::test]
async fn decompile_method_distinguishes_missing_method_from_missing_type() {
    let dir = TempDir::new().expect("tempdir");
    let path = assembly_file(&dir, "Foo.dll");
    let inspector = inspector(MemoryEngine::new().with_assembly(&path, foo_fixture()));

    let err = inspector
        .decompile_method(&path, "Foo.Bar", "Nope", &CancellationToken::new())
        .await
        .expect_err("missing method must fail");
    assert_eq!(err.code(), "METHOD_NOT_FOUND");
}

#[tokio::test]
async fn decompile_method_emits_one_header_per_overload() {
    let dir = TempDir::new().expect("tempdir");
    let path = assembly_file(&dir, "lib.dll");
    let mut widget = class("Acme.Widget");
    widget.methods.push(method("Run", 0x0600_0010, Vec::new()));
    widget
        .methods
        .push(method("Run", 0x0600_0011, vec![int_parameter("count")]));
    let fixture = AssemblyFixture::new()
        .with_type(widget)
        .with_member_source(MemberToken(0x0600_0010), "public void Run() { }")
        .with_member_source(MemberToken(0x0600_0011), "public void Run(int count) { }");
    let inspector = inspector(MemoryEngine::new().with_assembly(&path, fixture));

    let source = inspector
        .decompile_method(&path, "Acme.Widget", "Run", &CancellationToken::new())
        .await
        .expect("overload decompilation should succeed");

    assert!(source.contains("// Overload with 0 parameter(s)\npublic void Run() { }\n"));
    assert!(source.contains("// Overload with 1 parameter(s)\npublic void Run(int count) { }\n"));
}

#[tokio::test]
async fn get_type_members_renders_only_populated_sections() {
    let dir = TempDir::new().expect("tempdir");
    let path = assembly_file(&dir, "Foo.dll");
    let inspector = inspector(MemoryEngine::new().with_assembly(&path, foo_fixture()));

    let report = inspector
        .get_type_members(&path, "Foo.Bar", &CancellationToken::new())
        .await
        .expect("member report should succeed");

    assert!(report.contains("Methods:\n  public void Baz(int x)\n"));
    assert!(!report.contains("Properties:"));
    assert!(!report.contains("Fields:"));
    assert!(!report.contains("Events:"));
}

#[tokio::test]
async fn search_members_scenario_finds_exactly_one_grouped_match() {
    let dir = TempDir::new().expect("tempdir");
    let path = assembly_file(&dir, "Foo.dll");
    let inspector = inspector(MemoryEngine::new().with_assembly(&path, foo_fixture()));

    let report = inspector
        .search_members(&path, "Baz", None, &CancellationToken::new())
        .await
        .expect("search should succeed");

    assert!(report.contains("Found 1 matching members:"));
    assert!(report.contains("In type: Foo.Bar"));
    assert!(report.contains("[Method] void Baz(int x)"));
}

fn member_rich_fixture() -> AssemblyFixture {
    let mut holder = class("Lib.Holder");
    holder
        .methods
        .push(method("CountItems", 0x0600_0020, Vec::new()));
    holder.properties.push(PropertyNode {
        name: "Count".to_string(),
        type_name: "int".to_string(),
        accessibility: NodeAccessibility::Public,
        has_getter: true,
        has_setter: false,
    });
    holder.fields.push(FieldNode {
        name: "count".to_string(),
        type_name: "int".to_string(),
        accessibility: NodeAccessibility::Private,
        is_static: false,
    });
    holder.events.push(EventNode {
        name: "CountChanged".to_string(),
        type_name: "EventHandler".to_string(),
        accessibility: NodeAccessibility::Public,
    });
    AssemblyFixture::new().with_type(holder)
}

#[tokio::test]
async fn search_members_kind_filter_is_exclusive_and_union_when_absent() {
    let dir = TempDir::new().expect("tempdir");
    let path = assembly_file(&dir, "lib.dll");
    let inspector = inspector(MemoryEngine::new().with_assembly(&path, member_rich_fixture()));
    let cancel = CancellationToken::new();

    let methods_only = inspector
        .search_members(&path, "count", Some("method"), &cancel)
        .await
        .expect("method search should succeed");
    assert!(methods_only.contains("Found 1 matching members:"));
    assert!(methods_only.contains("[Method]"));
    assert!(!methods_only.contains("[Property]"));
    assert!(!methods_only.contains("[Field]"));
    assert!(!methods_only.contains("[Event]"));

    let union = inspector
        .search_members(&path, "count", None, &cancel)
        .await
        .expect("union search should succeed");
    assert!(union.contains("Found 4 matching members:"));

    let unrecognized = inspector
        .search_members(&path, "count", Some("constructor"), &cancel)
        .await
        .expect("unrecognized kind is not an error");
    assert!(unrecognized.contains("Found 0 matching members:"));
}

#[tokio::test]
async fn extension_search_without_public_static_types_is_empty_not_an_error() {
    let dir = TempDir::new().expect("tempdir");
    let path = assembly_file(&dir, "Foo.dll");
    let inspector = inspector(MemoryEngine::new().with_assembly(&path, foo_fixture()));

    let report = inspector
        .find_extension_methods(&path, "System.String", &CancellationToken::new())
        .await
        .expect("empty extension search should succeed");
    assert!(report.contains("No extension methods found"));
}

#[tokio::test]
async fn extension_search_matches_exact_and_generic_targets() {
    let dir = TempDir::new().expect("tempdir");
    let path = assembly_file(&dir, "lib.dll");
    let mut extensions = class("Lib.Extensions");
    extensions.is_static = true;
    let mut trim = method("TrimAll", 0x0600_0030, vec![ParameterNode {
        name: "value".to_string(),
        type_name: "string".to_string(),
        type_full_name: "System.String".to_string(),
    }]);
    trim.is_static = true;
    trim.is_extension_method = true;
    let mut each = method("ForEach", 0x0600_0031, vec![ParameterNode {
        name: "source".to_string(),
        type_name: "IEnumerable".to_string(),
        type_full_name: "System.Collections.Generic.IEnumerable`1".to_string(),
    }]);
    each.is_static = true;
    each.is_extension_method = true;
    extensions.methods.push(trim);
    extensions.methods.push(each);
    let inspector = inspector(
        MemoryEngine::new().with_assembly(&path, AssemblyFixture::new().with_type(extensions)),
    );
    let cancel = CancellationToken::new();

    let exact = inspector
        .find_extension_methods(&path, "system.string", &cancel)
        .await
        .expect("exact match should succeed");
    assert!(exact.contains("Method: TrimAll"));
    assert!(!exact.contains("Method: ForEach"));

    let closed_generic = inspector
        .find_extension_methods(
            &path,
            "System.Collections.Generic.IEnumerable`1[[System.String]]",
            &cancel,
        )
        .await
        .expect("generic containment should succeed");
    assert!(closed_generic.contains("Method: ForEach"));
}

#[tokio::test]
async fn hierarchy_report_renders_bases_and_interfaces() {
    let dir = TempDir::new().expect("tempdir");
    let path = assembly_file(&dir, "lib.dll");
    let mut widget = class("Acme.Widget");
    widget.base_types = vec![
        BaseTypeNode {
            full_name: "Acme.Gadget".to_string(),
            kind: NodeTypeKind::Class,
        },
        BaseTypeNode {
            full_name: "System.Object".to_string(),
            kind: NodeTypeKind::Class,
        },
        BaseTypeNode {
            full_name: "System.IDisposable".to_string(),
            kind: NodeTypeKind::Interface,
        },
    ];
    let inspector = inspector(
        MemoryEngine::new().with_assembly(&path, AssemblyFixture::new().with_type(widget)),
    );

    let report = inspector
        .find_type_hierarchy(&path, "Acme.Widget", &CancellationToken::new())
        .await
        .expect("hierarchy should succeed");

    assert!(report.contains("  ↑ Acme.Gadget\n"));
    assert!(!report.contains("System.Object"));
    assert!(report.contains("  • System.IDisposable\n"));
}

#[tokio::test]
async fn cancellation_before_the_engine_call_is_cancelled_not_timeout() {
    let dir = TempDir::new().expect("tempdir");
    let path = assembly_file(&dir, "Foo.dll");
    let inspector = inspector(MemoryEngine::new().with_assembly(&path, foo_fixture()));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = inspector
        .analyze_assembly(&path, &cancel)
        .await
        .expect_err("cancelled call must fail");
    assert_eq!(err.code(), "CANCELLED");
}

#[tokio::test]
async fn elapsed_default_duration_is_timeout_with_configured_seconds() {
    let dir = TempDir::new().expect("tempdir");
    let path = assembly_file(&dir, "Foo.dll");
    let engine = MemoryEngine::new()
        .with_assembly(&path, foo_fixture())
        .with_load_delay(Duration::from_secs(2));
    let config = ServiceConfig {
        default_timeout: Duration::from_secs(1),
        ..ServiceConfig::default()
    };
    let inspector = AssemblyInspector::new(engine, &config);

    let err = inspector
        .analyze_assembly(&path, &CancellationToken::new())
        .await
        .expect_err("slow engine must time out");
    assert_eq!(err.code(), "TIMEOUT");
    assert!(err.to_string().contains("1 seconds"), "got: {err}");
}

#[tokio::test]
async fn engine_faults_surface_as_assembly_load_failed() {
    let dir = TempDir::new().expect("tempdir");
    let path = assembly_file(&dir, "bad.dll");
    let inspector = inspector(MemoryEngine::new().with_load_failure("truncated header"));

    let err = inspector
        .list_types(&path, None, &CancellationToken::new())
        .await
        .expect_err("bad image must fail");
    assert_eq!(err.code(), "ASSEMBLY_LOAD_FAILED");
    assert!(err.to_string().contains("Failed to load assembly"));
}

#[tokio::test]
async fn validation_failures_never_touch_the_engine() {
    // The engine would fail every load; an invalid path must not reach it.
    let inspector = inspector(MemoryEngine::new().with_load_failure("unreachable"));

    let err = inspector
        .decompile_type("/nonexistent/lib.dll", "Foo.Bar", &CancellationToken::new())
        .await
        .expect_err("missing file must fail validation");
    assert_eq!(err.code(), "INVALID_INPUT");

    let dir = TempDir::new().expect("tempdir");
    let path = assembly_file(&dir, "lib.dll");
    let err = inspector
        .decompile_type(&path, "   ", &CancellationToken::new())
        .await
        .expect_err("blank type name must fail validation");
    assert_eq!(err.code(), "INVALID_INPUT");
}

#[tokio::test]
async fn oversized_decompiled_source_is_clipped_with_marker() {
    let dir = TempDir::new().expect("tempdir");
    let path = assembly_file(&dir, "Foo.dll");
    let long_source = "// filler\n".repeat(100);
    let fixture = AssemblyFixture::new()
        .with_type(class("Foo.Bar"))
        .with_type_source("Foo.Bar", long_source);
    let config = ServiceConfig {
        max_decompiled_bytes: 64,
        ..ServiceConfig::default()
    };
    let inspector = AssemblyInspector::new(MemoryEngine::new().with_assembly(&path, fixture), &config);

    let source = inspector
        .decompile_type(&path, "Foo.Bar", &CancellationToken::new())
        .await
        .expect("decompilation should succeed");

    assert!(source.ends_with("// [truncated: output exceeded 64 bytes]\n"));
    assert!(source.len() < 64 + 64);
}

#[tokio::test]
async fn summary_histogram_sums_to_capped_count_across_namespaces() {
    let dir = TempDir::new().expect("tempdir");
    let path = assembly_file(&dir, "lib.dll");
    let mut fixture = AssemblyFixture::new()
        .with_type(class("Alpha.A"))
        .with_type(class("Alpha.B"))
        .with_type(class("Beta.C"))
        .with_type(class("Orphan"));
    let mut forwarded = class("Gamma.Elsewhere");
    forwarded.in_primary_module = false;
    fixture = fixture.with_type(forwarded);
    let inspector = inspector(MemoryEngine::new().with_assembly(&path, fixture));

    let report = inspector
        .analyze_assembly(&path, &CancellationToken::new())
        .await
        .expect("analysis should succeed");

    assert!(report.contains("Public Types: 4"));
    assert!(report.contains("Total Types: 5"));
    assert!(report.contains("Alpha: 2 types"));
    assert!(report.contains("Beta: 1 types"));
    assert!(report.contains("(global): 1 types"));
}
