use manifold::catalog::{CatalogSpec, RegistrySpec, load};
use manifold::{
    Catalog, Edge, EdgeSet, Manifold, Registry, Resource, ResourceRef, RuleDecl, finalize, graph,
    synthesize,
};
use pretty_assertions::assert_eq;

fn registry() -> Registry {
    Registry::new()
        .with_type("package", ["ensure", "provider"])
        .with_type("yumrepo", ["baseurl", "descr", "enabled", "gpgcheck", "priority"])
}

fn tagged_packages() -> Catalog {
    Catalog::with_resources([
        Resource::new("package", "foo").with_attribute("tag", vec!["internal"]),
        Resource::new("package", "bar").with_attribute("tag", vec!["internal"]),
        Resource::new("package", "baz").with_attribute("tag", vec!["external"]),
        Resource::new("yumrepo", "internal").with_attribute("tag", vec!["internal"]),
    ])
}

fn internal(relationship: &str) -> RuleDecl {
    RuleDecl::new("A")
        .target_type("package")
        .match_on("tag")
        .pattern("internal")
        .relationship(relationship)
}

fn anchor() -> ResourceRef {
    ResourceRef::new("manifold", "A")
}

fn pkg(title: &str) -> ResourceRef {
    ResourceRef::new("package", title)
}

#[test]
fn before_orders_anchor_ahead_of_tagged_packages() {
    let reg = registry();
    let rule = internal("before").validate_and_build(&reg).unwrap();
    let mut catalog = tagged_packages();

    let edges = synthesize(&rule, &reg, Some(&mut catalog)).unwrap();

    let expected: EdgeSet = [
        Edge::new(anchor(), pkg("foo")),
        Edge::new(anchor(), pkg("bar")),
    ]
    .into_iter()
    .collect();
    assert_eq!(edges, expected);
    assert!(catalog.refreshed().is_empty());
}

#[test]
fn notify_reverses_edges_and_refreshes_matches() {
    let reg = registry();
    let rule = internal("notify").validate_and_build(&reg).unwrap();
    let mut catalog = tagged_packages();

    let edges = synthesize(&rule, &reg, Some(&mut catalog)).unwrap();

    let expected: EdgeSet = [
        Edge::new(pkg("foo"), anchor()),
        Edge::new(pkg("bar"), anchor()),
    ]
    .into_iter()
    .collect();
    assert_eq!(edges, expected);
    assert_eq!(
        catalog.refreshed().iter().cloned().collect::<Vec<_>>(),
        vec![pkg("bar"), pkg("foo")]
    );
}

#[test]
fn matching_is_by_exact_type() {
    // The yumrepo is tagged internal too but is not a package.
    let reg = registry();
    let rule = internal("require").validate_and_build(&reg).unwrap();
    let mut catalog = tagged_packages();
    let edges = synthesize(&rule, &reg, Some(&mut catalog)).unwrap();
    assert!(edges.iter().all(|e| e.source.type_name.as_str() == "package"));
    assert_eq!(edges.len(), 2);
}

#[test]
fn rules_over_one_catalog_are_additive() {
    let reg = registry();
    let a = Manifold::declare(&internal("before"), &reg).unwrap();
    let b = Manifold::declare(
        &RuleDecl::new("B")
            .target_type("package")
            .match_on("tag")
            .pattern("/ext/")
            .relationship("require"),
        &reg,
    )
    .unwrap();

    let mut forward = tagged_packages();
    finalize(&mut forward, &[a.clone(), b.clone()], &reg).unwrap();
    let mut backward = tagged_packages();
    finalize(&mut backward, &[b, a], &reg).unwrap();

    assert_eq!(forward.edges(), backward.edges());
    assert_eq!(forward.edges().len(), 3);
}

#[test]
fn loads_json_and_finalizes() {
    let registry_spec: RegistrySpec = serde_json::from_str(
        r#"{"types": {"package": ["ensure"], "yumrepo": ["baseurl", "enabled"]}}"#,
    )
    .unwrap();
    let reg = registry_spec.validate_and_build().unwrap();

    let catalog_spec: CatalogSpec = serde_json::from_str(
        r#"{
            "resources": [
                {"type": "package", "title": "foo", "attributes": {"tag": "internal"}},
                {"type": "package", "title": "bar", "attributes": {"tag": ["internal"]}},
                {"type": "package", "title": "baz", "attributes": {"tag": ["external"]}},
                {"type": "yumrepo", "title": "internal", "attributes": {"enabled": "1"}}
            ],
            "edges": [["Yumrepo[internal]", "Manifold[internal]"]],
            "manifolds": [
                {"title": "internal", "type": "package", "match": "tag",
                 "pattern": "internal", "relationship": "before"}
            ]
        }"#,
    )
    .unwrap();
    let load::LoadedCatalog {
        mut catalog,
        manifolds,
    } = catalog_spec.validate_and_build(&reg).unwrap();

    let report = finalize(&mut catalog, &manifolds, &reg).unwrap();
    assert_eq!(report.edge_count(), 2);
    assert_eq!(catalog.edges().len(), 3);
    assert_eq!(graph::find_cycle(catalog.edges()), None);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(
        json["added"]["Manifold[internal]"],
        serde_json::json!([
            {"source": "Manifold[internal]", "target": "Package[bar]"},
            {"source": "Manifold[internal]", "target": "Package[foo]"}
        ])
    );
}

#[test]
fn conflicting_rules_produce_a_detectable_cycle() {
    let reg = registry();
    let before = Manifold::declare(&internal("before"), &reg).unwrap();
    let after = Manifold::declare(
        &RuleDecl::new("A")
            .target_type("package")
            .match_on("title")
            .pattern("foo")
            .relationship("require"),
        &reg,
    )
    .unwrap();

    let mut catalog = tagged_packages();
    before.autorequire(&reg, Some(&mut catalog)).unwrap();
    after.autorequire(&reg, Some(&mut catalog)).unwrap();

    let cycle = graph::find_cycle(catalog.edges()).unwrap();
    assert_eq!(cycle.first(), cycle.last());
    assert!(cycle.contains(&pkg("foo")));
}

#[test]
fn load_reports_missing_files() {
    let err = load::load_registry("/nonexistent/registry.json").unwrap_err();
    assert!(err.to_string().contains("read registry file"));
}
