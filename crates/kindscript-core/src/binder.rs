//! The binder: turns Kind and Instance views into symbols and contracts.
//!
//! A run has four stages:
//!
//! 1. collect every Kind definition from every file (a later definition with
//!    the same name replaces an earlier one);
//! 2. resolve each Instance declaration against its Kind and build its
//!    member tree, rooted at the directory of the declaring file;
//! 3. walk each Kind's constraint tree and let the matching plugin generate
//!    contracts for every instance of that Kind;
//! 4. propagate intrinsic constraints from member Kinds onto the members
//!    that use them.
//!
//! Problems never abort a run. They are collected as strings in
//! [`Classification::errors`] next to whatever could still be bound.

use crate::contract::Contract;
use crate::plugins::PluginRegistry;
use crate::provider::AstViewProvider;
use crate::symbol::{ArchSymbol, Carrier, SymbolKind, SymbolRef};
use crate::utils::paths::{dirname_path, join_path};
use crate::views::{KindDefinitionView, MemberValueView, TypeNodeView};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Everything produced by one binder run.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    /// Instance symbols in discovery order, followed by one Kind symbol per
    /// definition.
    pub symbols: Vec<SymbolRef>,
    /// Generated and propagated contracts.
    pub contracts: Vec<Contract>,
    /// Instance variable name to Kind name.
    pub instance_kinds: HashMap<String, String>,
    /// Recoverable classification errors.
    pub errors: Vec<String>,
}

impl Classification {
    /// Instance symbols only.
    pub fn instances(&self) -> impl Iterator<Item = &SymbolRef> {
        self.symbols
            .iter()
            .filter(|s| s.kind() == SymbolKind::Instance)
    }
}

/// Kind definitions keyed by name, remembering first-seen order.
#[derive(Debug, Default)]
struct KindCatalog {
    order: Vec<String>,
    defs: HashMap<String, KindDefinitionView>,
}

impl KindCatalog {
    fn insert(&mut self, view: KindDefinitionView) {
        if self.defs.contains_key(&view.type_name) {
            warn!(kind = %view.type_name, "Kind redefined; the later definition wins");
        } else {
            self.order.push(view.type_name.clone());
        }
        self.defs.insert(view.type_name.clone(), view);
    }

    fn get(&self, name: &str) -> Option<&KindDefinitionView> {
        self.defs.get(name)
    }

    fn iter(&self) -> impl Iterator<Item = &KindDefinitionView> {
        self.order.iter().filter_map(|name| self.defs.get(name))
    }
}

/// Classifies Kind and Instance declarations.
pub struct Binder<'r> {
    registry: &'r PluginRegistry,
}

impl<'r> Binder<'r> {
    /// Creates a binder that resolves constraint names through `registry`.
    #[must_use]
    pub fn new(registry: &'r PluginRegistry) -> Self {
        Self { registry }
    }

    /// Runs classification over `files`.
    pub fn classify(&self, files: &[String], views: &dyn AstViewProvider) -> Classification {
        let mut out = Classification::default();

        let mut catalog = KindCatalog::default();
        for file in files {
            let kinds = views.kind_definitions(file);
            out.errors.extend(kinds.errors);
            for view in kinds.items {
                debug!(kind = %view.type_name, file = %file, "found Kind definition");
                catalog.insert(view);
            }
        }

        let mut instances_by_kind: HashMap<String, Vec<SymbolRef>> = HashMap::new();
        for file in files {
            let decls = views.instance_declarations(file);
            out.errors.extend(decls.errors);
            for view in decls.items {
                let Some(kind_def) = catalog.get(&view.kind_type_name) else {
                    out.errors.push(format!(
                        "InstanceConfig<{0}>: no Kind definition found for '{0}'.",
                        view.kind_type_name
                    ));
                    continue;
                };

                let root = dirname_path(file);
                let mut symbol = ArchSymbol::new(&view.variable_name, SymbolKind::Instance)
                    .with_carrier(Carrier::path(&root))
                    .with_kind_type_name(&view.kind_type_name);
                for member in build_members(kind_def, &root, &view.members, &catalog) {
                    symbol = symbol.with_member(member);
                }
                let symbol = Arc::new(symbol);
                debug!(instance = %view.variable_name, root = %root, "bound instance");

                out.symbols.push(Arc::clone(&symbol));
                instances_by_kind
                    .entry(view.kind_type_name.clone())
                    .or_default()
                    .push(symbol);
                out.instance_kinds
                    .insert(view.variable_name, view.kind_type_name);
            }
        }

        for kind_def in catalog.iter() {
            let Some(instances) = instances_by_kind.get(&kind_def.type_name) else {
                continue;
            };
            let location = format!("type:{}", kind_def.type_name);
            for instance in instances {
                if let Some(constraints) = &kind_def.constraints {
                    self.walk_constraints(
                        constraints,
                        instance,
                        &kind_def.type_name,
                        &location,
                        "",
                        &mut out,
                    );
                }
                self.propagate_intrinsics(kind_def, instance, &catalog, &location, &mut out.contracts);
            }
        }

        for kind_def in catalog.iter() {
            out.symbols
                .push(Arc::new(ArchSymbol::new(&kind_def.type_name, SymbolKind::Kind)));
        }

        info!(
            symbols = out.symbols.len(),
            contracts = out.contracts.len(),
            errors = out.errors.len(),
            "classification complete"
        );
        out
    }

    fn walk_constraints(
        &self,
        view: &TypeNodeView,
        instance: &SymbolRef,
        kind_name: &str,
        location: &str,
        prefix: &str,
        out: &mut Classification,
    ) {
        let Some(props) = view.properties() else {
            return;
        };

        for prop in props {
            let full_name = if prefix.is_empty() {
                prop.name.clone()
            } else {
                format!("{prefix}.{}", prop.name)
            };

            if matches!(prop.value, TypeNodeView::Object(_)) {
                self.walk_constraints(&prop.value, instance, kind_name, location, &full_name, out);
                continue;
            }

            let Some(plugin) = self.registry.by_constraint_name(&full_name) else {
                out.errors
                    .push(format!("Unknown constraint '{full_name}' in Kind<{kind_name}>."));
                continue;
            };

            // Intrinsic-only plugins return None and are handled by propagation.
            if let Some(result) = plugin.generate(&prop.value, instance, kind_name, location) {
                out.contracts.extend(result.contracts);
                out.errors.extend(result.errors);
            }
        }
    }

    fn propagate_intrinsics(
        &self,
        kind_def: &KindDefinitionView,
        instance: &SymbolRef,
        catalog: &KindCatalog,
        location: &str,
        contracts: &mut Vec<Contract>,
    ) {
        for member in &kind_def.members {
            let Some(member_kind) = member.kind_type_name.as_deref() else {
                continue;
            };
            let Some(constraints) = catalog.get(member_kind).and_then(|k| k.constraints.as_ref())
            else {
                continue;
            };

            for intrinsic in self.registry.intrinsics() {
                if !intrinsic.detect(constraints) {
                    continue;
                }
                let Some(symbol) = instance.find_by_path(&member.name) else {
                    continue;
                };
                let contract = intrinsic.propagate(symbol, &member.name, location);
                let duplicate = contracts.iter().any(|c| {
                    c.contract_type() == contract.contract_type()
                        && c.args().len() == 1
                        && Arc::ptr_eq(&c.args()[0], symbol)
                });
                if !duplicate {
                    contracts.push(contract);
                }
            }
        }
    }
}

fn build_members(
    kind_def: &KindDefinitionView,
    parent_path: &str,
    values: &[MemberValueView],
    catalog: &KindCatalog,
) -> Vec<ArchSymbol> {
    kind_def
        .members
        .iter()
        .map(|descriptor| {
            let path = join_path(parent_path, &descriptor.name);
            let value = values.iter().find(|v| v.name == descriptor.name);
            let child_kind = descriptor
                .kind_type_name
                .as_deref()
                .and_then(|name| catalog.get(name));

            let mut symbol = ArchSymbol::new(&descriptor.name, SymbolKind::Member)
                .with_carrier(Carrier::path(&path))
                .location_derived(true);
            if let Some(kind_name) = &descriptor.kind_type_name {
                symbol = symbol.with_kind_type_name(kind_name);
            }

            if let (Some(child_kind), Some(children)) =
                (child_kind, value.and_then(|v| v.children.as_deref()))
            {
                if !child_kind.members.is_empty() {
                    for child in build_members(child_kind, &path, children, catalog) {
                        symbol = symbol.with_member(child);
                    }
                }
            }
            symbol
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::ContractType;
    use crate::views::{
        Extracted, InstanceDeclarationView, MemberDescriptor, PropertyView,
    };

    #[derive(Default)]
    struct FakeViews {
        kinds: HashMap<String, Vec<KindDefinitionView>>,
        instances: HashMap<String, Vec<InstanceDeclarationView>>,
    }

    impl FakeViews {
        fn kind(
            mut self,
            file: &str,
            name: &str,
            members: &[(&str, Option<&str>)],
            constraints: Option<TypeNodeView>,
        ) -> Self {
            self.kinds.entry(file.into()).or_default().push(KindDefinitionView {
                type_name: name.into(),
                members: members
                    .iter()
                    .map(|(n, k)| MemberDescriptor::new(*n, *k))
                    .collect(),
                constraints,
            });
            self
        }

        fn instance(mut self, file: &str, var: &str, kind: &str, members: Vec<MemberValueView>) -> Self {
            self.instances
                .entry(file.into())
                .or_default()
                .push(InstanceDeclarationView {
                    variable_name: var.into(),
                    kind_type_name: kind.into(),
                    members,
                });
            self
        }
    }

    impl AstViewProvider for FakeViews {
        fn kind_definitions(&self, file: &str) -> Extracted<KindDefinitionView> {
            Extracted::ok(self.kinds.get(file).cloned().unwrap_or_default())
        }

        fn instance_declarations(&self, file: &str) -> Extracted<InstanceDeclarationView> {
            Extracted::ok(self.instances.get(file).cloned().unwrap_or_default())
        }
    }

    fn pure() -> Option<TypeNodeView> {
        Some(TypeNodeView::Object(vec![PropertyView::new(
            "pure",
            TypeNodeView::Boolean(true),
        )]))
    }

    fn no_dep(pairs: &[(&str, &str)]) -> PropertyView {
        PropertyView::new(
            "noDependency",
            TypeNodeView::TuplePairs(
                pairs
                    .iter()
                    .map(|(a, b)| ((*a).to_string(), (*b).to_string()))
                    .collect(),
            ),
        )
    }

    fn files(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    fn clean_context() -> FakeViews {
        FakeViews::default()
            .kind("/p/defs.ts", "DomainLayer", &[], pure())
            .kind("/p/defs.ts", "InfraLayer", &[], None)
            .kind(
                "/p/defs.ts",
                "Clean",
                &[("domain", Some("DomainLayer")), ("infra", Some("InfraLayer"))],
                Some(TypeNodeView::Object(vec![no_dep(&[("domain", "infra")])])),
            )
            .instance(
                "/p/src/ctx.ts",
                "ctx",
                "Clean",
                vec![MemberValueView::leaf("domain"), MemberValueView::leaf("infra")],
            )
    }

    #[test]
    fn binds_instance_with_derived_members() {
        let registry = PluginRegistry::builtin();
        let result = Binder::new(&registry)
            .classify(&files(&["/p/defs.ts", "/p/src/ctx.ts"]), &clean_context());

        assert!(result.errors.is_empty(), "{:?}", result.errors);
        let instance = result.instances().next().cloned();
        let instance = instance.as_deref();
        assert_eq!(instance.and_then(ArchSymbol::carrier_key), Some("/p/src"));
        let domain = instance.and_then(|i| i.find_member("domain"));
        assert_eq!(domain.and_then(|d| d.carrier_key()), Some("/p/src/domain"));
        assert!(domain.is_some_and(|d| d.is_location_derived()));
        assert_eq!(result.instance_kinds.get("ctx").map(String::as_str), Some("Clean"));
    }

    #[test]
    fn generates_and_propagates_contracts() {
        let registry = PluginRegistry::builtin();
        let result = Binder::new(&registry)
            .classify(&files(&["/p/defs.ts", "/p/src/ctx.ts"]), &clean_context());

        let names: Vec<&str> = result.contracts.iter().map(Contract::name).collect();
        assert_eq!(names, vec!["noDependency(domain -> infra)", "purity(domain)"]);
        assert!(result
            .contracts
            .iter()
            .all(|c| c.location() == Some("type:Clean")));
    }

    #[test]
    fn kind_symbols_follow_instances() {
        let registry = PluginRegistry::builtin();
        let result = Binder::new(&registry)
            .classify(&files(&["/p/defs.ts", "/p/src/ctx.ts"]), &clean_context());
        let kinds: Vec<&str> = result
            .symbols
            .iter()
            .filter(|s| s.kind() == SymbolKind::Kind)
            .map(|s| s.name())
            .collect();
        assert_eq!(kinds, vec!["DomainLayer", "InfraLayer", "Clean"]);
        assert!(result
            .symbols
            .iter()
            .filter(|s| s.kind() == SymbolKind::Kind)
            .all(|s| s.carrier().is_none()));
        assert_eq!(result.symbols[0].kind(), SymbolKind::Instance);
    }

    #[test]
    fn missing_kind_is_recoverable() {
        let views = clean_context().instance("/p/other/x.ts", "x", "Ghost", vec![]);
        let registry = PluginRegistry::builtin();
        let result = Binder::new(&registry)
            .classify(&files(&["/p/defs.ts", "/p/src/ctx.ts", "/p/other/x.ts"]), &views);
        assert_eq!(
            result.errors,
            vec!["InstanceConfig<Ghost>: no Kind definition found for 'Ghost'."]
        );
        assert_eq!(result.instances().count(), 1);
    }

    #[test]
    fn unknown_constraint_is_reported() {
        let views = FakeViews::default()
            .kind(
                "/p/a.ts",
                "App",
                &[("a", None)],
                Some(TypeNodeView::Object(vec![PropertyView::new(
                    "filesystem",
                    TypeNodeView::Object(vec![PropertyView::new(
                        "teleport",
                        TypeNodeView::Boolean(true),
                    )]),
                )])),
            )
            .instance("/p/a.ts", "app", "App", vec![]);
        let registry = PluginRegistry::builtin();
        let result = Binder::new(&registry).classify(&files(&["/p/a.ts"]), &views);
        assert_eq!(
            result.errors,
            vec!["Unknown constraint 'filesystem.teleport' in Kind<App>."]
        );
    }

    #[test]
    fn mis_shaped_constraint_value_is_reported() {
        let views = FakeViews::default()
            .kind(
                "/p/a.ts",
                "App",
                &[("domain", None), ("infra", None)],
                Some(TypeNodeView::Object(vec![PropertyView::new(
                    "noDependency",
                    TypeNodeView::StringList(vec!["domain".into(), "infra".into()]),
                )])),
            )
            .instance(
                "/p/src/app.ts",
                "app",
                "App",
                vec![MemberValueView::leaf("domain"), MemberValueView::leaf("infra")],
            );
        let registry = PluginRegistry::builtin();
        let result =
            Binder::new(&registry).classify(&files(&["/p/a.ts", "/p/src/app.ts"]), &views);
        assert!(result.contracts.is_empty());
        assert_eq!(
            result.errors,
            vec!["Kind<App>: constraint 'noDependency' expects tuplePairs, got stringList."]
        );
    }

    #[test]
    fn dotted_constraint_names_reach_plugins() {
        let views = FakeViews::default()
            .kind(
                "/p/a.ts",
                "App",
                &[("a", None), ("b", None)],
                Some(TypeNodeView::Object(vec![PropertyView::new(
                    "filesystem",
                    TypeNodeView::Object(vec![PropertyView::new(
                        "exists",
                        TypeNodeView::StringList(vec!["a".into(), "b".into()]),
                    )]),
                )])),
            )
            .instance("/p/a.ts", "app", "App", vec![]);
        let registry = PluginRegistry::builtin();
        let result = Binder::new(&registry).classify(&files(&["/p/a.ts"]), &views);
        assert_eq!(result.contracts.len(), 1);
        assert_eq!(result.contracts[0].contract_type(), ContractType::Exists);
        assert_eq!(result.contracts[0].name(), "filesystem.exists(a, b)");
    }

    #[test]
    fn nested_members_recurse_only_with_children() {
        let views = FakeViews::default()
            .kind("/p/a.ts", "Ctx", &[("domain", None)], None)
            .kind("/p/a.ts", "App", &[("ordering", Some("Ctx")), ("billing", Some("Ctx"))], None)
            .instance(
                "/p/a.ts",
                "app",
                "App",
                vec![
                    MemberValueView::nested("ordering", vec![MemberValueView::leaf("domain")]),
                    MemberValueView::leaf("billing"),
                ],
            );
        let registry = PluginRegistry::builtin();
        let result = Binder::new(&registry).classify(&files(&["/p/a.ts"]), &views);
        let app = result.instances().next().cloned();
        let app = app.as_deref();
        let nested = app.and_then(|a| a.find_by_path("ordering.domain"));
        assert_eq!(nested.and_then(|s| s.carrier_key()), Some("/p/ordering/domain"));
        assert!(app
            .and_then(|a| a.find_member("billing"))
            .is_some_and(|b| b.members().is_empty()));
    }

    #[test]
    fn later_kind_definition_wins() {
        let views = FakeViews::default()
            .kind("/p/a.ts", "App", &[("old", None)], None)
            .kind("/p/b.ts", "App", &[("new", None)], None)
            .instance("/p/b.ts", "app", "App", vec![]);
        let registry = PluginRegistry::builtin();
        let result = Binder::new(&registry).classify(&files(&["/p/a.ts", "/p/b.ts"]), &views);
        let app = result.instances().next().cloned();
        assert!(app.as_deref().is_some_and(|a| a.find_member("new").is_some()));
        assert!(app.as_deref().is_some_and(|a| a.find_member("old").is_none()));
    }

    #[test]
    fn sibling_instances_each_get_purity() {
        let views = FakeViews::default()
            .kind("/p/k.ts", "M", &[], pure())
            .kind("/p/k.ts", "K", &[("m", Some("M"))], None)
            .instance("/p/one/a.ts", "one", "K", vec![])
            .instance("/p/two/a.ts", "two", "K", vec![]);
        let registry = PluginRegistry::builtin();
        let result = Binder::new(&registry)
            .classify(&files(&["/p/k.ts", "/p/one/a.ts", "/p/two/a.ts"]), &views);
        let purity: Vec<_> = result
            .contracts
            .iter()
            .filter(|c| c.contract_type() == ContractType::Purity)
            .collect();
        assert_eq!(purity.len(), 2);
        assert!(!Arc::ptr_eq(&purity[0].args()[0], &purity[1].args()[0]));
    }

    #[test]
    fn propagation_skips_member_already_covered() {
        let registry = PluginRegistry::builtin();
        let binder = Binder::new(&registry);
        let mut catalog = KindCatalog::default();
        catalog.insert(KindDefinitionView {
            type_name: "M".into(),
            members: vec![],
            constraints: pure(),
        });
        let k = KindDefinitionView {
            type_name: "K".into(),
            members: vec![MemberDescriptor::new("m", Some("M"))],
            constraints: None,
        };
        catalog.insert(k.clone());

        let make = |root: &str| -> SymbolRef {
            let mut s = ArchSymbol::new(root, SymbolKind::Instance).with_carrier(Carrier::path(root));
            for m in build_members(&k, root, &[], &catalog) {
                s = s.with_member(m);
            }
            Arc::new(s)
        };
        let first = make("/p/one");
        let second = make("/p/two");

        let first_m = first.find_member("m").cloned();
        let mut contracts: Vec<Contract> = first_m
            .into_iter()
            .map(|m| Contract::new(ContractType::Purity, "purity(m)", vec![m]))
            .collect();

        binder.propagate_intrinsics(&k, &first, &catalog, "type:K", &mut contracts);
        binder.propagate_intrinsics(&k, &second, &catalog, "type:K", &mut contracts);

        assert_eq!(contracts.len(), 2);
        let targets_first = contracts
            .iter()
            .filter(|c| first.find_member("m").is_some_and(|m| Arc::ptr_eq(&c.args()[0], m)))
            .count();
        assert_eq!(targets_first, 1);
    }

    #[test]
    fn classification_is_repeatable() {
        let registry = PluginRegistry::builtin();
        let binder = Binder::new(&registry);
        let input = files(&["/p/defs.ts", "/p/src/ctx.ts"]);
        let views = clean_context();
        let a = binder.classify(&input, &views);
        let b = binder.classify(&input, &views);

        fn same_tree(x: &ArchSymbol, y: &ArchSymbol) -> bool {
            x == y
                && x.members().len() == y.members().len()
                && x.members()
                    .iter()
                    .zip(y.members())
                    .all(|(m, n)| same_tree(m, n))
        }

        assert_eq!(a.symbols.len(), b.symbols.len());
        assert!(a.symbols.iter().zip(&b.symbols).all(|(x, y)| same_tree(x, y)));
        let names = |c: &Classification| -> Vec<String> {
            c.contracts.iter().map(|k| k.name().to_string()).collect()
        };
        assert_eq!(names(&a), names(&b));
    }
}
