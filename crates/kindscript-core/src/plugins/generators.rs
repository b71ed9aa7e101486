//! Shared contract generators for the two list-shaped constraint values.

use super::GeneratorResult;
use crate::contract::{Contract, ContractType};
use crate::symbol::SymbolRef;
use crate::views::TypeNodeView;

fn wrong_shape(
    kind_name: &str,
    constraint_name: &str,
    expected: &str,
    value: &TypeNodeView,
) -> String {
    format!(
        "Kind<{kind_name}>: constraint '{constraint_name}' expects {expected}, got {}.",
        value.shape()
    )
}

fn member_not_found(kind_name: &str, member: &str, instance: &SymbolRef) -> String {
    format!(
        "Kind<{kind_name}>: member '{member}' not found in instance '{}'.",
        instance.name()
    )
}

/// One contract per `[a, b]` pair, named `constraint(a -> b)`.
///
/// A value of any other shape yields no contracts and one error. Pairs
/// naming an unknown member are skipped with an error.
#[must_use]
pub fn from_tuple_pairs(
    value: &TypeNodeView,
    instance: &SymbolRef,
    kind_name: &str,
    location: &str,
    contract_type: ContractType,
    constraint_name: &str,
) -> GeneratorResult {
    let mut result = GeneratorResult::default();
    let TypeNodeView::TuplePairs(pairs) = value else {
        result
            .errors
            .push(wrong_shape(kind_name, constraint_name, "tuplePairs", value));
        return result;
    };

    for (first_name, second_name) in pairs {
        let Some(first) = instance.find_by_path(first_name) else {
            result
                .errors
                .push(member_not_found(kind_name, first_name, instance));
            continue;
        };
        let Some(second) = instance.find_by_path(second_name) else {
            result
                .errors
                .push(member_not_found(kind_name, second_name, instance));
            continue;
        };
        result.contracts.push(
            Contract::new(
                contract_type,
                format!("{constraint_name}({first_name} -> {second_name})"),
                vec![first.clone(), second.clone()],
            )
            .with_location(location),
        );
    }
    result
}

/// A single collective contract over every resolvable name in the list.
///
/// Unknown names are reported; the rest still form the contract. Nothing
/// is generated when no name resolves. A value that is not a string list
/// is reported and yields no contract.
#[must_use]
pub fn from_string_list(
    value: &TypeNodeView,
    instance: &SymbolRef,
    kind_name: &str,
    location: &str,
    contract_type: ContractType,
    constraint_name: &str,
) -> GeneratorResult {
    let mut result = GeneratorResult::default();
    let TypeNodeView::StringList(names) = value else {
        result
            .errors
            .push(wrong_shape(kind_name, constraint_name, "stringList", value));
        return result;
    };

    let mut args: Vec<SymbolRef> = Vec::new();
    for name in names {
        match instance.find_by_path(name) {
            Some(symbol) => args.push(symbol.clone()),
            None => result.errors.push(member_not_found(kind_name, name, instance)),
        }
    }

    if !args.is_empty() {
        let arg_names: Vec<&str> = args.iter().map(|s| s.name()).collect();
        result.contracts.push(
            Contract::new(
                contract_type,
                format!("{constraint_name}({})", arg_names.join(", ")),
                args,
            )
            .with_location(location),
        );
    }
    result
}
