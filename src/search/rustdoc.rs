//! Item kinds and conversion of rustdoc JSON into search entries.
//!
//! This module provides the `ItemKind` enumeration used by the index and the query
//! syntax, along with the adapter that walks a rustdoc `Crate` and produces one
//! [`Entry`] per documented item (plus inherent and trait methods).

use rmcp::schemars;
use rustdoc_types::{Crate, Id, Item, ItemEnum, ItemKind as RustdocItemKind, Type};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::index::{Entry, Signature};

/// DO NOT add doc comments to individual variants - this causes schemars to generate
/// `oneOf` schemas instead of simple `enum` arrays, breaking MCP client enum handling.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, schemars::JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Module,
    Struct,
    Enum,
    Union,
    Function,
    Method,
    Trait,
    TypeAlias,
    Constant,
    Static,
    Macro,
    Primitive,
    Variant,
}

impl ItemKind {
    /// Short keyword used in query filters and output, e.g. `fn` or `mod`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Module => "mod",
            Self::Struct => "struct",
            Self::Enum => "enum",
            Self::Union => "union",
            Self::Function => "fn",
            Self::Method => "method",
            Self::Trait => "trait",
            Self::TypeAlias => "type",
            Self::Constant => "const",
            Self::Static => "static",
            Self::Macro => "macro",
            Self::Primitive => "primitive",
            Self::Variant => "variant",
        }
    }

    /// Whether an entry of kind `other` satisfies a `self:` query filter.
    ///
    /// `fn:` also accepts methods; every other filter is exact.
    pub fn accepts(self, other: Self) -> bool {
        self == other || (self == Self::Function && other == Self::Method)
    }

    /// Convert a rustdoc item kind. Returns `None` for kinds that are never searchable
    /// on their own (impls, uses, fields, ...).
    pub fn from_rustdoc(kind: RustdocItemKind) -> Option<Self> {
        Some(match kind {
            RustdocItemKind::Module => Self::Module,
            RustdocItemKind::Struct => Self::Struct,
            RustdocItemKind::Enum => Self::Enum,
            RustdocItemKind::Union => Self::Union,
            RustdocItemKind::Function => Self::Function,
            RustdocItemKind::Trait | RustdocItemKind::TraitAlias => Self::Trait,
            RustdocItemKind::TypeAlias => Self::TypeAlias,
            RustdocItemKind::Constant | RustdocItemKind::AssocConst => Self::Constant,
            RustdocItemKind::Static => Self::Static,
            RustdocItemKind::Macro
            | RustdocItemKind::ProcAttribute
            | RustdocItemKind::ProcDerive => Self::Macro,
            RustdocItemKind::Primitive => Self::Primitive,
            RustdocItemKind::Variant => Self::Variant,
            _ => return None,
        })
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "mod" | "module" => Self::Module,
            "struct" => Self::Struct,
            "enum" => Self::Enum,
            "union" => Self::Union,
            "fn" | "function" => Self::Function,
            "method" | "tymethod" => Self::Method,
            "trait" => Self::Trait,
            "type" | "typealias" => Self::TypeAlias,
            "const" | "constant" => Self::Constant,
            "static" => Self::Static,
            "macro" => Self::Macro,
            "primitive" => Self::Primitive,
            "variant" => Self::Variant,
            _ => return Err(()),
        })
    }
}

/// Builds search entries from a rustdoc JSON crate.
///
/// Every local item listed in `Crate::paths` becomes an entry whose path is
/// everything but the last segment. Methods are not listed in `paths`, so
/// inherent impl items and trait items are added as `Method` entries under the
/// owning type or trait. The result is sorted by path, name, then kind.
pub fn entries_from_crate(krate: &Crate) -> Vec<Entry> {
    let mut entries = Vec::new();

    for (id, summary) in &krate.paths {
        // Only items defined in this crate; external crates are indexed from their own JSON
        if summary.crate_id != 0 {
            continue;
        }
        let Some(kind) = ItemKind::from_rustdoc(summary.kind) else {
            continue;
        };
        let Some((name, path)) = summary.path.split_last() else {
            continue;
        };

        let item = krate.index.get(id);
        entries.push(Entry {
            path: path.to_vec(),
            name: name.clone(),
            kind,
            signature: item.and_then(|item| function_signature(krate, item)),
        });

        if let Some(item) = item {
            entries.extend(
                member_functions(krate, item)
                    .into_iter()
                    .filter_map(|method| method_entry(krate, &summary.path, method)),
            );
        }
    }

    entries.sort_by(|a, b| {
        a.path
            .cmp(&b.path)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.kind.cmp(&b.kind))
    });
    tracing::debug!(
        "Extracted {} entries from rustdoc crate ({} paths)",
        entries.len(),
        krate.paths.len()
    );
    entries
}

/// Functions declared in inherent impls of a type, or in a trait body.
fn member_functions<'a>(krate: &'a Crate, item: &'a Item) -> Vec<&'a Item> {
    let member_ids: Vec<&Id> = match &item.inner {
        ItemEnum::Trait(trait_item) => trait_item.items.iter().collect(),
        ItemEnum::Struct(struct_item) => inherent_impl_items(krate, &struct_item.impls),
        ItemEnum::Enum(enum_item) => inherent_impl_items(krate, &enum_item.impls),
        ItemEnum::Union(union_item) => inherent_impl_items(krate, &union_item.impls),
        ItemEnum::Primitive(primitive) => inherent_impl_items(krate, &primitive.impls),
        _ => return Vec::new(),
    };

    member_ids
        .into_iter()
        .filter_map(|member_id| krate.index.get(member_id))
        .filter(|member| matches!(member.inner, ItemEnum::Function(_)))
        .collect()
}

/// Item ids of the inherent (non-trait) impls among `impls`.
fn inherent_impl_items<'a>(krate: &'a Crate, impls: &'a [Id]) -> Vec<&'a Id> {
    impls
        .iter()
        .filter_map(|impl_id| krate.index.get(impl_id))
        .filter_map(|candidate| match &candidate.inner {
            ItemEnum::Impl(impl_item) if impl_item.trait_.is_none() => Some(&impl_item.items),
            _ => None,
        })
        .flatten()
        .collect()
}

fn method_entry(krate: &Crate, owner_path: &[String], method: &Item) -> Option<Entry> {
    let name = method.name.as_ref()?;
    Some(Entry {
        path: owner_path.to_vec(),
        name: name.clone(),
        kind: ItemKind::Method,
        signature: function_signature(krate, method),
    })
}

/// Summarize a function's parameter and return types as bare type names.
fn function_signature(krate: &Crate, item: &Item) -> Option<Signature> {
    let ItemEnum::Function(function) = &item.inner else {
        return None;
    };

    let inputs = function
        .sig
        .inputs
        .iter()
        .filter_map(|(_, ty)| type_name(krate, ty))
        .collect();
    let output = function
        .sig
        .output
        .iter()
        .filter_map(|ty| type_name(krate, ty))
        .collect();

    Some(Signature { inputs, output })
}

/// Bare name of a type, looking through references, pointers, slices and arrays.
fn type_name(krate: &Crate, ty: &Type) -> Option<String> {
    match ty {
        Type::ResolvedPath(path) => krate
            .paths
            .get(&path.id)
            .and_then(|summary| summary.path.last())
            .cloned(),
        Type::Generic(name) | Type::Primitive(name) => Some(name.clone()),
        Type::BorrowedRef { type_, .. } | Type::RawPointer { type_, .. } => type_name(krate, type_),
        Type::Slice(inner) => type_name(krate, inner),
        Type::Array { type_, .. } => type_name(krate, type_),
        _ => None,
    }
}
