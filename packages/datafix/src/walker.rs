//! Static knowledge of where record types nest inside each other, and
//! applying a function to every occurrence of a type within a record.

use crate::{
    error::{
        ErrorKind,
        Result,
    },
    type_ref::TypeRef,
};
use data_tree::Tree;


/// Where a sub-record of some type sits within its parent.
#[derive(Debug, Copy, Clone)]
pub struct Child {
    /// Map keys from the parent to the field.
    pub path: &'static [&'static str],
    /// Whether the field is a list of sub-records rather than one.
    pub list: bool,
    pub type_ref: TypeRef,
}

const fn one(path: &'static [&'static str], type_ref: TypeRef) -> Child {
    Child { path, list: false, type_ref }
}

const fn each(path: &'static [&'static str], type_ref: TypeRef) -> Child {
    Child { path, list: true, type_ref }
}

const CHUNK_CHILDREN: &'static [Child] = &[
    each(&["Level", "TileEntities"], TypeRef::BlockEntity),
    each(&["Level", "Entities"], TypeRef::Entity),
];

const ENTITY_CHILDREN: &'static [Child] = &[
    each(&["Passengers"], TypeRef::Entity),
    one(&["Item"], TypeRef::ItemStack),
    each(&["HandItems"], TypeRef::ItemStack),
    each(&["ArmorItems"], TypeRef::ItemStack),
    each(&["Items"], TypeRef::ItemStack),
];

const BLOCK_ENTITY_CHILDREN: &'static [Child] = &[
    each(&["Items"], TypeRef::ItemStack),
    one(&["RecordItem"], TypeRef::ItemStack),
];

const ITEM_STACK_CHILDREN: &'static [Child] = &[
    one(&["tag", "BlockEntityTag"], TypeRef::BlockEntity),
    one(&["tag", "EntityTag"], TypeRef::Entity),
];

const PLAYER_CHILDREN: &'static [Child] = &[
    each(&["Inventory"], TypeRef::ItemStack),
    each(&["EnderItems"], TypeRef::ItemStack),
];

/// Sub-record slots of a type.
pub fn children(type_ref: TypeRef) -> &'static [Child] {
    match type_ref {
        TypeRef::Chunk => CHUNK_CHILDREN,
        TypeRef::Entity => ENTITY_CHILDREN,
        TypeRef::BlockEntity => BLOCK_ENTITY_CHILDREN,
        TypeRef::ItemStack => ITEM_STACK_CHILDREN,
        TypeRef::Player => PLAYER_CHILDREN,
        TypeRef::Options => &[],
    }
}

/// Whether a record of type `from` may contain, or be, a record of type `to`.
pub fn reaches(from: TypeRef, to: TypeRef) -> bool {
    let mut visited = Vec::new();
    let mut stack = vec![from];
    while let Some(curr) = stack.pop() {
        if curr == to {
            return true;
        }
        if visited.contains(&curr) {
            continue;
        }
        visited.push(curr);
        stack.extend(children(curr).iter().map(|child| child.type_ref));
    }
    false
}

/// Apply `f` to every record of type `target` within `tree`, which is of
/// type `at`, including `tree` itself if `at == target`. Children are visited
/// before their parent.
///
/// A nested sub-record which is not a map, or for which `f` fails with
/// `MalformedData`, is dropped. Other errors abort the whole walk.
pub fn apply_everywhere<F>(
    mut tree: Tree,
    at: TypeRef,
    target: TypeRef,
    f: &mut F,
) -> Result<Tree>
where
    F: FnMut(Tree) -> Result<Tree>,
{
    for child in children(at) {
        if !reaches(child.type_ref, target) {
            continue;
        }
        let (field, parent_path) = match child.path.split_last() {
            Some(split) => split,
            None => continue,
        };
        let parent = match tree.get_path_mut(parent_path) {
            Some(parent) => parent,
            None => continue,
        };

        if child.list {
            if let Some(list) = parent.get_mut(field).and_then(Tree::as_list_mut) {
                let elems = std::mem::take(list);
                let mut kept = Vec::with_capacity(elems.len());
                for elem in elems {
                    if let Some(elem) = apply_nested(elem, child, target, f)? {
                        kept.push(elem);
                    }
                }
                *list = kept;
            }
        } else if let Some(elem) = parent.remove(field) {
            if let Some(elem) = apply_nested(elem, child, target, f)? {
                parent.set(*field, elem);
            }
        }
    }

    if at == target {
        tree = f(tree)?;
    }
    Ok(tree)
}

fn apply_nested<F>(
    elem: Tree,
    child: &Child,
    target: TypeRef,
    f: &mut F,
) -> Result<Option<Tree>>
where
    F: FnMut(Tree) -> Result<Tree>,
{
    if !elem.is_map() {
        warn!(
            path = ?child.path,
            kind = elem.kind_name(),
            "dropping {} sub-record which is not a map",
            child.type_ref,
        );
        return Ok(None);
    }
    match apply_everywhere(elem, child.type_ref, target, f) {
        Ok(elem) => Ok(Some(elem)),
        Err(e) if e.kind() == ErrorKind::MalformedData => {
            warn!(
                path = ?child.path,
                "dropping malformed {} sub-record: {}",
                child.type_ref,
                e,
            );
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
