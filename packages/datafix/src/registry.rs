//! The fixer pipeline.

use crate::{
    error::{
        Result,
        bail,
        ensure,
    },
    fixer::{
        Fixer,
        FixContext,
    },
    schema::Schema,
    type_ref::{
        TypeRef,
        ID_FIELD,
    },
    version::SchemaVersion,
    walker,
};
use data_tree::Tree;
use std::collections::BTreeMap;


/// Builder for a `Registry`.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    schemas: BTreeMap<SchemaVersion, Schema>,
    fixers: Vec<Box<dyn Fixer>>,
    problems: Vec<String>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the schema at `version`, derived from the newest schema
    /// registered so far. Schemas must be added in increasing version order.
    pub fn add_schema<F>(&mut self, version: SchemaVersion, edit: F) -> &mut Self
    where
        F: FnOnce(&mut Schema),
    {
        let mut schema = match self.schemas.iter().next_back() {
            Some((&parent_version, parent)) => {
                if parent_version >= version {
                    self.problems.push(format!(
                        "schema {} added after schema {}", version, parent_version,
                    ));
                    return self;
                }
                parent.derive(version)
            }
            None => Schema::new(version),
        };
        edit(&mut schema);
        self.schemas.insert(version, schema);
        self
    }

    pub fn add_fixer<X: Fixer + 'static>(&mut self, fixer: X) -> &mut Self {
        self.fixers.push(Box::new(fixer));
        self
    }

    /// Validate every fixer against the schema chain and freeze.
    pub fn build(self) -> Result<Registry> {
        let RegistryBuilder { schemas, mut fixers, problems } = self;
        if let Some(problem) = problems.into_iter().next() {
            bail!(SchemaMismatch, None, "{}", problem);
        }
        let current = match schemas.keys().next_back() {
            Some(&current) => current,
            None => bail!(SchemaMismatch, None, "registry has no schemas"),
        };

        // stable, so registration order is kept within a version
        fixers.sort_by_key(|fixer| fixer.version());

        for fixer in &fixers {
            validate_fixer(&schemas, &**fixer)?;
        }

        debug!(
            schemas = schemas.len(),
            fixers = fixers.len(),
            %current,
            "built datafix registry",
        );
        Ok(Registry {
            schemas,
            fixers,
            current,
        })
    }
}

fn validate_fixer(
    schemas: &BTreeMap<SchemaVersion, Schema>,
    fixer: &dyn Fixer,
) -> Result<()> {
    let name = Some(fixer.name());
    let version = fixer.version();
    let target = fixer.target();

    let output = match schemas.get(&version) {
        Some(schema) => schema,
        None => bail!(SchemaMismatch, name, "no schema registered at version {}", version),
    };
    let input = match schemas.range(..version).next_back() {
        Some((_, schema)) => schema,
        None => bail!(SchemaMismatch, name, "no schema precedes version {}", version),
    };

    if let Some(choice) = target.choice {
        ensure!(
            target.type_ref.is_tagged(),
            SchemaMismatch, name,
            "{} has no choices but fixer targets {:?}", target.type_ref, choice,
        );
        ensure!(
            input.has_choice(target.type_ref, choice),
            SchemaMismatch, name,
            "input schema {} has no {} choice {:?}", input.version(), target.type_ref, choice,
        );
    }
    for &produced in fixer.produces() {
        ensure!(
            target.type_ref.is_tagged(),
            SchemaMismatch, name,
            "{} has no choices but fixer produces {:?}", target.type_ref, produced,
        );
        ensure!(
            output.has_choice(target.type_ref, produced),
            SchemaMismatch, name,
            "output schema {} has no {} choice {:?}", version, target.type_ref, produced,
        );
    }
    Ok(())
}


/// Immutable, validated chain of schemas and fixers.
#[derive(Debug)]
pub struct Registry {
    schemas: BTreeMap<SchemaVersion, Schema>,
    fixers: Vec<Box<dyn Fixer>>,
    current: SchemaVersion,
}

impl Registry {
    /// Version of the newest schema.
    pub fn current_version(&self) -> SchemaVersion {
        self.current
    }

    /// The oldest schema, which records without a stamped version belong to.
    pub fn oldest_version(&self) -> SchemaVersion {
        self.schemas.keys().next().copied().unwrap_or(self.current)
    }

    /// Schema in effect at a version: the newest one not newer than it.
    pub fn schema_at(&self, version: SchemaVersion) -> Option<&Schema> {
        self.schemas.range(..=version).next_back().map(|(_, schema)| schema)
    }

    /// All fixers, in application order.
    pub fn fixers(&self) -> impl Iterator<Item=&dyn Fixer> + '_ {
        self.fixers.iter().map(|fixer| &**fixer)
    }

    /// Fixers with versions in `(from, to]`, in application order.
    pub fn fixers_between(
        &self,
        from: SchemaVersion,
        to: SchemaVersion,
    ) -> impl Iterator<Item=&dyn Fixer> + '_ {
        let start = self.fixers.partition_point(|fixer| fixer.version() <= from);
        self.fixers[start..].iter()
            .map(|fixer| &**fixer)
            .take_while(move |fixer| fixer.version() <= to)
    }

    /// Migrate a record of type `type_ref` from one version to another.
    pub fn migrate(
        &self,
        tree: Tree,
        type_ref: TypeRef,
        from: SchemaVersion,
        to: SchemaVersion,
    ) -> Result<Tree> {
        ensure!(
            from <= to,
            VersionOrder, None,
            "cannot migrate {} backwards from {} to {}", type_ref, from, to,
        );
        ensure!(
            to <= self.current,
            VersionOrder, None,
            "cannot migrate {} to {}, newer than current version {}", type_ref, to, self.current,
        );

        let ctx = FixContext { from, to };
        let mut tree = tree;
        for fixer in self.fixers_between(from, to) {
            let target = fixer.target();
            if !walker::reaches(type_ref, target.type_ref) {
                continue;
            }
            trace!(fixer = fixer.name(), version = %fixer.version(), "applying fixer");
            tree = walker::apply_everywhere(
                tree,
                type_ref,
                target.type_ref,
                &mut |node| self.fix_node(fixer, node, &ctx),
            ).map_err(|e| e.in_fixer(fixer.name()))?;
        }
        Ok(tree)
    }

    // apply a fixer to one record of its target type
    fn fix_node(&self, fixer: &dyn Fixer, node: Tree, ctx: &FixContext) -> Result<Tree> {
        let target = fixer.target();
        if !target.matches(&node) {
            return Ok(node);
        }
        if !target.type_ref.is_tagged() {
            return fixer.fix(node, ctx);
        }

        let old_id = node.get_str_or(ID_FIELD, "").to_owned();
        let fixed = fixer.fix(node, ctx)?;
        let new_id = fixed.get_str_or(ID_FIELD, "");
        if new_id != old_id {
            self.check_produced(fixer, &old_id, new_id)?;
        }
        Ok(fixed)
    }

    fn check_produced(&self, fixer: &dyn Fixer, old_id: &str, new_id: &str) -> Result<()> {
        let target = fixer.target();
        let name = Some(fixer.name());
        if target.choice.is_some() && !fixer.produces().contains(&new_id) {
            bail!(
                SchemaMismatch, name,
                "changed {} {:?} to undeclared choice {:?}", target.type_ref, old_id, new_id,
            );
        }
        let defined = self.schemas.get(&fixer.version())
            .map(|schema| schema.has_choice(target.type_ref, new_id))
            .unwrap_or(false);
        ensure!(
            defined,
            SchemaMismatch, name,
            "changed {} {:?} to {:?}, which schema {} does not define",
            target.type_ref, old_id, new_id, fixer.version(),
        );
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ErrorKind,
        type_ref::FixTarget,
    };

    const V1: SchemaVersion = SchemaVersion::of_data(1);
    const V2: SchemaVersion = SchemaVersion::of_data(2);
    const V3: SchemaVersion = SchemaVersion::of_data(3);

    #[derive(Debug)]
    struct Rename {
        version: SchemaVersion,
        from: &'static str,
        to: &'static str,
        produces: &'static [&'static str],
    }

    impl Fixer for Rename {
        fn name(&self) -> &'static str {
            "Rename"
        }

        fn version(&self) -> SchemaVersion {
            self.version
        }

        fn target(&self) -> FixTarget {
            FixTarget::choice(TypeRef::Entity, self.from)
        }

        fn produces(&self) -> &'static [&'static str] {
            self.produces
        }

        fn fix(&self, tree: Tree, _: &FixContext) -> Result<Tree> {
            Ok(tree.with(ID_FIELD, self.to))
        }
    }

    #[derive(Debug)]
    struct Append(SchemaVersion, &'static str);

    impl Fixer for Append {
        fn name(&self) -> &'static str {
            "Append"
        }

        fn version(&self) -> SchemaVersion {
            self.0
        }

        fn target(&self) -> FixTarget {
            FixTarget::all(TypeRef::Options)
        }

        fn fix(&self, mut tree: Tree, _: &FixContext) -> Result<Tree> {
            let log = format!("{}{}", tree.get_str_or("log", ""), self.1);
            tree.set("log", log);
            Ok(tree)
        }
    }

    fn builder() -> RegistryBuilder {
        let mut builder = RegistryBuilder::new();
        builder
            .add_schema(V1, |schema| schema.register_choices(TypeRef::Entity, &["Pig", "Cow"]))
            .add_schema(V2, |schema| schema.rename_choices(TypeRef::Entity, &[("Pig", "pig")]))
            .add_schema(V3, |_| ());
        builder
    }

    #[test]
    fn test_order_within_and_across_versions() {
        let mut builder = builder();
        builder
            .add_fixer(Append(V3, "c"))
            .add_fixer(Append(V2, "a"))
            .add_fixer(Append(V2, "b"));
        let registry = builder.build().unwrap();
        assert_eq!(registry.current_version(), V3);

        let tree = registry.migrate(Tree::empty_map(), TypeRef::Options, V1, V3).unwrap();
        assert_eq!(tree.get_str_or("log", ""), "abc");
        let tree = registry.migrate(Tree::empty_map(), TypeRef::Options, V2, V3).unwrap();
        assert_eq!(tree.get_str_or("log", ""), "c");
        let tree = registry.migrate(Tree::empty_map(), TypeRef::Options, V3, V3).unwrap();
        assert_eq!(tree, Tree::empty_map());
    }

    #[test]
    fn test_backwards_rejected() {
        let registry = builder().build().unwrap();
        let e = registry.migrate(Tree::empty_map(), TypeRef::Options, V3, V1).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::VersionOrder);
        let e = registry
            .migrate(Tree::empty_map(), TypeRef::Options, V1, SchemaVersion::of_data(4))
            .unwrap_err();
        assert_eq!(e.kind(), ErrorKind::VersionOrder);
    }

    #[test]
    fn test_build_rejects_unknown_choice() {
        let mut builder = builder();
        builder.add_fixer(Rename { version: V2, from: "Sheep", to: "sheep", produces: &[] });
        assert_eq!(builder.build().unwrap_err().kind(), ErrorKind::SchemaMismatch);
    }

    #[test]
    fn test_build_rejects_undefined_output() {
        let mut builder = builder();
        builder.add_fixer(Rename { version: V2, from: "Cow", to: "cow", produces: &["cow"] });
        let e = builder.build().unwrap_err();
        assert_eq!(e.kind(), ErrorKind::SchemaMismatch);
        assert_eq!(e.fixer(), Some("Rename"));
    }

    #[test]
    fn test_build_rejects_versions_without_schema() {
        let mut builder = builder();
        builder.add_fixer(Append(SchemaVersion::new(2, 5), "x"));
        assert_eq!(builder.build().unwrap_err().kind(), ErrorKind::SchemaMismatch);

        let mut builder = self::builder();
        builder.add_fixer(Append(V1, "x"));
        assert_eq!(builder.build().unwrap_err().kind(), ErrorKind::SchemaMismatch);
    }

    #[test]
    fn test_build_rejects_schemas_out_of_order() {
        let mut builder = builder();
        builder.add_schema(V2, |_| ());
        assert_eq!(builder.build().unwrap_err().kind(), ErrorKind::SchemaMismatch);
    }

    #[test]
    fn test_runtime_output_checked() {
        let mut builder = builder();
        builder.add_fixer(Rename { version: V2, from: "Pig", to: "pig", produces: &[] });
        let registry = builder.build().unwrap();
        let pig = Tree::empty_map().with(ID_FIELD, "Pig");
        let e = registry.migrate(pig, TypeRef::Entity, V1, V3).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::SchemaMismatch);
        assert_eq!(e.fixer(), Some("Rename"));

        let mut builder = self::builder();
        builder.add_fixer(Rename { version: V2, from: "Pig", to: "pig", produces: &["pig"] });
        let registry = builder.build().unwrap();
        let cow = Tree::empty_map().with(ID_FIELD, "Cow");
        let pig = Tree::empty_map().with(ID_FIELD, "Pig");
        assert_eq!(registry.migrate(cow.clone(), TypeRef::Entity, V1, V3).unwrap(), cow);
        assert_eq!(
            registry.migrate(pig, TypeRef::Entity, V1, V3).unwrap(),
            Tree::empty_map().with(ID_FIELD, "pig"),
        );
    }

    #[test]
    fn test_nested_dispatch() {
        let mut builder = builder();
        builder.add_fixer(Rename { version: V2, from: "Pig", to: "pig", produces: &["pig"] });
        let registry = builder.build().unwrap();
        let item = Tree::empty_map()
            .with("id", "minecraft:spawn_egg")
            .with("tag", Tree::empty_map()
                .with("EntityTag", Tree::empty_map().with(ID_FIELD, "Pig")));
        let item = registry.migrate(item, TypeRef::ItemStack, V1, V3).unwrap();
        assert_eq!(
            item.get_path(&["tag", "EntityTag", "id"]).and_then(Tree::as_str),
            Some("pig"),
        );
    }
}
