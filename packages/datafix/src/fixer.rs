
use crate::{
    error::Result,
    type_ref::FixTarget,
    version::SchemaVersion,
};
use data_tree::Tree;
use std::fmt::Debug;


/// Versions a migration runs between, handed to every fixer it applies.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct FixContext {
    /// Version the record was at when migration started.
    pub from: SchemaVersion,
    /// Version migration will leave the record at.
    pub to: SchemaVersion,
}


/// One named, versioned transformation rule.
///
/// A fixer is given one record of its target type at a time and returns the
/// rewritten record. It must be stateless across invocations. Finding every
/// occurrence of its target type within a larger record is the registry's
/// job, not the fixer's.
pub trait Fixer: Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Schema version this fixer migrates records into.
    fn version(&self) -> SchemaVersion;

    fn target(&self) -> FixTarget;

    /// Choices of the target type this fixer may change a record's `id` to,
    /// other than the input choice itself.
    fn produces(&self) -> &'static [&'static str] {
        &[]
    }

    fn fix(&self, tree: Tree, ctx: &FixContext) -> Result<Tree>;
}
