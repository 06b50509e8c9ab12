use crate::{
    error::Result,
    fixer::{
        Fixer,
        FixContext,
    },
    schemas::V816,
    type_ref::{
        FixTarget,
        TypeRef,
    },
    version::SchemaVersion,
};
use data_tree::Tree;


/// Language codes in the options become lower case.
#[derive(Debug)]
pub struct OptionsLowerCaseLanguageFix;

impl Fixer for OptionsLowerCaseLanguageFix {
    fn name(&self) -> &'static str {
        "OptionsLowerCaseLanguageFix"
    }

    fn version(&self) -> SchemaVersion {
        V816
    }

    fn target(&self) -> FixTarget {
        FixTarget::all(TypeRef::Options)
    }

    fn fix(&self, mut options: Tree, _: &FixContext) -> Result<Tree> {
        let lang = options.get("lang").and_then(Tree::as_str).map(str::to_lowercase);
        if let Some(lang) = lang {
            options.set("lang", lang);
        }
        Ok(options)
    }
}


#[test]
fn test_lower_case_language() {
    let ctx = FixContext { from: crate::schemas::V99, to: V816 };
    let options = Tree::empty_map().with("lang", "en_US").with("fov", 0.5f32);
    let fixed = OptionsLowerCaseLanguageFix.fix(options, &ctx).unwrap();
    assert_eq!(fixed.get_str_or("lang", ""), "en_us");
    assert!(fixed.contains_key("fov"));

    let options = Tree::empty_map().with("lang", 3i32);
    assert_eq!(OptionsLowerCaseLanguageFix.fix(options.clone(), &ctx).unwrap(), options);
}
