use crate::{
    error::Result,
    fixer::{
        Fixer,
        FixContext,
    },
    schemas::V1451_6,
    type_ref::{
        FixTarget,
        TypeRef,
        ID_FIELD,
    },
    version::SchemaVersion,
};
use data_tree::Tree;


// numeric item id of the first music disc
const FIRST_RECORD: i32 = 2256;

const DISCS: [&'static str; 12] = [
    "13",
    "cat",
    "blocks",
    "chirp",
    "far",
    "mall",
    "mellohi",
    "stal",
    "strad",
    "ward",
    "11",
    "wait",
];

/// Item id of a music disc by its legacy numeric item id.
fn music_disc(record: i32) -> Option<String> {
    usize::try_from(record - FIRST_RECORD).ok()
        .and_then(|i| DISCS.get(i))
        .map(|disc| format!("minecraft:music_disc_{}", disc))
}


/// Jukeboxes hold their disc as an item stack rather than a numeric item id.
#[derive(Debug)]
pub struct BlockEntityJukeboxFix;

impl Fixer for BlockEntityJukeboxFix {
    fn name(&self) -> &'static str {
        "BlockEntityJukeboxFix"
    }

    fn version(&self) -> SchemaVersion {
        V1451_6
    }

    fn target(&self) -> FixTarget {
        FixTarget::choice(TypeRef::BlockEntity, "minecraft:jukebox")
    }

    fn fix(&self, mut jukebox: Tree, _: &FixContext) -> Result<Tree> {
        let record = jukebox.get_i32_or("Record", 0);
        if record <= 0 {
            return Ok(jukebox);
        }
        jukebox.remove("Record");
        match music_disc(record) {
            Some(disc) => {
                let item = Tree::empty_map()
                    .with(ID_FIELD, disc)
                    .with("Count", 1i8);
                jukebox.set("RecordItem", item);
            }
            None => debug!(record, "dropping unknown jukebox record"),
        }
        Ok(jukebox)
    }
}


#[test]
fn test_jukebox_record() {
    let ctx = FixContext { from: crate::schemas::V99, to: V1451_6 };
    let jukebox = |record: i32| Tree::empty_map()
        .with(ID_FIELD, "minecraft:jukebox")
        .with("Record", record);

    let fixed = BlockEntityJukeboxFix.fix(jukebox(2257), &ctx).unwrap();
    assert!(!fixed.contains_key("Record"));
    assert_eq!(
        fixed.get_path(&["RecordItem", "id"]).and_then(Tree::as_str),
        Some("minecraft:music_disc_cat"),
    );
    assert_eq!(fixed.get_path(&["RecordItem", "Count"]).and_then(Tree::as_i32), Some(1));

    let fixed = BlockEntityJukeboxFix.fix(jukebox(1), &ctx).unwrap();
    assert!(!fixed.contains_key("Record"));
    assert!(!fixed.contains_key("RecordItem"));

    assert_eq!(BlockEntityJukeboxFix.fix(jukebox(0), &ctx).unwrap(), jukebox(0));
}
