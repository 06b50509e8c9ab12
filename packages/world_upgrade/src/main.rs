#[macro_use]
extern crate tracing;

use world_upgrade::{
    logging::init_logging,
    settings::{
        UpgradeSettings,
        SETTINGS_FILE_NAME,
    },
    batch::Batch,
};
use datafix::{
    TypeRef,
    default_registry,
};
use std::{
    env::args,
    path::Path,
    process,
    sync::Arc,
};
use anyhow::{
    Context,
    Result,
    anyhow,
};


const CLI_INTRO: &'static str = r#"World upgrade.

Upgrades stored world records to the current data version."#;

const CLI_HELP: &'static str = r#"
Examples:

    [this command] --input=world/chunks --output=upgraded/chunks
    Upgrade every chunk record file in a directory.

    [this command] --input=world/players --output=upgraded/players --type=player
    Upgrade records of another type. Types are chunk, block_entity, entity,
    item_stack, player and options.

    [this command] --input=in --output=out --settings=my_settings.json --threads=4
    Use another settings file, and override its thread count.

Settings (upgrade_settings.json by default, all fields optional):
    threads, target_version, version_field, on_failure (Skip or WriteDefault), pretty

Env var examples:
    RUST_LOG=datafix=trace
    Changes logging levels"#;


fn main() {
    println!("{}", CLI_INTRO);
    if let Err(e) = init_logging() {
        eprintln!("{:#}", e);
    }

    let args = args().collect::<Vec<_>>();
    if args.get(1).map(String::as_str) == Some("--help") {
        println!("{}", CLI_HELP);
        return;
    }
    match run_from_cli(&args) {
        Ok(0) => (),
        Ok(failed) => {
            warn!(failed, "some records failed to upgrade");
            process::exit(2);
        }
        Err(e) => {
            error!("{:?}", e);
            process::exit(1);
        }
    }
}

// value of a `--name=value` arg
fn arg<'a>(args: &'a [String], prefix: &str) -> Option<&'a str> {
    args.iter()
        .filter_map(|arg| arg.strip_prefix(prefix))
        .next()
}

// parse CLI args and run the batch, returning the number of failed records
fn run_from_cli(args: &[String]) -> Result<usize> {
    let settings_path = arg(args, "--settings=").unwrap_or(SETTINGS_FILE_NAME);
    let mut settings = UpgradeSettings::read(settings_path);
    if let Some(threads) = arg(args, "--threads=") {
        settings.threads = Some(threads.parse().context("invalid --threads")?);
    }
    let input = arg(args, "--input=")
        .ok_or_else(|| anyhow!("missing --input=, see --help"))?;
    let output = arg(args, "--output=")
        .ok_or_else(|| anyhow!("missing --output=, see --help"))?;
    let type_ref = match arg(args, "--type=") {
        Some(name) => TypeRef::from_name(name)
            .ok_or_else(|| anyhow!("unknown record type {:?}", name))?,
        None => TypeRef::Chunk,
    };
    debug!(?settings, "loaded settings");

    let registry = Arc::new(default_registry().context("invalid fixer registry")?);
    let batch = Batch::new(registry, &settings, type_ref);
    let summary = batch.run(Path::new(input), Path::new(output))?;
    Ok(summary.failed)
}
