use std::env;

use anyhow::{anyhow, bail, Context, Result};
use log::debug;

use dataview::{ConfigNode, ConfigTranslator, DataValue, DataView};

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = CliOptions::parse()?;
    let translator = ConfigTranslator::default();

    let node = ConfigNode::load(&options.path)?;
    let view = translator
        .deserialize(&node)
        .with_context(|| format!("failed to translate {}", options.path))?;
    debug!("{} top-level entries in {}", view.len(), options.path);

    if options.strict {
        check_round_trip(&translator, &view)?;
    }

    if options.json {
        let json = serde_json::to_string_pretty(&view).context("failed to render JSON")?;
        println!("{json}");
    } else {
        print_summary(&view);
    }

    if let Some(out) = &options.write {
        let node: ConfigNode = translator
            .serialize(&view)
            .context("failed to translate view back into a document")?;
        node.save(out)?;
        println!("Wrote {out}");
    }
    Ok(())
}

fn print_summary(view: &DataView) {
    let entries = view.values(true);
    println!("Loaded document with {} entries", entries.len());
    for (query, value) in entries {
        if !matches!(value, DataValue::Map(_) | DataValue::View(_)) {
            println!(" - {query} = {value}");
        }
    }
}

fn check_round_trip(translator: &ConfigTranslator, view: &DataView) -> Result<()> {
    let node: ConfigNode = translator.serialize(view)?;
    let reparsed = ConfigNode::from_xml(&node.to_xml())?;
    if translator.deserialize(&reparsed)? != *view {
        bail!("document does not survive a round trip unchanged");
    }
    Ok(())
}

struct CliOptions {
    path: String,
    json: bool,
    write: Option<String>,
    strict: bool,
}

impl CliOptions {
    fn parse() -> Result<Self> {
        let mut args = env::args().skip(1);
        let Some(path) = args.next() else {
            return Err(anyhow!(
                "Usage: dataview <document.xml> [--json] [--write <out.xml>] [--strict]"
            ));
        };
        let mut json = false;
        let mut write = None;
        let mut strict = false;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--json" => json = true,
                "--strict" => strict = true,
                "--write" => {
                    let Some(out) = args.next() else {
                        return Err(anyhow!("--write expects an output path"));
                    };
                    write = Some(out);
                }
                other => {
                    return Err(anyhow!(
                        "Unknown argument: {other}. Expected --json, --write <out.xml> or --strict"
                    ));
                }
            }
        }
        Ok(Self {
            path,
            json,
            write,
            strict,
        })
    }
}
