use colored::Colorize;
use serde::Serialize;
use vessel_core::{
    Item, Registry, Selector, Value, Vessel, VesselConfig, VesselError, VesselResult,
};

use crate::cli::*;
use crate::manifest::Manifest;
use crate::report::{self, VesselReport};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Demo(args) => cmd_demo(args, cli.format),
        Command::Load(args) => cmd_load(args, cli.format),
    }
}

fn cmd_load(args: LoadArgs, format: OutputFormat) -> anyhow::Result<()> {
    let loaded = Manifest::load(&args.manifest)?.build()?;
    let reports = report::registry_report(&loaded.registry, args.hashes);
    match format {
        OutputFormat::Text => print!("{}", report::render_text(&reports)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
    }
    Ok(())
}

fn cmd_demo(args: DemoArgs, format: OutputFormat) -> anyhow::Result<()> {
    let outcome = walkthrough()?;
    match format {
        OutputFormat::Text => {
            for check in &outcome.checks {
                let mark = if check.passed { "PASS".green().bold() } else { "FAIL".red().bold() };
                println!("  {mark} {}", check.label);
            }
            if args.show_registry {
                println!();
                print!("{}", report::render_text(&outcome.registry));
            }
            println!(
                "\n{} passed, {} failed",
                outcome.passed().to_string().green(),
                outcome.failed().to_string().red()
            );
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
    }
    if outcome.failed() > 0 {
        anyhow::bail!("{} walkthrough checks failed", outcome.failed());
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct Check {
    label: String,
    passed: bool,
}

#[derive(Debug, Default, Serialize)]
struct Walkthrough {
    checks: Vec<Check>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    registry: Vec<VesselReport>,
}

impl Walkthrough {
    fn check(&mut self, label: &str, passed: bool) {
        self.checks.push(Check {
            label: label.to_string(),
            passed,
        });
    }

    fn passed(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    fn failed(&self) -> usize {
        self.checks.len() - self.passed()
    }
}

fn fails_with<T>(result: VesselResult<T>, kind: &str) -> bool {
    matches!(result, Err(err) if err.kind() == kind)
}

/// Exercise every operation against a fresh registry and record the outcome.
fn walkthrough() -> VesselResult<Walkthrough> {
    let registry = Registry::shared();
    let mut w = Walkthrough::default();

    let shelf = Vessel::new_box(&registry, VesselConfig::named("shelf"))?;
    shelf.put("Redemption Song", Some("foo"), None)?;
    shelf.put(Value::set([3, 7, 9, 23]), Some("bar"), None)?;
    w.check(
        "use by name returns the stored item",
        shelf.use_item("foo", None)? == Item::from("Redemption Song"),
    );
    w.check(
        "use by index follows insertion order",
        shelf.use_item(Selector::index(1), None)? == Item::Value(Value::set([23, 9, 7, 3])),
    );
    w.check(
        "putting an equal primitive twice is a duplicate",
        fails_with(shelf.put("Redemption Song", Some("again"), None), "duplicate"),
    );
    w.check(
        "names are unique across vessels",
        matches!(
            Vessel::new_box(&registry, VesselConfig::named("foo")),
            Err(VesselError::Name(_))
        ),
    );

    shelf.lock("secret")?;
    w.check("locked put without a key", fails_with(shelf.put(1, None, None), "lock"));
    w.check("locked put with the wrong key", fails_with(shelf.put(1, None, Some("guess")), "key"));
    w.check("locked put with the key", shelf.put(1, Some("one"), Some("secret")).is_ok());
    w.check("keys cannot be reset", fails_with(shelf.lock("other"), "key"));
    shelf.open(Some("secret"))?;
    w.check("open with the key", shelf.is_open());

    w.check(
        "fetch returns the item",
        shelf.fetch("bar", None)? == Item::Value(Value::set([3, 7, 9, 23])),
    );
    w.check("fetch removes the item", fails_with(shelf.fetch("bar", None), "access"));
    shelf.rename("one", "uno", None)?;
    w.check("rename moves the name", shelf.contains("uno") && !shelf.contains("one"));
    shelf.setname("Redemption Song", Some("song"), None)?;
    w.check(
        "getname reads the new name",
        shelf.getname("Redemption Song")?.as_deref() == Some("song"),
    );

    let pantry = Vessel::new_crate(&registry, VesselConfig::named("pantry"))?;
    let warehouse = Vessel::new_container(&registry, VesselConfig::named("warehouse"))?;
    w.check("a crate refuses raw values", fails_with(pantry.put(1, None, None), "type"));
    w.check("a container refuses boxes", fails_with(warehouse.put(&shelf, None, None), "type"));
    pantry.put(&shelf, None, None)?;
    warehouse.put(&pantry, None, None)?;
    w.check(
        "nested vessels keep their names",
        warehouse.names() == vec![Some("pantry".to_string())]
            && pantry.names() == vec![Some("shelf".to_string())],
    );
    w.check(
        "only the outermost vessel is top level",
        registry.top_level().len() == 1,
    );
    w.registry = report::registry_report(&registry, false);

    pantry.empty(None)?;
    w.check("empty clears the whole registry", registry.is_empty() && warehouse.is_empty());
    Ok(w)
}
