//! `labelize` command line tool

use anyhow::{bail, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use labelize_core::{DirectorySink, FileDocument, LabelizeConfig, Session};
use labelize_document::{Descriptor, Mention, MentionId};
use labelize_taxonomy::{Label, LabelPath, ParameterKind, ParameterSpec};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn file_arg() -> Arg {
    Arg::new("file")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Document to open")
}

fn mention_arg() -> Arg {
    Arg::new("mention")
        .long("mention")
        .required(true)
        .value_parser(value_parser!(usize))
        .help("Mention number as listed by `inspect` (starting at 1)")
}

fn cli() -> Command {
    Command::new("labelize")
        .version(labelize_core::VERSION)
        .about("Label spans of a document and keep the label schema inside it")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("out")
                .long("out")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Write the result here (file or directory) instead of in place"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("More log output (-v info, -vv debug)"),
        )
        .subcommand(
            Command::new("inspect")
                .about("Show labels and mentions")
                .arg(file_arg())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print machine-readable JSON"),
                ),
        )
        .subcommand(
            Command::new("add-label")
                .about("Define a label")
                .arg(file_arg())
                .arg(Arg::new("name").long("name").required(true).help("Label name"))
                .arg(
                    Arg::new("parent")
                        .long("parent")
                        .default_value("")
                        .help("Parent label path, e.g. Person/Author"),
                )
                .arg(Arg::new("color").long("color").help("Hex color (generated when omitted)")),
        )
        .subcommand(
            Command::new("add-param")
                .about("Define or replace a label parameter")
                .arg(file_arg())
                .arg(Arg::new("label").long("label").required(true).help("Label path"))
                .arg(Arg::new("name").long("name").required(true).help("Parameter name"))
                .arg(
                    Arg::new("type")
                        .long("type")
                        .default_value("string")
                        .value_parser(["string", "checkbox", "dropdown"])
                        .help("Parameter type"),
                )
                .arg(Arg::new("default").long("default").help("Default value"))
                .arg(
                    Arg::new("option")
                        .long("option")
                        .action(ArgAction::Append)
                        .help("Dropdown option (repeatable)"),
                ),
        )
        .subcommand(
            Command::new("apply")
                .about("Label an occurrence of some text")
                .arg(file_arg())
                .arg(Arg::new("label").long("label").required(true).help("Label path"))
                .arg(Arg::new("text").long("text").required(true).help("Text to label"))
                .arg(
                    Arg::new("nth")
                        .long("nth")
                        .default_value("0")
                        .value_parser(value_parser!(usize))
                        .help("Which unlabeled occurrence, starting at 0"),
                ),
        )
        .subcommand(
            Command::new("set")
                .about("Set a parameter value on one mention")
                .arg(file_arg())
                .arg(mention_arg())
                .arg(Arg::new("name").long("name").required(true).help("Parameter name"))
                .arg(Arg::new("value").long("value").required(true).help("New value")),
        )
        .subcommand(
            Command::new("remove")
                .about("Turn a mention back into plain text")
                .arg(file_arg())
                .arg(mention_arg()),
        )
        .subcommand(
            Command::new("embed")
                .about("Rewrite the embedded label schema")
                .arg(file_arg()),
        )
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_count("verbose"));

    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => LabelizeConfig::load(path)?,
        None => LabelizeConfig::default(),
    };
    let Some((command, args)) = matches.subcommand() else {
        bail!("no command given");
    };

    let path = args.get_one::<PathBuf>("file").context("missing document path")?;
    let file = FileDocument::new(path);
    let mut session = Session::new(config);
    session
        .load_from(&file)
        .await
        .with_context(|| format!("cannot open {}", path.display()))?;

    tracing::debug!(command, labels = session.taxonomy().label_count(), "document opened");
    match command {
        "inspect" => return inspect(&session, args.get_flag("json")),
        "add-label" => add_label(&mut session, args)?,
        "add-param" => add_param(&mut session, args)?,
        "apply" => apply(&mut session, args)?,
        "set" => {
            let id = mention_id(&session, args)?;
            let name = string(args, "name")?;
            let mention = session.set_parameter_value(id, name, string(args, "value")?)?;
            println!("{}", describe_mention(&mention));
        }
        "remove" => {
            let id = mention_id(&session, args)?;
            let text = session.remove_mention(id)?;
            println!("unlabeled {text:?}");
        }
        "embed" => {}
        other => bail!("unknown command {other}"),
    }

    let target = match args.get_one::<PathBuf>("out") {
        Some(out) if out.is_dir() => {
            let name = session.save_to(&DirectorySink::new(out)).await?;
            out.join(name)
        }
        Some(out) => {
            session.save_to(&FileDocument::new(out)).await?;
            out.clone()
        }
        None => {
            session.save_to(&file).await?;
            path.clone()
        }
    };
    println!("saved {}", target.display());
    Ok(())
}

fn string<'a>(args: &'a ArgMatches, name: &str) -> anyhow::Result<&'a str> {
    args.get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("missing --{name}"))
}

fn label_path(args: &ArgMatches, name: &str) -> anyhow::Result<LabelPath> {
    let raw = string(args, name)?;
    raw.parse::<LabelPath>()
        .with_context(|| format!("invalid label path {raw:?}"))
}

fn mention_id(session: &Session, args: &ArgMatches) -> anyhow::Result<MentionId> {
    let number = *args.get_one::<usize>("mention").context("missing --mention")?;
    let mentions = session.mentions();
    number
        .checked_sub(1)
        .and_then(|index| mentions.get(index))
        .map(|mention| mention.id)
        .with_context(|| format!("no mention #{number}; the document has {}", mentions.len()))
}

fn add_label(session: &mut Session, args: &ArgMatches) -> anyhow::Result<()> {
    let parent = label_path(args, "parent")?;
    let name = string(args, "name")?;
    let color = args.get_one::<String>("color").map(String::as_str);
    let label = session.add_label(&parent, name, color)?;
    println!("added {} {}", parent.child(label.name()), label.color());
    Ok(())
}

fn add_param(session: &mut Session, args: &ArgMatches) -> anyhow::Result<()> {
    let path = label_path(args, "label")?;
    let name = string(args, "name")?;
    let kind: ParameterKind = string(args, "type")?.parse().map_err(anyhow::Error::msg)?;
    let options: Vec<String> = args
        .get_many::<String>("option")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    if kind != ParameterKind::Dropdown && !options.is_empty() {
        bail!("--option only applies to dropdown parameters");
    }
    let default = args.get_one::<String>("default").map(String::as_str);
    let spec = ParameterSpec::from_parts(kind, default, &options)?;

    let summary = describe_spec(&spec);
    match session.add_parameter(&path, name, spec)? {
        Some(_) => println!("replaced {path}.{name}: {summary}"),
        None => println!("added {path}.{name}: {summary}"),
    }
    Ok(())
}

fn apply(session: &mut Session, args: &ArgMatches) -> anyhow::Result<()> {
    let path = label_path(args, "label")?;
    let text = string(args, "text")?;
    let nth = *args.get_one::<usize>("nth").context("missing --nth")?;
    let selection = session.select_text(text, nth)?;
    let mention = session.apply_label(&selection, &path)?;
    println!("{}", describe_mention(&mention));
    Ok(())
}

fn inspect(session: &Session, json: bool) -> anyhow::Result<()> {
    let stats = session.stats();
    let mentions = session.mentions();

    if json {
        let report = serde_json::json!({
            "file": session.suggested_filename(),
            "origin": session.origin(),
            "stats": stats,
            "labels": Descriptor::from_taxonomy(session.taxonomy()),
            "mentions": mentions,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} ({:?}): {} labels, {} mentions, {} unresolved",
        session.suggested_filename(),
        session.origin(),
        stats.label_types,
        stats.total_mentions,
        stats.unresolved_mentions
    );
    println!();
    println!("Labels:");
    for label in session.taxonomy().roots().values() {
        print_label(label, 1);
    }
    println!();
    println!("Mentions:");
    for (index, mention) in mentions.iter().enumerate() {
        println!("  #{} {}", index + 1, describe_mention(mention));
    }
    Ok(())
}

fn print_label(label: &Label, depth: usize) {
    let indent = "  ".repeat(depth);
    println!("{indent}{} {}", label.name(), label.color());
    for (name, spec) in label.parameters() {
        println!("{indent}  .{name}: {}", describe_spec(spec));
    }
    for child in label.children().values() {
        print_label(child, depth + 1);
    }
}

fn describe_spec(spec: &ParameterSpec) -> String {
    match spec.kind() {
        ParameterKind::Dropdown => format!(
            "dropdown [{}] = {:?}",
            spec.options().join(", "),
            spec.default_value()
        ),
        kind => format!("{kind} = {:?}", spec.default_value()),
    }
}

fn describe_mention(mention: &Mention) -> String {
    let values: Vec<String> = mention
        .attribute_values
        .iter()
        .map(|(name, value)| format!("{name}={value:?}"))
        .collect();
    let status = if mention.resolved { "" } else { " (unresolved)" };
    format!(
        "{}{status} {:?} {}",
        mention.label_path,
        mention.text,
        values.join(" ")
    )
}
