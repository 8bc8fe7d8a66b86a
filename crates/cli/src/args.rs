//! Command-line parsing.
//!
//! Global flags may appear anywhere on the line. Value flags accept both
//! `--flag value` and `--flag=value`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use arize_domain::{DataType, ExportFormat, MonitorCategory, ProfileConfig};
use chrono::{DateTime, Utc};

const VALUE_FLAGS: &[&str] = &[
    "profile",
    "api-key",
    "organization",
    "space",
    "app-url",
    "config",
    "category",
    "start",
    "end",
    "project",
    "types",
    "output",
    "phoenix-url",
    "phoenix-api-key",
    "limit",
    "format",
    "batch-size",
];

/// Flags shared by every command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalArgs {
    pub json: bool,
    pub verbose: u8,
    pub profile: Option<String>,
    pub config_path: Option<PathBuf>,
    pub overrides: ProfileConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MigrateArgs {
    pub project: String,
    pub types: Vec<DataType>,
    pub output: PathBuf,
    pub phoenix_url: Option<String>,
    pub phoenix_api_key: Option<String>,
    pub format: ExportFormat,
    pub limit: Option<usize>,
    pub batch_size: Option<usize>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    ConfigShow,
    ConfigSave,
    SpacesList,
    UsersList,
    ModelsList,
    ModelsGet { name: String },
    ModelsVolume { name: Option<String>, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>> },
    MonitorsList { model: String, category: Option<MonitorCategory> },
    MonitorsDelete { model: String, name: String },
    PromptsList,
    PromptsGet { name: String },
    PromptsDelete { name: String },
    CustomMetricsList { model: String },
    DashboardsList,
    EvaluatorsList,
    ImportsList,
    MigratePhoenix(MigrateArgs),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub globals: GlobalArgs,
    pub command: Command,
}

/// Tokens split into positionals, value flags and switches.
#[derive(Debug, Default)]
struct RawArgs {
    positionals: Vec<String>,
    values: BTreeMap<String, String>,
    switches: Vec<String>,
}

impl RawArgs {
    fn value(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }

    fn switch(&self, name: &str) -> bool {
        self.switches.iter().any(|s| s == name)
    }

    fn required(&self, name: &str) -> anyhow::Result<String> {
        self.value(name).ok_or_else(|| anyhow!("--{name} is required"))
    }

    fn positional(&self, index: usize, what: &str) -> anyhow::Result<String> {
        self.positionals.get(index).cloned().ok_or_else(|| anyhow!("missing <{what}> argument"))
    }
}

fn split(args: impl IntoIterator<Item = String>) -> anyhow::Result<RawArgs> {
    let mut raw = RawArgs::default();
    let mut tokens = args.into_iter();

    while let Some(token) = tokens.next() {
        if token == "-v" || token == "--verbose" {
            raw.switches.push("verbose".into());
        } else if token == "-vv" {
            raw.switches.extend(["verbose".to_string(), "verbose".to_string()]);
        } else if token == "-y" {
            raw.switches.push("yes".into());
        } else if token == "-h" {
            raw.switches.push("help".into());
        } else if let Some(flag) = token.strip_prefix("--") {
            let (name, inline) = match flag.split_once('=') {
                Some((name, value)) => (name.to_string(), Some(value.to_string())),
                None => (flag.to_string(), None),
            };
            if VALUE_FLAGS.contains(&name.as_str()) {
                let value = match inline {
                    Some(value) => value,
                    None => tokens.next().ok_or_else(|| anyhow!("--{name} expects a value"))?,
                };
                raw.values.insert(name, value);
            } else if inline.is_some() {
                bail!("--{name} does not take a value");
            } else {
                raw.switches.push(name);
            }
        } else {
            raw.positionals.push(token);
        }
    }
    Ok(raw)
}

fn timestamp(value: Option<String>, flag: &str) -> anyhow::Result<Option<DateTime<Utc>>> {
    value
        .map(|v| {
            DateTime::parse_from_rfc3339(&v)
                .map(|t| t.with_timezone(&Utc))
                .with_context(|| format!("--{flag} must be an RFC 3339 timestamp, got '{v}'"))
        })
        .transpose()
}

fn number(value: Option<String>, flag: &str) -> anyhow::Result<Option<usize>> {
    value
        .map(|v| v.parse::<usize>().with_context(|| format!("--{flag} must be a positive integer")))
        .transpose()
}

fn data_types(value: Option<String>) -> anyhow::Result<Vec<DataType>> {
    let Some(list) = value else {
        return Ok(DataType::ALL.to_vec());
    };
    let mut types = Vec::new();
    for name in list.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        let data_type = name.parse::<DataType>().map_err(|e| anyhow!(e))?;
        if !types.contains(&data_type) {
            types.push(data_type);
        }
    }
    if types.is_empty() {
        bail!("--types must name at least one data type");
    }
    Ok(types)
}

fn confirm(raw: &RawArgs, what: &str) -> anyhow::Result<()> {
    if raw.switch("yes") {
        Ok(())
    } else {
        bail!("refusing to delete {what} without --yes")
    }
}

pub fn parse(args: impl IntoIterator<Item = String>) -> anyhow::Result<Invocation> {
    let raw = split(args)?;

    let globals = GlobalArgs {
        json: raw.switch("json"),
        verbose: raw.switches.iter().filter(|s| s.as_str() == "verbose").count().min(2) as u8,
        profile: raw.value("profile"),
        config_path: raw.value("config").map(PathBuf::from),
        overrides: ProfileConfig {
            api_key: raw.value("api-key"),
            organization: raw.value("organization"),
            space: raw.value("space"),
            app_url: raw.value("app-url"),
        },
    };

    if raw.switch("help") {
        return Ok(Invocation { globals, command: Command::Help });
    }

    let words: Vec<&str> = raw.positionals.iter().map(String::as_str).collect();
    let command = match words.as_slice() {
        [] | ["help", ..] => Command::Help,
        ["config", "show"] => Command::ConfigShow,
        ["config", "save"] => Command::ConfigSave,
        ["spaces", "list"] => Command::SpacesList,
        ["users", "list"] => Command::UsersList,
        ["models", "list"] => Command::ModelsList,
        ["models", "get", _] => Command::ModelsGet { name: raw.positional(2, "model")? },
        ["models", "volume"] | ["models", "volume", _] => Command::ModelsVolume {
            name: raw.positionals.get(2).cloned(),
            start: timestamp(raw.value("start"), "start")?,
            end: timestamp(raw.value("end"), "end")?,
        },
        ["monitors", "list", _] => Command::MonitorsList {
            model: raw.positional(2, "model")?,
            category: raw
                .value("category")
                .map(|c| c.parse::<MonitorCategory>().map_err(|e| anyhow!(e)))
                .transpose()?,
        },
        ["monitors", "delete", model, name] => {
            confirm(&raw, &format!("monitor '{name}'"))?;
            Command::MonitorsDelete { model: model.to_string(), name: name.to_string() }
        }
        ["prompts", "list"] => Command::PromptsList,
        ["prompts", "get", _] => Command::PromptsGet { name: raw.positional(2, "prompt")? },
        ["prompts", "delete", name] => {
            confirm(&raw, &format!("prompt '{name}'"))?;
            Command::PromptsDelete { name: name.to_string() }
        }
        ["custom-metrics", "list", _] => Command::CustomMetricsList { model: raw.positional(2, "model")? },
        ["dashboards", "list"] => Command::DashboardsList,
        ["evaluators", "list"] => Command::EvaluatorsList,
        ["imports", "list"] => Command::ImportsList,
        ["migrate", "phoenix"] => Command::MigratePhoenix(MigrateArgs {
            project: raw.required("project")?,
            types: data_types(raw.value("types"))?,
            output: raw.value("output").map_or_else(|| PathBuf::from("."), PathBuf::from),
            phoenix_url: raw.value("phoenix-url"),
            phoenix_api_key: raw.value("phoenix-api-key"),
            format: raw
                .value("format")
                .map(|f| f.parse::<ExportFormat>().map_err(|e| anyhow!(e)))
                .transpose()?
                .unwrap_or_default(),
            limit: number(raw.value("limit"), "limit")?,
            batch_size: number(raw.value("batch-size"), "batch-size")?,
            since: timestamp(raw.value("start"), "start")?,
            until: timestamp(raw.value("end"), "end")?,
            dry_run: raw.switch("dry-run"),
        }),
        other => bail!("unknown command: {}", other.join(" ")),
    };

    Ok(Invocation { globals, command })
}

pub const USAGE: &str = "\
arize - Arize platform and Phoenix migration CLI

USAGE:
    arize [GLOBAL FLAGS] <COMMAND>

GLOBAL FLAGS:
    --profile <name>        Config profile (default: $ARIZE_PROFILE or 'default')
    --config <path>         Config file (default: ~/.arize/config.toml)
    --api-key <key>         Override the API key
    --organization <name>   Override the organization
    --space <name>          Override the space
    --app-url <url>         Override the platform URL
    --json                  Print machine-readable JSON
    -v, --verbose           More logging (repeat for trace)

COMMANDS:
    config show                          Show the resolved configuration
    config save                          Save the override flags into the profile
    spaces list
    users list
    models list
    models get <name>
    models volume [<name>] [--start <ts>] [--end <ts>]
    monitors list <model> [--category performance|drift|data_quality]
    monitors delete <model> <name> --yes
    prompts list
    prompts get <name>
    prompts delete <name> --yes
    custom-metrics list <model>
    dashboards list
    evaluators list
    imports list
    migrate phoenix --project <name> [--types a,b] [--output <dir>]
                    [--phoenix-url <url>] [--phoenix-api-key <key>]
                    [--format json|csv] [--limit <n>] [--batch-size <n>]
                    [--start <ts>] [--end <ts>] [--dry-run]
";

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_line(line: &str) -> anyhow::Result<Invocation> {
        parse(line.split_whitespace().map(str::to_string))
    }

    #[test]
    fn globals_are_accepted_anywhere() {
        let invocation = parse_line("models --json get churn --profile=staging -v").unwrap();

        assert_eq!(invocation.command, Command::ModelsGet { name: "churn".into() });
        assert!(invocation.globals.json);
        assert_eq!(invocation.globals.verbose, 1);
        assert_eq!(invocation.globals.profile.as_deref(), Some("staging"));
    }

    #[test]
    fn override_flags_become_top_layer() {
        let invocation = parse_line("spaces list --api-key k --space prod").unwrap();
        assert_eq!(invocation.globals.overrides.api_key.as_deref(), Some("k"));
        assert_eq!(invocation.globals.overrides.space.as_deref(), Some("prod"));
        assert_eq!(invocation.globals.overrides.organization, None);
    }

    #[test]
    fn destructive_commands_require_yes() {
        let err = parse_line("monitors delete churn drift-alert").unwrap_err();
        assert!(err.to_string().contains("without --yes"));

        let invocation = parse_line("monitors delete churn drift-alert --yes").unwrap();
        assert_eq!(
            invocation.command,
            Command::MonitorsDelete { model: "churn".into(), name: "drift-alert".into() }
        );
    }

    #[test]
    fn migrate_defaults_to_every_type() {
        let invocation = parse_line("migrate phoenix --project demo --dry-run").unwrap();
        let Command::MigratePhoenix(args) = invocation.command else {
            panic!("expected migrate command");
        };
        assert_eq!(args.types, DataType::ALL.to_vec());
        assert_eq!(args.format, ExportFormat::Json);
        assert!(args.dry_run);
    }

    #[test]
    fn migrate_types_are_parsed_and_deduplicated() {
        let invocation =
            parse_line("migrate phoenix --project demo --types traces,annotations,traces --limit 50").unwrap();
        let Command::MigratePhoenix(args) = invocation.command else {
            panic!("expected migrate command");
        };
        assert_eq!(args.types, vec![DataType::Traces, DataType::Annotations]);
        assert_eq!(args.limit, Some(50));
    }

    #[test]
    fn bad_input_is_reported() {
        assert!(parse_line("migrate phoenix").unwrap_err().to_string().contains("--project"));
        assert!(parse_line("migrate phoenix --project p --types spans").is_err());
        assert!(parse_line("models volume --start yesterday").is_err());
        assert!(parse_line("models frobnicate").unwrap_err().to_string().contains("unknown command"));
        assert!(parse_line("spaces list --profile").is_err());
    }

    #[test]
    fn category_accepts_hyphenated_form() {
        let invocation = parse_line("monitors list churn --category data-quality").unwrap();
        assert_eq!(
            invocation.command,
            Command::MonitorsList { model: "churn".into(), category: Some(MonitorCategory::DataQuality) }
        );
    }
}
