//! Command handlers: resolve configuration, call the client, render.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use arize_domain::constants::DEFAULT_PROFILE;
use arize_domain::{ArizeConfig, ClientOptions, ExportFilters, MigrationConfig, MigrationStatus};
use arize_infra::config::{default_config_path, load, save_profile, ConfigSources};
use arize_infra::{ArizeClient, AsyncArizeClient, MigrationService, PhoenixClient};
use serde_json::json;
use tracing::info;

use crate::args::{Command, GlobalArgs, Invocation, MigrateArgs, USAGE};
use crate::output::{or_dash, Output};

fn sources(globals: &GlobalArgs) -> ConfigSources {
    ConfigSources {
        profile: globals.profile.clone(),
        path: globals.config_path.clone(),
        overrides: globals.overrides.clone(),
    }
}

fn resolve_config(globals: &GlobalArgs) -> anyhow::Result<ArizeConfig> {
    load(&sources(globals)).context("could not resolve Arize credentials")
}

fn client(globals: &GlobalArgs) -> anyhow::Result<ArizeClient> {
    Ok(ArizeClient::new(resolve_config(globals)?, ClientOptions::default())?)
}

fn config_path(globals: &GlobalArgs) -> anyhow::Result<PathBuf> {
    globals
        .config_path
        .clone()
        .or_else(default_config_path)
        .context("HOME is not set; pass --config <path>")
}

pub fn run(invocation: &Invocation) -> anyhow::Result<()> {
    let globals = &invocation.globals;
    let out = Output::new(globals.json);

    match &invocation.command {
        Command::Help => {
            print!("{USAGE}");
            Ok(())
        }
        Command::ConfigShow => {
            let config = resolve_config(globals)?;
            let path = config_path(globals).map(|p| p.display().to_string()).unwrap_or_default();
            let redacted = json!({
                "api_key": "<redacted>",
                "organization": config.organization,
                "space": config.space,
                "app_url": config.app_url,
                "graphql_url": config.graphql_url(),
                "config_file": path,
            });
            out.record(&redacted, &[
                ("organization", config.organization.clone()),
                ("space", config.space.clone()),
                ("app_url", config.app_url.clone()),
                ("graphql_url", config.graphql_url()),
                ("config_file", path.clone()),
            ])
        }
        Command::ConfigSave => {
            let path = config_path(globals)?;
            let profile = globals.profile.clone().unwrap_or_else(|| DEFAULT_PROFILE.to_string());
            save_profile(&path, &profile, globals.overrides.clone())?;
            out.done(
                &format!("saved profile '{profile}' to {}", path.display()),
                json!({ "profile": profile, "path": path }),
            )
        }
        Command::SpacesList => {
            let spaces = client(globals)?.get_all_spaces()?;
            out.list(&spaces, &["NAME", "ID", "PRIVATE"], |s| {
                vec![s.name.clone(), s.id.clone(), or_dash(s.private)]
            })
        }
        Command::UsersList => {
            let users = client(globals)?.get_all_users()?;
            out.list(&users, &["NAME", "EMAIL", "ROLE"], |u| {
                vec![u.name.clone(), u.email.clone(), or_dash(u.role.as_ref())]
            })
        }
        Command::ModelsList => {
            let models = client(globals)?.get_all_models()?;
            out.list(&models, &["NAME", "ID", "TYPE"], |m| {
                vec![m.name.clone(), m.id.clone(), or_dash(m.model_type.as_ref())]
            })
        }
        Command::ModelsGet { name } => {
            let model = client(globals)?.get_model(name)?;
            out.record(&model, &[
                ("name", model.name.clone()),
                ("id", model.id.clone()),
                ("type", or_dash(model.model_type.as_ref())),
                ("created", or_dash(model.created_at.map(|t| t.to_rfc3339()))),
            ])
        }
        Command::ModelsVolume { name: Some(name), start, end } => {
            let volume = client(globals)?.get_model_volume(name, *start, *end)?;
            out.record(&volume, &[("model", volume.name.clone()), ("volume", volume.total_volume.to_string())])
        }
        Command::ModelsVolume { name: None, start, end } => {
            let (total, breakdown) = client(globals)?.get_total_volume(*start, *end)?;
            if globals.json {
                return out.done("", json!({ "total": total, "models": breakdown }));
            }
            let mut rows: Vec<Vec<String>> =
                breakdown.iter().map(|(model, volume)| vec![model.clone(), volume.to_string()]).collect();
            rows.push(vec!["TOTAL".to_string(), total.to_string()]);
            print!("{}", crate::output::render_table(&["MODEL", "VOLUME"], &rows));
            Ok(())
        }
        Command::MonitorsList { model, category } => {
            let monitors = client(globals)?.get_all_monitors(model, *category)?;
            out.list(&monitors, &["NAME", "ID", "CATEGORY", "STATUS"], |m| {
                vec![m.name.clone(), m.id.clone(), m.monitor_category.to_string(), or_dash(m.status.as_ref())]
            })
        }
        Command::MonitorsDelete { model, name } => {
            let deleted = client(globals)?.delete_monitor(model, name)?;
            out.done(&format!("deleted monitor '{name}'"), json!({ "deleted": deleted, "monitor": name }))
        }
        Command::PromptsList => {
            let prompts = client(globals)?.get_all_prompts()?;
            out.list(&prompts, &["NAME", "ID", "TAGS"], |p| vec![p.name.clone(), p.id.clone(), p.tags.join(",")])
        }
        Command::PromptsGet { name } => {
            let client = client(globals)?;
            let prompt = client.get_prompt(name)?;
            let versions = client.get_prompt_versions(name)?;
            let body = json!({ "prompt": prompt, "versions": versions });
            out.record(&body, &[
                ("name", prompt.name.clone()),
                ("id", prompt.id.clone()),
                ("description", or_dash(prompt.description.as_ref())),
                ("versions", versions.len().to_string()),
            ])
        }
        Command::PromptsDelete { name } => {
            let deleted = client(globals)?.delete_prompt(name)?;
            out.done(&format!("deleted prompt '{name}'"), json!({ "deleted": deleted, "prompt": name }))
        }
        Command::CustomMetricsList { model } => {
            let metrics = client(globals)?.get_all_custom_metrics(model)?;
            out.list(&metrics, &["NAME", "ID", "METRIC"], |m| vec![m.name.clone(), m.id.clone(), m.metric.clone()])
        }
        Command::DashboardsList => {
            let dashboards = client(globals)?.get_all_dashboards()?;
            out.list(&dashboards, &["NAME", "ID", "STATUS"], |d| {
                vec![d.name.clone(), d.id.clone(), or_dash(d.status.as_ref())]
            })
        }
        Command::EvaluatorsList => {
            let evaluators = client(globals)?.get_all_evaluators()?;
            out.list(&evaluators, &["NAME", "ID", "TASK"], |e| {
                vec![e.name.clone(), e.id.clone(), or_dash(e.task_type.as_ref())]
            })
        }
        Command::ImportsList => {
            let client = client(globals)?;
            let files = client.get_all_file_import_jobs()?;
            let tables = client.get_all_table_import_jobs()?;
            if globals.json {
                return out.done("", json!({ "file_jobs": files, "table_jobs": tables }));
            }
            let mut rows: Vec<Vec<String>> = files
                .iter()
                .map(|j| vec!["file".into(), j.job_id.clone(), format!("{:?}", j.job_status), or_dash(j.model_name.as_ref())])
                .collect();
            rows.extend(tables.iter().map(|j| {
                vec!["table".into(), j.job_id.clone(), format!("{:?}", j.job_status), or_dash(j.model_name.as_ref())]
            }));
            print!("{}", crate::output::render_table(&["KIND", "JOB", "STATUS", "MODEL"], &rows));
            Ok(())
        }
        Command::MigratePhoenix(args) => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("could not start the async runtime")?;
            runtime.block_on(migrate(globals, args, out))
        }
    }
}

fn migration_config(args: &MigrateArgs) -> MigrationConfig {
    let mut config = MigrationConfig {
        phoenix_api_key: args.phoenix_api_key.clone(),
        export_format: args.format,
        ..MigrationConfig::default()
    };
    if let Some(url) = &args.phoenix_url {
        config.phoenix_url = url.clone();
    }
    if let Some(batch_size) = args.batch_size {
        config.batch_size = batch_size;
    }
    config
}

async fn migrate(globals: &GlobalArgs, args: &MigrateArgs, out: Output) -> anyhow::Result<()> {
    let config = migration_config(args);
    let source = Arc::new(PhoenixClient::new(&config)?);
    let service = MigrationService::new(source, config)?;

    if args.dry_run {
        let report = service.check_feasibility(&args.project, &args.types).await?;
        let counts: Vec<(String, String)> =
            report.estimated_counts.iter().map(|(t, n)| (t.to_string(), n.to_string())).collect();
        let mut fields = vec![
            ("project", report.project_name.clone()),
            ("exists", report.project_exists.to_string()),
            ("total", report.total_estimated.to_string()),
        ];
        fields.extend(counts.iter().map(|(t, n)| (t.as_str(), n.clone())));
        fields.extend(report.warnings.iter().map(|w| ("warning", w.clone())));
        return out.record(&report, &fields);
    }

    let client = AsyncArizeClient::new(resolve_config(globals)?, ClientOptions::default())?;
    let target = Arc::new(client.migration_target().await?);
    let filters = ExportFilters { since: args.since, until: args.until, limit: args.limit };

    info!(project = %args.project, types = ?args.types, "starting Phoenix migration");
    let job = service.run(target, &args.project, &args.types, &args.output, &filters).await?;

    if globals.json {
        out.done("", serde_json::to_value(&job)?)?;
    } else {
        let rows: Vec<Vec<String>> = job
            .results
            .iter()
            .map(|r| {
                vec![
                    r.data_type.to_string(),
                    r.success_count.to_string(),
                    r.error_count.to_string(),
                    r.skipped_count.to_string(),
                    or_dash(r.export_file.as_ref().map(|p| p.display())),
                ]
            })
            .collect();
        print!(
            "{}",
            crate::output::render_table(&["TYPE", "IMPORTED", "FAILED", "SKIPPED", "EXPORT"], &rows)
        );
        println!("status: {}", job.status);
    }

    if job.status == MigrationStatus::Failed {
        anyhow::bail!("migration {} failed", job.id);
    }
    Ok(())
}
