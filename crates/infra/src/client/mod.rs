//! Domain clients
//!
//! One method per platform operation. Names given by the caller (model,
//! monitor, prompt, ...) are resolved to ids before the operation's
//! descriptor runs. The organization and space ids are looked up on first
//! use and cached for the client's lifetime.

pub mod async_client;

use std::collections::BTreeMap;

use arize_core::graphql::executor::{run_paginated, run_single};
use arize_core::graphql::ports::GraphQlTransport;
use arize_core::queries::account::OrgAndSpaceNames;
use arize_core::queries::custom_metrics::{CreateCustomMetricVariables, DeleteCustomMetricVariables};
use arize_core::queries::dashboards::DashboardByNameVariables;
use arize_core::queries::imports::{CreateFileImportJobVariables, DeleteFileImportJobVariables};
use arize_core::queries::models::{ModelByNameVariables, ModelVolumeVariables};
use arize_core::queries::monitors::{
    CreateMonitorVariables, DeleteMonitorVariables, MonitorByNameVariables, MonitorListVariables,
};
use arize_core::queries::prompts::{
    CreatePromptVariables, DeletePromptVariables, PromptByNameVariables, PromptVariables,
};
use arize_core::queries::{
    CreateCustomMetricMutation, CreateDataQualityMonitorMutation, CreateDriftMonitorMutation,
    CreateFileImportJobMutation, CreatePerformanceMonitorMutation, CreatePromptMutation,
    DeleteCustomMetricMutation, DeleteFileImportJobMutation, DeleteModelQuery,
    DeleteMonitorMutation, DeletePromptMutation, GetAllCustomMetricsQuery, GetAllDashboardsQuery,
    GetAllEvaluatorsQuery, GetAllFileImportJobsQuery, GetAllModelsQuery, GetAllMonitorsQuery,
    GetAllPromptsQuery, GetAllSpacesQuery, GetAllTableImportJobsQuery, GetAllUsersQuery,
    GetDashboardByNameQuery, GetModelByNameQuery, GetModelVolumeQuery, GetMonitorByNameQuery,
    GetPromptByNameQuery, GetPromptVersionsQuery, ModelVariables, OrgAndSpaceIds,
    OrgIdAndSpaceIdQuery, OrganizationVariables, SpaceVariables,
};
use arize_core::{PaginationOptions, QueryDescriptor};
use arize_domain::{
    ArizeConfig, ArizeError, ClientOptions, CustomMetric, Dashboard, Evaluator, FileImportJob,
    Model, ModelVolume, Monitor, MonitorCategory, MonitorSpec, NewCustomMetric, NewFileImportJob,
    NewPrompt, Prompt, PromptVersion, Result, Space, TableImportJob, User,
};
use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use tracing::{info, instrument};

pub use async_client::AsyncArizeClient;

use crate::graphql::HttpGraphQlTransport;

/// Sum of per-model volumes plus the breakdown keyed by model name.
pub type TotalVolume = (u64, BTreeMap<String, u64>);

/// Look up `name` in `items`, or fail with a not-found error for `description`.
pub(crate) fn find_by_name<T>(
    items: Vec<T>,
    name: &str,
    kind: &str,
    description: &str,
    name_of: impl Fn(&T) -> &str,
) -> Result<T> {
    items
        .into_iter()
        .find(|item| name_of(item) == name)
        .ok_or_else(|| ArizeError::not_found(description, format!("{kind} '{name}' not found")))
}

/// Total plus per-name breakdown; models sharing a name are summed together.
pub(crate) fn sum_volumes(volumes: impl IntoIterator<Item = (String, u64)>) -> TotalVolume {
    let mut total = 0;
    let mut breakdown = BTreeMap::new();
    for (name, volume) in volumes {
        total += volume;
        *breakdown.entry(name).or_insert(0) += volume;
    }
    (total, breakdown)
}

/// Blocking Arize client.
///
/// Every call occupies the calling thread until the platform responds. Do
/// not construct or call it from inside an async runtime; use
/// [`AsyncArizeClient`] there.
pub struct ArizeClient {
    config: ArizeConfig,
    options: ClientOptions,
    transport: Box<dyn GraphQlTransport + Send + Sync>,
    ids: OnceCell<OrgAndSpaceIds>,
}

impl ArizeClient {
    pub fn new(config: ArizeConfig, options: ClientOptions) -> Result<Self> {
        let transport = HttpGraphQlTransport::new(&config, &options)?;
        Ok(Self::with_transport(config, options, Box::new(transport)))
    }

    /// Build a client over any transport (used by tests).
    pub fn with_transport(
        config: ArizeConfig,
        options: ClientOptions,
        transport: Box<dyn GraphQlTransport + Send + Sync>,
    ) -> Self {
        Self { config, options, transport, ids: OnceCell::new() }
    }

    pub fn config(&self) -> &ArizeConfig {
        &self.config
    }

    fn pagination(&self) -> PaginationOptions {
        PaginationOptions { page_delay: self.options.page_delay, max_pages: self.options.max_pages }
    }

    fn single<D: QueryDescriptor>(&self, variables: &D::Variables) -> Result<D::Item> {
        run_single::<D, _>(self.transport.as_ref(), variables)
    }

    fn paginated<D: QueryDescriptor>(&self, variables: &D::Variables) -> Result<Vec<D::Item>> {
        run_paginated::<D, _>(self.transport.as_ref(), variables, &self.pagination())
    }

    fn ids(&self) -> Result<&OrgAndSpaceIds> {
        self.ids.get_or_try_init(|| {
            let names = OrgAndSpaceNames {
                organization: self.config.organization.clone(),
                space: self.config.space.clone(),
            };
            let ids = self.single::<OrgIdAndSpaceIdQuery>(&names)?;
            info!(organization_id = %ids.organization_id, space_id = %ids.space_id, "resolved organization and space");
            Ok(ids)
        })
    }

    pub fn organization_id(&self) -> Result<String> {
        Ok(self.ids()?.organization_id.clone())
    }

    pub fn space_id(&self) -> Result<String> {
        Ok(self.ids()?.space_id.clone())
    }

    fn space_variables(&self) -> Result<SpaceVariables> {
        Ok(SpaceVariables::new(self.space_id()?))
    }

    // Account

    #[instrument(skip(self))]
    pub fn get_all_spaces(&self) -> Result<Vec<Space>> {
        self.paginated::<GetAllSpacesQuery>(&OrganizationVariables::new(self.organization_id()?))
    }

    #[instrument(skip(self))]
    pub fn get_all_users(&self) -> Result<Vec<User>> {
        self.paginated::<GetAllUsersQuery>(&OrganizationVariables::new(self.organization_id()?))
    }

    // Models

    #[instrument(skip(self))]
    pub fn get_all_models(&self) -> Result<Vec<Model>> {
        self.paginated::<GetAllModelsQuery>(&self.space_variables()?)
    }

    #[instrument(skip(self))]
    pub fn get_model(&self, model_name: &str) -> Result<Model> {
        self.single::<GetModelByNameQuery>(&ModelByNameVariables {
            space_id: self.space_id()?,
            model_name: model_name.to_string(),
        })
    }

    fn model_id(&self, model_name: &str) -> Result<String> {
        Ok(self.get_model(model_name)?.id)
    }

    #[instrument(skip(self))]
    pub fn get_model_volume(
        &self,
        model_name: &str,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
    ) -> Result<ModelVolume> {
        self.single::<GetModelVolumeQuery>(&ModelVolumeVariables {
            model_id: self.model_id(model_name)?,
            start_time,
            end_time,
        })
    }

    /// Prediction volume of every model in the space, one request per model.
    #[instrument(skip(self))]
    pub fn get_total_volume(
        &self,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
    ) -> Result<TotalVolume> {
        let models = self.get_all_models()?;
        let mut volumes = Vec::with_capacity(models.len());
        for model in models {
            let volume = self.single::<GetModelVolumeQuery>(&ModelVolumeVariables {
                model_id: model.id,
                start_time,
                end_time,
            })?;
            volumes.push((model.name, volume.total_volume));
        }
        Ok(sum_volumes(volumes))
    }

    #[instrument(skip(self))]
    pub fn delete_model(&self, model_name: &str) -> Result<bool> {
        let deleted = self.single::<DeleteModelQuery>(&ModelVariables::new(self.model_id(model_name)?))?;
        info!(model = model_name, "deleted model");
        Ok(deleted)
    }

    // Monitors

    #[instrument(skip(self))]
    pub fn get_all_monitors(
        &self,
        model_name: &str,
        category: Option<MonitorCategory>,
    ) -> Result<Vec<Monitor>> {
        self.paginated::<GetAllMonitorsQuery>(&MonitorListVariables {
            model_id: self.model_id(model_name)?,
            monitor_category: category,
        })
    }

    #[instrument(skip(self))]
    pub fn get_monitor(&self, model_name: &str, monitor_name: &str) -> Result<Monitor> {
        self.single::<GetMonitorByNameQuery>(&MonitorByNameVariables {
            model_id: self.model_id(model_name)?,
            monitor_name: monitor_name.to_string(),
        })
    }

    /// Create a monitor of whichever category `spec` carries; returns its id.
    #[instrument(skip(self, spec), fields(category = %spec.category(), monitor = spec.name()))]
    pub fn create_monitor(&self, model_name: &str, spec: MonitorSpec) -> Result<String> {
        let model_id = self.model_id(model_name)?;
        let created = match spec {
            MonitorSpec::Performance(spec) => self
                .single::<CreatePerformanceMonitorMutation>(&CreateMonitorVariables { model_id, spec }),
            MonitorSpec::Drift(spec) => {
                self.single::<CreateDriftMonitorMutation>(&CreateMonitorVariables { model_id, spec })
            }
            MonitorSpec::DataQuality(spec) => self
                .single::<CreateDataQualityMonitorMutation>(&CreateMonitorVariables { model_id, spec }),
        }?;
        info!(monitor_id = %created.id, "created monitor");
        Ok(created.id)
    }

    #[instrument(skip(self))]
    pub fn delete_monitor(&self, model_name: &str, monitor_name: &str) -> Result<bool> {
        let monitor = self.get_monitor(model_name, monitor_name)?;
        self.single::<DeleteMonitorMutation>(&DeleteMonitorVariables { monitor_id: monitor.id })
    }

    // Prompts

    #[instrument(skip(self))]
    pub fn get_all_prompts(&self) -> Result<Vec<Prompt>> {
        self.paginated::<GetAllPromptsQuery>(&self.space_variables()?)
    }

    #[instrument(skip(self))]
    pub fn get_prompt(&self, prompt_name: &str) -> Result<Prompt> {
        self.single::<GetPromptByNameQuery>(&PromptByNameVariables {
            space_id: self.space_id()?,
            prompt_name: prompt_name.to_string(),
        })
    }

    #[instrument(skip(self))]
    pub fn get_prompt_versions(&self, prompt_name: &str) -> Result<Vec<PromptVersion>> {
        let prompt = self.get_prompt(prompt_name)?;
        self.paginated::<GetPromptVersionsQuery>(&PromptVariables { prompt_id: prompt.id })
    }

    #[instrument(skip(self, prompt), fields(prompt = %prompt.name))]
    pub fn create_prompt(&self, prompt: NewPrompt) -> Result<String> {
        let created =
            self.single::<CreatePromptMutation>(&CreatePromptVariables { space_id: self.space_id()?, prompt })?;
        Ok(created.id)
    }

    #[instrument(skip(self))]
    pub fn delete_prompt(&self, prompt_name: &str) -> Result<bool> {
        let prompt = self.get_prompt(prompt_name)?;
        self.single::<DeletePromptMutation>(&DeletePromptVariables {
            space_id: self.space_id()?,
            prompt_id: prompt.id,
        })
    }

    // Custom metrics

    #[instrument(skip(self))]
    pub fn get_all_custom_metrics(&self, model_name: &str) -> Result<Vec<CustomMetric>> {
        self.paginated::<GetAllCustomMetricsQuery>(&ModelVariables::new(self.model_id(model_name)?))
    }

    #[instrument(skip(self, metric), fields(metric = %metric.name))]
    pub fn create_custom_metric(&self, model_name: &str, metric: NewCustomMetric) -> Result<String> {
        let created = self.single::<CreateCustomMetricMutation>(&CreateCustomMetricVariables {
            model_id: self.model_id(model_name)?,
            metric,
        })?;
        Ok(created.id)
    }

    #[instrument(skip(self))]
    pub fn delete_custom_metric(&self, model_name: &str, metric_name: &str) -> Result<bool> {
        let model_id = self.model_id(model_name)?;
        let metrics = self.paginated::<GetAllCustomMetricsQuery>(&ModelVariables::new(model_id.clone()))?;
        let metric = find_by_name(
            metrics,
            metric_name,
            "custom metric",
            DeleteCustomMetricMutation::DESCRIPTION,
            |m: &CustomMetric| m.name.as_str(),
        )?;
        self.single::<DeleteCustomMetricMutation>(&DeleteCustomMetricVariables {
            custom_metric_id: metric.id,
            model_id,
        })
    }

    // Dashboards and evaluators

    #[instrument(skip(self))]
    pub fn get_all_dashboards(&self) -> Result<Vec<Dashboard>> {
        self.paginated::<GetAllDashboardsQuery>(&self.space_variables()?)
    }

    #[instrument(skip(self))]
    pub fn get_dashboard(&self, dashboard_name: &str) -> Result<Dashboard> {
        self.single::<GetDashboardByNameQuery>(&DashboardByNameVariables {
            space_id: self.space_id()?,
            dashboard_name: dashboard_name.to_string(),
        })
    }

    #[instrument(skip(self))]
    pub fn get_all_evaluators(&self) -> Result<Vec<Evaluator>> {
        self.paginated::<GetAllEvaluatorsQuery>(&self.space_variables()?)
    }

    // Import jobs

    #[instrument(skip(self))]
    pub fn get_all_file_import_jobs(&self) -> Result<Vec<FileImportJob>> {
        self.paginated::<GetAllFileImportJobsQuery>(&self.space_variables()?)
    }

    #[instrument(skip(self, job), fields(model = %job.model_name))]
    pub fn create_file_import_job(&self, job: NewFileImportJob) -> Result<FileImportJob> {
        self.single::<CreateFileImportJobMutation>(&CreateFileImportJobVariables {
            space_id: self.space_id()?,
            job,
        })
    }

    #[instrument(skip(self))]
    pub fn delete_file_import_job(&self, job_id: &str) -> Result<bool> {
        self.single::<DeleteFileImportJobMutation>(&DeleteFileImportJobVariables {
            job_id: job_id.to_string(),
        })
    }

    #[instrument(skip(self))]
    pub fn get_all_table_import_jobs(&self) -> Result<Vec<TableImportJob>> {
        self.paginated::<GetAllTableImportJobsQuery>(&self.space_variables()?)
    }
}
