//! Async Arize client.
//!
//! Same operation set as [`super::ArizeClient`]; every call is a suspension
//! point and the transport is shareable with the migration engine.

use std::sync::Arc;

use arize_core::graphql::async_executor::{run_paginated, run_single};
use arize_core::graphql::ports::AsyncGraphQlTransport;
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
    ArizeConfig, ClientOptions, CustomMetric, Dashboard, Evaluator, FileImportJob, Model,
    ModelVolume, Monitor, MonitorCategory, MonitorSpec, NewCustomMetric, NewFileImportJob,
    NewPrompt, Prompt, PromptVersion, Result, Space, TableImportJob, User,
};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use tokio::sync::OnceCell;
use tracing::{info, instrument};

use super::{find_by_name, sum_volumes, TotalVolume};
use crate::graphql::AsyncHttpGraphQlTransport;
use crate::migration::GraphQlMigrationTarget;

pub struct AsyncArizeClient {
    config: ArizeConfig,
    options: ClientOptions,
    transport: Arc<dyn AsyncGraphQlTransport>,
    ids: OnceCell<OrgAndSpaceIds>,
}

impl AsyncArizeClient {
    pub fn new(config: ArizeConfig, options: ClientOptions) -> Result<Self> {
        let transport = AsyncHttpGraphQlTransport::new(&config, &options)?;
        Ok(Self::with_transport(config, options, Arc::new(transport)))
    }

    pub fn with_transport(
        config: ArizeConfig,
        options: ClientOptions,
        transport: Arc<dyn AsyncGraphQlTransport>,
    ) -> Self {
        Self { config, options, transport, ids: OnceCell::new() }
    }

    pub fn config(&self) -> &ArizeConfig {
        &self.config
    }

    pub fn transport(&self) -> Arc<dyn AsyncGraphQlTransport> {
        Arc::clone(&self.transport)
    }

    fn pagination(&self) -> PaginationOptions {
        PaginationOptions { page_delay: self.options.page_delay, max_pages: self.options.max_pages }
    }

    async fn single<D: QueryDescriptor>(&self, variables: &D::Variables) -> Result<D::Item> {
        run_single::<D, _>(self.transport.as_ref(), variables).await
    }

    async fn paginated<D: QueryDescriptor>(&self, variables: &D::Variables) -> Result<Vec<D::Item>> {
        run_paginated::<D, _>(self.transport.as_ref(), variables, &self.pagination()).await
    }

    async fn ids(&self) -> Result<&OrgAndSpaceIds> {
        self.ids
            .get_or_try_init(|| async {
                let names = OrgAndSpaceNames {
                    organization: self.config.organization.clone(),
                    space: self.config.space.clone(),
                };
                let ids = self.single::<OrgIdAndSpaceIdQuery>(&names).await?;
                info!(organization_id = %ids.organization_id, space_id = %ids.space_id, "resolved organization and space");
                Ok(ids)
            })
            .await
    }

    pub async fn organization_id(&self) -> Result<String> {
        Ok(self.ids().await?.organization_id.clone())
    }

    pub async fn space_id(&self) -> Result<String> {
        Ok(self.ids().await?.space_id.clone())
    }

    async fn space_variables(&self) -> Result<SpaceVariables> {
        Ok(SpaceVariables::new(self.space_id().await?))
    }

    /// Importer target writing into this client's space.
    pub async fn migration_target(&self) -> Result<GraphQlMigrationTarget> {
        Ok(GraphQlMigrationTarget::new(self.transport(), self.space_id().await?))
    }

    #[instrument(skip(self))]
    pub async fn get_all_spaces(&self) -> Result<Vec<Space>> {
        let variables = OrganizationVariables::new(self.organization_id().await?);
        self.paginated::<GetAllSpacesQuery>(&variables).await
    }

    #[instrument(skip(self))]
    pub async fn get_all_users(&self) -> Result<Vec<User>> {
        let variables = OrganizationVariables::new(self.organization_id().await?);
        self.paginated::<GetAllUsersQuery>(&variables).await
    }

    #[instrument(skip(self))]
    pub async fn get_all_models(&self) -> Result<Vec<Model>> {
        let variables = self.space_variables().await?;
        self.paginated::<GetAllModelsQuery>(&variables).await
    }

    #[instrument(skip(self))]
    pub async fn get_model(&self, model_name: &str) -> Result<Model> {
        let variables =
            ModelByNameVariables { space_id: self.space_id().await?, model_name: model_name.to_string() };
        self.single::<GetModelByNameQuery>(&variables).await
    }

    async fn model_id(&self, model_name: &str) -> Result<String> {
        Ok(self.get_model(model_name).await?.id)
    }

    #[instrument(skip(self))]
    pub async fn get_model_volume(
        &self,
        model_name: &str,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
    ) -> Result<ModelVolume> {
        let variables =
            ModelVolumeVariables { model_id: self.model_id(model_name).await?, start_time, end_time };
        self.single::<GetModelVolumeQuery>(&variables).await
    }

    /// Prediction volume of every model in the space, fetched concurrently.
    #[instrument(skip(self))]
    pub async fn get_total_volume(
        &self,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
    ) -> Result<TotalVolume> {
        let models = self.get_all_models().await?;
        let lookups = models.iter().map(|model| {
            let variables = ModelVolumeVariables { model_id: model.id.clone(), start_time, end_time };
            async move { self.single::<GetModelVolumeQuery>(&variables).await }
        });
        let volumes = join_all(lookups).await;

        let mut pairs = Vec::with_capacity(models.len());
        for (model, volume) in models.into_iter().zip(volumes) {
            pairs.push((model.name, volume?.total_volume));
        }
        Ok(sum_volumes(pairs))
    }

    #[instrument(skip(self))]
    pub async fn delete_model(&self, model_name: &str) -> Result<bool> {
        let variables = ModelVariables::new(self.model_id(model_name).await?);
        let deleted = self.single::<DeleteModelQuery>(&variables).await?;
        info!(model = model_name, "deleted model");
        Ok(deleted)
    }

    #[instrument(skip(self))]
    pub async fn get_all_monitors(
        &self,
        model_name: &str,
        category: Option<MonitorCategory>,
    ) -> Result<Vec<Monitor>> {
        let variables =
            MonitorListVariables { model_id: self.model_id(model_name).await?, monitor_category: category };
        self.paginated::<GetAllMonitorsQuery>(&variables).await
    }

    #[instrument(skip(self))]
    pub async fn get_monitor(&self, model_name: &str, monitor_name: &str) -> Result<Monitor> {
        let variables = MonitorByNameVariables {
            model_id: self.model_id(model_name).await?,
            monitor_name: monitor_name.to_string(),
        };
        self.single::<GetMonitorByNameQuery>(&variables).await
    }

    #[instrument(skip(self, spec), fields(category = %spec.category(), monitor = spec.name()))]
    pub async fn create_monitor(&self, model_name: &str, spec: MonitorSpec) -> Result<String> {
        let model_id = self.model_id(model_name).await?;
        let created = match spec {
            MonitorSpec::Performance(spec) => {
                self.single::<CreatePerformanceMonitorMutation>(&CreateMonitorVariables { model_id, spec })
                    .await
            }
            MonitorSpec::Drift(spec) => {
                self.single::<CreateDriftMonitorMutation>(&CreateMonitorVariables { model_id, spec }).await
            }
            MonitorSpec::DataQuality(spec) => {
                self.single::<CreateDataQualityMonitorMutation>(&CreateMonitorVariables { model_id, spec })
                    .await
            }
        }?;
        info!(monitor_id = %created.id, "created monitor");
        Ok(created.id)
    }

    #[instrument(skip(self))]
    pub async fn delete_monitor(&self, model_name: &str, monitor_name: &str) -> Result<bool> {
        let monitor = self.get_monitor(model_name, monitor_name).await?;
        self.single::<DeleteMonitorMutation>(&DeleteMonitorVariables { monitor_id: monitor.id }).await
    }

    #[instrument(skip(self))]
    pub async fn get_all_prompts(&self) -> Result<Vec<Prompt>> {
        let variables = self.space_variables().await?;
        self.paginated::<GetAllPromptsQuery>(&variables).await
    }

    #[instrument(skip(self))]
    pub async fn get_prompt(&self, prompt_name: &str) -> Result<Prompt> {
        let variables =
            PromptByNameVariables { space_id: self.space_id().await?, prompt_name: prompt_name.to_string() };
        self.single::<GetPromptByNameQuery>(&variables).await
    }

    #[instrument(skip(self))]
    pub async fn get_prompt_versions(&self, prompt_name: &str) -> Result<Vec<PromptVersion>> {
        let prompt = self.get_prompt(prompt_name).await?;
        self.paginated::<GetPromptVersionsQuery>(&PromptVariables { prompt_id: prompt.id }).await
    }

    #[instrument(skip(self, prompt), fields(prompt = %prompt.name))]
    pub async fn create_prompt(&self, prompt: NewPrompt) -> Result<String> {
        let variables = CreatePromptVariables { space_id: self.space_id().await?, prompt };
        Ok(self.single::<CreatePromptMutation>(&variables).await?.id)
    }

    #[instrument(skip(self))]
    pub async fn delete_prompt(&self, prompt_name: &str) -> Result<bool> {
        let prompt = self.get_prompt(prompt_name).await?;
        let variables = DeletePromptVariables { space_id: self.space_id().await?, prompt_id: prompt.id };
        self.single::<DeletePromptMutation>(&variables).await
    }

    #[instrument(skip(self))]
    pub async fn get_all_custom_metrics(&self, model_name: &str) -> Result<Vec<CustomMetric>> {
        let variables = ModelVariables::new(self.model_id(model_name).await?);
        self.paginated::<GetAllCustomMetricsQuery>(&variables).await
    }

    #[instrument(skip(self, metric), fields(metric = %metric.name))]
    pub async fn create_custom_metric(&self, model_name: &str, metric: NewCustomMetric) -> Result<String> {
        let variables = CreateCustomMetricVariables { model_id: self.model_id(model_name).await?, metric };
        Ok(self.single::<CreateCustomMetricMutation>(&variables).await?.id)
    }

    #[instrument(skip(self))]
    pub async fn delete_custom_metric(&self, model_name: &str, metric_name: &str) -> Result<bool> {
        let model_id = self.model_id(model_name).await?;
        let metrics = self
            .paginated::<GetAllCustomMetricsQuery>(&ModelVariables::new(model_id.clone()))
            .await?;
        let metric = find_by_name(
            metrics,
            metric_name,
            "custom metric",
            DeleteCustomMetricMutation::DESCRIPTION,
            |m: &CustomMetric| m.name.as_str(),
        )?;
        let variables = DeleteCustomMetricVariables { custom_metric_id: metric.id, model_id };
        self.single::<DeleteCustomMetricMutation>(&variables).await
    }

    #[instrument(skip(self))]
    pub async fn get_all_dashboards(&self) -> Result<Vec<Dashboard>> {
        let variables = self.space_variables().await?;
        self.paginated::<GetAllDashboardsQuery>(&variables).await
    }

    #[instrument(skip(self))]
    pub async fn get_dashboard(&self, dashboard_name: &str) -> Result<Dashboard> {
        let variables = DashboardByNameVariables {
            space_id: self.space_id().await?,
            dashboard_name: dashboard_name.to_string(),
        };
        self.single::<GetDashboardByNameQuery>(&variables).await
    }

    #[instrument(skip(self))]
    pub async fn get_all_evaluators(&self) -> Result<Vec<Evaluator>> {
        let variables = self.space_variables().await?;
        self.paginated::<GetAllEvaluatorsQuery>(&variables).await
    }

    #[instrument(skip(self))]
    pub async fn get_all_file_import_jobs(&self) -> Result<Vec<FileImportJob>> {
        let variables = self.space_variables().await?;
        self.paginated::<GetAllFileImportJobsQuery>(&variables).await
    }

    #[instrument(skip(self, job), fields(model = %job.model_name))]
    pub async fn create_file_import_job(&self, job: NewFileImportJob) -> Result<FileImportJob> {
        let variables = CreateFileImportJobVariables { space_id: self.space_id().await?, job };
        self.single::<CreateFileImportJobMutation>(&variables).await
    }

    #[instrument(skip(self))]
    pub async fn delete_file_import_job(&self, job_id: &str) -> Result<bool> {
        let variables = DeleteFileImportJobVariables { job_id: job_id.to_string() };
        self.single::<DeleteFileImportJobMutation>(&variables).await
    }

    #[instrument(skip(self))]
    pub async fn get_all_table_import_jobs(&self) -> Result<Vec<TableImportJob>> {
        let variables = self.space_variables().await?;
        self.paginated::<GetAllTableImportJobsQuery>(&variables).await
    }
}
