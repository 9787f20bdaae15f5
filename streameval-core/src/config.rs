use schemars::{schema::RootSchema, schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    flavor::FlavorKind,
    metrics::{get_metric, metric_names},
};

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct EvaluationConfig {
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    _schema: Option<String>,
    flavor: FlavorKind,
    /// Registered metric names tracked after the flavor's defaults.
    #[serde(default)]
    extra_metrics: Vec<String>,
}

impl EvaluationConfig {
    pub fn new(flavor: FlavorKind) -> EvaluationConfig {
        EvaluationConfig {
            _schema: None,
            flavor,
            extra_metrics: Vec::new(),
        }
    }

    pub fn with_extra_metrics(mut self, extra_metrics: Vec<String>) -> EvaluationConfig {
        self.extra_metrics = extra_metrics;
        self
    }

    pub fn from_json(json: &str) -> Result<EvaluationConfig> {
        let config: EvaluationConfig = serde_json::from_str(json).map_err(|e| {
            Error::InvalidConfiguration(format!("Failed to parse configuration: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> Result<EvaluationConfig> {
        let json_from_yaml = serde_yaml::from_str::<serde_json::Value>(yaml)
            .map_err(|e| Error::InvalidConfiguration(format!("Failed to parse yaml: {e}")))?;
        let config: EvaluationConfig = serde_json::from_value(json_from_yaml).map_err(|e| {
            Error::InvalidConfiguration(format!("Failed to parse configuration: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let flavor = self.flavor.flavor();
        for name in &self.extra_metrics {
            let metric = get_metric(name).ok_or_else(|| {
                Error::InvalidConfiguration(format!(
                    "Unknown metric \"{}\". Available metrics are: {}",
                    name,
                    metric_names().collect::<Vec<_>>().join(", ")
                ))
            })?;
            if !flavor.supports_metric(metric.as_ref()) {
                return Err(Error::InvalidConfiguration(format!(
                    "Metric \"{}\" cannot evaluate {} predictions",
                    name,
                    flavor.name()
                )));
            }
        }
        Ok(())
    }

    pub fn flavor(&self) -> FlavorKind {
        self.flavor
    }

    pub fn extra_metrics(&self) -> &[String] {
        &self.extra_metrics
    }
}

/// JSON schema describing [`EvaluationConfig`] files.
pub fn gen_config_schema() -> RootSchema {
    schema_for!(EvaluationConfig)
}
