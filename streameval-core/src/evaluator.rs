use serde::{Deserialize, Serialize};

use crate::{
    config::EvaluationConfig,
    error::{Error, Result},
    flavor::Flavor,
    metrics::{get_metric, Metric},
    model::Model,
    types::{Features, Label, Prediction},
};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MetricReport {
    pub name: String,
    pub value: f32,
}

/// Evaluation state of a single stream.
///
/// Owns its own metric instances, so every concurrently evaluated model or
/// stream needs its own `Evaluator`.
pub struct Evaluator {
    flavor: &'static Flavor,
    metrics: Vec<Box<dyn Metric>>,
    num_updates: u64,
}

impl Evaluator {
    pub fn new(flavor: &'static Flavor) -> Evaluator {
        tracing::debug!(flavor = flavor.name(), "starting evaluation session");
        Evaluator {
            flavor,
            metrics: flavor.default_metrics(),
            num_updates: 0,
        }
    }

    pub fn from_config(config: &EvaluationConfig) -> Result<Evaluator> {
        let mut evaluator = Evaluator::new(config.flavor().flavor());
        for name in config.extra_metrics() {
            let metric =
                get_metric(name).ok_or_else(|| Error::UnknownMetric(name.to_owned()))?;
            if !evaluator.flavor.supports_metric(metric.as_ref()) {
                return Err(Error::InvalidConfiguration(format!(
                    "Metric \"{}\" cannot evaluate {} predictions",
                    name,
                    evaluator.flavor.name()
                )));
            }
            evaluator.metrics.push(metric);
        }
        Ok(evaluator)
    }

    pub fn flavor(&self) -> &'static Flavor {
        self.flavor
    }

    pub fn metrics(&self) -> &[Box<dyn Metric>] {
        &self.metrics
    }

    /// Net number of updates, reverts subtracted.
    pub fn num_updates(&self) -> u64 {
        self.num_updates
    }

    fn check_types(&self, label: &Label, prediction: &Prediction) -> Result<()> {
        if label.label_type() != self.flavor.label_type() {
            return Err(Error::InvalidArgument(format!(
                "{} evaluation expects {:?} labels, got {:?}",
                self.flavor.name(),
                self.flavor.label_type(),
                label.label_type()
            )));
        }
        if prediction.prediction_type() != self.flavor.prediction_type() {
            return Err(Error::InvalidArgument(format!(
                "{} evaluation expects {:?} predictions, got {:?}",
                self.flavor.name(),
                self.flavor.prediction_type(),
                prediction.prediction_type()
            )));
        }
        if let Prediction::ClassProbabilities(probabilities) = prediction {
            if probabilities.0.is_empty() {
                return Err(Error::InvalidArgument(
                    "class probabilities must not be empty".to_owned(),
                ));
            }
        }
        Ok(())
    }

    /// Feeds one observation to every metric, in order.
    ///
    /// Every metric validates the observation before any of them changes, so
    /// a failed update leaves the session untouched.
    pub fn update(&mut self, label: &Label, prediction: &Prediction, weight: f32) -> Result<()> {
        self.check_types(label, prediction)?;
        for metric in &self.metrics {
            metric.check_update(label, prediction)?;
        }
        for metric in self.metrics.iter_mut() {
            metric.update(label, prediction, weight)?;
        }
        self.num_updates += 1;
        Ok(())
    }

    /// Retracts the most recent observation from every metric, in order.
    /// Like [`Evaluator::update`], nothing changes unless every metric can
    /// revert.
    pub fn revert(&mut self, label: &Label, prediction: &Prediction, weight: f32) -> Result<()> {
        self.check_types(label, prediction)?;
        if self.num_updates == 0 {
            return Err(Error::EmptyHistory("evaluation".to_owned()));
        }
        for metric in &self.metrics {
            metric.check_revert(label, prediction, weight)?;
        }
        for metric in self.metrics.iter_mut() {
            metric.revert(label, prediction, weight)?;
        }
        self.num_updates -= 1;
        tracing::trace!(remaining = self.num_updates, "reverted observation");
        Ok(())
    }

    /// Predicts with the flavor's prediction method, records the observation,
    /// then trains the model on it.
    pub fn learn_one(
        &mut self,
        model: &mut dyn Model,
        features: &Features,
        label: &Label,
    ) -> Result<Prediction> {
        if let (false, Some(reason)) = self.flavor.check_model(model) {
            return Err(Error::MissingCapability(reason));
        }
        let prediction = self.flavor.predict(model, features)?;
        self.update(label, &prediction, 1.0)?;
        model
            .as_learner_mut()
            .ok_or_else(|| Error::MissingCapability("fit_one".to_owned()))?
            .fit_one(features, label);
        Ok(prediction)
    }

    pub fn report(&self) -> Vec<MetricReport> {
        self.metrics
            .iter()
            .map(|metric| MetricReport {
                name: metric.get_name(),
                value: metric.get_value(),
            })
            .collect()
    }
}
