use std::{collections::BTreeMap, str::FromStr};

use derive_more::Display;
use itertools::Itertools;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    metrics::{get_metric, Metric},
    model::{Capability, Model},
    types::{
        BinaryProbabilityPrediction, Features, LabelType, Prediction, PredictionType,
        ScalarPrediction,
    },
};

#[derive(
    Serialize, Deserialize, JsonSchema, Display, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy,
)]
#[serde(rename_all = "lowercase")]
pub enum FlavorKind {
    #[display(fmt = "regression")]
    Regression,
    #[display(fmt = "binary")]
    Binary,
    #[display(fmt = "multiclass")]
    MultiClass,
}

impl FlavorKind {
    pub fn name(&self) -> &'static str {
        self.flavor().name()
    }

    pub fn flavor(&self) -> &'static Flavor {
        match self {
            FlavorKind::Regression => &FLAVORS[0],
            FlavorKind::Binary => &FLAVORS[1],
            FlavorKind::MultiClass => &FLAVORS[2],
        }
    }
}

impl FromStr for FlavorKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        FLAVORS
            .iter()
            .find(|f| f.name == s)
            .map(|f| f.kind)
            .ok_or_else(|| {
                Error::UnknownFlavor(format!(
                    "\"{}\". Available flavors are: {}",
                    s,
                    FLAVORS.iter().map(|f| f.name).join(", ")
                ))
            })
    }
}

/// A model task type: what a model must implement to be evaluated as such,
/// which method produces its predictions and which metrics track it.
#[derive(Debug, PartialEq, Eq)]
pub struct Flavor {
    kind: FlavorKind,
    name: &'static str,
    required_methods: &'static [Capability],
    prediction_method: Capability,
    label_type: LabelType,
    prediction_type: PredictionType,
    metric_names: &'static [&'static str],
}

/// Every flavor starts its default metrics with these trackers.
pub const TRACKER_METRICS: [&str; 2] = ["prediction", "truth"];

static FLAVORS: [Flavor; 3] = [
    Flavor {
        kind: FlavorKind::Regression,
        name: "regression",
        required_methods: &[Capability::FitOne, Capability::PredictOne],
        prediction_method: Capability::PredictOne,
        label_type: LabelType::Scalar,
        prediction_type: PredictionType::Scalar,
        metric_names: &["mae"],
    },
    Flavor {
        kind: FlavorKind::Binary,
        name: "binary",
        required_methods: &[Capability::FitOne, Capability::PredictProbaOne],
        prediction_method: Capability::PredictProbaOne,
        label_type: LabelType::Binary,
        prediction_type: PredictionType::BinaryProbability,
        metric_names: &["accuracy", "log_loss", "precision", "recall", "f1"],
    },
    Flavor {
        kind: FlavorKind::MultiClass,
        name: "multiclass",
        required_methods: &[Capability::FitOne, Capability::PredictProbaOne],
        prediction_method: Capability::PredictProbaOne,
        label_type: LabelType::Class,
        prediction_type: PredictionType::ClassProbabilities,
        metric_names: &[
            "accuracy",
            "cross_entropy",
            "macro_precision",
            "macro_recall",
            "macro_f1",
            "micro_precision",
            "micro_recall",
            "micro_f1",
        ],
    },
];

/// All flavors keyed by name.
pub fn allowed_flavors() -> BTreeMap<String, &'static Flavor> {
    FLAVORS.iter().map(|f| (f.name.to_owned(), f)).collect()
}

pub fn get_flavor(name: &str) -> Result<&'static Flavor> {
    name.parse::<FlavorKind>().map(|kind| kind.flavor())
}

impl Flavor {
    pub fn kind(&self) -> FlavorKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn required_methods(&self) -> &'static [Capability] {
        self.required_methods
    }

    pub fn prediction_method(&self) -> Capability {
        self.prediction_method
    }

    pub fn prediction_method_name(&self) -> &'static str {
        self.prediction_method.method_name()
    }

    pub fn label_type(&self) -> LabelType {
        self.label_type
    }

    pub fn prediction_type(&self) -> PredictionType {
        self.prediction_type
    }

    /// Names of every default metric, trackers first.
    pub fn default_metric_names(&self) -> impl Iterator<Item = &'static str> {
        TRACKER_METRICS
            .into_iter()
            .chain(self.metric_names.iter().copied())
    }

    /// Checks whether a model exposes every method this flavor requires.
    ///
    /// Returns the first missing method as a reason. Nothing on the model is
    /// invoked.
    pub fn check_model(&self, model: &dyn Model) -> (bool, Option<String>) {
        for method in self.required_methods {
            if !model.implements(*method) {
                tracing::debug!(flavor = self.name, %method, "model check failed");
                return (false, Some(format!("The model does not implement {method}.")));
            }
        }
        (true, None)
    }

    /// Fresh metric instances with empty state: the prediction and truth
    /// trackers, then this flavor's statistical metrics.
    pub fn default_metrics(&self) -> Vec<Box<dyn Metric>> {
        self.default_metric_names()
            .map(|name| {
                get_metric(name)
                    .unwrap_or_else(|| panic!("default metric \"{name}\" is not registered"))
            })
            .collect()
    }

    /// Whether `metric` accepts this flavor's label and prediction types.
    pub fn supports_metric(&self, metric: &dyn Metric) -> bool {
        metric.supports(self.label_type, self.prediction_type)
    }

    /// Calls this flavor's prediction method on `model`.
    pub fn predict(&self, model: &dyn Model, features: &Features) -> Result<Prediction> {
        let missing = || {
            Error::MissingCapability(format!(
                "{} models must implement {}",
                self.name, self.prediction_method
            ))
        };
        match self.prediction_method {
            Capability::PredictOne => {
                let regressor = model.as_regressor().ok_or_else(missing)?;
                Ok(Prediction::Scalar(ScalarPrediction(
                    regressor.predict_one(features),
                )))
            }
            Capability::PredictProbaOne => {
                let classifier = model.as_classifier().ok_or_else(missing)?;
                let probabilities = classifier.predict_proba_one(features);
                Ok(match self.kind {
                    FlavorKind::Binary => Prediction::BinaryProbability(
                        BinaryProbabilityPrediction(probabilities.probability_of(1)),
                    ),
                    _ => Prediction::ClassProbabilities(probabilities),
                })
            }
            Capability::FitOne => Err(missing()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flavor_names_round_trip() {
        for (name, flavor) in allowed_flavors() {
            assert_eq!(name, flavor.name());
            assert_eq!(name.parse::<FlavorKind>().unwrap(), flavor.kind());
            assert_eq!(flavor.kind().to_string(), name);
            assert_eq!(flavor.kind().flavor(), flavor);
        }
    }

    #[test]
    fn test_unknown_flavor_lists_available() {
        match get_flavor("ranking") {
            Err(Error::UnknownFlavor(message)) => {
                assert!(message.contains("regression, binary, multiclass"))
            }
            _ => panic!("expected UnknownFlavor"),
        }
    }

    #[test]
    fn test_prediction_method_is_required() {
        for flavor in allowed_flavors().values() {
            assert!(flavor
                .required_methods()
                .contains(&flavor.prediction_method()));
        }
    }

    #[test]
    fn test_every_default_metric_is_registered_and_supported() {
        for flavor in allowed_flavors().values() {
            for name in flavor.default_metric_names() {
                let metric = get_metric(name).unwrap();
                assert!(flavor.supports_metric(metric.as_ref()), "{name}");
            }
        }
    }

    #[test]
    fn test_statistical_metrics_are_limited_to_their_flavor() {
        let mae = get_metric("mae").unwrap();
        let log_loss = get_metric("log_loss").unwrap();
        let accuracy = get_metric("accuracy").unwrap();
        assert!(FlavorKind::Regression.flavor().supports_metric(mae.as_ref()));
        assert!(!FlavorKind::Binary.flavor().supports_metric(mae.as_ref()));
        assert!(!FlavorKind::MultiClass.flavor().supports_metric(log_loss.as_ref()));
        assert!(FlavorKind::MultiClass.flavor().supports_metric(accuracy.as_ref()));
        assert!(!FlavorKind::Regression.flavor().supports_metric(accuracy.as_ref()));
    }
}
