use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::types::{ClassProbabilitiesPrediction, Features, Label};

/// A method a model may expose to the evaluation driver.
#[derive(Serialize, Deserialize, Display, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    #[display(fmt = "fit_one")]
    FitOne,
    #[display(fmt = "predict_one")]
    PredictOne,
    #[display(fmt = "predict_proba_one")]
    PredictProbaOne,
}

impl Capability {
    pub fn method_name(&self) -> &'static str {
        match self {
            Capability::FitOne => "fit_one",
            Capability::PredictOne => "predict_one",
            Capability::PredictProbaOne => "predict_proba_one",
        }
    }
}

pub trait Learner {
    fn fit_one(&mut self, features: &Features, label: &Label);
}

pub trait Regressor {
    fn predict_one(&self, features: &Features) -> f32;
}

pub trait ProbabilisticClassifier {
    fn predict_proba_one(&self, features: &Features) -> ClassProbabilitiesPrediction;
}

/// Capability discovery for an evaluated model.
///
/// Each accessor returns the model viewed through one capability trait, or
/// `None` if the model does not provide it. A model only overrides the
/// accessors for the traits it implements:
///
/// ```
/// use streameval_core::{model::*, Features, Label};
///
/// struct Constant;
///
/// impl Learner for Constant {
///     fn fit_one(&mut self, _features: &Features, _label: &Label) {}
/// }
///
/// impl Regressor for Constant {
///     fn predict_one(&self, _features: &Features) -> f32 {
///         1.0
///     }
/// }
///
/// impl Model for Constant {
///     fn as_learner(&self) -> Option<&dyn Learner> {
///         Some(self)
///     }
///     fn as_learner_mut(&mut self) -> Option<&mut dyn Learner> {
///         Some(self)
///     }
///     fn as_regressor(&self) -> Option<&dyn Regressor> {
///         Some(self)
///     }
/// }
///
/// assert!(Constant.implements(Capability::PredictOne));
/// assert!(!Constant.implements(Capability::PredictProbaOne));
/// ```
pub trait Model {
    fn as_learner(&self) -> Option<&dyn Learner> {
        None
    }

    fn as_learner_mut(&mut self) -> Option<&mut dyn Learner> {
        None
    }

    fn as_regressor(&self) -> Option<&dyn Regressor> {
        None
    }

    fn as_classifier(&self) -> Option<&dyn ProbabilisticClassifier> {
        None
    }

    /// Probes for a capability without invoking it.
    fn implements(&self, capability: Capability) -> bool {
        match capability {
            Capability::FitOne => self.as_learner().is_some(),
            Capability::PredictOne => self.as_regressor().is_some(),
            Capability::PredictProbaOne => self.as_classifier().is_some(),
        }
    }
}
