use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::utils::AsInner;

macro_rules! impl_conversion_traits {
    ($target_type: ident, $enum_variant: ident, $structname: ident) => {
        impl From<$structname> for $target_type {
            fn from(f: $structname) -> Self {
                $target_type::$enum_variant(f)
            }
        }

        impl AsInner<$structname> for $target_type {
            fn as_inner(&self) -> Option<&$structname> {
                match self {
                    $target_type::$enum_variant(f) => Some(f),
                    #[allow(unreachable_patterns)]
                    _ => None,
                }
            }
            fn as_inner_mut(&mut self) -> Option<&mut $structname> {
                match self {
                    $target_type::$enum_variant(f) => Some(f),
                    #[allow(unreachable_patterns)]
                    _ => None,
                }
            }
        }
    };
}

/// Named numeric features of a single observation.
pub type Features = BTreeMap<String, f32>;

/// 0-based class index for multiclass problems.
pub type ClassIndex = usize;

#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct ScalarPrediction(pub f32);

impl From<f32> for ScalarPrediction {
    fn from(f: f32) -> Self {
        ScalarPrediction(f)
    }
}

/// Probability that the label is `true`.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct BinaryProbabilityPrediction(pub f32);

impl BinaryProbabilityPrediction {
    pub fn decision(&self) -> bool {
        self.0 >= 0.5
    }
}

/// (class, probability) pairs. Classes missing from the list have probability 0.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct ClassProbabilitiesPrediction(pub Vec<(ClassIndex, f32)>);

impl ClassProbabilitiesPrediction {
    pub fn probability_of(&self, class: ClassIndex) -> f32 {
        self.0
            .iter()
            .find(|(c, _)| *c == class)
            .map_or(0.0, |(_, p)| *p)
    }

    /// Most probable class, lowest index wins ties.
    pub fn argmax(&self) -> Option<ClassIndex> {
        self.0
            .iter()
            .fold(None, |best: Option<(ClassIndex, f32)>, &(class, p)| match best {
                Some((best_class, best_p))
                    if best_p > p || (best_p == p && best_class < class) =>
                {
                    Some((best_class, best_p))
                }
                _ => Some((class, p)),
            })
            .map(|(class, _)| class)
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Prediction {
    Scalar(ScalarPrediction),
    BinaryProbability(BinaryProbabilityPrediction),
    ClassProbabilities(ClassProbabilitiesPrediction),
}

impl_conversion_traits!(Prediction, Scalar, ScalarPrediction);
impl_conversion_traits!(Prediction, BinaryProbability, BinaryProbabilityPrediction);
impl_conversion_traits!(Prediction, ClassProbabilities, ClassProbabilitiesPrediction);

impl Prediction {
    pub fn prediction_type(&self) -> PredictionType {
        match self {
            Prediction::Scalar(_) => PredictionType::Scalar,
            Prediction::BinaryProbability(_) => PredictionType::BinaryProbability,
            Prediction::ClassProbabilities(_) => PredictionType::ClassProbabilities,
        }
    }

    /// Scalar view recorded by the prediction tracker. Class probabilities
    /// collapse to the most probable class index.
    pub fn as_scalar(&self) -> f32 {
        match self {
            Prediction::Scalar(p) => p.0,
            Prediction::BinaryProbability(p) => p.0,
            Prediction::ClassProbabilities(p) => p.argmax().map_or(0.0, |c| c as f32),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
pub enum PredictionType {
    Scalar,
    BinaryProbability,
    ClassProbabilities,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScalarLabel(pub f32);

impl From<f32> for ScalarLabel {
    fn from(f: f32) -> Self {
        ScalarLabel(f)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryLabel(pub bool);

impl From<bool> for BinaryLabel {
    fn from(b: bool) -> Self {
        BinaryLabel(b)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassLabel(pub ClassIndex);

impl From<ClassIndex> for ClassLabel {
    fn from(c: ClassIndex) -> Self {
        ClassLabel(c)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Label {
    Scalar(ScalarLabel),
    Binary(BinaryLabel),
    Class(ClassLabel),
}
impl_conversion_traits!(Label, Scalar, ScalarLabel);
impl_conversion_traits!(Label, Binary, BinaryLabel);
impl_conversion_traits!(Label, Class, ClassLabel);

impl Label {
    pub fn label_type(&self) -> LabelType {
        match self {
            Label::Scalar(_) => LabelType::Scalar,
            Label::Binary(_) => LabelType::Binary,
            Label::Class(_) => LabelType::Class,
        }
    }

    /// Scalar view recorded by the truth tracker.
    pub fn as_scalar(&self) -> f32 {
        match self {
            Label::Scalar(l) => l.0,
            Label::Binary(l) => {
                if l.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Label::Class(l) => l.0 as f32,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
pub enum LabelType {
    Scalar,
    Binary,
    Class,
}
