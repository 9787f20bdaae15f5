use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;

use crate::{
    error::{Error, Result},
    metrics::Metric,
    types::{Label, LabelType, Prediction, PredictionType},
    utils::safe_div,
    ClassIndex,
};

/// Class used as "positive" by the binary precision/recall/F1 metrics.
const POSITIVE_CLASS: ClassIndex = 1;

/// Slack for float drift when matching a removed weight against its cell.
const WEIGHT_TOLERANCE: f32 = 1e-5;

/// Extracts `(true class, predicted class)` from a binary or multiclass pair.
fn class_pair(label: &Label, prediction: &Prediction) -> Result<(ClassIndex, ClassIndex)> {
    match (label, prediction) {
        (Label::Binary(l), Prediction::BinaryProbability(p)) => {
            Ok((l.0 as ClassIndex, p.decision() as ClassIndex))
        }
        (Label::Class(l), Prediction::ClassProbabilities(p)) => match p.argmax() {
            Some(predicted) => Ok((l.0, predicted)),
            None => Err(Error::InvalidArgument(
                "class probabilities must not be empty".to_owned(),
            )),
        },
        (l, p) => Err(Error::InvalidArgument(format!(
            "classification metrics expect binary or class labels with matching probabilities, got {:?} and {:?}",
            l.label_type(),
            p.prediction_type()
        ))),
    }
}

/// Weighted confusion counts keyed by `(true class, predicted class)`.
#[derive(Debug, Clone, Default)]
pub struct ConfusionMatrix {
    counts: BTreeMap<(ClassIndex, ClassIndex), f32>,
    num_updates: u64,
}

impl ConfusionMatrix {
    pub fn new() -> ConfusionMatrix {
        ConfusionMatrix::default()
    }

    pub fn add(&mut self, truth: ClassIndex, predicted: ClassIndex, weight: f32) {
        *self.counts.entry((truth, predicted)).or_insert(0.0) += weight;
        self.num_updates += 1;
    }

    /// Fails if `(truth, predicted)` does not hold at least `weight`.
    pub fn check_remove(
        &self,
        truth: ClassIndex,
        predicted: ClassIndex,
        weight: f32,
        name: &str,
    ) -> Result<()> {
        if self.num_updates == 0 {
            return Err(Error::EmptyHistory(name.to_owned()));
        }
        match self.counts.get(&(truth, predicted)) {
            Some(&count) if count + WEIGHT_TOLERANCE >= weight => Ok(()),
            Some(&count) => Err(Error::InvalidArgument(format!(
                "{name}: cannot remove weight {weight} from ({truth}, {predicted}), which holds {count}"
            ))),
            None => Err(Error::InvalidArgument(format!(
                "{name}: ({truth}, {predicted}) was never recorded"
            ))),
        }
    }

    pub fn remove(
        &mut self,
        truth: ClassIndex,
        predicted: ClassIndex,
        weight: f32,
        name: &str,
    ) -> Result<()> {
        self.check_remove(truth, predicted, weight, name)?;
        let key = (truth, predicted);
        if let Some(count) = self.counts.get_mut(&key) {
            *count -= weight;
            if *count <= WEIGHT_TOLERANCE {
                self.counts.remove(&key);
            }
        }
        self.num_updates -= 1;
        if self.num_updates == 0 {
            self.counts.clear();
        }
        Ok(())
    }

    /// Every class seen either as a label or as a prediction.
    pub fn classes(&self) -> BTreeSet<ClassIndex> {
        self.counts
            .keys()
            .flat_map(|&(truth, predicted)| [truth, predicted])
            .collect()
    }

    pub fn total_weight(&self) -> f32 {
        self.counts.values().sum()
    }

    pub fn true_positives(&self, class: ClassIndex) -> f32 {
        self.counts.get(&(class, class)).copied().unwrap_or(0.0)
    }

    pub fn false_positives(&self, class: ClassIndex) -> f32 {
        self.counts
            .iter()
            .filter(|((truth, predicted), _)| *predicted == class && *truth != class)
            .map(|(_, w)| w)
            .sum()
    }

    pub fn false_negatives(&self, class: ClassIndex) -> f32 {
        self.counts
            .iter()
            .filter(|((truth, predicted), _)| *truth == class && *predicted != class)
            .map(|(_, w)| w)
            .sum()
    }

    pub fn accuracy(&self) -> f32 {
        let correct: f32 = self.classes().iter().map(|&c| self.true_positives(c)).sum();
        safe_div(correct, self.total_weight())
    }

    pub fn precision(&self, class: ClassIndex) -> f32 {
        let tp = self.true_positives(class);
        safe_div(tp, tp + self.false_positives(class))
    }

    pub fn recall(&self, class: ClassIndex) -> f32 {
        let tp = self.true_positives(class);
        safe_div(tp, tp + self.false_negatives(class))
    }

    pub fn f1(&self, class: ClassIndex) -> f32 {
        let precision = self.precision(class);
        let recall = self.recall(class);
        safe_div(2.0 * precision * recall, precision + recall)
    }

    fn macro_average(&self, score: impl Fn(&Self, ClassIndex) -> f32) -> f32 {
        let classes = self.classes();
        let total: f32 = classes.iter().map(|&c| score(self, c)).sum();
        safe_div(total, classes.len() as f32)
    }

    pub fn macro_precision(&self) -> f32 {
        self.macro_average(Self::precision)
    }

    pub fn macro_recall(&self) -> f32 {
        self.macro_average(Self::recall)
    }

    pub fn macro_f1(&self) -> f32 {
        self.macro_average(Self::f1)
    }

    pub fn micro_precision(&self) -> f32 {
        let (tp, fp) = self
            .classes()
            .iter()
            .map(|&c| (self.true_positives(c), self.false_positives(c)))
            .fold((0.0, 0.0), |(tp, fp), (t, f)| (tp + t, fp + f));
        safe_div(tp, tp + fp)
    }

    pub fn micro_recall(&self) -> f32 {
        let (tp, fn_) = self
            .classes()
            .iter()
            .map(|&c| (self.true_positives(c), self.false_negatives(c)))
            .fold((0.0, 0.0), |(tp, fn_), (t, f)| (tp + t, fn_ + f));
        safe_div(tp, tp + fn_)
    }

    pub fn micro_f1(&self) -> f32 {
        let precision = self.micro_precision();
        let recall = self.micro_recall();
        safe_div(2.0 * precision * recall, precision + recall)
    }
}

impl std::fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cells = self
            .counts
            .iter()
            .map(|((truth, predicted), w)| format!("{truth}->{predicted}: {w}"))
            .join(", ");
        write!(f, "[{cells}]")
    }
}

macro_rules! impl_confusion_metric {
    ($structname: ident, $name: expr, $score: expr) => {
        #[derive(Debug, Clone, Default)]
        pub struct $structname {
            matrix: ConfusionMatrix,
        }

        impl $structname {
            pub fn new() -> $structname {
                $structname::default()
            }

            pub fn matrix(&self) -> &ConfusionMatrix {
                &self.matrix
            }
        }

        impl Metric for $structname {
            fn update(&mut self, label: &Label, prediction: &Prediction, weight: f32) -> Result<()> {
                let (truth, predicted) = class_pair(label, prediction)?;
                self.matrix.add(truth, predicted, weight);
                Ok(())
            }

            fn revert(&mut self, label: &Label, prediction: &Prediction, weight: f32) -> Result<()> {
                let (truth, predicted) = class_pair(label, prediction)?;
                let name = self.get_name();
                self.matrix.remove(truth, predicted, weight, &name)
            }

            fn get_value(&self) -> f32 {
                let score: fn(&ConfusionMatrix) -> f32 = $score;
                score(&self.matrix)
            }

            fn get_name(&self) -> String {
                $name.to_owned()
            }

            fn check_update(&self, label: &Label, prediction: &Prediction) -> Result<()> {
                class_pair(label, prediction).map(|_| ())
            }

            fn check_revert(&self, label: &Label, prediction: &Prediction, weight: f32) -> Result<()> {
                let (truth, predicted) = class_pair(label, prediction)?;
                self.matrix.check_remove(truth, predicted, weight, &self.get_name())
            }

            fn supports(&self, label_type: LabelType, prediction_type: PredictionType) -> bool {
                matches!(
                    (label_type, prediction_type),
                    (LabelType::Binary, PredictionType::BinaryProbability)
                        | (LabelType::Class, PredictionType::ClassProbabilities)
                )
            }
        }
    };
}

impl_confusion_metric!(AccuracyMetric, "Accuracy", |m| m.accuracy());
impl_confusion_metric!(PrecisionMetric, "Precision", |m| m.precision(POSITIVE_CLASS));
impl_confusion_metric!(RecallMetric, "Recall", |m| m.recall(POSITIVE_CLASS));
impl_confusion_metric!(F1Metric, "F1", |m| m.f1(POSITIVE_CLASS));
impl_confusion_metric!(MacroPrecisionMetric, "MacroPrecision", |m| m.macro_precision());
impl_confusion_metric!(MacroRecallMetric, "MacroRecall", |m| m.macro_recall());
impl_confusion_metric!(MacroF1Metric, "MacroF1", |m| m.macro_f1());
impl_confusion_metric!(MicroPrecisionMetric, "MicroPrecision", |m| m.micro_precision());
impl_confusion_metric!(MicroRecallMetric, "MicroRecall", |m| m.micro_recall());
impl_confusion_metric!(MicroF1Metric, "MicroF1", |m| m.micro_f1());
