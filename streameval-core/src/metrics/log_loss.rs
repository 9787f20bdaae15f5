use crate::{
    error::{Error, Result},
    metrics::{Metric, RevertibleMean},
    types::{
        BinaryLabel, BinaryProbabilityPrediction, ClassLabel, ClassProbabilitiesPrediction, Label,
        LabelType, Prediction, PredictionType,
    },
    utils::AsInner,
};

/// Probabilities are clamped to `[PROBABILITY_EPSILON, 1 - PROBABILITY_EPSILON]`
/// so a confident mistake costs a large but finite loss.
const PROBABILITY_EPSILON: f32 = 1e-7;

fn clamped_ln(probability: f32) -> f32 {
    probability
        .clamp(PROBABILITY_EPSILON, 1.0 - PROBABILITY_EPSILON)
        .ln()
}

/// Binary logarithmic loss.
#[derive(Debug, Clone, Default)]
pub struct LogLossMetric {
    mean: RevertibleMean,
}

impl LogLossMetric {
    pub fn new() -> LogLossMetric {
        LogLossMetric::default()
    }

    fn loss(label: &Label, prediction: &Prediction) -> Result<f32> {
        let label: &BinaryLabel = label.as_inner().ok_or_else(|| {
            Error::InvalidArgument(format!("LogLoss expects a binary label, got {:?}", label))
        })?;
        let pred: &BinaryProbabilityPrediction = prediction.as_inner().ok_or_else(|| {
            Error::InvalidArgument(format!(
                "LogLoss expects a binary probability, got {:?}",
                prediction.prediction_type()
            ))
        })?;
        let p_true = if label.0 { pred.0 } else { 1.0 - pred.0 };
        Ok(-clamped_ln(p_true))
    }
}

impl Metric for LogLossMetric {
    fn update(&mut self, label: &Label, prediction: &Prediction, weight: f32) -> Result<()> {
        let loss = Self::loss(label, prediction)?;
        self.mean.add(loss, weight);
        Ok(())
    }

    fn revert(&mut self, label: &Label, prediction: &Prediction, weight: f32) -> Result<()> {
        let loss = Self::loss(label, prediction)?;
        let name = self.get_name();
        self.mean.remove(loss, weight, &name)
    }

    fn get_value(&self) -> f32 {
        self.mean.get()
    }

    fn get_name(&self) -> String {
        "LogLoss".to_owned()
    }

    fn check_update(&self, label: &Label, prediction: &Prediction) -> Result<()> {
        Self::loss(label, prediction).map(|_| ())
    }

    fn check_revert(&self, label: &Label, prediction: &Prediction, _weight: f32) -> Result<()> {
        Self::loss(label, prediction)?;
        self.mean.check_remove(&self.get_name())
    }

    fn supports(&self, label_type: LabelType, prediction_type: PredictionType) -> bool {
        label_type == LabelType::Binary && prediction_type == PredictionType::BinaryProbability
    }
}

/// Multiclass cross-entropy: negative log probability given to the true class.
#[derive(Debug, Clone, Default)]
pub struct CrossEntropyMetric {
    mean: RevertibleMean,
}

impl CrossEntropyMetric {
    pub fn new() -> CrossEntropyMetric {
        CrossEntropyMetric::default()
    }

    fn loss(label: &Label, prediction: &Prediction) -> Result<f32> {
        let label: &ClassLabel = label.as_inner().ok_or_else(|| {
            Error::InvalidArgument(format!(
                "CrossEntropy expects a class label, got {:?}",
                label
            ))
        })?;
        let pred: &ClassProbabilitiesPrediction = prediction.as_inner().ok_or_else(|| {
            Error::InvalidArgument(format!(
                "CrossEntropy expects class probabilities, got {:?}",
                prediction.prediction_type()
            ))
        })?;
        Ok(-clamped_ln(pred.probability_of(label.0)))
    }
}

impl Metric for CrossEntropyMetric {
    fn update(&mut self, label: &Label, prediction: &Prediction, weight: f32) -> Result<()> {
        let loss = Self::loss(label, prediction)?;
        self.mean.add(loss, weight);
        Ok(())
    }

    fn revert(&mut self, label: &Label, prediction: &Prediction, weight: f32) -> Result<()> {
        let loss = Self::loss(label, prediction)?;
        let name = self.get_name();
        self.mean.remove(loss, weight, &name)
    }

    fn get_value(&self) -> f32 {
        self.mean.get()
    }

    fn get_name(&self) -> String {
        "CrossEntropy".to_owned()
    }

    fn check_update(&self, label: &Label, prediction: &Prediction) -> Result<()> {
        Self::loss(label, prediction).map(|_| ())
    }

    fn check_revert(&self, label: &Label, prediction: &Prediction, _weight: f32) -> Result<()> {
        Self::loss(label, prediction)?;
        self.mean.check_remove(&self.get_name())
    }

    fn supports(&self, label_type: LabelType, prediction_type: PredictionType) -> bool {
        label_type == LabelType::Class && prediction_type == PredictionType::ClassProbabilities
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_log_loss() {
        let mut metric = LogLossMetric::new();
        let positive = Label::Binary(true.into());
        let negative = Label::Binary(false.into());
        let confident = Prediction::BinaryProbability(BinaryProbabilityPrediction(0.9));
        metric.update(&positive, &confident, 1.0).unwrap();
        assert_relative_eq!(metric.get_value(), -(0.9_f32.ln()), epsilon = 1e-6);

        metric.update(&negative, &confident, 1.0).unwrap();
        let expected = (-(0.9_f32.ln()) - (0.1_f32.ln())) / 2.0;
        assert_relative_eq!(metric.get_value(), expected, epsilon = 1e-5);

        metric.revert(&negative, &confident, 1.0).unwrap();
        assert_relative_eq!(metric.get_value(), -(0.9_f32.ln()), epsilon = 1e-5);
    }

    #[test]
    fn test_log_loss_is_finite_for_certain_mistakes() {
        let mut metric = LogLossMetric::new();
        let wrong = Prediction::BinaryProbability(BinaryProbabilityPrediction(0.0));
        metric
            .update(&Label::Binary(true.into()), &wrong, 1.0)
            .unwrap();
        assert!(metric.get_value().is_finite());
    }

    #[test]
    fn test_clamp_bounds_both_ends() {
        assert!(clamped_ln(1.0) < 0.0);
        assert!(clamped_ln(0.0).is_finite());
        assert_relative_eq!(clamped_ln(0.0), PROBABILITY_EPSILON.ln());
    }

    #[test]
    fn test_check_revert_leaves_state_alone() {
        let metric = LogLossMetric::new();
        let label = Label::Binary(true.into());
        let prediction = Prediction::BinaryProbability(BinaryProbabilityPrediction(0.6));
        assert!(metric.check_update(&label, &prediction).is_ok());
        assert!(matches!(
            metric.check_revert(&label, &prediction, 1.0),
            Err(Error::EmptyHistory(_))
        ));
        assert!(metric
            .check_update(&Label::Class(0.into()), &prediction)
            .is_err());
    }

    #[test]
    fn test_cross_entropy_uses_true_class_probability() {
        let mut metric = CrossEntropyMetric::new();
        let prediction = Prediction::ClassProbabilities(ClassProbabilitiesPrediction(vec![
            (0, 0.2),
            (1, 0.5),
            (2, 0.3),
        ]));
        metric
            .update(&Label::Class(1.into()), &prediction, 1.0)
            .unwrap();
        assert_relative_eq!(metric.get_value(), -(0.5_f32.ln()), epsilon = 1e-6);
        assert!(metric
            .update(&Label::Scalar(1.0.into()), &prediction, 1.0)
            .is_err());
    }
}
