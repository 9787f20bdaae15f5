use crate::{
    error::{Error, Result},
    metrics::{Metric, RevertibleMean},
    types::{Label, LabelType, Prediction, PredictionType, ScalarLabel, ScalarPrediction},
    utils::AsInner,
};

#[derive(Debug, Clone, Default)]
pub struct MeanAbsoluteErrorMetric {
    mean: RevertibleMean,
}

impl MeanAbsoluteErrorMetric {
    pub fn new() -> MeanAbsoluteErrorMetric {
        MeanAbsoluteErrorMetric {
            mean: RevertibleMean::new(),
        }
    }

    fn absolute_error(label: &Label, prediction: &Prediction) -> Result<f32> {
        let label: &ScalarLabel = label.as_inner().ok_or_else(|| {
            Error::InvalidArgument(format!("MAE expects a scalar label, got {:?}", label))
        })?;
        let pred: &ScalarPrediction = prediction.as_inner().ok_or_else(|| {
            Error::InvalidArgument(format!(
                "MAE expects a scalar prediction, got {:?}",
                prediction.prediction_type()
            ))
        })?;
        Ok((label.0 - pred.0).abs())
    }
}

impl Metric for MeanAbsoluteErrorMetric {
    fn update(&mut self, label: &Label, prediction: &Prediction, weight: f32) -> Result<()> {
        let error = Self::absolute_error(label, prediction)?;
        self.mean.add(error, weight);
        Ok(())
    }

    fn revert(&mut self, label: &Label, prediction: &Prediction, weight: f32) -> Result<()> {
        let error = Self::absolute_error(label, prediction)?;
        let name = self.get_name();
        self.mean.remove(error, weight, &name)
    }

    fn get_value(&self) -> f32 {
        self.mean.get()
    }

    fn get_name(&self) -> String {
        "MAE".to_owned()
    }

    fn check_update(&self, label: &Label, prediction: &Prediction) -> Result<()> {
        Self::absolute_error(label, prediction).map(|_| ())
    }

    fn check_revert(&self, label: &Label, prediction: &Prediction, _weight: f32) -> Result<()> {
        Self::absolute_error(label, prediction)?;
        self.mean.check_remove(&self.get_name())
    }

    fn supports(&self, label_type: LabelType, prediction_type: PredictionType) -> bool {
        label_type == LabelType::Scalar && prediction_type == PredictionType::Scalar
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn pair(label: f32, prediction: f32) -> (Label, Prediction) {
        (
            Label::Scalar(label.into()),
            Prediction::Scalar(prediction.into()),
        )
    }

    #[test]
    fn test_mae_update_and_revert() {
        let mut mae = MeanAbsoluteErrorMetric::new();
        let (l1, p1) = pair(3.0, 2.5);
        let (l2, p2) = pair(-0.5, 0.0);
        let (l3, p3) = pair(2.0, 4.0);
        mae.update(&l1, &p1, 1.0).unwrap();
        mae.update(&l2, &p2, 1.0).unwrap();
        assert_relative_eq!(mae.get_value(), 0.5);

        mae.update(&l3, &p3, 1.0).unwrap();
        assert_relative_eq!(mae.get_value(), 1.0);

        mae.revert(&l3, &p3, 1.0).unwrap();
        assert_relative_eq!(mae.get_value(), 0.5);
    }

    #[test]
    fn test_mae_rejects_classification_inputs() {
        let mut mae = MeanAbsoluteErrorMetric::new();
        let label = Label::Binary(true.into());
        let (_, prediction) = pair(0.0, 1.0);
        assert!(matches!(
            mae.update(&label, &prediction, 1.0),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_mae_revert_without_update() {
        let mut mae = MeanAbsoluteErrorMetric::new();
        let (label, prediction) = pair(1.0, 1.0);
        assert!(matches!(
            mae.revert(&label, &prediction, 1.0),
            Err(Error::EmptyHistory(_))
        ));
    }
}
