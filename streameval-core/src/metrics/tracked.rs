use crate::{
    error::{Error, Result},
    metrics::Metric,
    tracker::RevertibleScalarTracker,
    types::{Label, Prediction},
};

/// Records the most recent prediction.
#[derive(Debug, Clone, Default)]
pub struct PredictionMetric {
    tracker: RevertibleScalarTracker,
}

impl PredictionMetric {
    pub fn new() -> PredictionMetric {
        PredictionMetric {
            tracker: RevertibleScalarTracker::new(),
        }
    }
}

impl Metric for PredictionMetric {
    fn update(&mut self, _label: &Label, prediction: &Prediction, _weight: f32) -> Result<()> {
        self.tracker.update(prediction.as_scalar());
        Ok(())
    }

    // The arguments carry no information here, the tracker pops its own history.
    fn revert(&mut self, _label: &Label, _prediction: &Prediction, _weight: f32) -> Result<()> {
        let name = self.get_name();
        self.tracker
            .revert()
            .map_err(|_| Error::EmptyHistory(name))?;
        Ok(())
    }

    fn check_revert(&self, _label: &Label, _prediction: &Prediction, _weight: f32) -> Result<()> {
        if self.tracker.is_empty() {
            return Err(Error::EmptyHistory(self.get_name()));
        }
        Ok(())
    }

    fn get_value(&self) -> f32 {
        self.tracker.get()
    }

    fn get_name(&self) -> String {
        "Prediction".to_owned()
    }
}

/// Records the most recent ground truth.
#[derive(Debug, Clone, Default)]
pub struct TruthMetric {
    tracker: RevertibleScalarTracker,
}

impl TruthMetric {
    pub fn new() -> TruthMetric {
        TruthMetric {
            tracker: RevertibleScalarTracker::new(),
        }
    }
}

impl Metric for TruthMetric {
    fn update(&mut self, label: &Label, _prediction: &Prediction, _weight: f32) -> Result<()> {
        self.tracker.update(label.as_scalar());
        Ok(())
    }

    fn revert(&mut self, _label: &Label, _prediction: &Prediction, _weight: f32) -> Result<()> {
        let name = self.get_name();
        self.tracker
            .revert()
            .map_err(|_| Error::EmptyHistory(name))?;
        Ok(())
    }

    fn check_revert(&self, _label: &Label, _prediction: &Prediction, _weight: f32) -> Result<()> {
        if self.tracker.is_empty() {
            return Err(Error::EmptyHistory(self.get_name()));
        }
        Ok(())
    }

    fn get_value(&self) -> f32 {
        self.tracker.get()
    }

    fn get_name(&self) -> String {
        "Truth".to_owned()
    }
}
