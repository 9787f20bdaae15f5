use crate::{
    error::Result,
    types::{Label, LabelType, Prediction, PredictionType},
};

/// An online accumulator fed one `(label, prediction)` pair at a time.
///
/// `revert` undoes the most recent `update`. Implementations that can
/// recompute their state from the arguments (sums, confusion counts) subtract
/// the given pair; trackers ignore the arguments and pop their own history.
/// Reverting with nothing left to undo is an [`Error::EmptyHistory`].
///
/// `check_update` and `check_revert` report the error the matching call would
/// return without touching any state, so a caller driving several metrics can
/// validate all of them before mutating one.
///
/// [`Error::EmptyHistory`]: crate::error::Error::EmptyHistory
pub trait Metric {
    fn update(&mut self, label: &Label, prediction: &Prediction, weight: f32) -> Result<()>;
    fn revert(&mut self, label: &Label, prediction: &Prediction, weight: f32) -> Result<()>;
    fn get_value(&self) -> f32;
    fn get_name(&self) -> String;

    fn check_update(&self, _label: &Label, _prediction: &Prediction) -> Result<()> {
        Ok(())
    }

    fn check_revert(&self, label: &Label, prediction: &Prediction, weight: f32) -> Result<()>;

    /// Whether labels and predictions of these kinds can be consumed at all.
    fn supports(&self, _label_type: LabelType, _prediction_type: PredictionType) -> bool {
        true
    }
}
