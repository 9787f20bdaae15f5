use approx::assert_relative_eq;
use streameval_core::{
    error::Error,
    flavor::{allowed_flavors, get_flavor, FlavorKind},
    metrics::Metric,
    model::{Learner, Model, ProbabilisticClassifier, Regressor},
    ClassProbabilitiesPrediction, Features, Label, Prediction, ScalarPrediction,
};

struct FitOnly;

impl Learner for FitOnly {
    fn fit_one(&mut self, _features: &Features, _label: &Label) {}
}

impl Model for FitOnly {
    fn as_learner(&self) -> Option<&dyn Learner> {
        Some(self)
    }
    fn as_learner_mut(&mut self) -> Option<&mut dyn Learner> {
        Some(self)
    }
}

struct FitAndPredict;

impl Learner for FitAndPredict {
    fn fit_one(&mut self, _features: &Features, _label: &Label) {}
}

impl Regressor for FitAndPredict {
    fn predict_one(&self, _features: &Features) -> f32 {
        0.0
    }
}

impl Model for FitAndPredict {
    fn as_learner(&self) -> Option<&dyn Learner> {
        Some(self)
    }
    fn as_learner_mut(&mut self) -> Option<&mut dyn Learner> {
        Some(self)
    }
    fn as_regressor(&self) -> Option<&dyn Regressor> {
        Some(self)
    }
}

struct PredictProbaOnly;

impl ProbabilisticClassifier for PredictProbaOnly {
    fn predict_proba_one(&self, _features: &Features) -> ClassProbabilitiesPrediction {
        ClassProbabilitiesPrediction(vec![(0, 0.5), (1, 0.5)])
    }
}

impl Model for PredictProbaOnly {
    fn as_classifier(&self) -> Option<&dyn ProbabilisticClassifier> {
        Some(self)
    }
}

fn scalar_pair(label: f32, prediction: f32) -> (Label, Prediction) {
    (
        Label::Scalar(label.into()),
        Prediction::Scalar(ScalarPrediction(prediction)),
    )
}

fn update_tracker(metric: &mut dyn Metric, value: f32) {
    let (label, prediction) = scalar_pair(value, value);
    metric.update(&label, &prediction, 1.0).unwrap();
}

fn revert_tracker(metric: &mut dyn Metric) -> Result<(), Error> {
    let (label, prediction) = scalar_pair(f32::NAN, f32::NAN);
    metric.revert(&label, &prediction, 1.0)
}

#[test]
fn test_allowed_flavors_are_exactly_the_three() {
    let names: Vec<String> = allowed_flavors().into_keys().collect();
    assert_eq!(names, vec!["binary", "multiclass", "regression"]);
}

#[test]
fn test_default_metric_sizes() {
    let flavors = allowed_flavors();
    assert_eq!(flavors["regression"].default_metrics().len(), 3);
    assert_eq!(flavors["binary"].default_metrics().len(), 7);
    assert_eq!(flavors["multiclass"].default_metrics().len(), 10);
}

#[test]
fn test_default_metric_order() {
    let names = |kind: FlavorKind| -> Vec<String> {
        kind.flavor()
            .default_metrics()
            .iter()
            .map(|m| m.get_name())
            .collect()
    };
    assert_eq!(names(FlavorKind::Regression), ["Prediction", "Truth", "MAE"]);
    assert_eq!(
        names(FlavorKind::Binary),
        ["Prediction", "Truth", "Accuracy", "LogLoss", "Precision", "Recall", "F1"]
    );
    assert_eq!(
        names(FlavorKind::MultiClass),
        [
            "Prediction",
            "Truth",
            "Accuracy",
            "CrossEntropy",
            "MacroPrecision",
            "MacroRecall",
            "MacroF1",
            "MicroPrecision",
            "MicroRecall",
            "MicroF1"
        ]
    );
}

#[test]
fn test_first_two_metrics_follow_the_undo_law() {
    for flavor in allowed_flavors().values() {
        let mut metrics = flavor.default_metrics();
        for metric in metrics.iter_mut().take(2) {
            update_tracker(metric.as_mut(), 1.0);
            update_tracker(metric.as_mut(), 2.0);
            update_tracker(metric.as_mut(), 3.0);
            revert_tracker(metric.as_mut()).unwrap();
            assert_relative_eq!(metric.get_value(), 2.0);
            revert_tracker(metric.as_mut()).unwrap();
            revert_tracker(metric.as_mut()).unwrap();
            assert_relative_eq!(metric.get_value(), 0.0);
            assert!(matches!(
                revert_tracker(metric.as_mut()),
                Err(Error::EmptyHistory(_))
            ));
        }
    }
}

#[test]
fn test_prediction_and_truth_record_their_own_argument() {
    let mut metrics = get_flavor("regression").unwrap().default_metrics();
    let (label, prediction) = scalar_pair(7.0, 5.0);
    for metric in metrics.iter_mut() {
        metric.update(&label, &prediction, 1.0).unwrap();
    }
    assert_relative_eq!(metrics[0].get_value(), 5.0);
    assert_relative_eq!(metrics[1].get_value(), 7.0);
}

#[test]
fn test_default_metrics_are_fresh_instances() {
    let flavor = get_flavor("binary").unwrap();
    let mut first = flavor.default_metrics();
    let second = flavor.default_metrics();
    update_tracker(first[0].as_mut(), 4.0);
    update_tracker(first[1].as_mut(), 4.0);
    assert_relative_eq!(first[0].get_value(), 4.0);
    assert_relative_eq!(second[0].get_value(), 0.0);
    assert_relative_eq!(second[1].get_value(), 0.0);

    let mut from_registry = allowed_flavors()["binary"].default_metrics();
    update_tracker(from_registry[0].as_mut(), 9.0);
    let again = allowed_flavors()["binary"].default_metrics();
    assert_relative_eq!(again[0].get_value(), 0.0);
}

#[test]
fn test_check_model_reports_first_missing_method() {
    let flavors = allowed_flavors();
    assert_eq!(
        flavors["regression"].check_model(&FitOnly),
        (
            false,
            Some("The model does not implement predict_one.".to_owned())
        )
    );
    assert_eq!(
        flavors["binary"].check_model(&FitOnly),
        (
            false,
            Some("The model does not implement predict_proba_one.".to_owned())
        )
    );
    assert_eq!(flavors["regression"].check_model(&FitAndPredict), (true, None));
    assert_eq!(
        flavors["multiclass"].check_model(&PredictProbaOnly),
        (
            false,
            Some("The model does not implement fit_one.".to_owned())
        )
    );
}

#[test]
fn test_prediction_method_names() {
    let flavors = allowed_flavors();
    assert_eq!(flavors["regression"].prediction_method_name(), "predict_one");
    assert_eq!(flavors["binary"].prediction_method_name(), "predict_proba_one");
    assert_eq!(
        flavors["multiclass"].prediction_method_name(),
        "predict_proba_one"
    );
}

#[test]
fn test_predict_dispatches_on_flavor() {
    let features = Features::new();
    let binary = FlavorKind::Binary
        .flavor()
        .predict(&PredictProbaOnly, &features)
        .unwrap();
    assert_eq!(binary.prediction_type(), streameval_core::PredictionType::BinaryProbability);
    assert_relative_eq!(binary.as_scalar(), 0.5);

    let regression = FlavorKind::Regression
        .flavor()
        .predict(&FitAndPredict, &features)
        .unwrap();
    assert_eq!(regression, Prediction::Scalar(ScalarPrediction(0.0)));

    assert!(matches!(
        FlavorKind::Regression.flavor().predict(&FitOnly, &features),
        Err(Error::MissingCapability(_))
    ));
}
