use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use super::*;

type MetricConstructor = fn() -> Box<dyn Metric>;

fn create<M: Metric + Default + 'static>() -> Box<dyn Metric> {
    Box::<M>::default()
}

static METRIC_REGISTRY: Lazy<BTreeMap<&'static str, MetricConstructor>> = Lazy::new(|| {
    let mut registry: BTreeMap<&'static str, MetricConstructor> = BTreeMap::new();
    registry.insert("prediction", create::<PredictionMetric>);
    registry.insert("truth", create::<TruthMetric>);
    registry.insert("mae", create::<MeanAbsoluteErrorMetric>);
    registry.insert("accuracy", create::<AccuracyMetric>);
    registry.insert("log_loss", create::<LogLossMetric>);
    registry.insert("precision", create::<PrecisionMetric>);
    registry.insert("recall", create::<RecallMetric>);
    registry.insert("f1", create::<F1Metric>);
    registry.insert("cross_entropy", create::<CrossEntropyMetric>);
    registry.insert("macro_precision", create::<MacroPrecisionMetric>);
    registry.insert("macro_recall", create::<MacroRecallMetric>);
    registry.insert("macro_f1", create::<MacroF1Metric>);
    registry.insert("micro_precision", create::<MicroPrecisionMetric>);
    registry.insert("micro_recall", create::<MicroRecallMetric>);
    registry.insert("micro_f1", create::<MicroF1Metric>);
    registry
});

/// Creates a fresh instance of the metric registered under `name`.
pub fn get_metric(name: &str) -> Option<Box<dyn Metric>> {
    METRIC_REGISTRY.get(name).map(|create| create())
}

pub fn metric_names() -> impl Iterator<Item = &'static str> {
    METRIC_REGISTRY.keys().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_registered_metric_is_constructible() {
        for name in metric_names() {
            assert!(get_metric(name).is_some(), "{name}");
        }
        assert!(get_metric("mse").is_none());
    }

    #[test]
    fn test_registry_returns_fresh_instances() {
        let label = crate::Label::Scalar(2.0.into());
        let prediction = crate::Prediction::Scalar(3.0.into());
        let mut first = get_metric("truth").unwrap();
        first.update(&label, &prediction, 1.0).unwrap();
        let second = get_metric("truth").unwrap();
        assert_eq!(first.get_value(), 2.0);
        assert_eq!(second.get_value(), 0.0);
    }
}
