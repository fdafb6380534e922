use std::ops::Add;

/// Folds per-vertex values into a partition-local partial, then merges
/// partials into one global value per superstep. `merge` must be
/// commutative and associative: partials arrive in worker order, which
/// is unspecified.
pub trait Aggregator<VV>: Send + Sync {
    fn name(&self) -> &str;

    fn observe(&self, partial: Option<VV>, value: &VV) -> Option<VV>;

    fn merge(&self, a: Option<VV>, b: Option<VV>) -> Option<VV>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MinAggregator;

impl<VV: Ord + Clone + Send + Sync> Aggregator<VV> for MinAggregator {
    fn name(&self) -> &str {
        "min"
    }

    fn observe(&self, partial: Option<VV>, value: &VV) -> Option<VV> {
        match partial {
            None => Some(value.clone()),
            Some(p) => Some(p.min(value.clone())),
        }
    }

    fn merge(&self, a: Option<VV>, b: Option<VV>) -> Option<VV> {
        match (a, b) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MaxAggregator;

impl<VV: Ord + Clone + Send + Sync> Aggregator<VV> for MaxAggregator {
    fn name(&self) -> &str {
        "max"
    }

    fn observe(&self, partial: Option<VV>, value: &VV) -> Option<VV> {
        match partial {
            None => Some(value.clone()),
            Some(p) => Some(p.max(value.clone())),
        }
    }

    fn merge(&self, a: Option<VV>, b: Option<VV>) -> Option<VV> {
        match (a, b) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SumAggregator;

impl<VV> Aggregator<VV> for SumAggregator
where
    VV: Add<Output = VV> + Clone + Send + Sync,
{
    fn name(&self) -> &str {
        "sum"
    }

    fn observe(&self, partial: Option<VV>, value: &VV) -> Option<VV> {
        match partial {
            None => Some(value.clone()),
            Some(p) => Some(p + value.clone()),
        }
    }

    fn merge(&self, a: Option<VV>, b: Option<VV>) -> Option<VV> {
        match (a, b) {
            (Some(a), Some(b)) => Some(a + b),
            (a, b) => a.or(b),
        }
    }
}
