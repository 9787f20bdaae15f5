pub trait AsInner<T>: Sized {
    fn as_inner(&self) -> Option<&T>;
    fn as_inner_mut(&mut self) -> Option<&mut T>;
}

/// Guards against dividing by an empty weight total.
#[must_use]
pub fn safe_div(numerator: f32, denominator: f32) -> f32 {
    if denominator.abs() <= f32::EPSILON {
        0.0
    } else {
        numerator / denominator
    }
}
