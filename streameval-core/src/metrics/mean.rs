use crate::{
    error::{Error, Result},
    utils::safe_div,
};

/// Weighted running mean whose contributions can be subtracted again.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RevertibleMean {
    sum: f32,
    weight: f32,
    count: u64,
}

impl RevertibleMean {
    pub fn new() -> RevertibleMean {
        RevertibleMean::default()
    }

    pub fn add(&mut self, value: f32, weight: f32) {
        self.sum += value * weight;
        self.weight += weight;
        self.count += 1;
    }

    /// `name` identifies the owning metric in the error.
    pub fn remove(&mut self, value: f32, weight: f32, name: &str) -> Result<()> {
        self.check_remove(name)?;
        self.sum -= value * weight;
        self.weight -= weight;
        self.count -= 1;
        if self.count == 0 {
            // Drop accumulated rounding error once everything is undone.
            *self = RevertibleMean::default();
        }
        Ok(())
    }

    pub fn check_remove(&self, name: &str) -> Result<()> {
        if self.count == 0 {
            return Err(Error::EmptyHistory(name.to_owned()));
        }
        Ok(())
    }

    pub fn get(&self) -> f32 {
        safe_div(self.sum, self.weight)
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_weighted_mean() {
        let mut mean = RevertibleMean::new();
        mean.add(1.0, 1.0);
        mean.add(4.0, 2.0);
        assert_relative_eq!(mean.get(), 3.0);

        mean.remove(4.0, 2.0, "mean").unwrap();
        assert_relative_eq!(mean.get(), 1.0);
        mean.remove(1.0, 1.0, "mean").unwrap();
        assert_eq!(mean, RevertibleMean::new());
        assert!(mean.remove(1.0, 1.0, "mean").is_err());
    }
}
