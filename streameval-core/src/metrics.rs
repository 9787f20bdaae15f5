mod confusion;
mod log_loss;
mod mean;
mod mean_absolute_error;
mod metric;
mod metric_registry;
mod tracked;

pub use confusion::*;
pub use log_loss::*;
pub use mean::*;
pub use mean_absolute_error::*;
pub use metric::*;
pub use metric_registry::*;
pub use tracked::*;
