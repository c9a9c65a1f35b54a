//! Report storage: one file per week or period under a root directory.

pub mod index;
pub mod paths;
pub mod store;

pub use index::render_index;
pub use paths::{period_report_path, week_report_path};
pub use store::{PeriodReport, ReportStore, WeekReport};
