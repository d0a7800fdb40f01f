pub mod format;

pub use format::{format_date, format_date_time, status_color, status_options, ProjectView, StatusOption};
