//! The dashboard: totals, an income/expense pie chart and the transaction lists.

mod cards;
mod charts;
mod handlers;

pub use handlers::get_dashboard_page;
