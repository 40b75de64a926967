pub mod chart;
pub mod controls;
pub mod force_graph;
pub mod kpi;

pub use chart::ChartCanvas;
pub use controls::{ChoiceSelect, CompanySelect};
pub use kpi::{KpiCard, Narrative, StatusBanner};
