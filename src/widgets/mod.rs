pub mod chart;
pub mod controls;
pub mod datatable;
pub mod stats;
pub mod text_input;
pub mod upload;
