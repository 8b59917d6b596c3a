//! Chart renderers. Both consume `report::Chart` series only.

pub mod ascii;
pub mod svg;

pub use ascii::render_ascii_chart;
pub use svg::{render_svg, write_svg_charts};
