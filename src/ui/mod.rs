pub mod input;
pub mod navigation;
pub mod tooltip;
