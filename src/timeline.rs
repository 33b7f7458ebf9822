pub mod timing;
pub mod track;
pub mod transition;
