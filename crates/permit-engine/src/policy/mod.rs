pub mod checker;
pub mod decision;
pub mod enhanced;
