pub mod lineage;
pub mod parse;
