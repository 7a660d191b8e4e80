pub mod explain;
pub mod graph;
pub mod run;
