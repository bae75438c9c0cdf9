pub mod config;
pub mod ops_add;
pub mod ops_check;
pub mod ops_init;
pub mod ops_plan;
pub mod ops_tree;
