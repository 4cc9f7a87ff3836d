//! Dashboard page loaders: one module per dashboard variant. Each loader is
//! a stateless read path that fetches a page of rows plus aggregate
//! statistics and renders them.

pub mod cells;
pub mod modules;
pub mod stations;
pub mod statistics;
