pub mod align;
pub mod cost;
pub mod error;
pub mod hclust;
pub mod io;
pub mod phylo;
pub mod seq;
