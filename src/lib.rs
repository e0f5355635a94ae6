pub mod alignment;
pub mod color;
pub mod description;
pub mod element;
pub mod error;
pub mod export;
pub mod figure;
pub mod multitrack;
pub mod plasmid;
pub mod track;
