pub mod emit;
pub mod show;
