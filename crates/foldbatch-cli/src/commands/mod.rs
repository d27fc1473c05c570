pub mod benchmark;
pub mod mutate;
pub mod run;
