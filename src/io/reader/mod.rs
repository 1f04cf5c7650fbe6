/*! Record file reading

Code is organized in the same manner as the [crate::io::writer] mod.
!*/
mod jsonl;

pub use jsonl::JsonlReader;
