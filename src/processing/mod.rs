/*! Post-processing of normalized outputs

- [package]: checksum files for distribution.
- [stats]: label and word statistics of a split.
!*/
pub mod package;
pub mod stats;
