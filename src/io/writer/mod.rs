/*! Record file writing

- [WriterTrait] is what the normalizer hands accepted records to.
- [JsonlWriter] writes them as JSON Lines, gzip-compressed or not.
- [Discard] drops them.
!*/
mod jsonl;
mod writertrait;

pub use jsonl::JsonlWriter;
pub use writertrait::{Discard, WriterTrait};
