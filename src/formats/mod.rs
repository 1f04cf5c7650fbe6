/*!
# Source formats

Parsers for the raw formats dataset loaders consume.

- [conll]: whitespace-separated token/tag columns.
- [bio]: the BIO tagging scheme found in CoNLL tag columns.
- [conllu]: Universal Dependencies treebanks.
- [table]: delimited metadata tables.

Readers are iterators over `Result<_, Error>`: a malformed unit (sentence, row) is reported on its own and reading goes on.
!*/
pub mod bio;
pub mod conll;
pub mod conllu;
pub mod table;

pub use bio::BioPolicy;
pub use conll::ConllReader;
pub use conllu::ConlluReader;
pub use table::{TableOptions, TableReader};
