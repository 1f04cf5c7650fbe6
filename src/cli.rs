//! Command line arguments and parameters management/parsing.
use std::path::PathBuf;

use structopt::StructOpt;

use seacrowd::formats::BioPolicy;
use seacrowd::normalize::NormalizeOptions;

#[derive(Debug, StructOpt)]
#[structopt(name = "seacrowd", about = "Southeast-Asian dataset schema normalization.")]
/// Holds every command that is callable by the `seacrowd` command.
pub enum Seacrowd {
    #[structopt(about = "List canonical schemas, or print the JSON Schema of one")]
    Schemas(Schemas),
    #[structopt(about = "List datasets and their configs")]
    Datasets(Datasets),
    #[structopt(about = "Print the card and features of a config")]
    Info(Info),
    #[structopt(about = "Normalize a dataset config")]
    Normalize(Normalize),
    #[structopt(about = "Validate JSON Lines records against a canonical schema")]
    Validate(Validate),
    #[structopt(about = "Label and word statistics of a normalized split")]
    Stats(Stats),
    #[structopt(about = "Compute checksums of normalized configs")]
    Package(Package),
}

#[derive(Debug, StructOpt)]
pub struct Schemas {
    #[structopt(long = "show", help = "print the JSON Schema of a schema (e.g. seq_label)")]
    pub show: Option<String>,
}

#[derive(Debug, StructOpt)]
pub struct Datasets {}

#[derive(Debug, StructOpt)]
pub struct Info {
    #[structopt(help = "config name (e.g. burapha_th_digit_seacrowd_imtext)")]
    pub config: String,
}

#[derive(Debug, StructOpt)]
/// Normalize command and parameters.
///
/// ```sh
/// USAGE:
///     seacrowd normalize [FLAGS] [OPTIONS] <config> <src> <dst>
///
/// ARGS:
///     <config>    config name
///     <src>       root of the extracted dataset files
///     <dst>       output folder
/// ```
pub struct Normalize {
    #[structopt(help = "config name")]
    pub config: String,
    #[structopt(parse(from_os_str), help = "root of the extracted dataset files")]
    pub src: PathBuf,
    #[structopt(parse(from_os_str), help = "output folder")]
    pub dst: PathBuf,
    #[structopt(long = "strict", help = "abort on the first rejected record")]
    pub strict: bool,
    #[structopt(
        long = "max-reject-ratio",
        help = "fail a split when more than this share of its records is rejected",
        default_value = "1.0"
    )]
    pub max_reject_ratio: f64,
    #[structopt(
        long = "bio",
        help = "BIO sequences handling: ignore, reject or repair",
        default_value = "ignore"
    )]
    pub bio: BioPolicy,
    #[structopt(long = "compress", help = "gzip output files")]
    pub compress: bool,
    #[structopt(
        help = "number of records validated at once.",
        long = "chunk_size",
        default_value = "1000",
        short = "s"
    )]
    pub chunk_size: usize,
    #[structopt(
        long = "max-reported-failures",
        help = "number of failures kept in reports",
        default_value = "100"
    )]
    pub max_reported_failures: usize,
}

impl From<&Normalize> for NormalizeOptions {
    fn from(n: &Normalize) -> Self {
        NormalizeOptions {
            strict: n.strict,
            max_reject_ratio: n.max_reject_ratio,
            bio_policy: n.bio,
            max_reported_failures: n.max_reported_failures,
            chunk_size: n.chunk_size,
        }
    }
}

#[derive(Debug, StructOpt)]
pub struct Validate {
    #[structopt(help = "canonical schema (e.g. seq_label or seacrowd_seq_label)")]
    pub schema: String,
    #[structopt(parse(from_os_str), required = true, help = "JSON Lines files (.jsonl or .jsonl.gz)")]
    pub files: Vec<PathBuf>,
    #[structopt(long = "labels", help = "comma-separated label set, for labelled schemas")]
    pub labels: Option<String>,
    #[structopt(
        long = "bio",
        help = "BIO sequences handling: ignore, reject or repair",
        default_value = "ignore"
    )]
    pub bio: BioPolicy,
}

#[derive(Debug, StructOpt)]
pub struct Stats {
    #[structopt(parse(from_os_str), help = "normalized split (.jsonl or .jsonl.gz)")]
    pub src: PathBuf,
    #[structopt(parse(from_os_str), help = "destination csv file")]
    pub dst: PathBuf,
}

#[derive(Debug, StructOpt)]
#[structopt(about = "Compute a sha384sum file for each config folder.")]
pub struct Package {
    #[structopt(parse(from_os_str), help = "normalized output location")]
    pub dst: PathBuf,
}
