use clap::{crate_version, ArgEnum, Parser};
use std::path::PathBuf;

#[derive(Clone, Parser)]
#[clap(name = "goat")]
#[clap(bin_name = "goat")]
#[clap(version = crate_version!())]
pub struct GoatArgs {
    /// Source file to compile.
    pub file: PathBuf,
    /// Language of the diagnostic messages.
    #[clap(long, arg_enum, default_value = "en")]
    pub lang: Lang,
    /// Print the parsed tree on success.
    #[clap(long)]
    pub print_ast: bool,
    /// Enable a verbose logging format.
    #[clap(long, global = true)]
    pub verbose: bool,
    /// Enable logging spans.
    #[clap(long, global = true)]
    pub log_spans: bool,
}

#[derive(Clone, Copy, ArgEnum)]
pub enum Lang {
    /// English diagnostics.
    En,
    /// Russian diagnostics.
    Ru,
}

impl From<Lang> for goat_syntax::messages::Language {
    fn from(lang: Lang) -> Self {
        match lang {
            Lang::En => Self::English,
            Lang::Ru => Self::Russian,
        }
    }
}
