use crate::prelude::*;
use clap::Parser;

mod error;
mod prelude;
mod report;
mod reveal;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Recover text hidden under drawn-on redaction boxes in PDF documents"
)]
pub struct App {
    #[clap(flatten)]
    pub options: reveal::RevealOptions,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "UNREDACT_VERBOSE", default_value = "false")]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    reveal::run(app.options, app.global).map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
