use voc_core::LineageSettings;

use crate::cli::{Commands, GlobalFlags};

pub mod hash;
pub mod run;
pub mod schema;
pub mod shared;
pub mod show;
pub mod stamp;
pub mod status;

/// Dispatch a parsed command to the corresponding handler module.
pub fn dispatch(
    command: &Commands,
    settings: &LineageSettings,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Hash(args) => hash::handle(args, settings, flags),
        Commands::Status(args) => status::handle(args, settings, flags),
        Commands::Stamp(args) => stamp::handle(args, settings, flags),
        Commands::Run(args) => run::handle(args, settings, flags),
        Commands::Show(args) => show::handle(args, settings, flags),
        Commands::Schema => schema::handle(flags),
    }
}
