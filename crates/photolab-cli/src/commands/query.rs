use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use photolab_core::sqlite::open_database;
use photolab_core::tabulate::paging;
use photolab_core::validators::vfile;

#[derive(Args)]
pub struct QueryArgs {
    /// SQLite database file
    #[arg(value_parser = vfile)]
    pub database: PathBuf,

    /// SQL statement to run
    pub sql: String,

    /// Rows per page
    #[arg(long)]
    pub page_size: Option<usize>,
}

pub fn run(args: &QueryArgs) -> Result<()> {
    let connection = open_database(&args.database)?;
    let mut statement = connection.prepare(&args.sql)?;
    paging(&mut statement, args.page_size)?;
    Ok(())
}
