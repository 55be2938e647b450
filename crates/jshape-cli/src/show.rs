//! # Show Subcommand
//!
//! Prints declared types in legend form (`name = definition`).

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use jshape_core::Namespace;
use jshape_report::{definition, RenderOptions};

/// Arguments for `jshape show`.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Declaration file (YAML or JSON).
    #[arg(long, value_name = "FILE")]
    pub decl: PathBuf,

    /// Print only this type. All types are printed when omitted.
    #[arg(value_name = "NAME")]
    pub name: Option<String>,
}

/// Execute the show subcommand.
pub fn run_show(args: &ShowArgs, options: &RenderOptions) -> Result<u8> {
    let namespace = crate::load_declarations(&args.decl)?;
    for entry in definitions(&namespace, args.name.as_deref(), options)? {
        println!("{entry}");
    }
    Ok(0)
}

/// Definitions of `name`, or of every declared type in declaration order.
pub fn definitions(
    namespace: &Namespace,
    name: Option<&str>,
    options: &RenderOptions,
) -> Result<Vec<String>> {
    let selected: Vec<_> = match name {
        Some(name) => match namespace.get(name) {
            Some(ty) => vec![(name, ty)],
            None => anyhow::bail!("unknown type '{name}'"),
        },
        None => namespace.names().zip(namespace.iter()).collect(),
    };
    Ok(selected
        .into_iter()
        .map(|(name, ty)| definition(name, ty, options.width))
        .collect())
}
