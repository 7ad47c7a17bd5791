// src/commands/parse.rs

//! `pak parse` - show what a requirements file resolves to

use anyhow::Result;
use outpak::requirements::{PackageDescriptor, PackageList, Requirement, SessionState};
use std::path::PathBuf;

pub fn cmd_parse(
    files: &[PathBuf],
    json: bool,
    index_url: Option<String>,
    extra_index_urls: Vec<String>,
) -> Result<()> {
    let defaults = SessionState::with_defaults(index_url, extra_index_urls);
    let packages = PackageList::from_files(files, &defaults)?;

    if json {
        println!("{}", serde_json::to_string_pretty(packages.packages())?);
        return Ok(());
    }

    if packages.is_empty() {
        println!("No packages found.");
        return Ok(());
    }

    println!("Packages ({}):", packages.len());
    for package in &packages {
        println!("  {:>4}  {:<12} {}", package.line_number, kind(package), package);
        if let Some(index) = package.index_url() {
            println!("        index: {}", index);
        }
        for extra in package.extra_indexes() {
            println!("        extra index: {}", extra);
        }
    }

    Ok(())
}

fn kind(package: &PackageDescriptor) -> &'static str {
    match package.requirement {
        Requirement::Plain(_) => "plain",
        Requirement::Vcs(_) => "git",
        Requirement::Passthrough(_) => "passthrough",
    }
}
