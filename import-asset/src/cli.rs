// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::PathBuf;

use bpaf::{batteries::verbose_by_slice, construct, long, pure, OptionParser, Parser, ShellComp};
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

#[derive(Debug, Clone)]
pub struct Options {
    pub verbosity_level: LevelFilter,
    pub settings_path: PathBuf,
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Build(BuildCommand),
    Inspect { package: PathBuf },
    Rebuild,
}

/// A package build, as passed on the command line and as stored in the
/// import settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildCommand {
    pub manifest: PathBuf,
    pub output: PathBuf,
}

pub fn options() -> OptionParser<Options> {
    let verbosity_level = verbose_by_slice(
        3,
        [
            LevelFilter::OFF,
            LevelFilter::ERROR,
            LevelFilter::WARN,
            LevelFilter::INFO,
            LevelFilter::DEBUG,
            LevelFilter::TRACE,
        ],
    );

    let settings_path = long("settings")
        .help("The import settings file, which remembers the packages built so far")
        .argument("FILE")
        .complete_shell(ShellComp::File {
            mask: Some("*.json"),
        })
        .fallback(PathBuf::from("import-settings.json"))
        .debug_fallback();

    let build = build_command();
    let inspect = inspect_command();
    let rebuild = rebuild_command();
    let command = construct!([build, inspect, rebuild]);

    construct!(Options {
        verbosity_level,
        settings_path,
        command
    })
    .to_options()
    .descr("Builds asset packages out of .frlist manifests, and inspects them.")
}

fn build_command() -> impl Parser<Command> {
    let manifest = long("manifest")
        .short('m')
        .help("The manifest listing the assets to package")
        .argument("FILE")
        .complete_shell(ShellComp::File {
            mask: Some("*.frlist"),
        });
    let output = long("output")
        .short('o')
        .help("Where to write the package")
        .argument("FILE")
        .complete_shell(ShellComp::File {
            mask: Some("*.frpkg"),
        });
    construct!(BuildCommand { manifest, output })
        .map(Command::Build)
        .to_options()
        .descr("Build a package and remember the build in the settings file")
        .command("build")
}

fn inspect_command() -> impl Parser<Command> {
    let package = long("package")
        .short('p')
        .help("The package to list the contents of")
        .argument("FILE")
        .complete_shell(ShellComp::File {
            mask: Some("*.frpkg"),
        });
    construct!(Command::Inspect { package })
        .to_options()
        .descr("List the assets in a package")
        .command("inspect")
}

fn rebuild_command() -> impl Parser<Command> {
    pure(Command::Rebuild)
        .to_options()
        .descr("Build every package listed in the settings file again")
        .command("rebuild")
}
