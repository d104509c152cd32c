//! Command line option parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::LoggingArgs;

#[derive(Clone, Debug, Parser)]
#[command(name = "sproxel", author, about, version)]
pub(crate) struct SproxelArgs {
    #[command(subcommand)]
    pub(crate) command: Command,

    #[command(flatten)]
    pub(crate) logging: LoggingArgs,
}

#[derive(Clone, Debug, Subcommand)]
pub(crate) enum Command {
    /// Print the dimensions, color mode, and metadata of a voxel image.
    Info {
        /// Voxel image file to inspect.
        #[arg(value_name = "FILE")]
        input_file: PathBuf,
    },

    /// Stack voxel images as layers, bottom first, and write the flattened result.
    ///
    /// Indexed images are all indexed against the default palette, so that they may be
    /// baked into one indexed image.
    Bake {
        /// Voxel image files, bottom layer first.
        #[arg(value_name = "FILE", required = true)]
        input_files: Vec<PathBuf>,

        /// Output PNG file name.
        #[arg(long = "output", short = 'o', value_name = "FILE")]
        output_file: PathBuf,
    },

    /// Write the default palette as a 16×16×1 indexed voxel image.
    Palette {
        /// Output PNG file name.
        #[arg(long = "output", short = 'o', value_name = "FILE")]
        output_file: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory as _;
    use clap::error::ErrorKind;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> clap::error::Result<SproxelArgs> {
        SproxelArgs::try_parse_from(std::iter::once("sproxel").chain(args.iter().copied()))
    }

    #[test]
    fn verify_cli() {
        SproxelArgs::command().debug_assert();
    }

    #[test]
    fn bake_args() {
        let args = parse(&["bake", "a.png", "b.png", "-o", "out.png", "-v"]).unwrap();
        assert!(args.logging.verbose);
        let Command::Bake {
            input_files,
            output_file,
        } = args.command
        else {
            panic!("wrong command {:?}", args.command);
        };
        assert_eq!(
            input_files,
            vec![PathBuf::from("a.png"), PathBuf::from("b.png")]
        );
        assert_eq!(output_file, PathBuf::from("out.png"));
    }

    #[test]
    fn bake_requires_inputs() {
        let e = parse(&["bake", "-o", "out.png"]).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn palette_requires_output() {
        let e = parse(&["palette"]).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::MissingRequiredArgument);
    }
}
