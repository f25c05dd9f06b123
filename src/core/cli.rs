use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// All relative paths will be interpreted relative to this directory.
    #[arg(long, global = true)]
    pub cwd: Option<String>,

    /// Logging level (overrides env/config). One of: trace, debug, info, warn, error
    #[arg(long = "log.level", global = true)]
    pub log_level: Option<String>,

    /// Logging color control: "on" to force colors, "off" to disable; omit for auto
    #[arg(long = "log.color", global = true)]
    pub log_color: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write an example config file into the current directory
    Init,

    /// Remap coverage of generated files onto their original sources
    Transform(TransformArgs),

    /// Print various information about the effective setup
    Print {
        #[command(subcommand)]
        command: PrintArgs,
    },
}

/// Arguments for the transform command
#[derive(Parser, Debug)]
pub struct TransformArgs {
    /// LCOV tracefile recorded against the generated code.
    /// Replaces config `lcov` if provided.
    #[arg(long)]
    pub lcov: Option<String>,

    /// Source map used for every module in the tracefile.
    /// Replaces config `sourcemap` and `[sourcemaps]` if provided.
    #[arg(long, conflicts_with = "maps")]
    pub sourcemap: Option<String>,

    /// Source map for one module, as KEY=PATH where KEY is the basename of
    /// the generated file without extension. May be repeated.
    /// Replaces config `sourcemap` and `[sourcemaps]` if provided.
    #[arg(long = "map", value_name = "KEY=PATH")]
    pub maps: Vec<String>,

    /// Directory that original source paths are checked against; records for
    /// files missing there are dropped. Defaults to the current directory.
    #[arg(long = "source-dir")]
    pub source_dir: Option<String>,

    /// Write the remapped tracefile here instead of printing it to stdout.
    #[arg(long, short)]
    pub output: Option<String>,
}

/// Arguments for the print command
#[derive(Subcommand, Debug)]
pub enum PrintArgs {
    /// Print the effective configuration
    Config(PrintConfigArgs),
}

/// Arguments for the print config subcommand
#[derive(Parser, Debug)]
pub struct PrintConfigArgs {
    /// Output format: "table" (default), "json" or "toml"
    #[arg(long, default_value = "table")]
    pub format: String,
}
