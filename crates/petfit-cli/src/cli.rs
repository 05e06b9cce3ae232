use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "petfit")]
#[command(bin_name = "petfit")]
#[command(version)]
#[command(about = "Try shop garments on your dog with AI fitting")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[arg(long, value_name = "FILE", help = "Page description to open in the fitting UI")]
    pub page: Option<PathBuf>,
    #[arg(long, global = true, help = "Write a diagnostics log under ~/.config/petfit/diagnostics")]
    pub diagnostics: bool,
    #[arg(short, long, global = true, help = "Log debug events (overridden by PETFIT_LOG)")]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(about = "Run configuration and page checks")]
    Doctor(DoctorArgs),
    #[command(about = "Run one fitting without the terminal UI")]
    Fit(FitArgs),
}

#[derive(Debug, Args)]
pub struct DoctorArgs {
    #[arg(long, value_name = "FILE", help = "Also validate this page description")]
    pub page: Option<PathBuf>,
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("source").required(true).args(["pet", "photo"])))]
pub struct FitArgs {
    #[arg(long, value_name = "FILE")]
    pub page: PathBuf,
    #[arg(long, value_name = "ID", help = "Saved pet profile to dress")]
    pub pet: Option<String>,
    #[arg(long, value_name = "PATH", requires = "breed", help = "Dog photo to upload")]
    pub photo: Option<PathBuf>,
    #[arg(long, requires = "photo", help = "Breed of the dog in the photo")]
    pub breed: Option<String>,
    #[arg(long, value_name = "SIZE", help = "Product size to choose on the page")]
    pub size: Option<String>,
    #[arg(long, value_name = "SIZE", help = "Size for the AI fitting, overriding --size")]
    pub ai_size: Option<String>,
}
