use crate::zoo::ModelFamily;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "mxzoo")]
#[command(version, about = "A pretrained model zoo for MXNet artifacts", long_about = None)]
pub struct Cli {
	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Download a model artifact from the zoo repository
	Pull {
		/// Model family to pull (e.g. "ssd", "resnet", "simple-pose")
		#[arg(value_enum)]
		model: ModelFamily,

		/// Exact artifact version (defaults to the latest release)
		#[arg(long)]
		artifact_version: Option<String>,

		/// Optional alias for the model
		#[arg(long)]
		alias: Option<String>,
	},

	/// Show the repository metadata published for a model family
	Info {
		/// Model family to describe
		#[arg(value_enum)]
		model: ModelFamily,
	},

	/// List model families and locally installed artifacts
	List,
}
