mod args;
mod runner;

pub use args::CliArgs;
pub use runner::run;
