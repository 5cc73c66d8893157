pub mod cli_baseline;
pub mod preflight;
