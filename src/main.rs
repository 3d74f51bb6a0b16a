//! ldtk2tscn - Command-line tool for converting LDtk levels to Godot scenes

use std::process::ExitCode;

use ldtk2tscn::cli;

fn main() -> ExitCode {
    cli::run()
}
