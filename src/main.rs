/*
 * Copyright (c) 2023-2025 Atsushi Komaba
 *
 * This file is part of Cminus.
 * Cminus is free software: you can redistribute it and/or
 * modify it under the terms of the GNU General Public License
 * as published by the Free Software Foundation, either version 3
 * of the License, or any later version.
 *
 * Cminus is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Cminus. If not, see <https://www.gnu.org/licenses/>.
 */

mod backend;
mod codegen;
mod frontend;
mod ir;
mod log;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use codegen::Compilation;

/**
 * Compiles a C-minus program into three-address code for a stack machine.
 */
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /**
     * The source file.
     */
    #[arg(default_value = "input.txt")]
    input: PathBuf,
    /**
     * The directory the listings are written to.
     */
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,
    /**
     * Executes the generated code and prints what it outputs.
     */
    #[arg(long)]
    run: bool,
    /**
     * The number of instructions `--run` executes before giving up.
     */
    #[arg(long, default_value_t = 1_000_000)]
    max_steps: usize,
}

fn main() -> ExitCode {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let input = match std::fs::read_to_string(&args.input) {
        Ok(input) => input,
        Err(err) => {
            log::cannot_read_input(&args.input, err);
            return ExitCode::FAILURE;
        }
    };
    let Compilation { analysis, program } = match codegen::compile(&input) {
        Ok(compilation) => compilation,
        Err(err) => {
            log::aborting(&err);
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(
        lexical = analysis.logger.lexical_errors().len(),
        syntax = analysis.logger.syntax_errors().len(),
        semantic = analysis.logger.semantic_errors().len(),
        instructions = program.len(),
        "compiled"
    );
    if !program.is_complete() {
        tracing::warn!("the generated code has unfilled slots");
    }

    let dir = &args.output_dir;
    let written = [
        write_listing(dir, "tokens.txt", |w| {
            frontend::write_tokens(&analysis.tokens, w)
        }),
        write_listing(dir, "symbol_table.txt", |w| {
            frontend::write_lexemes(&analysis.lexemes, w)
        }),
        write_listing(dir, "lexical_errors.txt", |w| {
            analysis.logger.write_lexical_errors(w)
        }),
        write_listing(dir, "parse_tree.txt", |w| write!(w, "{}", analysis.tree)),
        write_listing(dir, "syntax_errors.txt", |w| {
            analysis.logger.write_syntax_errors(w)
        }),
        write_listing(dir, "output.txt", |w| write!(w, "{program}")),
        write_listing(dir, "semantic_errors.txt", |w| {
            analysis.logger.write_semantic_errors(w)
        }),
    ];
    if written.contains(&false) {
        return ExitCode::FAILURE;
    }

    if args.run {
        match backend::run(&program, args.max_steps) {
            Ok(values) => {
                for value in values {
                    println!("{value}");
                }
            }
            Err(err) => {
                log::runtime_error(&err);
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}

/**
 * Writes one listing into `dir`. Returns `false` after reporting a failure.
 */
fn write_listing(
    dir: &Path,
    name: &str,
    write: impl FnOnce(&mut BufWriter<File>) -> io::Result<()>,
) -> bool {
    let path = dir.join(name);
    let result = File::create(&path).and_then(|file| {
        let mut w = BufWriter::new(file);
        write(&mut w)?;
        w.flush()
    });
    match result {
        Ok(()) => true,
        Err(err) => {
            log::cannot_write_output(&path, err);
            false
        }
    }
}
