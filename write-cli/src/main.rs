use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::Command as Process;

use anyhow::{bail, Context, Result};
use clap::Parser;
use write_core::{compile, CompileResult};

/// Command-line front end for the Write-to-C++ compiler.
#[derive(Parser, Debug)]
#[command(name = "writec", version, about, long_about = None)]
struct Cli {
    /// Source file to compile; reads stdin when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Where to write the generated C++; defaults to the input path
    /// with a .cpp extension (out.cpp for stdin)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Invoke a system C++ compiler on the generated file
    #[arg(long)]
    compile: bool,

    /// Compile and then execute the resulting binary (implies --compile)
    #[arg(long)]
    run: bool,

    /// C++ compiler to invoke (auto-detects g++ then clang++)
    #[arg(long, value_name = "COMPILER")]
    cc: Option<String>,

    /// C++ standard passed to the compiler
    #[arg(long, default_value = "c++17")]
    std: String,

    /// Path for the compiled binary
    #[arg(long, value_name = "PATH")]
    out_bin: Option<PathBuf>,

    /// Print the published symbol table to stdout
    #[arg(long)]
    dump_symbols: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    execute(cli)
}

fn execute(cli: Cli) -> Result<()> {
    let source = match &cli.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let result = compile(&source);
    report_diagnostics(&result);

    if cli.dump_symbols {
        print!("{}", result.symbols.render());
    }

    let error_count = result.diagnostics.iter().filter(|d| d.is_error()).count();
    let Some(code) = &result.code else {
        bail!("compilation failed with {error_count} error(s)");
    };

    let output = cli.output.clone().unwrap_or_else(|| default_output(&cli.input));
    write_output(&output, code)?;
    eprintln!("writec: wrote {}", output.display());

    if cli.compile || cli.run {
        let binary = compile_cpp(&cli, &output)?;
        if cli.run {
            run_binary(&binary)?;
        }
    }

    Ok(())
}

fn report_diagnostics(result: &CompileResult) {
    for diag in &result.diagnostics {
        eprintln!("{diag}");
    }
}

fn default_output(input: &Option<PathBuf>) -> PathBuf {
    match input {
        Some(path) => path.with_extension("cpp"),
        None => PathBuf::from("out.cpp"),
    }
}

fn write_output(path: &Path, code: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {parent:?}"))?;
        }
    }
    fs::write(path, code)
        .with_context(|| format!("failed to write output file {}", path.display()))?;
    Ok(())
}

fn compile_cpp(cli: &Cli, source: &Path) -> Result<PathBuf> {
    let compiler = match &cli.cc {
        Some(cc) => cc.clone(),
        None => detect_compiler()
            .context("no C++ compiler found; install g++ or clang++ or pass --cc")?,
    };
    let binary = cli
        .out_bin
        .clone()
        .unwrap_or_else(|| source.with_extension(""));
    eprintln!("writec: compiling with {compiler}");
    let status = Process::new(&compiler)
        .arg(format!("-std={}", cli.std))
        .arg(source)
        .arg("-o")
        .arg(&binary)
        .status()
        .with_context(|| format!("failed to invoke {compiler}"))?;
    if !status.success() {
        bail!("{compiler} exited with {status}");
    }
    Ok(binary)
}

fn detect_compiler() -> Option<String> {
    ["g++", "clang++"].iter().find_map(|candidate| {
        let found = Process::new(candidate)
            .arg("--version")
            .output()
            .is_ok_and(|out| out.status.success());
        found.then(|| candidate.to_string())
    })
}

fn run_binary(binary: &Path) -> Result<()> {
    let status = Process::new(binary)
        .status()
        .with_context(|| format!("failed to execute {}", binary.display()))?;
    if !status.success() {
        bail!("program exited with {status}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_cmd::Command;
    use predicates::prelude::*;
    use tempfile::tempdir;

    #[test]
    fn compiles_source_to_cpp_next_to_the_input() {
        let dir = tempdir().expect("tempdir");
        let input_path = dir.path().join("program.write");
        fs::write(&input_path, "set x to 10\nprint x").expect("write input");

        Command::cargo_bin("writec")
            .expect("binary exists")
            .arg("--input")
            .arg(&input_path)
            .assert()
            .success()
            .stderr(predicate::str::contains("wrote"));

        let cpp = fs::read_to_string(dir.path().join("program.cpp")).expect("read output");
        assert!(cpp.contains("int main()"));
        assert!(cpp.contains("auto x = 10;"));
    }

    #[test]
    fn honors_explicit_output_path() {
        let dir = tempdir().expect("tempdir");
        let input_path = dir.path().join("program.write");
        fs::write(&input_path, "print \"hi\"").expect("write input");
        let output_path = dir.path().join("generated").join("main.cpp");

        Command::cargo_bin("writec")
            .expect("binary exists")
            .arg("--input")
            .arg(&input_path)
            .arg("--output")
            .arg(&output_path)
            .assert()
            .success();

        assert!(output_path.exists(), "cpp output was not created");
    }

    #[test]
    fn reads_source_from_stdin() {
        let dir = tempdir().expect("tempdir");
        let output_path = dir.path().join("out.cpp");

        Command::cargo_bin("writec")
            .expect("binary exists")
            .arg("--output")
            .arg(&output_path)
            .write_stdin("for i from 1 to 5 do\n print i\nend for")
            .assert()
            .success();

        let cpp = fs::read_to_string(&output_path).expect("read output");
        assert!(cpp.contains("for (int i = 1; i <= 5; ++i) {"));
    }

    #[test]
    fn reports_diagnostics_on_stderr_and_fails() {
        let dir = tempdir().expect("tempdir");
        let input_path = dir.path().join("bad.write");
        fs::write(&input_path, "make nums as list of size 3\nset nums[5] to 1")
            .expect("write input");

        Command::cargo_bin("writec")
            .expect("binary exists")
            .arg("--input")
            .arg(&input_path)
            .assert()
            .failure()
            .stderr(predicate::str::contains(
                "error[out-of-bounds-index]: index 5 is out of bounds for 'nums' of size 3",
            ))
            .stderr(predicate::str::contains("compilation failed with 1 error(s)"));

        assert!(!dir.path().join("bad.cpp").exists(), "no output on errors");
    }

    #[test]
    fn warnings_alone_still_write_output_and_exit_zero() {
        let dir = tempdir().expect("tempdir");
        let input_path = dir.path().join("warn.write");
        fs::write(&input_path, "function f ()\n return 1, 2\nend function")
            .expect("write input");

        Command::cargo_bin("writec")
            .expect("binary exists")
            .arg("--input")
            .arg(&input_path)
            .assert()
            .success()
            .stderr(predicate::str::contains("warning[arity-mismatch]"));

        assert!(dir.path().join("warn.cpp").exists());
    }

    #[test]
    fn dump_symbols_prints_the_table() {
        let dir = tempdir().expect("tempdir");
        let input_path = dir.path().join("syms.write");
        fs::write(&input_path, "make nums as list of size 3").expect("write input");

        Command::cargo_bin("writec")
            .expect("binary exists")
            .arg("--input")
            .arg(&input_path)
            .arg("--dump-symbols")
            .assert()
            .success()
            .stdout(predicate::str::contains("scope 0: var nums: list [size 3]"));
    }

    #[test]
    fn diagnostic_positions_use_line_and_column() {
        let dir = tempdir().expect("tempdir");
        let input_path = dir.path().join("pos.write");
        fs::write(&input_path, "print ghost").expect("write input");

        Command::cargo_bin("writec")
            .expect("binary exists")
            .arg("--input")
            .arg(&input_path)
            .assert()
            .failure()
            .stderr(predicate::str::contains(
                "1:7: error[undefined-identifier]: 'ghost' is not defined",
            ));
    }
}
