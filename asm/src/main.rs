use clap::Parser;
use color_print::cprintln;

use rvasm::{assemble, output, Error, Program};

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(version, about = "Assembler for the RV32I base ISA", help_template = HELP_TEMPLATE)]
struct Args {
    /// Input assembly file
    input: String,

    /// Base name for the output artifacts
    #[clap(short, long, default_value = "output")]
    output: String,

    /// Print the assembled listing
    #[clap(short, long)]
    dump: bool,
}

fn main() {
    let args = Args::parse();
    std::process::exit(run(&args));
}

fn run(args: &Args) -> i32 {
    println!("RV32I Assembler");

    let source = match std::fs::read_to_string(&args.input) {
        Ok(source) => source,
        Err(e) => {
            cprintln!(
                "<red,bold>error</>: {}",
                Error::FileOpen(args.input.clone(), e)
            );
            return 1;
        }
    };

    println!("1. Assemble {}", args.input);
    let program = match assemble(&source) {
        Ok(program) => program,
        Err(e) => {
            e.print_diag(&args.input, &source);
            return 1;
        }
    };
    println!(
        "  - {} labels, {} instructions",
        program.labels.len(),
        program.words.len()
    );

    println!("2. Write artifacts");
    if let Err(e) = write_artifacts(&program, &args.output) {
        cprintln!("<red,bold>error</>: {}", e);
        return 1;
    }
    println!("  > {0}.bin  {0}.hex  {0}.txt", args.output);

    if args.dump {
        output::print_dump(&program);
    }
    0
}

fn write_artifacts(program: &Program, base: &str) -> Result<(), Error> {
    write_file(format!("{base}.bin"), &output::binary(program))?;
    write_file(format!("{base}.hex"), output::hex_listing(program).as_bytes())?;
    write_file(format!("{base}.txt"), output::text_trace(program).as_bytes())?;
    Ok(())
}

fn write_file(path: String, contents: &[u8]) -> Result<(), Error> {
    std::fs::write(&path, contents).map_err(|e| Error::FileWrite(path, e))
}
