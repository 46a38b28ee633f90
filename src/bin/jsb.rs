//! jsbridge REPL
//!
//! Interactive JavaScript shell and script runner.
//!
//! Usage: `jsb [--strict] [--loop-limit N] [file]`

use jsbridge::{Context, ContextConfig, Value};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

fn main() {
    env_logger::init();

    let mut config = ContextConfig::default();
    let mut file = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--strict" => config = config.strict(true),
            "--loop-limit" => match args.next().and_then(|n| n.parse().ok()) {
                Some(limit) => config = config.with_loop_iteration_limit(limit),
                None => {
                    eprintln!("--loop-limit expects a number");
                    std::process::exit(2);
                }
            },
            _ => file = Some(arg),
        }
    }

    let mut ctx = Context::with_config(config);
    if let Err(e) = ctx.register_fn("print", print) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    match file {
        Some(path) => run_file(&mut ctx, &path),
        None => run_repl(&mut ctx),
    }
}

fn print(ctx: &mut Context, args: &[Value]) -> jsbridge::HostResult<()> {
    let mut parts = Vec::with_capacity(args.len());
    for arg in args {
        let text = arg
            .to_js_string(ctx)
            .map_err(|e| jsbridge::Exception::new(e.to_string()))?;
        parts.push(text);
    }
    println!("{}", parts.join(" "));
    Ok(())
}

fn run_file(ctx: &mut Context, filename: &str) {
    match ctx.eval_file(filename) {
        Ok(result) => {
            if !result.is_undefined() {
                println!("{}", result);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_repl(ctx: &mut Context) {
    println!("jsbridge REPL");
    println!("Type JavaScript code to evaluate, Ctrl+D to exit.\n");

    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("Error starting line editor: {}", e);
            std::process::exit(1);
        }
    };

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if let Err(e) = editor.add_history_entry(line) {
                    log::warn!("could not record history entry: {}", e);
                }

                match ctx.eval(line) {
                    Ok(result) => println!("{}", result),
                    Err(e) => println!("Error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => {
                println!();
                break;
            }
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                break;
            }
        }
    }
}
