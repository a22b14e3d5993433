use std::env;
use std::io::{self, Write};
use std::process;

use resin::{Context, Interp};

fn repl(interp: &Interp, ctx: &Context) {
    println!("resin repl");
    println!("Type expressions to evaluate, or (exit) to quit");
    println!();

    loop {
        print!("> ");
        io::stdout().flush().unwrap();

        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        if input == "(exit)" || input == "exit" {
            break;
        }

        match interp.eval_str(ctx, input) {
            Ok(result) => println!("{result}"),
            Err(e) => eprintln!("Error: {e}"),
        }
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let interp = Interp::new();
    let ctx = match interp.new_root_context() {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    if let Some(path) = args.get(1) {
        match interp.load_file(&ctx, path) {
            Ok(result) => println!("{result}"),
            Err(e) => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        }
    } else {
        repl(&interp, &ctx);
    }
}
