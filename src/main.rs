use std::env;
use std::process;

use relish::repl::Repl;

fn main() {
    let args: Vec<String> = env::args().collect();
    let repl = match args.len() {
        1 => Ok(Repl::new()),
        2 => Repl::with_script(&args[1]),
        _ => {
            eprintln!("usage: relish [script]");
            process::exit(2);
        }
    };
    let mut repl = match repl {
        Ok(repl) => repl,
        Err(_) => {
            eprintln!("Error opening script {}", args[1]);
            process::exit(1);
        }
    };

    println!("relish {}", env!("CARGO_PKG_VERSION"));

    if let Err(error) = repl.run() {
        eprintln!("Error: {error}");
        process::exit(1);
    }
}
