use std::error::Error;
use std::fs;
use std::io::{self, Read};

use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("formwire=warn".parse()?))
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let apply = match args.iter().position(|arg| arg == "--apply") {
        Some(index) => {
            args.remove(index);
            true
        }
        None => false,
    };

    let data = match args.first().map(|s| s.as_str()) {
        None | Some("-") => {
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer)?;
            buffer
        }
        Some(path) => fs::read(path)?,
    };
    tracing::debug!(bytes = data.len(), apply, "read form body");

    let tree = if apply {
        formwire_dump::form2tree_applied(&data)?
    } else {
        formwire_dump::form2tree(&data)?
    };
    println!("{}", tree);
    Ok(())
}
