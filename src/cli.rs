use std::env;
use std::path::PathBuf;
use std::process;

use getopts::Options;

pub struct Args {
    pub config: Option<PathBuf>,
    pub data_file: Option<PathBuf>,
}

fn opts() -> Options {
    let mut opts = Options::new();
    opts.optflag(
        "h",
        "help",
        concat!("Print the help output of ", env!("CARGO_PKG_NAME")),
    );
    opts.optopt(
        "c",
        "config",
        "Path to config.toml [Default: <config dir>/crm-calendar/config.toml]",
        "PATH",
    );
    opts.optopt(
        "d",
        "data-file",
        "Event file to load and save, overrides the config value",
        "PATH",
    );
    opts
}

pub fn parse(args: Vec<String>) -> Args {
    let opts = opts();

    let matches = match opts.parse(args) {
        Ok(matches) => matches,
        Err(fail) => {
            eprintln!("{fail}");
            process::exit(1);
        }
    };

    if matches.opt_present("help") {
        println!("{}", opts.usage(&opts.short_usage(env!("CARGO_PKG_NAME"))));
        process::exit(0);
    }

    Args {
        config: matches.opt_str("config").map(PathBuf::from),
        data_file: matches.opt_str("data-file").map(PathBuf::from),
    }
}
