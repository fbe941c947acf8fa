// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate log;
extern crate mandelbrot;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use std::io;
use std::str::FromStr;

use mandelbrot::{Config, Job, RunType};

/// Accepts a worker count between one and the number of CPUs.
fn thread_count(value: String, cpus: usize) -> Result<(), String> {
    match value.parse::<usize>() {
        Ok(0) => Err("thread count must be at least 1".to_string()),
        Ok(n) if n > cpus => Err(format!(
            "thread count {} is more than the {} CPUs available",
            n, cpus
        )),
        Ok(_) => Ok(()),
        Err(_) => Err(format!("thread count {:?} is not a whole number", value)),
    }
}

const CONFIG: &str = "config";
const RUN_TYPE: &str = "run-type";
const THREADS: &str = "threads";

fn args<'a>() -> ArgMatches<'a> {
    let cpus = num_cpus::get();

    App::new("mandelbrot")
        .version("0.1.0")
        .about("Renders Mandelbrot images and zoom animations as PNG to stdout")
        .arg(
            Arg::with_name(CONFIG)
                .required(true)
                .index(1)
                .help("YAML configuration file"),
        )
        .arg(
            Arg::with_name(RUN_TYPE)
                .required(false)
                .long(RUN_TYPE)
                .short("r")
                .takes_value(true)
                .possible_values(&["image", "video", "test"])
                .help("Overrides the configured run_type"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(move |value| thread_count(value, cpus))
                .help("Number of render worker threads (default: all CPUs but two)"),
        )
        .get_matches()
}

fn run(matches: &ArgMatches) -> mandelbrot::Result<()> {
    let mut config = Config::load(matches.value_of(CONFIG).unwrap_or_default())?;
    if let Some(run_type) = matches.value_of(RUN_TYPE) {
        config.run_type = RunType::from_str(run_type)?;
    }
    let threads = match matches.value_of(THREADS) {
        Some(threads) => Some(usize::from_str(threads).map_err(|_| {
            mandelbrot::Error::Config(format!("invalid thread count {:?}", threads))
        })?),
        None => None,
    };

    let job = Job::prepare(config, threads)?;
    info!("starting {} run", job.config().run_type);
    let stdout = io::stdout();
    let mut output = stdout.lock();
    job.run(&mut output)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let matches = args();

    if let Err(err) = run(&matches) {
        debug!("run failed: {:?}", err);
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::thread_count;

    #[test]
    fn thread_counts_are_bounded_by_the_cpus() {
        assert!(thread_count("1".to_string(), 4).is_ok());
        assert!(thread_count("4".to_string(), 4).is_ok());
        assert!(thread_count("5".to_string(), 4).unwrap_err().contains("4 CPUs"));
        assert!(thread_count("0".to_string(), 4).unwrap_err().contains("at least 1"));
        assert!(thread_count("two".to_string(), 4).unwrap_err().contains("\"two\""));
        assert!(thread_count("-1".to_string(), 4).is_err());
    }
}
