extern crate mandelbrot;
extern crate tempfile;

use mandelbrot::{Config, RunType};
use std::env;
use std::io::Write;

// Every test in this file shares one process environment, so they all
// set the same values.
fn set_overrides() {
    env::set_var("max_iteration", "17");
    env::set_var("RUN_TYPE", "test");
}

#[test]
fn parse_reads_the_process_environment() {
    set_overrides();
    let config = Config::parse("max_iteration: 1000\nimage_width: 64\n", "inline").unwrap();
    assert_eq!(config.max_iteration, 17);
    assert_eq!(config.run_type, RunType::Test);
    assert_eq!(config.image_width, 64);
}

#[test]
fn load_reads_the_process_environment() {
    set_overrides();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "run_type: video").unwrap();
    writeln!(file, "max_iteration: 2000").unwrap();
    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.max_iteration, 17);
    assert_eq!(config.run_type, RunType::Test);
}
