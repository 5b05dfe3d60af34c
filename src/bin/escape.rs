// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate env_logger;
extern crate escapetime;
extern crate failure;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use escapetime::{Coloring, Mode, RenderRequest, Viewport};
use failure::{err_msg, Error};
use num::Complex;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::str::FromStr;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const LEFTLOWER: &str = "leftlower";
const RIGHTUPPER: &str = "rightupper";
const JULIA: &str = "julia";
const FIRST_ESCAPE: &str = "first-escape";
const THREADS: &str = "threads";
const TONES: &str = "tones";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("escape")
        .version("0.1.0")
        .about("Escape-time Mandelbrot and Julia renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file; the extension picks the format (bmp, png, jpg, pnm)"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("800x600")
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(LEFTLOWER)
                .required(false)
                .long(LEFTLOWER)
                .short("l")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-1.5,-1.5")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse left lower corner"))
                .help("Left lower corner of the complex plane"),
        )
        .arg(
            Arg::with_name(RIGHTUPPER)
                .required(false)
                .long(RIGHTUPPER)
                .short("r")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("2.5,1.5")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse right upper corner"))
                .help("Right upper corner of the complex plane"),
        )
        .arg(
            Arg::with_name(JULIA)
                .required(false)
                .long(JULIA)
                .short("j")
                .takes_value(true)
                .allow_hyphen_values(true)
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse Julia constant"))
                .help("Draw the Julia set for the constant C1,C2 (try 0.8,0.12)"),
        )
        .arg(
            Arg::with_name(FIRST_ESCAPE)
                .required(false)
                .long(FIRST_ESCAPE)
                .help("Color by the first escaping step instead of the last classified one"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in solver [default: one per CPU]"),
        )
        .arg(
            Arg::with_name(TONES)
                .required(false)
                .long(TONES)
                .takes_value(true)
                .help("Also write the tone sequence, one frequency per line, to this file"),
        )
        .get_matches()
}

fn value<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str, Error> {
    matches
        .value_of(name)
        .ok_or_else(|| err_msg(format!("missing value for --{}", name)))
}

fn complex_arg(matches: &ArgMatches, name: &str) -> Result<Complex<f64>, Error> {
    parse_complex(value(matches, name)?)
        .ok_or_else(|| err_msg(format!("could not parse --{} as RE,IM", name)))
}

fn request(matches: &ArgMatches) -> Result<RenderRequest, Error> {
    let (width, height) = parse_pair::<usize>(value(matches, SIZE)?, 'x')
        .ok_or_else(|| err_msg("Error parsing image dimensions"))?;
    let viewport = Viewport::from_corners(
        complex_arg(matches, LEFTLOWER)?,
        complex_arg(matches, RIGHTUPPER)?,
    );
    let mode = if matches.is_present(JULIA) {
        Mode::Julia(complex_arg(matches, JULIA)?)
    } else {
        Mode::Mandelbrot
    };
    let coloring = if matches.is_present(FIRST_ESCAPE) {
        Coloring::FirstEscape
    } else {
        Coloring::LastIteration
    };
    let threads = match matches.value_of(THREADS) {
        Some(threads) => usize::from_str(threads)?,
        None => num_cpus::get(),
    };
    Ok(RenderRequest {
        width,
        height,
        viewport,
        mode,
        coloring,
        threads,
    })
}

fn write_tones(path: &str, request: &RenderRequest) -> Result<usize, Error> {
    let mut out = BufWriter::new(File::create(path)?);
    let mut count = 0;
    for freq in request.tones()? {
        writeln!(out, "{}", freq)?;
        count += 1;
    }
    out.flush()?;
    Ok(count)
}

fn run() -> Result<(), Error> {
    let matches = args();
    let request = request(&matches)?;
    info!("render request: {:?}", request);

    let pixels = request.render()?;
    let output = value(&matches, OUTPUT)?;
    pixels.save(output)?;
    info!("wrote {}x{} image to {}", pixels.width(), pixels.height(), output);

    if let Some(path) = matches.value_of(TONES) {
        let count = write_tones(path, &request)?;
        info!("wrote {} tones to {}", count, path);
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    if let Err(e) = run() {
        eprintln!("Render failure: {}", e);
        for cause in e.iter_causes() {
            eprintln!("  caused by: {}", cause);
        }
        std::process::exit(1);
    }
}
