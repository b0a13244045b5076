// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use seamcarve::{
    energy_to_image, mark_seam, CostModel, EnergyFunction, EnergyMap, Growth, Options, Order,
    Orientation, PixelBuffer, ResizeTarget, Resizer, TwoDimensionalMap, DEFAULT_MAX_GROWTH,
};

extern crate clap;
extern crate image;

use clap::{App, Arg, ArgMatches};
use failure::{format_err, Error};
use image::{Pixel, Rgba};
use log::info;
use std::process;

const SEAM_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);

fn main() {
    env_logger::init();
    let matches = App::new("seamcarve")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Content-aware image resizing by seam carving")
        .arg(
            Arg::with_name("input")
                .help("The image to resize")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("output")
                .help("Where to write the result; the format follows the extension")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::with_name("width")
                .long("width")
                .takes_value(true)
                .allow_hyphen_values(true)
                .help("Target width (default: unchanged)"),
        )
        .arg(
            Arg::with_name("height")
                .long("height")
                .takes_value(true)
                .allow_hyphen_values(true)
                .help("Target height (default: unchanged)"),
        )
        .arg(
            Arg::with_name("max-growth")
                .long("max-growth")
                .takes_value(true)
                .help("Largest allowed growth factor per axis (default: 2.0)"),
        )
        .arg(
            Arg::with_name("clamp-growth")
                .long("clamp-growth")
                .help("Clamp targets past the growth factor instead of failing"),
        )
        .arg(
            Arg::with_name("energy")
                .long("energy")
                .takes_value(true)
                .possible_values(&["luminance", "channel-mean"])
                .help("How pixel importance is measured"),
        )
        .arg(
            Arg::with_name("cost")
                .long("cost")
                .takes_value(true)
                .possible_values(&["backward", "forward"])
                .help("How seam cost is accumulated"),
        )
        .arg(
            Arg::with_name("order")
                .long("order")
                .takes_value(true)
                .possible_values(&["width-first", "interleaved"])
                .help("Which axis is worked on first"),
        )
        .arg(
            Arg::with_name("growth")
                .long("growth")
                .takes_value(true)
                .possible_values(&["iterative", "batch"])
                .help("Insert seams one at a time or in batches"),
        )
        .arg(
            Arg::with_name("remove-mask")
                .long("remove-mask")
                .takes_value(true)
                .value_name("PATH")
                .help("Remove every pixel that is not black in this image first"),
        )
        .arg(
            Arg::with_name("energy-map")
                .long("energy-map")
                .takes_value(true)
                .value_name("PATH")
                .help("Also write the input's energy map as a grayscale image"),
        )
        .arg(
            Arg::with_name("seam-map")
                .long("seam-map")
                .takes_value(true)
                .value_name("PATH")
                .help("Also write the input with its first vertical seam marked"),
        )
        .get_matches();

    if let Err(err) = run(&matches) {
        eprintln!("seamcarve: {}", err);
        for cause in err.iter_causes() {
            eprintln!("  caused by: {}", cause);
        }
        process::exit(1);
    }
}

fn parsed<T>(matches: &ArgMatches, name: &str) -> Result<Option<T>, Error>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match matches.value_of(name) {
        None => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|e| format_err!("--{} {}: {}", name, value, e)),
    }
}

fn options(matches: &ArgMatches) -> Result<Options, Error> {
    let mut options = Options::default()
        .with_max_growth(parsed::<f64>(matches, "max-growth")?.unwrap_or(DEFAULT_MAX_GROWTH))
        .with_clamp_growth(matches.is_present("clamp-growth"));
    if let Some(energy) = parsed::<EnergyFunction>(matches, "energy")? {
        options = options.with_energy(energy);
    }
    if let Some(cost) = parsed::<CostModel>(matches, "cost")? {
        options = options.with_cost(cost);
    }
    if let Some(order) = parsed::<Order>(matches, "order")? {
        options = options.with_order(order);
    }
    if let Some(growth) = parsed::<Growth>(matches, "growth")? {
        options = options.with_growth(growth);
    }
    Ok(options)
}

fn load_mask(path: &str, dimensions: (u32, u32)) -> Result<TwoDimensionalMap<bool>, Error> {
    let mask = image::open(path)?.to_rgb8();
    if mask.dimensions() != dimensions {
        return Err(format_err!(
            "mask {} is {}x{}, the image is {}x{}",
            path,
            mask.width(),
            mask.height(),
            dimensions.0,
            dimensions.1
        ));
    }
    Ok(TwoDimensionalMap::from_fn(dimensions.0, dimensions.1, |x, y| {
        mask.get_pixel(x, y).channels().iter().any(|&c| c > 0)
    }))
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    // Both are required, so clap has already refused a missing one.
    let input = matches.value_of("input").unwrap_or_default();
    let output = matches.value_of("output").unwrap_or_default();
    let options = options(matches)?;

    let image = image::open(input)?;
    let opaque = !image.color().has_alpha();
    let buffer = PixelBuffer::from_image(&image.to_rgba8())?;
    let (width, height) = buffer.dimensions();
    info!("{}: {}x{}", input, width, height);

    if let Some(path) = matches.value_of("energy-map") {
        let energy = EnergyMap::compute(&buffer, options.energy);
        energy_to_image(&energy).save(path)?;
    }
    if let Some(path) = matches.value_of("seam-map") {
        let energy = EnergyMap::compute(&buffer, options.energy);
        let seam = options.cost.find(&energy, Orientation::Vertical)?;
        mark_seam(&buffer, &seam, SEAM_COLOR)?.to_image().save(path)?;
    }

    let target = ResizeTarget::new(
        parsed::<i64>(matches, "width")?.unwrap_or_else(|| i64::from(width)),
        parsed::<i64>(matches, "height")?.unwrap_or_else(|| i64::from(height)),
    )?;
    let resizer = Resizer::new(options);
    let buffer = match matches.value_of("remove-mask") {
        Some(path) => resizer.remove_object(buffer, &load_mask(path, (width, height))?)?,
        None => buffer,
    };
    let resized = resizer.resize(buffer, target)?;

    let result = image::DynamicImage::ImageRgba8(resized.to_image());
    if opaque {
        result.to_rgb8().save(output)?;
    } else {
        result.save(output)?;
    }
    info!("{}: {}x{}", output, resized.width(), resized.height());
    Ok(())
}
