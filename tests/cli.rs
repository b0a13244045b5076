// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use assert_cmd::Command;
use image::{GenericImageView, Rgb, RgbImage};
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn sample_image(dir: &TempDir, width: u32, height: u32) -> String {
    let image = RgbImage::from_fn(width, height, |x, y| {
        let v = ((x * 31 + y * 17) % 256) as u8;
        Rgb([v, 255 - v, (x * y) as u8])
    });
    let path = dir.path().join("input.png");
    image.save(&path).unwrap();
    path.to_string_lossy().into_owned()
}

fn output(dir: &TempDir, name: &str) -> String {
    dir.path().join(name).to_string_lossy().into_owned()
}

#[test]
fn shrinks_and_grows_to_the_requested_size() {
    let dir = TempDir::new().unwrap();
    let input = sample_image(&dir, 8, 6);
    let out = output(&dir, "out.png");

    Command::cargo_bin("seamcarve")
        .unwrap()
        .args(&[input.as_str(), out.as_str(), "--width", "5", "--height", "9"])
        .assert()
        .success();

    assert_eq!(image::open(&out).unwrap().dimensions(), (5, 9));
}

#[test]
fn omitted_dimensions_are_kept() {
    let dir = TempDir::new().unwrap();
    let input = sample_image(&dir, 7, 4);
    let out = output(&dir, "out.png");

    Command::cargo_bin("seamcarve")
        .unwrap()
        .args(&[input.as_str(), out.as_str(), "--height", "3", "--cost", "forward"])
        .args(&["--energy", "channel-mean", "--growth", "batch"])
        .assert()
        .success();

    assert_eq!(image::open(&out).unwrap().dimensions(), (7, 3));
}

#[test]
fn writes_the_diagnostic_maps() {
    let dir = TempDir::new().unwrap();
    let input = sample_image(&dir, 6, 5);
    let out = output(&dir, "out.png");
    let energy = output(&dir, "energy.png");
    let seams = output(&dir, "seams.png");

    Command::cargo_bin("seamcarve")
        .unwrap()
        .args(&[input.as_str(), out.as_str()])
        .args(&["--energy-map", energy.as_str(), "--seam-map", seams.as_str()])
        .assert()
        .success();

    assert!(Path::new(&energy).exists());
    assert_eq!(image::open(&seams).unwrap().dimensions(), (6, 5));
    assert_eq!(image::open(&out).unwrap().dimensions(), (6, 5));
}

#[test]
fn removes_a_masked_object() {
    let dir = TempDir::new().unwrap();
    let input = sample_image(&dir, 6, 4);
    let mask = RgbImage::from_fn(6, 4, |x, _| {
        if x == 3 {
            Rgb([255, 255, 255])
        } else {
            Rgb([0, 0, 0])
        }
    });
    let mask_path = output(&dir, "mask.png");
    mask.save(&mask_path).unwrap();
    let out = output(&dir, "out.png");

    Command::cargo_bin("seamcarve")
        .unwrap()
        .args(&[input.as_str(), out.as_str(), "--remove-mask", mask_path.as_str()])
        .assert()
        .success();

    assert_eq!(image::open(&out).unwrap().dimensions(), (6, 4));
}

#[test]
fn refuses_an_empty_target() {
    let dir = TempDir::new().unwrap();
    let input = sample_image(&dir, 4, 4);
    let out = output(&dir, "out.png");

    Command::cargo_bin("seamcarve")
        .unwrap()
        .args(&[input.as_str(), out.as_str(), "--width", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid target"));
    assert!(!Path::new(&out).exists());
}

#[test]
fn refuses_to_grow_too_far() {
    let dir = TempDir::new().unwrap();
    let input = sample_image(&dir, 4, 4);
    let out = output(&dir, "out.png");

    Command::cargo_bin("seamcarve")
        .unwrap()
        .args(&[input.as_str(), out.as_str(), "--width", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot grow past"));

    Command::cargo_bin("seamcarve")
        .unwrap()
        .args(&[input.as_str(), out.as_str(), "--width", "9", "--clamp-growth"])
        .assert()
        .success();
    assert_eq!(image::open(&out).unwrap().dimensions(), (8, 4));
}

#[test]
fn missing_input_is_reported() {
    let dir = TempDir::new().unwrap();
    let out = output(&dir, "out.png");

    Command::cargo_bin("seamcarve")
        .unwrap()
        .args(&[output(&dir, "nowhere.png").as_str(), out.as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("seamcarve:"));
}

#[test]
fn reports_the_package_version() {
    Command::cargo_bin("seamcarve")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
