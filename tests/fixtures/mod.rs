//! Shared request and image fixtures

#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;
use store_visit_jobs::models::request::{JobRequest, Visit};
use store_visit_jobs::services::catalog::StoreCatalog;

pub const VALID_STORE: &str = "RP00001";
pub const OTHER_VALID_STORE: &str = "RP00002";
pub const UNKNOWN_STORE: &str = "UNKNOWN";
pub const VISIT_TIME: &str = "2023-10-21T15:04:05Z";

/// Same layout as the production store master file.
pub const STORE_MASTER_CSV: &str = "\
AreaCode,StoreName,StoreID
7,RP Super Mart Koramangala,RP00001
7,RP Super Mart Indiranagar,RP00002
";

pub fn test_catalog() -> StoreCatalog {
    StoreCatalog::from_reader(STORE_MASTER_CSV.as_bytes()).expect("fixture catalog parses")
}

pub fn encode_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(RgbImage::new(width, height))
        .write_to(&mut buf, format)
        .expect("fixture image encodes");
    buf.into_inner()
}

/// A 100x200 JPEG, perimeter 600.
pub fn jpeg_100x200() -> Vec<u8> {
    encode_image(100, 200, ImageFormat::Jpeg)
}

/// A 3x5 PNG, perimeter 16.
pub fn png_3x5() -> Vec<u8> {
    encode_image(3, 5, ImageFormat::Png)
}

pub fn visit(store_id: &str, image_urls: &[String]) -> Visit {
    Visit {
        store_id: store_id.to_string(),
        image_urls: image_urls.to_vec(),
        visit_time: VISIT_TIME.to_string(),
    }
}

pub fn job_request(visits: Vec<Visit>) -> JobRequest {
    JobRequest {
        count: visits.len(),
        visits,
    }
}
