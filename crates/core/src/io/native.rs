//! Native GeoTIFF reading/writing using the `tiff` crate.
//!
//! Understands the subset of GeoTIFF needed for bathymetry rasters:
//! pixel scale + tie point (or a full model transformation), the EPSG code
//! in the GeoKeyDirectory, and the GDAL_NODATA tag.

use crate::crs::CRS;
use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Raster, RasterElement};
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Read, Seek, Write};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::Gray32Float;
use tiff::encoder::TiffEncoder;
use tiff::tags::Tag;
use tiff::ColorType;

mod tags {
    pub const MODEL_PIXEL_SCALE: u16 = 33550;
    pub const MODEL_TIEPOINT: u16 = 33922;
    pub const MODEL_TRANSFORMATION: u16 = 34264;
    pub const GEO_KEY_DIRECTORY: u16 = 34735;
    pub const GDAL_NODATA: u16 = 42113;
}

mod geokeys {
    pub const MODEL_TYPE: u16 = 1024;
    pub const RASTER_TYPE: u16 = 1025;
    pub const GEOGRAPHIC_TYPE: u16 = 2048;
    pub const PROJECTED_CS_TYPE: u16 = 3072;
    pub const USER_DEFINED: u16 = 32767;
}

/// Resolve a numeric tag to the decoder's `Tag`, whether or not the
/// `tiff` crate knows it by name.
fn tag(code: u16) -> Tag {
    Tag::from_u16_exhaustive(code)
}

/// Read the first band of a GeoTIFF file as a depth raster.
///
/// Cells equal to the declared GDAL no-data value are converted to NaN.
pub fn read_geotiff<P: AsRef<Path>>(path: P) -> Result<Raster<f64>> {
    let file = File::open(path.as_ref())?;
    decode_geotiff(BufReader::new(file))
}

/// Read a GeoTIFF from an in-memory buffer
pub fn read_geotiff_from_buffer(data: &[u8]) -> Result<Raster<f64>> {
    decode_geotiff(Cursor::new(data))
}

fn decode_geotiff<R: Read + Seek>(reader: R) -> Result<Raster<f64>> {
    let mut decoder = Decoder::new(reader)?;

    let (width, height) = decoder.dimensions()?;
    let rows = height as usize;
    let cols = width as usize;
    if rows == 0 || cols == 0 {
        return Err(Error::EmptyRaster { rows, cols });
    }

    if !matches!(decoder.colortype()?, ColorType::Gray(_)) {
        let found = decoder
            .get_tag_u32(Tag::SamplesPerPixel)
            .map(|n| n as u16)
            .unwrap_or(0);
        return Err(Error::BandCount { found });
    }

    let transform = read_geotransform(&mut decoder);
    let crs = read_crs(&mut decoder);
    let nodata = read_nodata(&mut decoder);

    let mut data = match decoder.read_image()? {
        DecodingResult::F32(buf) => widen(buf),
        DecodingResult::F64(buf) => buf,
        DecodingResult::U8(buf) => widen(buf),
        DecodingResult::U16(buf) => widen(buf),
        DecodingResult::U32(buf) => widen(buf),
        DecodingResult::I8(buf) => widen(buf),
        DecodingResult::I16(buf) => widen(buf),
        DecodingResult::I32(buf) => widen(buf),
        _ => {
            return Err(Error::UnsupportedDataType(
                "Unsupported TIFF pixel format".to_string(),
            ))
        }
    };

    if let Some(nd) = nodata {
        mask_nodata(&mut data, nd);
    }

    let mut raster = Raster::from_vec(data, rows, cols)?;
    if let Some(transform) = transform {
        raster.set_transform(transform);
    }
    raster.set_crs(crs);

    Ok(raster)
}

fn widen<V: Copy + Into<f64>>(buf: Vec<V>) -> Vec<f64> {
    buf.into_iter().map(Into::into).collect()
}

/// Replace the declared no-data value with NaN
fn mask_nodata(data: &mut [f64], nodata: f64) {
    if nodata.is_nan() {
        return;
    }
    let tolerance = nodata.abs() * f32::EPSILON as f64;
    for v in data.iter_mut() {
        if *v == nodata || (*v - nodata).abs() <= tolerance {
            *v = f64::NAN;
        }
    }
}

fn read_geotransform<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<GeoTransform> {
    let scale = decoder.get_tag_f64_vec(tag(tags::MODEL_PIXEL_SCALE)).ok();
    let tiepoint = decoder.get_tag_f64_vec(tag(tags::MODEL_TIEPOINT)).ok();

    if let (Some(scale), Some(tiepoint)) = (scale, tiepoint) {
        if let Some(gt) = GeoTransform::from_tiepoint_scale(&tiepoint, &scale) {
            return Some(gt);
        }
    }

    decoder
        .get_tag_f64_vec(tag(tags::MODEL_TRANSFORMATION))
        .ok()
        .and_then(|m| GeoTransform::from_model_transformation(&m))
}

/// EPSG code from ProjectedCSTypeGeoKey, else GeographicTypeGeoKey
fn read_crs<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<CRS> {
    let directory = decoder.get_tag_u16_vec(tag(tags::GEO_KEY_DIRECTORY)).ok()?;
    epsg_from_geokeys(&directory).map(|code| CRS::from_epsg(code as u32))
}

fn epsg_from_geokeys(directory: &[u16]) -> Option<u16> {
    if directory.len() < 4 {
        return None;
    }
    let num_keys = directory[3] as usize;

    // Each key: [id, tiff_tag_location, count, value]; location 0 = inline
    let inline_value = |wanted: u16| {
        directory[4..]
            .chunks_exact(4)
            .take(num_keys)
            .find(|key| key[0] == wanted && key[1] == 0)
            .map(|key| key[3])
            .filter(|&v| v > 0 && v != geokeys::USER_DEFINED)
    };

    inline_value(geokeys::PROJECTED_CS_TYPE).or_else(|| inline_value(geokeys::GEOGRAPHIC_TYPE))
}

fn read_nodata<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<f64> {
    let text = decoder.get_tag_ascii_string(tag(tags::GDAL_NODATA)).ok()?;
    text.trim_end_matches('\0').trim().parse::<f64>().ok()
}

/// Write a raster to a single-band 32-bit float GeoTIFF file
pub fn write_geotiff<T, P>(raster: &Raster<T>, path: P) -> Result<()>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    encode_geotiff(raster, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a raster to an in-memory GeoTIFF buffer
pub fn write_geotiff_to_buffer<T: RasterElement>(raster: &Raster<T>) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    encode_geotiff(raster, Cursor::new(&mut buf))?;
    Ok(buf)
}

fn encode_geotiff<T, W>(raster: &Raster<T>, writer: W) -> Result<()>
where
    T: RasterElement,
    W: Write + Seek,
{
    let mut encoder = TiffEncoder::new(writer)?;
    let (rows, cols) = raster.shape();

    let data: Vec<f32> = raster
        .data()
        .iter()
        .map(|v| v.to_f32().unwrap_or(f32::NAN))
        .collect();

    let mut image = encoder.new_image::<Gray32Float>(cols as u32, rows as u32)?;

    let gt = raster.transform();
    let scale = [gt.pixel_width, gt.pixel_height.abs(), 0.0];
    image
        .encoder()
        .write_tag(tag(tags::MODEL_PIXEL_SCALE), &scale[..])?;

    let tiepoint = [0.0, 0.0, 0.0, gt.origin_x, gt.origin_y, 0.0];
    image
        .encoder()
        .write_tag(tag(tags::MODEL_TIEPOINT), &tiepoint[..])?;

    let directory = geokey_directory(raster.crs().and_then(|c| c.epsg()));
    image
        .encoder()
        .write_tag(tag(tags::GEO_KEY_DIRECTORY), &directory[..])?;

    image.encoder().write_tag(tag(tags::GDAL_NODATA), "nan")?;

    image.write_data(&data)?;
    Ok(())
}

/// Minimal GeoKeyDirectory: model type, raster type (PixelIsArea) and the
/// EPSG code when known.
fn geokey_directory(epsg: Option<u32>) -> Vec<u16> {
    let mut keys: Vec<[u16; 4]> = Vec::with_capacity(3);
    match epsg.and_then(|c| u16::try_from(c).ok()) {
        Some(code) if (4000..5000).contains(&code) => {
            keys.push([geokeys::MODEL_TYPE, 0, 1, 2]);
            keys.push([geokeys::RASTER_TYPE, 0, 1, 1]);
            keys.push([geokeys::GEOGRAPHIC_TYPE, 0, 1, code]);
        }
        Some(code) => {
            keys.push([geokeys::MODEL_TYPE, 0, 1, 1]);
            keys.push([geokeys::RASTER_TYPE, 0, 1, 1]);
            keys.push([geokeys::PROJECTED_CS_TYPE, 0, 1, code]);
        }
        None => {
            keys.push([geokeys::MODEL_TYPE, 0, 1, 1]);
            keys.push([geokeys::RASTER_TYPE, 0, 1, 1]);
        }
    }

    let mut directory = vec![1, 1, 0, keys.len() as u16];
    directory.extend(keys.into_iter().flatten());
    directory
}
