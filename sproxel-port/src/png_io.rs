//! Conversion between [`Raster`]s and PNG data.
//!
//! Indexed rasters are stored as 8-bit `ColorType::Indexed` images, with the color table
//! split between the `PLTE` (color) and `tRNS` (alpha) chunks. RGBA rasters are stored as
//! 8-bit `ColorType::Rgba`. Text metadata is stored as `tEXt` chunks.
//!
//! When reading, indexed images of any bit depth keep their indices; all other images are
//! converted to 8-bit RGBA. Text from `zTXt` and `iTXt` chunks is read as well as `tEXt`.

#[cfg(feature = "import")]
use std::io::Read;
#[cfg(feature = "export")]
use std::io::Write;

#[cfg(feature = "export")]
use crate::ExportError;
#[cfg(feature = "import")]
use crate::ImportErrorKind;
#[cfg(feature = "export")]
use crate::raster::Pixels;
#[cfg(any(feature = "import", feature = "export"))]
use crate::raster::Raster;

/// The first eight bytes of every PNG file.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Decodes a PNG image into a [`Raster`].
#[cfg(feature = "import")]
pub fn read_png(bytes: &[u8]) -> Result<Raster, ImportErrorKind> {
    let mut decoder = png::Decoder::new(bytes);
    decoder.set_transformations(png::Transformations::IDENTITY);
    let reader = decoder.read_info().map_err(decode_error)?;

    if reader.info().color_type == png::ColorType::Indexed {
        read_indexed(reader)
    } else {
        // Start over, this time letting the decoder normalize the pixel format.
        let mut decoder = png::Decoder::new(bytes);
        decoder.set_transformations(
            png::Transformations::EXPAND | png::Transformations::STRIP_16,
        );
        read_direct(decoder.read_info().map_err(decode_error)?)
    }
}

#[cfg(feature = "import")]
fn read_indexed<R: Read>(mut reader: png::Reader<R>) -> Result<Raster, ImportErrorKind> {
    let mut buf = vec![0; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf).map_err(decode_error)?;
    let width = frame.width as usize;
    let height = frame.height as usize;
    let bit_depth = frame.bit_depth as usize;

    let mut indices = Vec::with_capacity(width * height);
    for row in buf.chunks_exact(frame.line_size).take(height) {
        indices.extend(unpack_indices(row, bit_depth, width));
    }

    let info = reader.info();
    let rgb = info.palette.as_deref().unwrap_or_default();
    let alpha = info.trns.as_deref().unwrap_or_default();
    let color_table = rgb
        .chunks_exact(3)
        .enumerate()
        .map(|(i, c)| [c[0], c[1], c[2], alpha.get(i).copied().unwrap_or(u8::MAX)])
        .collect();

    let mut raster = Raster::from_indexed(width, height, indices, color_table)
        .map_err(|error| ImportErrorKind::Decode(Box::new(error)))?;
    copy_text(info, &mut raster)?;
    Ok(raster)
}

/// Unpacks one row of indices stored at `bit_depth` bits per pixel, most significant first.
#[cfg(feature = "import")]
fn unpack_indices(row: &[u8], bit_depth: usize, width: usize) -> impl Iterator<Item = u8> + '_ {
    let per_byte = 8 / bit_depth;
    let mask = u8::MAX >> (8 - bit_depth);
    (0..width).map(move |x| {
        let shift = 8 - bit_depth * (x % per_byte + 1);
        (row[x / per_byte] >> shift) & mask
    })
}

#[cfg(feature = "import")]
fn read_direct<R: Read>(mut reader: png::Reader<R>) -> Result<Raster, ImportErrorKind> {
    let mut buf = vec![0; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf).map_err(decode_error)?;
    let data = &buf[..frame.buffer_size()];

    let pixels: Vec<[u8; 4]> = match reader.output_color_type() {
        (png::ColorType::Grayscale, png::BitDepth::Eight) => {
            data.iter().map(|&l| [l, l, l, u8::MAX]).collect()
        }
        (png::ColorType::GrayscaleAlpha, png::BitDepth::Eight) => data
            .chunks_exact(2)
            .map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        (png::ColorType::Rgb, png::BitDepth::Eight) => data
            .chunks_exact(3)
            .map(|p| [p[0], p[1], p[2], u8::MAX])
            .collect(),
        (png::ColorType::Rgba, png::BitDepth::Eight) => data
            .chunks_exact(4)
            .map(|p| [p[0], p[1], p[2], p[3]])
            .collect(),
        (color_type, bit_depth) => {
            return Err(ImportErrorKind::Decode(
                format!("unexpected decoded pixel format {color_type:?} {bit_depth:?}").into(),
            ));
        }
    };

    let mut raster = Raster::from_rgba(frame.width as usize, frame.height as usize, pixels)
        .map_err(|error| ImportErrorKind::Decode(Box::new(error)))?;
    copy_text(reader.info(), &mut raster)?;
    Ok(raster)
}

#[cfg(feature = "import")]
fn copy_text(info: &png::Info<'_>, raster: &mut Raster) -> Result<(), ImportErrorKind> {
    for chunk in &info.uncompressed_latin1_text {
        raster.set_text(&*chunk.keyword, &*chunk.text);
    }
    for chunk in &info.compressed_latin1_text {
        raster.set_text(&*chunk.keyword, chunk.get_text().map_err(decode_error)?);
    }
    for chunk in &info.utf8_text {
        raster.set_text(&*chunk.keyword, chunk.get_text().map_err(decode_error)?);
    }
    Ok(())
}

#[cfg(feature = "import")]
fn decode_error(error: png::DecodingError) -> ImportErrorKind {
    ImportErrorKind::Decode(Box::new(error))
}

/// Encodes a [`Raster`] as a PNG image.
///
/// Fails with [`ExportError::NotRepresentable`] if the raster has zero width or height,
/// or is indexed with an empty color table or one longer than 256 entries, since PNG
/// cannot store those.
#[cfg(feature = "export")]
pub fn write_png<W: Write>(raster: &Raster, writer: W) -> Result<(), ExportError> {
    let not_representable = |reason: String| Err(ExportError::NotRepresentable { reason });

    let (Ok(width @ 1..), Ok(height @ 1..)) =
        (u32::try_from(raster.width()), u32::try_from(raster.height()))
    else {
        return not_representable(format!(
            "a {w}×{h} image",
            w = raster.width(),
            h = raster.height()
        ));
    };

    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Best);
    let data: &[u8] = match raster.pixels() {
        Pixels::Rgba(pixels) => {
            encoder.set_color(png::ColorType::Rgba);
            bytemuck::cast_slice(pixels)
        }
        Pixels::Indexed {
            indices,
            color_table,
        } => {
            if color_table.is_empty() || color_table.len() > 256 {
                return not_representable(format!(
                    "a color table of {len} entries",
                    len = color_table.len()
                ));
            }
            encoder.set_color(png::ColorType::Indexed);
            encoder.set_palette(
                color_table
                    .iter()
                    .flat_map(|&[r, g, b, _]| [r, g, b])
                    .collect::<Vec<u8>>(),
            );
            if color_table.iter().any(|&[.., a]| a != u8::MAX) {
                encoder.set_trns(color_table.iter().map(|&[.., a]| a).collect::<Vec<u8>>());
            }
            indices
        }
    };
    for (keyword, text) in raster.text_entries() {
        encoder.add_text_chunk(keyword.to_owned(), text.to_owned())?;
    }

    let mut writer = encoder.write_header()?;
    writer.write_image_data(data)?;
    writer.finish()?;
    Ok(())
}

#[cfg(all(test, feature = "import", feature = "export"))]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn encode(raster: &Raster) -> Vec<u8> {
        let mut bytes = Vec::new();
        write_png(raster, &mut bytes).unwrap();
        bytes
    }

    #[test]
    fn rgba_round_trip() {
        let mut raster = Raster::from_rgba(
            2,
            2,
            vec![[1, 2, 3, 4], [255, 0, 0, 255], [0, 0, 0, 0], [9, 8, 7, 6]],
        )
        .unwrap();
        raster.set_text("VoxelGridDimX", "1");
        raster.set_text("SproxelFileVersion", "1");

        let bytes = encode(&raster);
        assert!(bytes.starts_with(&PNG_SIGNATURE));
        assert_eq!(read_png(&bytes).unwrap(), raster);
    }

    #[test]
    fn indexed_round_trip() {
        let mut raster = Raster::from_indexed(
            3,
            1,
            vec![2, 0, 1],
            vec![[255, 0, 0, 255], [0, 255, 0, 128], [0, 0, 255, 0]],
        )
        .unwrap();
        raster.set_text("VoxelGridDimZ", "3");

        let decoded = read_png(&encode(&raster)).unwrap();
        assert_eq!(decoded, raster);
    }

    #[test]
    fn opaque_color_table_round_trip() {
        let raster =
            Raster::from_indexed(1, 2, vec![1, 0], vec![[10, 20, 30, 255], [40, 50, 60, 255]])
                .unwrap();
        assert_eq!(read_png(&encode(&raster)).unwrap(), raster);
    }

    #[rstest]
    #[case::one(png::BitDepth::One, vec![0b1010_0000], vec![1, 0, 1])]
    #[case::two(png::BitDepth::Two, vec![0b11_10_01_00], vec![3, 2, 1])]
    #[case::four(png::BitDepth::Four, vec![0xF1, 0x20], vec![15, 1, 2])]
    fn reads_packed_indices(
        #[case] bit_depth: png::BitDepth,
        #[case] row: Vec<u8>,
        #[case] expected: Vec<u8>,
    ) {
        let mut bytes = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut bytes, 3, 1);
            encoder.set_color(png::ColorType::Indexed);
            encoder.set_depth(bit_depth);
            encoder.set_palette(vec![0u8; 3 << bit_depth as usize]);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&row).unwrap();
            writer.finish().unwrap();
        }

        let raster = read_png(&bytes).unwrap();
        assert_eq!((raster.width(), raster.height()), (3, 1));
        let indices: Vec<u8> = (0..3).map(|x| raster.pixel_index(x, 0).unwrap()).collect();
        assert_eq!(indices, expected);
        assert_eq!(raster.color_table().unwrap().len(), 1 << bit_depth as usize);
    }

    #[test]
    fn reads_grayscale_as_rgba() {
        let mut bytes = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut bytes, 2, 1);
            encoder.set_color(png::ColorType::Grayscale);
            encoder.set_depth(png::BitDepth::Eight);
            encoder
                .add_ztxt_chunk("VoxelGridDimX".to_owned(), "2".to_owned())
                .unwrap();
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[0, 200]).unwrap();
            writer.finish().unwrap();
        }

        let raster = read_png(&bytes).unwrap();
        assert!(!raster.is_indexed());
        assert_eq!(raster.pixel_rgba(1, 0), Some([200, 200, 200, 255]));
        assert_eq!(raster.text("VoxelGridDimX"), Some("2"));
    }

    #[test]
    fn empty_raster_is_not_representable() {
        let raster = Raster::from_rgba(0, 3, vec![]).unwrap();
        assert!(matches!(
            write_png(&raster, Vec::new()),
            Err(ExportError::NotRepresentable { .. })
        ));
    }

    #[test]
    fn empty_color_table_is_not_representable() {
        let raster = Raster::from_indexed(1, 1, vec![0], vec![]).unwrap();
        assert!(matches!(
            write_png(&raster, Vec::new()),
            Err(ExportError::NotRepresentable { .. })
        ));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(
            read_png(b"not a png"),
            Err(ImportErrorKind::Decode(_))
        ));
    }
}
