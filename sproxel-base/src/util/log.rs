/// Provides the recommended log filter for programs which want to exclude particularly noisy
/// details of sproxel’s dependencies.
///
/// The guiding principle for this filtering is that at [`log::Level::Debug`] or lower level,
/// there should be no messages produced for every pixel or voxel unless something is wrong.
#[allow(clippy::missing_inline_in_public_items)]
pub fn standard_filter(metadata: &log::Metadata<'_>) -> bool {
    let target = metadata.target();

    !(target.starts_with("png::") // per-chunk decoding details
        || target.starts_with("clap_builder::")) // argument parsing internals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter() {
        assert!(!standard_filter(
            &log::Metadata::builder().target("png::decoder::stream").build()
        ));
        assert!(standard_filter(
            &log::Metadata::builder().target("sproxel_port::slices").build()
        ));
        assert!(standard_filter(
            &log::Metadata::builder().target("some_random_crate").build()
        ));
    }
}
