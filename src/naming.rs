//! Output filenames.
//!
//! Two concerns live here:
//!
//! - [`build_output_filename`] derives the name a processed image is stored
//!   under from its uploaded name and the naming settings.
//! - [`ascii_safe_filename`] makes any name safe to hand to a download header
//!   or a plain-ASCII filesystem.
//!
//! ## Examples
//!
//! - `"Product Photo.JPG"`, suffix `_web`, webp, lowercase + spaces
//!   → `"product-photo_web.webp"`
//! - `"archive.tar.gz"`, png → `"archive.tar.png"` (only the last extension goes)
//! - `"shoe.png"`, original → `"shoe.png"`
//! - `"README"`, original → `"README.jpg"`

use crate::config::OutputFormat;

/// Extension used when `original` is requested and the source has none.
const FALLBACK_EXTENSION: &str = "jpg";

/// Build the output filename for one processed image.
///
/// The stem is the original name minus its last extension; a leading dot
/// (`.hidden`) does not count as an extension separator. Lowercasing and
/// whitespace collapsing apply to the stem only, then the suffix is appended
/// verbatim. With [`OutputFormat::Original`] the source extension is kept
/// as written.
pub fn build_output_filename(
    original: &str,
    suffix: &str,
    format: OutputFormat,
    to_lowercase: bool,
    replace_spaces: bool,
) -> String {
    let stem = match original.rfind('.') {
        Some(pos) if pos > 0 => &original[..pos],
        _ => original,
    };

    let mut slug = stem.to_string();
    if to_lowercase {
        slug = slug.to_lowercase();
    }
    if replace_spaces {
        slug = collapse_whitespace(&slug, "-");
    }

    let ext = match format {
        OutputFormat::Original => original
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .unwrap_or(FALLBACK_EXTENSION),
        other => other.as_str(),
    };
    let ext = ext.strip_prefix('.').unwrap_or(ext);

    format!("{slug}{suffix}.{ext}")
}

/// Replace every run of whitespace with `with`.
fn collapse_whitespace(input: &str, with: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_run = false;
    for c in input.chars() {
        if c.is_whitespace() {
            if !in_run {
                out.push_str(with);
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

/// Restrict a filename to printable ASCII.
///
/// Characters outside `0x20..=0x7E`, double quotes and backslashes become
/// `_`. An empty name becomes `file`.
pub fn ascii_safe_filename(name: &str) -> String {
    if name.is_empty() {
        return "file".to_string();
    }
    name.chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            ' '..='~' => c,
            _ => '_',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(original: &str, suffix: &str, format: OutputFormat, lower: bool, spaces: bool) -> String {
        build_output_filename(original, suffix, format, lower, spaces)
    }

    // =========================================================================
    // build_output_filename
    // =========================================================================

    #[test]
    fn full_normalization() {
        assert_eq!(
            name("Product Photo.JPG", "_web", OutputFormat::Webp, true, true),
            "product-photo_web.webp"
        );
    }

    #[test]
    fn no_normalization_keeps_stem() {
        assert_eq!(
            name("Product Photo.JPG", "", OutputFormat::Png, false, false),
            "Product Photo.png"
        );
    }

    #[test]
    fn only_last_extension_is_stripped() {
        assert_eq!(
            name("archive.tar.gz", "", OutputFormat::Png, false, false),
            "archive.tar.png"
        );
    }

    #[test]
    fn original_keeps_source_extension() {
        assert_eq!(name("shoe.png", "", OutputFormat::Original, false, false), "shoe.png");
        assert_eq!(name("Shoe.JPG", "-1", OutputFormat::Original, true, false), "shoe-1.JPG");
    }

    #[test]
    fn original_without_extension_falls_back_to_jpg() {
        assert_eq!(name("file", "", OutputFormat::Original, false, false), "file.jpg");
    }

    #[test]
    fn leading_dot_is_not_an_extension() {
        assert_eq!(name(".hidden", "", OutputFormat::Jpg, false, false), ".hidden.jpg");
    }

    #[test]
    fn whitespace_runs_collapse_to_single_dash() {
        assert_eq!(
            name("red  \t shoe  side.jpg", "", OutputFormat::Jpg, false, true),
            "red-shoe-side.jpg"
        );
    }

    #[test]
    fn lowercase_without_space_replacement() {
        assert_eq!(
            name("Blue Mug.PNG", "_sm", OutputFormat::Avif, true, false),
            "blue mug_sm.avif"
        );
    }

    #[test]
    fn suffix_is_verbatim() {
        assert_eq!(
            name("mug.png", " Final V2", OutputFormat::Jpg, true, true),
            "mug Final V2.jpg"
        );
    }

    #[test]
    fn every_format_extension() {
        for (format, ext) in [
            (OutputFormat::Jpg, "jpg"),
            (OutputFormat::Png, "png"),
            (OutputFormat::Webp, "webp"),
            (OutputFormat::Avif, "avif"),
        ] {
            assert_eq!(name("a.tiff", "", format, false, false), format!("a.{ext}"));
        }
    }

    // =========================================================================
    // ascii_safe_filename
    // =========================================================================

    #[test]
    fn ascii_passes_through() {
        assert_eq!(ascii_safe_filename("product-photo_web.webp"), "product-photo_web.webp");
        assert_eq!(ascii_safe_filename("with space.jpg"), "with space.jpg");
    }

    #[test]
    fn non_ascii_and_quotes_replaced() {
        assert_eq!(ascii_safe_filename("café.jpg"), "caf_.jpg");
        assert_eq!(ascii_safe_filename("a\"b\\c.png"), "a_b_c.png");
        assert_eq!(ascii_safe_filename("tab\there.png"), "tab_here.png");
    }

    #[test]
    fn empty_becomes_file() {
        assert_eq!(ascii_safe_filename(""), "file");
    }
}
