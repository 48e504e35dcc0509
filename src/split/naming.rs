use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const INVALID_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];
const MAX_NAME_CHARS: usize = 100;
const FALLBACK_NAME: &str = "video";
const DEFAULT_EXTENSION: &str = "mp4";
const MAX_DIRECTORY_ATTEMPTS: usize = 1000;

/// Make a name safe to use as a file or directory name on common filesystems
pub fn sanitize_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if INVALID_CHARS.contains(&c) || c.is_control() { '_' } else { c })
        .take(MAX_NAME_CHARS)
        .collect();
    let trimmed = replaced.trim_matches(|c| c == ' ' || c == '.');
    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Sanitized file stem of the source, used for the segment directory and file names
pub fn media_title(source: &Path) -> String {
    let stem = source
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    sanitize_filename(&stem)
}

/// Segments keep the source container so stream copy stays valid
pub fn output_extension(source: &Path) -> String {
    source
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

/// Create a fresh `<root>/<title>` directory, falling back to `<title>_2`,
/// `<title>_3`, ... when the name is already taken. Returns the directory and
/// the title its segment files should carry.
///
/// `create_dir` fails on existing entries, so two sources with the same stem
/// never share (and overwrite) one another's segments.
pub fn claim_output_directory(root: &Path, title: &str) -> io::Result<(PathBuf, String)> {
    fs::create_dir_all(root)?;
    for attempt in 1..=MAX_DIRECTORY_ATTEMPTS {
        let name = if attempt == 1 {
            title.to_string()
        } else {
            format!("{}_{}", title, attempt)
        };
        let directory = root.join(&name);
        match fs::create_dir(&directory) {
            Ok(()) => return Ok((directory, name)),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(err) => return Err(err),
        }
    }
    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!(
            "no free output directory for {:?} under {:?} after {} attempts",
            title, root, MAX_DIRECTORY_ATTEMPTS
        ),
    ))
}

pub fn segment_filename(title: &str, segment_number: usize, extension: &str) -> String {
    format!("{}_{:02}.{}", title, segment_number, extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_reserved_characters() {
        assert_eq!(
            sanitize_filename(r#"a<b>c:d"e/f\g|h?i*j"#),
            "a_b_c_d_e_f_g_h_i_j"
        );
    }

    #[test]
    fn trims_spaces_and_dots() {
        assert_eq!(sanitize_filename("  .My Clip.. "), "My Clip");
    }

    #[test]
    fn truncates_long_names_by_character() {
        let name = "é".repeat(150);
        let sanitized = sanitize_filename(&name);
        assert_eq!(sanitized.chars().count(), 100);
    }

    #[test]
    fn empty_names_fall_back() {
        assert_eq!(sanitize_filename(" ... "), "video");
        assert_eq!(media_title(Path::new("/")), "video");
    }

    #[test]
    fn title_and_extension_come_from_source() {
        let source = Path::new("/media/Trip: Day 1.WEBM");
        assert_eq!(media_title(source), "Trip_ Day 1");
        assert_eq!(output_extension(source), "webm");
        assert_eq!(output_extension(Path::new("/media/raw")), "mp4");
    }

    #[test]
    fn taken_directories_get_a_numeric_suffix() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().join("out");

        let (first, first_title) = claim_output_directory(&root, "clip").unwrap();
        let (second, second_title) = claim_output_directory(&root, "clip").unwrap();
        let (third, third_title) = claim_output_directory(&root, "clip").unwrap();

        assert_eq!(first, root.join("clip"));
        assert_eq!(first_title, "clip");
        assert_eq!(second, root.join("clip_2"));
        assert_eq!(second_title, "clip_2");
        assert_eq!(third_title, "clip_3");
        assert!(third.is_dir());
    }

    #[test]
    fn segment_numbers_are_zero_padded() {
        assert_eq!(segment_filename("clip", 3, "mp4"), "clip_03.mp4");
        assert_eq!(segment_filename("clip", 12, "mkv"), "clip_12.mkv");
    }
}
