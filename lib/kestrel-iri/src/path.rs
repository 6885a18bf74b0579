//! Filesystem path ⇄ `file:` IRI conversion.

use crate::{Iri, IriParseError};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use std::path::{Component, Path, PathBuf};

/// The characters of a path segment that must be percent-encoded in an IRI.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'%')
    .add(b'\\')
    .add(b'^')
    .add(b'|');

/// Converts an absolute filesystem path to a `file:` IRI.
///
/// Path separators are normalized to `/` and reserved characters are
/// percent-encoded.
///
/// ```
/// use kestrel_iri::path_to_file_iri;
/// use std::path::Path;
///
/// let iri = path_to_file_iri(Path::new("/tmp/a file.ttl"))?;
/// assert_eq!(iri.as_str(), "file:///tmp/a%20file.ttl");
/// # Result::<_, kestrel_iri::IriParseError>::Ok(())
/// ```
pub fn path_to_file_iri(path: &Path) -> Result<Iri<String>, IriParseError> {
    let mut iri = String::from("file://");
    for component in path.components() {
        match component {
            Component::RootDir => (),
            Component::Prefix(prefix) => {
                // Windows drive letters keep their separator form
                iri.push('/');
                iri.push_str(&prefix.as_os_str().to_string_lossy().replace('\\', "/"));
            }
            Component::CurDir | Component::ParentDir | Component::Normal(_) => {
                iri.push('/');
                iri.extend(utf8_percent_encode(
                    &component.as_os_str().to_string_lossy(),
                    PATH_SEGMENT,
                ));
            }
        }
    }
    if path.as_os_str().is_empty() || iri == "file://" {
        iri.push('/');
    }
    Iri::parse(iri)
}

/// Converts a `file:` IRI back to a filesystem path, percent-decoding each
/// segment.
pub fn file_iri_to_path(iri: &Iri<impl std::ops::Deref<Target = str>>) -> Option<PathBuf> {
    if !iri.scheme().eq_ignore_ascii_case("file") {
        return None;
    }
    match iri.authority() {
        None | Some("") | Some("localhost") => (),
        Some(_) => return None, // remote file IRIs have no local path
    }
    let decoded = percent_decode_str(iri.path()).decode_utf8().ok()?;
    Some(PathBuf::from(decoded.into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_round_trip() {
        let path = Path::new("/var/data/simple.nt");
        let iri = path_to_file_iri(path).unwrap();
        assert_eq!(iri.as_str(), "file:///var/data/simple.nt");
        assert_eq!(file_iri_to_path(&iri).unwrap(), path);
    }

    #[test]
    fn reserved_characters_are_encoded() {
        let path = Path::new("/tmp/100% sure.rdf");
        let iri = path_to_file_iri(path).unwrap();
        assert_eq!(iri.as_str(), "file:///tmp/100%25%20sure.rdf");
        assert_eq!(file_iri_to_path(&iri).unwrap(), path);
    }

    #[test]
    fn non_file_iri_has_no_path() {
        let iri = Iri::parse("http://example.com/foo").unwrap();
        assert_eq!(file_iri_to_path(&iri), None);
    }

    #[test]
    fn localhost_authority_is_accepted() {
        let iri = Iri::parse("file://localhost/etc/fstab").unwrap();
        assert_eq!(file_iri_to_path(&iri).unwrap(), Path::new("/etc/fstab"));
    }
}
