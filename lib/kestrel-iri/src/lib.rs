#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]

mod path;

pub use crate::path::{file_iri_to_path, path_to_file_iri};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;

/// An absolute IRI, i.e. an IRI with a scheme.
///
/// The inner storage is generic so that both owned (`Iri<String>`) and
/// borrowed (`Iri<&str>`) IRIs share the implementation.
///
/// ```
/// use kestrel_iri::Iri;
///
/// let iri = Iri::parse("http://example.com/foo?bar#baz")?;
/// assert_eq!(iri.scheme(), "http");
/// assert_eq!(iri.authority(), Some("example.com"));
/// assert_eq!(iri.path(), "/foo");
/// assert_eq!(iri.query(), Some("bar"));
/// assert_eq!(iri.fragment(), Some("baz"));
/// # Result::<_, kestrel_iri::IriParseError>::Ok(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Iri<T> {
    iri: T,
}

impl<T: Deref<Target = str>> Iri<T> {
    /// Parses and validates an absolute IRI.
    pub fn parse(iri: T) -> Result<Self, IriParseError> {
        let components = IriComponents::split(&iri);
        if components.scheme.is_none() {
            return Err(IriParseError::no_scheme(&iri));
        }
        validate_characters(&iri)?;
        Ok(Self { iri })
    }

    /// Builds an IRI from a string without validating it.
    ///
    /// It is the caller's responsibility to ensure the string is a valid
    /// absolute IRI. [`Iri::parse`] is the safe constructor for untrusted
    /// input.
    #[inline]
    pub fn parse_unchecked(iri: T) -> Self {
        Self { iri }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.iri
    }

    #[inline]
    pub fn as_ref(&self) -> Iri<&str> {
        Iri { iri: &self.iri }
    }

    /// The IRI scheme, without the trailing `:`.
    pub fn scheme(&self) -> &str {
        self.components().scheme.unwrap_or("")
    }

    /// The IRI authority, without the leading `//`.
    pub fn authority(&self) -> Option<&str> {
        self.components().authority
    }

    pub fn path(&self) -> &str {
        self.components().path
    }

    pub fn query(&self) -> Option<&str> {
        self.components().query
    }

    pub fn fragment(&self) -> Option<&str> {
        self.components().fragment
    }

    /// Resolves `reference` against this IRI following
    /// [RFC 3986 section 5.2](https://www.rfc-editor.org/rfc/rfc3986#section-5.2).
    pub fn resolve(&self, reference: &str) -> Result<Iri<String>, IriParseError> {
        validate_characters(reference)?;
        Ok(self.resolve_unchecked(reference))
    }

    /// Like [`Iri::resolve`] but without validating the reference.
    pub fn resolve_unchecked(&self, reference: &str) -> Iri<String> {
        let base = self.components();
        let r = IriComponents::split(reference);

        let (scheme, authority, path, query);
        if let Some(s) = r.scheme {
            scheme = s;
            authority = r.authority;
            path = remove_dot_segments(r.path);
            query = r.query;
        } else {
            scheme = base.scheme.unwrap_or("");
            if r.authority.is_some() {
                authority = r.authority;
                path = remove_dot_segments(r.path);
                query = r.query;
            } else {
                authority = base.authority;
                if r.path.is_empty() {
                    path = base.path.to_owned();
                    query = r.query.or(base.query);
                } else if r.path.starts_with('/') {
                    path = remove_dot_segments(r.path);
                    query = r.query;
                } else {
                    path = remove_dot_segments(&merge_paths(&base, r.path));
                    query = r.query;
                }
            }
        }

        let mut target = String::with_capacity(self.iri.len() + reference.len());
        target.push_str(scheme);
        target.push(':');
        if let Some(authority) = authority {
            target.push_str("//");
            target.push_str(authority);
        }
        target.push_str(&path);
        if let Some(query) = query {
            target.push('?');
            target.push_str(query);
        }
        if let Some(fragment) = r.fragment {
            target.push('#');
            target.push_str(fragment);
        }
        Iri { iri: target }
    }

    /// Computes the shortest reference that, resolved against this IRI,
    /// yields `target` again.
    ///
    /// ```
    /// use kestrel_iri::Iri;
    ///
    /// let base = Iri::parse("http://a/b/c/d;p?q")?;
    /// let target = Iri::parse("http://a/b/g")?;
    /// let reference = base.relativize(&target);
    /// assert_eq!(reference, "../g");
    /// assert_eq!(base.resolve(&reference)?.as_str(), target.as_str());
    /// # Result::<_, kestrel_iri::IriParseError>::Ok(())
    /// ```
    pub fn relativize(&self, target: &Iri<impl Deref<Target = str>>) -> String {
        let base = self.components();
        let t = target.components();

        if base.scheme != t.scheme {
            return target.as_str().to_owned();
        }
        let tail = |out: &mut String| {
            if let Some(query) = t.query {
                out.push('?');
                out.push_str(query);
            }
            if let Some(fragment) = t.fragment {
                out.push('#');
                out.push_str(fragment);
            }
        };
        if base.authority != t.authority {
            let mut out = String::new();
            if let Some(authority) = t.authority {
                out.push_str("//");
                out.push_str(authority);
            }
            out.push_str(t.path);
            tail(&mut out);
            return out;
        }
        if base.path == t.path {
            // Same document: a query-less or fragment-only reference
            return if t.query == base.query {
                let mut out = String::new();
                tail_fragment_only(&mut out, t.fragment);
                out
            } else if let Some(query) = t.query {
                let mut out = String::new();
                out.push('?');
                out.push_str(query);
                if let Some(fragment) = t.fragment {
                    out.push('#');
                    out.push_str(fragment);
                }
                out
            } else {
                // The base has a query the target lacks: an empty reference
                // would inherit it, so name the last path segment instead.
                let mut out = last_segment_reference(t.path);
                tail(&mut out);
                out
            };
        }
        let mut out = relative_path(base.path, t.path);
        tail(&mut out);
        out
    }

    fn components(&self) -> IriComponents<'_> {
        IriComponents::split(&self.iri)
    }
}

impl Iri<String> {
    #[inline]
    pub fn into_inner(self) -> String {
        self.iri
    }
}

impl Iri<&str> {
    #[inline]
    pub fn into_owned(self) -> Iri<String> {
        Iri {
            iri: self.iri.to_owned(),
        }
    }
}

impl<T: Deref<Target = str>> fmt::Display for Iri<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.iri)
    }
}

impl<T: Deref<Target = str>, U: Deref<Target = str>> PartialEq<Iri<U>> for Iri<T> {
    fn eq(&self, other: &Iri<U>) -> bool {
        *self.iri == *other.iri
    }
}

impl<T: Deref<Target = str>> Eq for Iri<T> {}

impl<T: Deref<Target = str>> PartialEq<str> for Iri<T> {
    fn eq(&self, other: &str) -> bool {
        *self.iri == *other
    }
}

impl<T: Deref<Target = str>> Hash for Iri<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state)
    }
}

impl<T: Deref<Target = str>> PartialOrd for Iri<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Deref<Target = str>> Ord for Iri<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl<T: Deref<Target = str>> AsRef<str> for Iri<T> {
    fn as_ref(&self) -> &str {
        &self.iri
    }
}

/// The five components of an IRI reference
/// ([RFC 3986 section 3](https://www.rfc-editor.org/rfc/rfc3986#section-3)).
#[derive(Clone, Copy)]
struct IriComponents<'a> {
    scheme: Option<&'a str>,
    authority: Option<&'a str>,
    path: &'a str,
    query: Option<&'a str>,
    fragment: Option<&'a str>,
}

impl<'a> IriComponents<'a> {
    fn split(iri: &'a str) -> Self {
        let (before_fragment, fragment) = match iri.find('#') {
            Some(i) => (&iri[..i], Some(&iri[i + 1..])),
            None => (iri, None),
        };
        let (before_query, query) = match before_fragment.find('?') {
            Some(i) => (&before_fragment[..i], Some(&before_fragment[i + 1..])),
            None => (before_fragment, None),
        };
        let (scheme, after_scheme) = match before_query.find(':') {
            Some(i) if is_scheme(&before_query[..i]) => {
                (Some(&before_query[..i]), &before_query[i + 1..])
            }
            _ => (None, before_query),
        };
        let (authority, path) = if let Some(after_slashes) = after_scheme.strip_prefix("//") {
            let authority_end = after_slashes.find('/').unwrap_or(after_slashes.len());
            (
                Some(&after_slashes[..authority_end]),
                &after_slashes[authority_end..],
            )
        } else {
            (None, after_scheme)
        };
        Self {
            scheme,
            authority,
            path,
            query,
            fragment,
        }
    }
}

fn is_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn validate_characters(iri: &str) -> Result<(), IriParseError> {
    for c in iri.chars() {
        if matches!(
            c,
            '\0'..='\u{20}' | '<' | '>' | '"' | '{' | '}' | '|' | '\\' | '^' | '`' | '\u{7f}'
        ) {
            return Err(IriParseError {
                iri: iri.to_owned(),
                kind: IriParseErrorKind::ForbiddenCharacter(c),
            });
        }
    }
    Ok(())
}

/// [RFC 3986 section 5.3](https://www.rfc-editor.org/rfc/rfc3986#section-5.3).
fn merge_paths(base: &IriComponents<'_>, reference_path: &str) -> String {
    if base.authority.is_some() && base.path.is_empty() {
        return format!("/{reference_path}");
    }
    match base.path.rfind('/') {
        Some(i) => format!("{}{}", &base.path[..=i], reference_path),
        None => reference_path.to_owned(),
    }
}

/// [RFC 3986 section 5.2.4](https://www.rfc-editor.org/rfc/rfc3986#section-5.2.4).
fn remove_dot_segments(path: &str) -> String {
    let mut input = path;
    let mut output = String::with_capacity(path.len());
    while !input.is_empty() {
        if let Some(rest) = input.strip_prefix("../") {
            input = rest;
        } else if let Some(rest) = input.strip_prefix("./") {
            input = rest;
        } else if input.starts_with("/./") {
            input = &input[2..]; // keep the leading '/'
        } else if input == "/." {
            input = "/";
        } else if input.starts_with("/../") || input == "/.." {
            input = if input == "/.." { "/" } else { &input[3..] };
            if let Some(i) = output.rfind('/') {
                output.truncate(i);
            } else {
                output.clear();
            }
        } else if input == "." || input == ".." {
            input = "";
        } else {
            let after_first = if let Some(rest) = input.strip_prefix('/') {
                rest
            } else {
                input
            };
            let segment_end = after_first.find('/').map_or(input.len(), |i| {
                i + (input.len() - after_first.len())
            });
            output.push_str(&input[..segment_end]);
            input = &input[segment_end..];
        }
    }
    output
}

/// A reference naming the last segment of `path`, for cases where an empty
/// reference would wrongly inherit the base query.
fn last_segment_reference(path: &str) -> String {
    match path.rfind('/') {
        Some(i) if i + 1 == path.len() => ".".to_owned(),
        Some(i) => {
            let segment = &path[i + 1..];
            if segment.contains(':') {
                format!("./{segment}")
            } else {
                segment.to_owned()
            }
        }
        None => path.to_owned(),
    }
}

fn tail_fragment_only(out: &mut String, fragment: Option<&str>) {
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
}

fn relative_path(base_path: &str, target_path: &str) -> String {
    // Both paths come from IRIs with the same scheme and authority, so they
    // are either both absolute or the base is opaque (no '/'): in the opaque
    // case only an absolute-path or full reference can express the target.
    if !base_path.starts_with('/') || !target_path.starts_with('/') || target_path.starts_with("//")
    {
        // A leading segment with a ':' would be read back as a scheme.
        return if !target_path.starts_with('/')
            && target_path.split('/').next().is_some_and(|s| s.contains(':'))
        {
            format!("./{target_path}")
        } else {
            target_path.to_owned()
        };
    }
    let base_dir = &base_path[..=base_path.rfind('/').unwrap_or(0)];
    let mut dirs: Vec<&str> = base_dir.split('/').collect();
    dirs.pop(); // the entry after the final '/'
    let segments: Vec<&str> = target_path.split('/').collect();

    let mut common = 0;
    while common < dirs.len()
        && common + 1 < segments.len()
        && dirs[common] == segments[common]
    {
        common += 1;
    }
    if common <= 1 {
        // Only the root in common: the absolute-path form is shorter and
        // avoids a chain of leading '../'.
        return target_path.to_owned();
    }
    let ups = dirs.len() - common;
    let mut out = String::new();
    for _ in 0..ups {
        out.push_str("../");
    }
    let remainder = segments[common..].join("/");
    if remainder.starts_with('/') {
        return target_path.to_owned();
    }
    if ups == 0 {
        if remainder.is_empty() {
            return ".".to_owned();
        }
        if remainder.split('/').next().is_some_and(|s| s.contains(':')) {
            out.push_str("./");
        }
    }
    out.push_str(&remainder);
    if out.is_empty() {
        ".".to_owned()
    } else {
        out
    }
}

/// Error returned when parsing or resolving an invalid IRI.
#[derive(Debug, Clone, thiserror::Error)]
#[error("error while parsing IRI '{iri}': {kind}")]
pub struct IriParseError {
    iri: String,
    kind: IriParseErrorKind,
}

#[derive(Debug, Clone, thiserror::Error)]
enum IriParseErrorKind {
    #[error("no scheme found in an absolute IRI")]
    NoScheme,
    #[error("the character '{0}' is not allowed")]
    ForbiddenCharacter(char),
}

impl IriParseError {
    fn no_scheme(iri: &str) -> Self {
        Self {
            iri: iri.to_owned(),
            kind: IriParseErrorKind::NoScheme,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://a/b/c/d;p?q";

    fn resolve(reference: &str) -> String {
        Iri::parse(BASE)
            .unwrap()
            .resolve(reference)
            .unwrap()
            .into_inner()
    }

    #[test]
    fn rfc3986_normal_examples() {
        // RFC 3986 section 5.4.1
        assert_eq!(resolve("g:h"), "g:h");
        assert_eq!(resolve("g"), "http://a/b/c/g");
        assert_eq!(resolve("./g"), "http://a/b/c/g");
        assert_eq!(resolve("g/"), "http://a/b/c/g/");
        assert_eq!(resolve("/g"), "http://a/g");
        assert_eq!(resolve("//g"), "http://g");
        assert_eq!(resolve("?y"), "http://a/b/c/d;p?y");
        assert_eq!(resolve("g?y"), "http://a/b/c/g?y");
        assert_eq!(resolve("#s"), "http://a/b/c/d;p?q#s");
        assert_eq!(resolve("g#s"), "http://a/b/c/g#s");
        assert_eq!(resolve("g?y#s"), "http://a/b/c/g?y#s");
        assert_eq!(resolve(";x"), "http://a/b/c/;x");
        assert_eq!(resolve("g;x"), "http://a/b/c/g;x");
        assert_eq!(resolve("g;x?y#s"), "http://a/b/c/g;x?y#s");
        assert_eq!(resolve(""), "http://a/b/c/d;p?q");
        assert_eq!(resolve("."), "http://a/b/c/");
        assert_eq!(resolve("./"), "http://a/b/c/");
        assert_eq!(resolve(".."), "http://a/b/");
        assert_eq!(resolve("../"), "http://a/b/");
        assert_eq!(resolve("../g"), "http://a/b/g");
        assert_eq!(resolve("../.."), "http://a/");
        assert_eq!(resolve("../../"), "http://a/");
        assert_eq!(resolve("../../g"), "http://a/g");
    }

    #[test]
    fn rfc3986_abnormal_examples() {
        // RFC 3986 section 5.4.2
        assert_eq!(resolve("../../../g"), "http://a/g");
        assert_eq!(resolve("../../../../g"), "http://a/g");
        assert_eq!(resolve("/./g"), "http://a/g");
        assert_eq!(resolve("/../g"), "http://a/g");
        assert_eq!(resolve("g."), "http://a/b/c/g.");
        assert_eq!(resolve(".g"), "http://a/b/c/.g");
        assert_eq!(resolve("g.."), "http://a/b/c/g..");
        assert_eq!(resolve("..g"), "http://a/b/c/..g");
        assert_eq!(resolve("./../g"), "http://a/b/g");
        assert_eq!(resolve("./g/."), "http://a/b/c/g/");
        assert_eq!(resolve("g/./h"), "http://a/b/c/g/h");
        assert_eq!(resolve("g/../h"), "http://a/b/c/h");
        assert_eq!(resolve("g;x=1/./y"), "http://a/b/c/g;x=1/y");
        assert_eq!(resolve("g;x=1/../y"), "http://a/b/c/y");
        assert_eq!(resolve("g?y/./x"), "http://a/b/c/g?y/./x");
        assert_eq!(resolve("g?y/../x"), "http://a/b/c/g?y/../x");
        assert_eq!(resolve("g#s/./x"), "http://a/b/c/g#s/./x");
        assert_eq!(resolve("g#s/../x"), "http://a/b/c/g#s/../x");
    }

    #[test]
    fn parse_requires_scheme() {
        assert!(Iri::parse("//example.com/foo").is_err());
        assert!(Iri::parse("foo/bar").is_err());
        assert!(Iri::parse("http://example.com/ bar").is_err());
    }

    #[test]
    fn components() {
        let iri = Iri::parse("urn:isbn:0451450523").unwrap();
        assert_eq!(iri.scheme(), "urn");
        assert_eq!(iri.authority(), None);
        assert_eq!(iri.path(), "isbn:0451450523");

        let iri = Iri::parse("http://example.com").unwrap();
        assert_eq!(iri.authority(), Some("example.com"));
        assert_eq!(iri.path(), "");
    }

    #[test]
    fn resolve_against_empty_path_base() {
        let base = Iri::parse("http://example.com").unwrap();
        assert_eq!(base.resolve("foo").unwrap().as_str(), "http://example.com/foo");
    }

    fn assert_relativize_round_trip(base: &str, target: &str) {
        let base = Iri::parse(base).unwrap();
        let target = Iri::parse(target).unwrap();
        let reference = base.relativize(&target);
        assert_eq!(
            base.resolve(&reference).unwrap().as_str(),
            target.as_str(),
            "resolve({}, {reference:?})",
            base.as_str()
        );
    }

    #[test]
    fn relativize_shortest_forms() {
        let base = Iri::parse(BASE).unwrap();
        let rel = |target: &str| base.relativize(&Iri::parse(target).unwrap());
        assert_eq!(rel("http://a/b/c/g"), "g");
        assert_eq!(rel("http://a/b/g"), "../g");
        assert_eq!(rel("http://a/g"), "/g");
        assert_eq!(rel("http://a/b/c/d;p?q"), "");
        assert_eq!(rel("http://a/b/c/d;p?q#s"), "#s");
        assert_eq!(rel("http://a/b/c/d;p?y"), "?y");
        assert_eq!(rel("http://a/b/c/d;p"), "d;p");
        assert_eq!(rel("http://g/x"), "//g/x");
        assert_eq!(rel("ftp://a/b"), "ftp://a/b");
    }

    #[test]
    fn relativize_round_trips() {
        for target in [
            "http://a/b/c/g",
            "http://a/b/c/g/",
            "http://a/b/c/d;p",
            "http://a/b/c/d;p?y",
            "http://a/b/c/d;p?q#s",
            "http://a/b/g?y#s",
            "http://a/g",
            "http://a/",
            "http://a/b/c/",
            "http://g",
            "https://a/b/c/d;p",
            "http://a/x:y/z",
        ] {
            assert_relativize_round_trip(BASE, target);
        }
        assert_relativize_round_trip("http://example.com", "http://example.com/foo");
        assert_relativize_round_trip("urn:isbn:0451450523", "urn:isbn:0451450524");
    }
}
