//! Parsing a IIIF request path into a [`Command`].
//!
//! A request path (no scheme, host or prefix) looks like
//!
//! ```text
//! path%2Fto%2Fimage.jp2/full/512,/270/default.jpg
//! └────── id ─────────┘ │    │    │   │       └ format
//!                       │    │    │   └ quality
//!                       │    │    └ rotation
//!                       │    └ size
//!                       └ region
//! ```
//!
//! or `{id}/info.json`. The path is tokenized from the right: the id is
//! whatever is left after the four operation segments have been popped, so
//! an id may contain anything, including unescaped slashes.

use super::{Format, Id, Quality, Region, Rotation, Size};
use std::fmt;
use thiserror::Error;

const INFO_SUFFIX: &str = "info.json";

/// One reason a command is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Problem {
    EmptyId,
    InvalidRegion,
    InvalidSize,
    InvalidRotation,
    InvalidQuality,
    InvalidFormat,
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Problem::EmptyId => "empty id",
            Problem::InvalidRegion => "invalid region",
            Problem::InvalidSize => "invalid size",
            Problem::InvalidRotation => "invalid rotation",
            Problem::InvalidQuality => "invalid quality",
            Problem::InvalidFormat => "invalid format",
        })
    }
}

fn describe(problems: &[Problem]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Error, Debug)]
pub enum CommandError {
    /// The path had the right shape but some parts are bad. Everything that
    /// could be extracted is kept in `command`.
    #[error("{}", describe(.problems))]
    Invalid {
        command: Box<Command>,
        problems: Vec<Problem>,
    },
    /// The path is just an identifier; clients are sent to its info.json.
    #[error("base URI for {id} must redirect to its info.json")]
    RedirectToInfo { id: Id },
}

impl CommandError {
    /// HTTP status a server should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            CommandError::Invalid { .. } => 400,
            CommandError::RedirectToInfo { .. } => 303,
        }
    }
}

/// A parsed IIIF request.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    /// The raw path this command was parsed from.
    pub path: String,
    pub id: Id,
    pub region: Region,
    pub size: Size,
    /// `None` when the rotation segment was missing or unparseable.
    pub rotation: Option<Rotation>,
    pub quality: Quality,
    pub format: Format,
    /// True for `{id}/info.json`; the operation fields are unset then.
    pub info: bool,
}

/// Pops `/`-delimited segments off the right end of a path.
struct Segments<'a> {
    rest: &'a str,
}

impl<'a> Segments<'a> {
    fn pop(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        match self.rest.rsplit_once('/') {
            Some((left, last)) => {
                self.rest = left;
                Some(last)
            }
            None => Some(std::mem::take(&mut self.rest)),
        }
    }
}

/// The escaped id of an info request: a single id segment followed by an
/// `info.json` segment, or a bare `info.json`.
fn info_base(path: &str) -> Option<&str> {
    match path.rsplit_once('/') {
        Some((base, INFO_SUFFIX)) if !base.contains('/') => Some(base),
        None if path == INFO_SUFFIX => Some(""),
        _ => None,
    }
}

impl Command {
    fn empty(path: &str) -> Self {
        Command {
            path: path.to_string(),
            id: Id::default(),
            region: Region::None,
            size: Size::None,
            rotation: None,
            quality: Quality::Unknown,
            format: Format::Unknown,
            info: false,
        }
    }

    /// Parse a request path.
    ///
    /// Info requests only need a non-empty id. Image requests return
    /// [`CommandError::Invalid`] listing every bad part, and a bare
    /// identifier returns [`CommandError::RedirectToInfo`].
    pub fn parse(path: &str) -> Result<Self, CommandError> {
        let trimmed = path.strip_prefix('/').unwrap_or(path);
        let mut command = Command::empty(path);

        if let Some(base) = info_base(trimmed) {
            command.info = true;
            command.id = Id::from_url(base);
            if command.id.is_empty() {
                return Err(CommandError::Invalid {
                    command: Box::new(command),
                    problems: vec![Problem::EmptyId],
                });
            }
            return Ok(command);
        }

        if !trimmed.is_empty() && !trimmed.contains('/') {
            return Err(CommandError::RedirectToInfo {
                id: Id::from_url(trimmed),
            });
        }

        let mut segments = Segments { rest: trimmed };
        if let Some(quality_format) = segments.pop() {
            let (quality, format) = match quality_format.rsplit_once('.') {
                Some((q, f)) => (Quality::parse(q), Format::parse(f)),
                None => (Quality::parse(quality_format), Format::Unknown),
            };
            command.quality = quality;
            command.format = format;
        }
        command.rotation = segments.pop().and_then(Rotation::parse);
        command.size = segments.pop().map_or(Size::None, Size::parse);
        command.region = segments.pop().map_or(Region::None, Region::parse);
        command.id = Id::from_url(segments.rest);

        let problems = command.problems();
        if problems.is_empty() {
            Ok(command)
        } else {
            Err(CommandError::Invalid {
                command: Box::new(command),
                problems,
            })
        }
    }

    /// Every reason this command is invalid, in path order.
    pub fn problems(&self) -> Vec<Problem> {
        let mut problems = Vec::new();
        if self.id.is_empty() {
            problems.push(Problem::EmptyId);
        }
        if self.info {
            return problems;
        }
        if !self.region.valid() {
            problems.push(Problem::InvalidRegion);
        }
        if !self.size.valid() {
            problems.push(Problem::InvalidSize);
        }
        if !self.rotation.is_some_and(|r| r.valid()) {
            problems.push(Problem::InvalidRotation);
        }
        if !self.quality.valid() {
            problems.push(Problem::InvalidQuality);
        }
        if !self.format.valid() {
            problems.push(Problem::InvalidFormat);
        }
        problems
    }

    pub fn valid(&self) -> bool {
        self.problems().is_empty()
    }

    /// The problems joined for display, e.g. `invalid region, invalid format`.
    pub fn problem_summary(&self) -> String {
        describe(&self.problems())
    }

    /// Rotation to apply, treating a missing one as none at all.
    pub fn rotation_or_default(&self) -> Rotation {
        self.rotation.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEIRD_ID: &str = "identifier-foo-bar/baz,,,,,chameleon";

    fn weird_path(rest: &str) -> String {
        format!("{}/{}", Id::new(WEIRD_ID).escaped(), rest)
    }

    #[test]
    fn simple_request() {
        let c = Command::parse("id/full/full/0/default.jpg").unwrap();
        assert_eq!(c.id.as_str(), "id");
        assert_eq!(c.region, Region::Full);
        assert_eq!(c.size, Size::Full);
        assert_eq!(
            c.rotation,
            Some(Rotation {
                mirror: false,
                degrees: 0.0
            })
        );
        assert_eq!(c.quality, Quality::Default);
        assert_eq!(c.format, Format::Jpg);
        assert!(!c.info);
        assert!(c.valid());
    }

    #[test]
    fn escaped_id_with_commas() {
        let c = Command::parse("id%2Fwith%2Fslash,,,,,x/full/full/30/default.jpg").unwrap();
        assert_eq!(c.id.as_str(), "id/with/slash,,,,,x");
        assert_eq!(c.rotation.unwrap().degrees, 30.0);
        assert!(c.valid());
    }

    #[test]
    fn weird_id_round_trips() {
        let c = Command::parse(&weird_path("full/full/30/default.jpg")).unwrap();
        assert_eq!(c.id.as_str(), WEIRD_ID);
        assert_eq!(c.region, Region::Full);
        assert_eq!(c.size, Size::Full);
        assert_eq!(c.format, Format::Jpg);
    }

    #[test]
    fn unescaped_slashes_stay_in_the_id() {
        let c = Command::parse("a/b/c.jp2/10,10,80,80/!50,50/!90/gray.png").unwrap();
        assert_eq!(c.id.as_str(), "a/b/c.jp2");
        assert!(matches!(c.region, Region::Pixel { .. }));
        assert_eq!(c.size, Size::BestFit { w: 50, h: 50 });
        assert!(c.rotation.unwrap().mirror);
        assert_eq!(c.quality, Quality::Gray);
        assert_eq!(c.format, Format::Png);
    }

    #[test]
    fn leading_slash_is_ignored() {
        let c = Command::parse("/id/full/max/0/default.jpg").unwrap();
        assert_eq!(c.id.as_str(), "id");
        assert_eq!(c.size, Size::Max);
    }

    #[test]
    fn invalid_request_reports_every_problem_and_keeps_data() {
        let err = Command::parse(&weird_path("bad/full/30/default.foo")).unwrap_err();
        assert_eq!(err.to_string(), "invalid region, invalid format");
        assert_eq!(err.status_code(), 400);

        let CommandError::Invalid { command, problems } = err else {
            panic!("expected an invalid command");
        };
        assert_eq!(problems, vec![Problem::InvalidRegion, Problem::InvalidFormat]);
        assert!(!command.valid());
        assert_eq!(command.id.as_str(), WEIRD_ID);
        assert_eq!(command.region, Region::None);
        assert_eq!(command.size, Size::Full);
        assert_eq!(command.rotation.unwrap().degrees, 30.0);
        assert!(!command.rotation.unwrap().mirror);
        assert_eq!(command.quality, Quality::Default);
        assert_eq!(command.format, Format::Unknown);
        assert!(!command.info);
    }

    #[test]
    fn missing_segments_are_invalid() {
        let err = Command::parse("id/full/0/default.jpg").unwrap_err();
        // "full" lands in size, "id" in region, nothing is left for the id
        assert_eq!(err.to_string(), "empty id, invalid region");
    }

    #[test]
    fn quality_without_format() {
        let err = Command::parse("id/full/full/0/default").unwrap_err();
        assert_eq!(err.to_string(), "invalid format");
    }

    #[test]
    fn quality_format_splits_on_last_dot() {
        let err = Command::parse("id/full/full/0/default.tar.gz").unwrap_err();
        assert_eq!(err.to_string(), "invalid quality, invalid format");
    }

    #[test]
    fn bad_rotation() {
        let err = Command::parse("id/full/full/abc/default.jpg").unwrap_err();
        assert_eq!(err.to_string(), "invalid rotation");
        let err = Command::parse("id/full/full/400/default.jpg").unwrap_err();
        assert_eq!(err.to_string(), "invalid rotation");
    }

    #[test]
    fn info_request() {
        let c = Command::parse("some%2Fvalid%2Fpath.jp2/info.json").unwrap();
        assert_eq!(c.id.as_str(), "some/valid/path.jp2");
        assert!(c.info);
        assert!(c.valid());
    }

    #[test]
    fn info_request_without_id() {
        let err = Command::parse("info.json").unwrap_err();
        assert_eq!(err.to_string(), "empty id");
    }

    #[test]
    fn info_suffix_must_be_its_own_segment() {
        let err = Command::parse("myinfo.json").unwrap_err();
        assert!(matches!(
            err,
            CommandError::RedirectToInfo { ref id } if id.as_str() == "myinfo.json"
        ));

        let err = Command::parse("id/myinfo.json").unwrap_err();
        assert!(matches!(err, CommandError::Invalid { ref command, .. } if !command.info));
    }

    #[test]
    fn info_json_in_the_quality_slot_is_an_image_request() {
        let err = Command::parse("id/full/full/0/info.json").unwrap_err();
        assert_eq!(err.to_string(), "invalid quality, invalid format");
        let CommandError::Invalid { command, .. } = err else {
            panic!("expected an invalid command");
        };
        assert!(!command.info);
        assert_eq!(command.id.as_str(), "id");
    }

    #[test]
    fn bare_identifier_redirects() {
        let err = Command::parse("some%2Fvalid%2Fpath.jp2").unwrap_err();
        assert_eq!(err.status_code(), 303);
        assert!(matches!(
            err,
            CommandError::RedirectToInfo { ref id } if id.as_str() == "some/valid/path.jp2"
        ));
    }

    #[test]
    fn empty_path_is_invalid_not_a_redirect() {
        let err = Command::parse("").unwrap_err();
        assert_eq!(
            err.to_string(),
            "empty id, invalid region, invalid size, invalid rotation, invalid quality, invalid format"
        );
    }

    #[test]
    fn native_quality_is_accepted() {
        let c = Command::parse("id/full/full/0/native.jpg").unwrap();
        assert_eq!(c.quality, Quality::Native);
    }
}
