//! CLI output formatting for every command.
//!
//! # Output Format
//!
//! ## jp2info
//!
//! ```text
//! scans/page-001.jp2: dim:800x400 tiles:256x256 levels:5 RGB
//! scans/broken.jp2: Error: unknown file format
//! ```
//!
//! With `--raw` the header follows as pretty JSON instead of the summary.
//!
//! ## plan
//!
//! ```text
//! Request: id/square/!325,325/0/default.jpg
//!     Id: id
//!     Content-Type: image/jpeg
//!     Crop: 1675,0 650x650
//!     Output: 325x325
//!     Level: 1
//! ```
//!
//! Failed requests print their HTTP status and reason:
//!
//! ```text
//! Request: id/bad/full/0/default.foo
//!     Status: 400
//!     Error: invalid region, invalid format
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::iiif::Command;
use crate::imaging::RequestPlan;
use crate::jp2::{DecodePlan, Jp2Info, ScanError};
use std::path::Path;

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// One-line header summary, as `jp2info` prints it.
pub fn jp2_summary(info: &Jp2Info) -> String {
    format!(
        "dim:{}x{} tiles:{}x{} levels:{} {}",
        info.width,
        info.height,
        info.tile_width(),
        info.tile_height(),
        info.levels,
        info.color_space
    )
}

// ============================================================================
// jp2info
// ============================================================================

pub fn format_jp2info(path: &Path, result: &Result<Jp2Info, ScanError>, raw: bool) -> Vec<String> {
    let name = path.display();
    match result {
        Err(e) => vec![format!("{name}: Error: {e}")],
        Ok(info) if raw => {
            let json = serde_json::to_string_pretty(info).unwrap_or_else(|e| e.to_string());
            std::iter::once(format!("{name}:"))
                .chain(json.lines().map(|l| format!("{}{l}", indent(1))))
                .collect()
        }
        Ok(info) => vec![format!("{name}: {}", jp2_summary(info))],
    }
}

pub fn print_jp2info(path: &Path, result: &Result<Jp2Info, ScanError>, raw: bool) {
    for line in format_jp2info(path, result, raw) {
        println!("{}", line);
    }
}

// ============================================================================
// plan
// ============================================================================

/// What `plan` learned about a request before any error.
pub struct PlanReport<'a> {
    pub request: &'a str,
    pub command: Option<&'a Command>,
    pub plan: Option<&'a RequestPlan>,
    pub decode: Option<&'a DecodePlan>,
}

pub fn format_plan(report: &PlanReport<'_>) -> Vec<String> {
    let mut lines = vec![format!("Request: {}", report.request)];
    if let Some(command) = report.command {
        lines.push(format!("{}Id: {}", indent(1), command.id));
        lines.push(format!(
            "{}Content-Type: {}",
            indent(1),
            command.format.mime_type()
        ));
        if let Some(rotation) = command.rotation.filter(|r| r.mirror || r.degrees != 0.0) {
            let mirror = if rotation.mirror { "mirrored, " } else { "" };
            lines.push(format!(
                "{}Rotation: {mirror}{} degrees",
                indent(1),
                rotation.degrees
            ));
        }
    }
    if let Some(plan) = report.plan {
        lines.push(format!(
            "{}Crop: {},{} {}x{}",
            indent(1),
            plan.crop.min_x,
            plan.crop.min_y,
            plan.crop.width(),
            plan.crop.height()
        ));
        lines.push(format!("{}Output: {}x{}", indent(1), plan.width, plan.height));
    }
    if let Some(decode) = report.decode {
        lines.push(format!("{}Level: {}", indent(1), decode.level));
    }
    lines
}

pub fn format_error(status: u16, error: &dyn std::error::Error) -> Vec<String> {
    vec![
        format!("{}Status: {status}", indent(1)),
        format!("{}Error: {error}", indent(1)),
    ]
}

pub fn print_plan(report: &PlanReport<'_>) {
    for line in format_plan(report) {
        println!("{}", line);
    }
}

pub fn print_error(status: u16, error: &dyn std::error::Error) {
    for line in format_error(status, error) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::Rect;
    use crate::jp2::ColorSpace;

    fn sample() -> Jp2Info {
        Jp2Info {
            width: 800,
            height: 400,
            xtsiz: 256,
            ytsiz: 256,
            levels: 5,
            color_space: ColorSpace::Rgb,
            ..Jp2Info::default()
        }
    }

    #[test]
    fn summary_line() {
        assert_eq!(jp2_summary(&sample()), "dim:800x400 tiles:256x256 levels:5 RGB");
    }

    #[test]
    fn jp2info_line_per_file() {
        let lines = format_jp2info(Path::new("a.jp2"), &Ok(sample()), false);
        assert_eq!(lines, vec!["a.jp2: dim:800x400 tiles:256x256 levels:5 RGB"]);
    }

    #[test]
    fn jp2info_error() {
        let lines = format_jp2info(Path::new("b.jp2"), &Err(ScanError::UnknownFormat), false);
        assert_eq!(lines, vec!["b.jp2: Error: unknown file format"]);
    }

    #[test]
    fn jp2info_raw_is_indented_json() {
        let lines = format_jp2info(Path::new("a.jp2"), &Ok(sample()), true);
        assert_eq!(lines[0], "a.jp2:");
        assert_eq!(lines[1], "    {");
        assert!(lines.iter().any(|l| l == "      \"xtsiz\": 256,"));
        assert!(lines.iter().any(|l| l.contains("\"color_space\": \"RGB\"")));
    }

    #[test]
    fn plan_lines() {
        let command = Command::parse("id/square/!325,325/!90/default.jpg").unwrap();
        let plan = RequestPlan {
            crop: Rect::new(1675, 0, 2325, 650),
            width: 325,
            height: 325,
        };
        let decode = DecodePlan {
            crop: plan.crop,
            width: 325,
            height: 325,
            level: 1,
        };
        let lines = format_plan(&PlanReport {
            request: "id/square/!325,325/!90/default.jpg",
            command: Some(&command),
            plan: Some(&plan),
            decode: Some(&decode),
        });
        assert_eq!(
            lines,
            vec![
                "Request: id/square/!325,325/!90/default.jpg",
                "    Id: id",
                "    Content-Type: image/jpeg",
                "    Rotation: mirrored, 90 degrees",
                "    Crop: 1675,0 650x650",
                "    Output: 325x325",
                "    Level: 1",
            ]
        );
    }

    #[test]
    fn error_lines() {
        let err = Command::parse("id/bad/full/0/default.foo").unwrap_err();
        assert_eq!(
            format_error(err.status_code(), &err),
            vec!["    Status: 400", "    Error: invalid region, invalid format"]
        );
    }
}
