// Copyright (c) The cts-state Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rendering of the state table as a stacked-bar SVG chart.
//!
//! One horizontal bar, one segment per status in the canonical order, each
//! segment's width proportional to its share of the table and annotated with
//! its count. The emitted SVG uses `viewBox` coordinates and plain `<text>`
//! elements so the artifact stays editable and diffs cleanly.

use crate::errors::ChartError;
use camino::Utf8Path;
use cts_state_metadata::{StateTable, StatusCounts, SuiteStatus};
use std::fs;
use swrite::{swriteln, SWrite};

/// Overall drawing width, in viewBox units.
const CHART_WIDTH: f64 = 800.0;
/// Overall drawing height, in viewBox units.
const CHART_HEIGHT: f64 = 120.0;
/// Top edge of the bar.
const BAR_TOP: f64 = 34.0;
/// Height of the bar.
const BAR_HEIGHT: f64 = 44.0;
/// Baseline of the title text.
const TITLE_BASELINE: f64 = 20.0;
/// Top edge of the legend swatches.
const LEGEND_TOP: f64 = 96.0;
/// Side length of a legend swatch.
const LEGEND_SWATCH: f64 = 12.0;
/// Horizontal space allotted to each legend entry.
const LEGEND_STEP: f64 = 150.0;

/// The default chart title.
pub const DEFAULT_TITLE: &str = "spec conformance by number of CTS categories";

/// The fill color for a status segment.
pub fn status_color(status: SuiteStatus) -> &'static str {
    match status {
        SuiteStatus::Passed => "#4a0",
        SuiteStatus::RunFailed => "#fa0",
        SuiteStatus::BuildFailed => "#e44",
        SuiteStatus::NotApplicable => "#aaa",
    }
}

/// One segment of the stacked bar.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment {
    /// The status this segment stands for.
    pub status: SuiteStatus,

    /// The number of suites recorded with this status.
    pub count: usize,

    /// Left edge of the segment, in viewBox units.
    pub x: f64,

    /// Width of the segment, in viewBox units. Zero-count statuses have
    /// zero-width segments but are still present.
    pub width: f64,
}

/// The computed geometry of the stacked bar.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartLayout {
    segments: Vec<Segment>,
}

impl ChartLayout {
    /// Lays the counts out over a bar of the given width, one segment per
    /// status in [`SuiteStatus::ALL`] order.
    ///
    /// Returns `None` if the counts are all zero: an empty table has no
    /// denominator for the segment widths.
    pub fn compute(counts: StatusCounts, bar_width: f64) -> Option<Self> {
        let total = counts.total();
        if total == 0 {
            return None;
        }

        let mut segments = Vec::with_capacity(SuiteStatus::ALL.len());
        let mut x = 0.0;
        for status in SuiteStatus::ALL {
            let count = counts.get(status);
            let width = bar_width * count as f64 / total as f64;
            segments.push(Segment {
                status,
                count,
                x,
                width,
            });
            x += width;
        }
        Some(Self { segments })
    }

    /// The segments, in canonical status order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

/// Renders the chart for `table` as an SVG document string.
pub fn render_chart(table: &StateTable, title: &str) -> Result<String, ChartError> {
    let layout = ChartLayout::compute(table.counts(), CHART_WIDTH).ok_or_else(|| {
        ChartError::EmptyTable {
            path: table.path().to_owned(),
        }
    })?;

    let mut svg = String::new();
    swriteln!(svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    swriteln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {CHART_WIDTH} {CHART_HEIGHT}" width="{CHART_WIDTH}" height="{CHART_HEIGHT}" font-family="sans-serif">"#
    );
    swriteln!(
        svg,
        r#"  <text x="{:.2}" y="{TITLE_BASELINE}" text-anchor="middle" font-size="14">{}</text>"#,
        CHART_WIDTH / 2.0,
        xml_escape(title),
    );

    for segment in layout.segments() {
        swriteln!(
            svg,
            r#"  <rect x="{:.2}" y="{BAR_TOP}" width="{:.2}" height="{BAR_HEIGHT}" fill="{}"/>"#,
            segment.x,
            segment.width,
            status_color(segment.status),
        );
    }
    // Labels go on top of every rect, including the zero-width ones.
    for segment in layout.segments() {
        swriteln!(
            svg,
            r#"  <text x="{:.2}" y="{:.2}" text-anchor="middle" dominant-baseline="central" font-size="13" font-weight="bold">{}</text>"#,
            segment.x + segment.width / 2.0,
            BAR_TOP + BAR_HEIGHT / 2.0,
            segment.count,
        );
    }

    let legend_left = (CHART_WIDTH - LEGEND_STEP * SuiteStatus::ALL.len() as f64) / 2.0;
    for (index, status) in SuiteStatus::ALL.into_iter().enumerate() {
        let x = legend_left + LEGEND_STEP * index as f64;
        swriteln!(
            svg,
            r#"  <rect x="{x:.2}" y="{LEGEND_TOP}" width="{LEGEND_SWATCH}" height="{LEGEND_SWATCH}" fill="{}"/>"#,
            status_color(status),
        );
        swriteln!(
            svg,
            r#"  <text x="{:.2}" y="{:.2}" font-size="12">{status}</text>"#,
            x + LEGEND_SWATCH + 6.0,
            LEGEND_TOP + LEGEND_SWATCH - 2.0,
        );
    }
    swriteln!(svg, "</svg>");

    Ok(svg)
}

/// Renders the chart for `table` and writes it to `output`, replacing any
/// existing file.
pub fn write_chart(table: &StateTable, title: &str, output: &Utf8Path) -> Result<(), ChartError> {
    let svg = render_chart(table, title)?;
    fs::write(output, svg).map_err(|error| ChartError::Write {
        path: output.to_owned(),
        error,
    })
}

fn xml_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino_tempfile::Utf8TempDir;
    use pretty_assertions::assert_eq;

    fn table(contents: &str) -> StateTable {
        StateTable::parse(Utf8Path::new("ci/cts_state.csv"), contents).expect("valid table")
    }

    #[test]
    fn layout_is_proportional() {
        let counts = StatusCounts {
            passed: 3,
            run_failed: 1,
            build_failed: 0,
            not_applicable: 2,
        };
        let layout = ChartLayout::compute(counts, 600.0).expect("non-empty counts");

        let segments = layout.segments();
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[0].status, SuiteStatus::Passed);
        assert_eq!(segments[0].x, 0.0);
        assert_eq!(segments[0].width, 300.0);
        assert_eq!(segments[1].status, SuiteStatus::RunFailed);
        assert_eq!(segments[1].x, 300.0);
        assert_eq!(segments[1].width, 100.0);
        assert_eq!(segments[2].status, SuiteStatus::BuildFailed);
        assert_eq!(segments[2].x, 400.0);
        assert_eq!(segments[2].width, 0.0);
        assert_eq!(segments[3].status, SuiteStatus::NotApplicable);
        assert_eq!(segments[3].x, 400.0);
        assert_eq!(segments[3].width, 200.0);
    }

    #[test]
    fn layout_rejects_empty_counts() {
        assert_eq!(ChartLayout::compute(StatusCounts::default(), 600.0), None);
    }

    #[test]
    fn chart_has_all_segments_and_labels() {
        let table = table(indoc::indoc! {"
            suite;status
            atomic_ref;passed
            buffer;passed
            group_functions;passed
            hierarchical;run failed
            math_builtin_api;not applicable
            usm;not applicable
        "});
        let svg = render_chart(&table, DEFAULT_TITLE).expect("chart renders");

        // 3 passed, 1 run failed, 0 build failed, 2 not applicable.
        assert!(
            svg.contains(r##"<rect x="0.00" y="34" width="400.00" height="44" fill="#4a0"/>"##)
        );
        assert!(
            svg.contains(r##"<rect x="400.00" y="34" width="133.33" height="44" fill="#fa0"/>"##)
        );
        assert!(
            svg.contains(r##"<rect x="533.33" y="34" width="0.00" height="44" fill="#e44"/>"##)
        );
        assert!(
            svg.contains(r##"<rect x="533.33" y="34" width="266.67" height="44" fill="#aaa"/>"##)
        );

        // Counts are labeled, including the zero.
        assert!(svg.contains(r#"font-weight="bold">3</text>"#));
        assert!(svg.contains(r#"font-weight="bold">1</text>"#));
        assert!(svg.contains(r#"font-weight="bold">0</text>"#));
        assert!(svg.contains(r#"font-weight="bold">2</text>"#));

        // Title and one legend entry per status.
        assert!(svg.contains(">spec conformance by number of CTS categories</text>"));
        for status in SuiteStatus::ALL {
            assert!(svg.contains(&format!(">{status}</text>")));
        }
    }

    #[test]
    fn chart_escapes_title() {
        let table = table("suite;status\natomic_ref;passed\n");
        let svg = render_chart(&table, "conformance <&> \"beta\"").expect("chart renders");
        assert!(svg.contains(">conformance &lt;&amp;&gt; &quot;beta&quot;</text>"));
    }

    #[test]
    fn chart_of_single_status_spans_the_bar() {
        let table = table("suite;status\natomic_ref;passed\nbuffer;passed\n");
        let svg = render_chart(&table, DEFAULT_TITLE).expect("chart renders");
        assert!(
            svg.contains(r##"<rect x="0.00" y="34" width="800.00" height="44" fill="#4a0"/>"##)
        );
        assert!(
            svg.contains(r##"<rect x="800.00" y="34" width="0.00" height="44" fill="#fa0"/>"##)
        );
    }

    #[test]
    fn empty_table_is_an_error() {
        let table = table("suite;status\n");
        let err = render_chart(&table, DEFAULT_TITLE).unwrap_err();
        let ChartError::EmptyTable { path } = err else {
            panic!("unexpected error: {err:?}");
        };
        assert_eq!(path, Utf8Path::new("ci/cts_state.csv"));
    }

    #[test]
    fn write_chart_creates_the_file() {
        let dir = Utf8TempDir::new().expect("created temp dir");
        let output = dir.path().join("cts_state.svg");
        let table = table("suite;status\natomic_ref;passed\n");

        write_chart(&table, DEFAULT_TITLE, &output).expect("chart written");
        let written = std::fs::read_to_string(&output).expect("file exists");
        assert!(written.starts_with("<?xml"));
        assert!(written.ends_with("</svg>\n"));
    }

    #[test]
    fn write_chart_missing_parent_dir_is_an_error() {
        let dir = Utf8TempDir::new().expect("created temp dir");
        let output = dir.path().join("resources/cts_state.svg");
        let table = table("suite;status\natomic_ref;passed\n");

        let err = write_chart(&table, DEFAULT_TITLE, &output).unwrap_err();
        let ChartError::Write { path, .. } = err else {
            panic!("unexpected error: {err:?}");
        };
        assert_eq!(path, output);
    }
}
