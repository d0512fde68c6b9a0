//! # PDF Report Module
//!
//! Renders a [`BatchReport`] to a PDF document using Typst.
//!
//! ## Architecture
//!
//! - The Typst source is assembled from string fragments (no template files)
//! - Beam schematics and shear/moment diagrams are drawn with Typst
//!   primitives (`line`, `rect`, `polygon`) from the sampled result arrays
//! - User-provided text is inserted as Typst string literals, never as markup
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! ## Layout
//!
//! 1. Cover block with run summary (processed/rejected counts, beam table)
//! 2. One page per processed beam: schematic, data block, load table,
//!    reactions, shear diagram, moment diagram
//! 3. Summary of rejected beams (when any)
//! 4. Credits from the settings footer
//!
//! ## Example
//!
//! ```rust,no_run
//! use beam_core::batch::process_rows;
//! use beam_core::pdf::render_report_pdf;
//! use beam_core::settings::ReportSettings;
//! use beam_core::workbook::load_workbook;
//! use std::path::Path;
//!
//! let workbook = load_workbook(Path::new("vigas.json"))?;
//! let settings = ReportSettings::default();
//! let report = process_rows(&workbook.beam_rows()?, &settings);
//! let pdf_bytes = render_report_pdf(&report, &settings)?;
//! std::fs::write("Relatorio_Vigas.pdf", pdf_bytes).unwrap();
//! # Ok::<(), beam_core::errors::CalcError>(())
//! ```

use chrono::Utc;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::batch::{BatchReport, BeamFailure};
use crate::calculations::analysis::BeamAnalysis;
use crate::calculations::reactions::reaction_label;
use crate::errors::{CalcError, CalcResult};
use crate::settings::ReportSettings;

// ============================================================================
// Typst World Implementation
// ============================================================================

/// A minimal Typst world for compiling documents without external files.
struct PdfWorld {
    /// The main source document
    main: Source,
    /// Font book
    book: LazyHash<FontBook>,
    /// Available fonts
    fonts: Vec<Font>,
    /// Library (standard functions)
    library: LazyHash<Library>,
}

impl PdfWorld {
    fn new(source: String) -> Self {
        let fonts = Self::load_fonts();
        let book = FontBook::from_fonts(&fonts);

        PdfWorld {
            main: Source::detached(source),
            book: LazyHash::new(book),
            fonts,
            library: LazyHash::new(Library::default()),
        }
    }

    /// Fonts bundled with typst-assets (Libertinus Serif, New Computer Modern,
    /// DejaVu Sans Mono)
    fn load_fonts() -> Vec<Font> {
        let mut fonts = Vec::new();
        for font_bytes in typst_assets::fonts() {
            let buffer = Bytes::new(font_bytes.to_vec());
            for font in Font::iter(buffer) {
                fonts.push(font);
            }
        }
        fonts
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(
            now.format("%Y").to_string().parse().ok()?,
            now.format("%m").to_string().parse().ok()?,
            now.format("%d").to_string().parse().ok()?,
        )
    }
}

// ============================================================================
// Drawing Geometry
// ============================================================================

/// Drawing width for schematics and diagrams (pt)
const DRAW_WIDTH: f64 = 440.0;
/// Schematic height (pt)
const SCHEMATIC_HEIGHT: f64 = 120.0;
/// Diagram plot height (pt)
const DIAGRAM_HEIGHT: f64 = 110.0;
/// Most graduation ticks drawn under a schematic
const MAX_TICKS: f64 = 20.0;

const SHEAR_FILL: &str = "rgb(\"#cfe2ff\")";
const SHEAR_STROKE: &str = "rgb(\"#1f4e9c\")";
const MOMENT_FILL: &str = "rgb(\"#ffe0b3\")";
const MOMENT_STROKE: &str = "rgb(\"#d9730d\")";

fn pt(v: f64) -> String {
    format!("{:.2}pt", v)
}

/// Insert user text as a Typst string literal (rendered verbatim)
fn typst_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 3);
    out.push_str("#\"");
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Unit labels from settings, already escaped for markup
struct UnitLabels {
    length: String,
    force: String,
    moment: String,
    intensity: String,
}

impl UnitLabels {
    fn new(settings: &ReportSettings) -> Self {
        UnitLabels {
            length: typst_text(&settings.length_unit),
            force: typst_text(&settings.force_unit),
            moment: typst_text(&settings.moment_unit()),
            intensity: typst_text(&settings.intensity_unit()),
        }
    }
}

/// Compact number formatting for positions: 10 -> "10", 2.5 -> "2.5"
fn fmt_position(v: f64) -> String {
    format!("{}", (v * 1000.0).round() / 1000.0)
}

/// Tick spacing giving at most [`MAX_TICKS`] intervals over `length`
fn tick_step(length: f64) -> f64 {
    let mut magnitude = 10f64.powf((length / MAX_TICKS).log10().floor());
    loop {
        for factor in [1.0, 2.0, 5.0] {
            let step = factor * magnitude;
            if length / step <= MAX_TICKS {
                return step;
            }
        }
        magnitude *= 10.0;
    }
}

fn place(body: &str) -> String {
    format!("  #place(top + left, {})\n", body)
}

fn place_at(dx: f64, dy: f64, body: &str) -> String {
    format!("  #place(top + left, dx: {}, dy: {}, {})\n", pt(dx), pt(dy), body)
}

fn centered_label(x: f64, dy: f64, width: f64, content: &str) -> String {
    place_at(
        x - width / 2.0,
        dy,
        &format!("box(width: {}, align(center, {}))", pt(width), content),
    )
}

/// Beam bar, supports, loads and a graduated axis
fn schematic_typst(analysis: &BeamAnalysis, settings: &ReportSettings) -> String {
    let beam = &analysis.beam;
    let scale = DRAW_WIDTH / beam.length;
    let to_x = |x: f64| x * scale;
    let units = UnitLabels::new(settings);

    let beam_top = 56.0;
    let beam_bottom = 66.0;
    let mut out = format!("#box(width: {}, height: {})[\n", pt(DRAW_WIDTH), pt(SCHEMATIC_HEIGHT));

    // Distributed loads: shaded band with arrows, intensity label above
    for load in &beam.distributed_loads {
        let (x1, x2) = (to_x(load.start), to_x(load.end));
        out.push_str(&place_at(
            x1,
            36.0,
            &format!(
                "rect(width: {}, height: {}, fill: rgb(\"#0000ff33\"), stroke: none)",
                pt(x2 - x1),
                pt(20.0)
            ),
        ));
        let arrows = ((load.loaded_length() * 4.0) as usize + 2).min(40);
        for i in 0..arrows {
            let x = x1 + (x2 - x1) * i as f64 / (arrows - 1) as f64;
            out.push_str(&arrow(x, 36.0, beam_top, "blue", 0.6));
        }
        out.push_str(&centered_label(
            (x1 + x2) / 2.0,
            24.0,
            100.0,
            &format!(
                "text(size: 7pt, fill: blue, weight: \"bold\")[{:.2} {}]",
                load.intensity, units.intensity
            ),
        ));
    }

    // Point loads: red arrows, value label above
    for load in &beam.point_loads {
        let x = to_x(load.position);
        out.push_str(&arrow(x, 12.0, beam_top, "red", 1.5));
        out.push_str(&centered_label(
            x,
            0.0,
            80.0,
            &format!(
                "text(size: 7pt, fill: red, weight: \"bold\")[{:.2} {}]",
                load.magnitude, units.force
            ),
        ));
    }

    // Beam bar
    out.push_str(&place_at(
        0.0,
        beam_top,
        &format!(
            "rect(width: {}, height: {}, fill: luma(215), stroke: 1pt)",
            pt(DRAW_WIDTH),
            pt(beam_bottom - beam_top)
        ),
    ));

    // Supports: triangles under the beam
    for (i, &s) in beam.supports.iter().enumerate() {
        let x = to_x(s);
        out.push_str(&place(&format!(
            "polygon(fill: black, ({}, {}), ({}, {}), ({}, {}))",
            pt(x),
            pt(beam_bottom),
            pt(x - 7.0),
            pt(beam_bottom + 12.0),
            pt(x + 7.0),
            pt(beam_bottom + 12.0)
        )));
        out.push_str(&centered_label(
            x,
            beam_bottom + 14.0,
            60.0,
            &format!("text(size: 7pt)[Support {}]", i + 1),
        ));
    }

    // Graduated axis
    let axis_y = 104.0;
    out.push_str(&place(&format!(
        "line(start: (0pt, {}), end: ({}, {}), stroke: 0.6pt)",
        pt(axis_y),
        pt(DRAW_WIDTH),
        pt(axis_y)
    )));
    let step = tick_step(beam.length);
    let ticks = (beam.length / step + 1e-9).floor() as usize;
    for i in 0..=ticks {
        let value = step * i as f64;
        let x = to_x(value);
        out.push_str(&place(&format!(
            "line(start: ({}, {}), end: ({}, {}), stroke: 0.6pt)",
            pt(x),
            pt(axis_y - 3.0),
            pt(x),
            pt(axis_y + 3.0)
        )));
        out.push_str(&centered_label(
            x,
            axis_y + 5.0,
            40.0,
            &format!("text(size: 6pt)[{}{}]", fmt_position(value), units.length),
        ));
    }

    out.push_str("]\n");
    out
}

/// Vertical arrow pointing down from `top` to `tip`
fn arrow(x: f64, top: f64, tip: f64, color: &str, thickness: f64) -> String {
    let head = 5.0;
    let mut out = place(&format!(
        "line(start: ({}, {}), end: ({}, {}), stroke: {:.1}pt + {})",
        pt(x),
        pt(top),
        pt(x),
        pt(tip - head),
        thickness,
        color
    ));
    out.push_str(&place(&format!(
        "polygon(fill: {}, ({}, {}), ({}, {}), ({}, {}))",
        color,
        pt(x - 2.5),
        pt(tip - head),
        pt(x + 2.5),
        pt(tip - head),
        pt(x),
        pt(tip)
    )));
    out
}

/// Filled line diagram of `values` sampled at `positions`
fn diagram_typst(
    positions: &[f64],
    values: &[f64],
    length: f64,
    fill: &str,
    stroke: &str,
) -> String {
    let top = values.iter().copied().fold(0.0f64, f64::max);
    let bottom = values.iter().copied().fold(0.0f64, f64::min);
    let range = if top - bottom > 0.0 { top - bottom } else { 1.0 };

    let to_x = |x: f64| x / length * DRAW_WIDTH;
    let to_y = |v: f64| (top - v) / range * DIAGRAM_HEIGHT;
    let zero = to_y(0.0);

    let mut vertices = vec![format!("({}, {})", pt(0.0), pt(zero))];
    vertices.extend(
        positions
            .iter()
            .zip(values)
            .map(|(&x, &v)| format!("({}, {})", pt(to_x(x)), pt(to_y(v)))),
    );
    vertices.push(format!("({}, {})", pt(DRAW_WIDTH), pt(zero)));

    let mut out = format!("#box(width: {}, height: {})[\n", pt(DRAW_WIDTH), pt(DIAGRAM_HEIGHT));
    out.push_str(&place(&format!(
        "polygon(fill: {}, stroke: 0.8pt + {}, {})",
        fill,
        stroke,
        vertices.join(", ")
    )));
    out.push_str(&place(&format!(
        "line(start: (0pt, {}), end: ({}, {}), stroke: 0.7pt + black)",
        pt(zero),
        pt(DRAW_WIDTH),
        pt(zero)
    )));
    out.push_str("]\n");
    out
}

// ============================================================================
// Document Sections
// ============================================================================

fn preamble(settings: &ReportSettings, date: &str) -> String {
    format!(
        r##"
#set page(
  paper: "a4",
  margin: (top: 2cm, bottom: 2cm, left: 2cm, right: 2cm),
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr),
      align(left)[#text(size: 8pt)[{date}]],
      align(right)[#text(size: 8pt)[Page #counter(page).display()]],
    )
  ]
)

#set text(font: "Libertinus Serif", size: 11pt)

#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 14pt, radius: 4pt)[
    #text(size: 20pt, weight: "bold")[{title}]
  ]
]
"##,
        date = date,
        title = typst_text(&settings.title),
    )
}

fn summary_section(report: &BatchReport, settings: &ReportSettings) -> String {
    let units = UnitLabels::new(settings);
    let rows: Vec<String> = report
        .beams
        .iter()
        .map(|a| {
            format!(
                "  [{}], [{}], [{}], [{:.2}], [{}],",
                typst_text(&a.beam.id),
                a.beam.topology.display_name(),
                fmt_position(a.beam.length),
                a.total_load,
                a.reactions
                    .values()
                    .iter()
                    .map(|r| format!("{:.2}", r))
                    .collect::<Vec<_>>()
                    .join(" / ")
            )
        })
        .collect();

    let mut out = format!(
        "\n#v(8pt)\nBeams processed: *{}* #h(2em) Beams rejected: *{}*\n",
        report.processed_count(),
        report.failed_count()
    );

    if !rows.is_empty() {
        out.push_str(&format!(
            r##"
#v(8pt)
#table(
  columns: (auto, auto, auto, auto, 1fr),
  inset: 6pt,
  stroke: 0.5pt,
  align: (left, left, right, right, right),
  table.header([*ID*], [*Type*], [*L ({lu})*], [*Total load ({fu})*], [*Reactions ({fu})*]),
{rows}
)
"##,
            lu = units.length,
            fu = units.force,
            rows = rows.join("\n"),
        ));
    }
    out
}

fn beam_section(analysis: &BeamAnalysis, settings: &ReportSettings) -> String {
    let beam = &analysis.beam;
    let units = UnitLabels::new(settings);
    let fu = &units.force;
    let lu = &units.length;
    let mu = &units.moment;

    let mut out = String::from("\n#pagebreak()\n");
    out.push_str(&format!(
        "#align(center)[#text(size: 14pt, weight: \"bold\")[Report - Beam {}]]\n#v(6pt)\n",
        typst_text(&beam.id)
    ));
    out.push_str(&schematic_typst(analysis, settings));

    let supports = beam
        .supports
        .iter()
        .map(|s| fmt_position(*s))
        .collect::<Vec<_>>()
        .join(", ");

    out.push_str(&format!(
        r##"
#v(6pt)
#table(
  columns: (auto, 1fr),
  stroke: none,
  inset: 3pt,
  [Type:], [{topology}],
  [Length:], [{length} {lu}],
  [Supports:], [{supports} {lu}],
  [Total applied load:], [{total_load:.2} {fu}],
  [Total moment (about origin):], [{total_moment:.2} {mu}],
"##,
        topology = beam.topology.display_name(),
        length = fmt_position(beam.length),
        supports = supports,
        total_load = analysis.total_load,
        total_moment = analysis.total_moment_about_origin,
        lu = lu,
        fu = fu,
        mu = mu,
    ));
    for (i, r) in analysis.reactions.values().iter().enumerate() {
        out.push_str(&format!(
            "  [Reaction at support {} ({}):], [{:.2} {}],\n",
            i + 1,
            reaction_label(i),
            r,
            fu
        ));
    }
    out.push_str(")\n");

    if beam.load_count() > 0 {
        out.push_str(
            "\n#table(\n  columns: (auto, 1fr, auto),\n  inset: 5pt,\n  stroke: 0.5pt,\n  table.header([*Load*], [*Position*], [*Value*]),\n",
        );
        for p in &beam.point_loads {
            out.push_str(&format!(
                "  [Point], [x = {} {}], [{:.2} {}],\n",
                fmt_position(p.position),
                lu,
                p.magnitude,
                fu
            ));
        }
        for d in &beam.distributed_loads {
            out.push_str(&format!(
                "  [Distributed], [{} to {} {}], [{:.2} {}],\n",
                fmt_position(d.start),
                fmt_position(d.end),
                lu,
                d.intensity,
                units.intensity
            ));
        }
        out.push_str(")\n");
    }

    out.push_str(&format!(
        "\n#v(6pt)\n*Shear Force - {}* #h(1fr) #text(size: 8pt)[max |V| = {:.2} {} at x = {:.2} {}]\n\n",
        typst_text(&beam.id),
        analysis.max_abs_shear,
        fu,
        analysis.max_abs_shear_position,
        lu
    ));
    out.push_str(&diagram_typst(
        &analysis.positions,
        &analysis.shear,
        beam.length,
        SHEAR_FILL,
        SHEAR_STROKE,
    ));

    out.push_str(&format!(
        "\n#v(6pt)\n*Bending Moment - {}* #h(1fr) #text(size: 8pt)[max M = {:.2} {} at x = {:.2} {} #h(1em) min M = {:.2} {} at x = {:.2} {}]\n\n",
        typst_text(&beam.id),
        analysis.max_moment,
        mu,
        analysis.max_moment_position,
        lu,
        analysis.min_moment,
        mu,
        analysis.min_moment_position,
        lu
    ));
    out.push_str(&diagram_typst(
        &analysis.positions,
        &analysis.moment,
        beam.length,
        MOMENT_FILL,
        MOMENT_STROKE,
    ));
    out.push_str(&format!(
        "#align(center)[#text(size: 8pt)[Position ({})]]\n",
        lu
    ));

    out
}

fn failures_section(failures: &[BeamFailure]) -> String {
    let mut out = String::from(
        "\n#pagebreak()\n#align(center)[#text(size: 14pt, weight: \"bold\")[Summary of Beams with Input Errors]]\n#v(10pt)\n",
    );
    for failure in failures {
        out.push_str(&format!(
            "*Beam ID:* {} #h(1em) #text(size: 8pt, fill: gray)[line {}]\n\n#text(fill: rgb(220, 50, 50))[Error: {}]\n\n#v(4pt)\n",
            typst_text(&failure.id),
            failure.line,
            typst_text(&failure.reason)
        ));
    }
    out
}

fn credits_section(credits: &[String]) -> String {
    if credits.is_empty() {
        return String::new();
    }
    let mut out = String::from("\n#v(1fr)\n#text(size: 9pt, style: \"italic\")[\n  Developed by: \\\n");
    let lines: Vec<String> = credits.iter().map(|c| format!("  {}", typst_text(c))).collect();
    out.push_str(&lines.join(" \\\n"));
    out.push_str("\n]\n");
    out
}

// ============================================================================
// Public API
// ============================================================================

/// Build the Typst source for a report.
///
/// # Errors
///
/// * `EmptyInput` - the batch holds neither results nor failures
pub fn render_report_source(report: &BatchReport, settings: &ReportSettings) -> CalcResult<String> {
    report.ensure_not_empty()?;

    let date = Utc::now().format("%Y-%m-%d").to_string();
    let mut source = preamble(settings, &date);
    source.push_str(&summary_section(report, settings));

    for analysis in &report.beams {
        source.push_str(&beam_section(analysis, settings));
    }

    if !report.failures.is_empty() {
        source.push_str(&failures_section(&report.failures));
    }

    source.push_str(&credits_section(&settings.footer_credits));
    Ok(source)
}

/// Render a report to PDF bytes.
///
/// # Errors
///
/// * `EmptyInput` - nothing to report
/// * `ReportError` - Typst compilation or PDF export failed
pub fn render_report_pdf(report: &BatchReport, settings: &ReportSettings) -> CalcResult<Vec<u8>> {
    let source = render_report_source(report, settings)?;
    compile_pdf(source)
}

/// Compile Typst source to PDF bytes
fn compile_pdf(source: String) -> CalcResult<Vec<u8>> {
    let world = PdfWorld::new(source);
    let warned = typst::compile(&world);

    let document = warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::report_error("typst compilation", error_msgs.join("; "))
    })?;

    typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::report_error("pdf export", error_msgs.join("; "))
    })
}
