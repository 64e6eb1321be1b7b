//! Static HTML report writer.
//!
//! Produces a small browsable site:
//! - `index.html` - every record, hottest first
//! - `functions.html` / `passes.html` - summary tables
//! - one page per pass and one page per source file

use crate::aggregator::{
    all_records, group_by_line, group_by_source_file, rank_by_hotness, records_for_pass,
    render_message, summarize_functions, summarize_passes, MessageMarkup, PrecisionPolicy,
    RecordRef,
};
use crate::parser::{Location, MessageItem, Record, RecordKind, TranslationUnit};
use crate::utils::config::ImplLinkConfig;
use crate::utils::error::OutputError;
use log::{debug, info, warn};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const STYLE: &str = "body { font-family: sans-serif; }
table { border-collapse: collapse; }
td, th { border: 1px solid #ccc; padding: 2px 6px; vertical-align: top; }
pre { margin: 0; }
.success { background: #dfd; }
.failure { background: #fdd; }
.note { background: #eef; }
.scope { background: #eee; }
";

/// Summary of what the report writer produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportStats {
    pub pages_written: usize,
    pub records_ranked: usize,
}

/// HTML markup for messages; located items link to the source page
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlMarkup;

impl MessageMarkup for HtmlMarkup {
    fn text(&self, out: &mut String, text: &str) {
        out.push_str(&escape_html(text));
    }

    fn item(&self, out: &mut String, item: &MessageItem) {
        let _ = write!(out, "<code>{}</code>", escape_html(item.text()));
    }

    fn link(&self, out: &mut String, location: &Location, inner: &str) {
        let _ = write!(out, "<a href=\"{}\">{}</a>", url_from_location(location), inner);
    }
}

/// Page name for a source file
pub fn source_page_name(src_file: &str) -> String {
    format!("{}.html", src_file.replace('/', "|"))
}

/// Page name for a pass
///
/// Bytes other than ASCII alphanumerics and `-` are written as `_xx` (hex),
/// so distinct pass names never share a page.
pub fn pass_page_name(pass_name: &str) -> String {
    let mut safe = String::with_capacity(pass_name.len());
    for byte in pass_name.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            safe.push(char::from(byte));
        } else {
            let _ = write!(safe, "_{:02x}", byte);
        }
    }
    format!("pass-{}.html", safe)
}

/// Relative link to a line of a source page
pub fn url_from_location(loc: &Location) -> String {
    format!(
        "{}#line-{}",
        escape_html(&source_page_name(&loc.file)),
        loc.line
    )
}

/// Outcome used for colouring: a scope takes the outcome of its last child
pub fn effective_outcome(record: &Record) -> &RecordKind {
    match (&record.kind, record.children().last()) {
        (RecordKind::Scope, Some(last)) => effective_outcome(last),
        (kind, _) => kind,
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

/// Write the whole static report into `output_dir`
///
/// **Public** - main entry point for HTML output
pub fn write_static_report(
    units: &[TranslationUnit],
    policy: &PrecisionPolicy,
    links: &ImplLinkConfig,
    output_dir: impl AsRef<Path>,
) -> Result<ReportStats, OutputError> {
    let output_dir = output_dir.as_ref();
    info!("Writing HTML report to: {}", output_dir.display());

    if output_dir.exists() && !output_dir.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Not a directory: {}",
            output_dir.display()
        )));
    }
    fs::create_dir_all(output_dir)?;

    let mut stats = ReportStats::default();

    let ranked = rank_by_hotness(all_records(units), policy);
    stats.records_ranked = ranked.len();
    write_page(
        output_dir,
        "index.html",
        "Optimization records",
        &records_table(&ranked, policy, links),
    )?;
    stats.pages_written += 1;

    write_page(
        output_dir,
        "functions.html",
        "Functions",
        &functions_table(units, policy),
    )?;
    stats.pages_written += 1;

    let passes = summarize_passes(units);
    let mut body =
        String::from("<table>\n<tr><th>Pass</th><th>Top-level</th><th>Total</th></tr>\n");
    for pass in &passes {
        let name = match &pass.name {
            Some(name) => format!(
                "<a href=\"{}\">{}</a>",
                escape_html(&pass_page_name(name)),
                escape_html(name)
            ),
            None => escape_html(pass.display_name()),
        };
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            name, pass.top_level, pass.total
        );
    }
    body.push_str("</table>\n");
    write_page(output_dir, "passes.html", "Passes", &body)?;
    stats.pages_written += 1;

    for name in passes.iter().filter_map(|p| p.name.as_deref()) {
        let records = records_for_pass(units, name, policy);
        write_page(
            output_dir,
            &pass_page_name(name),
            &format!("Pass: {}", name),
            &records_table(&records, policy, links),
        )?;
        stats.pages_written += 1;
    }

    for (file, records) in group_by_source_file(units) {
        let body = source_file_body(&file, &records, policy, links);
        write_page(
            output_dir,
            &source_page_name(&file),
            &format!("Source: {}", file),
            &body,
        )?;
        stats.pages_written += 1;
    }

    info!(
        "HTML report written ({} pages, {} records)",
        stats.pages_written, stats.records_ranked
    );
    Ok(stats)
}

fn write_page(dir: &Path, name: &str, title: &str, body: &str) -> Result<(), OutputError> {
    let path = dir.join(name);
    debug!("Writing page {}", path.display());

    let title = escape_html(title);
    let html = format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <style>\n{style}</style>\n</head>\n<body>\n<h1>{title}</h1>\n\
         <p><a href=\"index.html\">Records</a> | <a href=\"functions.html\">Functions</a> | \
         <a href=\"passes.html\">Passes</a></p>\n{body}</body>\n</html>\n",
        style = STYLE
    );
    fs::write(&path, html)?;
    Ok(())
}

fn records_table(
    records: &[RecordRef<'_>],
    policy: &PrecisionPolicy,
    links: &ImplLinkConfig,
) -> String {
    let mut body = String::from(
        "<table>\n<tr><th>Hotness</th><th>Kind</th><th>Pass</th><th>Function</th>\
         <th>Location</th><th>Message</th><th>Inlining chain</th><th>Emitted by</th></tr>\n",
    );
    for r in records {
        body.push_str(&record_row(r, policy, links));
    }
    body.push_str("</table>\n");
    body
}

fn record_row(r: &RecordRef<'_>, policy: &PrecisionPolicy, links: &ImplLinkConfig) -> String {
    let record = r.record;

    let hotness = policy
        .hotness(record)
        .map(|v| v.to_string())
        .unwrap_or_default();

    let pass = r
        .pass()
        .map(|p| {
            format!(
                "<a href=\"{}\">{}</a>",
                escape_html(&pass_page_name(&p.name)),
                escape_html(&p.name)
            )
        })
        .unwrap_or_default();

    let location = record
        .location()
        .map(|loc| {
            format!(
                "<a href=\"{}\">{}</a>",
                url_from_location(loc),
                escape_html(&loc.to_string())
            )
        })
        .unwrap_or_default();

    let inlining = record
        .inlining_chain()
        .map(|chain| {
            chain
                .iter()
                .map(|node| escape_html(&node.fndecl))
                .collect::<Vec<_>>()
                .join(" &larr; ")
        })
        .unwrap_or_default();

    let emitted_by = record
        .impl_location()
        .map(|il| match il.browse_link(links) {
            Some(url) => format!(
                "<a href=\"{}\">{}</a>",
                escape_html(&url),
                escape_html(&il.to_string())
            ),
            None => escape_html(&il.to_string()),
        })
        .unwrap_or_default();

    format!(
        "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
         <td><pre>{}</pre></td><td>{}</td><td>{}</td></tr>\n",
        escape_html(effective_outcome(record).as_str()),
        hotness,
        escape_html(record.kind.as_str()),
        pass,
        escape_html(record.function.as_deref().unwrap_or("")),
        location,
        render_message(record, &HtmlMarkup),
        inlining,
        emitted_by
    )
}

fn functions_table(units: &[TranslationUnit], policy: &PrecisionPolicy) -> String {
    let mut body = String::from(
        "<table>\n<tr><th>Function</th><th>Hotness</th><th>Source file</th><th>Peak</th></tr>\n",
    );
    for f in summarize_functions(units, policy) {
        let source = f
            .source_file
            .as_deref()
            .map(|file| {
                format!(
                    "<a href=\"{}\">{}</a>",
                    escape_html(&source_page_name(file)),
                    escape_html(file)
                )
            })
            .unwrap_or_default();
        let peak = f
            .peak_location
            .as_ref()
            .map(|loc| {
                format!(
                    "<a href=\"{}\">{}</a>",
                    url_from_location(loc),
                    escape_html(&loc.to_string())
                )
            })
            .unwrap_or_default();
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&f.name),
            f.hotness.map(|h| h.to_string()).unwrap_or_default(),
            source,
            peak
        );
    }
    body.push_str("</table>\n");
    body
}

/// Source listing with each line's records shown below it
///
/// Falls back to records grouped by line when the file cannot be read.
fn source_file_body(
    file: &str,
    records: &[RecordRef<'_>],
    policy: &PrecisionPolicy,
    links: &ImplLinkConfig,
) -> String {
    let by_line = group_by_line(records);
    let mut body = String::new();

    match fs::read_to_string(file) {
        Ok(source) => {
            body.push_str("<table>\n");
            for (i, text) in source.lines().enumerate() {
                let line = (i + 1) as u32;
                let _ = writeln!(
                    body,
                    "<tr id=\"line-{0}\"><td>{0}</td><td><pre>{1}</pre></td></tr>",
                    line,
                    escape_html(text)
                );
                if let Some(line_records) = by_line.get(&line) {
                    let ranked = rank_by_hotness(line_records.clone(), policy);
                    let _ = writeln!(
                        body,
                        "<tr><td></td><td>{}</td></tr>",
                        records_table(&ranked, policy, links)
                    );
                }
            }
            body.push_str("</table>\n");

            // Records on lines the file does not have (stale or shortened source)
            let line_count = source.lines().count();
            let outside = by_line
                .iter()
                .filter(|(line, _)| **line == 0 || (**line as usize) > line_count);
            for (line, line_records) in outside {
                body.push_str(&line_section(*line, line_records, policy, links));
            }
        }
        Err(e) => {
            warn!("Cannot read source file {}: {}", file, e);
            for (line, line_records) in &by_line {
                body.push_str(&line_section(*line, line_records, policy, links));
            }
        }
    }

    body
}

fn line_section(
    line: u32,
    records: &[RecordRef<'_>],
    policy: &PrecisionPolicy,
    links: &ImplLinkConfig,
) -> String {
    let ranked = rank_by_hotness(records.to_vec(), policy);
    format!(
        "<h2 id=\"line-{0}\">Line {0}</h2>\n{1}",
        line,
        records_table(&ranked, policy, links)
    )
}
