// HTML listing of the latest rendered charts
use crate::application::render_service::{RenderReport, SiteOutcome};
use chrono::NaiveDate;
use std::fmt::Write;

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Page for `date` listing which sites produced a chart and which had none.
/// Before the first refresh finishes there is no report yet.
pub fn render_listing(date: NaiveDate, report: Option<&RenderReport>) -> String {
    let day = date.format("%Y-%m-%d");
    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>Sensor charts {day}</title></head><body>\n<h1>Sensor charts for {day}</h1>\n"
    );

    let Some(report) = report.filter(|r| r.date == date) else {
        html.push_str("<p>Charts are being generated, check back shortly.</p>\n</body></html>\n");
        return html;
    };

    html.push_str("<h2>Charts</h2>\n");
    let mut any = false;
    for (suffix, file_name) in report.rendered() {
        any = true;
        let _ = write!(
            html,
            "<section><h3>{}</h3><a href=\"/charts/{file}\"><img src=\"/charts/{file}\" alt=\"{}\" width=\"750\"></a></section>\n",
            escape(suffix),
            escape(suffix),
            file = escape(file_name),
        );
    }
    if !any {
        html.push_str("<p>No charts for this day.</p>\n");
    }

    let missing: Vec<_> = report.missing().collect();
    if !missing.is_empty() {
        html.push_str("<h2>No data</h2>\n<ul>\n");
        for site in missing {
            let detail = match &site.outcome {
                SiteOutcome::Failed { .. } => " (render failed)",
                _ => "",
            };
            let _ = writeln!(html, "<li>{}{}</li>", escape(&site.suffix), detail);
        }
        html.push_str("</ul>\n");
    }

    html.push_str("</body></html>\n");
    html
}
