//! HTML rendering: self-contained pages, no template engine.

use std::fmt::Write;

use super::content::{self, Section};
use super::ViewId;
use crate::assets::{ChartGallery, DatasetPage};
use crate::config;
use crate::prediction::fields::Domain;
use crate::prediction::{Field, Prediction, PredictionFields, ValidationError};

/// What to show under the prediction form.
#[derive(Debug)]
pub enum FormResult {
    Predicted(Prediction),
    Invalid(ValidationError),
    /// The model could not produce a usable answer.
    Failed,
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const STYLE: &str = r#"
*,*::before,*::after{box-sizing:border-box}
body{margin:0;font-family:'Segoe UI',sans-serif;background:#f0f2f6;color:#333;display:flex;min-height:100vh}
nav{width:240px;background:#d9e2f3;padding:20px 10px;flex-shrink:0}
nav h2{font-size:1.05rem;color:#003366;margin:0 0 16px}
nav form{margin:0}
nav button{display:block;width:100%;background:#004080;color:#fff;border:none;border-radius:12px;padding:12px 20px;margin-bottom:12px;font-size:16px;cursor:pointer;box-shadow:0 4px 8px rgba(0,0,0,.2)}
nav button:hover{background:#0059b3}
nav button.active{background:#0059b3;outline:3px solid #ffffff}
main{flex:1;padding:32px;max-width:1100px;font-size:17px;line-height:1.6}
h1,h2,h3{color:#003366;font-weight:600}
img.figure{border-radius:10px;border:3px solid #ccc;max-width:100%}
.caption{color:#666;font-size:.9rem}
.panel{background:#eaf2fb;padding:25px;border-radius:12px;box-shadow:0 2px 10px rgba(0,0,0,.1);margin-top:20px}
.panel label{display:block;font-weight:600;margin-top:12px}
.panel input,.panel select{width:100%;padding:8px;margin-top:4px;border-radius:6px;border:1px solid #bbb}
.hint{background:#e1ecf7;border-left:4px solid #4a90d9;padding:6px 10px;margin-top:6px;font-size:.9rem}
.submit{margin-top:20px;background:#004080;color:#fff;border:none;border-radius:12px;padding:12px 20px;font-size:16px;cursor:pointer}
.success{background:#dff5e1;border-left:5px solid #2e7d32;padding:12px}
.error{background:#fde2e1;border-left:5px solid #c62828;padding:12px}
.field-error{color:#c62828;font-size:.9rem}
.diag{font-family:monospace;font-size:.85rem;color:#555}
table{border-collapse:collapse;background:#fff;border-radius:10px;font-size:.85rem}
th,td{border:1px solid #ddd;padding:4px 8px;text-align:right}
th{background:#f5f7fa;position:sticky;top:0}
th.feature{background:#d9e2f3}
.pager{margin:12px 0;display:flex;gap:16px;align-items:center}
"#;

/// Wrap a view body in the shared layout with the navigation sidebar.
pub fn render_page(current: ViewId, body: &str) -> String {
    let mut nav = String::new();
    for view in ViewId::ALL {
        let class = if view == current { " class=\"active\"" } else { "" };
        let _ = write!(
            nav,
            r#"<form method="post" action="/view/{slug}"><button type="submit"{class}>{label}</button></form>"#,
            slug = view.slug(),
            label = view.label(),
        );
    }

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} · {app}</title>
<style>{style}</style>
</head>
<body>
<nav>
  <h2>Cardiovascular App Navigation</h2>
  {nav}
</nav>
<main>
{body}
<p class="caption">{app} v{version}</p>
</main>
</body>
</html>"##,
        title = current.label(),
        app = config::APP_NAME,
        version = config::APP_VERSION,
        style = STYLE,
        nav = nav,
        body = body,
    )
}

fn render_section(out: &mut String, section: &Section, heading_tag: &str) {
    let _ = write!(out, "<{heading_tag}>{}</{heading_tag}>", escape_html(section.heading));
    if !section.lead.is_empty() {
        let _ = write!(out, "<p>{}</p>", escape_html(section.lead));
    }
    if !section.bullets.is_empty() {
        out.push_str("<ul>");
        for bullet in section.bullets {
            let _ = write!(out, "<li>{}</li>", escape_html(bullet));
        }
        out.push_str("</ul>");
    }
    if !section.trailer.is_empty() {
        let _ = write!(out, "<p>{}</p>", escape_html(section.trailer));
    }
}

pub fn render_home() -> String {
    let mut out = format!("<h1>{}</h1>", content::HOME_TITLE);
    render_section(&mut out, &content::HOME_INTRO, "h2");
    let _ = write!(
        out,
        r#"<figure><img class="figure" src="/illustration.png" width="500" height="300" alt="{caption}"><figcaption class="caption">{caption}</figcaption></figure>"#,
        caption = crate::assets::images::ILLUSTRATION_CAPTION,
    );
    for section in content::HOME_SECTIONS {
        render_section(&mut out, section, "h2");
    }
    out
}

fn render_input(out: &mut String, field: Field, value: Option<&str>) {
    let key = field.key();
    let _ = write!(out, r#"<label for="{key}">{}</label>"#, escape_html(field.label()));
    match field.domain() {
        Domain::Range { min, max } => {
            let value = value.unwrap_or("0");
            let _ = write!(
                out,
                r#"<input type="number" id="{key}" name="{key}" min="{min}" max="{max}" step="1" value="{}" required>"#,
                escape_html(value),
            );
        }
        Domain::Codes(codes) => {
            let _ = write!(out, r#"<select id="{key}" name="{key}">"#);
            for (code, meaning) in codes {
                let code_text = code.to_string();
                let selected = if value == Some(code_text.as_str()) {
                    " selected"
                } else {
                    ""
                };
                let _ = write!(
                    out,
                    r#"<option value="{code}"{selected}>{code} ({meaning})</option>"#
                );
            }
            out.push_str("</select>");
        }
    }
    if let Some(hint) = content::field_hint(field) {
        let _ = write!(out, r#"<div class="hint">{}</div>"#, escape_html(hint));
    }
}

/// The Prediction view: the ten-field form plus the last result, if any.
pub fn render_prediction(fields: Option<&PredictionFields>, result: Option<&FormResult>) -> String {
    let mut out = String::from("<h1>Prediction</h1>");
    out.push_str(r#"<form class="panel" method="post" action="/predict">"#);
    for field in Field::ALL {
        let value = fields.and_then(|f| f.display_value(field));
        render_input(&mut out, field, value.as_deref());
        if let Some(FormResult::Invalid(err)) = result {
            if err.field == field {
                let _ = write!(
                    out,
                    r#"<div class="field-error">{}</div>"#,
                    escape_html(&err.reason.to_string())
                );
            }
        }
    }
    out.push_str(r#"<button class="submit" type="submit">Predict</button></form>"#);

    match result {
        Some(FormResult::Predicted(prediction)) => {
            let features: Vec<String> = prediction.features.iter().map(|v| v.to_string()).collect();
            let _ = write!(
                out,
                r#"<h2>Predicted Result</h2><div class="{class}">{message}</div><p class="diag">Input shape: ({rows}, {cols}) · Input: [{features}] · Prediction: [{label}]</p>"#,
                class = if prediction.outcome.is_risk() { "error" } else { "success" },
                message = escape_html(prediction.message),
                rows = prediction.input_shape[0],
                cols = prediction.input_shape[1],
                features = features.join(", "),
                label = prediction.label,
            );
        }
        Some(FormResult::Invalid(err)) => {
            let _ = write!(
                out,
                r#"<div class="error">Please correct {}: {}</div>"#,
                escape_html(err.field.label()),
                escape_html(&err.reason.to_string()),
            );
        }
        Some(FormResult::Failed) => {
            out.push_str(
                r#"<div class="error">The prediction could not be completed. Please try again later.</div>"#,
            );
        }
        None => {}
    }
    out
}

pub fn render_visualizations(charts: &ChartGallery) -> String {
    let mut out = String::from("<h1>Visualizations</h1><h2>Analysis</h2>");
    let _ = write!(out, "<p>{}</p>", escape_html(content::VISUALIZATIONS_INTRO));
    for (i, chart) in charts.iter().enumerate() {
        let _ = write!(
            out,
            r#"<h2>{title}</h2><img class="figure" src="/charts/{i}" alt="{title}">"#,
            title = escape_html(chart.title),
        );
    }
    out
}

/// The Data Overview view: one page of the historical table.
pub fn render_data_overview(page: &DatasetPage<'_>) -> String {
    let mut out = String::from("<h1>Data Overview</h1>");
    let first = if page.rows.is_empty() { 0 } else { page.offset + 1 };
    let _ = write!(
        out,
        r#"<div class="pager">{prev}<span>Rows {first}–{last} of {total}</span>{next}</div>"#,
        prev = if page.has_previous() {
            format!(
                r#"<a href="/?offset={}">&larr; Previous</a>"#,
                page.offset.saturating_sub(page.limit)
            )
        } else {
            String::new()
        },
        last = page.offset + page.rows.len(),
        total = page.total,
        next = if page.has_next() {
            format!(r#"<a href="/?offset={}">Next &rarr;</a>"#, page.offset + page.limit)
        } else {
            String::new()
        },
    );

    out.push_str("<table><thead><tr>");
    for (i, header) in page.headers.iter().enumerate() {
        // Model inputs are highlighted.
        let class = if page.feature_columns.contains(&i) { r#" class="feature""# } else { "" };
        let _ = write!(out, "<th{class}>{}</th>", escape_html(header));
    }
    out.push_str("</tr></thead><tbody>");
    for row in page.rows {
        out.push_str("<tr>");
        for cell in row {
            let _ = write!(out, "<td>{}</td>", escape_html(cell));
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table>");
    out
}

pub fn render_about() -> String {
    let mut out = format!("<h1>{}</h1>", content::ABOUT_TITLE);
    for section in content::ABOUT_SECTIONS {
        render_section(&mut out, section, "h3");
    }
    out
}
