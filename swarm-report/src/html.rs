//! HTML listing page: one table row per uploaded file.

use crate::error::{ReportError, Result};
use std::path::Path;
use swarm_sync::config::{PageSettings, SwarmSettings};
use swarm_sync::Manifest;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Everything the page needs besides the manifest
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    pub title: String,
    /// Inlined into a `<style>` block
    pub css: Option<String>,
    /// Inserted verbatim after the table
    pub footer: Option<String>,
    /// Prefix for reference links
    pub gateway_url: String,
}

impl PageContent {
    /// Read the stylesheet and footer files named in the settings
    pub fn load(page: &PageSettings, swarm: &SwarmSettings) -> Result<Self> {
        Ok(Self {
            title: page.title.clone(),
            css: page.css_path.as_deref().map(read_include).transpose()?,
            footer: page.footer_path.as_deref().map(read_include).transpose()?,
            gateway_url: swarm.gateway_url.clone(),
        })
    }
}

fn read_include(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| ReportError::Include {
        path: path.to_path_buf(),
        source,
    })
}

/// Render the listing page for every record that has a swarm reference
pub fn render_page(manifest: &Manifest, content: &PageContent) -> String {
    let mut html = vec![
        "<html>".to_string(),
        "<head>".to_string(),
        format!("<title>{}</title>", escape(&content.title)),
    ];

    if let Some(css) = &content.css {
        html.push(format!("<style>{}</style>", css));
    }

    html.push("</head>".to_string());
    html.push("<body>".to_string());
    html.push("<table>".to_string());
    html.push(
        "<tr><th>File Name</th><th>Swarm Reference Hash</th><th>Size in MB</th></tr>".to_string(),
    );

    for record in manifest.records() {
        let Some(reference) = &record.swarm_hash else {
            continue;
        };
        html.push("<tr>".to_string());
        html.push(format!("<td>{}</td>", escape(&record.filename)));
        html.push(format!(
            "<td><a href=\"{}{}\">{}</a></td>",
            escape(&content.gateway_url),
            reference,
            reference
        ));
        html.push(format!("<td>{:.2}</td>", record.size as f64 / BYTES_PER_MB));
        html.push("</tr>".to_string());
    }

    html.push("</table>".to_string());

    if let Some(footer) = &content.footer {
        html.push(format!("<div>{}</div>", footer));
    }

    html.push("</body>".to_string());
    html.push("</html>".to_string());

    html.join("\n")
}

/// Render and write the page to `output`
pub fn write_page(manifest: &Manifest, content: &PageContent, output: &Path) -> Result<()> {
    std::fs::write(output, render_page(manifest, content))?;
    tracing::info!("Wrote HTML page for {} records to {}", manifest.len(), output.display());
    Ok(())
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
