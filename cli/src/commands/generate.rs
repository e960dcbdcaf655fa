//! Generate and copy commands

use std::path::PathBuf;

use colored::Colorize;
use leadform_core::FormGenerator;
use serde::Serialize;

use super::{ApiClient, FormFile};
use crate::clipboard::{ClipboardExporter, CopyPath};
use crate::config::Config;
use crate::output::OutputFormat;
use crate::FormSource;

/// Document metadata printed for `--format json|yaml`
#[derive(Debug, Serialize)]
struct DocumentSummary<'a> {
    wrapper_id: Option<&'a str>,
    total_steps: Option<u32>,
    bytes: usize,
    output: Option<String>,
}

struct Rendered {
    wrapper_id: Option<String>,
    total_steps: Option<u32>,
    html: String,
}

/// Local files are generated in-process; saved forms are rendered by the API
async fn render(source: FormSource, settings: &Config, client: &ApiClient) -> anyhow::Result<Rendered> {
    match (source.file, source.id) {
        (Some(path), _) => {
            let form = FormFile::load(&path).await?;
            let generator = FormGenerator::new(settings.connection()?)?;
            let doc = generator.generate(&form.service, &form.config)?;
            Ok(Rendered {
                wrapper_id: Some(doc.wrapper_id.to_string()),
                total_steps: Some(doc.total_steps),
                html: doc.html,
            })
        }
        (None, Some(id)) => Ok(Rendered {
            wrapper_id: None,
            total_steps: None,
            html: client.get_text(&format!("/forms/{}/document", id)).await?,
        }),
        (None, None) => anyhow::bail!("either --file or --id is required"),
    }
}

pub async fn generate(
    source: FormSource,
    output: Option<PathBuf>,
    settings: &Config,
    client: &ApiClient,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let rendered = render(source, settings, client).await?;

    if let Some(path) = &output {
        tokio::fs::write(path, &rendered.html).await?;
    }

    match (format, &output) {
        (OutputFormat::Table, None) => print!("{}", rendered.html),
        (OutputFormat::Table, Some(path)) => println!(
            "{} Wrote {} ({} bytes)",
            "✓".green(),
            path.display().to_string().bold(),
            rendered.html.len()
        ),
        (format, _) => format.print(&DocumentSummary {
            wrapper_id: rendered.wrapper_id.as_deref(),
            total_steps: rendered.total_steps,
            bytes: rendered.html.len(),
            output: output.as_ref().map(|p| p.display().to_string()),
        })?,
    }
    Ok(())
}

pub async fn copy(source: FormSource, settings: &Config, client: &ApiClient) -> anyhow::Result<()> {
    let rendered = render(source, settings, client).await?;
    let exporter = ClipboardExporter::system();

    match exporter.export(&rendered.html).await? {
        CopyPath::Primary => println!("{} Form copied to clipboard", "✓".green()),
        CopyPath::Fallback => println!(
            "{} Form sent to the clipboard through the {}",
            "✓".yellow(),
            exporter.fallback_name()
        ),
    }
    Ok(())
}
