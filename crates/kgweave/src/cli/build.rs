use std::path::Path;

use anyhow::{bail, Context, Result};
use kgweave_core::{to_json_ld, DocumentFormat, GraphBuilder, PipelineConfig};
use url::Url;

use super::print_json;

pub fn run(
    config: &PipelineConfig,
    file: &Path,
    domain: Option<&str>,
    url: Option<&str>,
    jsonld: bool,
) -> Result<()> {
    if !file.is_file() {
        bail!("file not found: {}", file.display());
    }

    let domain = resolve_domain(domain, url)?;
    let format = file
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(DocumentFormat::from_extension)
        .unwrap_or(DocumentFormat::PlainText);

    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let builder = GraphBuilder::new(config);
    let graph = builder.build_document(&domain, &raw, format, url.unwrap_or_default());

    eprintln!(
        "Built {}: {} entities, {} relationships, {} claims",
        domain,
        graph.metadata.entity_count,
        graph.metadata.relationship_count,
        graph.metadata.claim_count
    );

    if jsonld {
        print_json(&to_json_ld(&graph))
    } else {
        print_json(&graph)
    }
}

fn resolve_domain(domain: Option<&str>, url: Option<&str>) -> Result<String> {
    if let Some(domain) = domain {
        return Ok(domain.to_string());
    }
    let Some(url) = url else {
        bail!("either --domain or --url is required");
    };
    let parsed = Url::parse(url).with_context(|| format!("invalid url: {url}"))?;
    let Some(host) = parsed.host_str() else {
        bail!("url has no host: {url}");
    };
    Ok(host.trim_start_matches("www.").to_string())
}
