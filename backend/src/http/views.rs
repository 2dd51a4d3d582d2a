//! Server-rendered HTML pages.
//!
//! Pages are plain `format!` templates sharing one layout with the search
//! forms. Every value taken from the catalog or the request goes through
//! [`escape`].

use axum::response::Html;

use crate::models::{DatasetCounts, GeneDetail, HistogramData, TfReport};

/// Escape text for HTML element content and attribute values.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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

/// Percent-encode a path segment for links.
fn path_segment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for b in raw.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<nav>
  <a href="/">Home</a> | <a href="/jbrowse">Genome browser</a>
  <form action="/search/gene" method="get" style="display:inline">
    <input name="searchterm" placeholder="Gene (Entrez id or synonym)" data-complete="/gene_completions">
    <button type="submit">Find gene</button>
  </form>
  <form action="/search/tf" method="get" style="display:inline">
    <input name="searchterm" placeholder="Transcription factor" data-complete="/tf_completions">
    <button type="submit">Find TF</button>
  </form>
</nav>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
        body = body,
    ))
}

pub fn index_page(counts: &DatasetCounts, username: &str) -> Html<String> {
    let body = format!(
        r#"<h1>TFBS browser</h1>
<p>Signed in as <strong>{user}</strong>.</p>
<table>
  <tr><th>Genes</th><td>{genes}</td></tr>
  <tr><th>Motifs</th><td>{motifs}</td></tr>
  <tr><th>Binding sites</th><td>{sites}</td></tr>
</table>"#,
        user = escape(username),
        genes = counts.genes,
        motifs = counts.motifs,
        sites = counts.binding_sites,
    );
    layout("TFBS browser", &body)
}

pub fn jbrowse_page() -> Html<String> {
    layout(
        "Genome browser",
        r#"<h1>Genome browser</h1>
<div id="GenomeBrowser" style="height: 600px; width: 100%"></div>"#,
    )
}

/// Gene detail page. `detail` is `None` when the search matched nothing.
pub fn gene_page(term: &str, detail: Option<&GeneDetail>) -> Html<String> {
    let Some(detail) = detail else {
        let body = format!(
            r#"<h1>Gene not found</h1>
<p class="empty">No gene matches <code>{}</code>.</p>"#,
            escape(term)
        );
        return layout("Gene not found", &body);
    };

    let gene = &detail.gene;
    let mut rows = String::new();
    for site in &detail.binding_sites {
        rows.push_str(&format!(
            "  <tr><td><a href=\"/tf/{link}\">{motif}</a></td><td>{strand}</td><td>{start}-{stop}</td><td>{p:.6}</td><td><code>{seq}</code></td></tr>\n",
            link = path_segment(&site.motif_name),
            motif = escape(&site.motif_name),
            strand = site.strand,
            start = site.start,
            stop = site.stop,
            p = site.p_value,
            seq = escape(&site.match_sequence),
        ));
    }

    let sites = if detail.binding_sites.is_empty() {
        "<p class=\"empty\">No binding sites recorded for this gene.</p>".to_string()
    } else {
        format!(
            "<table>\n  <tr><th>Motif</th><th>Strand</th><th>Location</th><th>p-value</th><th>Match Sequence</th></tr>\n{rows}</table>"
        )
    };

    let body = format!(
        r#"<h1>Gene {name}</h1>
<dl>
  <dt>Entrez id</dt><dd>{entrez}</dd>
  <dt>Synonyms</dt><dd>{synonyms}</dd>
  <dt>Chromosome</dt><dd>{chrom}</dd>
  <dt>Strand</dt><dd>{strand}</dd>
  <dt>TSS</dt><dd>{tss}</dd>
  <dt>Promoter</dt><dd>{sp}-{ep}</dd>
</dl>
<h2>Binding sites</h2>
<p><a href="/genetfbs_csv/{link}">Download TSV</a></p>
{sites}"#,
        name = escape(&gene.name),
        entrez = gene.entrez_id,
        synonyms = escape(&detail.synonyms.join(", ")),
        chrom = escape(&gene.chromosome),
        strand = gene.strand,
        tss = gene.tss,
        sp = gene.start_promoter,
        ep = gene.stop_promoter,
        link = path_segment(&gene.name),
        sites = sites,
    );
    layout(&format!("Gene {}", gene.name), &body)
}

/// Serialize the histogram for an inline `<script>` block.
fn histogram_json(histogram: &HistogramData) -> String {
    serde_json::to_string(histogram)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/")
}

/// Transcription-factor page with the distance histogram.
pub fn tf_page(report: &TfReport) -> Html<String> {
    let Some(motif) = &report.motif else {
        let body = format!(
            r#"<h1>Transcription factor not found</h1>
<p class="empty">No motif is named <code>{}</code>.</p>"#,
            escape(&report.tfname)
        );
        return layout("Transcription factor not found", &body);
    };

    let histogram = &report.histogram;
    let summary = if histogram.is_empty() {
        "<p class=\"empty\">No binding sites within 8 kb of the promoter.</p>".to_string()
    } else {
        format!(
            "<p>{} binding sites between {} and {} bp.</p>",
            histogram.data.len(),
            histogram.minval,
            histogram.maxval
        )
    };

    let body = format!(
        r#"<h1>{name}</h1>
<p><a href="/tfgenes_csv/{link}">Download bound genes (TSV)</a></p>
{summary}
<div id="histogram" data-buckets="{buckets}"></div>
<script type="application/json" id="histogram-data">{json}</script>"#,
        name = escape(&motif.name),
        link = path_segment(&motif.name),
        summary = summary,
        buckets = histogram.num_buckets,
        json = histogram_json(histogram),
    );
    layout(&motif.name, &body)
}
