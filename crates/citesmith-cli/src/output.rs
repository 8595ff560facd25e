use std::io::Write;

use citesmith_bib::BibliographyParser;
use citesmith_core::Metadata;
use citesmith_index::IndexStats;
use citesmith_pipeline::{PaperResult, PipelineEvent};
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

fn heading(w: &mut dyn Write, title: &str, color: ColorMode) -> std::io::Result<()> {
    let sep = "=".repeat(60);
    if color.enabled() {
        writeln!(w, "{}", sep.bold())?;
        writeln!(w, "{}", title.bold())?;
        writeln!(w, "{}", sep.bold())?;
    } else {
        writeln!(w, "{}", sep)?;
        writeln!(w, "{}", title)?;
        writeln!(w, "{}", sep)?;
    }
    writeln!(w)
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_string()
    }
}

/// Print the library summary after loading source documents.
pub fn print_library_summary(
    w: &mut dyn Write,
    stats: &IndexStats,
    skipped: usize,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(
        w,
        "Loaded {} source documents ({} pages)",
        stats.total_files, stats.total_pages
    )?;
    if skipped > 0 {
        let msg = format!("(Skipped {} unreadable files)", skipped);
        if color.enabled() {
            writeln!(w, "{}", msg.dimmed())?;
        } else {
            writeln!(w, "{}", msg)?;
        }
    }
    writeln!(w)
}

/// Print a real-time progress event.
pub fn print_progress(w: &mut dyn Write, event: &PipelineEvent, color: ColorMode) -> std::io::Result<()> {
    match event {
        PipelineEvent::ClaimsIdentified { count } => {
            writeln!(w, "Found {} claims needing citations", count)?;
        }
        PipelineEvent::Cited {
            index,
            total,
            source,
            authority,
        } => {
            if color.enabled() {
                writeln!(
                    w,
                    "[{}/{}] -> {} ({}, authority {:.2})",
                    index + 1,
                    total,
                    "CITED".green(),
                    source,
                    authority
                )?;
            } else {
                writeln!(
                    w,
                    "[{}/{}] -> CITED ({}, authority {:.2})",
                    index + 1,
                    total,
                    source,
                    authority
                )?;
            }
        }
        PipelineEvent::Skipped {
            index,
            total,
            reason,
        } => {
            if color.enabled() {
                writeln!(w, "[{}/{}] -> {} ({})", index + 1, total, "SKIPPED".yellow(), reason)?;
            } else {
                writeln!(w, "[{}/{}] -> SKIPPED ({})", index + 1, total, reason)?;
            }
        }
    }
    Ok(())
}

/// Print the cited paper, the per-claim report and the reference list.
pub fn print_paper_result(w: &mut dyn Write, result: &PaperResult, color: ColorMode) -> std::io::Result<()> {
    if let Some(error) = &result.error {
        if color.enabled() {
            writeln!(w, "{} {}", "WARNING:".yellow(), error)?;
        } else {
            writeln!(w, "WARNING: {}", error)?;
        }
        writeln!(w)?;
    }

    heading(w, "CITED TEXT", color)?;
    writeln!(w, "{}", result.cited_text)?;
    writeln!(w)?;

    if !result.citations.is_empty() {
        heading(w, "CITATIONS", color)?;
        for (i, c) in result.citations.iter().enumerate() {
            if color.enabled() {
                writeln!(w, "{}. {}", i + 1, truncate(&c.claim, 70).cyan())?;
            } else {
                writeln!(w, "{}. {}", i + 1, truncate(&c.claim, 70))?;
            }
            writeln!(w, "   Type:      {}", c.claim_type)?;
            writeln!(w, "   Source:    {} (p. {})", c.source, c.page)?;
            writeln!(w, "   Authority: {:.2} - {}", c.authority_score, c.claim_type_match)?;
            writeln!(w, "   Quote:     \"{}\"", truncate(&c.quote, 100))?;
            writeln!(w, "   Citation:  {}", c.citation)?;
            writeln!(w)?;
        }
    }

    if !result.references.is_empty() {
        writeln!(w, "{}", result.references)?;
        writeln!(w)?;
    }

    print_stats(w, result, color)
}

fn print_stats(w: &mut dyn Write, result: &PaperResult, color: ColorMode) -> std::io::Result<()> {
    let stats = &result.stats;
    if color.enabled() {
        writeln!(w, "{}", "SUMMARY".bold())?;
        writeln!(w, "  Claims identified: {}", stats.claims_identified)?;
        writeln!(w, "  Citations added:   {}", stats.citations_added.to_string().green())?;
        writeln!(w, "  Sources used:      {}", stats.sources_used)?;
    } else {
        writeln!(w, "SUMMARY")?;
        writeln!(w, "  Claims identified: {}", stats.claims_identified)?;
        writeln!(w, "  Citations added:   {}", stats.citations_added)?;
        writeln!(w, "  Sources used:      {}", stats.sources_used)?;
    }
    Ok(())
}

/// Print extracted metadata for one document.
pub fn print_metadata(w: &mut dyn Write, filename: &str, m: &Metadata, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", filename.bold())?;
    } else {
        writeln!(w, "{}", filename)?;
    }
    let fields: [(&str, String); 9] = [
        ("Title", m.title.clone()),
        ("Authors", m.authors.join("; ")),
        ("Year", m.year.clone()),
        ("Journal", m.journal_or_subject().to_string()),
        ("Volume", m.volume.clone()),
        ("Issue", m.issue.clone()),
        ("Pages", m.pages.clone()),
        ("DOI", m.doi.clone()),
        ("Keywords", m.keywords.join(", ")),
    ];
    for (label, value) in fields.iter().filter(|(_, v)| !v.is_empty()) {
        writeln!(w, "  {:<9} {}", format!("{label}:"), value)?;
    }
    if !m.abstract_text.is_empty() {
        writeln!(w, "  {:<9} {}", "Abstract:", truncate(&m.abstract_text, 120))?;
    }

    let verdict = if m.is_academic_paper { "academic paper" } else { "not an academic paper" };
    let line = format!("  {} (confidence {:.2})", verdict, m.confidence_score);
    match (color.enabled(), m.is_academic_paper) {
        (true, true) => writeln!(w, "{}", line.green())?,
        (true, false) => writeln!(w, "{}", line.dimmed())?,
        (false, _) => writeln!(w, "{}", line)?,
    }
    writeln!(w)
}

/// Print bibliography statistics followed by every entry.
pub fn print_bibliography(w: &mut dyn Write, bib: &BibliographyParser, color: ColorMode) -> std::io::Result<()> {
    let stats = bib.statistics();
    heading(w, "BIBLIOGRAPHY", color)?;
    writeln!(w, "Entries:    {}", stats.total_entries)?;
    for (kind, count) in &stats.types {
        writeln!(w, "  {:<9} {}", kind, count)?;
    }
    writeln!(w, "With DOI:   {}", stats.entries_with_doi)?;
    writeln!(w, "With year:  {}", stats.entries_with_year)?;
    writeln!(w)?;

    for (i, entry) in bib.entries().iter().enumerate() {
        if color.enabled() {
            writeln!(w, "[{}] {}", i + 1, entry.title.cyan())?;
        } else {
            writeln!(w, "[{}] {}", i + 1, entry.title)?;
        }
        if !entry.authors.is_empty() {
            writeln!(w, "    Authors: {}", entry.authors.join("; "))?;
        }
        if !entry.year.is_empty() {
            writeln!(w, "    Year:    {}", entry.year)?;
        }
        if !entry.journal.is_empty() {
            writeln!(w, "    Journal: {}", entry.journal)?;
        }
        if !entry.doi.is_empty() {
            writeln!(w, "    DOI:     {}", entry.doi)?;
        }
        writeln!(w, "    Type:    {}", entry.entry_type.as_str())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use citesmith_pipeline::SkipReason;

    fn render(f: impl FnOnce(&mut dyn Write) -> std::io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_progress_plain() {
        let out = render(|w| {
            print_progress(
                w,
                &PipelineEvent::Skipped {
                    index: 0,
                    total: 2,
                    reason: SkipReason::NoQuote,
                },
                ColorMode(false),
            )
        });
        assert_eq!(out, "[1/2] -> SKIPPED (no supporting quote)\n");
    }

    #[test]
    fn test_passthrough_result_warns() {
        let result = PaperResult::passthrough("Draft.", Some("no claim extractor configured".into()));
        let out = render(|w| print_paper_result(w, &result, ColorMode(false)));
        assert!(out.starts_with("WARNING: no claim extractor configured"));
        assert!(out.contains("Draft."));
        assert!(!out.contains("CITATIONS"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("abc", 3), "abc");
    }
}
