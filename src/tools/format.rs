//! Markdown formatting for tool output
//!
//! - One `##` section per disease, most relevant first
//! - Query words in matched terms are wrapped in **bold**
//! - Detail view groups the record by clinical concern

use diagsearch::catalog::{AntibioticRegimen, DiseaseRecord, DoseAdjustment};
use diagsearch::search::{normalize_for_matching, CatalogStats, SearchResult};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Pathogens shown per result in list views
const PATHOGENS_IN_SUMMARY: usize = 3;

/// Bold every case-insensitive occurrence of the query words.
///
/// Overlapping and adjacent ranges are merged so emphasis never nests.
pub fn highlight(text: &str, query: &str) -> String {
    let lower = text.to_lowercase();
    // Offsets are shared between both strings, which only holds when
    // lowercasing kept every byte length
    if query.trim().is_empty() || lower.len() != text.len() {
        return text.to_string();
    }

    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for term in normalize_for_matching(query).split_whitespace() {
        let term = term.trim_matches(|c: char| !c.is_alphanumeric());
        if term.chars().count() < 2 {
            continue;
        }
        ranges.extend(
            lower
                .match_indices(term)
                .filter(|(start, _)| text.is_char_boundary(*start) && text.is_char_boundary(start + term.len()))
                .map(|(start, _)| (start, start + term.len())),
        );
    }

    if ranges.is_empty() {
        return text.to_string();
    }

    ranges.sort_by_key(|r| r.0);
    let mut merged: Vec<(usize, usize)> = Vec::new();
    for (s, e) in ranges {
        match merged.last_mut() {
            Some(last) if s <= last.1 => last.1 = last.1.max(e),
            _ => merged.push((s, e)),
        }
    }

    let mut res = String::with_capacity(text.len() + merged.len() * 4);
    let mut last_idx = 0usize;
    for (s, e) in merged {
        res.push_str(&text[last_idx..s]);
        res.push_str("**");
        res.push_str(&text[s..e]);
        res.push_str("**");
        last_idx = e;
    }
    res.push_str(&text[last_idx..]);
    res
}

/// Ranked or listed results
pub fn format_results(title: &str, results: &[SearchResult], query: Option<&str>) -> String {
    let mut md = format!("# {}\n\n", title);

    if results.is_empty() {
        md.push_str("No matching diseases.\n");
        return md;
    }

    let _ = writeln!(md, "{} result{}\n", results.len(), if results.len() == 1 { "" } else { "s" });

    for (rank, result) in results.iter().enumerate() {
        let disease = &result.disease;
        let _ = writeln!(md, "## {}. {}", rank + 1, disease.name);
        let _ = writeln!(md, "- **ID:** `{}`", disease.id);
        let _ = writeln!(
            md,
            "- **Relevance:** {} (score {:.2})",
            result.relevance.as_str(),
            result.score
        );
        let _ = writeln!(
            md,
            "- **Type:** {} · **Severity:** {} · **Setting:** {}",
            disease.kind, disease.severity, disease.territory
        );
        if !disease.organ.is_empty() {
            let _ = writeln!(md, "- **Organ:** {}", disease.organ);
        }

        if !result.matched_terms.is_empty() {
            let terms: Vec<String> = result
                .matched_terms
                .iter()
                .map(|t| match query {
                    Some(q) => highlight(t, q),
                    None => t.clone(),
                })
                .collect();
            let _ = writeln!(md, "- **Matched:** {}", terms.join(", "));
        }

        if !disease.pathogens.is_empty() {
            let pathogens: Vec<String> = disease
                .pathogens
                .iter()
                .take(PATHOGENS_IN_SUMMARY)
                .map(|p| {
                    if p.frequency.is_empty() {
                        format!("*{}*", p.name)
                    } else {
                        format!("*{}* ({})", p.name, p.frequency)
                    }
                })
                .collect();
            let _ = writeln!(md, "- **Pathogens:** {}", pathogens.join(", "));
        }
        md.push('\n');
    }

    md
}

pub fn format_suggestions(partial: &str, suggestions: &[String]) -> String {
    let mut md = format!("# Suggestions for \"{}\"\n\n", partial.trim());
    if suggestions.is_empty() {
        md.push_str("No suggestions.\n");
        return md;
    }
    for suggestion in suggestions {
        let _ = writeln!(md, "- {}", highlight(suggestion, partial));
    }
    md
}

fn count_table(md: &mut String, heading: &str, counts: &BTreeMap<String, usize>) {
    let _ = writeln!(md, "## {}\n", heading);
    md.push_str("| Value | Count |\n|---|---|\n");
    for (key, count) in counts {
        let label = if key.is_empty() { "(none)" } else { key.as_str() };
        let _ = writeln!(md, "| {} | {} |", label, count);
    }
    md.push('\n');
}

pub fn format_stats(stats: &CatalogStats) -> String {
    let mut md = String::from("# Catalog statistics\n\n");
    let _ = writeln!(md, "**Total diseases:** {}\n", stats.total);
    count_table(&mut md, "By type", &stats.by_type);
    count_table(&mut md, "By severity", &stats.by_severity);
    count_table(&mut md, "By setting", &stats.by_territory);
    count_table(&mut md, "By organ", &stats.by_organ);
    md
}

fn bullet_section(md: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(md, "### {}\n", heading);
    for item in items {
        let _ = writeln!(md, "- {}", item);
    }
    md.push('\n');
}

fn format_adjustment(adjustment: &DoseAdjustment) -> String {
    match adjustment {
        DoseAdjustment::Renal {
            creatinine_clearance,
            adjustment,
        } => format!("Renal (CrCl {}): {}", creatinine_clearance, adjustment),
        DoseAdjustment::Hepatic { severity, adjustment } => {
            format!("Hepatic ({}): {}", severity, adjustment)
        }
        DoseAdjustment::Weight { note } => format!("Weight: {}", note),
        DoseAdjustment::Age { note } => format!("Age: {}", note),
    }
}

fn format_regimen(md: &mut String, regimen: &AntibioticRegimen) {
    let _ = writeln!(
        md,
        "#### {} ({} line, {})\n",
        regimen.name,
        regimen.line.as_str(),
        regimen.context
    );
    let _ = writeln!(md, "_{}_\n", regimen.indication);
    for molecule in &regimen.molecules {
        let _ = write!(
            md,
            "- **{}** {} {} · {} · {}",
            molecule.name,
            molecule.dosage,
            molecule.route.as_str(),
            molecule.frequency,
            molecule.duration
        );
        if let Some(notes) = &molecule.notes {
            let _ = write!(md, " ({})", notes);
        }
        md.push('\n');
    }
    if !regimen.contraindications.is_empty() {
        let _ = writeln!(md, "- Contraindications: {}", regimen.contraindications.join("; "));
    }
    for adjustment in &regimen.adjustments {
        let _ = writeln!(md, "- {}", format_adjustment(adjustment));
    }
    if let Some(deescalation) = &regimen.deescalation {
        let _ = writeln!(md, "- De-escalation to {} ({})", deescalation.to, deescalation.timing);
    }
    md.push('\n');
}

/// Full detail view of one record
pub fn format_disease(disease: &DiseaseRecord) -> String {
    let mut md = format!("# {}\n\n", disease.name);
    let _ = writeln!(md, "- **ID:** `{}`", disease.id);
    if !disease.common_names.is_empty() {
        let _ = writeln!(md, "- **Also known as:** {}", disease.common_names.join(", "));
    }
    let _ = writeln!(
        md,
        "- **Type:** {} · **Severity:** {} · **Setting:** {}",
        disease.kind, disease.severity, disease.territory
    );
    if !disease.organ.is_empty() {
        let _ = writeln!(md, "- **Organ:** {}", disease.organ);
    }
    if !disease.specialty.is_empty() {
        let _ = writeln!(md, "- **Specialties:** {}", disease.specialty.join(", "));
    }
    if !disease.search_terms.icd10.is_empty() {
        let _ = writeln!(md, "- **ICD-10:** {}", disease.search_terms.icd10.join(", "));
    }
    md.push('\n');

    let epidemiology = &disease.epidemiology;
    if let Some(incidence) = &epidemiology.incidence {
        let _ = writeln!(md, "**Incidence:** {}\n", incidence);
    }
    bullet_section(&mut md, "Risk factors", &epidemiology.risk_factors);

    let clinical = &disease.diagnostic.clinical;
    bullet_section(&mut md, "Major criteria", &clinical.major);
    bullet_section(&mut md, "Minor criteria", &clinical.minor);
    bullet_section(&mut md, "Biology", &disease.diagnostic.biological.supportive);
    if let Some(imaging) = &disease.diagnostic.imaging {
        bullet_section(&mut md, "Imaging (first line)", &imaging.first_line);
    }
    bullet_section(&mut md, "Microbiology", &disease.diagnostic.microbiological.samples);

    let pathogens: Vec<String> = disease
        .pathogens
        .iter()
        .map(|p| match &p.notes {
            Some(notes) => format!("*{}* ({}) {}", p.name, p.frequency, notes),
            None => format!("*{}* ({})", p.name, p.frequency),
        })
        .collect();
    bullet_section(&mut md, "Pathogens", &pathogens);

    let therapy = &disease.antibiotherapy;
    if !therapy.probabilistic.is_empty() || !therapy.documented.is_empty() {
        md.push_str("### Antibiotherapy\n\n");
        for regimen in therapy.probabilistic.iter().chain(&therapy.documented) {
            format_regimen(&mut md, regimen);
        }
        if !therapy.duration.standard.is_empty() {
            let _ = writeln!(md, "**Duration:** {}", therapy.duration.standard);
            if !therapy.duration.severe.is_empty() {
                let _ = writeln!(md, "**Severe forms:** {}", therapy.duration.severe);
            }
            md.push('\n');
        }
    }

    bullet_section(&mut md, "Differential diagnosis", &disease.differential_diagnosis);
    bullet_section(&mut md, "Complications", &disease.complications);

    let guidelines: Vec<String> = disease
        .guidelines
        .iter()
        .map(|g| format!("{} {}: {}", g.source, g.year, g.title))
        .collect();
    bullet_section(&mut md, "Guidelines", &guidelines);

    md
}
